use alloy_primitives::U256;
use rkyv::util::AlignedVec;

use crate::evidence::EvidenceRecord;

/// The witness type accepted by a query: the evidence batch together with
/// the invocation-time circuit parameters (proven address, thresholds).
///
/// The batch is immutable once constructed. Its shape must line up exactly
/// with the query definition's allocation; that check belongs to the engine.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    rkyv::Archive,
    rkyv::Deserialize,
    rkyv::Serialize,
    serde::Deserialize,
    serde::Serialize,
)]
#[rkyv(derive(Debug))]
pub struct QueryWitness {
    /// Evidence records, one per declared batch slot, in slot order.
    pub records: Vec<EvidenceRecord>,
    /// Circuit parameters referenced by the query definition.
    pub params: Vec<U256>,
}

impl QueryWitness {
    pub fn new(records: Vec<EvidenceRecord>, params: Vec<U256>) -> Self {
        Self { records, params }
    }

    /// Serialize the witness for transport to the guest.
    pub fn to_bytes(&self) -> Result<AlignedVec, rkyv::rancor::Error> {
        rkyv::to_bytes(self)
    }

    /// Deserialize a witness previously produced by [`Self::to_bytes`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, rkyv::rancor::Error> {
        rkyv::from_bytes::<Self, rkyv::rancor::Error>(bytes)
    }
}
