use alloy_primitives::{Address, B256, U256};

/// Position of a log field within the event's topic/data layout.
///
/// Indexed event arguments land in topics (topic 0 being the event signature
/// hash itself), non-indexed arguments are ABI-packed into the data section.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    rkyv::Archive,
    rkyv::Deserialize,
    rkyv::Serialize,
    serde::Deserialize,
    serde::Serialize,
)]
#[rkyv(derive(Debug))]
pub enum FieldLocation {
    /// Indexed field at the given topic index (1-based, topic 0 is the event id).
    Topic(u8),
    /// Non-indexed field at the given word offset into the data section.
    Data(u8),
}

impl FieldLocation {
    pub fn is_topic(&self) -> bool {
        matches!(self, FieldLocation::Topic(_))
    }

    pub fn index(&self) -> u8 {
        match self {
            FieldLocation::Topic(i) | FieldLocation::Data(i) => *i,
        }
    }
}

/// A single field of an emitted event log, tagged with its provenance.
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
pub struct LogFieldRecord {
    /// The contract that emitted the log.
    pub contract: Address,
    /// Keccak-256 hash of the event signature.
    pub event_id: B256,
    /// Where the field sits in the event's topic/data layout.
    pub location: FieldLocation,
    /// The field content, left-padded to a 256-bit word.
    pub value: U256,
    /// The block in which the log was emitted.
    pub block_number: u64,
}

/// One storage slot read from a contract, tagged with its provenance.
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
pub struct StorageSlotRecord {
    /// The contract that owns the storage.
    pub contract: Address,
    /// The computed slot key. Recomputing the key from a mapping/struct
    /// layout is the evidence supplier's job, not the engine's.
    pub slot_key: B256,
    /// The slot content.
    pub value: U256,
    /// The block at which the slot was observed.
    pub block_number: u64,
}

/// A provenance-tagged chain-data fact consumed by the engine.
///
/// Records arrive already authenticated; the engine checks their provenance
/// tags against declared patterns and nothing more.
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
pub enum EvidenceRecord {
    LogField(LogFieldRecord),
    StorageSlot(StorageSlotRecord),
}

impl EvidenceRecord {
    /// The contract this record originates from.
    pub fn contract(&self) -> Address {
        match self {
            EvidenceRecord::LogField(r) => r.contract,
            EvidenceRecord::StorageSlot(r) => r.contract,
        }
    }

    /// The record's selector: event id for log fields, slot key for storage.
    pub fn selector(&self) -> B256 {
        match self {
            EvidenceRecord::LogField(r) => r.event_id,
            EvidenceRecord::StorageSlot(r) => r.slot_key,
        }
    }

    /// The 256-bit value carried by the record.
    pub fn value(&self) -> U256 {
        match self {
            EvidenceRecord::LogField(r) => r.value,
            EvidenceRecord::StorageSlot(r) => r.value,
        }
    }

    /// The block at which the record was observed.
    pub fn block_number(&self) -> u64 {
        match self {
            EvidenceRecord::LogField(r) => r.block_number,
            EvidenceRecord::StorageSlot(r) => r.block_number,
        }
    }

    pub fn is_log_field(&self) -> bool {
        matches!(self, EvidenceRecord::LogField(_))
    }

    pub fn is_storage_slot(&self) -> bool {
        matches!(self, EvidenceRecord::StorageSlot(_))
    }
}
