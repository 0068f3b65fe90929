//! A declarative verification-and-aggregation engine for provenance-tagged
//! chain evidence.
//!
//! One generic engine serves every circuit: a [`QueryDefinition`] declares
//! what to match, how to extract, what to aggregate, which bounds to assert
//! and what to reveal; [`execute`] runs the strictly linear pipeline over an
//! externally supplied, already-authenticated [`QueryWitness`].

pub mod aggregate;
pub mod bound;
pub mod definition;
pub mod encode;
pub mod error;
pub mod extract;
pub mod pattern;
pub mod validate;

pub use definition::{
    address_param, signed_param, AggregateOp, AggregateSpec, Allocation, BoundSpec, Operand,
    OutputSource, OutputSpec, QueryDefinition, SlotSelection, ValueMode,
};
pub use error::Error;
pub use extract::Scalar;
pub use pattern::{
    matches, BatchPattern, Branch, EitherRule, LogFieldPattern, SlotPattern, StorageSlotPattern,
    ValueRule,
};

use tracing::{debug, instrument};

pub use zkquery_types_base::{
    EvidenceRecord, FieldLocation, LogFieldRecord, OutputShape, OutputValue, QueryWitness,
    StorageSlotRecord,
};

/// The result of a successful query invocation: the typed output values and
/// their fixed-layout encoding.
///
/// A failed invocation produces neither; downstream consumers treat "no
/// output" and "failed verification" as identical.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryOutput {
    pub values: Vec<OutputValue>,
    pub bytes: Vec<u8>,
}

/// Evaluate one query over one witness.
///
/// The flow is strictly linear and stateless across invocations: validate
/// the batch, aggregate, assert bounds, encode outputs. The first error
/// aborts the invocation; there is no retry and no partial output.
#[instrument(name = "zkquery_execute", skip_all, fields(records = witness.records.len()))]
pub fn execute(def: &QueryDefinition, witness: &QueryWitness) -> Result<QueryOutput, Error> {
    def.check()?;

    validate::validate(def, witness)?;
    debug!(capacity = def.capacity(), "batch validated");

    let aggregates = aggregate::compute(def, witness)?;
    debug!(count = aggregates.len(), "aggregates computed");

    bound::check_bounds(def, &aggregates, &witness.params)?;
    debug!(bounds = def.bounds.len(), "bounds asserted");

    let values = encode::resolve_outputs(def, witness, &aggregates)?;
    let bytes = encode::encode_outputs(&values)?;
    debug!(len = bytes.len(), "output encoded");

    Ok(QueryOutput { values, bytes })
}
