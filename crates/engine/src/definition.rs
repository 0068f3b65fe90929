use alloy_primitives::{Address, I256, U256};
use zkquery_types_base::OutputShape;

use crate::{error::Error, pattern::BatchPattern};

/// An [`Address`] as the raw 256-bit parameter word the engine compares and
/// reveals it as.
pub fn address_param(address: Address) -> U256 {
    U256::from_be_bytes(address.into_word().0)
}

/// A signed bound as the raw two's-complement parameter word.
pub fn signed_param(value: I256) -> U256 {
    value.into_raw()
}

/// A scalar operand resolved at invocation time: either a protocol constant
/// baked into the definition, or a reference into the witness parameter list
/// (the proven address, a caller-supplied threshold).
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub enum Operand {
    Const(U256),
    Param(usize),
}

impl Operand {
    pub fn resolve(&self, params: &[U256]) -> Result<U256, Error> {
        match self {
            Operand::Const(value) => Ok(*value),
            Operand::Param(index) => params.get(*index).copied().ok_or_else(|| {
                Error::Definition(format!("parameter index {index} out of range"))
            }),
        }
    }
}

/// Declared batch capacity, fixed at query-definition time. Capacity is
/// exact: every declared slot must carry a matching record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct Allocation {
    pub log_fields: usize,
    pub storage_slots: usize,
}

impl Allocation {
    pub fn total(&self) -> usize {
        self.log_fields + self.storage_slots
    }
}

/// How a record's 256-bit value is interpreted on extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub enum ValueMode {
    /// Unsigned scalar, must fit the 248-bit numeric domain.
    Unsigned,
    /// Two's-complement signed scalar, range-checked against the signed
    /// 248-bit domain. Fields known to carry signed encodings must declare
    /// this mode; unsigned reinterpretation of negative values is exactly
    /// the aggregate-inflation hazard this mode exists to rule out.
    Signed,
    /// An address in the low 160 bits; upper bits must be zero.
    Address,
}

impl ValueMode {
    pub fn is_signed(&self) -> bool {
        matches!(self, ValueMode::Signed)
    }
}

/// The batch slots an aggregation ranges over. `Slots` gives true indexed
/// access to individual batch elements.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub enum SlotSelection {
    All,
    Slots(Vec<usize>),
}

impl SlotSelection {
    /// Concrete slot indices for a batch of `capacity` records.
    pub fn indices(&self, capacity: usize) -> Vec<usize> {
        match self {
            SlotSelection::All => (0..capacity).collect(),
            SlotSelection::Slots(slots) => slots.clone(),
        }
    }
}

/// A reduction over extracted scalars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub enum AggregateOp {
    /// Width-checked sum of the selected values.
    Sum,
    /// Number of selected slots. Equals the declared capacity for
    /// [`SlotSelection::All`], since validation is all-or-fail.
    Count,
    /// Last minus first of the selected values, in selection order.
    Delta,
}

/// One named reduction over a validated batch.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct AggregateSpec {
    pub op: AggregateOp,
    pub over: SlotSelection,
}

/// A bound asserted against an aggregate: `min <= observed` and/or
/// `observed <= max`. One-sided bounds leave the other side `None`.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct BoundSpec {
    /// Index into [`QueryDefinition::aggregates`].
    pub aggregate: usize,
    pub min: Option<Operand>,
    pub max: Option<Operand>,
}

/// Where one output slot's value comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub enum OutputSource {
    /// A witness parameter, revealed as-is.
    Param(usize),
    /// A computed aggregate, by index.
    Aggregate(usize),
    /// The extracted value of a single batch slot.
    SlotValue(usize),
    /// The block-number tag of a single batch slot.
    BlockNumber(usize),
}

/// One slot of the fixed-layout public output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct OutputSpec {
    pub source: OutputSource,
    pub shape: OutputShape,
}

/// The full declarative description of one query: what to match, how to
/// extract, what to aggregate, which bounds to assert, and what to reveal.
///
/// A definition is an immutable value passed into [`crate::execute`]; one
/// generic engine serves every parameterization.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct QueryDefinition {
    pub allocation: Allocation,
    pub pattern: BatchPattern,
    /// Extraction mode per batch slot; length equals the declared capacity.
    pub extract: Vec<ValueMode>,
    pub aggregates: Vec<AggregateSpec>,
    pub bounds: Vec<BoundSpec>,
    pub outputs: Vec<OutputSpec>,
}

impl QueryDefinition {
    /// Declared batch capacity.
    pub fn capacity(&self) -> usize {
        self.allocation.total()
    }

    /// Well-formedness of the definition itself, independent of any witness.
    pub fn check(&self) -> Result<(), Error> {
        let capacity = self.capacity();

        if self.pattern.slots.len() != capacity {
            return Err(Error::Definition(format!(
                "pattern declares {} slots, allocation declares {capacity}",
                self.pattern.slots.len()
            )));
        }
        let log_patterns = self
            .pattern
            .slots
            .iter()
            .filter(|p| p.is_log_field())
            .count();
        if log_patterns != self.allocation.log_fields {
            return Err(Error::Definition(format!(
                "pattern declares {log_patterns} log-field slots, allocation declares {}",
                self.allocation.log_fields
            )));
        }
        if self.extract.len() != capacity {
            return Err(Error::Definition(format!(
                "extraction declares {} modes for {capacity} slots",
                self.extract.len()
            )));
        }

        for rule in &self.pattern.either {
            for branch in [&rule.left, &rule.right] {
                if branch.slot >= capacity {
                    return Err(Error::Definition(format!(
                        "either-rule designates slot {} beyond capacity {capacity}",
                        branch.slot
                    )));
                }
            }
        }

        for (index, spec) in self.aggregates.iter().enumerate() {
            let selected = spec.over.indices(capacity);
            if selected.is_empty() {
                return Err(Error::Definition(format!(
                    "aggregate {index} selects no slots"
                )));
            }
            if let Some(&bad) = selected.iter().find(|&&slot| slot >= capacity) {
                return Err(Error::Definition(format!(
                    "aggregate {index} selects slot {bad} beyond capacity {capacity}"
                )));
            }
            if spec.op == AggregateOp::Delta && selected.len() < 2 {
                return Err(Error::Definition(format!(
                    "aggregate {index} computes a delta over fewer than two slots"
                )));
            }
            if spec.op != AggregateOp::Count {
                let signed = self.extract[selected[0]].is_signed();
                if selected
                    .iter()
                    .any(|&slot| self.extract[slot].is_signed() != signed)
                {
                    return Err(Error::Definition(format!(
                        "aggregate {index} mixes signed and unsigned slots"
                    )));
                }
            }
        }

        for (index, bound) in self.bounds.iter().enumerate() {
            if bound.aggregate >= self.aggregates.len() {
                return Err(Error::Definition(format!(
                    "bound {index} references aggregate {} of {}",
                    bound.aggregate,
                    self.aggregates.len()
                )));
            }
            if bound.min.is_none() && bound.max.is_none() {
                return Err(Error::Definition(format!("bound {index} asserts nothing")));
            }
        }

        for (index, output) in self.outputs.iter().enumerate() {
            match output.source {
                OutputSource::Aggregate(agg) if agg >= self.aggregates.len() => {
                    return Err(Error::Definition(format!(
                        "output {index} references aggregate {agg} of {}",
                        self.aggregates.len()
                    )));
                }
                OutputSource::SlotValue(slot) | OutputSource::BlockNumber(slot)
                    if slot >= capacity =>
                {
                    return Err(Error::Definition(format!(
                        "output {index} references slot {slot} beyond capacity {capacity}"
                    )));
                }
                _ => {}
            }
        }

        Ok(())
    }
}
