use alloy_primitives::U256;
use zkquery_types_base::QueryWitness;

use crate::{
    definition::{AggregateOp, QueryDefinition},
    error::Error,
    extract::{extract_at, Scalar},
};

/// Compute every declared aggregate over a validated batch, in declaration
/// order.
///
/// Sum accumulates left-to-right, but the result is order-independent:
/// addition over the width-bounded domain is exact, and overflow aborts the
/// invocation rather than wrapping.
pub fn compute(def: &QueryDefinition, witness: &QueryWitness) -> Result<Vec<Scalar>, Error> {
    def.aggregates
        .iter()
        .enumerate()
        .map(|(index, spec)| {
            let selected = spec.over.indices(def.capacity());
            let (&first_slot, &last_slot) = match (selected.first(), selected.last()) {
                (Some(first), Some(last)) => (first, last),
                _ => {
                    return Err(Error::Definition(format!(
                        "aggregate {index} selects no slots"
                    )))
                }
            };
            match spec.op {
                AggregateOp::Count => Ok(Scalar::Uint(U256::from(selected.len()))),
                AggregateOp::Sum => {
                    let signed = def
                        .extract
                        .get(first_slot)
                        .ok_or_else(|| {
                            Error::Definition(format!("no extraction mode for slot {first_slot}"))
                        })?
                        .is_signed();
                    selected
                        .iter()
                        .try_fold(Scalar::zero(signed), |acc, &slot| {
                            let value = extract_at(&witness.records, &def.extract, slot)?;
                            acc.checked_add(value)
                        })
                }
                AggregateOp::Delta => {
                    let first = extract_at(&witness.records, &def.extract, first_slot)?;
                    let last = extract_at(&witness.records, &def.extract, last_slot)?;
                    last.checked_sub(first)
                }
            }
        })
        .collect()
}
