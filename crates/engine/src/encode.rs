use alloy_primitives::{Address, B256, U256};
use zkquery_types_base::{output, OutputShape, OutputValue, QueryWitness};

use crate::{
    definition::{OutputSource, QueryDefinition},
    error::Error,
    extract::{extract_at, Scalar},
};

/// Resolve each declared output source to its typed value, in declaration
/// order. Shape checks happen here; width checks happen at encode time.
pub fn resolve_outputs(
    def: &QueryDefinition,
    witness: &QueryWitness,
    aggregates: &[Scalar],
) -> Result<Vec<OutputValue>, Error> {
    def.outputs
        .iter()
        .enumerate()
        .map(|(index, spec)| {
            let scalar = match spec.source {
                OutputSource::Param(param) => {
                    let raw = witness.params.get(param).copied().ok_or_else(|| {
                        Error::Definition(format!("output {index} references parameter {param}"))
                    })?;
                    Scalar::reinterpret(raw, matches!(spec.shape, OutputShape::Int { .. }))
                }
                OutputSource::Aggregate(agg) => *aggregates.get(agg).ok_or_else(|| {
                    Error::Definition(format!("output {index} references aggregate {agg}"))
                })?,
                OutputSource::SlotValue(slot) => extract_at(&witness.records, &def.extract, slot)?,
                OutputSource::BlockNumber(slot) => {
                    let record = witness.records.get(slot).ok_or_else(|| {
                        Error::Definition(format!("output {index} references slot {slot}"))
                    })?;
                    Scalar::Uint(U256::from(record.block_number()))
                }
            };
            shape_value(index, scalar, spec.shape)
        })
        .collect()
}

/// Encode resolved output values into the fixed-layout buffer.
pub fn encode_outputs(values: &[OutputValue]) -> Result<Vec<u8>, Error> {
    Ok(output::encode(values)?)
}

fn shape_value(index: usize, scalar: Scalar, shape: OutputShape) -> Result<OutputValue, Error> {
    match (scalar, shape) {
        (Scalar::Uint(value), OutputShape::Address) => {
            if value >= (U256::ONE << 160usize) {
                return Err(Error::Overflow {
                    context: format!("output {index} value {value} does not fit an address"),
                });
            }
            Ok(OutputValue::Address(Address::from_word(B256::from(
                value.to_be_bytes::<32>(),
            ))))
        }
        (Scalar::Uint(value), OutputShape::Uint { bits }) => Ok(OutputValue::Uint { bits, value }),
        (Scalar::Int(value), OutputShape::Int { bits }) => Ok(OutputValue::Int { bits, value }),
        (Scalar::Uint(_), OutputShape::Int { .. }) => Err(Error::Definition(format!(
            "output {index} reveals an unsigned value through a signed slot"
        ))),
        (Scalar::Int(_), OutputShape::Uint { .. }) => Err(Error::Definition(format!(
            "output {index} reveals a signed value through an unsigned slot"
        ))),
        (Scalar::Int(_), OutputShape::Address) => Err(Error::Definition(format!(
            "output {index} reveals a signed value as an address"
        ))),
    }
}

