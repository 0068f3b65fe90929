//! Proves a Uniswap V3 pool's cumulative-tick movement over an observation
//! window stays inside a caller-supplied range.
//!
//! Tick cumulatives are signed; they are extracted in signed mode and the
//! window is a true last-minus-first delta over the two observation slots.

use alloy_primitives::{Address, B256, I256, U256};
use zkquery_engine::{
    address_param, signed_param, AggregateOp, AggregateSpec, Allocation, BatchPattern, BoundSpec,
    Operand, OutputSource, OutputSpec, QueryDefinition, SlotPattern, SlotSelection,
    StorageSlotPattern, ValueMode, ValueRule,
};
use zkquery_types_base::OutputShape;

/// The V3 pool's oracle observation array starts at slot 8.
const OBSERVATIONS_BASE_SLOT: u64 = 8;

/// Observation slots read per invocation: the window's start and end.
pub const OBSERVATIONS: usize = 2;

/// Parameter layout: `[pool, min_delta, max_delta]` with the deltas as raw
/// two's-complement words.
#[derive(Debug, Clone, Copy)]
pub struct OracleTwap {
    pub pool: Address,
    pub min_delta: I256,
    pub max_delta: I256,
}

impl OracleTwap {
    pub fn definition(&self) -> QueryDefinition {
        let slots = (0..OBSERVATIONS)
            .map(|i| {
                SlotPattern::StorageSlot(StorageSlotPattern {
                    contract: self.pool,
                    slot_key: observation_slot(i),
                    value: ValueRule::Any,
                })
            })
            .collect();

        QueryDefinition {
            allocation: Allocation {
                log_fields: 0,
                storage_slots: OBSERVATIONS,
            },
            pattern: BatchPattern::conjunctive(slots),
            extract: vec![ValueMode::Signed; OBSERVATIONS],
            aggregates: vec![AggregateSpec {
                op: AggregateOp::Delta,
                over: SlotSelection::All,
            }],
            bounds: vec![BoundSpec {
                aggregate: 0,
                min: Some(Operand::Param(1)),
                max: Some(Operand::Param(2)),
            }],
            outputs: vec![
                OutputSpec {
                    source: OutputSource::Param(0),
                    shape: OutputShape::Address,
                },
                OutputSpec {
                    source: OutputSource::Aggregate(0),
                    shape: OutputShape::Int { bits: 248 },
                },
                OutputSpec {
                    source: OutputSource::Param(1),
                    shape: OutputShape::Int { bits: 248 },
                },
                OutputSpec {
                    source: OutputSource::Param(2),
                    shape: OutputShape::Int { bits: 248 },
                },
                OutputSpec {
                    source: OutputSource::BlockNumber(OBSERVATIONS - 1),
                    shape: OutputShape::Uint { bits: 64 },
                },
            ],
        }
    }

    pub fn params(&self) -> Vec<U256> {
        vec![
            address_param(self.pool),
            signed_param(self.min_delta),
            signed_param(self.max_delta),
        ]
    }
}

/// Slot key of `observations[index]`; the array is laid out contiguously
/// from its base slot.
fn observation_slot(index: usize) -> B256 {
    B256::from(U256::from(OBSERVATIONS_BASE_SLOT + index as u64))
}
