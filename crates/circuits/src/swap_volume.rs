//! Proves bidirectional trading volume on the SushiSwap USDC/WETH pair:
//! WETH sent and WETH received are summed separately, the trader may appear
//! as either sender or recipient of each swap.

use alloy_primitives::{address, b256, Address, B256, U256};
use zkquery_engine::{
    address_param, AggregateOp, AggregateSpec, Allocation, BatchPattern, BoundSpec, Branch,
    EitherRule, FieldLocation, LogFieldPattern, Operand, OutputSource, OutputSpec,
    QueryDefinition, SlotPattern, SlotSelection, ValueMode, ValueRule,
};
use zkquery_types_base::OutputShape;

/// SushiSwap USDC/WETH pair on Ethereum mainnet.
const PAIR: Address = address!("397FF1542f962076d0BFE58eA045FfA2d347ACa0");

/// `Swap(address indexed sender, uint amount0In, uint amount1In,
/// uint amount0Out, uint amount1Out, address indexed to)` — identical to
/// Uniswap V2, SushiSwap is a fork.
const EVENT_SWAP: B256 =
    b256!("d78ad95fa46c994b6551d0da85fc275fe613ce37657fb8d5e3d130840159d822");

/// Swaps verified per invocation. Four tracked fields per swap:
/// amount1In (data 1), amount1Out (data 3), sender (topic 1), to (topic 2).
pub const SWAPS: usize = 50;

const FIELDS_PER_SWAP: usize = 4;

/// Parameter layout: `[user, min_volume_in, min_volume_out]`.
#[derive(Debug, Clone, Copy)]
pub struct SwapVolume {
    pub user: Address,
    pub min_volume_in: U256,
    pub min_volume_out: U256,
}

fn swap_field(location: FieldLocation, value: ValueRule) -> SlotPattern {
    SlotPattern::LogField(LogFieldPattern {
        contract: PAIR,
        event_id: EVENT_SWAP,
        location,
        value,
    })
}

impl SwapVolume {
    pub fn definition(&self) -> QueryDefinition {
        let mut slots = Vec::with_capacity(SWAPS * FIELDS_PER_SWAP);
        let mut either = Vec::with_capacity(SWAPS);
        for swap in 0..SWAPS {
            let base = swap * FIELDS_PER_SWAP;
            slots.push(swap_field(FieldLocation::Data(1), ValueRule::Any));
            slots.push(swap_field(FieldLocation::Data(3), ValueRule::Any));
            slots.push(swap_field(FieldLocation::Topic(1), ValueRule::Any));
            slots.push(swap_field(FieldLocation::Topic(2), ValueRule::Any));

            // The trader must be the swap's sender or its recipient.
            either.push(EitherRule {
                left: Branch {
                    slot: base + 2,
                    pattern: swap_field(
                        FieldLocation::Topic(1),
                        ValueRule::Equals(Operand::Param(0)),
                    ),
                },
                right: Branch {
                    slot: base + 3,
                    pattern: swap_field(
                        FieldLocation::Topic(2),
                        ValueRule::Equals(Operand::Param(0)),
                    ),
                },
            });
        }

        let in_slots: Vec<usize> = (0..SWAPS).map(|i| i * FIELDS_PER_SWAP).collect();
        let out_slots: Vec<usize> = (0..SWAPS).map(|i| i * FIELDS_PER_SWAP + 1).collect();
        let volume_slots: Vec<usize> = in_slots.iter().chain(&out_slots).copied().collect();

        QueryDefinition {
            allocation: Allocation {
                log_fields: SWAPS * FIELDS_PER_SWAP,
                storage_slots: 0,
            },
            pattern: BatchPattern { slots, either },
            extract: (0..SWAPS)
                .flat_map(|_| {
                    [
                        ValueMode::Unsigned,
                        ValueMode::Unsigned,
                        ValueMode::Address,
                        ValueMode::Address,
                    ]
                })
                .collect(),
            aggregates: vec![
                AggregateSpec {
                    op: AggregateOp::Sum,
                    over: SlotSelection::Slots(in_slots.clone()),
                },
                AggregateSpec {
                    op: AggregateOp::Sum,
                    over: SlotSelection::Slots(out_slots),
                },
                AggregateSpec {
                    op: AggregateOp::Sum,
                    over: SlotSelection::Slots(volume_slots),
                },
                AggregateSpec {
                    op: AggregateOp::Count,
                    over: SlotSelection::Slots(in_slots),
                },
            ],
            bounds: vec![
                BoundSpec {
                    aggregate: 0,
                    min: Some(Operand::Param(1)),
                    max: None,
                },
                BoundSpec {
                    aggregate: 1,
                    min: Some(Operand::Param(2)),
                    max: None,
                },
            ],
            outputs: vec![
                OutputSpec {
                    source: OutputSource::Param(0),
                    shape: OutputShape::Address,
                },
                OutputSpec {
                    source: OutputSource::Aggregate(0),
                    shape: OutputShape::Uint { bits: 248 },
                },
                OutputSpec {
                    source: OutputSource::Aggregate(1),
                    shape: OutputShape::Uint { bits: 248 },
                },
                OutputSpec {
                    source: OutputSource::Aggregate(2),
                    shape: OutputShape::Uint { bits: 248 },
                },
                OutputSpec {
                    source: OutputSource::Aggregate(3),
                    shape: OutputShape::Uint { bits: 64 },
                },
            ],
        }
    }

    pub fn params(&self) -> Vec<U256> {
        vec![
            address_param(self.user),
            self.min_volume_in,
            self.min_volume_out,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zkquery_engine::{execute, Error, EvidenceRecord, LogFieldRecord, QueryWitness};
    use zkquery_types_base::OutputValue;

    const USER: Address = address!("f977814e90da44bfa03b6295a0616a897441acec");
    const OTHER: Address = address!("28C6c06298d514Db089934071355E5743bf21d60");

    fn log(location: FieldLocation, value: U256) -> EvidenceRecord {
        EvidenceRecord::LogField(LogFieldRecord {
            contract: PAIR,
            event_id: EVENT_SWAP,
            location,
            value,
            block_number: 19_100_000,
        })
    }

    /// One swap's four tracked fields, with the user as sender or recipient.
    fn swap(amount_in: u64, amount_out: u64, sender: Address, to: Address) -> [EvidenceRecord; 4] {
        [
            log(FieldLocation::Data(1), U256::from(amount_in)),
            log(FieldLocation::Data(3), U256::from(amount_out)),
            log(FieldLocation::Topic(1), address_param(sender)),
            log(FieldLocation::Topic(2), address_param(to)),
        ]
    }

    fn circuit() -> SwapVolume {
        SwapVolume {
            user: USER,
            min_volume_in: U256::from(SWAPS as u64),
            min_volume_out: U256::from(SWAPS as u64),
        }
    }

    fn witness(swaps: Vec<[EvidenceRecord; 4]>) -> QueryWitness {
        QueryWitness::new(swaps.into_iter().flatten().collect(), circuit().params())
    }

    #[test]
    fn bidirectional_volume_sums_both_directions() {
        // Alternate the user between sender and recipient roles.
        let swaps: Vec<_> = (0..SWAPS)
            .map(|i| {
                if i % 2 == 0 {
                    swap(10, 20, USER, OTHER)
                } else {
                    swap(10, 20, OTHER, USER)
                }
            })
            .collect();
        let output = execute(&circuit().definition(), &witness(swaps)).unwrap();

        let total_in = U256::from(10u64 * SWAPS as u64);
        let total_out = U256::from(20u64 * SWAPS as u64);
        assert_eq!(
            output.values[1],
            OutputValue::Uint {
                bits: 248,
                value: total_in,
            }
        );
        assert_eq!(
            output.values[2],
            OutputValue::Uint {
                bits: 248,
                value: total_out,
            }
        );
        assert_eq!(
            output.values[3],
            OutputValue::Uint {
                bits: 248,
                value: total_in + total_out,
            }
        );
        assert_eq!(
            output.values[4],
            OutputValue::Uint {
                bits: 64,
                value: U256::from(SWAPS as u64),
            }
        );
    }

    #[test]
    fn recipient_only_swaps_still_match() {
        let swaps: Vec<_> = (0..SWAPS).map(|_| swap(5, 5, OTHER, USER)).collect();
        assert!(execute(&circuit().definition(), &witness(swaps)).is_ok());
    }

    #[test]
    fn a_swap_between_strangers_fails_the_batch() {
        let mut swaps: Vec<_> = (0..SWAPS).map(|_| swap(5, 5, USER, OTHER)).collect();
        swaps[7] = swap(1_000_000, 1_000_000, OTHER, OTHER);
        assert!(matches!(
            execute(&circuit().definition(), &witness(swaps)),
            // Slot 30 is swap 7's sender topic, the left OR branch.
            Err(Error::PatternMismatch { slot: 30 })
        ));
    }
}
