//! Proves deposit activity on Aave V3 from `Supply` events: the summed
//! deposit amounts of one user must clear a caller-supplied floor.

use alloy_primitives::{address, b256, Address, B256, U256};
use zkquery_engine::{
    address_param, AggregateOp, AggregateSpec, Allocation, BatchPattern, BoundSpec, FieldLocation,
    LogFieldPattern, Operand, OutputSource, OutputSpec, QueryDefinition, SlotPattern,
    SlotSelection, ValueMode, ValueRule,
};
use zkquery_types_base::OutputShape;

/// Aave V3 Pool on Ethereum mainnet.
const POOL: Address = address!("87870Bca3F3fD6335C3F4ce8392D69350B4fA4E2");

/// `Supply(address indexed reserve, address user, address indexed onBehalfOf,
/// uint256 amount, uint16 indexed referralCode)`
const EVENT_SUPPLY: B256 =
    b256!("2b627736bca15cd5381dcf80b0bf11fd197d01a037c52b927a881a10fb73ba61");

/// Supply events verified per invocation. Two tracked fields per event:
/// the deposit amount (data word 1) and the depositor (data word 0).
pub const SUPPLY_EVENTS: usize = 30;

const FIELDS_PER_EVENT: usize = 2;

/// Parameter layout: `[user, min_deposit]`.
#[derive(Debug, Clone, Copy)]
pub struct LendingSupply {
    pub user: Address,
    pub min_deposit: U256,
}

impl LendingSupply {
    pub fn definition(&self) -> QueryDefinition {
        let mut slots = Vec::with_capacity(SUPPLY_EVENTS * FIELDS_PER_EVENT);
        for _ in 0..SUPPLY_EVENTS {
            // amount is data word 1.
            slots.push(SlotPattern::LogField(LogFieldPattern {
                contract: POOL,
                event_id: EVENT_SUPPLY,
                location: FieldLocation::Data(1),
                value: ValueRule::Any,
            }));
            // user is data word 0 and must be the depositor being proven.
            slots.push(SlotPattern::LogField(LogFieldPattern {
                contract: POOL,
                event_id: EVENT_SUPPLY,
                location: FieldLocation::Data(0),
                value: ValueRule::Equals(Operand::Param(0)),
            }));
        }

        let amount_slots: Vec<usize> = (0..SUPPLY_EVENTS).map(|i| i * FIELDS_PER_EVENT).collect();

        QueryDefinition {
            allocation: Allocation {
                log_fields: SUPPLY_EVENTS * FIELDS_PER_EVENT,
                storage_slots: 0,
            },
            pattern: BatchPattern::conjunctive(slots),
            extract: (0..SUPPLY_EVENTS)
                .flat_map(|_| [ValueMode::Unsigned, ValueMode::Address])
                .collect(),
            aggregates: vec![
                AggregateSpec {
                    op: AggregateOp::Sum,
                    over: SlotSelection::Slots(amount_slots.clone()),
                },
                AggregateSpec {
                    op: AggregateOp::Count,
                    over: SlotSelection::Slots(amount_slots),
                },
            ],
            bounds: vec![BoundSpec {
                aggregate: 0,
                min: Some(Operand::Param(1)),
                max: None,
            }],
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
                    source: OutputSource::Param(1),
                    shape: OutputShape::Uint { bits: 248 },
                },
                OutputSpec {
                    source: OutputSource::Aggregate(1),
                    shape: OutputShape::Uint { bits: 64 },
                },
            ],
        }
    }

    pub fn params(&self) -> Vec<U256> {
        vec![address_param(self.user), self.min_deposit]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zkquery_engine::{execute, Error, EvidenceRecord, LogFieldRecord, QueryWitness};
    use zkquery_types_base::OutputValue;

    fn supply_event(user: Address, amount: u64, block_number: u64) -> [EvidenceRecord; 2] {
        let field = |location: FieldLocation, value: U256| {
            EvidenceRecord::LogField(LogFieldRecord {
                contract: POOL,
                event_id: EVENT_SUPPLY,
                location,
                value,
                block_number,
            })
        };
        [
            field(FieldLocation::Data(1), U256::from(amount)),
            field(FieldLocation::Data(0), address_param(user)),
        ]
    }

    fn witness_with_amounts(circuit: &LendingSupply, amounts: &[u64]) -> QueryWitness {
        let records = amounts
            .iter()
            .enumerate()
            .flat_map(|(i, &amount)| supply_event(circuit.user, amount, 18_000_000 + i as u64))
            .collect();
        QueryWitness::new(records, circuit.params())
    }

    #[test]
    fn summed_deposits_clear_the_floor() {
        let circuit = LendingSupply {
            user: address!("f977814e90da44bfa03b6295a0616a897441acec"),
            min_deposit: U256::from(25_000u64),
        };
        let amounts: Vec<u64> = (0..SUPPLY_EVENTS as u64).map(|i| 1_000 + i).collect();
        let total: u64 = amounts.iter().sum();

        let output = execute(&circuit.definition(), &witness_with_amounts(&circuit, &amounts))
            .unwrap();
        assert_eq!(
            output.values[1],
            OutputValue::Uint {
                bits: 248,
                value: U256::from(total),
            }
        );
        assert_eq!(
            output.values[3],
            OutputValue::Uint {
                bits: 64,
                value: U256::from(SUPPLY_EVENTS),
            }
        );
    }

    #[test]
    fn one_mistagged_event_fails_the_whole_batch() {
        let circuit = LendingSupply {
            user: address!("f977814e90da44bfa03b6295a0616a897441acec"),
            min_deposit: U256::ZERO,
        };
        let amounts: Vec<u64> = vec![1_000; SUPPLY_EVENTS];
        let mut witness = witness_with_amounts(&circuit, &amounts);
        // Rewrite one amount field's event id; the sum of the others would
        // still clear the floor, but validation must abort first.
        if let EvidenceRecord::LogField(record) = &mut witness.records[4] {
            record.event_id =
                b256!("d78ad95fa46c994b6551d0da85fc275fe613ce37657fb8d5e3d130840159d822");
        }
        assert!(matches!(
            execute(&circuit.definition(), &witness),
            Err(Error::PatternMismatch { slot: 4 })
        ));
    }

    #[test]
    fn deposits_below_the_floor_fail() {
        let circuit = LendingSupply {
            user: address!("f977814e90da44bfa03b6295a0616a897441acec"),
            min_deposit: U256::from(1_000_000u64),
        };
        let amounts: Vec<u64> = vec![10; SUPPLY_EVENTS];
        assert!(matches!(
            execute(&circuit.definition(), &witness_with_amounts(&circuit, &amounts)),
            Err(Error::ThresholdUnmet { .. })
        ));
    }
}
