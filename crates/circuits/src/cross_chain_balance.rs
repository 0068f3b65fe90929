//! Proves that a holder's combined USDC balance across Ethereum and BSC
//! clears a total threshold, without revealing the per-chain breakdown
//! beyond the declared outputs.

use alloy_primitives::{address, Address, U256};
use zkquery_engine::{
    address_param, AggregateOp, AggregateSpec, Allocation, BatchPattern, BoundSpec, Operand,
    OutputSource, OutputSpec, QueryDefinition, SlotPattern, SlotSelection, StorageSlotPattern,
    ValueMode, ValueRule,
};
use zkquery_types_base::{utils, OutputShape};

/// USDC on Ethereum mainnet.
const USDC_ETHEREUM: Address = address!("A0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48");

/// USDC on BSC.
const USDC_BSC: Address = address!("8AC76a51cc950d9822D68b83fE1Ad97B32Cd580d");

/// `balanceOf` mapping slot, shared by both deployments.
const BALANCE_OF_SLOT: u64 = 9;

/// Parameter layout: `[holder, min_total_balance]`.
#[derive(Debug, Clone, Copy)]
pub struct CrossChainBalance {
    pub holder: Address,
    pub min_total_balance: U256,
}

impl CrossChainBalance {
    pub fn definition(&self) -> QueryDefinition {
        let balance_slot =
            utils::struct_field_in_mapping_slot(BALANCE_OF_SLOT, 0, self.holder.into_word());
        let balance_of = |contract: Address| {
            SlotPattern::StorageSlot(StorageSlotPattern {
                contract,
                slot_key: balance_slot,
                value: ValueRule::Any,
            })
        };

        QueryDefinition {
            allocation: Allocation {
                log_fields: 0,
                storage_slots: 2,
            },
            pattern: BatchPattern::conjunctive(vec![
                balance_of(USDC_ETHEREUM),
                balance_of(USDC_BSC),
            ]),
            extract: vec![ValueMode::Unsigned; 2],
            aggregates: vec![AggregateSpec {
                op: AggregateOp::Sum,
                over: SlotSelection::All,
            }],
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
                    source: OutputSource::SlotValue(0),
                    shape: OutputShape::Uint { bits: 248 },
                },
                OutputSpec {
                    source: OutputSource::SlotValue(1),
                    shape: OutputShape::Uint { bits: 248 },
                },
                OutputSpec {
                    source: OutputSource::Aggregate(0),
                    shape: OutputShape::Uint { bits: 248 },
                },
                OutputSpec {
                    source: OutputSource::Param(1),
                    shape: OutputShape::Uint { bits: 248 },
                },
            ],
        }
    }

    pub fn params(&self) -> Vec<U256> {
        vec![address_param(self.holder), self.min_total_balance]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zkquery_engine::{execute, Error, EvidenceRecord, QueryWitness, StorageSlotRecord};
    use zkquery_types_base::OutputValue;

    fn balances(circuit: &CrossChainBalance, ethereum: u64, bsc: u64) -> QueryWitness {
        let key =
            utils::struct_field_in_mapping_slot(BALANCE_OF_SLOT, 0, circuit.holder.into_word());
        let slot = |contract: Address, value: u64, block_number: u64| {
            EvidenceRecord::StorageSlot(StorageSlotRecord {
                contract,
                slot_key: key,
                value: U256::from(value),
                block_number,
            })
        };
        QueryWitness::new(
            vec![
                slot(USDC_ETHEREUM, ethereum, 19_400_000),
                slot(USDC_BSC, bsc, 35_800_000),
            ],
            circuit.params(),
        )
    }

    #[test]
    fn balances_sum_across_chains() {
        let circuit = CrossChainBalance {
            holder: address!("f977814e90da44bfa03b6295a0616a897441acec"),
            min_total_balance: U256::from(1_000_000u64),
        };
        let output =
            execute(&circuit.definition(), &balances(&circuit, 700_000, 500_000)).unwrap();
        assert_eq!(
            output.values[3],
            OutputValue::Uint {
                bits: 248,
                value: U256::from(1_200_000u64),
            }
        );
        // Per-chain balances are revealed in declaration order.
        assert_eq!(
            output.values[1],
            OutputValue::Uint {
                bits: 248,
                value: U256::from(700_000u64),
            }
        );
    }

    #[test]
    fn chains_cannot_be_swapped() {
        let circuit = CrossChainBalance {
            holder: address!("f977814e90da44bfa03b6295a0616a897441acec"),
            min_total_balance: U256::ZERO,
        };
        let mut witness = balances(&circuit, 700_000, 500_000);
        witness.records.swap(0, 1);
        assert!(matches!(
            execute(&circuit.definition(), &witness),
            Err(Error::PatternMismatch { slot: 0 })
        ));
    }

    #[test]
    fn shortfall_across_both_chains_fails() {
        let circuit = CrossChainBalance {
            holder: address!("f977814e90da44bfa03b6295a0616a897441acec"),
            min_total_balance: U256::from(2_000_000u64),
        };
        assert!(matches!(
            execute(&circuit.definition(), &balances(&circuit, 700_000, 500_000)),
            Err(Error::ThresholdUnmet { .. })
        ));
    }
}
