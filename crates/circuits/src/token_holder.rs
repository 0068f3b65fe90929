//! Proves that an address holds at least a minimum USDC balance, from a
//! single `balanceOf` storage slot.

use alloy_primitives::{address, Address, U256};
use zkquery_engine::{
    address_param, AggregateOp, AggregateSpec, Allocation, BatchPattern, BoundSpec, Operand,
    OutputSource, OutputSpec, QueryDefinition, SlotPattern, SlotSelection, StorageSlotPattern,
    ValueMode, ValueRule,
};
use zkquery_types_base::{utils, OutputShape};

/// USDC token address on Ethereum mainnet.
const USDC_TOKEN: Address = address!("A0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48");

/// `mapping(address => uint256) balanceOf` sits at slot 9 in the USDC
/// token contract.
const BALANCE_OF_SLOT: u64 = 9;

/// Minimum balance threshold: 100 USDC at 6 decimals.
const MINIMUM_BALANCE: u64 = 100_000_000;

/// Parameter layout: `[holder]`.
#[derive(Debug, Clone, Copy)]
pub struct TokenHolder {
    pub holder: Address,
}

impl TokenHolder {
    pub fn definition(&self) -> QueryDefinition {
        let balance_slot =
            utils::struct_field_in_mapping_slot(BALANCE_OF_SLOT, 0, self.holder.into_word());

        QueryDefinition {
            allocation: Allocation {
                log_fields: 0,
                storage_slots: 1,
            },
            pattern: BatchPattern::conjunctive(vec![SlotPattern::StorageSlot(
                StorageSlotPattern {
                    contract: USDC_TOKEN,
                    slot_key: balance_slot,
                    value: ValueRule::Any,
                },
            )]),
            extract: vec![ValueMode::Unsigned],
            aggregates: vec![AggregateSpec {
                op: AggregateOp::Sum,
                over: SlotSelection::All,
            }],
            bounds: vec![BoundSpec {
                aggregate: 0,
                min: Some(Operand::Const(U256::from(MINIMUM_BALANCE))),
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
                    source: OutputSource::BlockNumber(0),
                    shape: OutputShape::Uint { bits: 64 },
                },
            ],
        }
    }

    pub fn params(&self) -> Vec<U256> {
        vec![address_param(self.holder)]
    }
}
