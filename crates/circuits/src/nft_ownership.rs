//! Proves ERC-721 ownership from a Transfer log: the `to` topic must equal
//! the claimed owner and the `tokenId` topic the claimed token.

use alloy_primitives::{b256, Address, B256, U256};
use zkquery_engine::{
    address_param, Allocation, BatchPattern, FieldLocation, LogFieldPattern, Operand, OutputSource,
    OutputSpec, QueryDefinition, SlotPattern, ValueMode, ValueRule,
};
use zkquery_types_base::OutputShape;

/// `Transfer(address indexed from, address indexed to, uint256 indexed tokenId)`
const EVENT_TRANSFER: B256 =
    b256!("ddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef");

/// Parameter layout: `[owner, token_id, contract]`.
#[derive(Debug, Clone, Copy)]
pub struct NftOwnership {
    pub contract: Address,
    pub owner: Address,
    pub token_id: U256,
}

impl NftOwnership {
    pub fn definition(&self) -> QueryDefinition {
        let field = |location: FieldLocation, value: ValueRule| {
            SlotPattern::LogField(LogFieldPattern {
                contract: self.contract,
                event_id: EVENT_TRANSFER,
                location,
                value,
            })
        };

        QueryDefinition {
            allocation: Allocation {
                log_fields: 2,
                storage_slots: 0,
            },
            pattern: BatchPattern::conjunctive(vec![
                // `to` is topic 2 and must equal the claimed owner.
                field(
                    FieldLocation::Topic(2),
                    ValueRule::Equals(Operand::Param(0)),
                ),
                // `tokenId` is topic 3 and must equal the claimed token.
                field(
                    FieldLocation::Topic(3),
                    ValueRule::Equals(Operand::Param(1)),
                ),
            ]),
            extract: vec![ValueMode::Address, ValueMode::Unsigned],
            aggregates: vec![],
            bounds: vec![],
            outputs: vec![
                OutputSpec {
                    source: OutputSource::Param(0),
                    shape: OutputShape::Address,
                },
                OutputSpec {
                    source: OutputSource::Param(2),
                    shape: OutputShape::Address,
                },
                OutputSpec {
                    source: OutputSource::Param(1),
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
        vec![
            address_param(self.owner),
            self.token_id,
            address_param(self.contract),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;
    use zkquery_engine::{execute, Error, EvidenceRecord, LogFieldRecord, QueryWitness};
    use zkquery_types_base::OutputValue;

    const BAYC: Address = address!("BC4CA0EdA7647A8aB7C2061c2E118A18a936f13D");

    fn transfer_topic(contract: Address, index: u8, value: U256) -> EvidenceRecord {
        EvidenceRecord::LogField(LogFieldRecord {
            contract,
            event_id: EVENT_TRANSFER,
            location: FieldLocation::Topic(index),
            value,
            block_number: 17_250_000,
        })
    }

    #[test]
    fn matching_transfer_proves_ownership() {
        let circuit = NftOwnership {
            contract: BAYC,
            owner: address!("f977814e90da44bfa03b6295a0616a897441acec"),
            token_id: U256::from(8817u64),
        };
        let witness = QueryWitness::new(
            vec![
                transfer_topic(BAYC, 2, address_param(circuit.owner)),
                transfer_topic(BAYC, 3, circuit.token_id),
            ],
            circuit.params(),
        );

        let output = execute(&circuit.definition(), &witness).unwrap();
        assert_eq!(output.values[0], OutputValue::Address(circuit.owner));
        assert_eq!(output.values[1], OutputValue::Address(BAYC));
        assert_eq!(
            output.values[3],
            OutputValue::Uint {
                bits: 64,
                value: U256::from(17_250_000u64),
            }
        );
    }

    #[test]
    fn transfer_to_someone_else_fails() {
        let circuit = NftOwnership {
            contract: BAYC,
            owner: address!("f977814e90da44bfa03b6295a0616a897441acec"),
            token_id: U256::from(8817u64),
        };
        let other = address!("28C6c06298d514Db089934071355E5743bf21d60");
        let witness = QueryWitness::new(
            vec![
                transfer_topic(BAYC, 2, address_param(other)),
                transfer_topic(BAYC, 3, circuit.token_id),
            ],
            circuit.params(),
        );
        assert!(matches!(
            execute(&circuit.definition(), &witness),
            Err(Error::PatternMismatch { slot: 0 })
        ));
    }

    #[test]
    fn wrong_collection_fails() {
        let circuit = NftOwnership {
            contract: BAYC,
            owner: address!("f977814e90da44bfa03b6295a0616a897441acec"),
            token_id: U256::from(8817u64),
        };
        let impostor = address!("60E4d786628Fea6478F785A6d7e704777c86a7c6");
        let witness = QueryWitness::new(
            vec![
                transfer_topic(impostor, 2, address_param(circuit.owner)),
                transfer_topic(impostor, 3, circuit.token_id),
            ],
            circuit.params(),
        );
        assert!(matches!(
            execute(&circuit.definition(), &witness),
            Err(Error::PatternMismatch { slot: 0 })
        ));
    }
}
