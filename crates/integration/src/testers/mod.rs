//! Record builders and preset testers used across the integration suites.

use alloy_primitives::{address, Address, B256, I256, U256};
use zkquery_circuits::{
    cross_chain_balance::CrossChainBalance, oracle_twap::OracleTwap, token_holder::TokenHolder,
};
use zkquery_engine::{QueryDefinition, QueryWitness};
use zkquery_types_base::{
    utils, EvidenceRecord, FieldLocation, LogFieldRecord, StorageSlotRecord,
};

use crate::QueryTester;

/// Exchange-style hot wallet reused as the proven address across testers.
pub const HOLDER: Address = address!("f977814e90da44bfa03b6295a0616a897441acec");

/// A log-field record with the given provenance tags.
pub fn log_field(
    contract: Address,
    event_id: B256,
    location: FieldLocation,
    value: U256,
    block_number: u64,
) -> EvidenceRecord {
    EvidenceRecord::LogField(LogFieldRecord {
        contract,
        event_id,
        location,
        value,
        block_number,
    })
}

/// A storage-slot record with the given provenance tags.
pub fn storage_slot(
    contract: Address,
    slot_key: B256,
    value: U256,
    block_number: u64,
) -> EvidenceRecord {
    EvidenceRecord::StorageSlot(StorageSlotRecord {
        contract,
        slot_key,
        value,
        block_number,
    })
}

/// The single-slot USDC balance proof: 150 USDC against a 100 USDC floor.
pub struct BalanceTester;

impl BalanceTester {
    pub const USDC: Address = address!("A0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48");
    pub const BALANCE: u64 = 150_000_000;
    pub const BLOCK: u64 = 19_500_000;

    fn circuit() -> TokenHolder {
        TokenHolder { holder: HOLDER }
    }
}

impl QueryTester for BalanceTester {
    const NAME: &str = "token-holder";

    fn definition() -> QueryDefinition {
        Self::circuit().definition()
    }

    fn witness() -> QueryWitness {
        let key = utils::struct_field_in_mapping_slot(9, 0, HOLDER.into_word());
        QueryWitness::new(
            vec![storage_slot(
                Self::USDC,
                key,
                U256::from(Self::BALANCE),
                Self::BLOCK,
            )],
            Self::circuit().params(),
        )
    }
}

/// The two-chain USDC balance proof.
pub struct CrossChainTester;

impl CrossChainTester {
    const USDC_ETHEREUM: Address = address!("A0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48");
    const USDC_BSC: Address = address!("8AC76a51cc950d9822D68b83fE1Ad97B32Cd580d");

    fn circuit() -> CrossChainBalance {
        CrossChainBalance {
            holder: HOLDER,
            min_total_balance: U256::from(1_000_000u64),
        }
    }
}

impl QueryTester for CrossChainTester {
    const NAME: &str = "cross-chain-balance";

    fn definition() -> QueryDefinition {
        Self::circuit().definition()
    }

    fn witness() -> QueryWitness {
        let key = utils::struct_field_in_mapping_slot(9, 0, HOLDER.into_word());
        QueryWitness::new(
            vec![
                storage_slot(
                    Self::USDC_ETHEREUM,
                    key,
                    U256::from(900_000u64),
                    19_400_000,
                ),
                storage_slot(Self::USDC_BSC, key, U256::from(400_000u64), 35_800_000),
            ],
            Self::circuit().params(),
        )
    }
}

/// The signed tick-cumulative range proof.
pub struct TwapTester;

impl TwapTester {
    const POOL: Address = address!("88e6A0c2dDD26FEEb64F039a2c41296FcB3f5640");

    fn circuit() -> OracleTwap {
        OracleTwap {
            pool: Self::POOL,
            min_delta: I256::try_from(-10_000i64).expect("fits"),
            max_delta: I256::try_from(10_000i64).expect("fits"),
        }
    }
}

impl QueryTester for TwapTester {
    const NAME: &str = "oracle-twap";

    fn definition() -> QueryDefinition {
        Self::circuit().definition()
    }

    fn witness() -> QueryWitness {
        let tick = |value: i64| I256::try_from(value).expect("fits").into_raw();
        QueryWitness::new(
            vec![
                storage_slot(Self::POOL, B256::from(U256::from(8u8)), tick(50_000), 19_200_000),
                storage_slot(Self::POOL, B256::from(U256::from(9u8)), tick(43_000), 19_200_300),
            ],
            Self::circuit().params(),
        )
    }
}
