//! Preset query definitions, one module per protocol.
//!
//! Every preset is pure configuration: a constructor from invocation
//! parameters to a [`zkquery_engine::QueryDefinition`] plus the parameter
//! words the witness must carry. Protocol constants (contract addresses,
//! event signature hashes, storage layouts) live here as module-level
//! constants; none of them leak into the engine.

pub mod cross_chain_balance;
pub mod lending_supply;
pub mod nft_ownership;
pub mod oracle_twap;
pub mod swap_volume;
pub mod token_holder;
