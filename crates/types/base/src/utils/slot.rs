use alloy_primitives::{B256, U256};

use super::keccak256;

/// Storage slot key of `mapping(key => value)` declared at `mapping_slot`:
/// `keccak256(key || mapping_slot)`, both padded to 32 bytes.
pub fn mapping_slot_key(mapping_slot: u64, key: B256) -> B256 {
    let mut preimage = [0u8; 64];
    preimage[..32].copy_from_slice(key.as_slice());
    preimage[32..].copy_from_slice(&U256::from(mapping_slot).to_be_bytes::<32>());
    keccak256(preimage)
}

/// Slot key of field `field_offset` in a struct stored as the value of a
/// mapping: the mapping entry's base slot plus the field offset.
pub fn struct_field_in_mapping_slot(mapping_slot: u64, field_offset: u64, key: B256) -> B256 {
    let base = U256::from_be_bytes(mapping_slot_key(mapping_slot, key).0);
    B256::from(base.wrapping_add(U256::from(field_offset)))
}
