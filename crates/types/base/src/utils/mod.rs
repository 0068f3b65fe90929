mod hash;
mod slot;

pub use hash::keccak256;
pub use slot::{mapping_slot_key, struct_field_in_mapping_slot};
