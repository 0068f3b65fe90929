pub mod evidence;
pub mod output;
pub mod utils;
pub mod witness;

pub use evidence::{EvidenceRecord, FieldLocation, LogFieldRecord, StorageSlotRecord};
pub use output::{OutputError, OutputShape, OutputValue};
pub use witness::QueryWitness;
