use alloy_primitives::{Address, B256, U256};
use zkquery_types_base::{EvidenceRecord, FieldLocation};

use crate::{definition::Operand, error::Error};

/// Equality rule on a record's 256-bit value. `Any` leaves the value
/// unconstrained at match time; extraction and aggregation still see it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub enum ValueRule {
    Any,
    Equals(Operand),
}

impl ValueRule {
    fn holds(&self, value: U256, params: &[U256]) -> Result<bool, Error> {
        match self {
            ValueRule::Any => Ok(true),
            ValueRule::Equals(operand) => Ok(value == operand.resolve(params)?),
        }
    }
}

/// Expected provenance for a log-field slot.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct LogFieldPattern {
    /// The contract expected to have emitted the log.
    pub contract: Address,
    /// Expected event signature hash.
    pub event_id: B256,
    /// Expected topic/data position of the field.
    pub location: FieldLocation,
    pub value: ValueRule,
}

/// Expected provenance for a storage-slot slot. The expected key is
/// recomputed from the contract's storage layout by the query definition,
/// outside this engine.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct StorageSlotPattern {
    /// The contract expected to own the storage.
    pub contract: Address,
    /// Expected slot key.
    pub slot_key: B256,
    pub value: ValueRule,
}

/// Pattern for one batch slot.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub enum SlotPattern {
    LogField(LogFieldPattern),
    StorageSlot(StorageSlotPattern),
}

impl SlotPattern {
    pub fn is_log_field(&self) -> bool {
        matches!(self, SlotPattern::LogField(_))
    }
}

/// One branch of an OR rule: the designated slot and the sub-pattern its
/// record must satisfy.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct Branch {
    pub slot: usize,
    pub pattern: SlotPattern,
}

/// First-class OR combinator over two otherwise-independent sub-patterns on
/// two designated slots: the record at either slot must match its branch.
/// This is the one disjunctive construct in the pattern language
/// (sender-or-recipient matching); everything else combines conjunctively.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct EitherRule {
    pub left: Branch,
    pub right: Branch,
}

/// The full per-slot pattern assignment for a batch: one pattern per
/// declared slot, plus any OR rules layered on top.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct BatchPattern {
    pub slots: Vec<SlotPattern>,
    pub either: Vec<EitherRule>,
}

impl BatchPattern {
    /// A purely conjunctive pattern, the common case.
    pub fn conjunctive(slots: Vec<SlotPattern>) -> Self {
        Self {
            slots,
            either: Vec::new(),
        }
    }
}

/// Pure predicate: does `record` match `pattern`?
///
/// Evaluation is field-by-field equality (kind, contract, selector,
/// location) combined with logical AND; no partial credit. Errors surface
/// only from operand resolution, never from the record itself.
pub fn matches(
    record: &EvidenceRecord,
    pattern: &SlotPattern,
    params: &[U256],
) -> Result<bool, Error> {
    match (record, pattern) {
        (EvidenceRecord::LogField(record), SlotPattern::LogField(pattern)) => {
            Ok(record.contract == pattern.contract
                && record.event_id == pattern.event_id
                && record.location == pattern.location
                && pattern.value.holds(record.value, params)?)
        }
        (EvidenceRecord::StorageSlot(record), SlotPattern::StorageSlot(pattern)) => {
            Ok(record.contract == pattern.contract
                && record.slot_key == pattern.slot_key
                && pattern.value.holds(record.value, params)?)
        }
        // A record of the wrong kind can never match.
        _ => Ok(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{address, b256};
    use zkquery_types_base::LogFieldRecord;

    const PAIR: Address = address!("397FF1542f962076d0BFE58eA045FfA2d347ACa0");
    const SWAP: B256 = b256!("d78ad95fa46c994b6551d0da85fc275fe613ce37657fb8d5e3d130840159d822");

    fn swap_field(location: FieldLocation, value: u64) -> EvidenceRecord {
        EvidenceRecord::LogField(LogFieldRecord {
            contract: PAIR,
            event_id: SWAP,
            location,
            value: U256::from(value),
            block_number: 19_000_000,
        })
    }

    fn swap_pattern(location: FieldLocation) -> SlotPattern {
        SlotPattern::LogField(LogFieldPattern {
            contract: PAIR,
            event_id: SWAP,
            location,
            value: ValueRule::Any,
        })
    }

    #[test]
    fn exact_provenance_matches() {
        let record = swap_field(FieldLocation::Data(1), 1_000);
        let pattern = swap_pattern(FieldLocation::Data(1));
        assert!(matches(&record, &pattern, &[]).unwrap());
    }

    #[test]
    fn any_single_field_mismatch_fails() {
        let record = swap_field(FieldLocation::Data(1), 1_000);

        let mut wrong_contract = swap_pattern(FieldLocation::Data(1));
        if let SlotPattern::LogField(p) = &mut wrong_contract {
            p.contract = address!("C02aaA39b223FE8D0A3e5C4F27eAD9083C756Cc2");
        }
        assert!(!matches(&record, &wrong_contract, &[]).unwrap());

        let mut wrong_event = swap_pattern(FieldLocation::Data(1));
        if let SlotPattern::LogField(p) = &mut wrong_event {
            p.event_id = b256!("2b627736bca15cd5381dcf80b0bf11fd197d01a037c52b927a881a10fb73ba61");
        }
        assert!(!matches(&record, &wrong_event, &[]).unwrap());

        // Same index, wrong section: a data field is not a topic.
        assert!(!matches(&record, &swap_pattern(FieldLocation::Topic(1)), &[]).unwrap());
        // Same section, wrong index.
        assert!(!matches(&record, &swap_pattern(FieldLocation::Data(2)), &[]).unwrap());
    }

    #[test]
    fn value_rule_resolves_against_params() {
        let user = U256::from(0xabcdu64);
        let record = swap_field(FieldLocation::Topic(1), 0xabcd);
        let pattern = SlotPattern::LogField(LogFieldPattern {
            contract: PAIR,
            event_id: SWAP,
            location: FieldLocation::Topic(1),
            value: ValueRule::Equals(Operand::Param(0)),
        });
        assert!(matches(&record, &pattern, &[user]).unwrap());
        assert!(!matches(&record, &pattern, &[U256::from(1u8)]).unwrap());
        // Missing parameter is a definition error, not a mismatch.
        assert!(matches(&record, &pattern, &[]).is_err());
    }

    #[test]
    fn kind_mismatch_never_matches() {
        let record = swap_field(FieldLocation::Data(1), 7);
        let pattern = SlotPattern::StorageSlot(StorageSlotPattern {
            contract: PAIR,
            slot_key: B256::ZERO,
            value: ValueRule::Any,
        });
        assert!(!matches(&record, &pattern, &[]).unwrap());
    }
}
