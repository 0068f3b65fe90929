use itertools::Itertools;
use zkquery_types_base::QueryWitness;

use crate::{
    definition::QueryDefinition,
    error::Error,
    pattern::{matches, Branch},
};

/// Assert that every record in the batch matches the pattern assigned to its
/// slot.
///
/// All-or-fail: the first non-matching record aborts the whole batch. There
/// is no per-record filtering and no silent exclusion; permitting either
/// would let a prover cherry-pick favorable evidence while still passing
/// aggregate thresholds.
pub fn validate(def: &QueryDefinition, witness: &QueryWitness) -> Result<(), Error> {
    check_capacity(def, witness)?;

    for (slot, (record, pattern)) in witness
        .records
        .iter()
        .zip_eq(def.pattern.slots.iter())
        .enumerate()
    {
        if !matches(record, pattern, &witness.params)? {
            return Err(Error::PatternMismatch { slot });
        }
    }

    for rule in &def.pattern.either {
        if !branch_matches(&rule.left, witness)? && !branch_matches(&rule.right, witness)? {
            return Err(Error::PatternMismatch {
                slot: rule.left.slot,
            });
        }
    }

    Ok(())
}

fn branch_matches(branch: &Branch, witness: &QueryWitness) -> Result<bool, Error> {
    let record = witness.records.get(branch.slot).ok_or_else(|| {
        Error::Definition(format!("either-rule slot {} out of range", branch.slot))
    })?;
    matches(record, &branch.pattern, &witness.params)
}

/// Capacity is exact, per kind and in total. Supplying fewer records than
/// declared is as invalid as supplying more.
fn check_capacity(def: &QueryDefinition, witness: &QueryWitness) -> Result<(), Error> {
    let supplied_logs = witness
        .records
        .iter()
        .filter(|r| r.is_log_field())
        .count();
    let supplied_slots = witness.records.len() - supplied_logs;

    if supplied_logs != def.allocation.log_fields {
        return Err(Error::CapacityMismatch {
            kind: "log-field",
            declared: def.allocation.log_fields,
            supplied: supplied_logs,
        });
    }
    if supplied_slots != def.allocation.storage_slots {
        return Err(Error::CapacityMismatch {
            kind: "storage-slot",
            declared: def.allocation.storage_slots,
            supplied: supplied_slots,
        });
    }
    debug_assert_eq!(witness.records.len(), def.capacity());
    Ok(())
}
