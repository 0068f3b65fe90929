use std::cmp::Ordering;
use std::fmt;

use alloy_primitives::{I256, U256};
use zkquery_types_base::EvidenceRecord;

use crate::{definition::ValueMode, error::Error};

/// Largest value representable in the engine's unsigned 248-bit domain.
pub fn uint248_max() -> U256 {
    (U256::ONE << 248usize) - U256::ONE
}

/// Exclusive magnitude bound of the signed 248-bit domain: `2^247`.
fn int248_bound() -> I256 {
    I256::ONE << 247usize
}

/// A scalar extracted from a record, in the engine's width-bounded numeric
/// domain. Unsigned and signed values never mix inside one aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scalar {
    Uint(U256),
    Int(I256),
}

impl Scalar {
    pub fn is_signed(&self) -> bool {
        matches!(self, Scalar::Int(_))
    }

    /// Additive identity of the given signedness.
    pub fn zero(signed: bool) -> Self {
        if signed {
            Scalar::Int(I256::ZERO)
        } else {
            Scalar::Uint(U256::ZERO)
        }
    }

    /// Reinterpret a raw 256-bit word in the given signedness, without a
    /// domain check. Used for caller-supplied bounds, which are compared in
    /// the aggregate's own domain.
    pub fn reinterpret(raw: U256, signed: bool) -> Self {
        if signed {
            Scalar::Int(I256::from_raw(raw))
        } else {
            Scalar::Uint(raw)
        }
    }

    /// Width-checked addition; exceeding the 248-bit domain is an overflow,
    /// never a wrap.
    pub fn checked_add(self, other: Scalar) -> Result<Scalar, Error> {
        match (self, other) {
            (Scalar::Uint(a), Scalar::Uint(b)) => {
                let sum = a
                    .checked_add(b)
                    .filter(|sum| *sum <= uint248_max())
                    .ok_or_else(|| Error::Overflow {
                        context: format!("sum {a} + {b} exceeds the 248-bit domain"),
                    })?;
                Ok(Scalar::Uint(sum))
            }
            (Scalar::Int(a), Scalar::Int(b)) => {
                let sum = a
                    .checked_add(b)
                    .filter(|sum| in_int248(*sum))
                    .ok_or_else(|| Error::Overflow {
                        context: format!("sum {a} + {b} exceeds the signed 248-bit domain"),
                    })?;
                Ok(Scalar::Int(sum))
            }
            _ => Err(Error::Definition(
                "cannot add signed and unsigned scalars".into(),
            )),
        }
    }

    /// Width-checked subtraction. An unsigned difference that would go
    /// negative is unrepresentable and reported as overflow.
    pub fn checked_sub(self, other: Scalar) -> Result<Scalar, Error> {
        match (self, other) {
            (Scalar::Uint(a), Scalar::Uint(b)) => {
                let diff = a.checked_sub(b).ok_or_else(|| Error::Overflow {
                    context: format!("difference {a} - {b} is negative in the unsigned domain"),
                })?;
                Ok(Scalar::Uint(diff))
            }
            (Scalar::Int(a), Scalar::Int(b)) => {
                let diff = a
                    .checked_sub(b)
                    .filter(|diff| in_int248(*diff))
                    .ok_or_else(|| Error::Overflow {
                        context: format!("difference {a} - {b} exceeds the signed 248-bit domain"),
                    })?;
                Ok(Scalar::Int(diff))
            }
            _ => Err(Error::Definition(
                "cannot subtract signed and unsigned scalars".into(),
            )),
        }
    }
}

fn in_int248(value: I256) -> bool {
    value >= -int248_bound() && value < int248_bound()
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Uint(value) => write!(f, "{value}"),
            Scalar::Int(value) => write!(f, "{value}"),
        }
    }
}

impl PartialOrd for Scalar {
    /// Ordering is defined within one signedness only.
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Scalar::Uint(a), Scalar::Uint(b)) => Some(a.cmp(b)),
            (Scalar::Int(a), Scalar::Int(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

/// Project a validated record to a scalar. Pure, O(1), no re-validation of
/// pattern membership.
pub fn extract(record: &EvidenceRecord, mode: ValueMode, slot: usize) -> Result<Scalar, Error> {
    let raw = record.value();
    match mode {
        ValueMode::Unsigned => {
            if raw > uint248_max() {
                return Err(Error::Overflow {
                    context: format!("slot {slot} value {raw} exceeds the 248-bit domain"),
                });
            }
            Ok(Scalar::Uint(raw))
        }
        ValueMode::Signed => {
            let value = I256::from_raw(raw);
            if !in_int248(value) {
                return Err(Error::Overflow {
                    context: format!("slot {slot} value {value} exceeds the signed 248-bit domain"),
                });
            }
            Ok(Scalar::Int(value))
        }
        ValueMode::Address => {
            if raw >= (U256::ONE << 160usize) {
                return Err(Error::Overflow {
                    context: format!("slot {slot} value {raw} does not fit an address"),
                });
            }
            Ok(Scalar::Uint(raw))
        }
    }
}

/// Indexed access to a single batch element, first-class.
pub fn extract_at(
    records: &[EvidenceRecord],
    modes: &[ValueMode],
    slot: usize,
) -> Result<Scalar, Error> {
    let record = records
        .get(slot)
        .ok_or_else(|| Error::Definition(format!("slot index {slot} out of range")))?;
    let mode = modes
        .get(slot)
        .copied()
        .ok_or_else(|| Error::Definition(format!("no extraction mode for slot {slot}")))?;
    extract(record, mode, slot)
}
