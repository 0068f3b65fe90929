use alloy_primitives::U256;

use crate::{definition::QueryDefinition, error::Error, extract::Scalar};

/// Assert every declared bound against its computed aggregate.
///
/// The canonical direction is `threshold <= observed` (prove "at least this
/// much" without revealing the exact amount); `max` adds the two-sided
/// variant used for bounded ranges. Bounds are compared in the aggregate's
/// own domain, so a signed aggregate reads its bound operands as
/// two's-complement words.
pub fn check_bounds(
    def: &QueryDefinition,
    aggregates: &[Scalar],
    params: &[U256],
) -> Result<(), Error> {
    for spec in &def.bounds {
        let observed = *aggregates.get(spec.aggregate).ok_or_else(|| {
            Error::Definition(format!("bound references aggregate {}", spec.aggregate))
        })?;

        if let Some(min) = &spec.min {
            let bound = Scalar::reinterpret(min.resolve(params)?, observed.is_signed());
            if observed < bound {
                return Err(Error::ThresholdUnmet {
                    observed,
                    bound,
                    side: "at least",
                });
            }
        }
        if let Some(max) = &spec.max {
            let bound = Scalar::reinterpret(max.resolve(params)?, observed.is_signed());
            if observed > bound {
                return Err(Error::ThresholdUnmet {
                    observed,
                    bound,
                    side: "at most",
                });
            }
        }
    }
    Ok(())
}
