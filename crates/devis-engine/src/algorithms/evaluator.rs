//! Special-line evaluator
//!
//! Turns one special line plus its resolved base (for percentage lines)
//! into a signed monetary delta. Placement is orthogonal and handled in
//! `placement`; this module never looks at it.

use crate::domain::entities::SpecialLine;
use crate::domain::errors::PricingError;
use crate::domain::value_objects::{SpecialLineKind, ValueKind};
use rust_decimal::{Decimal, RoundingStrategy};

/// Round to the configured scale with the commercial midpoint rule.
pub(crate) fn round_amount(amount: Decimal, dp: u32) -> Decimal {
    amount.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

/// Compute the signed delta a special line contributes to its scope.
///
/// `resolved_base` must be `Some` for percentage lines; fixed and display
/// lines ignore it. Percentage values outside `[0, 100]` are rejected,
/// never clamped: clamping would misrepresent the quote.
pub fn signed_delta(
    line: &SpecialLine,
    resolved_base: Option<Decimal>,
    rounding_dp: u32,
) -> Result<Decimal, PricingError> {
    if line.kind == SpecialLineKind::Display {
        return Ok(Decimal::ZERO);
    }

    let magnitude = match line.value_kind {
        ValueKind::Fixed => line.value,
        ValueKind::Percentage => {
            if line.value < Decimal::ZERO || line.value > Decimal::ONE_HUNDRED {
                return Err(PricingError::InvalidPercentage {
                    line: line.id,
                    description: line.description.clone(),
                    value: line.value,
                });
            }
            let base = resolved_base.ok_or_else(|| PricingError::MissingBaseRef {
                line: line.id,
                description: line.description.clone(),
            })?;
            base * line.value / Decimal::ONE_HUNDRED
        }
    };

    let magnitude = round_amount(magnitude, rounding_dp);
    Ok(match line.kind {
        SpecialLineKind::Addition => magnitude,
        SpecialLineKind::Reduction => -magnitude,
        SpecialLineKind::Display => Decimal::ZERO,
    })
}
