//! Domain invariants for devis pricing
//!
//! Executable checks used by the test suite to validate every breakdown
//! the aggregator produces.

use super::entities::{Devis, PricingBreakdown};
use super::value_objects::Scope;
use rust_decimal::Decimal;

/// INVARIANT-1: Additive totals.
/// Each partie total is the sum of its adjusted sous-partie totals plus its
/// own special-line deltas, and the global total is the sum of the partie
/// totals plus the global special-line deltas.
pub fn invariant_additive_totals(devis: &Devis, breakdown: &PricingBreakdown) -> bool {
    let mut global = Decimal::ZERO;

    for partie in &devis.parties {
        let Some(partie_total) = breakdown.partie_total(partie.id) else {
            return false;
        };

        let mut expected = Decimal::ZERO;
        for sp in &partie.sous_parties {
            let Some(sp_total) = breakdown.sous_partie_total(sp.id) else {
                return false;
            };
            expected += sp_total;
        }
        for line in devis.special_lines_at(Scope::Partie(partie.id)) {
            let Some(delta) = breakdown.delta_for(line.id) else {
                return false;
            };
            expected += delta;
        }

        if partie_total != expected {
            return false;
        }
        global += partie_total;
    }

    for line in devis.special_lines_at(Scope::Global) {
        let Some(delta) = breakdown.delta_for(line.id) else {
            return false;
        };
        global += delta;
    }

    breakdown.global == global
}

/// INVARIANT-2: Full resolution.
/// Every committed special line has a resolved delta, and display lines
/// resolve to exactly zero.
pub fn invariant_resolved_deltas_cover_special_lines(
    devis: &Devis,
    breakdown: &PricingBreakdown,
) -> bool {
    if breakdown.resolved_special_lines.len() != devis.special_lines.len() {
        return false;
    }
    devis.special_lines.iter().all(|line| {
        match breakdown.delta_for(line.id) {
            Some(delta) if line.is_display() => delta == Decimal::ZERO,
            Some(_) => true,
            None => false,
        }
    })
}

/// INVARIANT-3: Display neutrality.
/// Stripping every display line from a devis must leave all totals
/// unchanged. Callers compute both breakdowns and pass them in.
pub fn invariant_display_lines_neutral(
    with_display: &PricingBreakdown,
    without_display: &PricingBreakdown,
) -> bool {
    with_display.global == without_display.global
        && with_display.per_partie == without_display.per_partie
        && with_display.per_sous_partie == without_display.per_sous_partie
}
