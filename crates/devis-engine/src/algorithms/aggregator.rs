//! Total aggregator: single deterministic bottom-up pass
//!
//! Evaluation order is fixed and terminating: Ligne → SousPartie
//! (subtotal, then its own special lines in committed order) → Partie
//! (ditto) → Global (ditto). Percentage lines resolve their base through
//! `base_resolver`, which may recurse back into these functions for
//! sibling and descendant scopes; the evaluation stack in `EvalContext`
//! turns any circular chain into `CycleDetected`.
//!
//! Any fatal error aborts the whole computation: a devis must never
//! display a total computed from only some of its adjustments.

use crate::algorithms::{base_resolver, cycle_guard::EvalContext, evaluator};
use crate::config::PricingConfig;
use crate::domain::entities::{Devis, Partie, PricingBreakdown, SousPartie, SpecialLine};
use crate::domain::errors::PricingError;
use crate::domain::value_objects::{Scope, ValueKind};
use rust_decimal::Decimal;
use std::collections::HashMap;

/// Compute every total of the devis from scratch.
///
/// Pure function of the snapshot: the same immutable tree always yields a
/// bit-identical breakdown, and nothing is cached across calls.
pub fn compute_totals(
    devis: &Devis,
    config: &PricingConfig,
) -> Result<PricingBreakdown, PricingError> {
    check_scopes(devis)?;

    let mut ctx = EvalContext::new();
    let mut per_partie = HashMap::new();
    let mut per_sous_partie = HashMap::new();
    let mut resolved = HashMap::new();
    let mut global = Decimal::ZERO;

    for partie in &devis.parties {
        let mut partie_total = Decimal::ZERO;

        for sp in &partie.sous_parties {
            let mut sp_total = sous_partie_pre(sp, config);
            for line in devis.special_lines_at(Scope::SousPartie(sp.id)) {
                let delta = line_delta(devis, line, config, &mut ctx)?;
                resolved.insert(line.id, delta);
                sp_total += delta;
            }
            per_sous_partie.insert(sp.id, sp_total);
            partie_total += sp_total;
        }

        for line in devis.special_lines_at(Scope::Partie(partie.id)) {
            let delta = line_delta(devis, line, config, &mut ctx)?;
            resolved.insert(line.id, delta);
            partie_total += delta;
        }

        per_partie.insert(partie.id, partie_total);
        global += partie_total;
    }

    for line in devis.special_lines_at(Scope::Global) {
        let delta = line_delta(devis, line, config, &mut ctx)?;
        resolved.insert(line.id, delta);
        global += delta;
    }

    Ok(PricingBreakdown {
        global,
        per_partie,
        per_sous_partie,
        resolved_special_lines: resolved,
    })
}

/// A special line attached to a scope that is no longer in the tree would
/// otherwise silently drop out of the totals.
fn check_scopes(devis: &Devis) -> Result<(), PricingError> {
    for line in &devis.special_lines {
        let known = match line.scope {
            Scope::Global => true,
            Scope::Partie(id) => devis.find_partie(id).is_some(),
            Scope::SousPartie(id) => devis.find_sous_partie(id).is_some(),
        };
        if !known {
            return Err(PricingError::ScopeNotFound {
                line: line.id,
                description: line.description.clone(),
                scope: line.scope,
            });
        }
    }
    Ok(())
}

/// Sum of ligne amounts, each rounded to the configured scale.
pub(crate) fn sous_partie_pre(sp: &SousPartie, config: &PricingConfig) -> Decimal {
    sp.ligne_details
        .iter()
        .map(|l| evaluator::round_amount(l.amount(), config.rounding_dp))
        .sum()
}

/// Sous-partie subtotal with its own special lines applied.
pub(crate) fn adjusted_sous_partie(
    devis: &Devis,
    sp: &SousPartie,
    config: &PricingConfig,
    ctx: &mut EvalContext,
) -> Result<Decimal, PricingError> {
    let mut total = sous_partie_pre(sp, config);
    for line in devis.special_lines_at(Scope::SousPartie(sp.id)) {
        if ctx.is_excluded(line.id) {
            continue;
        }
        total += line_delta(devis, line, config, ctx)?;
    }
    Ok(total)
}

/// Partie subtotal before its own special lines: the sum of its adjusted
/// sous-partie subtotals.
pub(crate) fn partie_pre_adjustment(
    devis: &Devis,
    partie: &Partie,
    config: &PricingConfig,
    ctx: &mut EvalContext,
) -> Result<Decimal, PricingError> {
    let mut total = Decimal::ZERO;
    for sp in &partie.sous_parties {
        total += adjusted_sous_partie(devis, sp, config, ctx)?;
    }
    Ok(total)
}

/// Partie subtotal with its own special lines applied.
pub(crate) fn adjusted_partie(
    devis: &Devis,
    partie: &Partie,
    config: &PricingConfig,
    ctx: &mut EvalContext,
) -> Result<Decimal, PricingError> {
    let mut total = partie_pre_adjustment(devis, partie, config, ctx)?;
    for line in devis.special_lines_at(Scope::Partie(partie.id)) {
        if ctx.is_excluded(line.id) {
            continue;
        }
        total += line_delta(devis, line, config, ctx)?;
    }
    Ok(total)
}

/// Global total before global special lines: the sum of adjusted partie
/// subtotals.
pub(crate) fn global_pre_adjustment(
    devis: &Devis,
    config: &PricingConfig,
    ctx: &mut EvalContext,
) -> Result<Decimal, PricingError> {
    let mut total = Decimal::ZERO;
    for partie in &devis.parties {
        total += adjusted_partie(devis, partie, config, ctx)?;
    }
    Ok(total)
}

/// Evaluate one special line under the cycle guard.
pub(crate) fn line_delta(
    devis: &Devis,
    line: &SpecialLine,
    config: &PricingConfig,
    ctx: &mut EvalContext,
) -> Result<Decimal, PricingError> {
    if line.is_display() {
        return Ok(Decimal::ZERO);
    }

    ctx.enter(line)?;
    let result = resolved_delta(devis, line, config, ctx);
    ctx.exit(line.id);
    result
}

fn resolved_delta(
    devis: &Devis,
    line: &SpecialLine,
    config: &PricingConfig,
    ctx: &mut EvalContext,
) -> Result<Decimal, PricingError> {
    let base = match line.value_kind {
        ValueKind::Percentage => Some(base_resolver::resolve(devis, line, config, ctx)?),
        ValueKind::Fixed => None,
    };
    evaluator::signed_delta(line, base, config.rounding_dp)
}
