//! Base resolver: symbolic reference → live amount
//!
//! Resolves a `BaseReference` against the current tree, never against a
//! stored amount. Targets evaluated strictly before the declaring scope
//! (lignes, descendant and sibling scopes) resolve to their fully adjusted
//! totals. An ancestor target resolves to its pre-adjustment total with
//! the referencing line excluded, since the ancestor's own special lines
//! are applied strictly later. A same-scope target is always a cycle.

use crate::algorithms::aggregator;
use crate::algorithms::cycle_guard::{is_same_scope_reference, EvalContext};
use crate::algorithms::evaluator::round_amount;
use crate::config::PricingConfig;
use crate::domain::entities::{Devis, SpecialLine};
use crate::domain::errors::PricingError;
use crate::domain::value_objects::{BaseTarget, Scope};
use rust_decimal::Decimal;

/// Resolve the base reference of a percentage special line.
///
/// The caller must already have pushed `line` onto the evaluation stack;
/// any re-entry further down the chain surfaces as `CycleDetected`.
pub fn resolve(
    devis: &Devis,
    line: &SpecialLine,
    config: &PricingConfig,
    ctx: &mut EvalContext,
) -> Result<Decimal, PricingError> {
    let base_ref = line.base_ref.as_ref().ok_or_else(|| PricingError::MissingBaseRef {
        line: line.id,
        description: line.description.clone(),
    })?;

    if is_same_scope_reference(line) {
        return Err(PricingError::CycleDetected {
            line: line.id,
            description: line.description.clone(),
        });
    }

    let not_found = || PricingError::TargetNotFound {
        line: line.id,
        description: line.description.clone(),
        label: base_ref.label.clone(),
    };

    match base_ref.target {
        // Lignes have no children and no special lines: the amount is
        // final as soon as the tree is loaded.
        BaseTarget::Ligne(id) => {
            let ligne = devis.find_ligne(id).ok_or_else(not_found)?;
            Ok(round_amount(ligne.amount(), config.rounding_dp))
        }

        BaseTarget::SousPartie(id) => {
            let sp = devis.find_sous_partie(id).ok_or_else(not_found)?;
            aggregator::adjusted_sous_partie(devis, sp, config, ctx)
        }

        BaseTarget::Partie(id) => {
            let partie = devis.find_partie(id).ok_or_else(not_found)?;
            if is_enclosing_partie(devis, line.scope, id) {
                // Ancestor: its own special lines are evaluated after the
                // current scope, so the base is the pre-adjustment total
                // with the referencing line left out.
                let mut forked = ctx.child_excluding(line.id);
                aggregator::partie_pre_adjustment(devis, partie, config, &mut forked)
            } else {
                aggregator::adjusted_partie(devis, partie, config, ctx)
            }
        }

        // Global is an ancestor of every attachable scope; a global-scoped
        // line referencing it was rejected above as a same-scope cycle.
        BaseTarget::Global => {
            let mut forked = ctx.child_excluding(line.id);
            aggregator::global_pre_adjustment(devis, config, &mut forked)
        }
    }
}

/// Is `partie_id` the partie enclosing the given scope?
fn is_enclosing_partie(devis: &Devis, scope: Scope, partie_id: crate::domain::value_objects::PartieId) -> bool {
    match scope {
        Scope::SousPartie(sp_id) => devis
            .parent_partie_of(sp_id)
            .is_some_and(|p| p.id == partie_id),
        Scope::Partie(_) | Scope::Global => false,
    }
}
