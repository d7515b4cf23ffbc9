//! Devis Pricing Service
//!
//! Orchestrates the pricing pipeline:
//! 1. Validate input size and every committed special line
//! 2. Run the bottom-up aggregation pass
//! 3. Return the breakdown (or the first fatal error, never partial totals)

use crate::algorithms::{aggregator, placement};
use crate::config::PricingConfig;
use crate::domain::entities::{Devis, PricingBreakdown, SpecialLine};
use crate::domain::errors::PricingError;
use crate::domain::value_objects::{BaseTarget, Scope, SpecialLineKind, ValueKind};
use crate::ports::inbound::DevisPricingApi;
use crate::ports::outbound::DevisRepository;
use async_trait::async_trait;
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

/// Devis Pricing Service
pub struct DevisPricingService {
    config: PricingConfig,
}

impl DevisPricingService {
    /// Create a new service with default config
    pub fn new() -> Self {
        Self {
            config: PricingConfig::default(),
        }
    }

    /// Create a new service with custom config
    pub fn with_config(config: PricingConfig) -> Self {
        Self { config }
    }

    /// Load a stored devis, price it, and persist the breakdown for the
    /// rendering collaborators.
    pub async fn price_stored_devis(
        &self,
        repository: &dyn DevisRepository,
        id: crate::domain::value_objects::DevisId,
    ) -> Result<PricingBreakdown, PricingError> {
        let devis = repository.load_devis(id).await?;
        let breakdown = self.price_devis(&devis).await?;
        repository.store_breakdown(id, &breakdown).await?;
        Ok(breakdown)
    }

    /// Validate tree size and the shape of every committed special line
    fn validate_devis(&self, devis: &Devis) -> Result<(), PricingError> {
        let lignes = devis.ligne_count();
        if lignes > self.config.max_lignes {
            return Err(PricingError::DevisTooLarge {
                lignes,
                max: self.config.max_lignes,
            });
        }

        if devis.special_lines.len() > self.config.max_special_lines {
            return Err(PricingError::TooManySpecialLines {
                count: devis.special_lines.len(),
                max: self.config.max_special_lines,
            });
        }

        for line in &devis.special_lines {
            validate_line_shape(devis, line)?;
        }
        Ok(())
    }
}

impl Default for DevisPricingService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DevisPricingApi for DevisPricingService {
    async fn price_devis(&self, devis: &Devis) -> Result<PricingBreakdown, PricingError> {
        self.validate_devis(devis)?;

        info!(
            devis = %devis.id,
            numero = %devis.numero,
            parties = devis.parties.len(),
            lignes = devis.ligne_count(),
            special_lines = devis.special_lines.len(),
            "Pricing devis"
        );

        let breakdown = aggregator::compute_totals(devis, &self.config).map_err(|err| {
            warn!(devis = %devis.id, error = %err, "Pricing aborted");
            err
        })?;

        debug!(
            devis = %devis.id,
            global = %breakdown.global,
            "Pricing complete"
        );
        Ok(breakdown)
    }

    fn validate_special_line(
        &self,
        devis: &Devis,
        candidate: &SpecialLine,
    ) -> Result<(), PricingError> {
        validate_line_shape(devis, candidate)?;

        // Dry pricing pass with the candidate committed: cyclic chains
        // through other lines only surface during resolution.
        let mut draft = devis.clone();
        draft.special_lines.retain(|l| l.id != candidate.id);
        draft.special_lines.push(candidate.clone());
        aggregator::compute_totals(&draft, &self.config).map(|_| ())
    }

    fn order_scope(
        &self,
        devis: &Devis,
        scope: Scope,
    ) -> Result<placement::OrderedScope, PricingError> {
        let ordered = placement::order_scope_entries(devis, scope)?;
        for warning in &ordered.warnings {
            warn!(
                line = %warning.line,
                description = %warning.description,
                "Placement anchor missing, degraded to end of scope"
            );
        }
        Ok(ordered)
    }
}

/// Structural checks that need no resolution pass
fn validate_line_shape(devis: &Devis, line: &SpecialLine) -> Result<(), PricingError> {
    let scope_known = match line.scope {
        Scope::Global => true,
        Scope::Partie(id) => devis.find_partie(id).is_some(),
        Scope::SousPartie(id) => devis.find_sous_partie(id).is_some(),
    };
    if !scope_known {
        return Err(PricingError::ScopeNotFound {
            line: line.id,
            description: line.description.clone(),
            scope: line.scope,
        });
    }

    // Display lines are informational whatever they carry.
    if line.kind == SpecialLineKind::Display {
        return Ok(());
    }

    if line.value < Decimal::ZERO {
        return Err(PricingError::NegativeValue {
            line: line.id,
            description: line.description.clone(),
            value: line.value,
        });
    }

    if line.value_kind == ValueKind::Percentage {
        if line.value > Decimal::ONE_HUNDRED {
            return Err(PricingError::InvalidPercentage {
                line: line.id,
                description: line.description.clone(),
                value: line.value,
            });
        }
        if line.base_ref.is_none() {
            return Err(PricingError::MissingBaseRef {
                line: line.id,
                description: line.description.clone(),
            });
        }
    }

    if let Some(base_ref) = &line.base_ref {
        let target_known = match base_ref.target {
            BaseTarget::Global => true,
            BaseTarget::Partie(id) => devis.find_partie(id).is_some(),
            BaseTarget::SousPartie(id) => devis.find_sous_partie(id).is_some(),
            BaseTarget::Ligne(id) => devis.find_ligne(id).is_some(),
        };
        if !target_known {
            return Err(PricingError::TargetNotFound {
                line: line.id,
                description: line.description.clone(),
                label: base_ref.label.clone(),
            });
        }
    }

    Ok(())
}
