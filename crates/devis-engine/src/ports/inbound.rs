//! Inbound Ports (Driving Ports / API)

use crate::algorithms::placement::OrderedScope;
use crate::domain::entities::{Devis, PricingBreakdown, SpecialLine};
use crate::domain::errors::PricingError;
use crate::domain::value_objects::Scope;
use async_trait::async_trait;

/// Primary pricing API consumed by the quote-editing collaborators
#[async_trait]
pub trait DevisPricingApi: Send + Sync {
    /// Price a devis snapshot from scratch.
    ///
    /// Validates size limits and every committed special line, then runs
    /// the bottom-up aggregation pass. Fatal errors abort the whole call;
    /// partial totals are never returned.
    async fn price_devis(&self, devis: &Devis) -> Result<PricingBreakdown, PricingError>;

    /// Edit-time validation of a special line before it is committed.
    ///
    /// Checks value range, base-reference shape and existence, and runs a
    /// dry pricing pass with the candidate in place so cyclic references
    /// are rejected before they ever enter the stored tree.
    fn validate_special_line(
        &self,
        devis: &Devis,
        candidate: &SpecialLine,
    ) -> Result<(), PricingError>;

    /// Rendered ordering of one scope for preview/PDF generation.
    ///
    /// Pure presentation; placement warnings are collected in the result
    /// rather than failing the call.
    fn order_scope(&self, devis: &Devis, scope: Scope) -> Result<OrderedScope, PricingError>;
}
