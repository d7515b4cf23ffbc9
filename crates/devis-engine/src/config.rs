//! Configuration for the devis pricing engine

use serde::{Deserialize, Serialize};

/// Pricing configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PricingConfig {
    /// Maximum lignes de détail in a single devis (anti-DoS)
    pub max_lignes: usize,
    /// Maximum special lines in a single devis (anti-DoS)
    pub max_special_lines: usize,
    /// Decimal places for ligne amounts and resolved deltas
    pub rounding_dp: u32,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            max_lignes: 10_000,
            max_special_lines: 500,
            rounding_dp: 2,
        }
    }
}
