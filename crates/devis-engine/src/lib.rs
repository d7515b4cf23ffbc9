//! # Devis Pricing Engine
//!
//! Hierarchical quote adjustment and dynamic base-resolution for the
//! Chantier-Suite construction-management backend. A devis is a tree of
//! priced line items (Devis → Parties → SousParties → LigneDetails)
//! augmented by free-form special lines (discounts, surcharges,
//! display-only annotations) whose value can be fixed or a percentage of
//! any other total in the document.
//!
//! ## Architecture
//!
//! - **Domain**: the document tree, value objects, error taxonomy, and
//!   executable invariants
//! - **Algorithms**: base resolver, special-line evaluator, cycle guard,
//!   placement resolver, and the bottom-up total aggregator
//! - **Ports**: inbound (`DevisPricingApi`) and outbound (`DevisRepository`)
//! - **Application**: service orchestration (validation, limits, tracing)
//!
//! The engine is synchronous, pure, and snapshot-in/result-out: callers
//! serialize edits per devis, the engine recomputes every total from
//! scratch on each call and never trusts a stored amount.

pub mod algorithms;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

pub use algorithms::{compute_totals, order_scope_entries, OrderedScope, RenderedEntry};
pub use application::service::DevisPricingService;
pub use config::PricingConfig;
pub use domain::entities::*;
pub use domain::errors::{PlacementWarning, PricingError, RepositoryError};
pub use domain::value_objects::*;
pub use ports::inbound::DevisPricingApi;
pub use ports::outbound::DevisRepository;
