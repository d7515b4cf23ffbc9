//! Pure pricing algorithms: resolution, evaluation, guarding, ordering

pub mod aggregator;
pub mod base_resolver;
pub mod cycle_guard;
pub mod evaluator;
pub mod placement;

pub use aggregator::compute_totals;
pub use cycle_guard::EvalContext;
pub use placement::{order_scope_entries, OrderedScope, RenderedEntry};
