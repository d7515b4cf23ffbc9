//! Dependency/cycle guard for base-reference resolution
//!
//! The evaluation context carries the stack of special lines currently
//! being evaluated. Re-entering a line already on the stack means its
//! base reference transitively needs its own unresolved value, which is
//! rejected rather than guessed. Lines in the exclusion set are the ones
//! an ancestor resolution deliberately leaves out (the referencing line
//! itself); skipping them is by construction, not an error.

use crate::domain::entities::SpecialLine;
use crate::domain::errors::PricingError;
use crate::domain::value_objects::{BaseTarget, Scope, SpecialLineId};
use std::collections::HashSet;

/// Evaluation state threaded through one resolution chain
#[derive(Debug, Clone, Default)]
pub struct EvalContext {
    stack: Vec<SpecialLineId>,
    excluded: HashSet<SpecialLineId>,
}

impl EvalContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a line onto the evaluation stack.
    ///
    /// Fails with `CycleDetected` if the line is already being evaluated
    /// somewhere up the chain.
    pub fn enter(&mut self, line: &SpecialLine) -> Result<(), PricingError> {
        if self.stack.contains(&line.id) {
            return Err(PricingError::CycleDetected {
                line: line.id,
                description: line.description.clone(),
            });
        }
        self.stack.push(line.id);
        Ok(())
    }

    pub fn exit(&mut self, id: SpecialLineId) {
        debug_assert_eq!(self.stack.last(), Some(&id));
        self.stack.pop();
    }

    /// Lines an in-flight ancestor resolution leaves out of aggregation.
    pub fn is_excluded(&self, id: SpecialLineId) -> bool {
        self.excluded.contains(&id)
    }

    /// Fork the context for an ancestor resolution that must not include
    /// the referencing line's own delta.
    ///
    /// The evaluation stack is kept, the exclusion set is not: only the
    /// referencing line is excluded. Inheriting outer exclusions would let
    /// a sibling's nested resolution skip a line that is still on the
    /// stack instead of re-entering it and failing as a cycle.
    pub fn child_excluding(&self, id: SpecialLineId) -> Self {
        Self {
            stack: self.stack.clone(),
            excluded: HashSet::from([id]),
        }
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }
}

/// A base reference pointing at the very scope that declares the line is
/// always cyclic: the scope's total includes the line itself.
pub fn is_same_scope_reference(line: &SpecialLine) -> bool {
    let Some(base_ref) = &line.base_ref else {
        return false;
    };
    matches!(
        (line.scope, base_ref.target),
        (Scope::Global, BaseTarget::Global)
    ) || matches!(
        (line.scope, base_ref.target),
        (Scope::Partie(s), BaseTarget::Partie(t)) if s == t
    ) || matches!(
        (line.scope, base_ref.target),
        (Scope::SousPartie(s), BaseTarget::SousPartie(t)) if s == t
    )
}
