//! Value objects for the devis pricing engine
//!
//! Identifiers are opaque newtypes over UUIDs so a base reference can never
//! be confused with the node it points at. A `BaseReference` stores only a
//! path descriptor and a label, never a cached amount: every resolution
//! reads the live tree.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! id_newtype {
    ($(#[$doc:meta])* $name:ident, $prefix:literal) => {
        $(#[$doc])*
        #[derive(
            Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        pub struct $name(pub Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Deterministic id for fixtures and tests.
            pub fn from_u128(raw: u128) -> Self {
                Self(Uuid::from_u128(raw))
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "-{}"), self.0)
            }
        }
    };
}

id_newtype!(
    /// Identifier of a devis (quote document).
    DevisId,
    "devis"
);
id_newtype!(
    /// Identifier of a partie (top-level section).
    PartieId,
    "partie"
);
id_newtype!(
    /// Identifier of a sous-partie (subsection).
    SousPartieId,
    "sp"
);
id_newtype!(
    /// Identifier of a ligne de détail (priced line).
    LigneId,
    "ligne"
);
id_newtype!(
    /// Identifier of a special line (discount, surcharge, annotation).
    SpecialLineId,
    "special"
);

/// Monetary effect of a special line
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpecialLineKind {
    /// Subtracts from the enclosing total
    Reduction,
    /// Adds to the enclosing total
    Addition,
    /// Informational only, never changes totals
    Display,
}

/// How the line's `value` is interpreted
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueKind {
    /// A fixed monetary amount
    Fixed,
    /// A percentage of a referenced base, in [0, 100]
    Percentage,
}

/// The tree node a special line is attached to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scope {
    /// The whole devis
    Global,
    /// A specific partie
    Partie(PartieId),
    /// A specific sous-partie
    SousPartie(SousPartieId),
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Global => write!(f, "global"),
            Scope::Partie(id) => write!(f, "{id}"),
            Scope::SousPartie(id) => write!(f, "{id}"),
        }
    }
}

/// Which total a base reference points at
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BaseTarget {
    /// The devis total before global special lines
    Global,
    /// A partie subtotal
    Partie(PartieId),
    /// A sous-partie subtotal
    SousPartie(SousPartieId),
    /// A single ligne amount (quantity x unit price)
    Ligne(LigneId),
}

/// Symbolic pointer to "some total in the document".
///
/// Only the path descriptor is persisted; the amount is re-derived from the
/// live tree on every evaluation so edits elsewhere are always reflected.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseReference {
    pub target: BaseTarget,
    /// Human-readable label shown in the editor ("Total Gros œuvre", ...)
    pub label: String,
}

impl BaseReference {
    pub fn new(target: BaseTarget, label: impl Into<String>) -> Self {
        Self {
            target,
            label: label.into(),
        }
    }

    pub fn global(label: impl Into<String>) -> Self {
        Self::new(BaseTarget::Global, label)
    }

    pub fn partie(id: PartieId, label: impl Into<String>) -> Self {
        Self::new(BaseTarget::Partie(id), label)
    }

    pub fn sous_partie(id: SousPartieId, label: impl Into<String>) -> Self {
        Self::new(BaseTarget::SousPartie(id), label)
    }

    pub fn ligne(id: LigneId, label: impl Into<String>) -> Self {
        Self::new(BaseTarget::Ligne(id), label)
    }
}

/// Anchor for rendered ordering within a scope
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Position {
    /// Before the scope's stored line items
    Start,
    /// After the scope's stored line items
    End,
    /// Immediately before a named sibling entry
    BeforeSibling,
    /// Immediately after a named sibling entry
    AfterSibling,
}

/// Entry a sibling anchor can name: a real line item or another special line
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SiblingRef {
    Ligne(LigneId),
    SousPartie(SousPartieId),
    Partie(PartieId),
    Special(SpecialLineId),
}

/// Where a special line sits in the rendered ordering of its scope.
///
/// Purely presentational; never affects any total.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub position: Position,
    /// Required for `BeforeSibling`/`AfterSibling`, ignored otherwise
    pub sibling: Option<SiblingRef>,
}

impl Placement {
    pub fn start() -> Self {
        Self {
            position: Position::Start,
            sibling: None,
        }
    }

    pub fn end() -> Self {
        Self {
            position: Position::End,
            sibling: None,
        }
    }

    pub fn before(sibling: SiblingRef) -> Self {
        Self {
            position: Position::BeforeSibling,
            sibling: Some(sibling),
        }
    }

    pub fn after(sibling: SiblingRef) -> Self {
        Self {
            position: Position::AfterSibling,
            sibling: Some(sibling),
        }
    }
}

impl Default for Placement {
    fn default() -> Self {
        Self::end()
    }
}
