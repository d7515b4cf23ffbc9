//! Core entities for the devis pricing engine
//!
//! The document tree: Devis → Parties → SousParties → LigneDetails, with
//! SpecialLines stored flat on the devis and attached to a scope. This is
//! also the persisted representation: no entity carries a computed amount.

use super::value_objects::{
    BaseReference, DevisId, LigneId, PartieId, Placement, Scope, SousPartieId, SpecialLineId,
    SpecialLineKind, ValueKind,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Priced leaf line: amount = quantity × unit price
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LigneDetail {
    pub id: LigneId,
    pub description: String,
    /// Unit of measure ("m²", "h", "u", ...)
    pub unit: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
}

impl LigneDetail {
    pub fn new(
        id: LigneId,
        description: impl Into<String>,
        unit: impl Into<String>,
        quantity: Decimal,
        unit_price: Decimal,
    ) -> Self {
        Self {
            id,
            description: description.into(),
            unit: unit.into(),
            quantity,
            unit_price,
        }
    }

    /// Raw amount before rounding policy is applied.
    pub fn amount(&self) -> Decimal {
        self.quantity * self.unit_price
    }
}

/// Subsection holding an ordered sequence of priced lines
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SousPartie {
    pub id: SousPartieId,
    pub title: String,
    pub ligne_details: Vec<LigneDetail>,
}

impl SousPartie {
    pub fn new(id: SousPartieId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            ligne_details: Vec::new(),
        }
    }

    pub fn with_ligne(mut self, ligne: LigneDetail) -> Self {
        self.ligne_details.push(ligne);
        self
    }
}

/// Top-level section holding an ordered sequence of subsections
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Partie {
    pub id: PartieId,
    pub title: String,
    pub sous_parties: Vec<SousPartie>,
}

impl Partie {
    pub fn new(id: PartieId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            sous_parties: Vec::new(),
        }
    }

    pub fn with_sous_partie(mut self, sous_partie: SousPartie) -> Self {
        self.sous_parties.push(sous_partie);
        self
    }
}

/// User-added adjustment (discount, surcharge, or display-only note).
///
/// Immutable once committed: edits in the UI produce a new value, the
/// engine only ever consumes committed snapshots. Committed order within
/// `Devis::special_lines` is creation order and drives placement
/// tie-breaking.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpecialLine {
    pub id: SpecialLineId,
    pub description: String,
    pub kind: SpecialLineKind,
    pub value_kind: ValueKind,
    /// Non-negative; the sign of the effect comes from `kind`
    pub value: Decimal,
    pub scope: Scope,
    /// Required when `value_kind` is `Percentage`
    pub base_ref: Option<BaseReference>,
    pub placement: Placement,
}

impl SpecialLine {
    pub fn new(
        id: SpecialLineId,
        description: impl Into<String>,
        kind: SpecialLineKind,
        value_kind: ValueKind,
        value: Decimal,
        scope: Scope,
    ) -> Self {
        Self {
            id,
            description: description.into(),
            kind,
            value_kind,
            value,
            scope,
            base_ref: None,
            placement: Placement::default(),
        }
    }

    pub fn with_base_ref(mut self, base_ref: BaseReference) -> Self {
        self.base_ref = Some(base_ref);
        self
    }

    pub fn with_placement(mut self, placement: Placement) -> Self {
        self.placement = placement;
        self
    }

    /// Display lines never move totals, whatever value they carry.
    pub fn is_display(&self) -> bool {
        self.kind == SpecialLineKind::Display
    }
}

/// The quote document; root of the hierarchy
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Devis {
    pub id: DevisId,
    /// Quote number shown on the printed document ("DEV-2024-0042", ...)
    pub numero: String,
    pub parties: Vec<Partie>,
    /// All special lines of the document, in committed (creation) order
    pub special_lines: Vec<SpecialLine>,
}

impl Devis {
    pub fn new(id: DevisId, numero: impl Into<String>) -> Self {
        Self {
            id,
            numero: numero.into(),
            parties: Vec::new(),
            special_lines: Vec::new(),
        }
    }

    pub fn with_partie(mut self, partie: Partie) -> Self {
        self.parties.push(partie);
        self
    }

    pub fn with_special_line(mut self, line: SpecialLine) -> Self {
        self.special_lines.push(line);
        self
    }

    /// Special lines attached to the given scope, in committed order.
    pub fn special_lines_at(&self, scope: Scope) -> impl Iterator<Item = &SpecialLine> {
        self.special_lines.iter().filter(move |l| l.scope == scope)
    }

    pub fn find_partie(&self, id: PartieId) -> Option<&Partie> {
        self.parties.iter().find(|p| p.id == id)
    }

    pub fn find_sous_partie(&self, id: SousPartieId) -> Option<&SousPartie> {
        self.parties
            .iter()
            .flat_map(|p| p.sous_parties.iter())
            .find(|sp| sp.id == id)
    }

    pub fn find_ligne(&self, id: LigneId) -> Option<&LigneDetail> {
        self.parties
            .iter()
            .flat_map(|p| p.sous_parties.iter())
            .flat_map(|sp| sp.ligne_details.iter())
            .find(|l| l.id == id)
    }

    pub fn find_special_line(&self, id: SpecialLineId) -> Option<&SpecialLine> {
        self.special_lines.iter().find(|l| l.id == id)
    }

    /// Partie containing the given sous-partie, if any.
    pub fn parent_partie_of(&self, id: SousPartieId) -> Option<&Partie> {
        self.parties
            .iter()
            .find(|p| p.sous_parties.iter().any(|sp| sp.id == id))
    }

    pub fn ligne_count(&self) -> usize {
        self.parties
            .iter()
            .flat_map(|p| p.sous_parties.iter())
            .map(|sp| sp.ligne_details.len())
            .sum()
    }
}

/// Output of a full pricing pass over a devis.
///
/// Every amount here is derived from the live tree in a single call; none
/// of it is ever persisted back into the document entities.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PricingBreakdown {
    /// Final total of the devis, all adjustments applied
    pub global: Decimal,
    /// Adjusted subtotal per partie
    pub per_partie: std::collections::HashMap<PartieId, Decimal>,
    /// Adjusted subtotal per sous-partie
    pub per_sous_partie: std::collections::HashMap<SousPartieId, Decimal>,
    /// Signed delta each special line contributed (0 for display lines)
    pub resolved_special_lines: std::collections::HashMap<SpecialLineId, Decimal>,
}

impl PricingBreakdown {
    pub fn partie_total(&self, id: PartieId) -> Option<Decimal> {
        self.per_partie.get(&id).copied()
    }

    pub fn sous_partie_total(&self, id: SousPartieId) -> Option<Decimal> {
        self.per_sous_partie.get(&id).copied()
    }

    pub fn delta_for(&self, id: SpecialLineId) -> Option<Decimal> {
        self.resolved_special_lines.get(&id).copied()
    }
}
