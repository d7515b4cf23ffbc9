//! Placement resolver: rendered ordering of a scope
//!
//! Pure presentation: the entry sequence produced here never feeds back
//! into any total. Special lines are inserted into the scope's natural
//! (stored) ordering in committed order, so two lines with conflicting
//! anchors resolve by first-created-wins adjacency. A missing anchor
//! sibling degrades to `End` and is reported as a non-fatal warning.

use crate::domain::entities::Devis;
use crate::domain::errors::{PlacementWarning, PricingError};
use crate::domain::value_objects::{
    LigneId, PartieId, Position, Scope, SiblingRef, SousPartieId, SpecialLineId,
};
use serde::{Deserialize, Serialize};

/// One entry in the rendered ordering of a scope
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RenderedEntry {
    Ligne(LigneId),
    SousPartie(SousPartieId),
    Partie(PartieId),
    Special(SpecialLineId),
}

impl RenderedEntry {
    fn matches(&self, sibling: SiblingRef) -> bool {
        matches!(
            (self, sibling),
            (RenderedEntry::Ligne(a), SiblingRef::Ligne(b)) if *a == b
        ) || matches!(
            (self, sibling),
            (RenderedEntry::SousPartie(a), SiblingRef::SousPartie(b)) if *a == b
        ) || matches!(
            (self, sibling),
            (RenderedEntry::Partie(a), SiblingRef::Partie(b)) if *a == b
        ) || matches!(
            (self, sibling),
            (RenderedEntry::Special(a), SiblingRef::Special(b)) if *a == b
        )
    }
}

/// Rendered ordering of one scope plus any placement degradations
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderedScope {
    pub scope: Scope,
    pub entries: Vec<RenderedEntry>,
    pub warnings: Vec<PlacementWarning>,
}

/// Order the entries of a scope for rendering or printing.
pub fn order_scope_entries(devis: &Devis, scope: Scope) -> Result<OrderedScope, PricingError> {
    let mut entries = natural_entries(devis, scope)?;
    let mut warnings = Vec::new();
    // Specials anchored at Start occupy [0, start_block).
    let mut start_block = 0usize;

    for line in devis.special_lines_at(scope) {
        let entry = RenderedEntry::Special(line.id);
        match line.placement.position {
            Position::Start => {
                entries.insert(start_block, entry);
                start_block += 1;
            }
            Position::End => entries.push(entry),
            Position::BeforeSibling | Position::AfterSibling => {
                match anchor_index(devis, &entries, line.placement.sibling, line.placement.position)
                {
                    Some(at) => entries.insert(at, entry),
                    None => {
                        entries.push(entry);
                        warnings.push(PlacementWarning {
                            line: line.id,
                            description: line.description.clone(),
                            missing_sibling: line.placement.sibling,
                        });
                    }
                }
            }
        }
    }

    Ok(OrderedScope {
        scope,
        entries,
        warnings,
    })
}

/// Stored ordering of the scope's real line items.
fn natural_entries(devis: &Devis, scope: Scope) -> Result<Vec<RenderedEntry>, PricingError> {
    match scope {
        Scope::Global => Ok(devis
            .parties
            .iter()
            .map(|p| RenderedEntry::Partie(p.id))
            .collect()),
        Scope::Partie(id) => {
            let partie = devis
                .find_partie(id)
                .ok_or(PricingError::UnknownScope { scope })?;
            Ok(partie
                .sous_parties
                .iter()
                .map(|sp| RenderedEntry::SousPartie(sp.id))
                .collect())
        }
        Scope::SousPartie(id) => {
            let sp = devis
                .find_sous_partie(id)
                .ok_or(PricingError::UnknownScope { scope })?;
            Ok(sp
                .ligne_details
                .iter()
                .map(|l| RenderedEntry::Ligne(l.id))
                .collect())
        }
    }
}

/// Insertion index next to the named sibling, keeping earlier-committed
/// lines adjacent to it.
fn anchor_index(
    devis: &Devis,
    entries: &[RenderedEntry],
    sibling: Option<SiblingRef>,
    position: Position,
) -> Option<usize> {
    let sibling = sibling?;
    let sibling_at = entries.iter().position(|e| e.matches(sibling))?;

    match position {
        Position::BeforeSibling => {
            // Walk left past specials already anchored before this same
            // sibling: the first-committed one keeps the adjacent slot.
            let mut at = sibling_at;
            while at > 0 && anchored_to(devis, entries[at - 1], Position::BeforeSibling, sibling) {
                at -= 1;
            }
            Some(at)
        }
        Position::AfterSibling => {
            let mut at = sibling_at + 1;
            while at < entries.len()
                && anchored_to(devis, entries[at], Position::AfterSibling, sibling)
            {
                at += 1;
            }
            Some(at)
        }
        Position::Start | Position::End => None,
    }
}

fn anchored_to(
    devis: &Devis,
    entry: RenderedEntry,
    position: Position,
    sibling: SiblingRef,
) -> bool {
    let RenderedEntry::Special(id) = entry else {
        return false;
    };
    devis
        .find_special_line(id)
        .is_some_and(|l| l.placement.position == position && l.placement.sibling == Some(sibling))
}
