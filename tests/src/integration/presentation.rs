//! Rendered-ordering scenarios: placement never touches the totals

#[cfg(test)]
mod tests {
    use crate::fixtures::{init_tracing, two_sous_parties_devis};
    use devis_engine::{
        DevisPricingApi, DevisPricingService, LigneId, Placement, RenderedEntry, Scope,
        SiblingRef, SousPartieId, SpecialLine, SpecialLineId, SpecialLineKind, ValueKind,
    };
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_placement_is_orthogonal_to_totals() {
        init_tracing();
        let service = DevisPricingService::new();
        let scope = Scope::SousPartie(SousPartieId::from_u128(1));

        let base = two_sous_parties_devis();
        let line = |placement| {
            SpecialLine::new(
                SpecialLineId::from_u128(1),
                "Remise négociée",
                SpecialLineKind::Reduction,
                ValueKind::Fixed,
                dec!(25),
                scope,
            )
            .with_placement(placement)
        };

        let at_start = base.clone().with_special_line(line(Placement::start()));
        let at_end = base.with_special_line(line(Placement::end()));

        let b_start = service.price_devis(&at_start).await.unwrap();
        let b_end = service.price_devis(&at_end).await.unwrap();
        assert_eq!(b_start, b_end);

        // Same money, different rendered ordering.
        let o_start = service.order_scope(&at_start, scope).unwrap();
        let o_end = service.order_scope(&at_end, scope).unwrap();
        assert_eq!(
            o_start.entries.first(),
            Some(&RenderedEntry::Special(SpecialLineId::from_u128(1)))
        );
        assert_eq!(
            o_end.entries.last(),
            Some(&RenderedEntry::Special(SpecialLineId::from_u128(1)))
        );
    }

    #[tokio::test]
    async fn test_dangling_anchor_warns_but_still_prices() {
        init_tracing();
        let service = DevisPricingService::new();
        let scope = Scope::SousPartie(SousPartieId::from_u128(1));

        let devis = two_sous_parties_devis().with_special_line(
            SpecialLine::new(
                SpecialLineId::from_u128(1),
                "Voir détail en annexe",
                SpecialLineKind::Display,
                ValueKind::Fixed,
                dec!(0),
                scope,
            )
            .with_placement(Placement::before(SiblingRef::Ligne(LigneId::from_u128(
                424242,
            )))),
        );

        // Non-fatal: pricing still succeeds...
        let breakdown = service.price_devis(&devis).await.unwrap();
        assert_eq!(breakdown.global, dec!(800.00));

        // ...and the ordering degrades to End with a warning.
        let ordered = service.order_scope(&devis, scope).unwrap();
        assert_eq!(ordered.warnings.len(), 1);
        assert_eq!(ordered.warnings[0].description, "Voir détail en annexe");
        assert_eq!(
            ordered.entries.last(),
            Some(&RenderedEntry::Special(SpecialLineId::from_u128(1)))
        );
    }

    #[tokio::test]
    async fn test_global_scope_renders_parties_and_global_lines() {
        init_tracing();
        let service = DevisPricingService::new();

        let devis = two_sous_parties_devis().with_special_line(
            SpecialLine::new(
                SpecialLineId::from_u128(1),
                "Remise commerciale",
                SpecialLineKind::Reduction,
                ValueKind::Fixed,
                dec!(10),
                Scope::Global,
            )
            .with_placement(Placement::end()),
        );

        let ordered = service.order_scope(&devis, Scope::Global).unwrap();
        assert_eq!(ordered.entries.len(), 2);
        assert!(matches!(ordered.entries[0], RenderedEntry::Partie(_)));
        assert_eq!(
            ordered.entries[1],
            RenderedEntry::Special(SpecialLineId::from_u128(1))
        );
    }
}
