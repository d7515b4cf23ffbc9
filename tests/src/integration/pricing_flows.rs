//! # Integration Test Flows
//!
//! End-to-end pricing scenarios through the service API: quote-editing
//! collaborators hand the engine a devis snapshot and get back a
//! breakdown, or a fatal error with the offending line's description.

#[cfg(test)]
mod tests {
    use crate::fixtures::{init_tracing, two_sous_parties_devis};
    use devis_engine::domain::invariants::{
        invariant_additive_totals, invariant_display_lines_neutral,
        invariant_resolved_deltas_cover_special_lines,
    };
    use devis_engine::ports::outbound::mocks::InMemoryDevisRepository;
    use devis_engine::{
        BaseReference, DevisPricingApi, DevisPricingService, PartieId, PricingError, Scope,
        SousPartieId, SpecialLine, SpecialLineId, SpecialLineKind, ValueKind,
    };
    use rust_decimal_macros::dec;

    fn special(
        raw: u128,
        description: &str,
        kind: SpecialLineKind,
        value_kind: ValueKind,
        value: rust_decimal::Decimal,
        scope: Scope,
    ) -> SpecialLine {
        SpecialLine::new(
            SpecialLineId::from_u128(raw),
            description,
            kind,
            value_kind,
            value,
            scope,
        )
    }

    // =========================================================================
    // FULL PIPELINE: REPOSITORY → SERVICE → BREAKDOWN
    // =========================================================================

    #[tokio::test]
    async fn test_stored_devis_is_priced_and_breakdown_persisted() {
        init_tracing();
        let service = DevisPricingService::new();
        let repository = InMemoryDevisRepository::new();

        let devis = two_sous_parties_devis().with_special_line(
            special(
                1,
                "Remise commerciale",
                SpecialLineKind::Reduction,
                ValueKind::Fixed,
                dec!(50),
                Scope::Partie(PartieId::from_u128(1)),
            ),
        );
        let id = devis.id;
        repository.insert_devis(devis);

        let breakdown = service.price_stored_devis(&repository, id).await.unwrap();
        assert_eq!(breakdown.global, dec!(750.00));
        assert_eq!(repository.stored_breakdown(id), Some(breakdown));
    }

    #[tokio::test]
    async fn test_worked_scenario_global_787_50() {
        init_tracing();
        let service = DevisPricingService::new();

        // Partie-scoped fixed reduction of 50 brings the partie to 750;
        // a global 5% addition based on that partie contributes 37.50.
        let devis = two_sous_parties_devis()
            .with_special_line(special(
                1,
                "Remise commerciale",
                SpecialLineKind::Reduction,
                ValueKind::Fixed,
                dec!(50),
                Scope::Partie(PartieId::from_u128(1)),
            ))
            .with_special_line(
                special(
                    2,
                    "Majoration site occupé",
                    SpecialLineKind::Addition,
                    ValueKind::Percentage,
                    dec!(5),
                    Scope::Global,
                )
                .with_base_ref(BaseReference::partie(PartieId::from_u128(1), "Gros œuvre")),
            );

        let breakdown = service.price_devis(&devis).await.unwrap();
        assert_eq!(breakdown.global, dec!(787.50));
        assert!(invariant_additive_totals(&devis, &breakdown));
        assert!(invariant_resolved_deltas_cover_special_lines(
            &devis, &breakdown
        ));
    }

    #[tokio::test]
    async fn test_percentage_of_sous_partie_propagates_to_every_level() {
        init_tracing();
        let service = DevisPricingService::new();

        // +10% of sous-partie 1 (500.00): +50.00 on sous-partie 2
        let devis = two_sous_parties_devis().with_special_line(
            special(
                1,
                "Plus-value accès difficile",
                SpecialLineKind::Addition,
                ValueKind::Percentage,
                dec!(10),
                Scope::SousPartie(SousPartieId::from_u128(2)),
            )
            .with_base_ref(BaseReference::sous_partie(
                SousPartieId::from_u128(1),
                "Maçonnerie",
            )),
        );

        let breakdown = service.price_devis(&devis).await.unwrap();
        assert_eq!(
            breakdown.sous_partie_total(SousPartieId::from_u128(2)),
            Some(dec!(350.00))
        );
        assert_eq!(
            breakdown.partie_total(PartieId::from_u128(1)),
            Some(dec!(850.00))
        );
        assert_eq!(breakdown.global, dec!(850.00));
    }

    // =========================================================================
    // FATAL ERRORS: NO PARTIAL TOTALS, EVER
    // =========================================================================

    #[tokio::test]
    async fn test_deleting_base_target_turns_pricing_fatal() {
        init_tracing();
        let service = DevisPricingService::new();

        let mut devis = two_sous_parties_devis().with_special_line(
            special(
                1,
                "Remise sur charpente",
                SpecialLineKind::Reduction,
                ValueKind::Percentage,
                dec!(10),
                Scope::Partie(PartieId::from_u128(1)),
            )
            .with_base_ref(BaseReference::sous_partie(
                SousPartieId::from_u128(2),
                "Charpente",
            )),
        );

        // Priced fine while the target exists.
        assert!(service.price_devis(&devis).await.is_ok());

        // The user deletes the referenced sous-partie.
        devis.parties[0].sous_parties.retain(|sp| sp.id != SousPartieId::from_u128(2));

        let err = service.price_devis(&devis).await.unwrap_err();
        match err {
            PricingError::TargetNotFound { description, .. } => {
                assert_eq!(description, "Remise sur charpente");
            }
            other => panic!("expected TargetNotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_global_self_reference_is_rejected_everywhere() {
        init_tracing();
        let service = DevisPricingService::new();
        let devis = two_sous_parties_devis();

        let candidate = special(
            1,
            "Majoration globale",
            SpecialLineKind::Addition,
            ValueKind::Percentage,
            dec!(5),
            Scope::Global,
        )
        .with_base_ref(BaseReference::global("Total général"));

        // Rejected at edit time...
        let err = service.validate_special_line(&devis, &candidate).unwrap_err();
        assert!(matches!(err, PricingError::CycleDetected { .. }));

        // ...and at compute time if it slipped into storage anyway.
        let stored = devis.with_special_line(candidate);
        let err = service.price_devis(&stored).await.unwrap_err();
        assert!(matches!(err, PricingError::CycleDetected { .. }));
    }

    #[tokio::test]
    async fn test_cycle_through_two_lines_is_rejected() {
        init_tracing();
        let service = DevisPricingService::new();

        let devis = two_sous_parties_devis().with_special_line(
            special(
                1,
                "Plus-value maçonnerie",
                SpecialLineKind::Addition,
                ValueKind::Percentage,
                dec!(10),
                Scope::SousPartie(SousPartieId::from_u128(1)),
            )
            .with_base_ref(BaseReference::sous_partie(
                SousPartieId::from_u128(2),
                "Charpente",
            )),
        );

        // The first cross-reference alone is fine.
        assert!(service.price_devis(&devis).await.is_ok());

        // Adding the mirror reference closes the loop; the editor must
        // refuse it before commit.
        let mirror = special(
            2,
            "Plus-value charpente",
            SpecialLineKind::Addition,
            ValueKind::Percentage,
            dec!(10),
            Scope::SousPartie(SousPartieId::from_u128(2)),
        )
        .with_base_ref(BaseReference::sous_partie(
            SousPartieId::from_u128(1),
            "Maçonnerie",
        ));
        let err = service.validate_special_line(&devis, &mirror).unwrap_err();
        assert!(matches!(err, PricingError::CycleDetected { .. }));
    }

    // =========================================================================
    // DISPLAY LINES AND PERSISTED REPRESENTATION
    // =========================================================================

    #[tokio::test]
    async fn test_display_lines_are_neutral() {
        init_tracing();
        let service = DevisPricingService::new();

        let without = two_sous_parties_devis();
        let with = without.clone().with_special_line(special(
            1,
            "Acompte de 30% à la commande",
            SpecialLineKind::Display,
            ValueKind::Fixed,
            dec!(240),
            Scope::Global,
        ));

        let b_with = service.price_devis(&with).await.unwrap();
        let b_without = service.price_devis(&without).await.unwrap();
        assert!(invariant_display_lines_neutral(&b_with, &b_without));
        assert_eq!(
            b_with.delta_for(SpecialLineId::from_u128(1)),
            Some(dec!(0))
        );
    }

    #[tokio::test]
    async fn test_totals_reconstructed_from_serialized_tree_alone() {
        init_tracing();
        let service = DevisPricingService::new();

        let devis = two_sous_parties_devis().with_special_line(
            special(
                1,
                "Remise fidélité",
                SpecialLineKind::Reduction,
                ValueKind::Percentage,
                dec!(4),
                Scope::Global,
            )
            .with_base_ref(BaseReference::partie(PartieId::from_u128(1), "Gros œuvre")),
        );

        let expected = service.price_devis(&devis).await.unwrap();

        // Round-trip through the persisted representation: no amount is
        // stored, so the reloaded tree must price identically.
        let json = serde_json::to_string(&devis).unwrap();
        let reloaded: devis_engine::Devis = serde_json::from_str(&json).unwrap();
        let recomputed = service.price_devis(&reloaded).await.unwrap();

        assert_eq!(expected, recomputed);
        assert_eq!(recomputed.global, dec!(768.00));
    }
}
