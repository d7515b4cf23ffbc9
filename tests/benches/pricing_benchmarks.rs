//! Aggregator benchmarks over realistic quote sizes

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use devis_tests::fixtures::grid_devis;
use devis_engine::{
    compute_totals, BaseReference, PricingConfig, Scope, SpecialLine, SpecialLineId,
    SpecialLineKind, ValueKind,
};
use rust_decimal_macros::dec;

fn bench_compute_totals(c: &mut Criterion) {
    let config = PricingConfig::default();
    let mut group = c.benchmark_group("compute_totals");

    for (parties, sous_parties, lignes) in [(2, 3, 5), (5, 5, 10), (10, 10, 10)] {
        let devis = grid_devis(parties, sous_parties, lignes, dec!(3), dec!(42.90));
        let total_lignes = parties * sous_parties * lignes;
        group.bench_with_input(
            BenchmarkId::from_parameter(total_lignes),
            &devis,
            |b, devis| b.iter(|| compute_totals(black_box(devis), &config).unwrap()),
        );
    }
    group.finish();
}

fn bench_compute_totals_with_special_lines(c: &mut Criterion) {
    let config = PricingConfig::default();
    let devis = grid_devis(5, 5, 10, dec!(3), dec!(42.90));
    let partie_id = devis.parties[0].id;
    let devis = devis
        .with_special_line(SpecialLine::new(
            SpecialLineId::from_u128(1),
            "Remise commerciale",
            SpecialLineKind::Reduction,
            ValueKind::Fixed,
            dec!(150),
            Scope::Partie(partie_id),
        ))
        .with_special_line(
            SpecialLine::new(
                SpecialLineId::from_u128(2),
                "Majoration site occupé",
                SpecialLineKind::Addition,
                ValueKind::Percentage,
                dec!(5),
                Scope::Global,
            )
            .with_base_ref(BaseReference::partie(partie_id, "Partie 0")),
        );

    c.bench_function("compute_totals/with_special_lines", |b| {
        b.iter(|| compute_totals(black_box(&devis), &config).unwrap())
    });
}

criterion_group!(
    benches,
    bench_compute_totals,
    bench_compute_totals_with_special_lines
);
criterion_main!(benches);
