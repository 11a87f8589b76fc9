//! Cascade Integration Tests
//!
//! End-to-end runs of the four-phase engine through the public API: input
//! selection, failure propagation, phase gating, confidence aggregation
//! and batch behaviour.

use eutrophia::{
    Engine, FailureKind, IndicatorKind, Measurements, PhaseDepth, Term,
};
use eutrophia::MeasurementCode::{Bod, Cod, O2Dis, Pn, Ph, Tdn, Temp, Tn, Tp, Trans, Ts, Turb};

fn full_sample() -> Measurements {
    Measurements::new()
        .with(Tn, 1.5)
        .with(Tp, 0.03)
        .with(O2Dis, 8.0)
        .with(Bod, 4.0)
        .with(Cod, 20.0)
        .with(Ts, 600.0)
        .with(Trans, 2.5)
        .with(Turb, 12.0)
        .with(Temp, 20.0)
        .with(Ph, 7.4)
}

fn depth(n: u8) -> PhaseDepth {
    PhaseDepth::try_from(n).expect("depth in 1..=4")
}

// ============================================================================
// Reference scenarios
// ============================================================================

#[test]
fn temperature_and_ph_resolve_additional_conditions_jointly() {
    let sample = Measurements::new().with(Temp, 22.0).with(Ph, 7.2);
    let chain = eutrophia::infer(&sample, PhaseDepth::FULL);

    let additional = chain
        .result(IndicatorKind::AdditionalConditions)
        .expect("result present");
    assert_eq!(additional.calculation_method, Some("TEMP_pH"));
    assert_eq!(additional.label, Some(Term::Favorable));
    assert_eq!(additional.confidence, 1.0);
}

#[test]
fn nitrogen_alone_cannot_define_nutrient_level() {
    let sample = Measurements::new().with(Tn, 0.2);
    let chain = eutrophia::infer(&sample, PhaseDepth::FULL);

    let nitrogen = chain.result(IndicatorKind::NitrogenLevel).expect("present");
    assert_eq!(nitrogen.calculation_method, Some("TN"));
    assert_eq!(nitrogen.label, Some(Term::Low));

    assert!(!chain.is_defined(IndicatorKind::PhosphorusLevel));
    assert_eq!(
        chain.error(IndicatorKind::PhosphorusLevel).map(|f| f.kind),
        Some(FailureKind::InsufficientInput)
    );
    assert_eq!(
        chain
            .result(IndicatorKind::PhosphorusLevel)
            .map(|r| r.label_str()),
        Some("UNKNOWN")
    );

    assert!(!chain.is_defined(IndicatorKind::NutrientLevel));
    assert_eq!(
        chain.error(IndicatorKind::NutrientLevel).map(|f| f.kind),
        Some(FailureKind::UpstreamUndefined)
    );
}

#[test]
fn dissolved_plus_particulate_nitrogen_stands_in_for_total() {
    let sample = Measurements::new().with(Tdn, 1.0).with(Pn, 0.5);
    let chain = eutrophia::infer(&sample, PhaseDepth::FULL);

    let nitrogen = chain.result(IndicatorKind::NitrogenLevel).expect("present");
    assert_eq!(nitrogen.calculation_method, Some("TDN_PN"));
    assert!(nitrogen.is_defined());
    assert_ne!(nitrogen.label_str(), "UNKNOWN");

    // Same value as a direct TN reading of 1.5.
    let direct = eutrophia::infer(&Measurements::new().with(Tn, 1.5), PhaseDepth::FULL);
    assert_eq!(
        nitrogen.value,
        direct.value(IndicatorKind::NitrogenLevel)
    );
}

#[test]
fn empty_sample_yields_unknown_everywhere_without_panicking() {
    let chain = eutrophia::infer(&Measurements::new(), PhaseDepth::FULL);

    assert_eq!(chain.results.len(), IndicatorKind::ALL.len());
    assert_eq!(chain.errors.len(), IndicatorKind::ALL.len());
    for kind in IndicatorKind::ALL {
        let result = chain.result(kind).expect("every indicator reported");
        assert_eq!(result.value, None, "{kind}");
        assert_eq!(result.label_str(), "UNKNOWN");
        assert_eq!(result.confidence, 0.0);
    }
    assert_eq!(chain.final_confidence(), 0.0);
}

#[test]
fn identical_input_gives_bit_identical_confidence() {
    let engine = Engine::new();
    let a = engine.infer(&full_sample(), PhaseDepth::FULL);
    let b = engine.infer(&full_sample(), PhaseDepth::FULL);

    assert_eq!(
        a.final_confidence().to_bits(),
        b.final_confidence().to_bits()
    );
    assert_eq!(a, b);
}

// ============================================================================
// Resolution and propagation
// ============================================================================

#[test]
fn total_nitrogen_wins_over_derived_sum() {
    let both = full_sample().with(Tdn, 3.0).with(Pn, 2.0);
    let chain = eutrophia::infer(&both, PhaseDepth::FULL);
    let nitrogen = chain.result(IndicatorKind::NitrogenLevel).expect("present");

    assert_eq!(nitrogen.calculation_method, Some("TN"));
    assert_eq!(
        nitrogen.value,
        eutrophia::infer(&full_sample(), PhaseDepth::FULL).value(IndicatorKind::NitrogenLevel)
    );
}

#[test]
fn transparency_wins_over_turbidity_when_both_present() {
    let chain = eutrophia::infer(
        &Measurements::new().with(Trans, 0.3).with(Turb, 5.0),
        PhaseDepth::FULL,
    );
    let visibility = chain.result(IndicatorKind::VisibilityLevel).expect("present");
    assert_eq!(visibility.calculation_method, Some("TRANS"));
    assert_eq!(visibility.label, Some(Term::Low));
}

#[test]
fn forecasts_outside_unit_interval_are_labelled() {
    let engine = Engine::new();
    assert_eq!(
        engine.label_for(IndicatorKind::NitrogenLevel, 1.2),
        Some(Term::VeryHigh)
    );
    assert_eq!(
        engine.label_for(IndicatorKind::EutrophicationLevel, -0.05),
        Some(Term::Oligotrophic)
    );
}

#[test]
fn out_of_range_measurements_are_clamped_to_the_scale() {
    let engine = Engine::new();
    let beyond = engine.infer(&Measurements::new().with(Tp, 5.0), depth(1));
    let at_edge = engine.infer(&Measurements::new().with(Tp, 0.1), depth(1));

    assert_eq!(
        beyond.result(IndicatorKind::PhosphorusLevel),
        at_edge.result(IndicatorKind::PhosphorusLevel)
    );
    assert_eq!(
        beyond.result(IndicatorKind::PhosphorusLevel).and_then(|r| r.label),
        Some(Term::VeryHigh)
    );
}

#[test]
fn removing_a_measurement_never_raises_confidence() {
    let engine = Engine::new();
    let baseline = engine.infer(&full_sample(), PhaseDepth::FULL).final_confidence();

    for code in [Tn, Tp, O2Dis, Bod, Cod, Ts, Trans, Turb, Temp, Ph] {
        let mut sample = full_sample();
        sample.clear(code);
        let reduced = engine.infer(&sample, PhaseDepth::FULL).final_confidence();
        assert!(
            reduced <= baseline,
            "dropping {code} raised confidence {baseline} -> {reduced}"
        );
    }
}

#[test]
fn labels_agree_with_the_output_scale() {
    let engine = Engine::new();
    let chain = engine.infer(&full_sample(), PhaseDepth::FULL);

    for (kind, result) in &chain.results {
        let value = result.value.expect("full sample defines everything");
        assert_eq!(engine.label_for(*kind, value), result.label, "{kind}");
    }
}

#[test]
fn final_confidence_is_mean_of_phases() {
    let sample = full_sample().with(Temp, f64::NAN);
    let chain = eutrophia::infer(&sample, PhaseDepth::FULL);
    let p = chain.phases;
    let mean = (p.primary + p.nutrients + p.conditions + p.trophic) / 4.0;

    assert!((chain.final_confidence() - mean).abs() < 1e-12);
    assert_eq!(
        chain.eutrophication().map(|r| r.confidence),
        Some(chain.final_confidence())
    );
}

// ============================================================================
// Phase gating
// ============================================================================

#[test]
fn depth_one_only_runs_primary_indicators() {
    let chain = Engine::new().infer(&full_sample(), depth(1));

    for kind in IndicatorKind::ALL {
        let primary = kind.phase().number() == 1;
        assert_eq!(chain.is_defined(kind), primary, "{kind}");
        if !primary {
            assert_eq!(chain.error(kind).map(|f| f.kind), Some(FailureKind::Skipped));
        }
    }
    assert_eq!(chain.phases.primary, 1.0);
    assert_eq!(chain.final_confidence(), 0.25);
}

#[test]
fn gated_indicators_match_the_full_run() {
    let engine = Engine::new();
    let partial = engine.infer(&full_sample(), depth(2));
    let full = engine.infer(&full_sample(), PhaseDepth::FULL);

    for kind in IndicatorKind::ALL.into_iter().filter(|k| k.phase().number() <= 2) {
        assert_eq!(partial.result(kind), full.result(kind), "{kind}");
    }
}

// ============================================================================
// Batches
// ============================================================================

#[test]
fn batch_preserves_row_order() {
    let rows = vec![
        Measurements::new(),
        full_sample(),
        Measurements::new().with(Tn, 0.2),
    ];
    let chains = eutrophia::infer_batch(&rows, PhaseDepth::FULL);

    assert_eq!(chains.len(), 3);
    assert_eq!(chains[0].final_confidence(), 0.0);
    assert_eq!(chains[1].final_confidence(), 1.0);
    assert!(chains[2].is_defined(IndicatorKind::NitrogenLevel));
    assert!(!chains[2].is_defined(IndicatorKind::PhosphorusLevel));
}

#[test]
fn parallel_batch_equals_sequential_batch() {
    let engine = Engine::new();
    let rows: Vec<Measurements> = (0..200)
        .map(|i| {
            let f = f64::from(i) / 200.0;
            full_sample()
                .with(Tp, 0.005 + 0.09 * f)
                .with(Turb, 150.0 * f)
        })
        .collect();

    assert_eq!(
        engine.infer_batch(&rows, PhaseDepth::FULL),
        engine.infer_batch_parallel(&rows, PhaseDepth::FULL)
    );
}

#[test]
fn samples_deserialize_from_json_rows() {
    let json = r#"[
        {"TN": 0.2, "TP": null, "salinity": 35.0},
        {"TEMP": 22.0, "pH": 7.2}
    ]"#;
    let rows: Vec<Measurements> = serde_json::from_str(json).expect("valid rows");
    assert_eq!(rows[0].get(Tn), Some(0.2));
    assert_eq!(rows[0].get(Tp), None);

    let chains = eutrophia::infer_batch(&rows, PhaseDepth::FULL);
    assert_eq!(
        chains[1]
            .result(IndicatorKind::AdditionalConditions)
            .and_then(|r| r.label),
        Some(Term::Favorable)
    );
}
