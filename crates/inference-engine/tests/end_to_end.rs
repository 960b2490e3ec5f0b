use artifact_store::{ArtifactStore, Column};
use data_validator::RawRecord;
use feature_engine::FallbackPolicy;
use inference_engine::{InferenceContext, RiskClass};
use proptest::prelude::*;
use serde_json::json;
use std::sync::Arc;

fn context(policy: FallbackPolicy) -> InferenceContext {
    let store = ArtifactStore::load(concat!(env!("CARGO_MANIFEST_DIR"), "/../../artifacts"))
        .expect("demo artifacts");
    InferenceContext::new(Arc::new(store), policy)
}

fn scenario() -> RawRecord {
    serde_json::from_value(json!({
        "gender": "Male",
        "age": 67.0,
        "hypertension": 0,
        "heart_disease": 1,
        "ever_married": "Yes",
        "work_type": "Private",
        "residence_type": "Urban",
        "avg_glucose_level": 228.69,
        "bmi": 36.6,
        "smoking_status": "formerly smoked"
    }))
    .expect("raw record")
}

#[test]
fn scenario_prediction_is_reproducible() {
    let first = context(FallbackPolicy::FirstClass).predict(&scenario()).unwrap();
    let second = context(FallbackPolicy::FirstClass).predict(&scenario()).unwrap();

    assert_eq!(first.prediction, second.prediction);
    assert_eq!(first.features, second.features);
    assert!(first.defaulted.is_empty());
    assert!(first.fallbacks.is_empty());

    // Leaves reached in the five demo trees
    let expected = (40.0 / 60.0 + 30.0 / 45.0 + 40.0 / 1040.0 + 50.0 / 110.0 + 35.0 / 60.0) / 5.0;
    assert!((first.prediction.probability - expected).abs() < 1e-9);
    assert_eq!(first.prediction.class, RiskClass::NoRisk);
}

#[test]
fn unseen_work_type_does_not_fail() {
    let context = context(FallbackPolicy::FirstClass);
    let mut freelance = scenario();
    freelance.insert("work_type", "Freelance");
    let mut first_class = scenario();
    first_class.insert("work_type", "Govt_job");

    let unseen = context.predict(&freelance).unwrap();
    let known = context.predict(&first_class).unwrap();

    assert_eq!(
        unseen.features.raw_value(Column::WorkType),
        known.features.raw_value(Column::WorkType)
    );
    assert_eq!(unseen.features.raw_value(Column::WorkType), 0.0);
    assert_eq!(unseen.prediction, known.prediction);
    assert_eq!(unseen.fallbacks.len(), 1);
}

#[test]
fn all_defaults_record_predicts() {
    let raw = RawRecord::new().with("age", 67.0).with("avg_glucose_level", 228.69);
    let output = context(FallbackPolicy::FirstClass).predict(&raw).unwrap();

    assert!(matches!(output.prediction.label(), 0 | 1));
    assert!((0.0..=1.0).contains(&output.prediction.probability));
    assert_eq!(
        output.features.raw_value(Column::Bmi),
        context(FallbackPolicy::FirstClass).store().bmi_mean()
    );
}

#[test]
fn residence_spelling_does_not_change_prediction() {
    let context = context(FallbackPolicy::FirstClass);
    let lower = scenario();
    let mut canonical = scenario();
    let value = canonical.remove("residence_type").unwrap();
    canonical.insert("Residence_type", value);

    assert_eq!(
        context.predict(&lower).unwrap().features,
        context.predict(&canonical).unwrap().features
    );
}

#[test]
fn empty_bmi_string_is_imputed() {
    let context = context(FallbackPolicy::FirstClass);
    let mut raw = scenario();
    raw.insert("bmi", "");
    let output = context.predict(&raw).unwrap();
    assert_eq!(output.features.raw_value(Column::Bmi), context.store().bmi_mean());
}

proptest! {
    #[test]
    fn probability_always_in_unit_interval(
        age in 0.0f64..100.0,
        glucose in 50.0f64..300.0,
        bmi in 10.0f64..60.0,
        hypertension in 0u8..=1,
        heart in 0u8..=1,
    ) {
        let mut raw = scenario();
        raw.insert("age", age);
        raw.insert("avg_glucose_level", glucose);
        raw.insert("bmi", bmi);
        raw.insert("hypertension", hypertension);
        raw.insert("heart_disease", heart);

        let output = context(FallbackPolicy::MostFrequent).predict(&raw).unwrap();
        prop_assert!((0.0..=1.0).contains(&output.prediction.probability));
        prop_assert!(output.prediction.label() <= 1);
    }
}
