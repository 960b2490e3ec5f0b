use artifact_store::{ArtifactStore, Column};
use data_validator::{FieldValue, Normalizer, RawRecord};
use feature_engine::{CategoricalEncoder, FallbackPolicy, FeatureVectorizer};
use proptest::prelude::*;
use serde_json::json;

fn store() -> ArtifactStore {
    ArtifactStore::load(concat!(env!("CARGO_MANIFEST_DIR"), "/../../artifacts")).expect("load")
}

fn raw_record(
    gender: &str,
    age: f64,
    work_type: &str,
    glucose: f64,
    bmi: Option<f64>,
    smoking: &str,
) -> RawRecord {
    RawRecord::new()
        .with("gender", gender)
        .with("age", age)
        .with("hypertension", 0)
        .with("heart_disease", 1)
        .with("ever_married", "Yes")
        .with("work_type", work_type)
        .with("residence_type", "Urban")
        .with("avg_glucose_level", glucose)
        .with("bmi", json!(bmi))
        .with("smoking_status", smoking)
}

fn category() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("Male".to_string()),
        Just("Female".to_string()),
        Just("Private".to_string()),
        Just("smokes".to_string()),
        "[A-Za-z_ -]{0,12}",
    ]
}

proptest! {
    #[test]
    fn encode_then_vectorize_is_deterministic(
        gender in category(),
        work in category(),
        smoking in category(),
        age in 0.0f64..100.0,
        glucose in 50.0f64..300.0,
        bmi in proptest::option::of(12.0f64..60.0),
    ) {
        let store = store();
        let normalizer = Normalizer::new(&store);
        let encoder = CategoricalEncoder::new(&store, FallbackPolicy::FirstClass);
        let vectorizer = FeatureVectorizer::new(&store);

        let raw = raw_record(&gender, age, &work, glucose, bmi, &smoking);
        let record = normalizer.normalize(&raw);

        let first = vectorizer.vectorize(&encoder.encode(&record)).unwrap();
        let second = vectorizer.vectorize(&encoder.encode(&record)).unwrap();
        for (a, b) in first.scaled.iter().zip(second.scaled.iter()) {
            prop_assert_eq!(a.to_bits(), b.to_bits());
        }
    }

    #[test]
    fn unseen_category_encodes_as_first_class(value in "[a-z]{1,10}[0-9]") {
        let store = store();
        let normalizer = Normalizer::new(&store);
        let encoder = CategoricalEncoder::new(&store, FallbackPolicy::FirstClass);

        for column in Column::CATEGORICAL {
            let first = store.encoder(column).unwrap().first_class().to_string();
            let unseen = normalizer.normalize(&RawRecord::new().with(column.name(), value.clone()));
            let known = normalizer.normalize(&RawRecord::new().with(column.name(), first));

            let unseen = encoder.encode(&unseen);
            let known = encoder.encode(&known);

            prop_assert_eq!(unseen.get(column), known.get(column));
            prop_assert_eq!(unseen.get(column), &FieldValue::Code(0));
        }
    }
}

#[test]
fn missing_bmi_is_imputed_once() {
    let store = store();
    let normalizer = Normalizer::new(&store);
    let encoder = CategoricalEncoder::new(&store, FallbackPolicy::FirstClass);
    let vectorizer = FeatureVectorizer::new(&store);

    let mut raw = raw_record("Male", 67.0, "Private", 228.69, None, "formerly smoked");
    raw.remove("bmi");

    let record = normalizer.normalize(&raw);
    assert_eq!(record.get(Column::Bmi), &FieldValue::Number(store.bmi_mean()));

    let vector = vectorizer.vectorize(&encoder.encode(&record)).unwrap();
    assert_eq!(vector.raw_value(Column::Bmi), store.bmi_mean());
}

#[test]
fn explicit_null_bmi_matches_absent_bmi() {
    let store = store();
    let normalizer = Normalizer::new(&store);
    let encoder = CategoricalEncoder::new(&store, FallbackPolicy::FirstClass);
    let vectorizer = FeatureVectorizer::new(&store);

    let with_null = raw_record("Male", 67.0, "Private", 228.69, None, "formerly smoked");
    let mut absent = with_null.clone();
    absent.remove("bmi");

    let a = vectorizer.vectorize(&encoder.encode(&normalizer.normalize(&with_null))).unwrap();
    let b = vectorizer.vectorize(&encoder.encode(&normalizer.normalize(&absent))).unwrap();
    assert_eq!(a, b);
}

#[test]
fn freelance_work_type_encodes_like_first_class() {
    let store = store();
    let normalizer = Normalizer::new(&store);
    let encoder = CategoricalEncoder::new(&store, FallbackPolicy::FirstClass);

    let freelance = raw_record("Male", 67.0, "Freelance", 228.69, Some(36.6), "formerly smoked");
    let govt = raw_record("Male", 67.0, "Govt_job", 228.69, Some(36.6), "formerly smoked");

    let encoded = encoder.encode_tracked(&normalizer.normalize(&freelance));
    assert_eq!(encoded.record, encoder.encode(&normalizer.normalize(&govt)));
    assert_eq!(encoded.fallbacks.len(), 1);
}
