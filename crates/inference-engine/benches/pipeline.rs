use artifact_store::ArtifactStore;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use data_validator::RawRecord;
use feature_engine::FallbackPolicy;
use inference_engine::InferenceContext;
use std::sync::Arc;

fn sample_record() -> RawRecord {
    RawRecord::new()
        .with("gender", "Male")
        .with("age", 67.0)
        .with("hypertension", 0)
        .with("heart_disease", 1)
        .with("ever_married", "Yes")
        .with("work_type", "Private")
        .with("residence_type", "Urban")
        .with("avg_glucose_level", 228.69)
        .with("bmi", 36.6)
        .with("smoking_status", "formerly smoked")
}

fn bench_pipeline(c: &mut Criterion) {
    let store = ArtifactStore::load(concat!(env!("CARGO_MANIFEST_DIR"), "/../../artifacts"))
        .expect("demo artifacts");
    let context = InferenceContext::new(Arc::new(store), FallbackPolicy::FirstClass);
    let record = sample_record();

    c.bench_function("predict single record", |b| {
        b.iter(|| context.predict(black_box(&record)))
    });

    let batch: Vec<RawRecord> = (0..64).map(|_| sample_record()).collect();
    c.bench_function("predict batch of 64", |b| {
        b.iter(|| context.predict_batch(black_box(&batch)))
    });
}

criterion_group!(benches, bench_pipeline);
criterion_main!(benches);
