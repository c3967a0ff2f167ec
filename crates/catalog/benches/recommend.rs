//! Benchmarks for the recommend hot path
//!
//! Run with: cargo bench --package catalog

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use catalog::{RecommendationService, Selection};
use schema::{Category, RecommendationRequest};

fn bench_recommend_in_order(c: &mut Criterion) {
    let service = RecommendationService::default();
    let request = RecommendationRequest::new(1, Category::SelfHelp, 3);

    c.bench_function("recommend_in_order", |b| {
        b.iter(|| {
            let response = service.recommend(black_box(&request)).unwrap();
            black_box(response)
        })
    });
}

fn bench_recommend_random(c: &mut Criterion) {
    let service = RecommendationService::default().with_selection(Selection::Random);
    let request = RecommendationRequest::new(1, Category::Mystery, 2);

    c.bench_function("recommend_random", |b| {
        b.iter(|| {
            let response = service.recommend(black_box(&request)).unwrap();
            black_box(response)
        })
    });
}

criterion_group!(benches, bench_recommend_in_order, bench_recommend_random);
criterion_main!(benches);
