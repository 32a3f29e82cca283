use criterion::{black_box, criterion_group, criterion_main, Criterion, BenchmarkId};
use voc_eval::accumulator::MetricAccumulator;
use voc_eval::config::EvalConfig;
use voc_eval::evaluator::evaluate;
use voc_eval::metrics::{calculate_ap, calculate_iou, ApMethod};
use voc_eval::nms::{non_maximum_suppression, NmsConfig};
use voc_eval::types::{BoundingBox, GroundTruth, ImageRecord, Prediction};

fn square(offset: f64, size: f64) -> BoundingBox {
    BoundingBox::new(offset, offset, offset + size, offset + size).unwrap()
}

fn bench_iou_calculation(c: &mut Criterion) {
    let bbox1 = square(10.0, 50.0);
    let bbox2 = square(30.0, 50.0);

    c.bench_function("iou_single", |b| {
        b.iter(|| {
            calculate_iou(black_box(&bbox1), black_box(&bbox2))
        });
    });
}

fn bench_nms(c: &mut Criterion) {
    let mut group = c.benchmark_group("nms");

    for num_boxes in [10, 50, 100, 500].iter() {
        let boxes: Vec<BoundingBox> = (0..*num_boxes)
            .map(|i| square((i as f64) * 10.0, 50.0))
            .collect();
        let scores: Vec<f64> = (0..*num_boxes)
            .map(|i| 0.9 - (i as f64) * 0.001)
            .collect();
        let config = NmsConfig { top_k: *num_boxes, ..NmsConfig::default() };

        group.bench_with_input(BenchmarkId::from_parameter(num_boxes), num_boxes, |b, _| {
            b.iter(|| {
                non_maximum_suppression(black_box(&boxes), black_box(&scores), black_box(&config))
            });
        });
    }
    group.finish();
}

fn bench_nms_overlapping(c: &mut Criterion) {
    // Heavily overlapping boxes, default top-k of 200
    let boxes: Vec<BoundingBox> = (0..300)
        .map(|i| square(10.0 + (i as f64) * 0.1, 50.0))
        .collect();
    let scores: Vec<f64> = (0..300).map(|i| 0.9 - (i as f64) * 0.002).collect();

    c.bench_function("nms_overlapping_300", |b| {
        b.iter(|| {
            non_maximum_suppression(black_box(&boxes), black_box(&scores), black_box(&NmsConfig::default()))
        });
    });
}

fn bench_ap_calculation(c: &mut Criterion) {
    let mut group = c.benchmark_group("ap_calculation");

    for num_points in [10, 100, 1000, 10000].iter() {
        let flags: Vec<bool> = (0..*num_points).map(|i| i % 3 != 0).collect();
        let accumulator = MetricAccumulator::default();

        group.bench_with_input(BenchmarkId::from_parameter(num_points), num_points, |b, _| {
            b.iter(|| {
                accumulator.accumulate_flags(black_box(&flags), black_box(*num_points))
            });
        });
    }
    group.finish();

    let recall: Vec<f64> = (0..1000).map(|i| i as f64 / 1000.0).collect();
    let precision: Vec<f64> = (0..1000).map(|i| 1.0 - i as f64 / 1000.0).collect();
    c.bench_function("ap_eleven_point_1000", |b| {
        b.iter(|| {
            calculate_ap(black_box(&recall), black_box(&precision), ApMethod::ElevenPoint)
        });
    });
}

fn bench_full_evaluation(c: &mut Criterion) {
    let records: Vec<ImageRecord> = (0..500)
        .map(|i| {
            let target = square((i % 20) as f64 * 5.0, 40.0);
            let predictions = (0..20)
                .map(|j| Prediction::new(square((i % 20) as f64 * 5.0 + j as f64, 40.0), 0.95 - j as f64 * 0.04, 0).unwrap())
                .collect();
            ImageRecord::new(i, predictions, vec![GroundTruth::new(target, 0)])
        })
        .collect();

    let mut group = c.benchmark_group("evaluate_500_images");
    group.bench_function("parallel", |b| {
        b.iter(|| evaluate(black_box(&records), &EvalConfig::default()))
    });
    group.bench_function("sequential", |b| {
        b.iter(|| evaluate(black_box(&records), &EvalConfig::default().sequential()))
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_iou_calculation,
    bench_nms,
    bench_nms_overlapping,
    bench_ap_calculation,
    bench_full_evaluation,
);
criterion_main!(benches);
