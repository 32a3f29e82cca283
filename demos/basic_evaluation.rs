//! Basic evaluation example demonstrating core functionality.

use voc_eval::{
    evaluate, evaluator::evaluate_confidence_sweep, load_config_from_str, load_records_from_str,
    metrics::iou::calculate_iou, nms::{non_maximum_suppression, NmsConfig},
    threshold::generate_threshold_range, BoundingBox, MatchingScheme,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    println!("=== VOC Evaluation Example ===\n");

    // Example 1: IoU Calculation
    println!("1. IoU Calculation");
    let bbox1 = BoundingBox::new(10.0, 10.0, 60.0, 60.0)?;
    let bbox2 = BoundingBox::new(30.0, 30.0, 80.0, 80.0)?;
    let iou = calculate_iou(&bbox1, &bbox2);
    println!("   IoU between overlapping boxes: {:.4}", iou);
    println!();

    // Example 2: Non-maximum suppression
    println!("2. Non-Maximum Suppression");
    let boxes = vec![
        BoundingBox::new(100.0, 100.0, 200.0, 180.0)?,
        BoundingBox::new(104.0, 98.0, 203.0, 182.0)?,
        BoundingBox::new(350.0, 200.0, 450.0, 320.0)?,
    ];
    let scores = vec![0.92, 0.85, 0.77];
    let kept = non_maximum_suppression(&boxes, &scores, &NmsConfig::default())?;
    println!("   Kept {} of {} boxes: {:?}", kept.count, boxes.len(), kept.keep);
    println!();

    // Example 3: Load detections and ground truth
    println!("3. Loading Records");
    let records_json = r#"[
        {
            "image_id": 1,
            "predictions": [
                {"bbox": [100.0, 100.0, 200.0, 180.0], "score": 0.92, "class_id": 0},
                {"bbox": [104.0, 98.0, 203.0, 182.0], "score": 0.85, "class_id": 0},
                {"bbox": [350.0, 200.0, 450.0, 320.0], "score": 0.77, "class_id": 1}
            ],
            "ground_truths": [
                {"bbox": [102.0, 101.0, 199.0, 181.0], "class_id": 0},
                {"bbox": [348.0, 203.0, 452.0, 318.0], "class_id": 1}
            ]
        },
        {
            "image_id": 2,
            "predictions": [
                {"bbox": [10.0, 10.0, 40.0, 40.0], "score": 0.64, "class_id": 0}
            ],
            "ground_truths": [
                {"bbox": [300.0, 300.0, 380.0, 390.0], "class_id": 0}
            ]
        },
        {
            "image_id": 3,
            "ground_truths": [
                {"bbox": [20.0, 20.0, 90.0, 120.0], "class_id": 1}
            ]
        }
    ]"#;
    let records = load_records_from_str(records_json)?;
    println!("   Loaded {} images", records.len());
    println!();

    // Example 4: Image-level evaluation (default)
    println!("4. Image-Level Evaluation");
    let config = load_config_from_str(r#"{"iou_threshold": 0.5, "nms_top_k": 200}"#)?;
    let report = evaluate(&records, &config)?;
    println!("   Recall:    {:?}", report.recall());
    println!("   Precision: {:?}", report.precision());
    println!("   AP:        {:.4}", report.average_precision());
    println!("   {}", report.stats.summary());
    println!();

    // Example 5: Per-object evaluation
    println!("5. Per-Object Evaluation");
    let per_object = config.with_matching_scheme(MatchingScheme::PerObject);
    let report = evaluate(&records, &per_object)?;
    println!("   Recall:    {:?}", report.recall());
    println!("   Precision: {:?}", report.precision());
    println!("   AP:        {:.4}", report.average_precision());
    println!();

    println!("6. Report as JSON");
    println!("{}", serde_json::to_string_pretty(&report.result)?);
    println!();

    // Example 7: Confidence sweep
    println!("7. Confidence Sweep");
    let thresholds = generate_threshold_range(0.0, 0.9, 4)?;
    for (threshold, report) in evaluate_confidence_sweep(&records, &per_object, &thresholds)? {
        println!(
            "   score > {:.2}: AP {:.4}, {} below confidence",
            threshold,
            report.average_precision(),
            report.stats.predictions_below_confidence
        );
    }

    Ok(())
}
