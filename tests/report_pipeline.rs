use indicatif::ProgressBar;
use lambda_cost::billing::{Measured, Usd};
use lambda_cost::collect::{MetricsSource, SnapshotSource};
use lambda_cost::config::Config;
use lambda_cost::core::CostEstimator;
use lambda_cost::output::{format_total, save_csv};
use std::sync::Arc;

const SNAPSHOT: &str = r#"[
    {"function_name": "thumbnailer", "region": "us-east-1", "memory_size_mb": 512, "avg_duration_ms": 250.0, "invocations": 1000.0},
    {"function_name": "nightly-report", "region": "eu-west-1", "memory_size_mb": 128, "avg_duration_ms": 0.0, "invocations": 12.0},
    {"function_name": "ingest", "region": "eu-west-1", "memory_size_mb": 1536, "avg_duration_ms": 1450.2, "invocations": 20000.0}
]"#;

#[tokio::test]
async fn snapshot_to_csv() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("usage.json");
    let output = dir.path().join("costs.csv");
    std::fs::write(&input, SNAPSHOT).unwrap();

    let source: Arc<dyn MetricsSource> = Arc::new(SnapshotSource::from_path(&input).unwrap());
    let regions = source.regions().await.unwrap();
    assert_eq!(regions, vec!["us-east-1", "eu-west-1"]);

    let estimator = CostEstimator::from_config(&Config::default()).unwrap();
    let report = estimator
        .run(
            source,
            &regions,
            &ProgressBar::hidden(),
            std::future::pending(),
        )
        .await
        .unwrap();

    // 15 intervals * 0.000002501 * 20000 + 20000 * 0.0000002 = 0.7543
    let ingest = &report.rows[0];
    assert_eq!(ingest.function_name, "ingest");
    assert_eq!(ingest.duration_ms, Measured::Value(1450));
    assert_eq!(ingest.daily_cost.to_string(), "0.754");
    assert_eq!(ingest.monthly_cost.to_string(), "22.629");

    let thumbnailer = &report.rows[1];
    assert_eq!(thumbnailer.function_name, "thumbnailer");
    assert!(matches!(thumbnailer.monthly_cost, Measured::Value(Usd(v)) if (v - 0.08106).abs() < 1e-12));

    let nightly = &report.rows[2];
    assert_eq!(nightly.function_name, "nightly-report");
    assert_eq!(nightly.invocations, Measured::NotAvailable);

    // 22.629 + 0.08106 + 12 requests priced at the per-invocation rate
    let expected_total = 0.7543 * 30.0 + 0.08106 + 12.0 * 0.0000002 * 30.0;
    assert!((report.total_monthly_cost - expected_total).abs() < 1e-9);
    assert_eq!(format_total(&report), "Total monthly cost estimation: $22.710");

    save_csv(&report, &output).unwrap();
    let csv = std::fs::read_to_string(&output).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[1], "ingest,eu-west-1,1536,1450,20000,0.754,22.629");
    assert_eq!(lines[2], "thumbnailer,us-east-1,512,250,1000,0.003,0.081");
    assert_eq!(lines[3], "nightly-report,eu-west-1,128,N/A,N/A,N/A,N/A");
}
