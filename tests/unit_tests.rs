use clap::Parser;
use std::io::Write;
use tempfile::NamedTempFile;

use ddbimport::config::split_list;
use ddbimport::{execute, ImportArgs, ImportOutcome, ImportPlan};
use import_core::JobDescription;
use sfn_remote::CancellationToken;

#[derive(Parser)]
struct TestCli {
    #[command(flatten)]
    args: ImportArgs,
}

fn parse(args: &[&str]) -> ImportArgs {
    TestCli::try_parse_from(std::iter::once("ddbimport").chain(args.iter().copied()))
        .unwrap()
        .args
}

#[test]
fn test_cli_defaults() {
    let args = parse(&["--table-region", "eu-west-2", "--table-name", "t"]);

    assert_eq!(args.delimiter, "comma");
    assert_eq!(args.concurrency, 8);
    assert_eq!(args.queue_capacity, 128);
    assert_eq!(args.poll_interval, "5s");
    assert!(!args.remote);
    assert!(!args.dry_run);
    assert!(args.input_file.is_none());
}

#[test]
fn test_remote_job_wire_format() {
    let plan = parse(&[
        "--table-region",
        "eu-west-2",
        "--table-name",
        "t",
        "--bucket-region",
        "eu-west-2",
        "--bucket-name",
        "b",
        "--bucket-key",
        "k.csv",
        "--numeric-fields",
        "a",
        "--boolean-fields",
        "b",
        "--remote",
    ])
    .into_plan()
    .unwrap();
    assert!(matches!(plan, ImportPlan::Remote(_)));

    let json: serde_json::Value = serde_json::from_str(&plan.job().to_json().unwrap()).unwrap();
    let expected = serde_json::json!({
        "source": {
            "region": "eu-west-2",
            "bucket": "b",
            "key": "k.csv",
            "numericFields": ["a"],
            "booleanFields": ["b"],
            "delimiter": ","
        },
        "configuration": {
            "lambdaConcurrency": 8,
            "lambdaDurationSeconds": 900
        },
        "target": {
            "region": "eu-west-2",
            "tableName": "t"
        }
    });
    assert_eq!(json, expected);

    let decoded = JobDescription::from_json(&json.to_string()).unwrap();
    assert_eq!(&decoded, plan.job());
}

#[test]
fn test_split_list_ignores_blanks() {
    assert!(split_list("").is_empty());
    assert_eq!(split_list("a,,b"), vec!["a", "b"]);
}

#[tokio::test]
async fn test_dry_run_local_import() {
    let mut file = NamedTempFile::new().unwrap();
    let mut csv = String::from("id,name,active\n");
    for i in 0..60 {
        csv.push_str(&format!("{i},n{i},TRUE\n"));
    }
    file.write_all(csv.as_bytes()).unwrap();
    file.flush().unwrap();

    let path = file.path().to_str().unwrap().to_string();
    let plan = parse(&[
        "--table-region",
        "eu-west-2",
        "--table-name",
        "t",
        "--input-file",
        &path,
        "--numeric-fields",
        "id",
        "--boolean-fields",
        "active",
        "--concurrency",
        "3",
        "--dry-run",
    ])
    .into_plan()
    .unwrap();

    match execute(plan, CancellationToken::new()).await.unwrap() {
        ImportOutcome::Local(summary) => {
            assert_eq!(summary.records, 60);
            assert_eq!(summary.batches, 3);
            assert_eq!(summary.workers.len(), 3);
        }
        ImportOutcome::Remote(_) => panic!("expected a local import"),
    }
}
