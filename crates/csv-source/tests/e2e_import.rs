//! End-to-end tests of the local import pipeline against in-memory sinks.

use anyhow::Result;
use csv_source::{run_import, ImportConfig};
use dynamo_sink::BatchSink;
use import_core::{
    Delimiter, Item, ItemValue, JobConfiguration, JobDescription, JobSource, JobTarget,
    SourceLocation,
};
use std::collections::HashMap;
use std::io::Write;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::NamedTempFile;

/// Records every batch it receives.
#[derive(Default)]
struct RecordingSink {
    batches: Mutex<Vec<Vec<Item>>>,
}

impl RecordingSink {
    fn items(&self) -> Vec<Item> {
        self.batches.lock().unwrap().iter().flatten().cloned().collect()
    }
}

#[async_trait::async_trait]
impl BatchSink for RecordingSink {
    async fn write_batch(&self, items: &[Item]) -> Result<()> {
        // Yield so that writers interleave
        tokio::task::yield_now().await;
        self.batches.lock().unwrap().push(items.to_vec());
        Ok(())
    }
}

/// Fails every call after the first `allowed` batches.
struct FailingSink {
    allowed: usize,
    calls: AtomicUsize,
}

#[async_trait::async_trait]
impl BatchSink for FailingSink {
    async fn write_batch(&self, _items: &[Item]) -> Result<()> {
        if self.calls.fetch_add(1, Ordering::SeqCst) >= self.allowed {
            anyhow::bail!("ProvisionedThroughputExceededException");
        }
        Ok(())
    }
}

fn write_csv(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

fn config_for(path: &Path, concurrency: usize) -> ImportConfig {
    let mut source = JobSource::new(SourceLocation::Local {
        path: path.to_path_buf(),
    });
    source.numeric_fields = vec!["id".to_string()];
    source.boolean_fields = vec!["active".to_string()];

    let mut config = ImportConfig::new(JobDescription {
        source,
        configuration: JobConfiguration {
            concurrency,
            ..JobConfiguration::default()
        },
        target: JobTarget {
            region: "eu-west-2".to_string(),
            table_name: "ddbimport".to_string(),
        },
    });
    config.queue_capacity = 4;
    config.progress_interval = Duration::from_millis(50);
    config
}

fn rows(count: usize) -> String {
    let mut csv = String::from("id,name,active\n");
    for i in 0..count {
        csv.push_str(&format!("{i},name-{i},{}\n", i % 2 == 0));
    }
    csv
}

#[tokio::test]
async fn test_every_row_written_exactly_once() {
    let file = write_csv(&rows(1_013));
    let sink = Arc::new(RecordingSink::default());

    let summary = run_import(&config_for(file.path(), 8), sink.clone())
        .await
        .unwrap();

    assert_eq!(summary.records, 1_013);
    assert_eq!(summary.batches, 41);
    assert_eq!(summary.workers.len(), 8);
    assert_eq!(summary.conversion_fallbacks, 0);

    let batches = sink.batches.lock().unwrap().clone();
    assert!(batches.iter().all(|b| !b.is_empty() && b.len() <= 25));

    let mut seen: HashMap<String, usize> = HashMap::new();
    for item in sink.items() {
        let id = item.get("id").and_then(ItemValue::as_number).unwrap().to_string();
        *seen.entry(id).or_default() += 1;
    }
    assert_eq!(seen.len(), 1_013);
    assert!(seen.values().all(|&count| count == 1));
}

#[tokio::test]
async fn test_items_carry_configured_types() {
    let file = write_csv("id,name,active\n7,seven,TRUE\n8,,false\n");
    let sink = Arc::new(RecordingSink::default());

    run_import(&config_for(file.path(), 1), sink.clone())
        .await
        .unwrap();

    let items = sink.items();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].get("id"), Some(&ItemValue::number("7")));
    assert_eq!(items[0].get("name"), Some(&ItemValue::string("seven")));
    assert_eq!(items[0].get("active"), Some(&ItemValue::Bool(true)));
    assert!(!items[1].contains_key("name"));
    assert_eq!(items[1].get("active"), Some(&ItemValue::Bool(false)));
}

#[tokio::test]
async fn test_tab_separated_input() {
    let file = write_csv("id\tname\n1\ta,b\n");
    let sink = Arc::new(RecordingSink::default());
    let mut config = config_for(file.path(), 2);
    config.job.source.delimiter = Delimiter::Tab;

    run_import(&config, sink.clone()).await.unwrap();

    let items = sink.items();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].get("name"), Some(&ItemValue::string("a,b")));
}

#[tokio::test]
async fn test_conversion_fallbacks_are_counted() {
    let file = write_csv("id,name,active\n1,a,yes\n2,b,no\n3,c,true\n");
    let sink = Arc::new(RecordingSink::default());

    let summary = run_import(&config_for(file.path(), 2), sink.clone())
        .await
        .unwrap();

    assert_eq!(summary.records, 3);
    assert_eq!(summary.conversion_fallbacks, 2);
}

#[tokio::test]
async fn test_empty_input_writes_nothing() {
    let file = write_csv("");
    let sink = Arc::new(RecordingSink::default());

    let summary = run_import(&config_for(file.path(), 4), sink.clone())
        .await
        .unwrap();

    assert_eq!(summary.records, 0);
    assert_eq!(summary.batches, 0);
    assert!(sink.batches.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_header_only_input_writes_nothing() {
    let file = write_csv("id,name,active\n");
    let sink = Arc::new(RecordingSink::default());

    let summary = run_import(&config_for(file.path(), 4), sink.clone())
        .await
        .unwrap();
    assert_eq!(summary.records, 0);
}

#[tokio::test]
async fn test_writer_failure_fails_the_run() {
    let file = write_csv(&rows(500));
    let sink = Arc::new(FailingSink {
        allowed: 3,
        calls: AtomicUsize::new(0),
    });

    let err = run_import(&config_for(file.path(), 2), sink)
        .await
        .unwrap_err();
    let message = format!("{err:#}");
    assert!(message.contains("writers failed"), "{message}");
    assert!(message.contains("ProvisionedThroughputExceededException"), "{message}");
}

#[tokio::test]
async fn test_arity_mismatch_fails_the_run() {
    let file = write_csv("id,name,active\n1,a,true\n2,b\n");
    let sink = Arc::new(RecordingSink::default());

    let err = run_import(&config_for(file.path(), 2), sink)
        .await
        .unwrap_err();
    assert!(format!("{err:#}").contains("Wrong number of fields on line 3"));
}

#[tokio::test]
async fn test_missing_input_fails_before_writing() {
    let sink = Arc::new(RecordingSink::default());
    let config = config_for(Path::new("/nonexistent/ddbimport/data.csv"), 2);

    let err = run_import(&config, sink.clone()).await.unwrap_err();
    assert!(format!("{err:#}").contains("Failed to open input"));
    assert!(sink.batches.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_duplicate_header_fails_before_writing() {
    let file = write_csv("id,name,name\n1,a,b\n");
    let sink = Arc::new(RecordingSink::default());

    let err = run_import(&config_for(file.path(), 2), sink.clone())
        .await
        .unwrap_err();
    assert!(format!("{err:#}").contains("Column 'name' appears more than once"));
    assert!(sink.batches.lock().unwrap().is_empty());
}
