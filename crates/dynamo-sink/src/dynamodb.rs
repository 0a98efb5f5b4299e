//! DynamoDB batch writer.

use crate::BatchSink;
use anyhow::{Context, Result};
use aws_config::BehaviorVersion;
use aws_sdk_dynamodb::config::Region;
use aws_sdk_dynamodb::primitives::Blob;
use aws_sdk_dynamodb::types::{AttributeValue, PutRequest, WriteRequest};
use import_core::{Item, ItemValue};
use std::collections::HashMap;
use std::time::Duration;
use tokio::time::sleep;

/// Maximum number of resubmissions of unprocessed items
const MAX_RETRIES: u32 = 8;
/// Base delay between resubmissions (doubled per attempt)
const RETRY_BASE_DELAY_MS: u64 = 50;
/// Upper bound of a single resubmission delay
const RETRY_MAX_DELAY_MS: u64 = 5_000;

/// Writes batches to a DynamoDB table with `BatchWriteItem`.
#[derive(Clone)]
pub struct DynamoBatchWriter {
    client: aws_sdk_dynamodb::Client,
    table_name: String,
}

impl DynamoBatchWriter {
    /// Create a writer for a table in the given region
    pub async fn new(region: &str, table_name: &str) -> Result<Self> {
        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .load()
            .await;
        Ok(Self::from_client(
            aws_sdk_dynamodb::Client::new(&sdk_config),
            table_name,
        ))
    }

    pub fn from_client(client: aws_sdk_dynamodb::Client, table_name: &str) -> Self {
        Self {
            client,
            table_name: table_name.to_string(),
        }
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }
}

#[async_trait::async_trait]
impl BatchSink for DynamoBatchWriter {
    async fn write_batch(&self, items: &[Item]) -> Result<()> {
        if items.is_empty() {
            return Ok(());
        }

        let mut requests = items
            .iter()
            .map(|item| {
                let put = PutRequest::builder()
                    .set_item(Some(item_to_attribute_map(item)))
                    .build()
                    .context("Failed to build put request")?;
                Ok(WriteRequest::builder().put_request(put).build())
            })
            .collect::<Result<Vec<_>>>()?;

        let mut attempt = 0;
        loop {
            let output = self
                .client
                .batch_write_item()
                .request_items(&self.table_name, requests)
                .send()
                .await
                .with_context(|| format!("BatchWriteItem failed for table {}", self.table_name))?;

            let unprocessed = output
                .unprocessed_items()
                .and_then(|tables| tables.get(&self.table_name))
                .cloned()
                .unwrap_or_default();

            if unprocessed.is_empty() {
                return Ok(());
            }

            attempt += 1;
            if attempt > MAX_RETRIES {
                anyhow::bail!(
                    "{} items still unprocessed after {MAX_RETRIES} retries",
                    unprocessed.len()
                );
            }

            let delay = (RETRY_BASE_DELAY_MS << attempt.min(16)).min(RETRY_MAX_DELAY_MS);
            tracing::debug!(
                "Retrying {} unprocessed items in {delay}ms ({attempt}/{MAX_RETRIES})",
                unprocessed.len()
            );
            sleep(Duration::from_millis(delay)).await;
            requests = unprocessed;
        }
    }
}

/// Convert a converted item to a DynamoDB attribute map.
pub fn item_to_attribute_map(item: &Item) -> HashMap<String, AttributeValue> {
    item.iter()
        .map(|(name, value)| (name.to_string(), item_value_to_attribute_value(value)))
        .collect()
}

/// Convert a single item value to its SDK representation.
pub fn item_value_to_attribute_value(value: &ItemValue) -> AttributeValue {
    match value {
        ItemValue::String(s) => AttributeValue::S(s.clone()),
        ItemValue::Number(n) => AttributeValue::N(n.clone()),
        ItemValue::Binary(b) => AttributeValue::B(Blob::new(b.clone())),
        ItemValue::Bool(b) => AttributeValue::Bool(*b),
        ItemValue::Null(n) => AttributeValue::Null(*n),
        ItemValue::Map(m) => AttributeValue::M(
            m.iter()
                .map(|(k, v)| (k.clone(), item_value_to_attribute_value(v)))
                .collect(),
        ),
        ItemValue::List(l) => {
            AttributeValue::L(l.iter().map(item_value_to_attribute_value).collect())
        }
        ItemValue::StringSet(ss) => AttributeValue::Ss(ss.clone()),
        ItemValue::NumberSet(ns) => AttributeValue::Ns(ns.clone()),
        ItemValue::BinarySet(bs) => {
            AttributeValue::Bs(bs.iter().map(|b| Blob::new(b.clone())).collect())
        }
    }
}
