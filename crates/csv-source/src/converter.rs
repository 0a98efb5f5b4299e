//! CSV to DynamoDB item conversion.
//!
//! The converter owns the CSV reader and the column list. Columns come from
//! the schema when it names them explicitly, otherwise from the first row.

use crate::error::ConvertError;
use csv::StringRecord;
use csv_types::CsvStringWithKind;
use import_core::{Delimiter, ImportSchema, Item, MAX_BATCH_SIZE};
use std::collections::HashSet;
use std::io::Read;
use tracing::{debug, warn};

/// Items returned by one [`Converter::read_batch`] call.
#[derive(Debug, Default)]
pub struct ReadBatch {
    pub items: Vec<Item>,
    /// The input is exhausted; no later call returns items.
    pub end_of_input: bool,
}

impl ReadBatch {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Converts CSV rows to DynamoDB items.
pub struct Converter<R: Read> {
    reader: csv::Reader<R>,
    schema: ImportSchema,
    columns: Vec<String>,
    record: StringRecord,
    exhausted: bool,
    conversion_fallbacks: u64,
    /// Columns whose first fallback has been logged at warn level.
    warned_columns: HashSet<String>,
}

impl<R: Read> Converter<R> {
    /// Create a converter, reading the header row unless the schema supplies
    /// explicit columns.
    ///
    /// An input without any rows and without explicit columns produces a
    /// converter that is already exhausted.
    pub fn new(
        reader: R,
        delimiter: Delimiter,
        schema: ImportSchema,
    ) -> Result<Self, ConvertError> {
        // Arity is checked against the header, not against the first record
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(delimiter.as_byte())
            .from_reader(reader);

        let mut record = StringRecord::new();
        let (columns, exhausted) = match schema.columns() {
            Some(columns) => (columns.to_vec(), false),
            None => {
                if reader.read_record(&mut record)? {
                    (header_columns(&record)?, false)
                } else {
                    (Vec::new(), true)
                }
            }
        };

        Ok(Self {
            reader,
            schema,
            columns,
            record,
            exhausted,
            conversion_fallbacks: 0,
            warned_columns: HashSet::new(),
        })
    }

    /// Column names in the order they appear in each row.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Read and convert a single row. Returns `None` at the end of input.
    pub fn read(&mut self) -> Result<Option<Item>, ConvertError> {
        if self.exhausted {
            return Ok(None);
        }
        if !self.reader.read_record(&mut self.record)? {
            self.exhausted = true;
            return Ok(None);
        }

        if self.record.len() != self.columns.len() {
            return Err(ConvertError::FieldCount {
                line: self.record.position().map(|p| p.line()).unwrap_or_default(),
                expected: self.columns.len(),
                found: self.record.len(),
            });
        }

        let mut item = Item::with_capacity(self.columns.len());
        for (column, value) in self.columns.iter().zip(self.record.iter()) {
            if value.is_empty() || !self.schema.includes(column) {
                continue;
            }
            let kind = self.schema.kind_of(column);
            let (converted, error) = CsvStringWithKind::new(value, kind).to_item_value_lenient();
            if let Some(e) = error {
                if self.warned_columns.insert(column.clone()) {
                    warn!(
                        column = %column,
                        "{e}; storing empty {kind} value (reported once per column)"
                    );
                } else {
                    debug!(column = %column, "{e}; storing empty {kind} value");
                }
                self.conversion_fallbacks += 1;
            }
            item.insert(column.clone(), converted);
        }
        Ok(Some(item))
    }

    /// Read up to `size` items.
    ///
    /// `end_of_input` is set on the call that reaches the end of the input,
    /// whether or not it returned any items.
    pub fn read_batch(&mut self, size: usize) -> Result<ReadBatch, ConvertError> {
        let mut items = Vec::with_capacity(size);
        while items.len() < size {
            match self.read()? {
                Some(item) => items.push(item),
                None => {
                    return Ok(ReadBatch {
                        items,
                        end_of_input: true,
                    })
                }
            }
        }
        Ok(ReadBatch {
            items,
            end_of_input: false,
        })
    }

    /// Read a batch of the DynamoDB request limit (25 items).
    pub fn read_default_batch(&mut self) -> Result<ReadBatch, ConvertError> {
        self.read_batch(MAX_BATCH_SIZE)
    }

    /// Number of fields stored as fallback values since the last call.
    pub fn take_conversion_fallbacks(&mut self) -> u64 {
        std::mem::take(&mut self.conversion_fallbacks)
    }
}

/// Column names of a header row. Each name must be unique.
fn header_columns(record: &StringRecord) -> Result<Vec<String>, ConvertError> {
    let mut seen = HashSet::with_capacity(record.len());
    for name in record {
        if !seen.insert(name) {
            return Err(ConvertError::DuplicateHeader(name.to_string()));
        }
    }
    Ok(record.iter().map(str::to_string).collect())
}
