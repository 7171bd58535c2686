//! Typed reading of data files
//!
//! The first record is the header. Every following record is decoded cell by cell with
//! the processors of the column descriptions, and malformed cells are handled according
//! to the [`OnError`] policy.

use std::io::Read;

use crate::description::FieldDescription;
use crate::error::{MetaCsvError, ReadException, Result};
use crate::metadata::MetaCsvData;
use crate::processor::{AnyFieldProcessor, FieldProcessor};
use crate::types::{Cell, DataType, OnError, ReadError, Value};

const BOM: char = '\u{feff}';

/// One decoding column: its description, for error markers, and its processor
#[derive(Debug)]
struct Column {
    description: FieldDescription,
    processor: AnyFieldProcessor,
}

impl Column {
    fn new(description: FieldDescription, null_value: &str) -> Self {
        let processor = description.to_field_processor(null_value);
        Self {
            description,
            processor,
        }
    }

    fn decode(&self, text: &str, on_error: OnError) -> std::result::Result<Cell, ReadException> {
        match self.processor.to_object(Some(text)) {
            Ok(value) => Ok(Cell::from(value)),
            Err(e) => {
                tracing::debug!(error = %e, policy = %on_error, "malformed cell");
                match on_error {
                    OnError::Wrap => Ok(Cell::Error(ReadError::new(
                        text,
                        self.description.render(),
                    ))),
                    OnError::Null => Ok(Cell::Null),
                    OnError::Text => Ok(Cell::Value(Value::Text(text.to_string()))),
                    OnError::Exception => Err(e),
                }
            }
        }
    }
}

/// Iterator over the decoded rows of a data file
///
/// An `Err` item only fails its own row, the next call reads the next record.
///
/// # Examples
/// ```
/// use meta_csv::{Cell, MetaCsvData, MetaCsvReader, OnError, Value, parse_col_type};
///
/// let data = MetaCsvData::builder()
///     .null_value("NULL")
///     .description_by_col_index(1, parse_col_type("integer/ ").unwrap())
///     .build();
/// let source = "name,count\nfoo,1 024\nbar,NULL\n";
/// let mut reader = MetaCsvReader::new(source.as_bytes(), &data, OnError::Wrap).unwrap();
/// assert_eq!(reader.header(), ["name", "count"]);
///
/// let row = reader.next().unwrap().unwrap();
/// assert_eq!(row[1], Cell::Value(Value::Integer(1024)));
/// let row = reader.next().unwrap().unwrap();
/// assert_eq!(row[1], Cell::Null);
/// assert!(reader.next().is_none());
/// ```
#[derive(Debug)]
pub struct MetaCsvReader<R> {
    reader: csv::Reader<R>,
    record: csv::StringRecord,
    header: Vec<String>,
    columns: Vec<Column>,
    overflow: Column,
    on_error: OnError,
    skip_initial_space: bool,
}

impl<R: Read> MetaCsvReader<R> {
    /// Read the header row of `source` and prepare the column processors
    pub fn new(source: R, data: &MetaCsvData, on_error: OnError) -> Result<Self> {
        data.check_encoding()?;
        let mut reader = data.reader_builder().from_reader(source);

        let mut record = csv::StringRecord::new();
        if !reader.read_record(&mut record)? {
            return Err(MetaCsvError::MissingHeader);
        }
        let mut header: Vec<String> = record.iter().map(str::to_string).collect();
        if let Some(first) = header.first_mut() {
            if let Some(stripped) = first.strip_prefix(BOM) {
                *first = stripped.to_string();
            }
        }

        let columns = data
            .descriptions(header.len())
            .into_iter()
            .map(|description| Column::new(description, data.null_value()))
            .collect();
        tracing::debug!(columns = header.len(), policy = %on_error, "opened data file");

        Ok(Self {
            reader,
            record,
            header,
            columns,
            overflow: Column::new(FieldDescription::Text, data.null_value()),
            on_error,
            skip_initial_space: data.skip_initial_space(),
        })
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn descriptions(&self) -> Vec<&FieldDescription> {
        self.columns.iter().map(|column| &column.description).collect()
    }

    /// Data type of every header column
    pub fn data_types(&self) -> Vec<DataType> {
        self.columns
            .iter()
            .map(|column| column.description.data_type())
            .collect()
    }

    fn decode_record(&self) -> Result<Vec<Cell>> {
        self.record
            .iter()
            .enumerate()
            .map(|(i, text)| {
                let text = if self.skip_initial_space {
                    text.trim_start_matches(' ')
                } else {
                    text
                };
                let column = self.columns.get(i).unwrap_or(&self.overflow);
                column.decode(text, self.on_error).map_err(MetaCsvError::from)
            })
            .collect()
    }
}

impl<R: Read> Iterator for MetaCsvReader<R> {
    type Item = Result<Vec<Cell>>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.reader.read_record(&mut self.record) {
            Ok(true) => Some(self.decode_record()),
            Ok(false) => None,
            Err(e) => Some(Err(e.into())),
        }
    }
}
