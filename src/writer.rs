//! Typed writing of data files

use std::collections::BTreeMap;
use std::io::Write;

use crate::description::FieldDescription;
use crate::error::Result;
use crate::metadata::MetaCsvData;
use crate::processor::{AnyFieldProcessor, FieldProcessor};
use crate::types::Value;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Writes a header and typed rows in the dialect of a [`MetaCsvData`]
///
/// # Examples
/// ```
/// use meta_csv::{MetaCsvData, MetaCsvWriter, Value, parse_col_type};
///
/// let data = MetaCsvData::builder()
///     .line_terminator("\n")
///     .description_by_col_index(1, parse_col_type("currency/post/€/integer").unwrap())
///     .build();
/// let mut out = Vec::new();
/// let mut writer = MetaCsvWriter::new(&mut out, &data).unwrap();
/// writer.write_header(["item", "price"]).unwrap();
/// writer.write_row(&[Some(Value::from("tea")), Some(Value::Integer(3))]).unwrap();
/// writer.flush().unwrap();
/// drop(writer);
/// assert_eq!(String::from_utf8(out).unwrap(), "item,price\ntea,3 €\n");
/// ```
#[derive(Debug)]
pub struct MetaCsvWriter<W: Write> {
    writer: csv::Writer<W>,
    processors: BTreeMap<usize, AnyFieldProcessor>,
    default_processor: AnyFieldProcessor,
}

impl<W: Write> MetaCsvWriter<W> {
    /// Prepare the column processors; a BOM is written first if the metadata asks for one
    pub fn new(mut dest: W, data: &MetaCsvData) -> Result<Self> {
        data.check_encoding()?;
        let builder = data.writer_builder()?;
        if data.bom() {
            dest.write_all(UTF8_BOM)?;
        }
        let processors = data
            .field_descriptions()
            .iter()
            .map(|(index, description)| {
                (*index, description.to_field_processor(data.null_value()))
            })
            .collect();
        Ok(Self {
            writer: builder.from_writer(dest),
            processors,
            default_processor: FieldDescription::Text.to_field_processor(data.null_value()),
        })
    }

    pub fn write_header<I, S>(&mut self, header: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.writer
            .write_record(header.into_iter().map(|name| name.as_ref().to_string()))?;
        Ok(())
    }

    /// Encode and write one row; `None` cells are written as the null sentinel
    pub fn write_row(&mut self, row: &[Option<Value>]) -> Result<()> {
        let record: Vec<String> = row
            .iter()
            .enumerate()
            .map(|(i, value)| {
                self.processors
                    .get(&i)
                    .unwrap_or(&self.default_processor)
                    .to_string(value.as_ref())
            })
            .collect();
        self.writer.write_record(&record)?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
