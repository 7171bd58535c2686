//! The metadata file describing a CSV data file
//!
//! A metadata file is itself a CSV file with a `domain,key,value` header. The `file`
//! and `csv` domains describe the encoding and dialect of the data file, `data` holds
//! the null sentinel and the column types, and `_meta` holds free entries:
//!
//! ```text
//! domain,key,value
//! file,encoding,utf-8
//! csv,delimiter,;
//! data,null_value,NULL
//! data,col/0/type,integer
//! data,col/1/type,"sign/pre/$/decimal//."
//! ```

use std::collections::BTreeMap;
use std::io::{Read, Write};

use crate::description::FieldDescription;
use crate::error::{MetaCsvError, Result};
use crate::parser::{ColTypeParser, split_parameters};

const HEADER: [&str; 3] = ["domain", "key", "value"];

/// Description of columns that the metadata file does not mention
static TEXT_DESCRIPTION: FieldDescription = FieldDescription::Text;

/// Encoding, dialect, null sentinel and column types of a data file
#[derive(Debug, Clone, PartialEq)]
pub struct MetaCsvData {
    encoding: String,
    bom: bool,
    line_terminator: String,
    delimiter: u8,
    quote_char: u8,
    double_quote: bool,
    escape_char: Option<u8>,
    skip_initial_space: bool,
    null_value: String,
    meta: BTreeMap<String, String>,
    descriptions: BTreeMap<usize, FieldDescription>,
}

impl Default for MetaCsvData {
    fn default() -> Self {
        Self {
            encoding: "utf-8".to_string(),
            bom: false,
            line_terminator: "\r\n".to_string(),
            delimiter: b',',
            quote_char: b'"',
            double_quote: true,
            escape_char: None,
            skip_initial_space: false,
            null_value: String::new(),
            meta: BTreeMap::new(),
            descriptions: BTreeMap::new(),
        }
    }
}

impl MetaCsvData {
    pub fn builder() -> MetaCsvDataBuilder {
        MetaCsvDataBuilder::default()
    }

    pub fn encoding(&self) -> &str {
        &self.encoding
    }

    pub fn bom(&self) -> bool {
        self.bom
    }

    pub fn line_terminator(&self) -> &str {
        &self.line_terminator
    }

    pub fn delimiter(&self) -> u8 {
        self.delimiter
    }

    pub fn quote_char(&self) -> u8 {
        self.quote_char
    }

    pub fn double_quote(&self) -> bool {
        self.double_quote
    }

    pub fn escape_char(&self) -> Option<u8> {
        self.escape_char
    }

    pub fn skip_initial_space(&self) -> bool {
        self.skip_initial_space
    }

    pub fn null_value(&self) -> &str {
        &self.null_value
    }

    /// Free `_meta` entries, including `version`
    pub fn meta(&self) -> &BTreeMap<String, String> {
        &self.meta
    }

    /// Column types declared in the metadata file, by column index
    pub fn field_descriptions(&self) -> &BTreeMap<usize, FieldDescription> {
        &self.descriptions
    }

    /// The type of column `index`, `text` when undeclared
    pub fn description(&self, index: usize) -> &FieldDescription {
        self.descriptions.get(&index).unwrap_or(&TEXT_DESCRIPTION)
    }

    /// The types of the first `width` columns
    pub fn descriptions(&self, width: usize) -> Vec<FieldDescription> {
        (0..width).map(|i| self.description(i).clone()).collect()
    }

    pub(crate) fn check_encoding(&self) -> Result<()> {
        match self.encoding.to_lowercase().as_str() {
            "utf-8" | "utf8" | "utf-8-sig" => Ok(()),
            _ => Err(MetaCsvError::UnsupportedEncoding(self.encoding.clone())),
        }
    }

    pub(crate) fn terminator(&self) -> Result<csv::Terminator> {
        match self.line_terminator.as_bytes() {
            b"\r\n" => Ok(csv::Terminator::CRLF),
            [byte] => Ok(csv::Terminator::Any(*byte)),
            _ => Err(MetaCsvError::BadValue {
                key: "line_terminator".to_string(),
                value: self.line_terminator.clone(),
            }),
        }
    }

    /// A `csv` reader configured with this dialect; headers are handled by the caller
    pub(crate) fn reader_builder(&self) -> csv::ReaderBuilder {
        let mut builder = csv::ReaderBuilder::new();
        builder
            .has_headers(false)
            .flexible(true)
            .delimiter(self.delimiter)
            .quote(self.quote_char)
            .double_quote(self.double_quote)
            .escape(self.escape_char);
        if self.line_terminator.len() == 1 {
            builder.terminator(csv::Terminator::Any(self.line_terminator.as_bytes()[0]));
        }
        builder
    }

    pub(crate) fn writer_builder(&self) -> Result<csv::WriterBuilder> {
        let mut builder = csv::WriterBuilder::new();
        builder
            .has_headers(false)
            .flexible(true)
            .delimiter(self.delimiter)
            .quote(self.quote_char)
            .double_quote(self.double_quote)
            .terminator(self.terminator()?);
        if let Some(escape) = self.escape_char {
            builder.escape(escape);
        }
        Ok(builder)
    }
}

/// Fluent builder for [`MetaCsvData`]
///
/// # Examples
/// ```
/// use meta_csv::{MetaCsvData, parse_col_type};
///
/// let data = MetaCsvData::builder()
///     .delimiter(b';')
///     .null_value("NULL")
///     .description_by_col_index(0, parse_col_type("integer").unwrap())
///     .build();
/// assert_eq!(data.description(0).render(), "integer");
/// assert_eq!(data.description(1).render(), "text");
/// ```
#[derive(Debug, Clone, Default)]
pub struct MetaCsvDataBuilder {
    data: MetaCsvData,
}

impl MetaCsvDataBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn encoding(mut self, encoding: &str) -> Self {
        self.data.encoding = encoding.to_string();
        self
    }

    pub fn bom(mut self, bom: bool) -> Self {
        self.data.bom = bom;
        self
    }

    pub fn line_terminator(mut self, line_terminator: &str) -> Self {
        self.data.line_terminator = line_terminator.to_string();
        self
    }

    pub fn delimiter(mut self, delimiter: u8) -> Self {
        self.data.delimiter = delimiter;
        self
    }

    pub fn quote_char(mut self, quote_char: u8) -> Self {
        self.data.quote_char = quote_char;
        self
    }

    pub fn double_quote(mut self, double_quote: bool) -> Self {
        self.data.double_quote = double_quote;
        self
    }

    pub fn escape_char(mut self, escape_char: Option<u8>) -> Self {
        self.data.escape_char = escape_char;
        self
    }

    pub fn skip_initial_space(mut self, skip_initial_space: bool) -> Self {
        self.data.skip_initial_space = skip_initial_space;
        self
    }

    pub fn null_value(mut self, null_value: &str) -> Self {
        self.data.null_value = null_value.to_string();
        self
    }

    pub fn meta_version(self, version: &str) -> Self {
        self.meta("version", version)
    }

    pub fn meta(mut self, key: &str, value: &str) -> Self {
        self.data.meta.insert(key.to_string(), value.to_string());
        self
    }

    pub fn description_by_col_index(mut self, index: usize, description: FieldDescription) -> Self {
        self.data.descriptions.insert(index, description);
        self
    }

    pub fn build(self) -> MetaCsvData {
        self.data
    }
}

/// Reads metadata files into [`MetaCsvData`]
#[derive(Debug, Default)]
pub struct MetaCsvParser {
    col_type_parser: ColTypeParser,
}

impl MetaCsvParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `col_type_parser` for `data,col/<n>/type` rows, e.g. to support `object` types
    pub fn with_col_type_parser(col_type_parser: ColTypeParser) -> Self {
        Self { col_type_parser }
    }

    pub fn parse<R: Read>(&self, source: R) -> Result<MetaCsvData> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(source);
        let mut records = reader.records();

        let header = match records.next() {
            Some(record) => record?,
            None => return Err(MetaCsvError::BadHeader(Vec::new())),
        };
        if header.iter().ne(HEADER) {
            return Err(MetaCsvError::BadHeader(
                header.iter().map(str::to_string).collect(),
            ));
        }

        let mut builder = MetaCsvDataBuilder::new();
        for record in records {
            let record = record?;
            let fields: Vec<&str> = record.iter().collect();
            let [domain, key, value] = fields[..] else {
                return Err(MetaCsvError::BadRow(
                    fields.iter().map(|field| field.to_string()).collect(),
                ));
            };
            builder = self.parse_row(builder, domain, key, value)?;
        }

        let data = builder.build();
        data.terminator()?;
        tracing::debug!(
            columns = data.descriptions.len(),
            null_value = %data.null_value,
            "parsed metadata"
        );
        Ok(data)
    }

    fn parse_row(
        &self,
        builder: MetaCsvDataBuilder,
        domain: &str,
        key: &str,
        value: &str,
    ) -> Result<MetaCsvDataBuilder> {
        match domain {
            "_meta" => Ok(builder.meta(key, value)),
            "file" => parse_file_row(builder, key, value),
            "csv" => parse_csv_row(builder, key, value),
            "data" => self.parse_data_row(builder, key, value),
            _ => Err(MetaCsvError::UnknownDomain(domain.to_string())),
        }
    }

    fn parse_data_row(
        &self,
        builder: MetaCsvDataBuilder,
        key: &str,
        value: &str,
    ) -> Result<MetaCsvDataBuilder> {
        let subkeys = split_parameters(key);
        match subkeys.as_slice() {
            [col, index, col_key] if col == "col" => {
                let index: usize = index
                    .trim()
                    .parse()
                    .map_err(|_| MetaCsvError::BadColumnIndex(key.to_string()))?;
                if col_key != "type" {
                    return Err(unknown_key("data", key));
                }
                let description = self.col_type_parser.parse_col_type(value)?;
                Ok(builder.description_by_col_index(index, description))
            }
            [col, ..] if col == "col" => Err(MetaCsvError::BadColumnIndex(key.to_string())),
            [null_key] if null_key == "null_value" || null_key == "_null_value" => {
                Ok(builder.null_value(value))
            }
            _ => Err(unknown_key("data", key)),
        }
    }
}

fn unknown_key(domain: &str, key: &str) -> MetaCsvError {
    MetaCsvError::UnknownKey {
        domain: domain.to_string(),
        key: key.to_string(),
    }
}

fn parse_file_row(builder: MetaCsvDataBuilder, key: &str, value: &str) -> Result<MetaCsvDataBuilder> {
    match key {
        "encoding" => {
            if value.eq_ignore_ascii_case("utf-8-sig") {
                Ok(builder.encoding("utf-8").bom(true))
            } else {
                Ok(builder.encoding(value))
            }
        }
        "bom" => Ok(builder.bom(parse_boolean_value(value))),
        "line_terminator" => Ok(builder.line_terminator(&unescape_terminator(value))),
        _ => Err(unknown_key("file", key)),
    }
}

fn parse_csv_row(builder: MetaCsvDataBuilder, key: &str, value: &str) -> Result<MetaCsvDataBuilder> {
    match key {
        "delimiter" => Ok(builder.delimiter(single_byte(key, value)?)),
        "double_quote" => Ok(builder.double_quote(parse_boolean_value(value))),
        "escape_char" => {
            let escape = if value.is_empty() {
                None
            } else {
                Some(single_byte(key, value)?)
            };
            Ok(builder.escape_char(escape))
        }
        "quote_char" => Ok(builder.quote_char(single_byte(key, value)?)),
        "skip_initial_space" => Ok(builder.skip_initial_space(parse_boolean_value(value))),
        _ => Err(unknown_key("csv", key)),
    }
}

fn parse_boolean_value(value: &str) -> bool {
    matches!(value.trim(), "true" | "1")
}

fn single_byte(key: &str, value: &str) -> Result<u8> {
    match value.as_bytes() {
        [byte] => Ok(*byte),
        _ => Err(MetaCsvError::BadValue {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}

/// Line terminators may be written literally or as `\r\n`, `\n`, `\r`
fn unescape_terminator(value: &str) -> String {
    match value {
        "\\r\\n" | "CRLF" => "\r\n".to_string(),
        "\\n" | "LF" => "\n".to_string(),
        "\\r" | "CR" => "\r".to_string(),
        _ => value.to_string(),
    }
}

fn escape_terminator(value: &str) -> String {
    value.replace('\r', "\\r").replace('\n', "\\n")
}

/// Write the metadata file for `data`, leaving out everything that has its default value
pub fn render_metadata<W: Write>(data: &MetaCsvData, dest: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(dest);
    writer.write_record(HEADER)?;

    for (key, value) in &data.meta {
        writer.write_record(["_meta", key.as_str(), value.as_str()])?;
    }
    if !data.encoding.eq_ignore_ascii_case("utf-8") {
        writer.write_record(["file", "encoding", data.encoding.as_str()])?;
    }
    if data.bom {
        writer.write_record(["file", "bom", "true"])?;
    }
    if data.line_terminator != "\r\n" {
        let terminator = escape_terminator(&data.line_terminator);
        writer.write_record(["file", "line_terminator", terminator.as_str()])?;
    }
    if data.delimiter != b',' {
        write_csv_byte(&mut writer, "delimiter", data.delimiter)?;
    }
    if !data.double_quote {
        writer.write_record(["csv", "double_quote", "false"])?;
    }
    if let Some(escape) = data.escape_char {
        write_csv_byte(&mut writer, "escape_char", escape)?;
    }
    if data.quote_char != b'"' {
        write_csv_byte(&mut writer, "quote_char", data.quote_char)?;
    }
    if data.skip_initial_space {
        writer.write_record(["csv", "skip_initial_space", "true"])?;
    }
    if !data.null_value.is_empty() {
        writer.write_record(["data", "null_value", data.null_value.as_str()])?;
    }
    for (index, description) in &data.descriptions {
        if *description != FieldDescription::Text {
            let key = format!("col/{index}/type");
            writer.write_record(["data", key.as_str(), description.render().as_str()])?;
        }
    }
    writer.flush()?;
    Ok(())
}

fn write_csv_byte<W: Write>(writer: &mut csv::Writer<W>, key: &str, byte: u8) -> csv::Result<()> {
    writer.write_record([b"csv".as_slice(), key.as_bytes(), std::slice::from_ref(&byte)])
}
