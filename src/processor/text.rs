use crate::error::ReadException;
use crate::processor::{FieldProcessor, text_or_none};

/// Cells kept as they are, including surrounding whitespace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextFieldProcessor {
    null_value: String,
}

impl TextFieldProcessor {
    pub fn new(null_value: &str) -> Self {
        Self {
            null_value: null_value.to_string(),
        }
    }

    pub fn null_value(&self) -> &str {
        &self.null_value
    }
}

impl FieldProcessor for TextFieldProcessor {
    type Value = String;

    fn to_object(&self, text: Option<&str>) -> Result<Option<String>, ReadException> {
        Ok(text_or_none(text, &self.null_value).map(str::to_string))
    }

    fn to_string(&self, value: Option<&String>) -> String {
        value.unwrap_or(&self.null_value).clone()
    }
}

/// Booleans spelled with a custom pair of words, matched case-insensitively
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BooleanFieldProcessor {
    true_word: String,
    false_word: String,
    null_value: String,
}

impl BooleanFieldProcessor {
    pub fn new(true_word: &str, false_word: &str, null_value: &str) -> Self {
        Self {
            true_word: true_word.to_lowercase(),
            false_word: false_word.to_lowercase(),
            null_value: null_value.to_string(),
        }
    }

    pub fn null_value(&self) -> &str {
        &self.null_value
    }
}

impl FieldProcessor for BooleanFieldProcessor {
    type Value = bool;

    fn to_object(&self, text: Option<&str>) -> Result<Option<bool>, ReadException> {
        let Some(text) = text_or_none(text, &self.null_value) else {
            return Ok(None);
        };
        let word = text.trim().to_lowercase();
        if word == self.true_word {
            Ok(Some(true))
        } else if word == self.false_word {
            Ok(Some(false))
        } else {
            Err(ReadException::new(text, "wrong boolean"))
        }
    }

    fn to_string(&self, value: Option<&bool>) -> String {
        match value {
            Some(value) => value.to_string(),
            None => self.null_value.clone(),
        }
    }
}
