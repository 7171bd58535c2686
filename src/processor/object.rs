use std::sync::Arc;

use crate::description::ObjectType;
use crate::error::ReadException;
use crate::processor::{FieldProcessor, text_or_none};
use crate::types::Value;

/// Hands non-null cells to a caller-defined [`ObjectType`]
#[derive(Debug, Clone)]
pub struct ObjectFieldProcessor {
    object_type: Arc<dyn ObjectType>,
    null_value: String,
}

impl ObjectFieldProcessor {
    pub fn new(object_type: Arc<dyn ObjectType>, null_value: &str) -> Self {
        Self {
            object_type,
            null_value: null_value.to_string(),
        }
    }

    pub fn null_value(&self) -> &str {
        &self.null_value
    }
}

impl FieldProcessor for ObjectFieldProcessor {
    type Value = Value;

    fn to_object(&self, text: Option<&str>) -> Result<Option<Value>, ReadException> {
        text_or_none(text, &self.null_value)
            .map(|text| self.object_type.to_object(text))
            .transpose()
    }

    fn to_string(&self, value: Option<&Value>) -> String {
        match value {
            Some(value) => self.object_type.to_string(value),
            None => self.null_value.clone(),
        }
    }
}
