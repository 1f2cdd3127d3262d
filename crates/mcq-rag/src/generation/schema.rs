//! Response schema loading

use std::path::Path;

/// Why the response schema could not be loaded
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("cannot read response schema {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("response schema {path} is not valid JSON: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Template describing the quiz shape the generator should follow.
///
/// Passed through to the generator without validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseSchema(serde_json::Value);

impl ResponseSchema {
    /// Read and parse the schema file
    pub fn load(path: &Path) -> Result<Self, SchemaError> {
        let raw = std::fs::read_to_string(path).map_err(|source| SchemaError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let value = serde_json::from_str(&raw).map_err(|source| SchemaError::Parse {
            path: path.display().to_string(),
            source,
        })?;

        Ok(Self(value))
    }

    /// Compact JSON string handed to the generator
    pub fn to_json_string(&self) -> String {
        self.0.to_string()
    }

    pub fn value(&self) -> &serde_json::Value {
        &self.0
    }
}
