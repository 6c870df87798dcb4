use std::{
    fs::{self, File},
    io::{BufReader, Write},
    path::Path,
};

use anyhow::Context;
use serde_json::{Map, Value};
use tempfile::NamedTempFile;

use crate::{
    error::{AugmentError, Result},
    types::ReverbType,
};

/// Key/value record describing one synthesis batch. Key order is preserved.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Metadata {
    fields: Map<String, Value>,
}

impl Metadata {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).with_context(|| format!("Failed to open metadata {:?}", path))?;
        let value: Value = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Failed to parse metadata {:?}", path))?;

        match value {
            Value::Object(fields) => Ok(Self { fields }),
            other => Err(AugmentError::Metadata(format!(
                "{} must hold a JSON object, found {}",
                path.display(),
                json_kind(&other)
            ))),
        }
    }

    /// Write next to `path` first, then rename over it.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;

        let mut tmp = NamedTempFile::new_in(dir)?;
        serde_json::to_writer_pretty(&mut tmp, &self.fields)?;
        tmp.write_all(b"\n")?;
        tmp.flush()?;
        tmp.persist(path)?;
        Ok(())
    }

    /// Record the applied reverb under `key`. Returns the previous value, if any.
    pub fn record_augmentation(&mut self, key: &str, reverb: ReverbType) -> Option<Value> {
        self.fields
            .insert(key.to_string(), Value::String(reverb.metadata_tag()))
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.fields
    }
}

impl From<Map<String, Value>> for Metadata {
    fn from(fields: Map<String, Value>) -> Self {
        Self { fields }
    }
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
