//! Loading the flat key/value mapping that placeholders resolve against.

use std::{
    collections::BTreeMap,
    path::Path,
    str::FromStr,
};

use {serde_json::value::RawValue, tracing::debug};

use crate::error::{InputKind, Result, SubstError};

/// Flat string-to-string mapping. Loaded once, never mutated afterwards.
///
/// Scalar values keep the exact text they were written with: `1.10` stays
/// `1.10`, `0x1F` stays `0x1F`. Null becomes the empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Variables(BTreeMap<String, String>);

impl Variables {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl From<BTreeMap<String, String>> for Variables {
    fn from(map: BTreeMap<String, String>) -> Self {
        Self(map)
    }
}

impl FromIterator<(String, String)> for Variables {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Serialization format of the values document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValuesFormat {
    Yaml,
    Json,
    Toml,
}

impl ValuesFormat {
    /// Pick a format from the file extension. Anything unrecognized is YAML.
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("json") => Self::Json,
            Some("toml") => Self::Toml,
            _ => Self::Yaml,
        }
    }
}

impl FromStr for ValuesFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "yaml" | "yml" => Ok(Self::Yaml),
            "json" => Ok(Self::Json),
            "toml" => Ok(Self::Toml),
            other => Err(format!("unsupported values format: {other}")),
        }
    }
}

impl std::fmt::Display for ValuesFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Yaml => "yaml",
            Self::Json => "json",
            Self::Toml => "toml",
        })
    }
}

/// Why a values document is not a flat string mapping.
#[derive(Debug, thiserror::Error)]
pub enum ValuesError {
    #[error("{0}")]
    Malformed(String),

    #[error("value for key `{key}` is a {kind}, expected a scalar")]
    NonScalarValue { key: String, kind: &'static str },
}

/// Read and parse the values file. `format` defaults to the extension's.
pub fn load_values(path: &Path, format: Option<ValuesFormat>) -> Result<Variables> {
    let raw = std::fs::read_to_string(path).map_err(|source| SubstError::Read {
        what: InputKind::Values,
        path: path.to_path_buf(),
        source,
    })?;
    let format = format.unwrap_or_else(|| ValuesFormat::from_path(path));
    let vars = parse_values(&raw, format).map_err(|source| SubstError::Deserialize {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), %format, count = vars.len(), "loaded values");
    Ok(vars)
}

/// Parse a values document held in memory.
pub fn parse_values(raw: &str, format: ValuesFormat) -> Result<Variables, ValuesError> {
    match format {
        ValuesFormat::Yaml => parse_yaml(raw),
        ValuesFormat::Json => parse_json(raw),
        ValuesFormat::Toml => parse_toml(raw),
    }
}

fn parse_yaml(raw: &str) -> Result<Variables, ValuesError> {
    if raw.trim().is_empty() {
        return Ok(Variables::default());
    }
    // Plain scalars deserialize into `String` with their source text intact.
    let map: BTreeMap<String, Option<String>> =
        serde_yaml::from_str(raw).map_err(|e| ValuesError::Malformed(e.to_string()))?;
    Ok(map
        .into_iter()
        .map(|(k, v)| (k, v.unwrap_or_default()))
        .collect())
}

fn parse_json(raw: &str) -> Result<Variables, ValuesError> {
    let map: BTreeMap<String, Box<RawValue>> =
        serde_json::from_str(raw).map_err(|e| ValuesError::Malformed(e.to_string()))?;

    map.into_iter()
        .map(|(key, v)| {
            let text = v.get();
            let val = match text.as_bytes().first() {
                Some(b'"') => serde_json::from_str::<String>(text)
                    .map_err(|e| ValuesError::Malformed(e.to_string()))?,
                Some(b'[') => return Err(ValuesError::NonScalarValue { key, kind: "array" }),
                Some(b'{') => return Err(ValuesError::NonScalarValue { key, kind: "object" }),
                _ if text == "null" => String::new(),
                // Numbers and booleans, as written.
                _ => text.to_string(),
            };
            Ok((key, val))
        })
        .collect()
}

fn parse_toml(raw: &str) -> Result<Variables, ValuesError> {
    use toml_edit::{DocumentMut, Item, Value};

    let doc: DocumentMut = raw
        .parse()
        .map_err(|e: toml_edit::TomlError| ValuesError::Malformed(e.to_string()))?;

    doc.iter()
        .map(|(key, item)| {
            let val = match item {
                Item::Value(Value::String(s)) => s.value().clone(),
                Item::Value(Value::Integer(i)) => i.display_repr().into_owned(),
                Item::Value(Value::Float(f)) => f.display_repr().into_owned(),
                Item::Value(Value::Boolean(b)) => b.display_repr().into_owned(),
                Item::Value(Value::Datetime(d)) => d.display_repr().into_owned(),
                other => {
                    return Err(ValuesError::NonScalarValue {
                        key: key.to_string(),
                        kind: toml_kind(other),
                    });
                },
            };
            Ok((key.to_string(), val))
        })
        .collect()
}

fn toml_kind(item: &toml_edit::Item) -> &'static str {
    use toml_edit::{Item, Value};

    match item {
        Item::Value(Value::Array(_)) => "array",
        Item::Value(Value::InlineTable(_)) | Item::Table(_) => "table",
        Item::ArrayOfTables(_) => "array of tables",
        Item::Value(_) | Item::None => "value",
    }
}
