//! Plan text parsing.
//!
//! Plans are indentation-structured mappings of `key: value` lines with
//! a two-space indent step. The [`IndentParser`] implements exactly that
//! subset by hand; the [`YamlParser`] (behind the `yaml` feature) reads
//! the same files through a full YAML implementation. The choice between
//! them is made once, in [`plan_parser`].

use indexmap::IndexMap;
use thiserror::Error;

use crate::value::Value;

/// Nesting advances by this many columns per level.
pub const INDENT_STEP: usize = 2;

#[derive(Error, Debug)]
pub enum PlanError {
    #[error("invalid indentation on line: {line}")]
    Indentation { line: String },

    #[error("expected key: value pair, got {line}")]
    MalformedLine { line: String },

    #[error("duplicate key '{key}' in plan")]
    DuplicateKey { key: String },

    #[error("invalid list literal '{text}': {source}")]
    ListSyntax {
        text: String,
        source: serde_json::Error,
    },

    #[error("plan root must be a mapping")]
    RootNotMapping,

    #[cfg(feature = "yaml")]
    #[error("yaml parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[cfg(feature = "yaml")]
    #[error("unsupported yaml construct: {0}")]
    UnsupportedYaml(String),
}

/// Strategy seam between the full YAML parser and the minimal
/// indentation parser. Both must produce identical trees for the
/// syntax subset plans use, otherwise golden comparisons would become
/// environment-dependent.
pub trait PlanParser {
    fn parse(&self, text: &str) -> Result<Value, PlanError>;
}

/// The parser this build prefers.
///
/// With the `yaml` feature enabled the full parser is used; otherwise
/// the indentation parser takes over. Callers never make this decision
/// themselves.
pub fn plan_parser() -> Box<dyn PlanParser> {
    #[cfg(feature = "yaml")]
    {
        Box::new(YamlParser)
    }
    #[cfg(not(feature = "yaml"))]
    {
        Box::new(IndentParser)
    }
}

/// Minimal hand-written parser for indent-based mappings and lists.
pub struct IndentParser;

impl PlanParser for IndentParser {
    fn parse(&self, text: &str) -> Result<Value, PlanError> {
        let lines: Vec<&str> = text
            .lines()
            .filter(|line| {
                let trimmed = line.trim();
                !trimmed.is_empty() && !trimmed.starts_with('#')
            })
            .collect();
        let (mapping, _) = parse_block(&lines, 0, 0)?;
        Ok(Value::Mapping(mapping))
    }
}

/// Parse one indentation block starting at `start`, returning the
/// mapping plus the index of the first line the block did not consume.
/// The cursor is threaded explicitly so the parser stays reentrant.
fn parse_block(
    lines: &[&str],
    start: usize,
    indent: usize,
) -> Result<(IndexMap<String, Value>, usize), PlanError> {
    let mut result = IndexMap::new();
    let mut i = start;
    while i < lines.len() {
        let line = lines[i];
        let current_indent = line.len() - line.trim_start().len();
        if current_indent < indent {
            break;
        }
        if current_indent > indent {
            return Err(PlanError::Indentation {
                line: line.to_string(),
            });
        }
        let (key, rest) = split_key_value(line.trim())?;
        match rest {
            None => {
                let (nested, next_index) = parse_block(lines, i + 1, indent + INDENT_STEP)?;
                insert_unique(&mut result, key, Value::Mapping(nested))?;
                i = next_index;
            }
            Some(rest) => {
                insert_unique(&mut result, key, parse_scalar(rest)?)?;
                i += 1;
            }
        }
    }
    Ok((result, i))
}

/// A key may appear once per mapping; a repeated key is fatal, the
/// same way the full YAML parser treats it.
fn insert_unique(
    mapping: &mut IndexMap<String, Value>,
    key: &str,
    value: Value,
) -> Result<(), PlanError> {
    if mapping.insert(key.to_string(), value).is_some() {
        return Err(PlanError::DuplicateKey {
            key: key.to_string(),
        });
    }
    Ok(())
}

/// Split a trimmed line on the first `:`. A non-empty remainder is the
/// scalar text; an empty remainder signals a nested block.
fn split_key_value(line: &str) -> Result<(&str, Option<&str>), PlanError> {
    let Some((key, rest)) = line.split_once(':') else {
        return Err(PlanError::MalformedLine {
            line: line.to_string(),
        });
    };
    let rest = rest.trim();
    Ok((key, (!rest.is_empty()).then_some(rest)))
}

/// Scalar rules, in order: bracketed list (JSON array grammar with
/// single quotes normalized), boolean, number, plain string with one
/// layer of surrounding double quotes stripped.
fn parse_scalar(text: &str) -> Result<Value, PlanError> {
    if text.starts_with('[') && text.ends_with(']') {
        let normalized = text.replace('\'', "\"");
        let items: serde_json::Value =
            serde_json::from_str(&normalized).map_err(|source| PlanError::ListSyntax {
                text: text.to_string(),
                source,
            })?;
        return Ok(from_json(items));
    }
    if text.eq_ignore_ascii_case("true") {
        return Ok(Value::Bool(true));
    }
    if text.eq_ignore_ascii_case("false") {
        return Ok(Value::Bool(false));
    }
    if text.contains(['.', 'e', 'E']) {
        if let Ok(f) = text.parse::<f64>() {
            return Ok(Value::Float(f));
        }
    } else if let Ok(i) = text.parse::<i64>() {
        return Ok(Value::Int(i));
    }
    let unquoted = text
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(text);
    Ok(Value::Str(unquoted.to_string()))
}

fn from_json(value: serde_json::Value) -> Value {
    match value {
        serde_json::Value::Array(items) => {
            Value::Sequence(items.into_iter().map(from_json).collect())
        }
        serde_json::Value::Object(map) => Value::Mapping(
            map.into_iter().map(|(k, v)| (k, from_json(v))).collect(),
        ),
        serde_json::Value::Bool(b) => Value::Bool(b),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => Value::Int(i),
            None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
        },
        serde_json::Value::String(s) => Value::Str(s),
        // Plans do not use null; a null in a list literal degrades to
        // its literal text.
        serde_json::Value::Null => Value::Str("null".to_string()),
    }
}

/// Full parser backed by serde_yaml.
#[cfg(feature = "yaml")]
pub struct YamlParser;

#[cfg(feature = "yaml")]
impl PlanParser for YamlParser {
    fn parse(&self, text: &str) -> Result<Value, PlanError> {
        let doc: serde_yaml::Value = serde_yaml::from_str(text)?;
        let value = from_yaml(doc)?;
        match value {
            Value::Mapping(_) => Ok(value),
            _ => Err(PlanError::RootNotMapping),
        }
    }
}

#[cfg(feature = "yaml")]
fn from_yaml(doc: serde_yaml::Value) -> Result<Value, PlanError> {
    match doc {
        // A bare `key:` is an empty mapping in the indentation parser;
        // keep the trees equivalent.
        serde_yaml::Value::Null => Ok(Value::Mapping(IndexMap::new())),
        serde_yaml::Value::Bool(b) => Ok(Value::Bool(b)),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::Int(i))
            } else {
                Ok(Value::Float(n.as_f64().unwrap_or(f64::NAN)))
            }
        }
        serde_yaml::Value::String(s) => Ok(Value::Str(s)),
        serde_yaml::Value::Sequence(items) => Ok(Value::Sequence(
            items.into_iter().map(from_yaml).collect::<Result<_, _>>()?,
        )),
        serde_yaml::Value::Mapping(map) => {
            let mut result = IndexMap::with_capacity(map.len());
            for (key, value) in map {
                let serde_yaml::Value::String(key) = key else {
                    return Err(PlanError::UnsupportedYaml(format!(
                        "non-string mapping key: {key:?}"
                    )));
                };
                result.insert(key, from_yaml(value)?);
            }
            Ok(Value::Mapping(result))
        }
        serde_yaml::Value::Tagged(tagged) => Err(PlanError::UnsupportedYaml(format!(
            "tagged value: {}",
            tagged.tag
        ))),
    }
}
