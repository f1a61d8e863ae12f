use serde::{Deserialize, Deserializer, Serialize};
use serde_yaml::Value;
use std::collections::BTreeMap;

const DELIMITER: &str = "---";

/// YAML metadata at the top of a page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Frontmatter {
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub title: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<String>,
    /// Every other key, kept as parsed.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Scalars are kept as strings; lists, maps and nulls are dropped instead of failing the page.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(text) => Some(text),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        other => {
            tracing::warn!(value = ?other, "ignoring non-scalar frontmatter field");
            None
        }
    })
}

impl Frontmatter {
    pub fn parse(yaml: &str) -> Result<Self, serde_yaml::Error> {
        if yaml.trim().is_empty() {
            return Ok(Frontmatter::default());
        }
        serde_yaml::from_str(yaml)
    }
}

/// Split `---` delimited frontmatter off the top of `source`.
///
/// Returns the YAML block (if any) and the line index where the body starts. An opening
/// delimiter without a closing one is not frontmatter.
pub fn split_frontmatter(lines: &[&str]) -> (Option<String>, usize) {
    if lines.first().map(|line| line.trim_end()) != Some(DELIMITER) {
        return (None, 0);
    }
    match lines[1..].iter().position(|line| line.trim_end() == DELIMITER) {
        Some(offset) => {
            let close = offset + 1;
            (Some(lines[1..close].join("\n")), close + 1)
        }
        None => (None, 0),
    }
}
