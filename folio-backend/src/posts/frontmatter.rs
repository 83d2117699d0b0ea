//! Split and parse the YAML front matter of post files.
//!
//! A post starts with a `---` line, a YAML mapping and a closing `---` line.
//! Everything after the closing delimiter is the markdown body.

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Deserializer};
use serde_yaml::Value;
use std::collections::BTreeMap;
use std::sync::LazyLock;

static FRONTMATTER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^\s*---[ \t]*\r?\n(?:(.*?)\r?\n)?[ \t]*---[ \t]*(?:\r?\n|$)").unwrap()
});

/// `2019-06-02-some-post` style file stems
static DATED_STEM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4}-\d{2}-\d{2})-(.+)$").unwrap());

/// Parsed post front matter
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FrontMatter {
    #[serde(default, deserialize_with = "scalar_string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "scalar_string")]
    pub date: Option<String>,
    #[serde(default, alias = "category", deserialize_with = "string_or_list")]
    pub categories: Vec<String>,
    #[serde(default, deserialize_with = "string_or_list")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "scalar_string")]
    pub description: Option<String>,
    /// Any other keys (layout, comments, ...)
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl FrontMatter {
    /// Title with whitespace and one layer of surrounding quotes removed
    pub fn clean_title(&self) -> Option<String> {
        self.title
            .as_deref()
            .map(|t| unquote(t.trim()).trim().to_string())
            .filter(|t| !t.is_empty())
    }

    pub fn parsed_date(&self) -> Option<NaiveDate> {
        self.date.as_deref().and_then(parse_date)
    }
}

/// Split content into (frontmatter_yaml, body). `None` when the file has no front matter.
pub fn split_frontmatter(content: &str) -> Option<(String, String)> {
    let caps = FRONTMATTER_RE.captures(content)?;
    let yaml = caps
        .get(1)
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default();
    let end = caps.get(0).map(|m| m.end()).unwrap_or(0);
    Some((yaml, content[end..].trim().to_string()))
}

/// Parse the YAML header. An empty or `null` header gives the defaults.
pub fn parse_frontmatter(yaml: &str) -> Result<FrontMatter, serde_yaml::Error> {
    if yaml.trim().is_empty() {
        return Ok(FrontMatter::default());
    }
    let value: Value = serde_yaml::from_str(yaml)?;
    if value.is_null() {
        return Ok(FrontMatter::default());
    }
    serde_yaml::from_value(value)
}

/// Parse `YYYY-MM-DD`, ignoring a trailing time part (`2020-01-02 10:00:00 -0500`)
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = unquote(raw.trim());
    let day = raw
        .split(|c: char| c == 'T' || c.is_whitespace())
        .next()
        .unwrap_or("");
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

/// Split a file stem into its optional date prefix and slug
pub fn split_dated_stem(stem: &str) -> (Option<NaiveDate>, String) {
    match DATED_STEM_RE.captures(stem) {
        Some(caps) => match parse_date(&caps[1]) {
            Some(date) => (Some(date), caps[2].to_string()),
            None => (None, stem.to_string()),
        },
        None => (None, stem.to_string()),
    }
}

/// Remove surrounding quotes from a string
fn unquote(s: &str) -> &str {
    if s.len() >= 2
        && ((s.starts_with('"') && s.ends_with('"')) || (s.starts_with('\'') && s.ends_with('\'')))
    {
        &s[1..s.len() - 1]
    } else {
        s
    }
}

fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Tagged(tagged) => value_to_string(&tagged.value),
        _ => None,
    }
}

fn scalar_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(value_to_string))
}

/// Accept `[a, b]`, a block list, `"a, b"` or `"a b"`
fn string_or_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let items: Vec<String> = match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Sequence(seq)) => seq.iter().filter_map(value_to_string).collect(),
        Some(Value::String(s)) if s.contains(',') => s.split(',').map(str::to_string).collect(),
        Some(Value::String(s)) => s.split_whitespace().map(str::to_string).collect(),
        Some(other) => value_to_string(&other).into_iter().collect(),
    };
    Ok(items
        .into_iter()
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect())
}
