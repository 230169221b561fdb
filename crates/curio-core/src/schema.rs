//! Output shapes exchanged with the model.
//!
//! Field descriptions serve two purposes: they document the types here and
//! they are sent to the model verbatim as the shape its reply must follow.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::Error;

/// Text form used for search timestamps (`YYYY-MM-DD HH:MM:SS`).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One historical user search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRecord {
    /// The user's search query.
    pub query: String,
    /// The timestamp of the search (YYYY-MM-DD HH:MM:SS).
    #[serde(with = "timestamp")]
    pub timestamp: NaiveDateTime,
}

impl SearchRecord {
    pub fn new(query: impl Into<String>, timestamp: NaiveDateTime) -> Self {
        Self {
            query: query.into(),
            timestamp,
        }
    }
}

mod timestamp {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::TIMESTAMP_FORMAT;

    pub fn serialize<S: Serializer>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.format(TIMESTAMP_FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(raw.trim(), TIMESTAMP_FORMAT).map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Free text.
    Text,
    /// Mapping of label to text.
    Mapping,
}

/// Declaration of one `PersonalizedContent` field.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub title: &'static str,
    pub kind: FieldKind,
    pub description: &'static str,
}

/// The research digest produced for one query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalizedContent {
    pub topic_overview: String,
    #[serde(deserialize_with = "text_map")]
    pub key_considerations: BTreeMap<String, String>,
    #[serde(deserialize_with = "text_map")]
    pub recent_trends: BTreeMap<String, String>,
    #[serde(deserialize_with = "text_map")]
    pub how_to_choose: BTreeMap<String, String>,
    #[serde(deserialize_with = "text_map")]
    pub additional_resources: BTreeMap<String, String>,
    pub conclusion: String,
}

impl PersonalizedContent {
    /// Fields in display order.
    pub const FIELDS: [FieldSpec; 6] = [
        FieldSpec {
            name: "topic_overview",
            title: "Topic Overview",
            kind: FieldKind::Text,
            description: "Brief introduction to the topic, including its relevance and importance.",
        },
        FieldSpec {
            name: "key_considerations",
            title: "Key Considerations",
            kind: FieldKind::Mapping,
            description: "Factors to consider when making decisions or exploring the topic.",
        },
        FieldSpec {
            name: "recent_trends",
            title: "Recent Trends",
            kind: FieldKind::Mapping,
            description: "Latest updates, trends, or advancements in the given topic.",
        },
        FieldSpec {
            name: "how_to_choose",
            title: "How to Choose",
            kind: FieldKind::Mapping,
            description: "Step-by-step guide or criteria to make informed decisions related to the topic.",
        },
        FieldSpec {
            name: "additional_resources",
            title: "Additional Resources",
            kind: FieldKind::Mapping,
            description: "Links, references, or suggestions for further exploration.",
        },
        FieldSpec {
            name: "conclusion",
            title: "Conclusion",
            kind: FieldKind::Text,
            description: "Summary of the content with actionable takeaways.",
        },
    ];

    /// Render the expected reply shape as prompt text.
    pub fn schema_hint() -> String {
        let mut hint = String::from("{\n");
        for (i, field) in Self::FIELDS.iter().enumerate() {
            let shape = match field.kind {
                FieldKind::Text => "\"<text>\"",
                FieldKind::Mapping => "{\"<label>\": \"<text>\", ...}",
            };
            let comma = if i + 1 < Self::FIELDS.len() { "," } else { "" };
            hint.push_str(&format!(
                "  \"{}\": {}{}  // {}\n",
                field.name, shape, comma, field.description
            ));
        }
        hint.push('}');
        hint
    }

    /// Parse a raw model reply.
    ///
    /// Accepts a bare JSON object, one wrapped in a Markdown code fence, or
    /// one surrounded by prose. Every field must be present and populated.
    pub fn from_reply(reply: &str) -> Result<Self, Error> {
        let mut first_error = None;
        for object in json_objects(reply) {
            match serde_json::from_value::<Self>(object) {
                Ok(content) => {
                    content.validate()?;
                    return Ok(content);
                }
                Err(e) => {
                    first_error.get_or_insert(e);
                }
            }
        }
        Err(match first_error {
            Some(e) => Error::parse(e.to_string()),
            None => Error::parse("no JSON object found in the reply"),
        })
    }

    /// Reject blank text fields and empty mappings.
    pub fn validate(&self) -> Result<(), Error> {
        for (name, text) in [
            ("topic_overview", &self.topic_overview),
            ("conclusion", &self.conclusion),
        ] {
            if text.trim().is_empty() {
                return Err(Error::parse(format!("field `{}` is empty", name)));
            }
        }
        for (name, map) in [
            ("key_considerations", &self.key_considerations),
            ("recent_trends", &self.recent_trends),
            ("how_to_choose", &self.how_to_choose),
            ("additional_resources", &self.additional_resources),
        ] {
            if map.is_empty() {
                return Err(Error::parse(format!("field `{}` has no entries", name)));
            }
        }
        Ok(())
    }

    /// The six page sections, in display order.
    pub fn sections(&self) -> Vec<Section> {
        let [overview, considerations, trends, choose, resources, conclusion] = Self::FIELDS;
        vec![
            Section::text(overview.title, &self.topic_overview),
            Section::rows(considerations.title, &self.key_considerations),
            Section::rows(trends.title, &self.recent_trends),
            Section::rows(choose.title, &self.how_to_choose),
            Section::rows(resources.title, &self.additional_resources),
            Section::text(conclusion.title, &self.conclusion),
        ]
    }

    /// Total words across every field, labels included.
    pub fn word_count(&self) -> usize {
        let count = |s: &str| s.split_whitespace().count();
        let maps = [
            &self.key_considerations,
            &self.recent_trends,
            &self.how_to_choose,
            &self.additional_resources,
        ];
        count(&self.topic_overview)
            + count(&self.conclusion)
            + maps
                .iter()
                .flat_map(|m| m.iter())
                .map(|(k, v)| count(k) + count(v))
                .sum::<usize>()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum SectionBody {
    Text(String),
    Rows(Vec<(String, String)>),
}

/// One titled block of rendered output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    pub title: &'static str,
    pub body: SectionBody,
}

impl Section {
    fn text(title: &'static str, text: &str) -> Self {
        Self {
            title,
            body: SectionBody::Text(text.to_string()),
        }
    }

    fn rows(title: &'static str, map: &BTreeMap<String, String>) -> Self {
        Self {
            title,
            body: SectionBody::Rows(map.iter().map(|(k, v)| (k.clone(), v.clone())).collect()),
        }
    }
}

/// Every complete JSON object in a model reply, in order. Objects nested
/// inside an earlier one are not listed separately.
fn json_objects(reply: &str) -> Vec<serde_json::Value> {
    let mut objects = Vec::new();
    let mut pos = 0;
    while let Some(offset) = reply[pos..].find('{') {
        let start = pos + offset;
        let mut stream =
            serde_json::Deserializer::from_str(&reply[start..]).into_iter::<serde_json::Value>();
        match stream.next() {
            Some(Ok(value)) => {
                objects.push(value);
                pos = start + stream.byte_offset();
            }
            // Not the start of a valid object; try the next brace
            _ => pos = start + 1,
        }
    }
    objects
}

/// Mapping values must be text; scalar numbers and booleans are kept as
/// their JSON text.
fn text_map<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error as _;
    use serde_json::Value;

    let raw = BTreeMap::<String, Value>::deserialize(deserializer)?;
    raw.into_iter()
        .map(|(label, value)| match value {
            Value::String(s) => Ok((label, s)),
            Value::Number(n) => Ok((label, n.to_string())),
            Value::Bool(b) => Ok((label, b.to_string())),
            other => Err(D::Error::custom(format!(
                "entry `{}` must be text, found {}",
                label,
                json_kind(&other)
            ))),
        })
        .collect()
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
