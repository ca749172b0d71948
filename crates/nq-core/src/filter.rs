use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::segment::{Attributes, Segment};

/// Key/value selection over feature attributes.
///
/// With an empty `values` list every feature carrying a non-empty `key`
/// passes; `""`, `null` and `"-1"` count as empty. Otherwise the value's
/// text form must be one of `values`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AttributeFilter {
    pub key: String,
    #[serde(default)]
    pub values: Vec<String>,
}

impl AttributeFilter {
    pub fn new(key: impl Into<String>, values: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            key: key.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn matches(&self, attributes: &Attributes) -> bool {
        let Some(value) = attributes.get(&self.key) else {
            return false;
        };
        let text = value_text(value);

        if self.values.is_empty() {
            return !matches!(text.as_deref(), None | Some("") | Some("-1"));
        }

        text.is_some_and(|t| self.values.iter().any(|v| *v == t))
    }

    pub fn matches_segment(&self, segment: &Segment) -> bool {
        self.matches(&segment.attributes)
    }
}

/// Text form used for filter comparison; `None` for null.
pub fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
