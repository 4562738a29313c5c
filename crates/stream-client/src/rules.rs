//! Server-side filter rule types.

use serde::{Deserialize, Serialize};

/// A server-side subscription filter rule.
///
/// The `tag` is echoed back on matching events and is how matches are
/// recognized later; the `value` is a filter expression in the upstream's
/// query language, opaque to this system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub tag: String,
    pub value: String,
}

impl Rule {
    pub fn new(tag: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            value: value.into(),
        }
    }
}

/// Build the full-replace rule set from a (tag, filter expression) mapping.
pub fn rules_from_mapping<I, K, V>(mapping: I) -> Vec<Rule>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    mapping
        .into_iter()
        .map(|(tag, value)| Rule::new(tag, value))
        .collect()
}
