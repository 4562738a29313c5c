//! Wire types for upstream stream activities.

use serde::{Deserialize, Serialize};

use crate::error::StreamError;

/// One activity received from the upstream event stream.
///
/// All fields are optional on the wire; a message without an `actor` is a
/// system/heartbeat message rather than a user event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamActivity {
    /// Composite upstream identifier, e.g.
    /// `tag:search.upstream.com,2005:799999999999999999`.
    #[serde(default)]
    pub id: Option<String>,

    /// Activity verb; `"share"` marks a reshare of another author's event.
    #[serde(default)]
    pub verb: Option<String>,

    /// Free text body of the event.
    #[serde(default)]
    pub body: Option<String>,

    /// Author of the event. Absent on system messages.
    #[serde(default)]
    pub actor: Option<Actor>,

    /// Language code reported by the originating network, if any.
    #[serde(default)]
    pub twitter_lang: Option<String>,

    /// Provider metadata: matched rules and language annotation.
    #[serde(default)]
    pub gnip: Option<ProviderMeta>,

    /// Geographic point, informational only.
    #[serde(default)]
    pub geo: Option<Geo>,

    /// The original event, present on shares.
    #[serde(default)]
    pub object: Option<SharedObject>,
}

/// Author of a stream activity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Actor {
    /// Screen name / handle of the author.
    #[serde(default)]
    pub preferred_username: String,
}

/// Provider metadata envelope on a stream activity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderMeta {
    /// Server-side rules that matched this event.
    #[serde(default)]
    pub matching_rules: Vec<MatchedRule>,

    /// Provider language classification.
    #[serde(default)]
    pub language: Option<LanguageAnnotation>,
}

/// A server-side rule that matched an event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchedRule {
    /// Tag the rule was registered under, if any.
    #[serde(default)]
    pub tag: Option<String>,

    /// Filter expression of the rule.
    #[serde(default)]
    pub value: Option<String>,
}

/// Provider language annotation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguageAnnotation {
    /// ISO 639-1 language code.
    #[serde(default)]
    pub value: Option<String>,
}

/// Geographic point attached to an activity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Geo {
    #[serde(default)]
    pub r#type: Option<String>,
    /// Latitude, longitude.
    #[serde(default)]
    pub coordinates: Option<[f64; 2]>,
}

/// The original event referenced by a share.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharedObject {
    #[serde(default)]
    pub id: Option<String>,
}

impl StreamActivity {
    /// Extract the comparable numeric event id from the composite upstream
    /// identifier. The documented format is `tag:<source>,<year>:<id>`, so
    /// the id is the third colon-separated component.
    pub fn event_id(&self) -> Result<u64, StreamError> {
        let raw = self
            .id
            .as_deref()
            .ok_or_else(|| StreamError::MalformedId("missing id".to_string()))?;
        raw.split(':')
            .nth(2)
            .and_then(|part| part.parse::<u64>().ok())
            .ok_or_else(|| StreamError::MalformedId(raw.to_string()))
    }

    /// Screen name of the author, if present.
    pub fn author(&self) -> Option<&str> {
        self.actor.as_ref().map(|a| a.preferred_username.as_str())
    }

    /// Whether this activity is a share/reshare of another event.
    pub fn is_share(&self) -> bool {
        self.verb.as_deref() == Some("share")
    }

    /// Language hints in decreasing order of precedence: the originating
    /// network's code first, then the provider's classification.
    pub fn language_hints(&self) -> Vec<&str> {
        let mut hints = Vec::new();
        if let Some(lang) = self.twitter_lang.as_deref() {
            hints.push(lang);
        }
        if let Some(lang) = self
            .gnip
            .as_ref()
            .and_then(|g| g.language.as_ref())
            .and_then(|l| l.value.as_deref())
        {
            hints.push(lang);
        }
        hints
    }

    /// Tags of the server-side rules that matched this event.
    pub fn matched_tags(&self) -> impl Iterator<Item = &str> {
        self.gnip
            .iter()
            .flat_map(|g| g.matching_rules.iter())
            .filter_map(|rule| rule.tag.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_activity() -> StreamActivity {
        serde_json::from_str(
            r#"{
                "id": "tag:search.upstream.com,2005:799999999999999999",
                "verb": "post",
                "body": "ada banjir di sini",
                "actor": {"preferredUsername": "reporter1"},
                "twitter_lang": "id",
                "gnip": {
                    "matching_rules": [
                        {"tag": "area_city", "value": "point_radius:[...]"}
                    ],
                    "language": {"value": "in"}
                },
                "geo": {"type": "Point", "coordinates": [-6.2, 106.8]}
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn event_id_extracts_numeric_suffix() {
        let activity = sample_activity();
        assert_eq!(activity.event_id().unwrap(), 799_999_999_999_999_999);
    }

    #[test]
    fn event_id_rejects_malformed_id() {
        let activity = StreamActivity {
            id: Some("not-composite".to_string()),
            ..empty_activity()
        };
        assert!(matches!(activity.event_id(), Err(StreamError::MalformedId(_))));
    }

    #[test]
    fn event_id_rejects_missing_id() {
        assert!(empty_activity().event_id().is_err());
    }

    #[test]
    fn language_hints_ordered_by_precedence() {
        let activity = sample_activity();
        assert_eq!(activity.language_hints(), vec!["id", "in"]);
    }

    #[test]
    fn matched_tags_skips_untagged_rules() {
        let activity: StreamActivity = serde_json::from_str(
            r#"{
                "id": "tag:search.upstream.com,2005:1",
                "actor": {"preferredUsername": "x"},
                "gnip": {"matching_rules": [{"value": "banjir"}, {"tag": "addressed_bot"}]}
            }"#,
        )
        .unwrap();
        assert_eq!(activity.matched_tags().collect::<Vec<_>>(), vec!["addressed_bot"]);
    }

    #[test]
    fn share_verb_detected() {
        let mut activity = sample_activity();
        assert!(!activity.is_share());
        activity.verb = Some("share".to_string());
        assert!(activity.is_share());
    }

    fn empty_activity() -> StreamActivity {
        serde_json::from_str("{}").unwrap()
    }
}
