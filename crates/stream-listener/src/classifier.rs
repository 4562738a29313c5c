//! Event classification: tags plus keyword matching to a routing decision.

use responder_core::{Classification, DisasterKind};
use stream_client::StreamActivity;
use tracing::debug;

/// One row of the ordered keyword table.
#[derive(Debug, Clone)]
pub struct KeywordEntry {
    /// Keyword matched case-insensitively against the event body.
    pub keyword: String,
    /// Language the keyword implies.
    pub language: String,
    /// Disaster kind the keyword maps to.
    pub disaster: DisasterKind,
}

impl KeywordEntry {
    pub fn new(
        keyword: impl Into<String>,
        language: impl Into<String>,
        disaster: DisasterKind,
    ) -> Self {
        Self {
            keyword: keyword.into(),
            language: language.into(),
            disaster,
        }
    }
}

/// Classifier configuration.
#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    /// Tag prefix marking events inside the tracked geographic scope.
    pub area_tag_prefix: String,
    /// Tag prefix marking events that directly address our account.
    pub addressed_tag_prefix: String,
    /// Ordered keyword table; earlier entries win ties.
    pub keywords: Vec<KeywordEntry>,
    /// Language used when an event carries no hints and no keyword matched.
    pub default_language: String,
    /// Disaster kind used for addressed events with no recognized keyword.
    pub default_disaster: DisasterKind,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            area_tag_prefix: "area".to_string(),
            addressed_tag_prefix: "addressed".to_string(),
            keywords: vec![
                KeywordEntry::new("banjir", "id", DisasterKind::Flood),
                KeywordEntry::new("flood", "en", DisasterKind::Flood),
            ],
            default_language: "id".to_string(),
            default_disaster: DisasterKind::Flood,
        }
    }
}

/// Classifies admitted events into exactly one routing decision.
#[derive(Debug, Clone)]
pub struct EventClassifier {
    config: ClassifierConfig,
}

impl EventClassifier {
    pub fn new(config: ClassifierConfig) -> Self {
        Self { config }
    }

    /// Produce the routing decision for one admitted event.
    pub fn classify(&self, activity: &StreamActivity) -> Classification {
        // Shares are never processed further.
        if activity.is_share() {
            debug!("Ignoring share from {:?}", activity.author());
            return Classification::Ignore;
        }

        let mut inside_area = false;
        let mut addressed = false;
        for tag in activity.matched_tags() {
            if tag.starts_with(&self.config.area_tag_prefix) {
                inside_area = true;
            }
            if tag.starts_with(&self.config.addressed_tag_prefix) {
                addressed = true;
            }
        }

        if !inside_area && !addressed {
            debug!("Event matched no area or addressed tag");
            return Classification::Ignore;
        }

        let keyword_match = self.first_keyword(activity.body.as_deref().unwrap_or(""));

        if addressed {
            // Directly addressed: always answer with a resource link, using
            // configured defaults when no keyword was recognized.
            let (language, disaster) = match keyword_match {
                Some(entry) => (entry.language.clone(), entry.disaster),
                None => (
                    self.config.default_language.clone(),
                    self.config.default_disaster,
                ),
            };
            return Classification::SendResource { disaster, language };
        }

        // Inside the area but not addressed: greet the author. Language comes
        // from the event's own hints, not the keyword table.
        let language = activity
            .language_hints()
            .first()
            .map(|s| s.to_string())
            .unwrap_or_else(|| self.config.default_language.clone());

        Classification::SendWelcome {
            language,
            disaster_hint: keyword_match.map(|entry| entry.disaster),
        }
    }

    /// First keyword found by table order (not body position), matched
    /// case-insensitively.
    fn first_keyword(&self, body: &str) -> Option<&KeywordEntry> {
        let body = body.to_lowercase();
        self.config
            .keywords
            .iter()
            .find(|entry| body.contains(&entry.keyword.to_lowercase()))
    }
}
