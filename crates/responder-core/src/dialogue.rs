//! Injected per-language reply text tables.
//!
//! Reply text is configuration, not code: the tables are built at startup
//! and passed in rather than imported as globals.

use std::collections::HashMap;

/// Per-language reply text, with a default-language fallback.
#[derive(Debug, Clone)]
pub struct Dialogue {
    /// Greeting sent to new users in the tracked area.
    welcome: HashMap<String, String>,
    /// Text sent alongside a reporting-card link.
    card_request: HashMap<String, String>,
    /// Optional extra sentence per disaster kind, appended to the welcome
    /// when a keyword was recognized.
    disaster_mention: HashMap<String, String>,
    default_language: String,
}

impl Dialogue {
    pub fn new(default_language: impl Into<String>) -> Self {
        Self {
            welcome: HashMap::new(),
            card_request: HashMap::new(),
            disaster_mention: HashMap::new(),
            default_language: default_language.into(),
        }
    }

    pub fn with_welcome(mut self, language: impl Into<String>, text: impl Into<String>) -> Self {
        self.welcome.insert(language.into(), text.into());
        self
    }

    pub fn with_card_request(
        mut self,
        language: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        self.card_request.insert(language.into(), text.into());
        self
    }

    pub fn with_disaster_mention(
        mut self,
        disaster: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        self.disaster_mention.insert(disaster.into(), text.into());
        self
    }

    pub fn default_language(&self) -> &str {
        &self.default_language
    }

    /// Welcome text for `language`, falling back to the default language.
    pub fn welcome_text(&self, language: &str) -> Option<&str> {
        lookup(&self.welcome, language, &self.default_language)
    }

    /// Card-request text for `language`, falling back to the default language.
    pub fn card_request_text(&self, language: &str) -> Option<&str> {
        lookup(&self.card_request, language, &self.default_language)
    }

    /// Extra mention for a recognized disaster kind, if configured.
    pub fn disaster_mention(&self, disaster: &str) -> Option<&str> {
        self.disaster_mention.get(disaster).map(String::as_str)
    }
}

fn lookup<'a>(
    table: &'a HashMap<String, String>,
    language: &str,
    default_language: &str,
) -> Option<&'a str> {
    table
        .get(language)
        .or_else(|| table.get(default_language))
        .map(String::as_str)
}
