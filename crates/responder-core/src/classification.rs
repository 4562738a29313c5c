//! Routing decisions for admitted stream events.

use serde::{Deserialize, Serialize};

/// Kind of disaster a recognized keyword maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisasterKind {
    Flood,
    Earthquake,
    Haze,
    Wind,
}

impl DisasterKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DisasterKind::Flood => "flood",
            DisasterKind::Earthquake => "earthquake",
            DisasterKind::Haze => "haze",
            DisasterKind::Wind => "wind",
        }
    }
}

impl std::fmt::Display for DisasterKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The routing decision for one admitted event. Always exactly one variant;
/// an event is never both ignored and acted on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// No action: a share, or an event matching no configured keyword while
    /// unaddressed and outside the tracked area.
    Ignore,

    /// The author addressed us directly: fetch a reporting-card link and
    /// send it.
    SendResource {
        disaster: DisasterKind,
        language: String,
    },

    /// A new area-relevant event without direct address: greet the author
    /// and record them as an invitee.
    SendWelcome {
        language: String,
        disaster_hint: Option<DisasterKind>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disaster_kind_display() {
        assert_eq!(DisasterKind::Flood.to_string(), "flood");
        assert_eq!(DisasterKind::Earthquake.as_str(), "earthquake");
    }
}
