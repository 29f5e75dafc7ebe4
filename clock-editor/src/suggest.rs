//! Deterministic icon/colour suggestions from a task name.
//!
//! Keyword table first; the first entry (in table order) with a keyword
//! contained in the name wins. Unmatched names get a star and the next
//! colour from a fixed palette.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub icon: String,
    pub color: String,
}

impl Suggestion {
    fn new(icon: &str, color: &str) -> Self {
        Self {
            icon: icon.to_string(),
            color: color.to_string(),
        }
    }
}

struct KeywordRule {
    keywords: &'static [&'static str],
    icon: &'static str,
    color: &'static str,
}

/// Order matters: it is the tie-break when a name hits several entries.
#[rustfmt::skip]
const KEYWORD_TABLE: &[KeywordRule] = &[
    KeywordRule { keywords: &["frühstück", "breakfast", "essen", "müsli", "cereal"], icon: "🥣", color: "#FF9500" },
    KeywordRule { keywords: &["zähne", "zähneputzen", "teeth", "brush teeth"], icon: "🪥", color: "#4CAF50" },
    KeywordRule { keywords: &["anziehen", "kleidung", "dress", "clothes", "umziehen"], icon: "👕", color: "#2196F3" },
    KeywordRule { keywords: &["haare", "bürsten", "kämmen", "hair", "brush hair"], icon: "🪮", color: "#E91E63" },
    KeywordRule { keywords: &["schuhe", "shoes"], icon: "👟", color: "#795548" },
    KeywordRule { keywords: &["waschen", "wash", "duschen", "shower", "baden", "bath"], icon: "🚿", color: "#00BCD4" },
    KeywordRule { keywords: &["schule", "school", "haus verlassen", "losgehen", "leave", "rausgehen"], icon: "🚪", color: "#9C27B0" },
    KeywordRule { keywords: &["abendessen", "dinner", "abendbrot"], icon: "🍽️", color: "#FF9500" },
    KeywordRule { keywords: &["aufräumen", "aufräum", "tidy", "clean", "ordnung"], icon: "🧹", color: "#FFC107" },
    KeywordRule { keywords: &["geschichte", "vorlesen", "buch", "story", "book", "lesen"], icon: "📖", color: "#2196F3" },
    KeywordRule { keywords: &["schlafen", "bett", "sleep", "bed", "gute nacht"], icon: "🛏️", color: "#3F51B5" },
    KeywordRule { keywords: &["spielen", "play", "spiel"], icon: "🎮", color: "#FF5722" },
    KeywordRule { keywords: &["hausaufgaben", "homework", "lernen", "learn"], icon: "📝", color: "#607D8B" },
    KeywordRule { keywords: &["jacke", "mantel", "coat", "jacket"], icon: "🧥", color: "#8BC34A" },
    KeywordRule { keywords: &["rucksack", "tasche", "bag", "pack"], icon: "🎒", color: "#FF5722" },
    KeywordRule { keywords: &["trinken", "drink", "wasser", "water"], icon: "🥤", color: "#03A9F4" },
    KeywordRule { keywords: &["medikament", "medicine", "medizin"], icon: "💊", color: "#F44336" },
];

pub const FALLBACK_ICON: &str = "⭐";

#[rustfmt::skip]
pub const FALLBACK_COLORS: [&str; 10] = [
    "#FF9500", "#4CAF50", "#2196F3", "#E91E63", "#9C27B0",
    "#FFC107", "#00BCD4", "#FF5722", "#795548", "#607D8B",
];

/// Keyword lookup only; never touches the fallback rotation.
pub fn keyword_match(name: &str) -> Option<Suggestion> {
    let lower = name.trim().to_lowercase();
    if lower.is_empty() {
        return None;
    }

    KEYWORD_TABLE
        .iter()
        .find(|rule| rule.keywords.iter().any(|k| lower.contains(k)))
        .map(|rule| Suggestion::new(rule.icon, rule.color))
}

/// Suggestion state for one editing session. The fallback palette position
/// lives here rather than in a global so each session (and each test)
/// starts from the first colour.
#[derive(Debug, Clone, Default)]
pub struct SuggestionSession {
    fallback_index: usize,
}

impl SuggestionSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// `None` for a blank name.
    pub fn suggest(&mut self, name: &str) -> Option<Suggestion> {
        if name.trim().is_empty() {
            return None;
        }
        if let Some(s) = keyword_match(name) {
            return Some(s);
        }

        let color = FALLBACK_COLORS[self.fallback_index % FALLBACK_COLORS.len()];
        self.fallback_index += 1;
        Some(Suggestion::new(FALLBACK_ICON, color))
    }

    pub fn reset(&mut self) {
        self.fallback_index = 0;
    }
}
