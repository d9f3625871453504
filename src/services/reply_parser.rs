use crate::services::category_filter::Category;
use once_cell::sync::Lazy;
use regex::Regex;

static GIVEN_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)Given:\s*(\w+)").expect("valid given pattern"));
static BOTTOM_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)Bottom Wear:\s*(.*)").expect("valid bottom pattern"));
static TOP_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)Top:\s*(.*)").expect("valid top pattern"));
static ACCESSORY_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)Accessory:\s*(.*)").expect("valid accessory pattern"));

/// Fields extracted from the vision model's free-text reply. Missing fields are empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassificationResult {
    /// Lower-cased first word after `Given:`
    pub given: String,
    pub top_query: String,
    pub bottom_query: String,
    pub accessory_query: String,
}

impl ClassificationResult {
    pub fn category(&self) -> Option<Category> {
        Category::from_label(&self.given)
    }

    /// Suggestion text the model proposed for `category`.
    pub fn query_for(&self, category: Category) -> &str {
        match category {
            Category::Top => &self.top_query,
            Category::Bottom => &self.bottom_query,
            Category::Accessory => &self.accessory_query,
        }
    }
}

fn capture(pattern: &Regex, reply: &str) -> String {
    pattern
        .captures(reply)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default()
}

/// Never fails; each pattern is matched independently against the whole reply.
pub fn parse_reply(reply: &str) -> ClassificationResult {
    ClassificationResult {
        given: capture(&GIVEN_PATTERN, reply).to_lowercase(),
        top_query: capture(&TOP_PATTERN, reply),
        bottom_query: capture(&BOTTOM_PATTERN, reply),
        accessory_query: capture(&ACCESSORY_PATTERN, reply),
    }
}
