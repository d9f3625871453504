use std::fmt;

const TOP_KEYWORDS: &[&str] = &["top", "shirt", "t-shirt", "kurta", "blouse"];
const BOTTOM_KEYWORDS: &[&str] = &["jeans", "trouser", "pant", "skirt", "shorts"];
const ACCESSORY_KEYWORDS: &[&str] = &[
    "watch", "belt", "cap", "bag", "scarf", "beanie", "necklace",
];

/// The three clothing groupings used for both classification and filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Top,
    Bottom,
    Accessory,
}

impl Category {
    /// Checked in this order; the first set a name matches wins.
    pub const ALL: [Category; 3] = [Category::Top, Category::Bottom, Category::Accessory];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Top => "top",
            Category::Bottom => "bottom",
            Category::Accessory => "accessory",
        }
    }

    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            Category::Top => TOP_KEYWORDS,
            Category::Bottom => BOTTOM_KEYWORDS,
            Category::Accessory => ACCESSORY_KEYWORDS,
        }
    }

    /// Case-insensitive substring match against this category's keywords.
    pub fn matches(&self, name: &str) -> bool {
        let name = name.to_lowercase();
        self.keywords().iter().any(|keyword| name.contains(keyword))
    }

    /// Parses a classifier label. Only the exact lower-cased words are accepted.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|category| category.as_str() == label)
    }

    /// The two categories to recommend when an item of this category was uploaded.
    pub fn complements(&self) -> [Category; 2] {
        match self {
            Category::Top => [Category::Bottom, Category::Accessory],
            Category::Bottom => [Category::Top, Category::Accessory],
            Category::Accessory => [Category::Top, Category::Bottom],
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Keyword classification of a product name; `None` when no set matches.
pub fn classify(name: &str) -> Option<Category> {
    Category::ALL
        .into_iter()
        .find(|category| category.matches(name))
}
