//! Pattern tables driving [`super::TextExtractor`].
//!
//! Patterns are plain data so that a caller can swap in a table tuned for a
//! particular storefront without touching extraction code. All regexes are
//! matched case-insensitively against plain text.

/// Ingredient list: everything after an `ingredient(s):` label up to the next
/// period or newline.
pub const INGREDIENTS: &str = r"ingredients?:?\s*([^\n.]+)";

/// Certification keywords, reported upper-cased in this order.
pub const CERTIFICATIONS: &[&str] = &[
    "organic",
    "usda",
    "fda",
    "certified",
    "iso",
    "halal",
    "kosher",
    "non-gmo",
];

/// Nutrient name and the pattern whose first group captures its amount.
pub const NUTRIENTS: &[(&str, &str)] = &[
    ("calories", r"(\d+)\s*cal(?:ories)?"),
    ("protein", r"(\d+\.?\d*)\s*g?\s*protein"),
    ("carbs", r"(\d+\.?\d*)\s*g?\s*carb(?:ohydrate)?s?"),
    ("fat", r"(\d+\.?\d*)\s*g?\s*fat"),
    ("fiber", r"(\d+\.?\d*)\s*g?\s*fiber"),
];

/// Star-rating patterns, tried in order.
pub const RATING: &[&str] = &[
    r"(\d+\.?\d*)\s*out of\s*5",
    r"rating[:\s]*(\d+\.?\d*)",
    r"(\d+\.?\d*)\s*stars?",
];

/// Review-count patterns, tried in order.
pub const REVIEW_COUNT: &[&str] = &[r"(\d+)\s*reviews?", r"(\d+)\s*ratings?"];

/// Source patterns for a [`super::TextExtractor`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternTable {
    pub ingredients: String,
    pub certifications: Vec<String>,
    pub nutrients: Vec<(String, String)>,
    pub rating: Vec<String>,
    pub review_count: Vec<String>,
}

impl Default for PatternTable {
    fn default() -> Self {
        Self {
            ingredients: INGREDIENTS.to_owned(),
            certifications: CERTIFICATIONS.iter().map(|&k| k.to_owned()).collect(),
            nutrients: NUTRIENTS
                .iter()
                .map(|&(name, pattern)| (name.to_owned(), pattern.to_owned()))
                .collect(),
            rating: RATING.iter().map(|&p| p.to_owned()).collect(),
            review_count: REVIEW_COUNT.iter().map(|&p| p.to_owned()).collect(),
        }
    }
}
