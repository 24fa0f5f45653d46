//! Best-effort structured data recovery from free-text product HTML.
//!
//! Every extraction is a heuristic. A pattern that does not match leaves the
//! corresponding field at its empty default; nothing here returns an error
//! once the extractor is built.

mod patterns;

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};
use scraper::{ElementRef, Html, Selector};
use shopcat_core::{ExtractedFields, ReviewsData};

pub use patterns::PatternTable;

static LI: LazyLock<Selector> = LazyLock::new(|| Selector::parse("li").expect("valid selector"));
static TABLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("table").expect("valid selector"));
static TR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("tr").expect("valid selector"));
static CELL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("td, th").expect("valid selector"));

const MAX_FEATURES: usize = 10;
const MIN_FEATURE_CHARS: usize = 5;

/// Compiled form of a [`PatternTable`].
///
/// Build once and reuse; extraction borrows `&self` so one extractor can be
/// shared freely across tasks.
#[derive(Debug, Clone)]
pub struct TextExtractor {
    ingredients: Regex,
    certifications: Vec<String>,
    nutrients: Vec<(String, Regex)>,
    rating: Vec<Regex>,
    review_count: Vec<Regex>,
}

impl Default for TextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl TextExtractor {
    /// Builds an extractor from the built-in pattern table.
    ///
    /// # Panics
    ///
    /// Never in practice: the built-in patterns are constant and covered by
    /// tests.
    #[must_use]
    pub fn new() -> Self {
        Self::from_table(&PatternTable::default()).expect("built-in patterns are valid")
    }

    /// Compiles a custom pattern table.
    ///
    /// # Errors
    ///
    /// Returns [`regex::Error`] for the first pattern that does not compile.
    pub fn from_table(table: &PatternTable) -> Result<Self, regex::Error> {
        Ok(Self {
            ingredients: compile(&table.ingredients)?,
            certifications: table
                .certifications
                .iter()
                .map(|keyword| keyword.to_lowercase())
                .collect(),
            nutrients: table
                .nutrients
                .iter()
                .map(|(name, pattern)| Ok((name.clone(), compile(pattern)?)))
                .collect::<Result<_, regex::Error>>()?,
            rating: table
                .rating
                .iter()
                .map(|p| compile(p))
                .collect::<Result<_, _>>()?,
            review_count: table
                .review_count
                .iter()
                .map(|p| compile(p))
                .collect::<Result<_, _>>()?,
        })
    }

    /// Pulls ingredients, certifications, nutrition, feature bullets and
    /// specification tables out of a product description.
    ///
    /// Absent or empty descriptions yield [`ExtractedFields::default`].
    #[must_use]
    pub fn extract_from_description(&self, html: Option<&str>) -> ExtractedFields {
        let Some(html) = html.filter(|h| !h.is_empty()) else {
            return ExtractedFields::default();
        };

        let fragment = Html::parse_fragment(html);
        let text = fragment
            .root_element()
            .text()
            .collect::<String>()
            .to_lowercase();

        let ingredients = self
            .ingredients
            .captures(&text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_owned())
            .filter(|s| !s.is_empty());

        let certifications = self
            .certifications
            .iter()
            .filter(|keyword| text.contains(keyword.as_str()))
            .map(|keyword| keyword.to_uppercase())
            .collect();

        let nutritional_info = self
            .nutrients
            .iter()
            .filter_map(|(name, re)| {
                let amount = re.captures(&text)?.get(1)?.as_str().to_owned();
                Some((name.clone(), amount))
            })
            .collect();

        ExtractedFields {
            ingredients,
            nutritional_info,
            certifications,
            features: features(&fragment),
            specifications: specifications(&fragment),
        }
    }

    /// Reads a star rating and review count from a rendered product page.
    ///
    /// Individual reviews are not scraped, so `reviews` is always empty.
    #[must_use]
    pub fn extract_reviews_data(&self, html: &str) -> ReviewsData {
        let document = Html::parse_document(html);
        let text = document.root_element().text().collect::<String>();

        let rating = self.rating.iter().find_map(|re| {
            re.captures(&text)?
                .get(1)?
                .as_str()
                .parse::<f64>()
                .ok()
                .filter(|r| r.is_finite())
        });

        let review_count = self
            .review_count
            .iter()
            .find_map(|re| re.captures(&text)?.get(1)?.as_str().parse::<u64>().ok())
            .unwrap_or(0);

        ReviewsData {
            rating,
            review_count,
            reviews: Vec::new(),
        }
    }
}

fn compile(pattern: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(pattern).case_insensitive(true).build()
}

/// Text of an element with each text node trimmed and the pieces joined
/// without a separator.
fn stripped_text(element: ElementRef<'_>) -> String {
    element.text().map(str::trim).collect()
}

fn features(fragment: &Html) -> Vec<String> {
    fragment
        .select(&LI)
        .map(stripped_text)
        .filter(|feature| feature.chars().count() > MIN_FEATURE_CHARS)
        .take(MAX_FEATURES)
        .collect()
}

fn specifications(fragment: &Html) -> BTreeMap<String, String> {
    let mut specs = BTreeMap::new();
    for table in fragment.select(&TABLE) {
        for row in table.select(&TR) {
            let mut cells = row.select(&CELL);
            let (Some(key_cell), Some(value_cell)) = (cells.next(), cells.next()) else {
                continue;
            };
            let key = stripped_text(key_cell);
            let value = stripped_text(value_cell);
            if !key.is_empty() && !value.is_empty() {
                specs.insert(key, value);
            }
        }
    }
    specs
}
