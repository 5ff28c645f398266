/// Holder count extraction from loosely structured text
///
/// Explorer pages and relayed payloads put the holder count next to a
/// "Holders" label in a handful of shapes. Patterns are tried in priority
/// order and the first pattern producing a parseable, plausible number wins.
///
/// Pure function over its input: no logging, caching or retries. "No match"
/// is an ordinary outcome and is returned as `None`.
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use super::types::PlausibilityBounds;

/// Default patterns, highest priority first
pub const DEFAULT_PATTERNS: &[&str] = &[
    // "Holders: 1,416"
    r"(?i)Holders?:\s*([0-9,]+)",
    // "1,416 Holders"
    r"(?i)([0-9,]+)\s*Holders?",
    // "holders": "1,416" / "holders":1416
    r#"(?i)"holders?"[:\s]*"?([0-9,]+)"?"#,
    // "holder" followed by a number further along
    r"(?i)holders?[^0-9]*([0-9,]+)",
    // loose separators: holders='1,416'
    r#"(?i)holders?['":\s]*([0-9,]+)"#,
];

static DEFAULT_REGEXES: Lazy<Vec<Regex>> = Lazy::new(|| {
    DEFAULT_PATTERNS
        .iter()
        .map(|p| Regex::new(p).expect("built-in holder pattern must compile"))
        .collect()
});

/// Per-pattern outcome, used by the diagnostics endpoint and debug tools
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatternReport {
    pub index: usize,
    pub pattern: String,
    /// First raw capture of this pattern, if it matched at all
    pub capture: Option<String>,
    /// First plausible count this pattern yields
    pub accepted: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct HolderExtractor {
    patterns: Vec<Regex>,
    bounds: PlausibilityBounds,
}

impl HolderExtractor {
    pub fn new(bounds: PlausibilityBounds) -> Self {
        Self {
            patterns: DEFAULT_REGEXES.clone(),
            bounds,
        }
    }

    /// Build with a custom pattern list; capture group 1 must hold the number
    pub fn with_patterns(patterns: &[&str], bounds: PlausibilityBounds) -> Result<Self, regex::Error> {
        let patterns = patterns
            .iter()
            .map(|p| Regex::new(p))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns, bounds })
    }

    pub fn bounds(&self) -> PlausibilityBounds {
        self.bounds
    }

    /// Return the first plausible holder count, or `None`
    pub fn extract(&self, text: &str) -> Option<u64> {
        self.patterns
            .iter()
            .find_map(|pattern| self.first_accepted(pattern, text))
    }

    /// Evaluate every pattern independently
    pub fn diagnose(&self, text: &str) -> Vec<PatternReport> {
        self.patterns
            .iter()
            .enumerate()
            .map(|(index, pattern)| PatternReport {
                index,
                pattern: pattern.as_str().to_string(),
                capture: pattern
                    .captures(text)
                    .and_then(|c| c.get(1))
                    .map(|m| m.as_str().to_string()),
                accepted: self.first_accepted(pattern, text),
            })
            .collect()
    }

    fn first_accepted(&self, pattern: &Regex, text: &str) -> Option<u64> {
        pattern
            .captures_iter(text)
            .filter_map(|caps| caps.get(1))
            .filter_map(|m| parse_grouped_count(m.as_str()))
            .find_map(|value| self.bounds.accept(value))
    }
}

impl Default for HolderExtractor {
    fn default() -> Self {
        Self::new(PlausibilityBounds::default())
    }
}

/// Parse "1,416" style numbers; grouping commas are dropped
pub fn parse_grouped_count(raw: &str) -> Option<i128> {
    let digits: String = raw.chars().filter(|c| *c != ',').collect();
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    digits.parse::<i128>().ok()
}
