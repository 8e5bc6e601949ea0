/// Fuzzy search over choices.
///
/// Scoring runs in two passes per field:
///
/// 1. **Subsequence match** through nucleo. The raw score is normalised
///    against the score the query earns on itself, so a perfect match is 0
///    and weaker matches approach 1.
/// 2. **Approximate match** when the subsequence pass fails: the minimum
///    edit distance between the query and any substring of the field,
///    divided by the query length. This tolerates small misspellings.
///
/// A field is accepted when its score is at most the configured threshold.
/// The best field wins, and results are ordered best first.
use std::str::FromStr;

use nucleo_matcher::{
    Matcher, Utf32Str,
    pattern::{AtomKind, CaseMatching, Normalization, Pattern},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::action::SearchMatch;
use super::errors::ChoicesError;
use super::model::{Choice, ChoiceId};

/// Which part of a choice is matched against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum FieldKey {
    Value,
    Label,
    /// Dotted path into `customProperties`, e.g. `customProperties.country`.
    Custom(String),
}

impl FromStr for FieldKey {
    type Err = ChoicesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "value" => Ok(Self::Value),
            "label" => Ok(Self::Label),
            _ => match s.strip_prefix("customProperties.") {
                Some(path) if !path.is_empty() => Ok(Self::Custom(path.to_owned())),
                _ => Err(ChoicesError::UnknownSearchField {
                    field: s.to_owned(),
                }),
            },
        }
    }
}

impl TryFrom<String> for FieldKey {
    type Error = ChoicesError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<FieldKey> for String {
    fn from(key: FieldKey) -> Self {
        match key {
            FieldKey::Value => "value".to_owned(),
            FieldKey::Label => "label".to_owned(),
            FieldKey::Custom(path) => format!("customProperties.{path}"),
        }
    }
}

impl FieldKey {
    /// Text of this field on `choice`, if present and textual.
    #[must_use]
    pub fn extract(&self, choice: &Choice) -> Option<String> {
        match self {
            Self::Value => Some(choice.value.clone()),
            Self::Label => Some(choice.label.clone()),
            Self::Custom(path) => match fetch_path(&choice.custom_properties, path)? {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                Value::Bool(b) => Some(b.to_string()),
                _ => None,
            },
        }
    }
}

/// A searchable field with its weight in `(0, 1]`.
///
/// Deserialises from a bare field name or `{ "key": ..., "weight": ... }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawField")]
pub struct SearchField {
    pub key: FieldKey,
    pub weight: f64,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawField {
    Key(FieldKey),
    Weighted {
        key: FieldKey,
        #[serde(default = "default_weight")]
        weight: f64,
    },
}

impl From<RawField> for SearchField {
    fn from(raw: RawField) -> Self {
        match raw {
            RawField::Key(key) => Self { key, weight: 1.0 },
            RawField::Weighted { key, weight } => Self { key, weight },
        }
    }
}

fn default_weight() -> f64 {
    1.0
}

impl From<FieldKey> for SearchField {
    fn from(key: FieldKey) -> Self {
        Self { key, weight: 1.0 }
    }
}

/// Fuzzy matching knobs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FuzzyOptions {
    /// Highest accepted score. 0 accepts only perfect matches, 1 accepts anything.
    pub threshold: f64,
    /// Case-sensitive matching (default: ignore case).
    pub case_sensitive: bool,
    /// Disable the approximate (typo-tolerant) pass.
    pub subsequence_only: bool,
}

impl Default for FuzzyOptions {
    fn default() -> Self {
        Self {
            threshold: 0.6,
            case_sensitive: false,
            subsequence_only: false,
        }
    }
}

/// Field texts of the choices captured when the index was built.
#[derive(Debug, Clone)]
pub struct SearchIndex {
    entries: Vec<(ChoiceId, Vec<Option<String>>)>,
    fields: Vec<SearchField>,
    opts: FuzzyOptions,
}

impl SearchIndex {
    /// Build an index over `choices` for the given fields.
    #[must_use]
    pub fn new<'a>(
        choices: impl IntoIterator<Item = &'a Choice>,
        fields: &[SearchField],
        opts: &FuzzyOptions,
    ) -> Self {
        let entries = choices
            .into_iter()
            .map(|choice| {
                let texts = fields.iter().map(|f| f.key.extract(choice)).collect();
                (choice.id, texts)
            })
            .collect();
        Self {
            entries,
            fields: fields.to_vec(),
            opts: opts.clone(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Rank indexed choices against `query`, best first. Ties keep index order.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<SearchMatch> {
        let query = query.trim();
        if query.is_empty() {
            return Vec::new();
        }

        let mut scorer = Scorer::new(query, &self.opts);
        let mut scored: Vec<SearchMatch> = self
            .entries
            .iter()
            .filter_map(|(id, texts)| {
                let best = texts
                    .iter()
                    .zip(&self.fields)
                    .filter_map(|(text, field)| {
                        let score = scorer.score(text.as_deref()?)?;
                        Some(1.0 - field.weight.clamp(0.0, 1.0) * (1.0 - score))
                    })
                    .filter(|score| *score <= self.opts.threshold)
                    .min_by(f64::total_cmp)?;
                Some(SearchMatch {
                    id: *id,
                    score: best,
                })
            })
            .collect();

        scored.sort_by(|a, b| a.score.total_cmp(&b.score));
        scored
    }
}

/// Per-query scoring state, reused across haystacks.
struct Scorer {
    pattern: Pattern,
    matcher: Matcher,
    buf: Vec<char>,
    perfect: u32,
    needle: Vec<char>,
    case_sensitive: bool,
    approximate: bool,
}

impl Scorer {
    fn new(query: &str, opts: &FuzzyOptions) -> Self {
        let case_matching = if opts.case_sensitive {
            CaseMatching::Respect
        } else {
            CaseMatching::Ignore
        };
        let pattern = Pattern::new(query, case_matching, Normalization::Smart, AtomKind::Fuzzy);
        let mut matcher = Matcher::new(nucleo_matcher::Config::DEFAULT);
        let mut buf = Vec::new();
        let perfect = pattern
            .score(Utf32Str::new(query, &mut buf), &mut matcher)
            .unwrap_or(1)
            .max(1);
        Self {
            pattern,
            matcher,
            buf,
            perfect,
            needle: fold(query, opts.case_sensitive),
            case_sensitive: opts.case_sensitive,
            approximate: !opts.subsequence_only,
        }
    }

    /// Normalised score in `[0, 1]`, or `None` when nothing matched.
    fn score(&mut self, haystack: &str) -> Option<f64> {
        self.buf.clear();
        let utf32 = Utf32Str::new(haystack, &mut self.buf);
        if let Some(raw) = self.pattern.score(utf32, &mut self.matcher) {
            let folded_eq = fold(haystack, self.case_sensitive) == self.needle;
            if folded_eq {
                return Some(0.0);
            }
            let ratio = f64::from(raw) / f64::from(self.perfect);
            // Never report 0 for anything but an exact match.
            return Some((1.0 - ratio).clamp(0.001, 1.0));
        }
        if !self.approximate || self.needle.is_empty() {
            return None;
        }
        let distance = substring_edit_distance(&self.needle, &fold(haystack, self.case_sensitive));
        #[allow(clippy::cast_precision_loss)]
        let score = distance as f64 / self.needle.len() as f64;
        (score < 1.0).then_some(score)
    }
}

fn fold(s: &str, case_sensitive: bool) -> Vec<char> {
    if case_sensitive {
        s.trim().chars().collect()
    } else {
        s.trim().to_lowercase().chars().collect()
    }
}

/// Smallest edit distance between `needle` and any substring of `haystack`.
///
/// Sellers' variant of Levenshtein: the first row is all zeros so a match
/// may start anywhere, and the answer is the minimum of the last row.
#[must_use]
pub fn substring_edit_distance(needle: &[char], haystack: &[char]) -> usize {
    if needle.is_empty() {
        return 0;
    }
    // col[i] = distance of needle[..i] ending at the current haystack position
    let mut prev: Vec<usize> = (0..=needle.len()).collect();
    let mut best = prev[needle.len()];
    for &h in haystack {
        let mut cur = vec![0; needle.len() + 1];
        for (i, &n) in needle.iter().enumerate() {
            let substitution = prev[i] + usize::from(n != h);
            cur[i + 1] = substitution.min(prev[i + 1] + 1).min(cur[i] + 1);
        }
        best = best.min(cur[needle.len()]);
        prev = cur;
    }
    best
}

/// Resolve a dotted path (`a.b.c`) inside a JSON value.
#[must_use]
pub fn fetch_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(value, |current, segment| current.get(segment))
}
