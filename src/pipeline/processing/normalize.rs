use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use tracing::debug;

use crate::domain::NormalizedText;

static DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{2,4})[年/\-](\d{1,2})[月/\-](\d{1,2})日?").expect("date pattern is valid")
});

static WEIGHT_UNIT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d+\.?\d*)\s*(千克|公斤|kg|KG)").expect("weight unit pattern is valid")
});

static SENTENCE_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[。！？；.!?;]").expect("sentence pattern is valid"));

static WHITESPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

/// Separator used to rejoin sentences into processed text
pub const SENTENCE_JOINER: &str = "。";

/// Canonicalize a raw record: dates, weight units, sentences and whitespace.
///
/// Empty input yields an empty result rather than an error.
pub fn normalize(text: &str) -> NormalizedText {
    if text.is_empty() {
        return NormalizedText::default();
    }

    let dated = rewrite_dates(text);
    let unified = rewrite_weight_units(&dated);

    let sentences: Vec<String> = SENTENCE_BREAK
        .split(&unified)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| WHITESPACE.replace_all(s, " ").trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    let processed = sentences.join(SENTENCE_JOINER);
    debug!(sentences = sentences.len(), "normalized record");

    NormalizedText {
        original: text.to_string(),
        processed,
        sentences,
    }
}

/// `YY|YYYY<sep>M<sep>D[日]` to `YYYY-MM-DD`
fn rewrite_dates(text: &str) -> String {
    DATE.replace_all(text, |caps: &Captures| {
        let year = &caps[1];
        let year = if year.chars().count() == 2 {
            format!("20{}", year)
        } else {
            year.to_string()
        };
        format!("{}-{}-{}", year, zero_pad(&caps[2]), zero_pad(&caps[3]))
    })
    .into_owned()
}

fn zero_pad(part: &str) -> String {
    if part.chars().count() < 2 {
        format!("0{}", part)
    } else {
        part.to_string()
    }
}

/// Every kilogram spelling becomes `<value> kg`
fn rewrite_weight_units(text: &str) -> String {
    WEIGHT_UNIT.replace_all(text, "$1 kg").into_owned()
}
