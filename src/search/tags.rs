use super::normalize;

/// Splits a keyword phrase into normalized word tags.
///
/// Word order is preserved and repeated words are kept; the index applies
/// set semantics itself.
pub fn extract_tags<'a>(phrase: impl Into<Option<&'a str>>) -> Vec<String> {
    let Some(phrase) = phrase.into() else {
        return Vec::new();
    };

    phrase
        .split_whitespace()
        .map(|word| normalize(word))
        .filter(|tag| !tag.is_empty())
        .collect()
}
