//! Title folding, fuzzy similarity and size delta.

use crate::bundle::bytes_to_gb;

/// Lowercase ASCII with accents transliterated and punctuation turned into
/// single spaces.
///
/// ```
/// use sceneprep::dupes::similarity::fold_title;
///
/// assert_eq!(fold_title("Amélie: Le Fabuleux Destin!"), "amelie le fabuleux destin");
/// ```
pub fn fold_title(title: &str) -> String {
    let ascii = deunicode::deunicode(title).to_lowercase();
    let replaced: String = ascii
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { ' ' })
        .collect();
    replaced.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Similarity of two titles in 0..=100 after folding.
pub fn title_similarity(a: &str, b: &str) -> u32 {
    let ratio = strsim::normalized_levenshtein(&fold_title(a), &fold_title(b));
    (ratio * 100.0).round().clamp(0.0, 100.0) as u32
}

/// Relative size difference in whole percent of the larger size.
///
/// Symmetric in its arguments; two empty releases differ by 0%.
pub fn size_delta_percent(a_bytes: u64, b_bytes: u64) -> u32 {
    let a = bytes_to_gb(a_bytes);
    let b = bytes_to_gb(b_bytes);
    let max = a.max(b);
    if max <= 0.0 {
        return 0;
    }
    ((a - b).abs() / max * 100.0).round() as u32
}
