use crate::{
    catalog::StyleName,
    error::Result,
};

/// Number of `style_name`'s characteristic keywords that occur in `text`.
///
/// Matching is a case-insensitive substring search; each keyword counts at
/// most once. Fails with `UnknownStyle` for names outside the catalog.
pub fn count_matches(text: &str, style_name: &str) -> Result<usize> {
    let style: StyleName = style_name.parse()?;
    Ok(count_style_matches(text, style))
}

pub fn count_style_matches(text: &str, style: StyleName) -> usize {
    let haystack = text.to_lowercase();
    style
        .record()
        .characteristics
        .iter()
        .filter(|keyword| haystack.contains(&keyword.to_lowercase()))
        .count()
}
