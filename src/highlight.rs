use serde::Serialize;

/// Body text split around the persuasive phrase. At most one highlighted span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segments<'a> {
    pub prefix: &'a str,
    pub highlight: Option<&'a str>,
    pub suffix: &'a str,
}

impl<'a> Segments<'a> {
    fn plain(text: &'a str) -> Self {
        Segments { prefix: text, highlight: None, suffix: "" }
    }
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct SegmentsBuf {
    pub prefix: String,
    pub highlight: Option<String>,
    pub suffix: String,
}

impl From<Segments<'_>> for SegmentsBuf {
    fn from(s: Segments<'_>) -> Self {
        SegmentsBuf {
            prefix: s.prefix.to_string(),
            highlight: s.highlight.map(str::to_string),
            suffix: s.suffix.to_string(),
        }
    }
}

/// Splits `primary_text` on the first case-sensitive literal occurrence of `phrase`.
///
/// An empty or absent phrase renders the whole text plain. Text after the first
/// match is kept verbatim in `suffix`, including later repeats of the phrase.
pub fn locate<'a>(primary_text: &'a str, phrase: &str) -> Segments<'a> {
    if phrase.is_empty() {
        return Segments::plain(primary_text);
    }
    match primary_text.find(phrase) {
        Some(start) => {
            let end = start + phrase.len();
            Segments {
                prefix: &primary_text[..start],
                highlight: Some(&primary_text[start..end]),
                suffix: &primary_text[end..],
            }
        }
        None => Segments::plain(primary_text),
    }
}
