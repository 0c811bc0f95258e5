//! Inline author markup for slide text.
//!
//! `**text**` is accent bold, `*text*` is underlined and `==text==` is
//! highlighted. The scanner walks the input once, left to right. A delimiter
//! without a closing partner on the same line is kept as literal text.

use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum SpanKind {
    Plain,
    Accent,
    Underline,
    Highlight,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Span {
    pub kind: SpanKind,
    pub text: String,
}

impl Span {
    fn new(kind: SpanKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

// Longer delimiters first so `**` is never read as two `*`.
const DELIMITERS: [(&str, SpanKind); 3] = [
    ("**", SpanKind::Accent),
    ("==", SpanKind::Highlight),
    ("*", SpanKind::Underline),
];

pub fn parse_markup(input: &str) -> Vec<Span> {
    let mut spans = Vec::new();
    let mut plain = String::new();
    let mut rest = input;

    while !rest.is_empty() {
        if let Some((kind, inner, consumed)) = match_delimited(rest) {
            if !plain.is_empty() {
                spans.push(Span::new(SpanKind::Plain, std::mem::take(&mut plain)));
            }
            spans.push(Span::new(kind, inner));
            rest = &rest[consumed..];
            continue;
        }

        let mut chars = rest.chars();
        if let Some(ch) = chars.next() {
            plain.push(ch);
        }
        rest = chars.as_str();
    }

    if !plain.is_empty() {
        spans.push(Span::new(SpanKind::Plain, plain));
    }
    spans
}

/// Text with all recognised markup removed.
pub fn strip_markup(input: &str) -> String {
    parse_markup(input)
        .into_iter()
        .map(|span| span.text)
        .collect()
}

fn match_delimited(text: &str) -> Option<(SpanKind, &str, usize)> {
    for (delim, kind) in DELIMITERS {
        let Some(after) = text.strip_prefix(delim) else {
            continue;
        };
        let line = after.find('\n').map_or(after, |end| &after[..end]);
        match line.find(delim) {
            Some(end) if end > 0 => {
                return Some((kind, &after[..end], delim.len() * 2 + end));
            }
            _ => continue,
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(spans: &[Span]) -> Vec<(SpanKind, &str)> {
        spans.iter().map(|s| (s.kind, s.text.as_str())).collect()
    }

    #[test]
    fn plain_text_passes_through() {
        let spans = parse_markup("Build your SaaS in 7 days");
        assert_eq!(
            kinds(&spans),
            vec![(SpanKind::Plain, "Build your SaaS in 7 days")]
        );
    }

    #[test]
    fn each_delimiter_wraps_exactly_its_content() {
        assert_eq!(kinds(&parse_markup("**x**")), vec![(SpanKind::Accent, "x")]);
        assert_eq!(kinds(&parse_markup("*x*")), vec![(SpanKind::Underline, "x")]);
        assert_eq!(kinds(&parse_markup("==x==")), vec![(SpanKind::Highlight, "x")]);
    }

    #[test]
    fn mixed_markup_keeps_surrounding_text() {
        let spans = parse_markup("Ship **fast**, *test* and ==launch== today");
        assert_eq!(
            kinds(&spans),
            vec![
                (SpanKind::Plain, "Ship "),
                (SpanKind::Accent, "fast"),
                (SpanKind::Plain, ", "),
                (SpanKind::Underline, "test"),
                (SpanKind::Plain, " and "),
                (SpanKind::Highlight, "launch"),
                (SpanKind::Plain, " today"),
            ]
        );
    }

    #[test]
    fn unmatched_delimiters_are_literal() {
        assert_eq!(
            kinds(&parse_markup("**open ended")),
            vec![(SpanKind::Plain, "**open ended")]
        );
        assert_eq!(
            kinds(&parse_markup("5 * 3 = 15")),
            vec![(SpanKind::Plain, "5 * 3 = 15")]
        );
        assert_eq!(kinds(&parse_markup("a == b")), vec![(SpanKind::Plain, "a == b")]);
        assert_eq!(kinds(&parse_markup("****")), vec![(SpanKind::Plain, "****")]);
    }

    #[test]
    fn markup_does_not_cross_line_breaks() {
        assert_eq!(
            kinds(&parse_markup("**one\ntwo**")),
            vec![(SpanKind::Plain, "**one\ntwo**")]
        );
    }

    #[test]
    fn adjacent_spans_stay_separate() {
        let spans = parse_markup("**a****b**");
        assert_eq!(
            kinds(&spans),
            vec![(SpanKind::Accent, "a"), (SpanKind::Accent, "b")]
        );
    }

    #[test]
    fn handles_multibyte_text() {
        let spans = parse_markup("café ==ñandú== ✓");
        assert_eq!(
            kinds(&spans),
            vec![
                (SpanKind::Plain, "café "),
                (SpanKind::Highlight, "ñandú"),
                (SpanKind::Plain, " ✓"),
            ]
        );
    }

    #[test]
    fn strip_markup_keeps_content() {
        assert_eq!(strip_markup("Go **all** in *now*"), "Go all in now");
    }

    #[test]
    fn empty_input_has_no_spans() {
        assert!(parse_markup("").is_empty());
    }
}
