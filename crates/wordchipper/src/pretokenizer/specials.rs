//! # Special-Token Splitting

use regex::Regex;

/// One segment of text produced by [`split_on_specials`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment<'a> {
    /// A run of text that is not a special token.
    Text(&'a str),

    /// An occurrence of a special token (only produced when `keep_specials`
    /// is `true`).
    Special(&'a str),
}

/// Build a union pattern of exact-match alternatives, longest first.
///
/// Sorting by descending length before joining ensures that when one
/// special token is a prefix of another, the longer (more specific) match
/// wins, matching the teacher crate's
/// `utility::regex::alternate_choice_regex_pattern` construction.
///
/// ## Arguments
/// * `specials` - The special token strings to alternate between.
///
/// ## Returns
/// `None` if `specials` is empty, otherwise a compiled [`Regex`] matching
/// any one of them.
pub fn specials_regex<S: AsRef<str>>(specials: &[S]) -> Option<Regex> {
    if specials.is_empty() {
        return None;
    }

    let mut sorted: Vec<&str> = specials.iter().map(|s| s.as_ref()).collect();
    sorted.sort_by_key(|s| core::cmp::Reverse(s.len()));

    let pattern = sorted
        .iter()
        .map(|s| regex::escape(s))
        .collect::<Vec<_>>()
        .join("|");

    Some(Regex::new(&pattern).expect("special token alternation must compile"))
}

/// Split `text` on occurrences of any of `specials`.
///
/// Specials are matched as literal strings; the longest one wins when two
/// are prefixes of one another. When `keep_specials` is `true`, each
/// special occurrence is emitted as its own [`Segment::Special`] entry
/// interleaved with the surrounding [`Segment::Text`] entries; otherwise
/// specials are discarded and only the text between them is returned.
///
/// ## Arguments
/// * `text` - The text to split.
/// * `specials` - The special token strings to split on.
/// * `keep_specials` - Whether to retain special occurrences in the output.
///
/// ## Returns
/// The ordered sequence of segments; concatenating the `Text` (and, if
/// kept, `Special`) segments reproduces `text` exactly.
pub fn split_on_specials<'a, S: AsRef<str>>(
    text: &'a str,
    specials: &[S],
    keep_specials: bool,
) -> Vec<Segment<'a>> {
    let Some(re) = specials_regex(specials) else {
        return vec![Segment::Text(text)];
    };

    let mut segments = Vec::new();
    let mut last = 0;

    for m in re.find_iter(text) {
        if m.start() > last {
            segments.push(Segment::Text(&text[last..m.start()]));
        }
        if keep_specials {
            segments.push(Segment::Special(m.as_str()));
        }
        last = m.end();
    }

    if last < text.len() {
        segments.push(Segment::Text(&text[last..]));
    }

    segments
}
