//! Scanning of template text.
//!
//! Nothing here allocates: positions are byte offsets into the template and words
//! are borrowed slices of it, so any number of renders can scan at the same time.

use std::ops::Range;

mod header;


pub(crate) use self::header::{parse_condition, parse_foreach, Condition};

pub(crate) const VARIABLE_START: &str = "{{";
pub(crate) const VARIABLE_END: &str = "}}";
pub(crate) const TAG_START: &str = "{%";
pub(crate) const TAG_END: &str = "%}";

pub(crate) const FOREACH: &str = "foreach";
pub(crate) const ENDFOR: &str = "endfor";
pub(crate) const IF: &str = "if";
pub(crate) const ELSE: &str = "else";
pub(crate) const ENDIF: &str = "endif";

/// A `{% keyword ... %}` token
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Tag<'a> {
    /// Offset of `{%`
    pub start: usize,
    pub keyword: &'a str,
    /// Offset right after the keyword
    pub keyword_end: usize,
    /// Everything between the keyword and `%}`
    pub header: Range<usize>,
    /// Offset right after `%}`
    pub end: usize,
}

/// Where a block's inner tags sit
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Block {
    /// The `{% else %}` belonging to the block, if any
    pub else_tag: Option<Range<usize>>,
    /// Offset of the `{%` of the closing tag
    pub end_tag_start: usize,
    /// Offset right after the closing tag
    pub end: usize,
}

/// Offset of the first occurrence of `pattern` inside `range`
pub(crate) fn find(text: &str, range: Range<usize>, pattern: &str) -> Option<usize> {
    let start = range.start;
    text[range].find(pattern).map(|i| start + i)
}

/// Offset of the next `{{` or `{%` inside `range`
pub(crate) fn find_opening(text: &str, range: Range<usize>) -> Option<usize> {
    let end = range.end;
    text[range.clone()].match_indices('{').map(|(i, _)| range.start + i).find(|&i| {
        let rest = &text[i..end];
        rest.starts_with(VARIABLE_START) || rest.starts_with(TAG_START)
    })
}

/// The first whitespace separated word of `range` and the offset right after it.
/// The word is empty if the range only holds whitespace.
pub(crate) fn first_word(text: &str, range: Range<usize>) -> (&str, usize) {
    let slice = &text[range.clone()];
    let rest = slice.trim_start();
    let skipped = slice.len() - rest.len();
    let len = rest.find(char::is_whitespace).unwrap_or_else(|| rest.len());
    (&rest[..len], range.start + skipped + len)
}

/// Reads the tag whose `{%` is at `start`. `None` if it is never closed before `limit`.
pub(crate) fn read_tag(text: &str, start: usize, limit: usize) -> Option<Tag<'_>> {
    let close = find(text, start + TAG_START.len()..limit, TAG_END)?;
    let (keyword, keyword_end) = first_word(text, start + TAG_START.len()..close);
    let end = close + TAG_END.len();
    Some(Tag { start, keyword, keyword_end, header: keyword_end..close, end })
}

/// Finds the tag closing the block opened right before `from`.
///
/// Depth starts at 1: every `open` tag met on the way increments it, every `close`
/// tag decrements it and the `close` bringing it to 0 ends the block. When `middle`
/// is given, the first such tag seen at depth 1 is recorded, so an `else` belonging
/// to a nested block is never picked. `None` if the block never closes.
pub(crate) fn find_block_end(
    text: &str,
    from: usize,
    limit: usize,
    open: &str,
    close: &str,
    middle: Option<&str>,
) -> Option<Block> {
    let mut depth = 1;
    let mut else_tag = None;
    let mut cursor = from;

    while let Some(start) = find(text, cursor..limit, TAG_START) {
        let tag = read_tag(text, start, limit)?;
        if tag.keyword == open {
            depth += 1;
        } else if tag.keyword == close {
            depth -= 1;
            if depth == 0 {
                return Some(Block { else_tag, end_tag_start: tag.start, end: tag.end });
            }
        } else if depth == 1 && else_tag.is_none() && Some(tag.keyword) == middle {
            else_tag = Some(tag.start..tag.end);
        }
        cursor = tag.end;
    }

    None
}
