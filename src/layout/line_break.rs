//! Line breaking: wrap a token's text into fixed-width rows

use crate::script::{LineItem, OwnerId, Token};
use std::borrow::Cow;
use unicode_segmentation::UnicodeSegmentation;

/// Spaces a tab expands to before width accounting
pub const TAB_WIDTH: usize = 4;

/// Line breaker
#[derive(Default)]
pub struct LineBreaker;

impl LineBreaker {
    pub fn new() -> Self {
        Self
    }

    /// Split `text` into rows of at most `max_width` grapheme clusters.
    ///
    /// Breaks on the last whitespace within the first `max_width + 1`
    /// clusters; without one, hard-breaks at `max_width - 1`. Offsets count
    /// from `start_offset` and stay absolute across rows: each row's
    /// `from..to` includes the whitespace swallowed by its break, so the
    /// rows tile the text with no gaps. Empty text yields one empty row.
    pub fn split(
        &self,
        text: &str,
        max_width: usize,
        start_offset: usize,
        token: &Token,
        owner: OwnerId,
    ) -> Vec<LineItem> {
        let max_width = max_width.max(1);
        let text = normalize_tabs(text);
        let graphemes: Vec<&str> = text.graphemes(true).collect();

        let mut lines = Vec::with_capacity(graphemes.len() / max_width + 1);
        let mut rest = graphemes.as_slice();
        let mut offset = start_offset;

        while rest.len() > max_width {
            let window = &rest[..=max_width];
            let (line_len, consumed) = match window.iter().rposition(is_whitespace) {
                Some(space) => (space, space + 1),
                None => {
                    // Hard break, no trim
                    let hard = (max_width - 1).max(1);
                    (hard, hard)
                }
            };

            lines.push(LineItem::from_token(
                token,
                owner,
                rest[..line_len].concat(),
                offset,
                offset + consumed,
            ));

            rest = &rest[consumed..];
            offset += consumed;
        }

        lines.push(LineItem::from_token(
            token,
            owner,
            rest.concat(),
            offset,
            offset + rest.len(),
        ));

        for (local_index, line) in lines.iter_mut().enumerate() {
            line.local_index = local_index;
        }

        lines
    }
}

/// Expand tabs to spaces
pub fn normalize_tabs(text: &str) -> Cow<'_, str> {
    if text.contains('\t') {
        Cow::Owned(text.replace('\t', &" ".repeat(TAB_WIDTH)))
    } else {
        Cow::Borrowed(text)
    }
}

fn is_whitespace(grapheme: &&str) -> bool {
    grapheme.chars().all(char::is_whitespace)
}
