//! Render lines: the engine's output unit

use super::{DualPosition, OwnerId, Token, TokenKind};
use serde::{Deserialize, Serialize};

/// One fixed-width renderable row
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LineItem {
    #[serde(rename = "type")]
    pub kind: TokenKind,
    pub text: String,
    /// Start offset (grapheme clusters) within the owner token's text
    pub from: usize,
    /// End offset (exclusive), including whitespace consumed by the wrap
    pub to: usize,
    /// Source offset of the owner token, so `offset + from` addresses source
    pub offset: usize,
    pub line: Option<usize>,
    pub order: Option<usize>,
    pub duration: Option<f64>,
    pub indent: Option<u8>,
    pub level: Option<u8>,
    pub position: Option<DualPosition>,
    /// Scene id, set only on a scene heading's first row
    pub scene: Option<String>,
    /// Token this row was split from; `None` for engine-made rows
    pub owner: Option<OwnerId>,
    /// Position within the owner's wrapped rows
    pub local_index: usize,
    /// Position within the whole document
    pub global_index: usize,
    pub hide: bool,
    /// Paired right-speaker rows, set on a folded left character cue
    pub right_column: Option<Vec<LineItem>>,
    /// On a `page_break` row: the scene continues onto the next page
    pub scene_split: bool,
}

impl LineItem {
    /// Create a row split from a token
    pub fn from_token(token: &Token, owner: OwnerId, text: String, from: usize, to: usize) -> Self {
        Self {
            kind: token.kind,
            text,
            from,
            to,
            offset: token.from,
            line: token.line,
            order: token.order,
            duration: token.duration,
            indent: token.indent,
            level: token.level,
            position: token.position,
            owner: Some(owner),
            hide: token.hide,
            ..Self::default()
        }
    }

    /// Create an engine-made row that borrows placement from `anchor`
    pub fn synthetic(kind: TokenKind, text: impl Into<String>, anchor: &LineItem) -> Self {
        Self {
            kind,
            text: text.into(),
            from: anchor.from,
            to: anchor.to,
            offset: anchor.offset,
            line: anchor.line,
            position: anchor.position,
            ..Self::default()
        }
    }

    /// Create a page boundary marker
    pub fn page_break(scene_split: bool) -> Self {
        Self {
            kind: TokenKind::PageBreak,
            scene_split,
            ..Self::default()
        }
    }

    /// Check if this row has no visible text
    pub fn is_blank(&self) -> bool {
        self.text.is_empty()
    }

    /// Check if this row was made by the engine rather than split from a token
    pub fn is_synthetic(&self) -> bool {
        self.owner.is_none()
    }

    pub fn is_page_break(&self) -> bool {
        self.kind == TokenKind::PageBreak
    }

    /// Number of grapheme clusters this row spans in its owner's text
    pub fn span_len(&self) -> usize {
        self.to.saturating_sub(self.from)
    }
}
