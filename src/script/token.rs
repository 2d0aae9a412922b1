//! Typed content tokens produced by the upstream tokenizer

use serde::{Deserialize, Serialize};

/// The kind of a token (and of every line derived from it)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    /// Scene heading ("INT. HOUSE - DAY")
    #[serde(alias = "scene")]
    SceneHeading,
    /// Action / description
    #[default]
    Action,
    /// Character cue above dialogue
    Character,
    /// Parenthetical direction inside a speech
    Parenthetical,
    /// Spoken dialogue
    Dialogue,
    /// Transition ("CUT TO:")
    Transition,
    Centered,
    Lyrics,
    Section,
    Synopsis,
    Note,
    /// Author-forced page break
    PageBreak,
    /// Blank spacing row
    Separator,
    DualDialogueBegin,
    DualDialogueEnd,
    /// Bottom-of-page "(MORE)" marker, only ever produced by the engine
    More,
    /// Any type this engine has no rules for
    #[serde(other)]
    Other,
}

impl TokenKind {
    /// Check if this kind is part of a speech unit
    pub fn is_speech(&self) -> bool {
        matches!(
            self,
            TokenKind::Character | TokenKind::Parenthetical | TokenKind::Dialogue
        )
    }

    /// Check if this kind may follow the first row of a speech unit
    pub fn continues_speech(&self) -> bool {
        matches!(self, TokenKind::Parenthetical | TokenKind::Dialogue)
    }

    /// Name used in configuration maps and logs
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::SceneHeading => "scene_heading",
            TokenKind::Action => "action",
            TokenKind::Character => "character",
            TokenKind::Parenthetical => "parenthetical",
            TokenKind::Dialogue => "dialogue",
            TokenKind::Transition => "transition",
            TokenKind::Centered => "centered",
            TokenKind::Lyrics => "lyrics",
            TokenKind::Section => "section",
            TokenKind::Synopsis => "synopsis",
            TokenKind::Note => "note",
            TokenKind::PageBreak => "page_break",
            TokenKind::Separator => "separator",
            TokenKind::DualDialogueBegin => "dual_dialogue_begin",
            TokenKind::DualDialogueEnd => "dual_dialogue_end",
            TokenKind::More => "more",
            TokenKind::Other => "other",
        }
    }
}

/// Column of a dual-dialogue speech
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DualPosition {
    Left,
    Right,
}

/// A typed span of source content.
///
/// Tokens are read-only input: the engine never mutates the list it is given.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Token {
    #[serde(rename = "type")]
    pub kind: TokenKind,
    /// Raw text; absent text is treated as empty
    pub text: Option<String>,
    /// Source offset where the token starts
    pub from: usize,
    /// Source offset where the token ends
    pub to: usize,
    /// Dual-dialogue column, if any
    pub position: Option<DualPosition>,
    /// Hidden tokens produce no lines at all
    pub hide: bool,
    /// Scene id, meaningful on scene headings
    pub scene: Option<String>,
    /// Source line number
    pub line: Option<usize>,
    pub level: Option<u8>,
    pub indent: Option<u8>,
    pub order: Option<usize>,
    /// Estimated screen time in seconds
    pub duration: Option<f64>,
}

impl Token {
    /// Create a visible token with text
    pub fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: Some(text.into()),
            ..Self::default()
        }
    }

    /// Place this token in a dual-dialogue column
    pub fn with_position(mut self, position: DualPosition) -> Self {
        self.position = Some(position);
        self
    }

    /// Attach a scene id
    pub fn with_scene(mut self, scene: impl Into<String>) -> Self {
        self.scene = Some(scene.into());
        self
    }

    /// Attach source offsets
    pub fn with_span(mut self, from: usize, to: usize) -> Self {
        self.from = from;
        self.to = to;
        self
    }

    /// Mark as hidden
    pub fn hidden(mut self) -> Self {
        self.hide = true;
        self
    }

    /// Text to lay out, empty when missing
    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }
}
