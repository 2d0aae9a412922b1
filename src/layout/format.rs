//! Format configuration: per-type widths, page capacity, marker labels

use crate::error::{Error, Result};
use crate::script::{DualPosition, TokenKind};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Width used when neither the token's type nor `action` is configured
pub const FALLBACK_WIDTH: usize = 58;

/// Default bottom-of-page marker
pub const DEFAULT_MORE: &str = "(MORE)";

/// Default continuation suffix
pub const DEFAULT_CONTD: &str = "(CONT'D)";

/// Formatting rule for one token type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeFormat {
    /// Maximum characters per wrapped line
    pub max: usize,
}

/// Layout configuration for a page format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatConfig {
    /// Page capacity in rows
    pub lines_per_page: usize,
    /// Multiplier applied to widths of dual-dialogue tokens
    pub dual_max_factor: f32,
    /// Per-type line widths
    pub widths: FxHashMap<TokenKind, TypeFormat>,
    /// Allow breaking a speech across pages with MORE / CONT'D markers
    pub split_dialogue: bool,
    pub text_more: Option<String>,
    pub text_contd: Option<String>,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self::us_letter()
    }
}

impl FormatConfig {
    /// US Letter screenplay format
    pub fn us_letter() -> Self {
        Self::with_lines_per_page(55)
    }

    /// A4 screenplay format
    pub fn a4() -> Self {
        Self::with_lines_per_page(57)
    }

    fn with_lines_per_page(lines_per_page: usize) -> Self {
        let widths = [
            (TokenKind::SceneHeading, 58),
            (TokenKind::Action, 58),
            (TokenKind::Character, 38),
            (TokenKind::Parenthetical, 28),
            (TokenKind::Dialogue, 35),
            (TokenKind::Transition, 58),
            (TokenKind::Centered, 58),
            (TokenKind::Lyrics, 35),
            (TokenKind::Section, 58),
            (TokenKind::Synopsis, 58),
            (TokenKind::Note, 58),
            (TokenKind::More, 38),
        ]
        .into_iter()
        .map(|(kind, max)| (kind, TypeFormat { max }))
        .collect();

        Self {
            lines_per_page,
            dual_max_factor: 0.75,
            widths,
            split_dialogue: false,
            text_more: None,
            text_contd: None,
        }
    }

    /// Parse and validate a configuration from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every value is in range
    pub fn validate(&self) -> Result<()> {
        if self.lines_per_page == 0 {
            return Err(Error::InvalidConfig {
                field: "lines_per_page",
                reason: "must be at least 1".into(),
            });
        }

        if !self.dual_max_factor.is_finite()
            || self.dual_max_factor <= 0.0
            || self.dual_max_factor > 1.0
        {
            return Err(Error::InvalidConfig {
                field: "dual_max_factor",
                reason: format!("{} is outside (0, 1]", self.dual_max_factor),
            });
        }

        if !self.widths.contains_key(&TokenKind::Action) {
            return Err(Error::InvalidConfig {
                field: "widths",
                reason: "an `action` width is required as the fallback".into(),
            });
        }

        if let Some((kind, _)) = self.widths.iter().find(|(_, f)| f.max == 0) {
            return Err(Error::InvalidConfig {
                field: "widths",
                reason: format!("`{}` width must be at least 1", kind.as_str()),
            });
        }

        Ok(())
    }

    /// Set the width for one type
    pub fn set_width(&mut self, kind: TokenKind, max: usize) {
        self.widths.insert(kind, TypeFormat { max });
    }

    /// Wrap width for a token, falling back to `action` and applying the dual factor
    pub fn max_width_for(&self, kind: TokenKind, position: Option<DualPosition>) -> usize {
        let base = self
            .widths
            .get(&kind)
            .or_else(|| self.widths.get(&TokenKind::Action))
            .map(|f| f.max)
            .unwrap_or(FALLBACK_WIDTH);

        let width = match position {
            Some(_) => (base as f32 * self.dual_max_factor).floor() as usize,
            None => base,
        };

        width.max(1)
    }

    /// Label of the bottom-of-page marker
    pub fn more_label(&self) -> &str {
        match self.text_more.as_deref() {
            Some(label) if !label.is_empty() => label,
            _ => DEFAULT_MORE,
        }
    }

    /// Suffix of continuation cues
    pub fn contd_label(&self) -> &str {
        match self.text_contd.as_deref() {
            Some(label) if !label.is_empty() => label,
            _ => DEFAULT_CONTD,
        }
    }
}
