//! Script-Pager: screenplay line breaking and pagination
//!
//! This crate turns a tokenized screenplay into fixed-width render lines
//! split into pages:
//! - Word wrapping with per-type widths
//! - Dual dialogue folded into side-by-side columns
//! - Page breaks that keep headings, short action and speeches together
//! - MORE / CONT'D markers when a speech is split across pages
//!
//! The pipeline is a pure function of `(tokens, config)` and performs no I/O.

pub mod error;
pub mod layout;
pub mod script;
pub mod wasm;

// Re-export WASM types for direct use
pub use wasm::WasmPaginator;

// Re-export primary types
pub use error::{Error, Result};
pub use layout::{
    page_spans, paginate, process, BreakContext, BreakDecision, BreakRule, FormatConfig,
    LayoutEngine, LineBreaker, PageSpan, ScriptLayout, TypeFormat,
};
pub use script::{
    tokens_from_json, DualPosition, LineItem, OwnerId, Token, TokenArena, TokenKind,
};

/// Paginator state: a layout engine plus the result of its last run
pub struct Paginator {
    engine: LayoutEngine,
    layout: ScriptLayout,
    pages: Vec<PageSpan>,
}

impl Paginator {
    /// Create a paginator for the given format
    pub fn new(config: FormatConfig) -> Self {
        Self {
            engine: LayoutEngine::new(config),
            layout: ScriptLayout::default(),
            pages: Vec::new(),
        }
    }

    /// Lay out a token list, replacing the previous result
    pub fn run(&mut self, tokens: &[Token]) -> &[LineItem] {
        self.layout = self.engine.process(tokens);
        self.pages = page_spans(&self.layout.lines);
        &self.layout.lines
    }

    /// Decode a JSON token list and lay it out
    pub fn run_json(&mut self, tokens_json: &str) -> Result<&[LineItem]> {
        let tokens = tokens_from_json(tokens_json)?;
        Ok(self.run(&tokens))
    }

    /// Rows of the last run
    pub fn lines(&self) -> &[LineItem] {
        &self.layout.lines
    }

    /// Owner table of the last run
    pub fn arena(&self) -> &TokenArena {
        &self.layout.arena
    }

    /// Page spans of the last run
    pub fn pages(&self) -> &[PageSpan] {
        &self.pages
    }

    /// Get total page count
    pub fn page_count(&self) -> usize {
        self.pages.len().max(1)
    }

    /// Rows of one page, without its closing marker
    pub fn page(&self, page_index: usize) -> Option<&[LineItem]> {
        let span = self.pages.get(page_index)?;
        self.layout.lines.get(span.start..span.end)
    }

    /// Get configuration
    pub fn config(&self) -> &FormatConfig {
        self.engine.config()
    }
}

impl Default for Paginator {
    fn default() -> Self {
        Self::new(FormatConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> FormatConfig {
        let mut config = FormatConfig::us_letter();
        config.lines_per_page = 4;
        config
    }

    #[test]
    fn test_create_paginator() {
        let paginator = Paginator::default();
        assert!(paginator.lines().is_empty());
        assert_eq!(paginator.page_count(), 1);
        assert_eq!(paginator.config().lines_per_page, 55);
    }

    #[test]
    fn test_run_pages() {
        let mut paginator = Paginator::new(small_config());
        let tokens: Vec<_> = (0..6)
            .map(|i| Token::new(TokenKind::Transition, format!("CUT TO {i}:")))
            .collect();
        paginator.run(&tokens);

        assert_eq!(paginator.page_count(), 2);
        assert_eq!(paginator.page(0).unwrap().len(), 4);
        assert_eq!(paginator.page(1).unwrap()[0].text, "CUT TO 4:");
        assert!(paginator.page(2).is_none());
    }

    #[test]
    fn test_run_json() {
        let mut paginator = Paginator::new(small_config());
        let lines = paginator
            .run_json(r#"[{"type":"action","text":"Hello."}]"#)
            .unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(paginator.arena().len(), 1);

        assert!(paginator.run_json("{").is_err());
    }
}
