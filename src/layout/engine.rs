//! Pipeline: split tokens, fold dual dialogue, paginate

use crate::layout::break_rules::{screenplay_break_rule, BreakContext, BreakRule};
use crate::layout::dual;
use crate::layout::format::FormatConfig;
use crate::layout::line_break::LineBreaker;
use crate::layout::pagination;
use crate::script::{LineItem, Token, TokenArena, TokenKind};

/// Result of one pipeline run
#[derive(Debug, Clone, Default)]
pub struct ScriptLayout {
    /// Paginated rows, `page_break` markers included
    pub lines: Vec<LineItem>,
    /// Owner table for the rows split from source tokens
    pub arena: TokenArena,
}

/// Layout engine for one page format
pub struct LayoutEngine {
    config: FormatConfig,
    /// Line breaker instance
    line_breaker: LineBreaker,
    rule: BreakRule,
}

impl LayoutEngine {
    /// Create an engine using the screenplay break rules
    pub fn new(config: FormatConfig) -> Self {
        Self::with_rule(config, screenplay_break_rule)
    }

    /// Create an engine with a custom break rule
    pub fn with_rule(config: FormatConfig, rule: BreakRule) -> Self {
        if let Err(err) = config.validate() {
            tracing::warn!(%err, "laying out with an invalid format config");
        }

        Self {
            config,
            line_breaker: LineBreaker::new(),
            rule,
        }
    }

    /// Get configuration
    pub fn config(&self) -> &FormatConfig {
        &self.config
    }

    /// Run the whole pipeline
    pub fn process(&self, tokens: &[Token]) -> ScriptLayout {
        let (mut lines, arena) = self.split_tokens(tokens);

        dual::fold(&mut lines);

        let ctx = BreakContext::new(&arena, &self.config);
        let lines = pagination::paginate(lines, self.config.lines_per_page, self.rule, &ctx);

        ScriptLayout { lines, arena }
    }

    /// Wrap every visible token into rows, in document order
    pub fn split_tokens(&self, tokens: &[Token]) -> (Vec<LineItem>, TokenArena) {
        let mut arena = TokenArena::with_capacity(tokens.len());
        let mut lines = Vec::with_capacity(tokens.len());

        for token in tokens.iter().filter(|t| !t.hide) {
            let max_width = self.config.max_width_for(token.kind, token.position);
            let owner = arena.register(token.kind);
            let mut produced = self
                .line_breaker
                .split(token.text(), max_width, 0, token, owner);

            // The opening heading of a document carries no scene id
            if token.kind == TokenKind::SceneHeading && !lines.is_empty() {
                if let Some(first) = produced.first_mut() {
                    first.scene = token.scene.clone();
                }
            }

            for mut line in produced {
                line.global_index = lines.len();
                arena.attach(owner, line.global_index);
                lines.push(line);
            }
        }

        tracing::debug!(
            tokens = tokens.len(),
            owners = arena.len(),
            lines = lines.len(),
            "split tokens"
        );

        (lines, arena)
    }
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self::new(FormatConfig::default())
    }
}

/// Lay out `tokens` with `config`: a pure function of its inputs
pub fn process(tokens: &[Token], config: &FormatConfig) -> Vec<LineItem> {
    LayoutEngine::new(config.clone()).process(tokens).lines
}
