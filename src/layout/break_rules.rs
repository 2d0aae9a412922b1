//! Break validity: where a page may end

use crate::layout::format::FormatConfig;
use crate::script::{DualPosition, LineItem, TokenArena, TokenKind};

/// Short action blocks (fewer rows than this) are never split
pub const SHORT_ACTION_LINES: usize = 4;

/// Read-only inputs of a break rule
#[derive(Debug, Clone, Copy)]
pub struct BreakContext<'a> {
    pub arena: &'a TokenArena,
    pub config: &'a FormatConfig,
}

impl<'a> BreakContext<'a> {
    pub fn new(arena: &'a TokenArena, config: &'a FormatConfig) -> Self {
        Self { arena, config }
    }
}

/// Verdict for ending a page right after a candidate row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakDecision {
    Reject,
    Accept,
    /// Accept by splitting the speech whose cue sits at `character`
    SplitDialogue { character: usize },
}

/// Signature of a break rule: `(candidate, lines, context)`
pub type BreakRule = fn(usize, &[LineItem], &BreakContext<'_>) -> BreakDecision;

/// Screenplay break rules.
///
/// A pure function of its inputs: it only inspects the candidate row, its
/// neighbours and the owner table.
pub fn screenplay_break_rule(
    index: usize,
    lines: &[LineItem],
    ctx: &BreakContext<'_>,
) -> BreakDecision {
    let Some(line) = lines.get(index) else {
        return BreakDecision::Reject;
    };
    let next = next_content(lines, index + 1);

    // Keep a heading with its scene
    let scene_follows = next.is_some_and(|n| n.kind != TokenKind::SceneHeading);
    if line.kind == TokenKind::SceneHeading && scene_follows {
        return BreakDecision::Reject;
    }

    // Keep a transition with what precedes it
    if next.is_some_and(|n| n.kind == TokenKind::Transition) && line.kind != TokenKind::Transition {
        return BreakDecision::Reject;
    }

    if line.kind == TokenKind::Action {
        if let Some(owner) = line.owner {
            let count = ctx.arena.line_count(owner);
            let at = line.local_index;
            if count < SHORT_ACTION_LINES && at + 1 != count {
                return BreakDecision::Reject;
            }
            if count >= SHORT_ACTION_LINES && (at == 0 || at + 2 == count) {
                return BreakDecision::Reject;
            }
        }
    }

    if line.kind.is_speech() && next.is_some_and(|n| n.kind.continues_speech()) {
        if ctx.config.split_dialogue && index > 0 {
            let splittable = is_plain_dialogue(line)
                && is_plain_dialogue(&lines[index - 1])
                && lines.get(index + 1).is_some_and(is_plain_dialogue);

            if splittable {
                if let Some(character) = find_character(lines, index) {
                    return BreakDecision::SplitDialogue { character };
                }
            }
        }
        return BreakDecision::Reject;
    }

    BreakDecision::Accept
}

/// First row at or after `from` with visible text
pub fn next_content(lines: &[LineItem], from: usize) -> Option<&LineItem> {
    lines.get(from..)?.iter().find(|l| !l.is_blank())
}

/// Nearest `character` row at or before `index`
pub fn find_character(lines: &[LineItem], index: usize) -> Option<usize> {
    lines
        .get(..=index)?
        .iter()
        .rposition(|l| l.kind == TokenKind::Character)
}

/// Dialogue with text that is not itself a right-column row
fn is_plain_dialogue(line: &LineItem) -> bool {
    line.kind == TokenKind::Dialogue
        && !line.is_blank()
        && line.position != Some(DualPosition::Right)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::OwnerId;

    /// Rows with each token's rows registered in the arena
    struct Fixture {
        lines: Vec<LineItem>,
        arena: TokenArena,
        config: FormatConfig,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                lines: Vec::new(),
                arena: TokenArena::new(),
                config: FormatConfig::us_letter(),
            }
        }

        fn token(mut self, kind: TokenKind, rows: usize) -> Self {
            let owner = self.arena.register(kind);
            for local_index in 0..rows {
                self.arena.attach(owner, self.lines.len());
                self.lines.push(LineItem {
                    kind,
                    text: format!("{} {}", kind.as_str(), local_index),
                    owner: Some(owner),
                    local_index,
                    ..LineItem::default()
                });
            }
            self
        }

        fn blank(mut self) -> Self {
            let owner = self.arena.register(TokenKind::Separator);
            self.arena.attach(owner, self.lines.len());
            self.lines.push(LineItem {
                kind: TokenKind::Separator,
                owner: Some(owner),
                ..LineItem::default()
            });
            self
        }

        fn decide(&self, index: usize) -> BreakDecision {
            screenplay_break_rule(index, &self.lines, &BreakContext::new(&self.arena, &self.config))
        }
    }

    #[test]
    fn test_heading_stays_with_scene() {
        let fx = Fixture::new()
            .token(TokenKind::SceneHeading, 1)
            .blank()
            .token(TokenKind::Action, 1);
        assert_eq!(fx.decide(0), BreakDecision::Reject);

        let fx = Fixture::new()
            .token(TokenKind::SceneHeading, 1)
            .token(TokenKind::SceneHeading, 1);
        assert_eq!(fx.decide(0), BreakDecision::Accept);
    }

    #[test]
    fn test_transition_stays_attached() {
        let fx = Fixture::new()
            .token(TokenKind::Action, 1)
            .blank()
            .token(TokenKind::Transition, 1)
            .token(TokenKind::Transition, 1);
        assert_eq!(fx.decide(0), BreakDecision::Reject);
        assert_eq!(fx.decide(2), BreakDecision::Accept);
    }

    #[test]
    fn test_short_action_only_breaks_at_end() {
        let fx = Fixture::new().token(TokenKind::Action, 3).blank();
        assert_eq!(fx.decide(0), BreakDecision::Reject);
        assert_eq!(fx.decide(1), BreakDecision::Reject);
        assert_eq!(fx.decide(2), BreakDecision::Accept);
    }

    #[test]
    fn test_long_action_avoids_orphans_and_widows() {
        let fx = Fixture::new().token(TokenKind::Action, 5);
        let decisions: Vec<_> = (0..5).map(|i| fx.decide(i)).collect();
        assert_eq!(
            decisions,
            vec![
                BreakDecision::Reject,
                BreakDecision::Accept,
                BreakDecision::Accept,
                BreakDecision::Reject,
                BreakDecision::Accept,
            ]
        );
    }

    #[test]
    fn test_speech_unit_kept_together() {
        let fx = Fixture::new()
            .token(TokenKind::Character, 1)
            .token(TokenKind::Parenthetical, 1)
            .token(TokenKind::Dialogue, 3)
            .blank()
            .token(TokenKind::Action, 1);

        assert_eq!(fx.decide(0), BreakDecision::Reject);
        assert_eq!(fx.decide(1), BreakDecision::Reject);
        assert_eq!(fx.decide(3), BreakDecision::Reject);
        assert_eq!(fx.decide(4), BreakDecision::Accept);
    }

    #[test]
    fn test_split_dialogue_when_enabled() {
        let mut fx = Fixture::new()
            .token(TokenKind::Character, 1)
            .token(TokenKind::Dialogue, 4);
        fx.config.split_dialogue = true;

        // Needs dialogue on both sides
        assert_eq!(fx.decide(1), BreakDecision::Reject);
        assert_eq!(fx.decide(2), BreakDecision::SplitDialogue { character: 0 });
        assert_eq!(fx.decide(3), BreakDecision::SplitDialogue { character: 0 });
        assert_eq!(fx.decide(4), BreakDecision::Accept);
    }

    #[test]
    fn test_right_column_rows_never_split() {
        let mut fx = Fixture::new()
            .token(TokenKind::Character, 1)
            .token(TokenKind::Dialogue, 3);
        fx.config.split_dialogue = true;
        for line in &mut fx.lines {
            line.position = Some(DualPosition::Right);
        }
        assert_eq!(fx.decide(2), BreakDecision::Reject);
    }

    #[test]
    fn test_helpers() {
        let fx = Fixture::new()
            .token(TokenKind::Character, 1)
            .blank()
            .token(TokenKind::Dialogue, 1);

        assert_eq!(next_content(&fx.lines, 1).map(|l| l.kind), Some(TokenKind::Dialogue));
        assert!(next_content(&fx.lines, 9).is_none());
        assert_eq!(find_character(&fx.lines, 2), Some(0));
        assert_eq!(fx.lines[0].owner, Some(OwnerId(0)));
    }
}
