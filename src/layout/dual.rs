//! Dual dialogue folding: pair left and right speeches into columns

use crate::script::{DualPosition, LineItem, TokenKind};
use rustc_hash::FxHashMap;
use std::ops::Range;

/// One left/right pairing found by the planning scan
#[derive(Debug, Clone, PartialEq, Eq)]
struct FoldSpan {
    left: Range<usize>,
    right: Range<usize>,
}

impl FoldSpan {
    fn padding(&self) -> usize {
        self.right.len().saturating_sub(self.left.len())
    }
}

/// Fold right-column speeches under their left-column character cues.
///
/// Each left `character` row gains a `right_column` holding the right
/// speech's rows, which leave the flat sequence. When the right speech is
/// longer, blank rows pad the left speech so both columns have the same
/// height. Pairing stops at the first left cue with no right cue after it.
pub fn fold(lines: &mut Vec<LineItem>) {
    let spans = plan_folds(lines);
    if spans.is_empty() {
        return;
    }

    tracing::debug!(blocks = spans.len(), "folding dual dialogue");

    let mut fillers: FxHashMap<usize, (usize, LineItem)> = FxHashMap::default();
    for span in &spans {
        if span.padding() > 0 {
            let last = span.left.end - 1;
            fillers.insert(last, (span.padding(), filler_for(&lines[last])));
        }
    }

    let padding: usize = spans.iter().map(FoldSpan::padding).sum();
    let mut slots: Vec<Option<LineItem>> = std::mem::take(lines).into_iter().map(Some).collect();

    let mut columns: FxHashMap<usize, Vec<LineItem>> = FxHashMap::default();
    for span in &spans {
        let column = slots[span.right.clone()]
            .iter_mut()
            .filter_map(Option::take)
            .collect();
        columns.insert(span.left.start, column);
    }

    let mut folded = Vec::with_capacity(slots.len() + padding);
    for (idx, slot) in slots.into_iter().enumerate() {
        let Some(mut line) = slot else {
            continue;
        };

        if let Some(column) = columns.remove(&idx) {
            line.right_column = Some(column);
        }
        folded.push(line);

        if let Some((count, filler)) = fillers.remove(&idx) {
            folded.extend(std::iter::repeat(filler).take(count));
        }
    }

    *lines = folded;
}

/// Read-only scan pairing each left cue with the first unused right cue after it
fn plan_folds(lines: &[LineItem]) -> Vec<FoldSpan> {
    let lefts = cue_indices(lines, DualPosition::Left);
    let rights = cue_indices(lines, DualPosition::Right);

    let mut spans = Vec::new();
    let mut next_right = 0;

    for left in lefts {
        let Some(found) = rights[next_right..].iter().position(|&r| r > left) else {
            break;
        };
        let right = rights[next_right + found];
        next_right += found + 1;

        spans.push(FoldSpan {
            left: left..left + speech_run(lines, left),
            right: right..right + speech_run(lines, right),
        });
    }

    spans
}

fn cue_indices(lines: &[LineItem], position: DualPosition) -> Vec<usize> {
    lines
        .iter()
        .enumerate()
        .filter(|(_, l)| l.kind == TokenKind::Character && l.position == Some(position))
        .filter(|&(idx, l)| !continues_cue(lines, idx, l))
        .map(|(idx, _)| idx)
        .collect()
}

/// A wrapped cue's second and later rows are not cues of their own
fn continues_cue(lines: &[LineItem], idx: usize, line: &LineItem) -> bool {
    idx > 0
        && line.owner.is_some()
        && lines[idx - 1].kind == TokenKind::Character
        && lines[idx - 1].owner == line.owner
}

/// Length of the contiguous speech starting at `start`.
///
/// Only the opening cue may be a `character` row; a cue that wrapped onto
/// several rows counts as one cue.
fn speech_run(lines: &[LineItem], start: usize) -> usize {
    let Some(first) = lines.get(start) else {
        return 0;
    };

    1 + lines[start + 1..]
        .iter()
        .take_while(|l| {
            l.kind.continues_speech() || (l.kind == TokenKind::Character && l.owner == first.owner)
        })
        .count()
}

fn filler_for(template: &LineItem) -> LineItem {
    LineItem {
        kind: template.kind,
        from: template.from,
        to: template.to,
        offset: template.offset,
        line: template.line,
        position: template.position,
        ..LineItem::default()
    }
}
