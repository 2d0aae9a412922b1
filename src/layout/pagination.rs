//! Pagination: cut the folded line sequence into pages

use crate::layout::break_rules::{BreakContext, BreakDecision, BreakRule};
use crate::script::{LineItem, TokenKind};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Where the current page ends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PagePlan {
    /// Everything left fits
    Last,
    /// An author-forced break sits at `marker`
    Explicit { marker: usize },
    /// End the page after row `at`
    Break { at: usize },
    /// End after row `at` with MORE / CONT'D markers for the cue at `character`
    Split { at: usize, character: usize },
}

/// Partition `lines` into pages of at most `lines_per_page` rows.
///
/// Each page is followed by a `page_break` row; the last page is not. Pages
/// never start on a blank row. The break after each page is the latest row
/// accepted by `rule`, or row `lines_per_page - 1` when none is.
pub fn paginate(
    lines: Vec<LineItem>,
    lines_per_page: usize,
    rule: BreakRule,
    ctx: &BreakContext<'_>,
) -> Vec<LineItem> {
    if lines_per_page == 0 {
        tracing::warn!("lines_per_page is 0, using 1");
    }
    let max = lines_per_page.max(1);

    let mut queue: VecDeque<LineItem> = lines.into();
    let mut paged = Vec::with_capacity(queue.len() + queue.len() / max + 1);
    let mut pages = 0usize;

    loop {
        while queue.front().is_some_and(|l| l.is_blank() || l.is_page_break()) {
            queue.pop_front();
        }
        if queue.is_empty() {
            break;
        }

        let plan = plan_page(queue.make_contiguous(), max, rule, ctx);
        tracing::trace!(page = pages, ?plan, "page planned");

        let mut page: Vec<LineItem> = match plan {
            PagePlan::Last => {
                paged.extend(queue.drain(..));
                pages += 1;
                break;
            }
            PagePlan::Explicit { marker } => queue.drain(..marker).collect(),
            PagePlan::Break { at } => queue.drain(..=at).collect(),
            PagePlan::Split { at, character } => {
                let mut page: Vec<LineItem> = queue.drain(..=at).collect();
                let continuation = split_dialogue(&mut page, character, ctx);
                queue.push_front(continuation);
                page
            }
        };

        paged.append(&mut page);
        pages += 1;

        // Only blanks or markers left: no page follows, so no boundary either
        let Some(next) = queue.iter().find(|l| !l.is_blank() && !l.is_page_break()) else {
            queue.clear();
            break;
        };
        let scene_split = next.kind != TokenKind::SceneHeading;
        paged.push(LineItem::page_break(scene_split));
    }

    for (global_index, line) in paged.iter_mut().enumerate() {
        line.global_index = global_index;
    }

    tracing::debug!(pages, lines = paged.len(), "paginated");
    paged
}

fn plan_page(
    lines: &[LineItem],
    max: usize,
    rule: BreakRule,
    ctx: &BreakContext<'_>,
) -> PagePlan {
    if let Some(marker) = lines.iter().take(max + 1).position(LineItem::is_page_break) {
        return PagePlan::Explicit { marker };
    }

    if lines.len() <= max {
        return PagePlan::Last;
    }

    for at in (0..max).rev() {
        if lines[at].is_blank() {
            continue;
        }

        match rule(at, lines, ctx) {
            BreakDecision::Accept => return PagePlan::Break { at },
            // The MORE row needs a slot on this page
            BreakDecision::SplitDialogue { character } if at + 2 <= max => {
                return PagePlan::Split { at, character };
            }
            _ => {}
        }
    }

    tracing::warn!(max, "no valid break point, forcing a break");
    PagePlan::Break { at: max - 1 }
}

/// Close `page` with a MORE row and build the continuation cue for the next page.
///
/// A folded cue's right column is cut at the same height; its remainder
/// moves under the continuation cue.
fn split_dialogue(
    page: &mut Vec<LineItem>,
    character: usize,
    ctx: &BreakContext<'_>,
) -> LineItem {
    let more_label = ctx.config.more_label();
    let contd_label = ctx.config.contd_label();

    let cue = &page[character];
    let mut continuation = LineItem::synthetic(
        TokenKind::Character,
        continued_cue(&cue.text, contd_label),
        cue,
    );

    let kept = page.len() - character;
    if let Some(mut column) = page[character].right_column.take() {
        if column.len() > kept {
            let rest = column.split_off(kept);

            let mut carried = Vec::with_capacity(rest.len() + 1);
            if let Some(right_cue) = column.first().filter(|l| l.kind == TokenKind::Character) {
                carried.push(LineItem::synthetic(
                    TokenKind::Character,
                    continued_right_cue(&right_cue.text, contd_label),
                    right_cue,
                ));
            }
            carried.extend(rest);

            if let Some(anchor) = column.last() {
                let right_more = LineItem::synthetic(TokenKind::More, more_label, anchor);
                column.push(right_more);
            }
            continuation.right_column = Some(carried);
        }
        page[character].right_column = Some(column);
    }

    if let Some(anchor) = page.last() {
        let more = LineItem::synthetic(TokenKind::More, more_label, anchor);
        page.push(more);
    }

    continuation
}

/// Left cue: keep the name if it already carries the label anywhere
fn continued_cue(name: &str, label: &str) -> String {
    let name = name.trim();
    if name.contains(label) {
        name.to_string()
    } else {
        format!("{name} {label}")
    }
}

/// Right cue: strip a trailing label, then append exactly one
fn continued_right_cue(name: &str, label: &str) -> String {
    let base = name.trim().trim_end_matches(label).trim_end();
    format!("{base} {label}")
}

/// Layout information for a page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSpan {
    /// Page index (0-based)
    pub page_index: usize,
    /// First row of the page
    pub start: usize,
    /// One past the last row, excluding the closing `page_break`
    pub end: usize,
    /// Scene continues onto the next page
    pub scene_split: bool,
}

impl PageSpan {
    /// Check if this page contains a given row
    pub fn contains(&self, index: usize) -> bool {
        index >= self.start && index < self.end
    }

    /// Number of rows on the page
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Page spans of a paginated sequence
pub fn page_spans(lines: &[LineItem]) -> Vec<PageSpan> {
    let mut spans = Vec::new();
    let mut start = 0;

    for (idx, line) in lines.iter().enumerate() {
        if line.is_page_break() {
            spans.push(PageSpan {
                page_index: spans.len(),
                start,
                end: idx,
                scene_split: line.scene_split,
            });
            start = idx + 1;
        }
    }

    if start < lines.len() {
        spans.push(PageSpan {
            page_index: spans.len(),
            start,
            end: lines.len(),
            scene_split: false,
        });
    }

    spans
}
