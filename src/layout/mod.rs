//! Layout pipeline: wrap, fold, paginate

mod break_rules;
pub mod dual;
mod engine;
pub mod format;
mod line_break;
mod pagination;

pub use break_rules::{
    find_character, next_content, screenplay_break_rule, BreakContext, BreakDecision, BreakRule,
    SHORT_ACTION_LINES,
};
pub use engine::{process, LayoutEngine, ScriptLayout};
pub use format::{FormatConfig, TypeFormat};
pub use line_break::{normalize_tabs, LineBreaker, TAB_WIDTH};
pub use pagination::{page_spans, paginate, PageSpan};
