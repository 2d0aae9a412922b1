//! Input tokens and the line model produced from them

mod arena;
mod line;
mod token;

pub use arena::{OwnerId, OwnerRecord, TokenArena};
pub use line::LineItem;
pub use token::{DualPosition, Token, TokenKind};

use crate::error::Result;

/// Decode a tokenizer's JSON token list
pub fn tokens_from_json(json: &str) -> Result<Vec<Token>> {
    Ok(serde_json::from_str(json)?)
}
