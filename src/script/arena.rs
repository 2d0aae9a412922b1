//! Owner records for lines split from the same token

use super::TokenKind;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Stable identifier of a source token within one pipeline run
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OwnerId(pub u32);

/// Everything the breaker needs to know about one source token
#[derive(Debug, Clone)]
pub struct OwnerRecord {
    pub kind: TokenKind,
    /// Source indices (global index at split time) of the lines, in reading order
    pub lines: SmallVec<[usize; 4]>,
}

/// Side table mapping owner ids to their line lists.
///
/// Lines point at their owner by id instead of holding a reference, so the
/// line list can be reordered and spliced freely.
#[derive(Debug, Clone, Default)]
pub struct TokenArena {
    records: Vec<OwnerRecord>,
}

impl TokenArena {
    /// Create an empty arena
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: Vec::with_capacity(capacity),
        }
    }

    /// Register a new owner and return its id
    pub fn register(&mut self, kind: TokenKind) -> OwnerId {
        let id = OwnerId(self.records.len() as u32);
        self.records.push(OwnerRecord {
            kind,
            lines: SmallVec::new(),
        });
        id
    }

    /// Record a line produced for an owner
    pub fn attach(&mut self, owner: OwnerId, source_index: usize) {
        if let Some(record) = self.records.get_mut(owner.0 as usize) {
            record.lines.push(source_index);
        }
    }

    /// Get an owner record
    pub fn get(&self, owner: OwnerId) -> Option<&OwnerRecord> {
        self.records.get(owner.0 as usize)
    }

    /// Number of lines the owner's token wrapped into
    pub fn line_count(&self, owner: OwnerId) -> usize {
        self.get(owner).map(|r| r.lines.len()).unwrap_or(0)
    }

    /// Number of registered owners
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate over owners in registration order
    pub fn iter(&self) -> impl Iterator<Item = (OwnerId, &OwnerRecord)> + '_ {
        self.records
            .iter()
            .enumerate()
            .map(|(idx, record)| (OwnerId(idx as u32), record))
    }
}
