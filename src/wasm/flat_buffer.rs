//! Flat buffer protocol for zero-copy WASM bridge
//!
//! Binary format for paginated lines:
//!
//! ## u32 Buffer Layout:
//! ```text
//! Header:
//! [0]     MAGIC (0x53504752 = "SPGR" for validation)
//! [1]     SCHEMA_VERSION (protocol version, currently 1)
//! [2]     page_count
//! [3]     line_count (top-level lines, right-column rows excluded)
//! [4]     text_buffer_len
//! [5..]   page data...
//!
//! Per-page:
//!   page_index
//!   line_count
//!   scene_split (0 or 1)
//!   per-line: [opcode, flags, global_index, from, to,
//!              text_offset, text_len, text_utf16_offset, text_utf16_len,
//!              right_column_count]
//!     text_offset/text_len: byte offsets in text_data (UTF-8)
//!     text_utf16_offset/text_utf16_len: offsets for JS substring (after single decode)
//!     flags: bit0=dual_left, bit1=dual_right, bit2=synthetic, bit3=scene_start
//!     right_column_count: rows of the right column, encoded right after this line
//! ```
//!
//! `page_break` rows are not encoded; they are implied by the page table.

use crate::layout::page_spans;
use crate::script::{DualPosition, LineItem, TokenKind};

/// Magic number for format validation: "SPGR" (Script PaGeR)
pub const MAGIC: u32 = 0x53504752;

/// Schema version for protocol compatibility checking
pub const SCHEMA_VERSION: u32 = 1;

/// Header size in u32 elements
pub const HEADER_SIZE: usize = 5;

/// Number of u32 values per page header
pub const U32_PER_PAGE: usize = 3;

/// Number of u32 values per line in the buffer
/// [opcode, flags, global_index, from, to,
///  text_offset, text_len, text_utf16_offset, text_utf16_len, right_column_count]
pub const U32_PER_LINE: usize = 10;

/// Flags bitmask
pub const FLAG_DUAL_LEFT: u32 = 0b0001;
pub const FLAG_DUAL_RIGHT: u32 = 0b0010;
pub const FLAG_SYNTHETIC: u32 = 0b0100;
pub const FLAG_SCENE_START: u32 = 0b1000;

/// Line buffer for zero-copy WASM transfer
pub struct LineBuffer {
    /// Integer data (counts, offsets, opcodes)
    pub u32_data: Vec<u32>,
    /// UTF-8 text buffer
    pub text_data: Vec<u8>,

    // Track cumulative UTF-16 offset for efficient JS decoding
    utf16_text_offset: usize,
    line_count: u32,
}

impl Default for LineBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl LineBuffer {
    pub fn new() -> Self {
        Self {
            u32_data: Vec::with_capacity(1024),
            text_data: Vec::with_capacity(4096),
            utf16_text_offset: 0,
            line_count: 0,
        }
    }

    pub fn clear(&mut self) {
        self.u32_data.clear();
        self.text_data.clear();
        self.utf16_text_offset = 0;
        self.line_count = 0;
    }

    /// Pre-allocate buffers so JS-held pointers stay valid while writing.
    ///
    /// - u32_needed: HEADER_SIZE + pages * U32_PER_PAGE + rows * U32_PER_LINE
    /// - text_needed: sum of text bytes
    pub fn prepare(&mut self, u32_needed: usize, text_needed: usize) {
        let u32_target = u32_needed + 32;
        let text_target = text_needed + 256;

        // Reuse buffers if capacity is sufficient
        if self.u32_data.capacity() < u32_target {
            self.u32_data = Vec::with_capacity(u32_target);
        } else {
            self.u32_data.clear();
        }

        if self.text_data.capacity() < text_target {
            self.text_data = Vec::with_capacity(text_target);
        } else {
            self.text_data.clear();
        }

        self.utf16_text_offset = 0;
        self.line_count = 0;
    }

    /// Encode a whole paginated sequence
    pub fn encode(&mut self, lines: &[LineItem]) {
        let spans = page_spans(lines);

        let rows: usize = lines
            .iter()
            .filter(|l| !l.is_page_break())
            .map(|l| 1 + l.right_column.as_ref().map_or(0, Vec::len))
            .sum();
        let text: usize = lines
            .iter()
            .flat_map(|l| std::iter::once(l).chain(l.right_column.iter().flatten()))
            .map(|l| l.text.len())
            .sum();
        self.prepare(HEADER_SIZE + spans.len() * U32_PER_PAGE + rows * U32_PER_LINE, text);

        self.write_header(spans.len() as u32);
        for span in &spans {
            let count_idx = self.begin_page(span.page_index, span.scene_split);
            let mut count = 0;
            for line in &lines[span.start..span.end] {
                self.write_line(line);
                count += 1;
            }
            self.set_line_count(count_idx, count);
        }
        self.finalize();
    }

    /// Write header with placeholders synchronized by `finalize`
    pub fn write_header(&mut self, page_count: u32) {
        self.u32_data.push(MAGIC); // [0] magic number
        self.u32_data.push(SCHEMA_VERSION); // [1] schema version
        self.u32_data.push(page_count); // [2] page_count
        self.u32_data.push(0); // [3] line_count (placeholder)
        self.u32_data.push(0); // [4] text_buffer_len (placeholder)
    }

    /// Write page header, returns index where line_count should be written
    pub fn begin_page(&mut self, page_index: usize, scene_split: bool) -> usize {
        self.u32_data.push(page_index as u32);
        let line_count_idx = self.u32_data.len();
        self.u32_data.push(0); // line_count placeholder
        self.u32_data.push(scene_split as u32);

        line_count_idx
    }

    /// Update line count for a page
    pub fn set_line_count(&mut self, idx: usize, count: u32) {
        if idx < self.u32_data.len() {
            self.u32_data[idx] = count;
        }
    }

    /// Write a line followed by its right-column rows
    pub fn write_line(&mut self, line: &LineItem) {
        let column = line.right_column.as_deref().unwrap_or_default();
        self.write_row(line, column.len() as u32);
        for row in column {
            self.write_row(row, 0);
        }
        self.line_count += 1;
    }

    fn write_row(&mut self, line: &LineItem, right_column_count: u32) {
        let text_offset = self.text_data.len() as u32;
        self.text_data.extend_from_slice(line.text.as_bytes());
        let text_len = line.text.len() as u32;

        let text_utf16_offset = self.utf16_text_offset as u32;
        let text_utf16_len = line.text.chars().map(char::len_utf16).sum::<usize>() as u32;
        self.utf16_text_offset += text_utf16_len as usize;

        debug_assert!(
            (text_offset as u64) + (text_len as u64) <= u32::MAX as u64,
            "Text offset + length overflow: {} + {} > u32::MAX",
            text_offset,
            text_len
        );

        self.u32_data.push(kind_to_opcode(line.kind));
        self.u32_data.push(line_flags(line));
        self.u32_data.push(line.global_index as u32);
        self.u32_data.push(line.from as u32);
        self.u32_data.push(line.to as u32);
        self.u32_data.push(text_offset);
        self.u32_data.push(text_len);
        self.u32_data.push(text_utf16_offset);
        self.u32_data.push(text_utf16_len);
        self.u32_data.push(right_column_count);
    }

    /// Synchronize header counters
    pub fn finalize(&mut self) {
        if self.u32_data.len() < HEADER_SIZE {
            return;
        }

        self.u32_data[3] = self.line_count;
        self.u32_data[4] = self.text_data.len() as u32;

        #[cfg(debug_assertions)]
        self.validate_text_offsets();
    }

    /// Validate that all text offsets are within bounds (debug builds only)
    #[cfg(debug_assertions)]
    fn validate_text_offsets(&self) {
        let page_count = self.u32_data[2] as usize;
        let text_len = self.text_data.len();
        let mut idx = HEADER_SIZE;

        for page_idx in 0..page_count {
            if idx + U32_PER_PAGE > self.u32_data.len() {
                break;
            }

            let line_count = self.u32_data[idx + 1] as usize;
            idx += U32_PER_PAGE;

            let mut remaining = line_count;
            while remaining > 0 && idx + U32_PER_LINE <= self.u32_data.len() {
                let text_offset = self.u32_data[idx + 5] as usize;
                let text_length = self.u32_data[idx + 6] as usize;
                let column = self.u32_data[idx + 9] as usize;

                debug_assert!(
                    text_offset + text_length <= text_len,
                    "Invalid text range on page {}: offset {} + length {} > text buffer size {}",
                    page_idx,
                    text_offset,
                    text_length,
                    text_len
                );

                idx += U32_PER_LINE * (1 + column);
                remaining -= 1;
            }
        }
    }

    // Accessors for WASM
    // u32 rather than usize: wasm32 linear memory uses u32 offsets

    pub fn u32_ptr(&self) -> u32 {
        self.u32_data.as_ptr() as u32
    }

    pub fn u32_len(&self) -> u32 {
        self.u32_data.len() as u32
    }

    pub fn text_ptr(&self) -> u32 {
        self.text_data.as_ptr() as u32
    }

    pub fn text_len(&self) -> u32 {
        self.text_data.len() as u32
    }
}

/// Convert a line kind to its opcode
pub fn kind_to_opcode(kind: TokenKind) -> u32 {
    match kind {
        TokenKind::SceneHeading => 0,
        TokenKind::Action => 1,
        TokenKind::Character => 2,
        TokenKind::Parenthetical => 3,
        TokenKind::Dialogue => 4,
        TokenKind::Transition => 5,
        TokenKind::Centered => 6,
        TokenKind::Lyrics => 7,
        TokenKind::Section => 8,
        TokenKind::Synopsis => 9,
        TokenKind::Note => 10,
        TokenKind::PageBreak => 11,
        TokenKind::Separator => 12,
        TokenKind::DualDialogueBegin => 13,
        TokenKind::DualDialogueEnd => 14,
        TokenKind::More => 15,
        TokenKind::Other => 255,
    }
}

/// Flag bits of one row
pub fn line_flags(line: &LineItem) -> u32 {
    let mut flags = match line.position {
        Some(DualPosition::Left) => FLAG_DUAL_LEFT,
        Some(DualPosition::Right) => FLAG_DUAL_RIGHT,
        None => 0,
    };
    if line.is_synthetic() {
        flags |= FLAG_SYNTHETIC;
    }
    if line.kind == TokenKind::SceneHeading && line.local_index == 0 && !line.is_synthetic() {
        flags |= FLAG_SCENE_START;
    }
    flags
}
