//! WASM bindings for the paginator

pub mod flat_buffer;

use crate::{FormatConfig, Paginator};
use flat_buffer::LineBuffer;
use wasm_bindgen::prelude::*;

/// Initialize panic hook for better error messages
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// WASM-exposed paginator wrapper
#[wasm_bindgen]
pub struct WasmPaginator {
    paginator: Paginator,
    buffer: LineBuffer,
}

#[wasm_bindgen]
impl WasmPaginator {
    /// Create a paginator with the US Letter preset
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            paginator: Paginator::default(),
            buffer: LineBuffer::new(),
        }
    }

    /// Create a paginator from a JSON format config
    #[wasm_bindgen(js_name = withConfig)]
    pub fn with_config(config_json: &str) -> Result<WasmPaginator, JsValue> {
        let config = FormatConfig::from_json(config_json).map_err(to_js_error)?;
        Ok(Self {
            paginator: Paginator::new(config),
            buffer: LineBuffer::new(),
        })
    }

    /// Lay out a JSON token list, returning the paginated lines as JSON
    pub fn paginate(&mut self, tokens_json: &str) -> Result<String, JsValue> {
        let lines = self.paginator.run_json(tokens_json).map_err(to_js_error)?;
        let json = serde_json::to_string(lines).map_err(to_js_error)?;
        self.buffer.encode(self.paginator.lines());
        Ok(json)
    }

    /// Get page count
    #[wasm_bindgen(js_name = getPageCount)]
    pub fn get_page_count(&self) -> usize {
        self.paginator.page_count()
    }

    /// `[start, end, scene_split]` triples for each page of the last run
    #[wasm_bindgen(js_name = pageSpans)]
    pub fn page_spans(&self) -> js_sys::Uint32Array {
        let flat: Vec<u32> = self
            .paginator
            .pages()
            .iter()
            .flat_map(|p| [p.start as u32, p.end as u32, p.scene_split as u32])
            .collect();
        js_sys::Uint32Array::from(flat.as_slice())
    }

    // Flat buffer of the last run, read directly from WASM memory

    #[wasm_bindgen(js_name = u32Ptr)]
    pub fn u32_ptr(&self) -> u32 {
        self.buffer.u32_ptr()
    }

    #[wasm_bindgen(js_name = u32Len)]
    pub fn u32_len(&self) -> u32 {
        self.buffer.u32_len()
    }

    #[wasm_bindgen(js_name = textPtr)]
    pub fn text_ptr(&self) -> u32 {
        self.buffer.text_ptr()
    }

    #[wasm_bindgen(js_name = textLen)]
    pub fn text_len(&self) -> u32 {
        self.buffer.text_len()
    }
}

impl Default for WasmPaginator {
    fn default() -> Self {
        Self::new()
    }
}

fn to_js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}
