//! WebAssembly bindings for Circles
//!
//! Browser-facing wrappers around the one-shot renderer and the live
//! controller. Times come from the caller (`performance.now()`), in
//! milliseconds.

use std::time::Duration;

use wasm_bindgen::prelude::*;

use crate::core::{AsciiSurface, CharacterSet, RenderConfig, Size};
use crate::live::{timestamp_from_millis, LiveConfig, LiveDiagram, TextBuffer};

/// Initialize WASM module
///
/// Sets up panic hooks and logging for better error messages in the browser.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();

    use crate::core::logging::init_logging;
    let _ = init_logging(Some("info"), None);
}

fn js_error(error: anyhow::Error) -> JsValue {
    JsValue::from_str(&format!("{}", error))
}

fn character_set(style: &str) -> Result<CharacterSet, JsValue> {
    match style {
        "ascii" => Ok(CharacterSet::Ascii),
        "unicode" => Ok(CharacterSet::Unicode),
        _ => Err(JsValue::from_str(&format!(
            "Unknown style: {}. Use 'ascii' or 'unicode'",
            style
        ))),
    }
}

fn millis(now_ms: f64) -> Result<Duration, JsValue> {
    timestamp_from_millis(now_ms).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Render transition text to a character picture
///
/// # Arguments
/// * `input` - transition lines (e.g., "A->B: go")
/// * `width`, `height` - canvas size in canvas units
/// * `style` - "ascii" or "unicode"
#[wasm_bindgen]
pub fn render(input: &str, width: f64, height: f64, style: &str) -> Result<String, JsValue> {
    let config = RenderConfig::new(character_set(style)?, Size::new(width, height));
    crate::render_with_config(input, config).map_err(js_error)
}

/// Parse transition text and return states and transitions as JSON
#[wasm_bindgen]
pub fn parse(input: &str) -> Result<String, JsValue> {
    let database = crate::parse(input);
    let transitions: Vec<_> = database
        .transitions()
        .iter()
        .map(|t| {
            serde_json::json!({
                "from": t.from,
                "to": t.to,
                "name": t.name,
                "action": t.action,
            })
        })
        .collect();

    let result = serde_json::json!({
        "states": database.states().iter().collect::<Vec<_>>(),
        "transitions": transitions,
    });
    serde_json::to_string(&result).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Live diagram bound to an in-memory text buffer
#[wasm_bindgen]
pub struct LiveEditor {
    diagram: LiveDiagram<AsciiSurface, TextBuffer>,
}

#[wasm_bindgen]
impl LiveEditor {
    #[wasm_bindgen(constructor)]
    pub fn new(width: f64, height: f64, style: &str) -> Result<LiveEditor, JsValue> {
        let config = RenderConfig::new(character_set(style)?, Size::new(width, height));
        let mut diagram =
            LiveDiagram::new(AsciiSurface::new(config), LiveConfig::default()).map_err(js_error)?;
        diagram.bind_input(TextBuffer::default()).map_err(js_error)?;
        diagram.begin();
        Ok(LiveEditor { diagram })
    }

    /// Replace the edited text without scheduling an update
    pub fn set_text(&mut self, text: &str) {
        if let Some(buffer) = self.diagram.input_mut() {
            buffer.set(text);
        }
    }

    /// Record an edit made at `now_ms`
    pub fn notify_edit(&mut self, now_ms: f64) -> Result<bool, JsValue> {
        Ok(self.diagram.notify_edit(millis(now_ms)?))
    }

    /// Run the pending update if it is due; true when the picture changed
    pub fn poll(&mut self, now_ms: f64) -> Result<bool, JsValue> {
        self.diagram.poll(millis(now_ms)?).map_err(js_error)
    }

    /// Update right away, bypassing the debounce
    pub fn update(&mut self) -> Result<bool, JsValue> {
        self.diagram.update().map_err(js_error)
    }

    /// The current picture
    pub fn frame(&self) -> String {
        self.diagram.surface().frame()
    }

    pub fn state_count(&self) -> usize {
        self.diagram.database().state_count()
    }
}
