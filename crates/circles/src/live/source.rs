//! Edit sources feeding the live controller

use anyhow::Result;

/// Something the user edits, read whenever an update runs
pub trait EditSource {
    /// Current full text
    fn contents(&self) -> Result<String>;
}

/// In-memory text buffer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextBuffer {
    text: String,
}

impl TextBuffer {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Replace the whole text
    pub fn set(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn push_str(&mut self, text: &str) {
        self.text.push_str(text);
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl EditSource for TextBuffer {
    fn contents(&self) -> Result<String> {
        Ok(self.text.clone())
    }
}
