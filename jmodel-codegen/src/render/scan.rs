//! Error scan: find unresolved placeholder types without rendering.

use indexmap::IndexSet;

use super::formatter::TokenSink;
use crate::model::{ClassId, CodeModel};

/// Sink that records every placeholder class referenced by a unit.
#[derive(Debug, Default)]
pub struct ErrorScanner {
    found: IndexSet<String>,
}

impl ErrorScanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Names of the placeholders found, in first-use order.
    pub fn finish(self) -> Vec<String> {
        self.found.into_iter().collect()
    }
}

impl TokenSink for ErrorScanner {
    fn reference(&mut self, model: &CodeModel, id: ClassId) {
        let class = model.class(id);
        if class.is_error() {
            self.found.insert(class.name().to_string());
        }
    }
}
