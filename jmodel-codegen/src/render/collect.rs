//! First pass: record which names a compilation unit uses.

use indexmap::{IndexMap, IndexSet};

use super::formatter::TokenSink;
use crate::model::{ClassId, CodeModel};

/// How one short name is used within a unit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Usage {
    /// Distinct classes referenced by this short name, in first-use order.
    pub refs: IndexSet<ClassId>,
    /// The name also appears as a variable, field, parameter or method name.
    pub used_as_identifier: bool,
}

impl Usage {
    /// The only class behind this name, if exactly one.
    pub fn single(&self) -> Option<ClassId> {
        match self.refs.len() {
            1 => self.refs.first().copied(),
            _ => None,
        }
    }
}

/// Short name to usage, in first-use order.
#[derive(Debug, Clone, Default)]
pub struct UsageTable {
    names: IndexMap<String, Usage>,
}

impl UsageTable {
    pub fn get(&self, name: &str) -> Option<&Usage> {
        self.names.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Usage)> {
        self.names.iter().map(|(name, usage)| (name.as_str(), usage))
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    fn entry(&mut self, name: &str) -> &mut Usage {
        if !self.names.contains_key(name) {
            self.names.insert(name.to_string(), Usage::default());
        }
        &mut self.names[name]
    }
}

/// Sink that fills a [`UsageTable`] and prints nothing.
#[derive(Debug, Default)]
pub struct Collector {
    table: UsageTable,
}

impl Collector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn finish(self) -> UsageTable {
        self.table
    }

    fn record(&mut self, model: &CodeModel, id: ClassId) {
        let name = model.class(id).name();
        self.table.entry(name).refs.insert(id);
    }
}

impl TokenSink for Collector {
    fn identifier(&mut self, name: &str) {
        self.table.entry(name).used_as_identifier = true;
    }

    fn reference(&mut self, model: &CodeModel, id: ClassId) {
        self.record(model, id);
    }

    fn declared_type(&mut self, model: &CodeModel, id: ClassId) {
        self.record(model, id);
    }
}
