use crate::domain::model::{Dataset, OrderEntry, SourceTag, SOURCE_FIELD};
use crate::utils::error::{MercurialeError, Result};
use std::collections::HashSet;

/// 使用者的訂單清單，依加入順序排列
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderList {
    entries: Vec<OrderEntry>,
}

impl OrderList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[OrderEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, code: &str, source: SourceTag) -> bool {
        self.entries.iter().any(|e| e.matches(code, source))
    }

    /// Adds the first record of `dataset` whose code equals `code`.
    ///
    /// A `(code, source)` pair already in the list is rejected with
    /// [`MercurialeError::DuplicateEntry`] and nothing changes. A code absent
    /// from the dataset is ignored.
    pub fn add(&mut self, code: &str, source: SourceTag, dataset: &Dataset) -> Result<()> {
        if self.contains(code, source) {
            tracing::debug!("Duplicate order entry rejected: {} ({})", code, source);
            return Err(MercurialeError::DuplicateEntry {
                code: code.to_string(),
                source_tag: source,
            });
        }

        match dataset.find_by_code(code) {
            Some(record) => {
                self.entries.push(OrderEntry::new(record, source));
                tracing::debug!(
                    "Added {} ({}), order now has {} entries",
                    code,
                    source,
                    self.entries.len()
                );
            }
            None => {
                tracing::debug!("Product {} not found in {}, ignoring", code, dataset.source());
            }
        }

        Ok(())
    }

    pub fn remove(&mut self, code: &str, source: SourceTag) {
        let before = self.entries.len();
        self.entries.retain(|e| !e.matches(code, source));
        tracing::debug!(
            "Removed {} entr(ies) for {} ({})",
            before - self.entries.len(),
            code,
            source
        );
    }

    /// Union of field names over all entries in first-seen order, without `source`.
    pub fn columns(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut columns = Vec::new();

        for entry in &self.entries {
            for name in entry.record().field_names() {
                if name != SOURCE_FIELD && seen.insert(name) {
                    columns.push(name.to_string());
                }
            }
        }

        columns
    }
}
