use crate::core::catalog::Catalog;
use crate::core::export::CsvExporter;
use crate::core::order::OrderList;
use crate::core::search::search;
use crate::core::Storage;
use crate::domain::model::{Dataset, Record, SourceTag};
use crate::utils::error::Result;

/// Application state for one session: the loaded catalog, the active
/// mercuriale and the order being built.
pub struct OrderSession {
    catalog: Catalog,
    active: SourceTag,
    order: OrderList,
    exporter: CsvExporter,
}

impl OrderSession {
    pub fn new(catalog: Catalog) -> Self {
        Self::with_source(catalog, SourceTag::default())
    }

    pub fn with_source(catalog: Catalog, active: SourceTag) -> Self {
        Self {
            catalog,
            active,
            order: OrderList::new(),
            exporter: CsvExporter::new(),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn active_source(&self) -> SourceTag {
        self.active
    }

    pub fn active_dataset(&self) -> &Dataset {
        self.catalog.dataset(self.active)
    }

    /// 切換來源不影響訂單
    pub fn set_source(&mut self, source: SourceTag) {
        if source != self.active {
            tracing::debug!("Active mercuriale: {} -> {}", self.active, source);
        }
        self.active = source;
    }

    pub fn search(&self, query: &str) -> Vec<&Record> {
        search(query, self.active_dataset())
    }

    /// Adds `code` from the active mercuriale.
    pub fn add(&mut self, code: &str) -> Result<()> {
        let source = self.active;
        self.order.add(code, source, self.catalog.dataset(source))
    }

    pub fn remove(&mut self, code: &str, source: SourceTag) {
        self.order.remove(code, source);
    }

    pub fn order(&self) -> &OrderList {
        &self.order
    }

    pub fn can_export(&self) -> bool {
        !self.order.is_empty()
    }

    pub fn export_bytes(&self) -> Result<Vec<u8>> {
        self.exporter.export_bytes(&self.order)
    }

    pub async fn export_to<S: Storage>(&self, storage: &S, filename: &str) -> Result<String> {
        self.exporter.export_to(&self.order, storage, filename).await
    }
}
