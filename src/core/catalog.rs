use crate::core::{ConfigProvider, DatasetSource, Record};
use crate::domain::model::{Dataset, SourceTag};
use crate::utils::error::{MercurialeError, Result};
use serde_json::Value;

/// The three mercuriales, loaded once per session.
#[derive(Debug, Clone)]
pub struct Catalog {
    folkestone: Dataset,
    vendome: Dataset,
    washington: Dataset,
}

impl Catalog {
    pub fn new(folkestone: Dataset, vendome: Dataset, washington: Dataset) -> Self {
        Self {
            folkestone,
            vendome,
            washington,
        }
    }

    pub fn dataset(&self, source: SourceTag) -> &Dataset {
        match source {
            SourceTag::Folkestone => &self.folkestone,
            SourceTag::Vendome => &self.vendome,
            SourceTag::Washington => &self.washington,
        }
    }

    pub fn total_records(&self) -> usize {
        SourceTag::ALL
            .iter()
            .map(|tag| self.dataset(*tag).len())
            .sum()
    }
}

pub struct CatalogLoader<R: DatasetSource, C: ConfigProvider> {
    reader: R,
    config: C,
}

impl<R: DatasetSource, C: ConfigProvider> CatalogLoader<R, C> {
    pub fn new(reader: R, config: C) -> Self {
        Self { reader, config }
    }

    /// 三份資料同時抓取，任何一份失敗整體就失敗
    pub async fn load(&self) -> Result<Catalog> {
        tracing::info!("Loading mercuriales...");

        let (folkestone, vendome, washington) = tokio::try_join!(
            self.load_one(SourceTag::Folkestone),
            self.load_one(SourceTag::Vendome),
            self.load_one(SourceTag::Washington)
        )?;

        let catalog = Catalog::new(folkestone, vendome, washington);
        tracing::info!(
            "Mercuriales loaded: {} records in total",
            catalog.total_records()
        );
        Ok(catalog)
    }

    async fn load_one(&self, source: SourceTag) -> Result<Dataset> {
        let location = self.config.source_location(source);
        tracing::debug!("Fetching {} from {}", source, location);

        let bytes = self
            .reader
            .fetch(location)
            .await
            .map_err(|e| MercurialeError::LoadError {
                source_tag: source,
                message: e.to_string(),
            })?;

        let dataset = parse_dataset(source, &bytes)?;
        tracing::info!("📦 {}: {} records", source, dataset.len());
        Ok(dataset)
    }
}

/// Parses a JSON array of flat objects into a dataset.
pub fn parse_dataset(source: SourceTag, bytes: &[u8]) -> Result<Dataset> {
    let json_data: Value =
        serde_json::from_slice(bytes).map_err(|e| MercurialeError::LoadError {
            source_tag: source,
            message: format!("invalid JSON: {}", e),
        })?;

    let Value::Array(items) = json_data else {
        return Err(MercurialeError::LoadError {
            source_tag: source,
            message: "expected a JSON array of products".to_string(),
        });
    };

    let mut records = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        match item {
            Value::Object(obj) => records.push(Record::new(obj)),
            other => {
                tracing::warn!(
                    "Skipping item {} of {}: not an object ({})",
                    index,
                    source,
                    other
                );
            }
        }
    }

    Ok(Dataset::new(source, records))
}
