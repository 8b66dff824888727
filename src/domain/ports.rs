use crate::domain::model::SourceTag;
use crate::utils::error::Result;
use async_trait::async_trait;

/// Where an export is written.
pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<String>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn source_location(&self, source: SourceTag) -> &str;
    fn output_path(&self) -> &str;
    fn export_filename(&self) -> String;
    fn default_source(&self) -> SourceTag;
}

/// 取得 mercuriale 原始內容（JSON bytes）
#[async_trait]
pub trait DatasetSource: Send + Sync {
    async fn fetch(&self, location: &str) -> Result<Vec<u8>>;
}
