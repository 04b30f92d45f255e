use crate::config::profile::InstrumentProfile;
use crate::domain::model::{Extraction, OutputFormat, RawCapture};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn input_path(&self) -> &str;
    fn output_path(&self) -> &str;
    fn profile(&self) -> &InstrumentProfile;
    fn output_formats(&self) -> &[OutputFormat];
    /// 輸出檔名前綴的日期，格式 YYYYMMDD
    fn date_stamp(&self) -> String;
    fn strict(&self) -> bool;
    fn archive_enabled(&self) -> bool;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<RawCapture>;
    async fn transform(&self, capture: RawCapture) -> Result<Extraction>;
    async fn load(&self, extraction: Extraction) -> Result<String>;
}
