use crate::core::export::{build_archive, render_results, ArtifactNames};
use crate::core::process::process_capture;
use crate::core::{ConfigProvider, Extraction, Pipeline, RawCapture, Storage};
use crate::domain::model::Artifact;
use crate::utils::error::{ExtractError, Result};

/// 讀取 LS6500 擷取檔、萃取 CPM 並輸出文字、盤面與壓縮檔
pub struct CpmPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> CpmPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }

    /// 產生所有輸出：原始檔、清理後文字、各格式結果
    pub fn artifacts(&self, extraction: &Extraction) -> Result<Vec<Artifact>> {
        let names = ArtifactNames::for_date(self.config.date_stamp());

        let mut artifacts = vec![
            Artifact::new(names.original(), extraction.capture.as_bytes()),
            Artifact::new(names.cleaned(), extraction.cleaned_text.as_bytes()),
        ];
        for format in self.config.output_formats() {
            let data = render_results(*format, &extraction.grid, &extraction.records)?;
            artifacts.push(Artifact::new(names.results(*format), data));
        }

        Ok(artifacts)
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for CpmPipeline<S, C> {
    async fn extract(&self) -> Result<RawCapture> {
        let input = self.config.input_path();
        tracing::debug!("Reading capture from: {}", input);

        let bytes = self.storage.read_file(input).await?;
        tracing::debug!("Read {} bytes", bytes.len());

        Ok(RawCapture::new(bytes).with_source_name(input))
    }

    async fn transform(&self, capture: RawCapture) -> Result<Extraction> {
        let extraction = process_capture(capture, self.config.profile())?;

        if extraction.is_empty() {
            if self.config.strict() {
                return Err(ExtractError::NoDataExtracted);
            }
            tracing::warn!(
                "⚠️ Marker found in {} but no sample records were recognized",
                extraction.capture.source_name().unwrap_or("capture")
            );
        }

        Ok(extraction)
    }

    async fn load(&self, extraction: Extraction) -> Result<String> {
        let names = ArtifactNames::for_date(self.config.date_stamp());
        let artifacts = self.artifacts(&extraction)?;

        for artifact in &artifacts {
            tracing::debug!("Writing {} ({} bytes)", artifact.name, artifact.data.len());
            self.storage.write_file(&artifact.name, &artifact.data).await?;
        }

        let main_output = if self.config.archive_enabled() {
            let zip_data = build_archive(&artifacts)?;
            tracing::debug!("Writing ZIP file ({} bytes) to storage", zip_data.len());
            self.storage.write_file(&names.archive(), &zip_data).await?;
            names.archive()
        } else {
            names.cleaned()
        };

        Ok(format!("{}/{}", self.config.output_path(), main_output))
    }
}
