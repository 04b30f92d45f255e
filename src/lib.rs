pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use config::cli::LocalStorage;
pub use config::profile::InstrumentProfile;
#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use core::{etl::ExtractionEngine, pipeline::CpmPipeline, process::process_capture};
pub use domain::model::{Extraction, OutputFormat, PlateGrid, RawCapture, SampleRecord};
pub use utils::error::{ExtractError, Result};
