pub mod classify;
pub mod etl;
pub mod export;
pub mod marker;
pub mod pipeline;
pub mod plate;
pub mod process;
pub mod strip;

pub use crate::domain::model::{Extraction, RawCapture, RunSummary};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
