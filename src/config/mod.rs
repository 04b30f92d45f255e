pub mod cli;
pub mod profile;

#[cfg(feature = "cli")]
use crate::config::profile::InstrumentProfile;
#[cfg(feature = "cli")]
use crate::core::ConfigProvider;
#[cfg(feature = "cli")]
use crate::domain::model::OutputFormat;
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{self, Validate};
#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "lsc-cpm")]
#[command(about = "Extract CPM values from LS6500 printer port captures")]
pub struct CliConfig {
    /// Capture file saved from the instrument printer port (RECORD.TXT)
    #[arg(required_unless_present = "print_profile")]
    pub input: Option<String>,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    /// Instrument profile TOML overriding the built-in LS6500 settings
    #[arg(long)]
    pub profile: Option<String>,

    /// Result formats written next to the cleaned text (xlsx, csv, tsv, json)
    #[arg(long, value_delimiter = ',', default_value = "xlsx,csv")]
    pub formats: Vec<OutputFormat>,

    /// Date prefix for output files (YYYYMMDD), defaults to today
    #[arg(long)]
    pub date: Option<String>,

    /// Treat a capture without any sample records as an error
    #[arg(long)]
    pub strict: bool,

    /// Skip the ZIP bundle
    #[arg(long)]
    pub no_archive: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log CPU and memory usage per phase")]
    pub monitor: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,

    /// Print the active instrument profile as TOML and exit
    #[arg(long)]
    pub print_profile: bool,

    #[arg(skip)]
    pub instrument: InstrumentProfile,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// 載入 `--profile` 指定的設定檔，未指定時使用內建 LS6500 設定
    pub fn load_profile(&mut self) -> Result<()> {
        if let Some(path) = &self.profile {
            self.instrument = InstrumentProfile::from_file(path)?;
        }
        Ok(())
    }
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn input_path(&self) -> &str {
        self.input.as_deref().unwrap_or_default()
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn profile(&self) -> &InstrumentProfile {
        &self.instrument
    }

    fn output_formats(&self) -> &[OutputFormat] {
        &self.formats
    }

    fn date_stamp(&self) -> String {
        self.date
            .clone()
            .unwrap_or_else(crate::core::export::today_stamp)
    }

    fn strict(&self) -> bool {
        self.strict
    }

    fn archive_enabled(&self) -> bool {
        !self.no_archive
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        let input = validation::validate_required_field("input", &self.input)?;
        validation::validate_path("input", input)?;
        validation::validate_file_extensions("input", std::slice::from_ref(input), &["txt"])?;

        validation::validate_path("output_path", &self.output_path)?;
        validation::validate_positive_number("formats", self.formats.len(), 1)?;
        if let Some(date) = &self.date {
            validation::validate_date_stamp("date", date)?;
        }

        self.instrument.validate()
    }
}
