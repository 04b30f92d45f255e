use crate::core::marker::{LS6500_MARKER, LS6500_MARKER_SPACED};
use crate::core::strip::validate_replacements;
use crate::utils::error::{ExtractError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// 儀器設定檔：marker、控制碼替換表、資料列判斷規則與盤面配置。
///
/// 每個區段都有 LS6500 的預設值，TOML 檔只需寫出要覆蓋的欄位。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct InstrumentProfile {
    pub profile: ProfileInfo,
    pub markers: MarkerConfig,
    pub strip: StripConfig,
    pub classify: ClassifyConfig,
    pub plate: PlateConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileInfo {
    pub name: String,
    pub description: String,
}

impl Default for ProfileInfo {
    fn default() -> Self {
        Self {
            name: "ls6500".to_string(),
            description: "Beckman LS6500 printer port capture (RECORD.TXT)".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerConfig {
    /// 控制碼以 TOML 的 `\u001b` 形式書寫
    pub sequences: Vec<String>,
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self {
            sequences: vec![
                String::from_utf8_lossy(LS6500_MARKER_SPACED).into_owned(),
                String::from_utf8_lossy(LS6500_MARKER).into_owned(),
            ],
        }
    }
}

impl MarkerConfig {
    pub fn byte_sequences(&self) -> Vec<&[u8]> {
        self.sequences.iter().map(|s| s.as_bytes()).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Replacement {
    pub pattern: String,
    #[serde(default)]
    pub replacement: String,
}

impl Replacement {
    pub fn new(pattern: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            replacement: replacement.into(),
        }
    }

    pub fn remove(pattern: impl Into<String>) -> Self {
        Self::new(pattern, "")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StripConfig {
    /// 依序套用的字面替換
    pub replacements: Vec<Replacement>,
}

impl Default for StripConfig {
    fn default() -> Self {
        Self {
            replacements: vec![
                // 帶參數的 ESC W / ESC - 若只移除前兩個字元，參數會殘留在資料中
                Replacement::remove("\x1bW\x00"),
                Replacement::remove("\x1bW\x01"),
                Replacement::remove("\x1bW0"),
                Replacement::remove("\x1bW1"),
                Replacement::remove("\x1b-\x00"),
                Replacement::remove("\x1b-\x01"),
                Replacement::remove("\x1b-0"),
                Replacement::remove("\x1b-1"),
                Replacement::remove("\x1bG"),
                Replacement::remove("\x1bH"),
                Replacement::new("\r\n", "\n"),
                Replacement::new("\r", "\n"),
                Replacement::new("\t", " "),
            ],
        }
    }
}

pub const PRIMARY_HEADER: &str = "SAM  POS   TIME    H#        3H    LUMEX  ELAPSED";
pub const DEFAULT_MAX_SAMPLE_NUMBER: u32 = 10_000;
pub const SECONDARY_HEADER: &str = "NO         MIN             CPM  %ERROR     %      TIME";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifyConfig {
    /// 含有任一字串的行直接丟棄
    pub noise_markers: Vec<String>,
    /// 行首殘留的控制碼痕跡
    pub line_prefixes: Vec<String>,
    pub primary_header: String,
    pub secondary_header: String,
    pub position_pattern: String,
    /// 輸出時移除位置碼的站別前綴（`**-12` → `12`）
    pub strip_station_prefix: bool,
    /// 超過此編號的資料列視為雜訊
    pub max_sample_number: u32,
}

impl Default for ClassifyConfig {
    fn default() -> Self {
        Self {
            noise_markers: vec![
                "MISSING SAMPLE".to_string(),
                "INVALID SAMPLE".to_string(),
                "PAGE:".to_string(),
            ],
            line_prefixes: Vec::new(),
            primary_header: PRIMARY_HEADER.to_string(),
            secondary_header: SECONDARY_HEADER.to_string(),
            position_pattern: r"^[^\s-]{2}-\d+$".to_string(),
            strip_station_prefix: false,
            max_sample_number: DEFAULT_MAX_SAMPLE_NUMBER,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlateConfig {
    pub columns: usize,
    pub row_letters: Vec<String>,
}

impl Default for PlateConfig {
    fn default() -> Self {
        Self {
            columns: 18,
            row_letters: ('A'..='H').map(String::from).collect(),
        }
    }
}

impl InstrumentProfile {
    /// 從 TOML 檔案載入設定
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ExtractError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析設定
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| ExtractError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| ExtractError::ConfigError {
            message: format!("Failed to serialize profile: {}", e),
        })
    }

    /// 驗證設定的合理性
    pub fn validate_config(&self) -> Result<()> {
        validation::validate_non_empty_string("profile.name", &self.profile.name)?;

        // 至少需要一組 marker，且不得為空字串
        validation::validate_positive_number("markers.sequences", self.markers.sequences.len(), 1)?;
        for (index, marker) in self.markers.sequences.iter().enumerate() {
            if marker.is_empty() {
                return Err(ExtractError::InvalidConfigValueError {
                    field: format!("markers.sequences[{}]", index),
                    value: String::new(),
                    reason: "Marker cannot be empty".to_string(),
                });
            }
        }

        validate_replacements(&self.strip.replacements)?;

        validation::validate_non_empty_string(
            "classify.primary_header",
            &self.classify.primary_header,
        )?;
        if let Err(e) = regex::Regex::new(&self.classify.position_pattern) {
            return Err(ExtractError::InvalidConfigValueError {
                field: "classify.position_pattern".to_string(),
                value: self.classify.position_pattern.clone(),
                reason: format!("Invalid regular expression: {}", e),
            });
        }

        validation::validate_positive_number(
            "classify.max_sample_number",
            self.classify.max_sample_number as usize,
            1,
        )?;

        validation::validate_range("plate.columns", self.plate.columns, 1, 1000)?;
        validation::validate_positive_number(
            "plate.row_letters",
            self.plate.row_letters.len(),
            1,
        )?;
        for letter in &self.plate.row_letters {
            validation::validate_non_empty_string("plate.row_letters", letter)?;
        }

        Ok(())
    }
}

impl Validate for InstrumentProfile {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

/// 清理後文字允許的字元：可列印 ASCII 與換行
pub(crate) fn is_clean_char(c: char) -> bool {
    c == '\n' || (' '..='~').contains(&c)
}
