use crate::config::profile::{is_clean_char, Replacement, StripConfig};
use crate::utils::error::{ExtractError, Result};
use regex::Regex;

/// ESC 加上最多一個參數字元，或單獨的換頁字元
const STRUCTURAL_PATTERN: &str = r"\x1b[^\n]?|\x0c";

/// 移除印表機控制碼的清理器。
///
/// 處理順序：
/// 1. 依序套用替換表（字面比對，非正規表達式）
/// 2. 移除結構性控制序列（ESC + 一個字元、換頁）
/// 3. 丟棄可列印 ASCII 與換行以外的所有字元
///
/// 替換表樣式必含控制字元（建立時檢查），因此對輸出再執行一次
/// `strip` 不會有任何變化。
#[derive(Debug, Clone)]
pub struct ControlCodeStripper {
    replacements: Vec<Replacement>,
    structural: Regex,
}

impl ControlCodeStripper {
    pub fn new(replacements: Vec<Replacement>) -> Result<Self> {
        validate_replacements(&replacements)?;

        let structural = Regex::new(STRUCTURAL_PATTERN).map_err(|e| ExtractError::ProcessingError {
            message: format!("Failed to compile control-code pattern: {}", e),
        })?;

        Ok(Self {
            replacements,
            structural,
        })
    }

    pub fn from_config(config: &StripConfig) -> Result<Self> {
        Self::new(config.replacements.clone())
    }

    pub fn strip(&self, text: &str) -> String {
        let mut cleaned = text.to_string();

        for entry in &self.replacements {
            if cleaned.contains(&entry.pattern) {
                cleaned = cleaned.replace(&entry.pattern, &entry.replacement);
            }
        }

        let cleaned = self.structural.replace_all(&cleaned, "");

        cleaned.chars().filter(|c| is_clean_char(*c)).collect()
    }
}

/// 替換樣式必須含控制字元或非 ASCII 字元，否則可能再次命中已清理的文字
pub fn validate_replacements(replacements: &[Replacement]) -> Result<()> {
    for (index, entry) in replacements.iter().enumerate() {
        if entry.pattern.chars().all(is_clean_char) {
            return Err(ExtractError::InvalidConfigValueError {
                field: format!("strip.replacements[{}].pattern", index),
                value: entry.pattern.escape_debug().to_string(),
                reason: "Pattern must contain at least one control or non-ASCII character"
                    .to_string(),
            });
        }
    }
    Ok(())
}

/// 將 marker 之後的位元組解碼為文字，無效的 UTF-8 片段直接丟棄
pub fn decode_lossy(bytes: &[u8]) -> String {
    let mut text = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        text.push_str(chunk.valid());
    }
    text
}
