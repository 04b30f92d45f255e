use crate::config::profile::ClassifyConfig;
use crate::domain::model::SampleRecord;
use crate::utils::error::{ExtractError, Result};
use regex::Regex;

/// 逐行分類清理後的文字：雜訊、表頭、資料列、其他保留行
#[derive(Debug, Clone)]
pub struct Classifier {
    noise_markers: Vec<String>,
    line_prefixes: Vec<String>,
    primary_header: String,
    secondary_header: String,
    position_pattern: Regex,
    strip_station_prefix: bool,
    max_sample_number: u32,
}

/// 分類結果
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Classified {
    /// 非資料、非表頭的行，保留原順序
    pub passthrough: Vec<String>,
    pub records: Vec<SampleRecord>,
    /// 與 `records` 一一對應的固定寬度輸出行
    pub data_lines: Vec<String>,
    /// 輸出時放在資料區塊前的表頭（只出現一次）
    pub header: Vec<String>,
    /// 以數字開頭但無法解析而被丟棄的行數
    pub dropped: usize,
}

impl Classified {
    pub fn render(&self) -> String {
        self.passthrough
            .iter()
            .chain(self.header.iter())
            .chain(self.data_lines.iter())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Classifier {
    pub fn new(config: &ClassifyConfig) -> Result<Self> {
        let position_pattern = Regex::new(&config.position_pattern).map_err(|e| {
            ExtractError::InvalidConfigValueError {
                field: "classify.position_pattern".to_string(),
                value: config.position_pattern.clone(),
                reason: format!("Invalid regular expression: {}", e),
            }
        })?;

        Ok(Self {
            noise_markers: config
                .noise_markers
                .iter()
                .filter(|m| !m.is_empty())
                .cloned()
                .collect(),
            line_prefixes: config
                .line_prefixes
                .iter()
                .filter(|p| !p.is_empty())
                .cloned()
                .collect(),
            primary_header: config.primary_header.clone(),
            secondary_header: config.secondary_header.clone(),
            position_pattern,
            strip_station_prefix: config.strip_station_prefix,
            max_sample_number: config.max_sample_number,
        })
    }

    pub fn classify(&self, cleaned: &str) -> Classified {
        let mut result = Classified::default();
        let mut header_seen = false;

        for line in cleaned.lines() {
            if line.trim().is_empty() || self.is_noise(line) {
                continue;
            }
            let line = self.strip_prefix(line);

            // 表頭每頁重複一次，一律移除，最後只輸出一份
            if self.is_primary_header(line) {
                header_seen = true;
                continue;
            }
            // 第二行表頭只在主表頭出現過之後才視為表頭
            if header_seen && self.is_secondary_header(line) {
                continue;
            }

            if !line.trim_start().starts_with(|c: char| c.is_ascii_digit()) {
                result.passthrough.push(line.to_string());
                continue;
            }

            match self.parse_record(line) {
                Some(record) => {
                    result.data_lines.push(self.format_record(&record));
                    result.records.push(record);
                }
                None => {
                    tracing::debug!("Dropping malformed sample line: {:?}", line);
                    result.dropped += 1;
                }
            }
        }

        if header_seen || !result.records.is_empty() {
            result.header.push(self.primary_header.clone());
            if !self.secondary_header.is_empty() {
                result.header.push(self.secondary_header.clone());
            }
        }

        result
    }

    fn is_noise(&self, line: &str) -> bool {
        self.noise_markers.iter().any(|marker| line.contains(marker.as_str()))
    }

    fn strip_prefix<'a>(&self, line: &'a str) -> &'a str {
        self.line_prefixes
            .iter()
            .find_map(|prefix| line.strip_prefix(prefix.as_str()))
            .unwrap_or(line)
    }

    fn is_primary_header(&self, line: &str) -> bool {
        !self.primary_header.is_empty() && line.contains(self.primary_header.as_str())
    }

    fn is_secondary_header(&self, line: &str) -> bool {
        !self.secondary_header.is_empty() && line.contains(self.secondary_header.as_str())
    }

    /// 欄位：樣品編號、位置碼、時間、H#、CPM，其後為選填欄位
    fn parse_record(&self, line: &str) -> Option<SampleRecord> {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 5 {
            return None;
        }

        let sample_number = fields[0]
            .parse::<u32>()
            .ok()
            .filter(|n| (1..=self.max_sample_number).contains(n))?;
        if !self.position_pattern.is_match(fields[1]) {
            return None;
        }

        let reading = fields[4].parse::<f64>().ok()?;
        if !reading.is_finite() || reading < 0.0 {
            return None;
        }

        Some(SampleRecord {
            sample_number,
            position_code: fields[1].to_string(),
            time_minutes: fields[2].to_string(),
            h_number: fields[3].to_string(),
            cpm_reading: fields[4].to_string(),
            cpm: reading.round() as u64,
            trailing: fields[5..].iter().map(|f| f.to_string()).collect(),
        })
    }

    fn format_record(&self, record: &SampleRecord) -> String {
        let position = if self.strip_station_prefix {
            record
                .position_code
                .split_once('-')
                .map(|(_, slot)| slot)
                .unwrap_or(record.position_code.as_str())
        } else {
            record.position_code.as_str()
        };

        let mut line = format!(
            "{:>3}  {:<5} {:<7} {:<3} {:>8}",
            record.sample_number, position, record.time_minutes, record.h_number, record.cpm_reading
        );

        // %ERROR、LUMEX、ELAPSED 對齊表頭，其餘欄位以單一空白分隔
        const TRAILING_WIDTHS: [usize; 3] = [6, 5, 9];
        for (index, field) in record.trailing.iter().enumerate() {
            match TRAILING_WIDTHS.get(index) {
                Some(width) => line.push_str(&format!(" {:>width$}", field, width = *width)),
                None => {
                    line.push(' ');
                    line.push_str(field);
                }
            }
        }

        line.trim_end().to_string()
    }
}
