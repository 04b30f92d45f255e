use serde::{Deserialize, Serialize};

/// 一次上傳的儀器輸出原始位元組，建立後不可變
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCapture {
    source_name: Option<String>,
    bytes: Vec<u8>,
}

impl RawCapture {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self {
            source_name: None,
            bytes,
        }
    }

    pub fn with_source_name(mut self, name: impl Into<String>) -> Self {
        self.source_name = Some(name.into());
        self
    }

    pub fn source_name(&self) -> Option<&str> {
        self.source_name.as_deref()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Marker 搜尋結果：`end` 為資料區塊起點
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerMatch {
    pub marker_index: usize,
    pub start: usize,
    pub end: usize,
}

/// 一筆樣品資料列
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleRecord {
    pub sample_number: u32,
    pub position_code: String,
    pub time_minutes: String,
    pub h_number: String,
    /// 儀器原始輸出的 CPM 字串，例如 `123.4`
    pub cpm_reading: String,
    /// 四捨五入後的 CPM
    pub cpm: u64,
    /// CPM 之後的欄位（%ERROR、LUMEX %、ELAPSED TIME …）
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub trailing: Vec<String>,
}

impl SampleRecord {
    pub fn error_percent(&self) -> Option<&str> {
        self.trailing.first().map(String::as_str)
    }

    pub fn lumex_percent(&self) -> Option<&str> {
        self.trailing.get(1).map(String::as_str)
    }

    pub fn elapsed_time(&self) -> Option<&str> {
        self.trailing.get(2).map(String::as_str)
    }
}

/// 樣品在盤面上的位置，row 與 column 皆從 0 起算
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatePosition {
    pub row: usize,
    pub column: usize,
}

impl PlatePosition {
    /// 試算表上顯示的欄號（從 1 起算）
    pub fn column_number(&self) -> usize {
        self.column + 1
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlateRow {
    pub label: String,
    pub cells: Vec<Option<u64>>,
}

/// 盤面矩陣，每列固定 `columns` 格，未填的格子為 `None`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlateGrid {
    pub(crate) columns: usize,
    pub(crate) rows: Vec<PlateRow>,
}

impl PlateGrid {
    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> &[PlateRow] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn row_labels(&self) -> Vec<&str> {
        self.rows.iter().map(|row| row.label.as_str()).collect()
    }

    pub fn cell(&self, position: PlatePosition) -> Option<u64> {
        self.rows
            .get(position.row)
            .and_then(|row| row.cells.get(position.column).copied().flatten())
    }

    pub fn filled_cells(&self) -> usize {
        self.rows
            .iter()
            .map(|row| row.cells.iter().filter(|cell| cell.is_some()).count())
            .sum()
    }
}

/// 一次處理的完整結果
#[derive(Debug, Clone)]
pub struct Extraction {
    pub capture: RawCapture,
    pub marker: MarkerMatch,
    pub cleaned_text: String,
    pub records: Vec<SampleRecord>,
    pub grid: PlateGrid,
}

impl Extraction {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// 交給 Storage 或壓縮檔的具名輸出
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub name: String,
    pub data: Vec<u8>,
}

impl Artifact {
    pub fn new(name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub output_path: String,
    pub record_count: usize,
    pub row_count: usize,
}

/// 盤面與樣品資料的輸出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Xlsx,
    Csv,
    Tsv,
    Json,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Xlsx => "xlsx",
            OutputFormat::Csv => "csv",
            OutputFormat::Tsv => "tsv",
            OutputFormat::Json => "json",
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "xlsx" => Ok(OutputFormat::Xlsx),
            "csv" => Ok(OutputFormat::Csv),
            "tsv" => Ok(OutputFormat::Tsv),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!(
                "Unsupported format '{}'. Valid formats: xlsx, csv, tsv, json",
                other
            )),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}
