use crate::config::profile::PlateConfig;
use crate::domain::model::{PlateGrid, PlatePosition, PlateRow, SampleRecord};
use crate::utils::error::{ExtractError, Result};

/// 盤面配置：每列欄數與循環使用的列字母
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlateLayout {
    columns: usize,
    row_letters: Vec<String>,
}

impl PlateLayout {
    pub fn new(columns: usize, row_letters: Vec<String>) -> Result<Self> {
        if columns == 0 {
            return Err(ExtractError::InvalidConfigValueError {
                field: "plate.columns".to_string(),
                value: columns.to_string(),
                reason: "Plate must have at least one column".to_string(),
            });
        }
        if row_letters.is_empty() {
            return Err(ExtractError::MissingConfigError {
                field: "plate.row_letters".to_string(),
            });
        }
        Ok(Self {
            columns,
            row_letters,
        })
    }

    pub fn from_config(config: &PlateConfig) -> Result<Self> {
        Self::new(config.columns, config.row_letters.clone())
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn row_label(&self, row: usize) -> &str {
        &self.row_letters[row % self.row_letters.len()]
    }
}

impl Default for PlateLayout {
    fn default() -> Self {
        Self {
            columns: 18,
            row_letters: ('A'..='H').map(String::from).collect(),
        }
    }
}

/// 樣品編號（從 1 起算）對應的盤面位置
pub fn plate_position(sample_number: u32, columns: usize) -> PlatePosition {
    let index = sample_number.saturating_sub(1) as usize;
    PlatePosition {
        row: index / columns,
        column: index % columns,
    }
}

/// 把每筆樣品的 CPM 放到盤面上，同一編號重複出現時以最後一筆為準
pub fn project(records: &[SampleRecord], layout: &PlateLayout) -> PlateGrid {
    let max_sample_number = records.iter().map(|r| r.sample_number).max().unwrap_or(0) as usize;
    let row_count = max_sample_number.div_ceil(layout.columns);

    let mut rows: Vec<PlateRow> = (0..row_count)
        .map(|row| PlateRow {
            label: layout.row_label(row).to_string(),
            cells: vec![None; layout.columns],
        })
        .collect();

    for record in records {
        let position = plate_position(record.sample_number, layout.columns);
        let cell = &mut rows[position.row].cells[position.column];
        if let Some(previous) = cell.replace(record.cpm) {
            tracing::debug!(
                "Sample {} appears more than once; CPM {} replaced by {}",
                record.sample_number,
                previous,
                record.cpm
            );
        }
    }

    PlateGrid {
        columns: layout.columns,
        rows,
    }
}
