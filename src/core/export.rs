use crate::domain::model::{Artifact, OutputFormat, PlateGrid, SampleRecord};
use crate::utils::error::{ExtractError, Result};
use rust_xlsxwriter::{Format, FormatAlign, Workbook};
use std::io::Write;
use zip::write::{FileOptions, ZipWriter};

/// 依日期命名輸出檔，例如 `20240315_RECORD_clean.txt`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactNames {
    date: String,
}

impl ArtifactNames {
    pub fn for_date(date: impl Into<String>) -> Self {
        Self { date: date.into() }
    }

    pub fn original(&self) -> String {
        format!("{}_RECORD.txt", self.date)
    }

    pub fn cleaned(&self) -> String {
        format!("{}_RECORD_clean.txt", self.date)
    }

    pub fn results(&self, format: OutputFormat) -> String {
        format!("{}_RESULTS.{}", self.date, format.extension())
    }

    pub fn archive(&self) -> String {
        format!("{}_RESULTS.zip", self.date)
    }
}

/// 今天的本地日期，格式 YYYYMMDD
pub fn today_stamp() -> String {
    chrono::Local::now().format("%Y%m%d").to_string()
}

/// 盤面輸出為分隔文字：第一列為欄號，之後每列為列字母加上各格 CPM
pub fn grid_to_delimited(grid: &PlateGrid, delimiter: u8) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(Vec::new());

    let mut header = vec![String::new()];
    header.extend((1..=grid.columns()).map(|column| column.to_string()));
    writer.write_record(&header)?;

    for row in grid.rows() {
        let mut fields = Vec::with_capacity(grid.columns() + 1);
        fields.push(row.label.clone());
        fields.extend(
            row.cells
                .iter()
                .map(|cell| cell.map(|cpm| cpm.to_string()).unwrap_or_default()),
        );
        writer.write_record(&fields)?;
    }

    writer
        .into_inner()
        .map_err(|e| e.into_error().into())
}

/// 盤面輸出為 Excel 活頁簿：第一列為粗體欄號，第一欄為粗體置中的列字母，
/// 沒有樣品的格子留白
pub fn grid_to_xlsx(grid: &PlateGrid) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    let header_format = Format::new().set_bold();
    let label_format = Format::new().set_bold().set_align(FormatAlign::Center);

    for column in 1..=grid.columns() {
        worksheet.write_number_with_format(0, sheet_column(column)?, column as f64, &header_format)?;
    }

    for (index, row) in grid.rows().iter().enumerate() {
        let sheet_row = u32::try_from(index + 1).map_err(|_| ExtractError::ProcessingError {
            message: format!("Plate row {} exceeds the worksheet limit", index + 1),
        })?;
        worksheet.write_string_with_format(sheet_row, 0, row.label.as_str(), &label_format)?;

        for (column, cell) in row.cells.iter().enumerate() {
            if let Some(cpm) = cell {
                worksheet.write_number(sheet_row, sheet_column(column + 1)?, *cpm as f64)?;
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}

fn sheet_column(column: usize) -> Result<u16> {
    u16::try_from(column).map_err(|_| ExtractError::ProcessingError {
        message: format!("Plate column {} exceeds the worksheet limit", column),
    })
}

pub fn records_to_json(records: &[SampleRecord]) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec_pretty(records)?)
}

/// 依指定格式輸出盤面或樣品資料
pub fn render_results(
    format: OutputFormat,
    grid: &PlateGrid,
    records: &[SampleRecord],
) -> Result<Vec<u8>> {
    match format {
        OutputFormat::Xlsx => grid_to_xlsx(grid),
        OutputFormat::Csv => grid_to_delimited(grid, b','),
        OutputFormat::Tsv => grid_to_delimited(grid, b'\t'),
        OutputFormat::Json => records_to_json(records),
    }
}

/// 將多個輸出打包成 ZIP，檔案順序與輸入一致
pub fn build_archive(artifacts: &[Artifact]) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));

    for artifact in artifacts {
        zip.start_file::<_, ()>(artifact.name.as_str(), FileOptions::default())?;
        zip.write_all(&artifact.data)?;
    }

    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}
