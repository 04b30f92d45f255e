use anyhow::Result;
use clap::Parser;
use lsc_cpm::core::marker::{LS6500_MARKER, LS6500_MARKER_SPACED};
use lsc_cpm::{CliConfig, CpmPipeline, ExtractError, ExtractionEngine, LocalStorage};
use std::io::Read;
use std::path::Path;
use tempfile::TempDir;

/// 寫入擷取檔並建立對應的 CLI 設定
fn setup(temp_dir: &TempDir, capture: &[u8], extra_args: &[&str]) -> Result<CliConfig> {
    let input = temp_dir.path().join("RECORD.TXT");
    std::fs::write(&input, capture)?;
    let output = temp_dir.path().join("output");

    let mut args = vec![
        "lsc-cpm".to_string(),
        input.to_string_lossy().into_owned(),
        "--output-path".to_string(),
        output.to_string_lossy().into_owned(),
        "--date".to_string(),
        "20240315".to_string(),
    ];
    args.extend(extra_args.iter().map(|a| a.to_string()));

    let mut config = CliConfig::try_parse_from(args)?;
    config.load_profile()?;
    Ok(config)
}

fn read_zip_entry(zip_path: &Path, name: &str) -> Result<String> {
    let data = std::fs::read(zip_path)?;
    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(data))?;
    let mut content = String::new();
    archive.by_name(name)?.read_to_string(&mut content)?;
    Ok(content)
}

#[tokio::test]
async fn test_two_sample_capture_end_to_end() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let capture = [
        LS6500_MARKER,
        b"1 **-1 5.00 1 123.4\n2 **-2 5.00 1 456.7\n",
    ]
    .concat();
    let config = setup(&temp_dir, &capture, &[])?;
    let output_dir = temp_dir.path().join("output");

    let storage = LocalStorage::new(config.output_path.clone());
    let engine = ExtractionEngine::new(CpmPipeline::new(storage, config));
    let summary = engine.run().await?;

    assert_eq!(summary.record_count, 2);
    assert_eq!(summary.row_count, 1);
    assert!(summary.output_path.ends_with("20240315_RESULTS.zip"));

    // 各輸出檔都寫到輸出目錄
    for name in [
        "20240315_RECORD.txt",
        "20240315_RECORD_clean.txt",
        "20240315_RESULTS.xlsx",
        "20240315_RESULTS.csv",
        "20240315_RESULTS.zip",
    ] {
        assert!(output_dir.join(name).exists(), "missing {}", name);
    }

    let original = std::fs::read(output_dir.join("20240315_RECORD.txt"))?;
    assert_eq!(original, capture);

    let csv = std::fs::read_to_string(output_dir.join("20240315_RESULTS.csv"))?;
    let rows: Vec<&str> = csv.lines().collect();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1], format!("A,123,457{}", ",".repeat(16)));

    let zip_path = output_dir.join("20240315_RESULTS.zip");
    let cleaned = read_zip_entry(&zip_path, "20240315_RECORD_clean.txt")?;
    let data_lines: Vec<Vec<&str>> = cleaned
        .lines()
        .skip(2)
        .map(|line| line.split_whitespace().collect())
        .collect();
    assert_eq!(data_lines[0], vec!["1", "**-1", "5.00", "1", "123.4"]);
    assert_eq!(data_lines[1], vec!["2", "**-2", "5.00", "1", "456.7"]);

    let zipped_csv = read_zip_entry(&zip_path, "20240315_RESULTS.csv")?;
    assert_eq!(zipped_csv, csv);

    // 活頁簿也收進壓縮檔，且與單獨寫出的檔案相同
    let workbook = std::fs::read(output_dir.join("20240315_RESULTS.xlsx"))?;
    let data = std::fs::read(&zip_path)?;
    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(data))?;
    let mut zipped_workbook = Vec::new();
    archive
        .by_name("20240315_RESULTS.xlsx")?
        .read_to_end(&mut zipped_workbook)?;
    assert_eq!(zipped_workbook, workbook);
    assert_eq!(archive.len(), 5);

    let sheet = {
        let mut book = zip::ZipArchive::new(std::io::Cursor::new(workbook))?;
        let mut xml = String::new();
        book.by_name("xl/worksheets/sheet1.xml")?
            .read_to_string(&mut xml)?;
        xml
    };
    assert!(sheet.contains("<v>123</v>"));
    assert!(sheet.contains("<v>457</v>"));

    Ok(())
}

#[tokio::test]
async fn test_nineteen_samples_wrap_to_second_row() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let body: String = (1..=19)
        .map(|n| format!("{:>3}  **-{:<3} 1.00  1  {}.0  2.10  0  0:30\n", n, n, 1000 + n))
        .collect();
    let capture = [b"stale job\n".as_slice(), LS6500_MARKER_SPACED, body.as_bytes()].concat();
    let config = setup(&temp_dir, &capture, &["--formats", "csv,json", "--no-archive"])?;
    let output_dir = temp_dir.path().join("output");

    let storage = LocalStorage::new(config.output_path.clone());
    let summary = ExtractionEngine::new(CpmPipeline::new(storage, config))
        .run()
        .await?;

    assert_eq!(summary.record_count, 19);
    assert_eq!(summary.row_count, 2);
    assert!(summary.output_path.ends_with("20240315_RECORD_clean.txt"));
    assert!(!output_dir.join("20240315_RESULTS.zip").exists());

    let csv = std::fs::read_to_string(output_dir.join("20240315_RESULTS.csv"))?;
    let rows: Vec<Vec<&str>> = csv.lines().map(|l| l.split(',').collect()).collect();
    assert_eq!(rows[2][0], "B");
    assert_eq!(rows[2][1], "1019");
    assert!(rows[2][2..].iter().all(|cell| cell.is_empty()));
    assert_eq!(rows[1][18], "1018");

    let json: serde_json::Value =
        serde_json::from_slice(&std::fs::read(output_dir.join("20240315_RESULTS.json"))?)?;
    assert_eq!(json.as_array().map(|a| a.len()), Some(19));
    assert_eq!(json[18]["trailing"], serde_json::json!(["2.10", "0", "0:30"]));

    Ok(())
}

#[tokio::test]
async fn test_capture_without_marker_writes_nothing() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let config = setup(&temp_dir, b"1 **-1 5.00 1 123.4\n", &[])?;
    let output_dir = temp_dir.path().join("output");

    let storage = LocalStorage::new(config.output_path.clone());
    let result = ExtractionEngine::new(CpmPipeline::new(storage, config))
        .run()
        .await;

    assert!(matches!(
        result,
        Err(ExtractError::FormatNotRecognized { .. })
    ));
    assert!(!output_dir.exists());

    Ok(())
}

#[tokio::test]
async fn test_empty_capture_warns_or_fails_in_strict_mode() -> Result<()> {
    let capture = [LS6500_MARKER, b"PAGE: 1\n3 MISSING SAMPLE\n"].concat();

    let lenient_dir = TempDir::new()?;
    let config = setup(&lenient_dir, &capture, &[])?;
    let storage = LocalStorage::new(config.output_path.clone());
    let summary = ExtractionEngine::new(CpmPipeline::new(storage, config))
        .run()
        .await?;
    assert_eq!(summary.record_count, 0);
    assert_eq!(summary.row_count, 0);

    let strict_dir = TempDir::new()?;
    let config = setup(&strict_dir, &capture, &["--strict"])?;
    let storage = LocalStorage::new(config.output_path.clone());
    let err = ExtractionEngine::new_with_monitoring(CpmPipeline::new(storage, config), true)
        .run()
        .await
        .unwrap_err();
    assert!(matches!(err, ExtractError::NoDataExtracted));

    Ok(())
}
