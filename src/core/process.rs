use crate::config::profile::InstrumentProfile;
use crate::core::classify::Classifier;
use crate::core::marker::locate;
use crate::core::plate::{project, PlateLayout};
use crate::core::strip::{decode_lossy, ControlCodeStripper};
use crate::domain::model::{Extraction, RawCapture};
use crate::utils::error::{ExtractError, Result};

/// 處理一份擷取檔：找 marker → 清除控制碼 → 分類資料列 → 投影到盤面。
///
/// 相同的輸入與設定一定得到相同的輸出。找不到 marker 時回傳
/// `FormatNotRecognized`；沒有任何資料列並不是錯誤，由呼叫端檢查
/// `Extraction::is_empty`。
pub fn process_capture(capture: RawCapture, profile: &InstrumentProfile) -> Result<Extraction> {
    let markers = profile.markers.byte_sequences();
    let marker = locate(capture.as_bytes(), markers.as_slice()).ok_or(ExtractError::FormatNotRecognized {
        markers_checked: markers.len(),
    })?;
    tracing::debug!(
        "Marker #{} found at {}..{} of {} bytes",
        marker.marker_index,
        marker.start,
        marker.end,
        capture.len()
    );

    let stripper = ControlCodeStripper::from_config(&profile.strip)?;
    let text = stripper.strip(&decode_lossy(&capture.as_bytes()[marker.end..]));

    let classified = Classifier::new(&profile.classify)?.classify(&text);
    if classified.dropped > 0 {
        tracing::debug!("{} malformed sample lines dropped", classified.dropped);
    }

    let grid = project(&classified.records, &PlateLayout::from_config(&profile.plate)?);
    tracing::info!(
        "🔬 Extracted {} sample records into {} plate rows",
        classified.records.len(),
        grid.row_count()
    );

    Ok(Extraction {
        capture,
        marker,
        cleaned_text: classified.render(),
        records: classified.records,
        grid,
    })
}
