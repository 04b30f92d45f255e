use crate::domain::model::MarkerMatch;
use memchr::memmem;

/// LS6500 每次列印前送出的印表機重設序列
pub const LS6500_MARKER: &[u8] = b"\x1bx\x00\x1bt\x00\x1b7\x1bR\x00\x1b2\x12\x1bP\x1bQP\x1bW\x00\x1bH\x1b-\x00\x1bx\x00\x1bR\x00\x1b2\x12\x1bP\x1bQP\x0c";

/// 同一序列，但 NUL 已被擷取工具換成空白
pub const LS6500_MARKER_SPACED: &[u8] =
    b"\x1bx \x1bt \x1b7\x1bR \x1b2\x12\x1bP\x1bQP\x1bW \x1bH\x1b- \x1bx \x1bR \x1b2\x12\x1bP\x1bQP\x0c";

/// 找出結束位置最靠後的 marker。
///
/// 每個 marker 各自找最後一次出現的位置，再取結束位置最大者；
/// 結束位置相同時取先宣告的 marker。空的 marker 會被忽略。
pub fn locate<M: AsRef<[u8]>>(raw: &[u8], markers: &[M]) -> Option<MarkerMatch> {
    let mut best: Option<MarkerMatch> = None;

    for (marker_index, marker) in markers.iter().enumerate() {
        let marker = marker.as_ref();
        let Some(start) = rfind(raw, marker) else {
            continue;
        };
        let end = start + marker.len();

        if best.map_or(true, |current| end > current.end) {
            best = Some(MarkerMatch {
                marker_index,
                start,
                end,
            });
        }
    }

    best
}

fn rfind(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    // 空字串在任何位置都會命中
    if needle.is_empty() {
        return None;
    }
    memmem::rfind(haystack, needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn capture(parts: &[&[u8]]) -> Vec<u8> {
        parts.concat()
    }

    #[test]
    fn test_locate_returns_offset_after_marker() {
        let raw = capture(&[b"junk", LS6500_MARKER, b"1 **-1 5.00 1 123.4\n"]);
        let found = locate(&raw, &[LS6500_MARKER]).unwrap();

        assert_eq!(found.marker_index, 0);
        assert_eq!(found.start, 4);
        assert_eq!(found.end, 4 + LS6500_MARKER.len());
        assert_eq!(&raw[found.end..], b"1 **-1 5.00 1 123.4\n");
    }

    #[test]
    fn test_locate_uses_last_occurrence() {
        let raw = capture(&[LS6500_MARKER, b"old job\n", LS6500_MARKER, b"new job\n"]);
        let found = locate(&raw, &[LS6500_MARKER]).unwrap();
        assert_eq!(&raw[found.end..], b"new job\n");
    }

    #[test]
    fn test_latest_marker_wins_regardless_of_order() {
        let raw = capture(&[
            LS6500_MARKER,
            b"first\n",
            LS6500_MARKER_SPACED,
            b"second\n",
        ]);

        let forward = locate(&raw, &[LS6500_MARKER, LS6500_MARKER_SPACED]).unwrap();
        let reversed = locate(&raw, &[LS6500_MARKER_SPACED, LS6500_MARKER]).unwrap();

        assert_eq!(forward.end, reversed.end);
        assert_eq!(&raw[forward.end..], b"second\n");
        assert_eq!(forward.marker_index, 1);
        assert_eq!(reversed.marker_index, 0);
    }

    #[test]
    fn test_tie_on_end_offset_prefers_first_declared() {
        let raw = b"xxABCDyy";
        let found = locate(raw, &[&b"CD"[..], &b"ABCD"[..]]).unwrap();
        assert_eq!(found.marker_index, 0);
        assert_eq!(found.end, 6);
    }

    #[test]
    fn test_no_marker_returns_none() {
        let raw = b"1 **-1 5.00 1 123.4\n";
        assert!(locate(raw, &[LS6500_MARKER, LS6500_MARKER_SPACED]).is_none());
        assert!(locate(b"", &[LS6500_MARKER]).is_none());
    }

    #[test]
    fn test_marker_near_end_of_large_capture() {
        let mut raw = vec![b'x'; 4 * 1024 * 1024];
        raw.extend_from_slice(LS6500_MARKER_SPACED);
        raw.extend_from_slice(b"1 **-1 5.00 1 7.0\n");

        let found = locate(&raw, &[LS6500_MARKER, LS6500_MARKER_SPACED]).unwrap();
        assert_eq!(found.marker_index, 1);
        assert_eq!(found.start, 4 * 1024 * 1024);
        assert_eq!(&raw[found.end..], b"1 **-1 5.00 1 7.0\n");
    }

    #[test]
    fn test_marker_longer_than_capture() {
        assert!(locate(b"\x1bx", &[LS6500_MARKER]).is_none());
    }

    #[test]
    fn test_empty_marker_is_ignored() {
        let raw = b"abc";
        assert!(locate(raw, &[&b""[..]]).is_none());
    }
}
