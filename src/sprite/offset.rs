/// Tag preceding the pivot offset in Doom-style PNG lumps
const GRAB_TAG: &[u8; 4] = b"grAb";

/// Scan raw image bytes for a `grAb` tag and read the pivot offset behind it.
///
/// This is a plain byte scan over the whole buffer, not a PNG chunk walk: the
/// lowest-offset occurrence wins even if it sits inside another chunk's data.
/// Returns `(0, 0)` when no tag with 8 trailing bytes is found.
pub fn extract_offset(bytes: &[u8]) -> (i32, i32) {
    bytes
        .windows(GRAB_TAG.len() + 8)
        .find(|window| &window[..4] == GRAB_TAG)
        .map(|window| {
            let x = i32::from_be_bytes([window[4], window[5], window[6], window[7]]);
            let y = i32::from_be_bytes([window[8], window[9], window[10], window[11]]);
            (x, y)
        })
        .unwrap_or((0, 0))
}
