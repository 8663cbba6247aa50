//! Path string sanitizing
//!
//! Paths pasted from file managers or chat windows often arrive wrapped in
//! quotes, padded with whitespace, or carrying invisible bidi override
//! characters. `clean_path` undoes all of that before the path is touched.

use std::ops::RangeInclusive;

/// LRE, RLE, PDF, LRO and RLO
const BIDI_CONTROLS: RangeInclusive<char> = '\u{202A}'..='\u{202E}';

/// Normalize a user-supplied path string.
///
/// Never fails; the result may be empty.
pub fn clean_path(path: &str) -> String {
    let path = if cfg!(windows) {
        path.replace('/', "\\")
    } else {
        path.to_string()
    };

    let path: String = path.chars().filter(|c| !BIDI_CONTROLS.contains(c)).collect();

    path.trim_matches(' ')
        .trim_matches('"')
        .trim_matches('\n')
        .trim_matches('"')
        .trim_matches(' ')
        .to_string()
}
