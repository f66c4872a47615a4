//! Race time parsing and formatting.
//!
//! Times are exchanged as fixed-width `MM:SS.ss` strings and handled
//! internally as whole milliseconds. Anything that does not match the
//! format parses as `0`, which callers treat as "no valid time".

/// Parse a `MM:SS.ss` time string into milliseconds
///
/// Returns 0 for any non-conforming string. No alternate formats
/// (`SS.ss`, `M:SS.ss`, `MM:SS`) are accepted.
pub fn parse_time(s: &str) -> u64 {
    let bytes = s.as_bytes();
    if bytes.len() != 8 || bytes[2] != b':' || bytes[5] != b'.' {
        return 0;
    }

    let field = |range: std::ops::Range<usize>| -> Option<u64> {
        let part = &bytes[range];
        if !part.iter().all(u8::is_ascii_digit) {
            return None;
        }
        Some(part.iter().fold(0, |acc, b| acc * 10 + u64::from(b - b'0')))
    };

    match (field(0..2), field(3..5), field(6..8)) {
        (Some(minutes), Some(seconds), Some(hundredths)) if seconds < 60 => {
            (minutes * 60 + seconds) * 1000 + hundredths * 10
        }
        _ => 0,
    }
}

/// Format milliseconds back into `MM:SS.ss`
///
/// Sub-hundredth precision is truncated. Minutes saturate at 99.
pub fn format_time(ms: u64) -> String {
    let hundredths = (ms / 10) % 100;
    let seconds = (ms / 1000) % 60;
    let minutes = (ms / 60_000).min(99);
    format!("{:02}:{:02}.{:02}", minutes, seconds, hundredths)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_times() {
        assert_eq!(parse_time("00:58.00"), 58_000);
        assert_eq!(parse_time("01:02.35"), 62_350);
        assert_eq!(parse_time("10:00.01"), 600_010);
    }

    #[test]
    fn test_parse_rejects_other_formats() {
        assert_eq!(parse_time(""), 0);
        assert_eq!(parse_time("58.00"), 0);
        assert_eq!(parse_time("1:02.35"), 0);
        assert_eq!(parse_time("01:02"), 0);
        assert_eq!(parse_time("01:02.3"), 0);
        assert_eq!(parse_time("01:60.00"), 0);
        assert_eq!(parse_time("ab:cd.ef"), 0);
        assert_eq!(parse_time(" 1:02.35"), 0);
    }

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(58_000), "00:58.00");
        assert_eq!(format_time(62_350), "01:02.35");
        assert_eq!(format_time(0), "00:00.00");
    }

    #[test]
    fn test_format_parses_back() {
        for text in ["00:31.07", "02:45.99", "12:00.50"] {
            assert_eq!(format_time(parse_time(text)), text);
        }
    }
}
