use crate::domain::model::{PresetRange, Range};
use crate::utils::error::InvalidRangeError;

pub const MIN_FALLBACK: i64 = 0;
pub const MAX_FALLBACK: i64 = 1;

/// Accepts `[min, max]` only when `min < max`.
pub fn validate(min: i64, max: i64) -> Result<Range, InvalidRangeError> {
    if min >= max {
        tracing::debug!("Rejected range {}-{}", min, max);
        return Err(InvalidRangeError { min, max });
    }
    Ok(Range::new_unchecked(min, max))
}

pub fn validate_preset(preset: &PresetRange) -> Result<Range, InvalidRangeError> {
    validate(preset.min, preset.max)
}

/// Turns raw text field contents into bounds the same way a number input does:
/// leading whitespace, an optional sign, then as many digits as are present.
/// Text without a leading number falls back to `0` for min and `1` for max.
pub fn parse_inputs(min_text: &str, max_text: &str) -> (i64, i64) {
    (
        parse_bound(min_text).unwrap_or(MIN_FALLBACK),
        parse_bound(max_text).unwrap_or(MAX_FALLBACK),
    )
}

fn parse_bound(text: &str) -> Option<i64> {
    let trimmed = text.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 {
        return None;
    }

    let digits = &rest[..digits_len];
    let value = match digits.parse::<i64>() {
        Ok(v) if negative => -v,
        Ok(v) => v,
        // saturate on overflow
        Err(_) if negative => i64::MIN,
        Err(_) => i64::MAX,
    };
    Some(value)
}
