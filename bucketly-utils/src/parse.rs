use std::time::Duration;

/// Parse a duration such as `90`, `45s`, `10m`, `6h`, `1d` or `1h30m`.
///
/// Bare numbers are seconds. Once a unit is used every segment needs one.
pub fn parse_duration(raw: &str) -> Option<Duration> {
    let compact: String = raw.chars().filter(|ch| !ch.is_whitespace()).collect();
    if compact.is_empty() {
        return None;
    }

    if compact.bytes().all(|byte| byte.is_ascii_digit()) {
        let seconds = compact.parse::<u64>().ok().filter(|value| *value > 0)?;
        return Some(Duration::from_secs(seconds));
    }

    let mut total_seconds = 0_u64;
    let mut digits = String::new();
    for ch in compact.chars() {
        if ch.is_ascii_digit() {
            digits.push(ch);
            continue;
        }

        let amount = digits.parse::<u64>().ok()?;
        digits.clear();
        let segment = amount.checked_mul(unit_seconds(ch)?)?;
        total_seconds = total_seconds.checked_add(segment)?;
    }

    if !digits.is_empty() || total_seconds == 0 {
        return None;
    }

    Some(Duration::from_secs(total_seconds))
}

fn unit_seconds(unit: char) -> Option<u64> {
    match unit.to_ascii_lowercase() {
        's' => Some(1),
        'm' => Some(60),
        'h' => Some(3_600),
        'd' => Some(86_400),
        _ => None,
    }
}

/// Parse the loose boolean spellings accepted in environment flags.
pub fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
