/// Group an integer with thousands separators (e.g. 1250 -> "1,250").
pub fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if value < 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

/// Format a point total for display ("1 pt", "1,250 pts").
pub fn format_points(points: i64) -> String {
    if points.abs() == 1 {
        format!("{points} pt")
    } else {
        format!("{} pts", group_thousands(points))
    }
}

/// Format a global rank; missing or non-positive ranks read as unranked.
pub fn format_rank(rank: Option<i64>) -> String {
    match rank {
        Some(rank) if rank > 0 => format!("#{}", group_thousands(rank)),
        _ => "Unranked".to_owned(),
    }
}

/// Format a progress percentage rounded down to a whole number.
pub fn format_percentage(percentage: f64) -> String {
    let clamped = if percentage.is_finite() {
        percentage.clamp(0.0, 100.0)
    } else {
        0.0
    };
    format!("{}%", clamped.floor() as u8)
}

/// Format seconds into the largest whole unit (e.g. 59s, 4m, 3h, 2d).
pub fn format_compact_duration(total_seconds: u64) -> String {
    match total_seconds {
        0..=59 => format!("{total_seconds}s"),
        60..=3_599 => format!("{}m", total_seconds / 60),
        3_600..=86_399 => format!("{}h", total_seconds / 3_600),
        _ => format!("{}d", total_seconds / 86_400),
    }
}

/// Describe how long ago `then` happened relative to `now` (unix seconds).
pub fn format_relative_age(then: u64, now: u64) -> String {
    let elapsed = now.saturating_sub(then);
    if elapsed < 60 {
        return "just now".to_owned();
    }

    format!("{} ago", format_compact_duration(elapsed))
}

#[cfg(test)]
mod tests {
    use super::{
        format_compact_duration, format_percentage, format_points, format_rank,
        format_relative_age, group_thousands,
    };

    #[test]
    fn groups_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1_250), "1,250");
        assert_eq!(group_thousands(1_000_000), "1,000,000");
        assert_eq!(group_thousands(-12_345), "-12,345");
    }

    #[test]
    fn formats_points() {
        assert_eq!(format_points(1), "1 pt");
        assert_eq!(format_points(0), "0 pts");
        assert_eq!(format_points(1_250), "1,250 pts");
    }

    #[test]
    fn formats_ranks() {
        assert_eq!(format_rank(Some(3)), "#3");
        assert_eq!(format_rank(Some(1_204)), "#1,204");
        assert_eq!(format_rank(Some(0)), "Unranked");
        assert_eq!(format_rank(None), "Unranked");
    }

    #[test]
    fn formats_percentages() {
        assert_eq!(format_percentage(70.9), "70%");
        assert_eq!(format_percentage(140.0), "100%");
        assert_eq!(format_percentage(-3.0), "0%");
        assert_eq!(format_percentage(f64::NAN), "0%");
    }

    #[test]
    fn formats_relative_ages() {
        assert_eq!(format_compact_duration(59), "59s");
        assert_eq!(format_compact_duration(3_599), "59m");
        assert_eq!(format_relative_age(1_000, 1_030), "just now");
        assert_eq!(format_relative_age(1_000, 1_000 + 300), "5m ago");
        assert_eq!(format_relative_age(0, 3 * 86_400), "3d ago");
        assert_eq!(format_relative_age(2_000, 1_000), "just now");
    }
}
