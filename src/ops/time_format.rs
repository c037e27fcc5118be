/// Formats seconds as `m:ss`.
///
/// Zero, negative and non-finite input all render as `0:00`; fractions are dropped.
pub fn format_clock(seconds: f64) -> String {
    if !seconds.is_finite() || seconds <= 0.0 {
        return "0:00".to_string();
    }
    let total = seconds.trunc() as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

/// Formats a span as `X.Ys` under a minute, otherwise `Xm Ys`.
pub fn format_duration(seconds: f64) -> String {
    let seconds = if seconds.is_finite() { seconds.max(0.0) } else { 0.0 };
    if seconds < 60.0 {
        return format!("{:.1}s", seconds);
    }
    let total = seconds.trunc() as u64;
    format!("{}m {}s", total / 60, total % 60)
}
