//! Clock-style time formatting for labels.

/// Format seconds as `mm:ss`, truncating fractions.
///
/// Minutes are not wrapped, so 3725 s renders as `62:05`. Negative and
/// non-finite input renders as `00:00`.
pub fn format_time(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    format!("{:02}:{:02}", total / 60, total % 60)
}
