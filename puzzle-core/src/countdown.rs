const MS_PER_MINUTE: f64 = 60_000.0;
const MS_PER_SECOND: f64 = 1_000.0;

/// Time left in a run of `total` ms after `elapsed` ms, never negative.
pub fn remaining_ms(total: f64, elapsed: f64) -> f64 {
    (total - elapsed).max(0.0)
}

/// `m:ss` rendering of a remaining time; negative input reads as zero.
pub fn format_remaining(remaining_ms: f64) -> String {
    let ms = remaining_ms.max(0.0);
    let minutes = (ms / MS_PER_MINUTE).floor() as u64;
    let seconds = ((ms % MS_PER_MINUTE) / MS_PER_SECOND).floor() as u64;
    format!("{minutes}:{seconds:02}")
}
