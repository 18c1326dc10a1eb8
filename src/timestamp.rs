//! Subtitle timestamp formatting.
//!
//! Both subtitle formats share one decomposition of seconds into `HH:MM:SS` plus a millisecond
//! remainder. Every field is truncated, not rounded: `1.9999` renders as `...01.999`.

/// The fields of a timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimestampParts {
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
    pub millis: u64,
}

impl TimestampParts {
    /// Split `seconds` into parts. Negative and non-finite input is treated as zero.
    pub fn from_seconds(seconds: f64) -> Self {
        let s = if seconds.is_finite() { seconds.max(0.0) } else { 0.0 };

        Self {
            hours: (s / 3600.0).floor() as u64,
            minutes: ((s % 3600.0) / 60.0).floor() as u64,
            seconds: (s % 60.0).floor() as u64,
            millis: ((s % 1.0) * 1000.0).floor() as u64,
        }
    }

    /// Inverse of [`TimestampParts::from_seconds`], exact to the millisecond.
    pub fn to_seconds(self) -> f64 {
        (self.hours * 3600 + self.minutes * 60 + self.seconds) as f64 + self.millis as f64 / 1000.0
    }

    fn render(self, millis_separator: char) -> String {
        format!(
            "{:02}:{:02}:{:02}{millis_separator}{:03}",
            self.hours, self.minutes, self.seconds, self.millis
        )
    }
}

/// WebVTT timestamp: `HH:MM:SS.mmm`.
pub fn format_vtt(seconds: f64) -> String {
    TimestampParts::from_seconds(seconds).render('.')
}

/// SubRip timestamp: `HH:MM:SS,mmm`.
pub fn format_srt(seconds: f64) -> String {
    TimestampParts::from_seconds(seconds).render(',')
}
