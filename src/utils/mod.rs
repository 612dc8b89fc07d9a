//! Common utilities and helpers

pub mod logging;

/// Utility functions for segmerge
pub struct Utils;

impl Utils {
    /// Format seconds as `HH:MM:SS.mmm` (or `MM:SS.mmm` under an hour)
    pub fn format_seconds(seconds: f64) -> String {
        let millis_total = (seconds.max(0.0) * 1000.0).round() as u64;
        let hours = millis_total / 3_600_000;
        let minutes = (millis_total % 3_600_000) / 60_000;
        let secs = (millis_total % 60_000) / 1000;
        let millis = millis_total % 1000;

        if hours > 0 {
            format!("{:02}:{:02}:{:02}.{:03}", hours, minutes, secs, millis)
        } else {
            format!("{:02}:{:02}.{:03}", minutes, secs, millis)
        }
    }
}
