//! Alarm and gauge evaluation for a device's last reading.

use crate::models::Thresholds;

/// Alarm band used when a device has no thresholds.
pub const DEFAULT_ALARM_BAND: Thresholds = Thresholds {
    min: 20.0,
    max: 80.0,
};

/// Gauge scale used when a device has no thresholds.
pub const DEFAULT_GAUGE_SCALE: Thresholds = Thresholds {
    min: 0.0,
    max: 100.0,
};

/// Whether a reading falls outside the alarm band.
///
/// A device that has never reported has no meaningful value and is never in alarm.
pub fn is_alarm(value: f64, thresholds: Option<&Thresholds>, has_reported: bool) -> bool {
    if !has_reported {
        return false;
    }
    let band = thresholds.unwrap_or(&DEFAULT_ALARM_BAND);
    value < band.min || value > band.max
}

/// Gauge fill percentage, clamped to `0..=100`.
pub fn progress(value: f64, thresholds: Option<&Thresholds>) -> f64 {
    let scale = thresholds.unwrap_or(&DEFAULT_GAUGE_SCALE);
    let span = scale.max - scale.min;
    if span <= 0.0 || !value.is_finite() {
        return 0.0;
    }
    ((value - scale.min) / span * 100.0).clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_band() {
        assert!(is_alarm(19.9, None, true));
        assert!(is_alarm(80.1, None, true));
        assert!(!is_alarm(20.0, None, true));
        assert!(!is_alarm(80.0, None, true));
        assert!(!is_alarm(50.0, None, true));
    }

    #[test]
    fn test_custom_band() {
        let band = Thresholds { min: 1.5, max: 6.0 };
        assert!(is_alarm(1.0, Some(&band), true));
        assert!(!is_alarm(5.0, Some(&band), true));
        assert!(is_alarm(7.2, Some(&band), true));
    }

    #[test]
    fn test_never_reported_is_not_alarm() {
        assert!(!is_alarm(0.0, None, false));
        assert!(!is_alarm(-100.0, Some(&Thresholds { min: 0.0, max: 1.0 }), false));
    }

    #[test]
    fn test_progress_default_scale() {
        assert_eq!(progress(42.0, None), 42.0);
        assert_eq!(progress(-5.0, None), 0.0);
        assert_eq!(progress(140.0, None), 100.0);
    }

    #[test]
    fn test_progress_custom_scale() {
        let scale = Thresholds { min: 0.0, max: 8.0 };
        assert_eq!(progress(2.0, Some(&scale)), 25.0);
        assert_eq!(progress(10.0, Some(&scale)), 100.0);
    }

    #[test]
    fn test_progress_degenerate_scale() {
        let scale = Thresholds { min: 5.0, max: 5.0 };
        assert_eq!(progress(5.0, Some(&scale)), 0.0);
        assert_eq!(progress(f64::NAN, None), 0.0);
    }
}
