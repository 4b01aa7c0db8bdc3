use time::{Duration, OffsetDateTime};

/// Hourly rate the service applies when the caller does not send one.
pub const DEFAULT_RATE_PER_HOUR: f64 = 10.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FeeEstimate {
    pub duration_hours: f64,
    pub fee: f64,
}

/// Fee charged when a slot is cleared, rounded to cents like the service does.
pub fn estimate_fee(
    parked_at: OffsetDateTime,
    cleared_at: OffsetDateTime,
    rate_per_hour: f64,
) -> FeeEstimate {
    let elapsed = (cleared_at - parked_at).max(Duration::ZERO);
    let duration_hours = elapsed.as_seconds_f64() / 3600.0;
    FeeEstimate {
        duration_hours,
        fee: round_cents(duration_hours * rate_per_hour),
    }
}

/// Outcome of a clear request as reported by the service.
#[derive(Clone, Debug, PartialEq)]
pub struct ClearReceipt {
    pub slot_id: u32,
    pub parked_time: Option<OffsetDateTime>,
    pub cleared_time: Option<OffsetDateTime>,
    pub duration_hours: f64,
    pub fee: f64,
}

pub fn format_duration(hours: f64) -> String {
    let minutes = (hours * 60.0).round().max(0.0) as u64;
    if minutes < 60 {
        format!("{minutes}m")
    } else {
        format!("{}h {:02}m", minutes / 60, minutes % 60)
    }
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::*;

    #[test]
    fn ninety_minutes_at_default_rate() {
        let parked = datetime!(2024-05-01 10:00 UTC);
        let cleared = datetime!(2024-05-01 11:30 UTC);
        let estimate = estimate_fee(parked, cleared, DEFAULT_RATE_PER_HOUR);
        assert!((estimate.duration_hours - 1.5).abs() < 1e-9);
        assert!((estimate.fee - 15.0).abs() < 1e-9);
    }

    #[test]
    fn fee_is_rounded_to_cents() {
        let parked = datetime!(2024-05-01 10:00 UTC);
        let cleared = datetime!(2024-05-01 10:07 UTC);
        let estimate = estimate_fee(parked, cleared, DEFAULT_RATE_PER_HOUR);
        assert!((estimate.fee - 1.17).abs() < 1e-9);
    }

    #[test]
    fn clock_skew_never_produces_a_negative_fee() {
        let parked = datetime!(2024-05-01 12:00 UTC);
        let cleared = datetime!(2024-05-01 11:00 UTC);
        let estimate = estimate_fee(parked, cleared, DEFAULT_RATE_PER_HOUR);
        assert_eq!(estimate.duration_hours, 0.0);
        assert_eq!(estimate.fee, 0.0);
    }

    #[test]
    fn durations_render_compactly() {
        assert_eq!(format_duration(0.25), "15m");
        assert_eq!(format_duration(2.5), "2h 30m");
        assert_eq!(format_duration(-1.0), "0m");
    }
}
