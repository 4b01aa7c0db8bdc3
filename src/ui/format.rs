use std::time::SystemTime;

use time::{format_description::FormatItem, macros::format_description, OffsetDateTime, UtcOffset};

const DISPLAY_FORMAT: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]");

pub fn humanize_age(updated_at: SystemTime) -> String {
    let age = SystemTime::now()
        .duration_since(updated_at)
        .unwrap_or_default()
        .as_secs();
    if age < 60 {
        format!("{age}s ago")
    } else if age < 3_600 {
        format!("{}m ago", age / 60)
    } else if age < 86_400 {
        format!("{}h ago", age / 3_600)
    } else {
        format!("{}d ago", age / 86_400)
    }
}

/// Renders in the machine's local offset when it can be determined, else UTC.
pub fn timestamp(value: OffsetDateTime) -> String {
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    format_in(value, offset)
}

pub fn optional_timestamp(value: Option<OffsetDateTime>) -> String {
    value.map(timestamp).unwrap_or_else(|| "n/a".to_string())
}

pub fn money(amount: f64) -> String {
    format!("{amount:.2}")
}

fn format_in(value: OffsetDateTime, offset: UtcOffset) -> String {
    value
        .to_offset(offset)
        .format(DISPLAY_FORMAT)
        .unwrap_or_else(|_| value.to_string())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use time::macros::{datetime, offset};

    use super::*;

    #[test]
    fn ages_use_the_largest_unit() {
        let now = SystemTime::now();
        assert_eq!(humanize_age(now - Duration::from_secs(90)), "1m ago");
        assert_eq!(humanize_age(now - Duration::from_secs(7_200)), "2h ago");
        assert_eq!(humanize_age(now + Duration::from_secs(30)), "0s ago");
    }

    #[test]
    fn timestamps_shift_into_the_display_offset() {
        let value = datetime!(2024-05-01 10:20:30 UTC);
        assert_eq!(format_in(value, UtcOffset::UTC), "2024-05-01 10:20");
        assert_eq!(format_in(value, offset!(+5:30)), "2024-05-01 15:50");
    }

    #[test]
    fn money_keeps_two_decimals() {
        assert_eq!(money(15.0), "15.00");
        assert_eq!(money(0.166), "0.17");
    }
}
