use chrono::{DateTime, TimeDelta, Utc};
use serenity::all::Timestamp;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeltaFormat {
    /// `D d, H h, M m, and S s`, days omitted when zero
    Verbose,
    /// `H:M:S`, prefixed with `Ddays, ` when at least a day long
    Brief,
}

/// Render a duration for display. Negative durations are shown as zero.
pub fn format_delta(delta: TimeDelta, format: DeltaFormat) -> String {
    let total = delta.num_seconds().max(0);

    let (hours, remainder) = (total / 3600, total % 3600);
    let (minutes, seconds) = (remainder / 60, remainder % 60);
    let (days, hours) = (hours / 24, hours % 24);

    match format {
        DeltaFormat::Verbose if days > 0 => {
            format!("{days} d, {hours} h, {minutes} m, and {seconds} s")
        }
        DeltaFormat::Verbose => format!("{hours} h, {minutes} m, and {seconds} s"),
        DeltaFormat::Brief if days > 0 => format!("{days}days, {hours}:{minutes}:{seconds}"),
        DeltaFormat::Brief => format!("{hours}:{minutes}:{seconds}"),
    }
}

/// Convert a Discord timestamp to UTC, truncated to whole seconds.
pub fn to_utc(timestamp: Timestamp) -> DateTime<Utc> {
    DateTime::from_timestamp(timestamp.unix_timestamp(), 0).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn verbose_omits_zero_days() {
        let delta = TimeDelta::seconds(3 * 3600 + 4 * 60 + 5);
        assert_eq!(format_delta(delta, DeltaFormat::Verbose), "3 h, 4 m, and 5 s");
    }

    #[test]
    fn verbose_with_days() {
        let delta = TimeDelta::days(2) + TimeDelta::seconds(61);
        assert_eq!(format_delta(delta, DeltaFormat::Verbose), "2 d, 0 h, 1 m, and 1 s");
    }

    #[test]
    fn brief_is_unpadded() {
        let delta = TimeDelta::seconds(3 * 60 + 7);
        assert_eq!(format_delta(delta, DeltaFormat::Brief), "0:3:7");
    }

    #[test]
    fn brief_day_prefix_only_from_one_day() {
        let just_under = TimeDelta::days(1) - TimeDelta::seconds(1);
        assert_eq!(format_delta(just_under, DeltaFormat::Brief), "23:59:59");
        assert_eq!(
            format_delta(TimeDelta::days(1), DeltaFormat::Brief),
            "1days, 0:0:0"
        );
    }

    #[test]
    fn brief_components_grow_with_duration() {
        let parse = |s: String| -> (i64, i64, i64) {
            let parts: Vec<i64> = s.split(':').map(|p| p.parse().unwrap()).collect();
            (parts[0], parts[1], parts[2])
        };

        let mut previous = (0, 0, 0);
        for seconds in (0..86_400).step_by(97) {
            let current = parse(format_delta(TimeDelta::seconds(seconds), DeltaFormat::Brief));
            assert!(current >= previous, "{current:?} < {previous:?}");
            previous = current;
        }
    }

    #[test]
    fn negative_is_zero() {
        assert_eq!(
            format_delta(TimeDelta::seconds(-30), DeltaFormat::Verbose),
            "0 h, 0 m, and 0 s"
        );
    }

    #[test]
    fn discord_timestamp_to_utc() {
        let timestamp = Timestamp::from_unix_timestamp(1_700_000_000).unwrap();
        assert_eq!(to_utc(timestamp).timestamp(), 1_700_000_000);
    }
}
