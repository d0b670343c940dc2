use chrono::{DateTime, Duration, Utc};

const LABEL_FORMAT: &str = "%H%M";

/// Clock time tick labels for the three latency panels, relative to `generated_at`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AxisLabels {
    /// Seven labels, ten minutes apart, ending now
    pub detail: Vec<String>,
    /// Seven labels, five minutes apart, ending now
    pub stability: Vec<String>,
    /// Twenty six labels spread evenly over the last hour
    pub long: Vec<String>,
    pub generated_at: DateTime<Utc>,
}

pub fn axis_labels(now: DateTime<Utc>) -> AxisLabels {
    let hour_ago = now - Duration::minutes(60);
    let half_hour_ago = now - Duration::minutes(30);

    let series = |start: DateTime<Utc>, count: i64, step: Duration| -> Vec<String> {
        (0..count)
            .map(|i| (start + step * i as i32).format(LABEL_FORMAT).to_string())
            .collect()
    };

    AxisLabels {
        detail: series(hour_ago, 7, Duration::minutes(10)),
        stability: series(half_hour_ago, 7, Duration::minutes(5)),
        // 60 / 25 minutes
        long: series(hour_ago, 26, Duration::seconds(144)),
        generated_at: now,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    #[test]
    fn labels_end_at_now() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let labels = axis_labels(now);

        assert_eq!(
            labels.detail,
            vec!["1100", "1110", "1120", "1130", "1140", "1150", "1200"]
        );
        assert_eq!(
            labels.stability,
            vec!["1130", "1135", "1140", "1145", "1150", "1155", "1200"]
        );
        assert_eq!(labels.long.len(), 26);
        assert_eq!(labels.long.first().map(String::as_str), Some("1100"));
        assert_eq!(labels.long[5], "1112");
        assert_eq!(labels.long.last().map(String::as_str), Some("1200"));
    }

    #[test]
    fn labels_wrap_past_midnight() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 0, 20, 0).unwrap();

        assert_eq!(axis_labels(now).detail[0], "2320");
    }
}
