//! Human-readable uptime in the style of `uptime -p`.

const MINUTE: u64 = 60;
const HOUR: u64 = 60 * MINUTE;
const DAY: u64 = 24 * HOUR;
const WEEK: u64 = 7 * DAY;

fn unit(n: u64, singular: &str) -> String {
    if n == 1 {
        format!("1 {}", singular)
    } else {
        format!("{} {}s", n, singular)
    }
}

/// Formats seconds as `up 2 weeks, 1 day, 3 hours, 1 minute`, omitting zero units.
pub fn format_pretty(secs: u64) -> String {
    let weeks = secs / WEEK;
    let days = (secs % WEEK) / DAY;
    let hours = (secs % DAY) / HOUR;
    let minutes = (secs % HOUR) / MINUTE;

    let parts: Vec<String> = [
        (weeks, "week"),
        (days, "day"),
        (hours, "hour"),
        (minutes, "minute"),
    ]
    .iter()
    .filter(|(n, _)| *n > 0)
    .map(|(n, name)| unit(*n, name))
    .collect();

    if parts.is_empty() {
        "up 0 minutes".to_string()
    } else {
        format!("up {}", parts.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, "up 0 minutes")]
    #[case(59, "up 0 minutes")]
    #[case(60, "up 1 minute")]
    #[case(3 * HOUR + 5 * MINUTE, "up 3 hours, 5 minutes")]
    #[case(DAY, "up 1 day")]
    #[case(WEEK + 2 * DAY + HOUR + 61, "up 1 week, 2 days, 1 hour, 1 minute")]
    #[case(3 * WEEK, "up 3 weeks")]
    fn test_format_pretty(#[case] secs: u64, #[case] expected: &str) {
        assert_eq!(format_pretty(secs), expected);
    }
}
