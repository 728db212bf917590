use chrono::{DateTime, Datelike, Utc};

/// Korean-style count abbreviation: plain comma-grouped digits below 만
/// (10,000), then 만 and 억 units with one decimal place, trailing ".0"
/// stripped.
///
/// `format_number(1234)` → "1,234", `format_number(12345)` → "1.2만",
/// `format_number(123456789)` → "1.2억".
pub fn format_number(n: i64) -> String {
    if n < 10_000 {
        group_digits(n)
    } else if n < 100_000_000 {
        format!("{}만", one_decimal(n as f64 / 10_000.0))
    } else {
        format!("{}억", one_decimal(n as f64 / 100_000_000.0))
    }
}

/// Western variant: raw digits below 1,000, then K and M with one decimal
/// place, trailing ".0" stripped.
pub fn format_number_compact(n: i64) -> String {
    if n < 1_000 {
        n.to_string()
    } else if n < 1_000_000 {
        format!("{}K", one_decimal(n as f64 / 1_000.0))
    } else {
        format!("{}M", one_decimal(n as f64 / 1_000_000.0))
    }
}

/// Relative timestamp, Korean register, same thresholds as the feed UI.
pub fn format_relative_time(t: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - t).num_seconds().max(0);

    if seconds < 60 {
        "방금 전".to_string()
    } else if seconds < 3_600 {
        format!("{}분 전", seconds / 60)
    } else if seconds < 86_400 {
        format!("{}시간 전", seconds / 3_600)
    } else if seconds < 604_800 {
        format!("{}일 전", seconds / 86_400)
    } else if seconds < 2_592_000 {
        format!("{}주 전", seconds / 604_800)
    } else if seconds < 31_536_000 {
        format!("{}개월 전", seconds / 2_592_000)
    } else {
        format!("{}년 전", seconds / 31_536_000)
    }
}

/// "2024년 1월 1일" style date.
pub fn format_date(t: DateTime<Utc>) -> String {
    format!("{}년 {}월 {}일", t.year(), t.month(), t.day())
}

fn group_digits(n: i64) -> String {
    let digits = n.abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if n < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

fn one_decimal(v: f64) -> String {
    let s = format!("{:.1}", v);
    s.strip_suffix(".0").map(str::to_string).unwrap_or(s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_format_number_below_threshold() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1234), "1,234");
        assert_eq!(format_number(9999), "9,999");
    }

    #[test]
    fn test_format_number_man_unit() {
        assert_eq!(format_number(10_000), "1만");
        assert_eq!(format_number(12_345), "1.2만");
        assert_eq!(format_number(99_999_999), "10000만");
    }

    #[test]
    fn test_format_number_eok_unit() {
        assert_eq!(format_number(100_000_000), "1억");
        assert_eq!(format_number(123_456_789), "1.2억");
    }

    #[test]
    fn test_format_number_compact() {
        assert_eq!(format_number_compact(999), "999");
        assert_eq!(format_number_compact(1_000), "1K");
        assert_eq!(format_number_compact(12_345), "12.3K");
        assert_eq!(format_number_compact(3_400_000), "3.4M");
    }

    #[test]
    fn test_relative_time_buckets() {
        let now = Utc::now();
        assert_eq!(format_relative_time(now, now), "방금 전");
        assert_eq!(
            format_relative_time(now - Duration::seconds(59), now),
            "방금 전"
        );
        assert_eq!(
            format_relative_time(now - Duration::minutes(5), now),
            "5분 전"
        );
        assert_eq!(
            format_relative_time(now - Duration::hours(3), now),
            "3시간 전"
        );
        assert_eq!(format_relative_time(now - Duration::days(3), now), "3일 전");
        assert_eq!(
            format_relative_time(now - Duration::weeks(2), now),
            "2주 전"
        );
        assert_eq!(
            format_relative_time(now - Duration::days(90), now),
            "3개월 전"
        );
        assert_eq!(
            format_relative_time(now - Duration::days(800), now),
            "2년 전"
        );
    }

    #[test]
    fn test_relative_time_future_clamps() {
        let now = Utc::now();
        assert_eq!(
            format_relative_time(now + Duration::minutes(10), now),
            "방금 전"
        );
    }

    #[test]
    fn test_format_date() {
        let t = DateTime::parse_from_rfc3339("2024-01-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(format_date(t), "2024년 1월 1일");
    }
}
