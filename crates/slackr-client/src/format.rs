use chrono::{DateTime, Local, Utc};

/// "Just now", "N minute(s) ago", "N hour(s) ago", or date and time for
/// anything a day or older.
pub fn relative_time(at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(at);

    if elapsed.num_seconds() < 60 {
        return "Just now".to_string();
    }

    let minutes = elapsed.num_minutes();
    if minutes < 60 {
        return format!("{} minute{} ago", minutes, plural(minutes));
    }

    let hours = elapsed.num_hours();
    if hours < 24 {
        return format!("{} hour{} ago", hours, plural(hours));
    }

    date_time(at)
}

pub fn date_time(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}

pub fn date(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%Y-%m-%d").to_string()
}

/// Upper-cased first letter of a name, `?` when blank.
pub fn avatar_initial(name: &str) -> char {
    name.trim()
        .chars()
        .next()
        .and_then(|c| c.to_uppercase().next())
        .unwrap_or('?')
}

fn plural(n: i64) -> &'static str {
    if n == 1 { "" } else { "s" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn relative_buckets() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        assert_eq!(relative_time(now - Duration::seconds(30), now), "Just now");
        assert_eq!(relative_time(now - Duration::minutes(1), now), "1 minute ago");
        assert_eq!(relative_time(now - Duration::minutes(59), now), "59 minutes ago");
        assert_eq!(relative_time(now - Duration::hours(1), now), "1 hour ago");
        assert_eq!(relative_time(now - Duration::hours(23), now), "23 hours ago");
    }

    #[test]
    fn old_messages_show_date() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let at = now - Duration::days(3);
        assert_eq!(relative_time(at, now), date_time(at));
    }

    #[test]
    fn future_timestamps_read_as_just_now() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        assert_eq!(relative_time(now + Duration::minutes(5), now), "Just now");
    }

    #[test]
    fn initial_is_uppercased() {
        assert_eq!(avatar_initial("ada"), 'A');
        assert_eq!(avatar_initial("  "), '?');
    }
}
