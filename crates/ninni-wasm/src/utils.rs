use chrono::{DateTime, Local, TimeZone, Utc};

/// Join the configured API base with an endpoint path
pub fn api_url(api_base: &str, path: &str) -> String {
    format!("{}{}", api_base.trim_end_matches('/'), path)
}

/// Format timestamp as local `HH:MM`
pub fn format_time(timestamp: DateTime<Utc>) -> String {
    format_clock(timestamp, &Local)
}

fn format_clock<Tz: TimeZone>(timestamp: DateTime<Utc>, zone: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    timestamp.with_timezone(zone).format("%H:%M").to_string()
}

/// Escape HTML to prevent XSS
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    #[test]
    fn api_url_handles_empty_and_trailing_slash() {
        assert_eq!(api_url("", "/api/chat"), "/api/chat");
        assert_eq!(api_url("http://localhost:3001/", "/api/chat"), "http://localhost:3001/api/chat");
    }

    #[test]
    fn clock_uses_the_given_zone() {
        let ts = Utc.with_ymd_and_hms(2024, 5, 1, 21, 5, 0).unwrap();
        let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();
        assert_eq!(format_clock(ts, &plus_two), "23:05");
        assert_eq!(format_clock(ts, &Utc), "21:05");
    }

    #[test]
    fn escape_html_neutralizes_markup() {
        assert_eq!(
            escape_html(r#"<img src="x" onerror='a&b'>"#),
            "&lt;img src=&quot;x&quot; onerror=&#39;a&amp;b&#39;&gt;"
        );
    }
}
