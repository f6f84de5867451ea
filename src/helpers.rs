use chrono::{DateTime, Local, SecondsFormat, Utc};

/// turn a peer address into something usable inside a file name
///
/// `:` and `.` become `_`, and so does anything else outside `[A-Za-z0-9_-]`
/// (ipv6 brackets, zone separators)
pub fn sanitize_address(addr: &str) -> String {
	addr.chars()
		.map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
		.collect()
}

/// RFC3339 stamp used as prefix of every persisted line
pub fn log_timestamp(at: DateTime<Local>) -> String {
	at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// RFC1123 date, always rendered in GMT
pub fn http_date(at: DateTime<Utc>) -> String {
	at.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}
