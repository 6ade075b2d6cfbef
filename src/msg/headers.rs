//! RFC 5322 transport-header synthesis
//!
//! MSG files do not need internet headers, but carrying a plausible
//! header block (`PR_TRANSPORT_MESSAGE_HEADERS`) makes the output far
//! more portable across webmail previews and eDiscovery pipelines. The
//! synthesis here is a pure function of its inputs so serialization
//! stays reproducible.

/// A single address for header formatting: (email, display name)
pub type HeaderAddress = (String, String);

/// Format an address as `"Name" <email>`, or bare email without a name
fn format_address(email: &str, name: &str) -> String {
    if name.is_empty() || name == email {
        email.to_string()
    } else {
        format!("\"{}\" <{}>", name, email)
    }
}

/// Build an RFC 5322 header block
///
/// Lines are CRLF-separated and the block ends with a trailing CRLF. The
/// `Cc` line is omitted when there are no carbon-copy recipients.
pub fn format_internet_headers(
    subject: &str,
    sender_email: &str,
    sender_name: &str,
    to: &[HeaderAddress],
    cc: &[HeaderAddress],
    message_id: &str,
    date: chrono::DateTime<chrono::Utc>,
) -> String {
    let mut headers = Vec::new();

    headers.push(format!(
        "Date: {}",
        date.format("%a, %d %b %Y %H:%M:%S +0000")
    ));
    headers.push(format!("From: {}", format_address(sender_email, sender_name)));

    if !to.is_empty() {
        let list: Vec<String> = to.iter().map(|(e, n)| format_address(e, n)).collect();
        headers.push(format!("To: {}", list.join(", ")));
    }
    if !cc.is_empty() {
        let list: Vec<String> = cc.iter().map(|(e, n)| format_address(e, n)).collect();
        headers.push(format!("Cc: {}", list.join(", ")));
    }

    headers.push(format!("Subject: {}", subject));
    headers.push(format!("Message-ID: {}", message_id));
    headers.push("MIME-Version: 1.0".to_string());
    headers.push("Content-Type: text/plain; charset=\"utf-8\"".to_string());
    headers.push("Content-Transfer-Encoding: quoted-printable".to_string());

    headers.join("\r\n") + "\r\n"
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_header_block() {
        let date = chrono::Utc.with_ymd_and_hms(2025, 10, 2, 14, 30, 0).unwrap();
        let headers = format_internet_headers(
            "Status",
            "alice@example.com",
            "Alice",
            &[("bob@example.com".into(), "Bob".into())],
            &[],
            "<msg-1@example.com>",
            date,
        );

        assert!(headers.starts_with("Date: Thu, 02 Oct 2025 14:30:00 +0000\r\n"));
        assert!(headers.contains("From: \"Alice\" <alice@example.com>\r\n"));
        assert!(headers.contains("To: \"Bob\" <bob@example.com>\r\n"));
        assert!(!headers.contains("Cc:"));
        assert!(headers.contains("Subject: Status\r\n"));
        assert!(headers.contains("Message-ID: <msg-1@example.com>\r\n"));
        assert!(headers.ends_with("\r\n"));
    }

    #[test]
    fn test_bare_address_without_name() {
        let date = chrono::Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let headers = format_internet_headers(
            "s",
            "a@x.y",
            "",
            &[("b@x.y".into(), "b@x.y".into())],
            &[],
            "<id>",
            date,
        );

        assert!(headers.contains("From: a@x.y\r\n"));
        assert!(headers.contains("To: b@x.y\r\n"));
    }

    #[test]
    fn test_deterministic() {
        let date = chrono::Utc.with_ymd_and_hms(2025, 5, 5, 5, 5, 5).unwrap();
        let a = format_internet_headers("s", "a@x.y", "A", &[], &[], "<id>", date);
        let b = format_internet_headers("s", "a@x.y", "A", &[], &[], "<id>", date);
        assert_eq!(a, b);
    }
}
