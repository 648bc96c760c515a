//! Message fields and the body normalization applied before transport.

use lettre::message::Mailbox;

use crate::MailError;

/// One outbound message as callers supply it. Recipient and cc lists are
/// comma-separated strings; blank entries are skipped.
#[derive(Debug, Clone)]
pub struct OutgoingMail {
    /// Explicit sender; the configured default sender is substituted when
    /// this is `None` or blank.
    pub from: Option<String>,
    pub recipients: String,
    pub cc: String,
    pub subject: String,
    pub body: String,
    /// `true` for an HTML body, `false` for plain text.
    pub html: bool,
}

/// Normalize newline sequences to the CRLF line ending expected by mail
/// transport. Idempotent on already-CRLF input.
pub fn make_lf_crlf(text: &str) -> String {
    text.replace('\n', "\r\n").replace("\r\r\n", "\r\n")
}

/// Replace HTML anchor elements with their inner text.
pub fn strip_links(body: &str) -> String {
    let re = lazy_regex::regex!(r"(?is)<a(?:\s[^>]*)?>(.*?)</a>");
    re.replace_all(body, "$1").into_owned()
}

/// Append a configured domain to addresses written as a bare local part.
/// Addresses that already carry a domain pass through unchanged.
pub fn append_domain(address: &str, domain: &str) -> String {
    if address.is_empty() || address.contains('@') {
        address.to_string()
    } else {
        format!("{address}@{domain}")
    }
}

/// Parse a comma-separated address list, skipping blank entries. When a
/// limit domain is configured it is appended to bare local parts first.
pub(crate) fn parse_address_list(
    raw: &str,
    limit_domain: Option<&str>,
) -> Result<Vec<Mailbox>, MailError> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            let address = match limit_domain {
                Some(domain) => append_domain(s, domain),
                None => s.to_string(),
            };
            address
                .parse::<Mailbox>()
                .map_err(|_| MailError::InvalidAddress(address))
        })
        .collect()
}
