use std::env;

use crate::MailError;

/// Transport security for the relay connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionMode {
    /// Plain connection, no TLS.
    None,
    /// Plain connection upgraded via STARTTLS.
    StartTls,
    /// TLS from the first byte.
    Tls,
}

#[derive(Debug, Clone)]
pub struct MailerConfig {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub mode: ConnectionMode,
    /// Default sender, substituted when a message carries no explicit from.
    pub from: String,
    /// Envelope sender (Return-Path), when distinct from the From header.
    pub return_path: Option<String>,
    /// Strip HTML anchors from message bodies before sending.
    pub strip_links: bool,
    /// Domain appended to addresses given as a bare local part.
    pub limit_domain: Option<String>,
}

impl MailerConfig {
    /// Load mailer settings from environment variables.
    ///
    /// A missing `SMTP_HOST` aborts early with a descriptive error:
    /// without an outbound mail host there is nothing to configure.
    pub fn from_env() -> Result<Self, MailError> {
        let host = non_blank_var("SMTP_HOST").ok_or_else(|| {
            MailError::MissingConfig(
                "SMTP_HOST is not set; outbound mail is unavailable".to_string(),
            )
        })?;

        let port = match non_blank_var("SMTP_PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|_| MailError::InvalidConfig(format!("SMTP_PORT is not a valid port: '{raw}'")))?,
            None => 25,
        };

        let username = non_blank_var("SMTP_USERNAME");
        let password = non_blank_var("SMTP_PASSWORD");

        let mode = non_blank_var("SMTP_CONNECTION_MODE").map(|v| v.to_ascii_lowercase());
        let mode = match mode.as_deref() {
            None | Some("none") => ConnectionMode::None,
            Some("starttls") => ConnectionMode::StartTls,
            Some("tls") | Some("ssl") => ConnectionMode::Tls,
            Some(other) => {
                return Err(MailError::InvalidConfig(format!(
                    "unknown SMTP_CONNECTION_MODE: '{other}'"
                )))
            }
        };

        let from = non_blank_var("MAIL_FROM").ok_or_else(|| {
            MailError::MissingConfig("MAIL_FROM is not set; no default sender".to_string())
        })?;

        let return_path = non_blank_var("MAIL_RETURN_PATH");

        let strip_links = non_blank_var("MAIL_STRIP_LINKS").map(|v| v.to_ascii_lowercase());
        let strip_links = !matches!(strip_links.as_deref(), Some("0") | Some("false") | Some("no"));

        let limit_domain = non_blank_var("MAIL_LIMIT_DOMAIN");

        Ok(MailerConfig {
            host,
            port,
            username,
            password,
            mode,
            from,
            return_path,
            strip_links,
            limit_domain,
        })
    }
}

fn non_blank_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
