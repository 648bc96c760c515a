//! Outbound email for Testdeck.
//!
//! A thin wrapper over [lettre](https://lettre.rs): maps application
//! configuration into SMTP transport settings, normalizes message bodies
//! for mail transport, and sends through a single owned, kept-alive relay
//! connection.
//!
//! # Environment Variables
//!
//! [`MailerConfig::from_env`] reads:
//!
//! | Variable | Required | Description |
//! |----------|----------|-------------|
//! | `SMTP_HOST` | Yes | SMTP server hostname |
//! | `SMTP_PORT` | No | Port (default: 25) |
//! | `SMTP_USERNAME` | No | Username; auth is enabled only when set |
//! | `SMTP_PASSWORD` | No | Password for authentication |
//! | `SMTP_CONNECTION_MODE` | No | `none` (default), `starttls`, or `tls` |
//! | `MAIL_FROM` | Yes | Default sender address |
//! | `MAIL_RETURN_PATH` | No | Envelope sender (Return-Path) |
//! | `MAIL_STRIP_LINKS` | No | Strip HTML anchors from bodies (default: true) |
//! | `MAIL_LIMIT_DOMAIN` | No | Domain appended to bare local-part addresses |

pub mod config;
pub mod message;
pub mod send;

pub use config::{ConnectionMode, MailerConfig};
pub use message::{append_domain, make_lf_crlf, strip_links, OutgoingMail};
pub use send::Mailer;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("missing required config: {0}")]
    MissingConfig(String),

    #[error("invalid config value: {0}")]
    InvalidConfig(String),

    #[error("invalid email address: {0}")]
    InvalidAddress(String),

    #[error("failed to build message: {0}")]
    Build(String),

    #[error("SMTP error: {0}")]
    Smtp(String),
}
