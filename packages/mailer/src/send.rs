use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use tracing::{debug, info};

use crate::config::{ConnectionMode, MailerConfig};
use crate::message::{append_domain, make_lf_crlf, parse_address_list, strip_links, OutgoingMail};
use crate::MailError;

/// Owns the SMTP transport for the lifetime of its user.
///
/// The transport pools its relay connection, so one `Mailer` reuses a
/// single kept-alive connection across sends; dropping the mailer closes
/// it. There is no process-wide mailer handle.
pub struct Mailer {
    config: MailerConfig,
    transport: SmtpTransport,
}

impl Mailer {
    pub fn from_env() -> Result<Self, MailError> {
        Self::new(MailerConfig::from_env()?)
    }

    pub fn new(config: MailerConfig) -> Result<Self, MailError> {
        let builder = match config.mode {
            ConnectionMode::None => SmtpTransport::builder_dangerous(&config.host),
            ConnectionMode::StartTls => SmtpTransport::starttls_relay(&config.host)
                .map_err(|e| MailError::Smtp(e.to_string()))?,
            ConnectionMode::Tls => {
                SmtpTransport::relay(&config.host).map_err(|e| MailError::Smtp(e.to_string()))?
            }
        };

        let mut builder = builder.port(config.port);
        if let Some(username) = &config.username {
            builder = builder.credentials(Credentials::new(
                username.clone(),
                config.password.clone().unwrap_or_default(),
            ));
        }

        Ok(Mailer {
            transport: builder.build(),
            config,
        })
    }

    /// Send one message; the error carries the transport's failure reason.
    pub fn send(&self, mail: &OutgoingMail) -> Result<(), MailError> {
        let message = self.build_message(mail)?;
        debug!("mail_send to={}", mail.recipients);
        self.transport
            .send(&message)
            .map_err(|e| MailError::Smtp(e.to_string()))?;
        info!("mail_send=ok subject={:?}", mail.subject.trim());
        Ok(())
    }

    fn build_message(&self, mail: &OutgoingMail) -> Result<Message, MailError> {
        let limit_domain = self.config.limit_domain.as_deref();

        let from = match mail.from.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(explicit) => explicit,
            None => self.config.from.as_str(),
        };
        let from = match limit_domain {
            Some(domain) => append_domain(from, domain),
            None => from.to_string(),
        };
        let from: Mailbox = from
            .parse()
            .map_err(|_| MailError::InvalidAddress(from.clone()))?;

        let recipients = parse_address_list(&mail.recipients, limit_domain)?;
        if recipients.is_empty() {
            return Err(MailError::Build("no recipients given".to_string()));
        }
        let cc_list = parse_address_list(&mail.cc, limit_domain)?;

        let mut builder = Message::builder().from(from).subject(mail.subject.trim());
        if let Some(return_path) = &self.config.return_path {
            let sender: Mailbox = return_path
                .parse()
                .map_err(|_| MailError::InvalidAddress(return_path.clone()))?;
            builder = builder.sender(sender);
        }
        for to in recipients {
            builder = builder.to(to);
        }
        for cc in cc_list {
            builder = builder.cc(cc);
        }

        let mut body = mail.body.trim().to_string();
        if self.config.strip_links {
            body = strip_links(&body);
        }
        let body = make_lf_crlf(&body);

        let content_type = if mail.html {
            ContentType::TEXT_HTML
        } else {
            ContentType::TEXT_PLAIN
        };

        builder
            .header(content_type)
            .body(body)
            .map_err(|e| MailError::Build(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> MailerConfig {
        MailerConfig {
            host: "mail.example.com".to_string(),
            port: 25,
            username: None,
            password: None,
            mode: ConnectionMode::None,
            from: "testdeck@example.com".to_string(),
            return_path: None,
            strip_links: true,
            limit_domain: None,
        }
    }

    fn plain_mail() -> OutgoingMail {
        OutgoingMail {
            from: None,
            recipients: "dev@example.com".to_string(),
            cc: String::new(),
            subject: "Build report".to_string(),
            body: "all green\nsee details".to_string(),
            html: false,
        }
    }

    fn rendered(config: MailerConfig, mail: &OutgoingMail) -> String {
        let mailer = Mailer::new(config).unwrap();
        let message = mailer.build_message(mail).unwrap();
        String::from_utf8(message.formatted()).unwrap()
    }

    #[test]
    fn default_sender_is_substituted() {
        let out = rendered(test_config(), &plain_mail());
        assert!(out.contains("From: testdeck@example.com"));
    }

    #[test]
    fn explicit_sender_wins() {
        let mut mail = plain_mail();
        mail.from = Some("qa-lead@example.com".to_string());
        let out = rendered(test_config(), &mail);
        assert!(out.contains("From: qa-lead@example.com"));
    }

    #[test]
    fn blank_sender_falls_back_to_default() {
        let mut mail = plain_mail();
        mail.from = Some("   ".to_string());
        let out = rendered(test_config(), &mail);
        assert!(out.contains("From: testdeck@example.com"));
    }

    #[test]
    fn recipients_and_cc_are_split_on_commas() {
        let mut mail = plain_mail();
        mail.recipients = "a@example.com, b@example.com".to_string();
        mail.cc = "lead@example.com".to_string();
        let out = rendered(test_config(), &mail);
        assert!(out.contains("To: a@example.com, b@example.com"));
        assert!(out.contains("Cc: lead@example.com"));
    }

    #[test]
    fn no_recipients_is_a_build_error() {
        let mailer = Mailer::new(test_config()).unwrap();
        let mut mail = plain_mail();
        mail.recipients = " , ".to_string();
        assert!(matches!(
            mailer.build_message(&mail),
            Err(MailError::Build(_))
        ));
    }

    #[test]
    fn limit_domain_completes_bare_addresses() {
        let mut config = test_config();
        config.limit_domain = Some("example.com".to_string());
        let mut mail = plain_mail();
        mail.recipients = "qa, lead@other.org".to_string();
        mail.cc = "dev".to_string();

        let out = rendered(config, &mail);
        assert!(out.contains("To: qa@example.com, lead@other.org"));
        assert!(out.contains("Cc: dev@example.com"));
    }

    #[test]
    fn return_path_sets_sender_header() {
        let mut config = test_config();
        config.return_path = Some("bounces@example.com".to_string());
        let out = rendered(config, &plain_mail());
        assert!(out.contains("Sender: bounces@example.com"));
    }

    #[test]
    fn html_flag_selects_content_type() {
        let mut mail = plain_mail();
        mail.html = true;
        mail.body = "<p>all green</p>".to_string();
        let out = rendered(test_config(), &mail);
        assert!(out.contains("Content-Type: text/html"));

        let out = rendered(test_config(), &plain_mail());
        assert!(out.contains("Content-Type: text/plain"));
    }

    #[test]
    fn links_are_stripped_when_configured() {
        let mut mail = plain_mail();
        mail.body = r#"result: <a href="http://ci.example.com/1">log</a>"#.to_string();

        let mailer = Mailer::new(test_config()).unwrap();
        let message = mailer.build_message(&mail).unwrap();
        let out = String::from_utf8(message.formatted()).unwrap();
        assert!(!out.contains("ci.example.com"));

        let mut config = test_config();
        config.strip_links = false;
        let mailer = Mailer::new(config).unwrap();
        let message = mailer.build_message(&mail).unwrap();
        let out = String::from_utf8(message.formatted()).unwrap();
        assert!(out.contains("ci.example.com"));
    }
}
