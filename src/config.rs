//! Mailer configuration and the host configuration collaborator
//!
//! A [`MailerConfig`] carries the recognized configuration options of the
//! mailing facility. It can be built in code and handed to
//! [`Mailer::with_config`][crate::Mailer::with_config], or live in the host's
//! own configuration files, in which case the host exposes it through a
//! [`ConfigStore`] and the mailer looks keys up at send time.

use std::{collections::HashMap, time::Duration};

use crate::error::Error;

/// Configuration keys that must be present before a mailer is built.
///
/// Checked in this order; the first missing key is the one reported.
pub(crate) const REQUIRED_KEYS: [&str; 3] = ["smtp_host", "smtp_user", "smtp_pass"];

/// The recognized configuration options of the mail-delivery facility.
///
/// Field defaults mirror the documented defaults of the underlying facility;
/// options without a default are optional. Only `smtp_host`, `smtp_user` and
/// `smtp_pass` are structurally required, and only when the configuration is
/// passed explicitly to the mailer.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MailerConfig {
    /// The mail sending protocol the host routes delivery through.
    pub protocol: Protocol,
    /// The server path to the sendmail binary.
    pub mailpath: String,
    /// SMTP server address.
    pub smtp_host: Option<String>,
    /// SMTP username.
    pub smtp_user: Option<String>,
    /// SMTP password.
    pub smtp_pass: Option<String>,
    /// SMTP port.
    pub smtp_port: u16,
    /// SMTP connection timeout.
    pub smtp_timeout: Duration,
    /// Persistent SMTP connections.
    pub smtp_keepalive: bool,
    /// SMTP encryption.
    pub smtp_crypto: Option<SmtpCrypto>,
    /// Word-wrap the message body.
    pub wordwrap: bool,
    /// Character set of the message.
    pub charset: String,
    /// Email priority, 1 (highest) to 5 (lowest).
    pub priority: u8,
    /// Newline sequence used in the message.
    pub newline: String,
    /// Send Bcc recipients in batches.
    pub bcc_batch_mode: bool,
    /// Number of addresses in each Bcc batch.
    pub bcc_batch_size: usize,
    /// Request delivery status notifications from the server.
    pub dsn: bool,
    /// "From" email address.
    pub from_email: Option<String>,
    /// "From" display name.
    pub from_name: Option<String>,
    /// Prefix concatenated in front of every subject, separator included.
    pub prefix_subject: Option<String>,
}

impl Default for MailerConfig {
    fn default() -> Self {
        Self {
            protocol: Protocol::Mail,
            mailpath: "/usr/sbin/sendmail".to_string(),
            smtp_host: None,
            smtp_user: None,
            smtp_pass: None,
            smtp_port: 25,
            smtp_timeout: Duration::from_secs(5),
            smtp_keepalive: false,
            smtp_crypto: None,
            wordwrap: true,
            charset: "utf-8".to_string(),
            priority: 3,
            newline: "\n".to_string(),
            bcc_batch_mode: false,
            bcc_batch_size: 200,
            dsn: false,
            from_email: None,
            from_name: None,
            prefix_subject: None,
        }
    }
}

impl MailerConfig {
    /// Creates a configuration with the three required SMTP options set and
    /// everything else at its default.
    ///
    /// # Examples
    ///
    /// ```
    /// use postino::MailerConfig;
    ///
    /// let config = MailerConfig {
    ///     smtp_port: 587,
    ///     ..MailerConfig::smtp("smtp.example.com", "user", "secret")
    /// };
    /// assert_eq!(config.smtp_host.as_deref(), Some("smtp.example.com"));
    /// ```
    pub fn smtp(
        host: impl Into<String>,
        user: impl Into<String>,
        pass: impl Into<String>,
    ) -> Self {
        Self {
            smtp_host: Some(host.into()),
            smtp_user: Some(user.into()),
            smtp_pass: Some(pass.into()),
            ..Self::default()
        }
    }

    /// Checks the required options in fixed order, reporting the first one
    /// that is missing.
    pub(crate) fn require_smtp(&self) -> Result<(), Error> {
        let values = [&self.smtp_host, &self.smtp_user, &self.smtp_pass];
        for (key, value) in REQUIRED_KEYS.into_iter().zip(values) {
            if value.is_none() {
                return Err(Error::MissingConfiguration(key));
            }
        }
        Ok(())
    }
}

/// The mail sending protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Protocol {
    /// The platform mail facility, routed through sendmail.
    #[default]
    Mail,
    /// A local sendmail binary.
    Sendmail,
    /// An SMTP server.
    Smtp,
}

/// SMTP encryption mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum SmtpCrypto {
    /// STARTTLS on a plain connection.
    Tls,
    /// Implicit TLS from the first byte.
    Ssl,
}

/// Host-managed configuration lookup.
///
/// The collaborator behind file-based configuration: the host loads its own
/// configuration files and answers key lookups. `None` is the "not found"
/// sentinel, distinguishable from any stored value (including empty strings).
///
/// Implemented for `HashMap<String, String>` so tests and simple hosts can
/// use one directly.
pub trait ConfigStore {
    /// Looks up a configuration item by key.
    fn item(&self, key: &str) -> Option<String>;
}

impl ConfigStore for HashMap<String, String> {
    fn item(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = MailerConfig::default();
        assert_eq!(config.protocol, Protocol::Mail);
        assert_eq!(config.smtp_port, 25);
        assert_eq!(config.smtp_timeout, Duration::from_secs(5));
        assert_eq!(config.charset, "utf-8");
        assert_eq!(config.priority, 3);
        assert_eq!(config.bcc_batch_size, 200);
        assert!(!config.bcc_batch_mode);
        assert!(config.wordwrap);
    }

    #[test]
    fn first_missing_key_is_reported() {
        let err = MailerConfig::default().require_smtp().unwrap_err();
        assert_eq!(err.to_string(), "missing required configuration option smtp_host");

        let err = MailerConfig {
            smtp_host: Some("smtp.example.com".to_string()),
            ..MailerConfig::default()
        }
        .require_smtp()
        .unwrap_err();
        assert_eq!(err.to_string(), "missing required configuration option smtp_user");

        let err = MailerConfig {
            smtp_host: Some("smtp.example.com".to_string()),
            smtp_user: Some("user".to_string()),
            ..MailerConfig::default()
        }
        .require_smtp()
        .unwrap_err();
        assert_eq!(err.to_string(), "missing required configuration option smtp_pass");

        assert!(MailerConfig::smtp("smtp.example.com", "user", "pass")
            .require_smtp()
            .is_ok());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn round_trips_through_serde() {
        let config = MailerConfig {
            smtp_crypto: Some(SmtpCrypto::Tls),
            protocol: Protocol::Smtp,
            ..MailerConfig::smtp("smtp.example.com", "user", "secret")
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: MailerConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn hash_map_store_distinguishes_missing_from_empty() {
        let mut store = HashMap::new();
        store.insert("from_email".to_string(), String::new());

        assert_eq!(store.item("from_email"), Some(String::new()));
        assert_eq!(store.item("from_name"), None);
    }
}
