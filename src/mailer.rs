//! The mailer: fluent composition, validation and one-shot delegation

use std::fmt;

use crate::{
    address::Address,
    attachment::Attachment,
    config::{ConfigStore, MailerConfig, REQUIRED_KEYS},
    error::Error,
    transport::Transport,
};

/// Where a mailer's settings come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSource {
    /// An explicit [`MailerConfig`] captured at construction.
    Explicit,
    /// A host [`ConfigStore`], consulted at send time.
    Store,
}

enum Source {
    Explicit {
        from_email: Option<String>,
        from_name: Option<String>,
        prefix_subject: Option<String>,
    },
    Store(Box<dyn ConfigStore>),
}

/// Composes a mail message and delegates delivery to a transport.
///
/// A `Mailer` accumulates recipients, subject, bodies and attachments, then
/// pushes the composed message to its [`Transport`] in one [`send`] call.
/// Recipients are validated, trimmed and lower-cased as they are added; the
/// subject is delivered with the configured prefix concatenated in front of
/// it, separator included.
///
/// [`send`]: Mailer::send
///
/// # Examples
///
/// ```
/// use postino::transport::stub::StubTransport;
/// use postino::{Mailer, MailerConfig};
///
/// let config = MailerConfig {
///     from_email: Some("noreply@example.com".into()),
///     from_name: Some("My App".into()),
///     prefix_subject: Some("MyApp - ".into()),
///     ..MailerConfig::smtp("smtp.example.com", "user", "secret")
/// };
///
/// let mut mailer = Mailer::with_config(StubTransport::new_positive(), config)?;
/// mailer
///     .to("User@Example.COM")?
///     .subject("First activation")
///     .message("Welcome!");
///
/// assert!(mailer.send()?);
/// assert!(mailer.is_sent());
///
/// let delivered = mailer.transport().last_message().unwrap();
/// assert_eq!(delivered.to, ["user@example.com"]);
/// assert_eq!(delivered.subject, "MyApp - First activation");
/// # Ok::<(), postino::Error>(())
/// ```
pub struct Mailer<T: Transport> {
    transport: T,
    source: Source,
    tos: Vec<Address>,
    ccs: Vec<Address>,
    bccs: Vec<Address>,
    subject: String,
    message: String,
    alt_message: String,
    attachments: Vec<Attachment>,
    is_sent: bool,
}

impl<T: Transport> Mailer<T> {
    /// Creates a mailer from an explicit configuration.
    ///
    /// `smtp_host`, `smtp_user` and `smtp_pass` must be present; the first
    /// missing one is reported. The transport is initialized with the full
    /// configuration, and `from_name` (trimmed), `from_email` (trimmed,
    /// lower-cased) and `prefix_subject` are captured now, when present and
    /// non-blank.
    pub fn with_config(mut transport: T, config: MailerConfig) -> Result<Self, Error> {
        config.require_smtp()?;
        transport.initialize(&config);

        let source = Source::Explicit {
            from_email: non_blank(config.from_email.as_deref())
                .map(|email| email.to_lowercase()),
            from_name: non_blank(config.from_name.as_deref()).map(String::from),
            // Kept verbatim: the prefix carries its own separator.
            prefix_subject: config
                .prefix_subject
                .as_deref()
                .filter(|prefix| !prefix.trim().is_empty())
                .map(String::from),
        };

        Ok(Self::from_parts(transport, source))
    }

    /// Creates a mailer backed by the host's configuration store.
    ///
    /// The same three required keys must resolve through the store (a `None`
    /// lookup fails, naming the key). From-address and subject-prefix are
    /// *not* captured here: they are looked up at send time. The transport is
    /// expected to have been initialized by the host already.
    pub fn with_store(transport: T, store: impl ConfigStore + 'static) -> Result<Self, Error> {
        for key in REQUIRED_KEYS {
            if store.item(key).is_none() {
                return Err(Error::MissingConfiguration(key));
            }
        }

        Ok(Self::from_parts(transport, Source::Store(Box::new(store))))
    }

    fn from_parts(transport: T, source: Source) -> Self {
        Self {
            transport,
            source,
            tos: Vec::new(),
            ccs: Vec::new(),
            bccs: Vec::new(),
            subject: String::new(),
            message: String::new(),
            alt_message: String::new(),
            attachments: Vec::new(),
            is_sent: false,
        }
    }

    /// Adds one or more destination addresses.
    ///
    /// `input` is a single address or a comma-delimited list; every candidate
    /// is trimmed, lower-cased and validated. On a multi-address input,
    /// entries validated before a failing one remain added.
    pub fn to(&mut self, input: &str) -> Result<&mut Self, Error> {
        push_addresses(input, &mut self.tos)?;
        Ok(self)
    }

    /// Adds destination addresses from a list of inputs, each handled as in
    /// [`to`](Mailer::to).
    pub fn to_many<I, S>(&mut self, inputs: I) -> Result<&mut Self, Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for input in inputs {
            push_addresses(input.as_ref(), &mut self.tos)?;
        }
        Ok(self)
    }

    /// Adds one or more carbon-copy addresses.
    pub fn cc(&mut self, input: &str) -> Result<&mut Self, Error> {
        push_addresses(input, &mut self.ccs)?;
        Ok(self)
    }

    /// Adds carbon-copy addresses from a list of inputs.
    pub fn cc_many<I, S>(&mut self, inputs: I) -> Result<&mut Self, Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for input in inputs {
            push_addresses(input.as_ref(), &mut self.ccs)?;
        }
        Ok(self)
    }

    /// Adds one or more blind-carbon-copy addresses.
    pub fn bcc(&mut self, input: &str) -> Result<&mut Self, Error> {
        push_addresses(input, &mut self.bccs)?;
        Ok(self)
    }

    /// Adds blind-carbon-copy addresses from a list of inputs.
    pub fn bcc_many<I, S>(&mut self, inputs: I) -> Result<&mut Self, Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for input in inputs {
            push_addresses(input.as_ref(), &mut self.bccs)?;
        }
        Ok(self)
    }

    /// Sets the subject, trimmed.
    pub fn subject(&mut self, subject: &str) -> &mut Self {
        self.subject = subject.trim().to_string();
        self
    }

    /// Sets the message body.
    pub fn message(&mut self, message: &str) -> &mut Self {
        self.message = message.to_string();
        self
    }

    /// Sets the alternative message body. A blank value is not delivered.
    pub fn alt_message(&mut self, message: &str) -> &mut Self {
        self.alt_message = message.to_string();
        self
    }

    /// Stages an attachment.
    pub fn attach(&mut self, attachment: Attachment) -> &mut Self {
        self.attachments.push(attachment);
        self
    }

    /// Stages several attachments in order.
    pub fn attach_many(&mut self, attachments: impl IntoIterator<Item = Attachment>) -> &mut Self {
        self.attachments.extend(attachments);
        self
    }

    /// Pushes the composed message to the transport and performs one
    /// delivery attempt.
    ///
    /// At least one destination address is required. The outcome reported by
    /// the transport is returned and recorded in [`is_sent`](Mailer::is_sent);
    /// a `false` outcome is an accepted-but-undelivered attempt, not an
    /// error.
    pub fn send(&mut self) -> Result<bool, Error> {
        self.transport.clear(true);

        let (from_email, from_name) = self.resolve_from();
        if let Some(from_email) = from_email {
            self.transport
                .set_from(&from_email, from_name.as_deref().unwrap_or(""));
        }

        if self.tos.is_empty() {
            return Err(Error::MissingTo);
        }
        self.transport.set_to(&self.tos);
        if !self.ccs.is_empty() {
            self.transport.set_cc(&self.ccs);
        }
        if !self.bccs.is_empty() {
            self.transport.set_bcc(&self.bccs);
        }

        let subject = format!("{}{}", self.resolve_prefix(), self.subject);
        self.transport.set_subject(&subject);

        self.transport.set_message(&self.message);
        if !self.alt_message.trim().is_empty() {
            self.transport.set_alt_message(&self.alt_message);
        }

        for attachment in &self.attachments {
            self.transport.add_attachment(attachment);
        }

        self.is_sent = self.transport.send(true);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            recipients = self.tos.len(),
            accepted = self.is_sent,
            "delivery attempted"
        );

        Ok(self.is_sent)
    }

    /// Whether the last delivery attempt was reported successful.
    pub fn is_sent(&self) -> bool {
        self.is_sent
    }

    /// Where this mailer's settings come from.
    pub fn config_source(&self) -> ConfigSource {
        match self.source {
            Source::Explicit { .. } => ConfigSource::Explicit,
            Source::Store(_) => ConfigSource::Store,
        }
    }

    /// Returns the transport's diagnostic transcript.
    pub fn transcript(&self) -> String {
        self.transport.transcript()
    }

    /// Borrows the transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn resolve_from(&self) -> (Option<String>, Option<String>) {
        match &self.source {
            Source::Explicit {
                from_email,
                from_name,
                ..
            } => (from_email.clone(), from_name.clone()),
            Source::Store(store) => {
                let email = non_blank(store.item("from_email").as_deref())
                    .map(|email| email.to_lowercase());
                let name = non_blank(store.item("from_name").as_deref()).map(String::from);
                (email, name)
            }
        }
    }

    fn resolve_prefix(&self) -> String {
        match &self.source {
            Source::Explicit { prefix_subject, .. } => {
                prefix_subject.clone().unwrap_or_default()
            }
            Source::Store(store) => store.item("prefix_subject").unwrap_or_default(),
        }
    }
}

impl<T: Transport + fmt::Debug> fmt::Debug for Mailer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mailer")
            .field("transport", &self.transport)
            .field("config_source", &self.config_source())
            .field("tos", &self.tos)
            .field("ccs", &self.ccs)
            .field("bccs", &self.bccs)
            .field("subject", &self.subject)
            .field("attachments", &self.attachments.len())
            .field("is_sent", &self.is_sent)
            .finish()
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

fn push_addresses(input: &str, into: &mut Vec<Address>) -> Result<(), Error> {
    for candidate in input.split(',') {
        let address = candidate
            .parse::<Address>()
            .map_err(|err| Error::InvalidAddress(candidate.trim().to_string(), err))?;
        into.push(address);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::stub::StubTransport;

    fn mailer() -> Mailer<StubTransport> {
        Mailer::with_config(
            StubTransport::new_positive(),
            MailerConfig::smtp("smtp.example.com", "user", "pass"),
        )
        .unwrap()
    }

    #[test]
    fn partial_commit_on_invalid_entry() {
        let mut mailer = mailer();
        let err = mailer.to("first@example.com, not-an-email").unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("not-an-email"));
        // the valid entry before the failure stays committed
        assert_eq!(mailer.tos.len(), 1);
        assert_eq!(mailer.tos[0].as_ref(), "first@example.com");
    }

    #[test]
    fn subject_is_trimmed_on_set() {
        let mut mailer = mailer();
        mailer.subject("  Hello  ");
        assert_eq!(mailer.subject, "Hello");
    }

    #[test]
    fn from_name_resolution_skips_blank_values() {
        let config = MailerConfig {
            from_email: Some(" NoReply@Example.com ".to_string()),
            from_name: Some("   ".to_string()),
            ..MailerConfig::smtp("smtp.example.com", "user", "pass")
        };
        let mailer =
            Mailer::with_config(StubTransport::new_positive(), config).unwrap();

        let (email, name) = mailer.resolve_from();
        assert_eq!(email.as_deref(), Some("noreply@example.com"));
        assert_eq!(name, None);
    }
}
