//! Postino is a fluent mail composer. It accumulates recipients, subject,
//! bodies and attachments, validates every address it is given, composes the
//! derived fields and hands the finished message to a pluggable transport,
//! recording whether delivery was accepted.
//!
//! The crate never performs delivery itself. The bundled transports delegate
//! to the [lettre](https://lettre.rs) mail client; hosts with their own
//! mailing facility implement [`Transport`] over it and inject that instead.
//!
//! ## Features
//!
//! This crate can be customized using cargo features:
//!
//! * **smtp-transport** (default): SMTP delivery through lettre.
//! * **sendmail-transport**: delivery through a local sendmail binary.
//! * **serde**: (de)serialization for [`MailerConfig`] and [`Address`].
//! * **tracing**: debug logging through the `tracing` crate.
//!
//! ## Example
//!
//! This example composes a message and "delivers" it through the stub
//! transport, which records everything instead of sending:
//!
//! ```
//! use postino::transport::stub::StubTransport;
//! use postino::{Attachment, Mailer, MailerConfig};
//!
//! let config = MailerConfig {
//!     from_email: Some("noreply@example.com".into()),
//!     prefix_subject: Some("MyApp - ".into()),
//!     ..MailerConfig::smtp("smtp.example.com", "user", "secret")
//! };
//!
//! let mut mailer = Mailer::with_config(StubTransport::new_positive(), config)?;
//! mailer
//!     .to("User@Example.COM, second@example.org")?
//!     .cc("archive@example.com")?
//!     .subject("First activation")
//!     .message("Welcome!")
//!     .attach(Attachment::new("guide.pdf"));
//!
//! assert!(mailer.send()?);
//! assert!(mailer.is_sent());
//! # Ok::<(), postino::Error>(())
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

pub mod config;
pub mod transport;

mod address;
mod attachment;
mod error;
mod mailer;

pub use crate::{
    address::{Address, AddressError},
    attachment::{Attachment, Disposition},
    config::MailerConfig,
    error::Error,
    mailer::{ConfigSource, Mailer},
    transport::Transport,
};
