//! Attachment records staged for delivery

use std::fmt::{Display, Formatter, Result as FmtResult};

use mime::Mime;

/// An attachment staged on a message.
///
/// The mailer only stages attachment metadata; the transport reads the file
/// and builds the MIME part when the message is sent. `filename` is a local
/// path or name, as understood by the transport.
///
/// # Examples
///
/// ```
/// use postino::Attachment;
///
/// let attachment = Attachment::new("/tmp/report.pdf")
///     .newname("report.pdf")
///     .mime("application/pdf".parse().unwrap());
/// assert_eq!(attachment.filename(), "/tmp/report.pdf");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Attachment {
    filename: String,
    disposition: Disposition,
    newname: Option<String>,
    mime: Option<Mime>,
}

impl Attachment {
    /// Creates an attachment with the default disposition and no overrides.
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            disposition: Disposition::Attachment,
            newname: None,
            mime: None,
        }
    }

    /// Marks the attachment to be displayed inline.
    pub fn inline(mut self) -> Self {
        self.disposition = Disposition::Inline;
        self
    }

    /// Overrides the filename the recipient sees.
    pub fn newname(mut self, newname: impl Into<String>) -> Self {
        self.newname = Some(newname.into());
        self
    }

    /// Sets the content type. When unset, the transport guesses from the
    /// filename.
    pub fn mime(mut self, mime: Mime) -> Self {
        self.mime = Some(mime);
        self
    }

    /// The local path or name of the attachment.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// How the attachment is presented to the recipient.
    pub fn disposition(&self) -> Disposition {
        self.disposition
    }

    /// The delivered filename override, if any.
    pub fn delivered_name(&self) -> Option<&str> {
        self.newname.as_deref()
    }

    /// The explicit content type, if any.
    pub fn content_type(&self) -> Option<&Mime> {
        self.mime.as_ref()
    }
}

/// Content disposition of an attachment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Disposition {
    /// A downloadable attachment.
    #[default]
    Attachment,
    /// Content displayed inline in the message.
    Inline,
}

impl Display for Disposition {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Disposition::Attachment => f.write_str("attachment"),
            Disposition::Inline => f.write_str("inline"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let attachment = Attachment::new("photo.png");
        assert_eq!(attachment.filename(), "photo.png");
        assert_eq!(attachment.disposition(), Disposition::Attachment);
        assert_eq!(attachment.delivered_name(), None);
        assert_eq!(attachment.content_type(), None);
    }

    #[test]
    fn inline_disposition() {
        let attachment = Attachment::new("logo.png").inline();
        assert_eq!(attachment.disposition(), Disposition::Inline);
        assert_eq!(attachment.disposition().to_string(), "inline");
    }
}
