//! Message, recipient, and attachment model plus the builder facade
//!
//! A [`Message`] is mutable while it is being populated; serialization
//! takes `&self` and never mutates, so the same message can be written
//! any number of times. All serialization entry points take the current
//! instant as a parameter, which keeps output reproducible.

use crate::msg::codepage;
use crate::msg::composer;
use crate::msg::consts::*;
use crate::msg::conversation;
use crate::msg::error::{MsgError, Result};
use crate::msg::headers;
use crate::msg::property::{PropertyBag, PropertyTag, PropertyValue};
use chrono::{DateTime, Utc};
use std::io::Write;

/// Where a recipient appears on the message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecipientKind {
    /// Primary recipient (MAPI_TO)
    To = 1,
    /// Carbon copy (MAPI_CC)
    Cc = 2,
    /// Blind carbon copy (MAPI_BCC)
    Bcc = 3,
}

impl TryFrom<i32> for RecipientKind {
    type Error = MsgError;

    fn try_from(value: i32) -> Result<Self> {
        match value {
            1 => Ok(RecipientKind::To),
            2 => Ok(RecipientKind::Cc),
            3 => Ok(RecipientKind::Bcc),
            other => Err(MsgError::InvalidInput(format!(
                "recipient kind out of range: {}",
                other
            ))),
        }
    }
}

/// How an attachment's content is carried (PR_ATTACH_METHOD)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AttachMethod {
    /// No attachment content
    NoAttachment = 0,
    /// The content travels in PR_ATTACH_DATA_BIN (the usual case)
    #[default]
    ByValue = 1,
    /// Content referenced by path
    ByReference = 2,
    /// Content referenced by path, resolved at open time
    ByRefResolve = 3,
    /// Content referenced by path only
    ByRefOnly = 4,
    /// The attachment is an embedded message
    EmbeddedMsg = 5,
    /// The attachment is an OLE object
    Ole = 6,
}

/// The message originator
#[derive(Debug, Clone)]
pub struct Sender {
    /// Email address
    pub email: String,
    /// Display name (defaults to the address)
    pub display_name: String,
    /// Address type, usually "SMTP"
    pub addr_type: String,
}

/// A single recipient row
#[derive(Debug, Clone)]
pub struct Recipient {
    /// Email address
    pub email: String,
    /// Display name (defaults to the address)
    pub display_name: String,
    /// Address type, usually "SMTP"
    pub addr_type: String,
    /// To, Cc, or Bcc
    pub kind: RecipientKind,
}

/// A file attached to the message
#[derive(Debug, Clone)]
pub struct Attachment {
    /// File name shown to the recipient
    pub filename: String,
    /// Raw payload bytes
    pub data: Vec<u8>,
    /// MIME type, when known
    pub mime_type: Option<String>,
    /// Content id for `cid:` references from an HTML body
    pub content_id: Option<String>,
    /// Whether the attachment is rendered inline
    pub inline: bool,
    /// How the content is carried
    pub method: AttachMethod,
}

impl Attachment {
    /// Create an attachment carried by value
    pub fn new(filename: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            filename: filename.into(),
            data: data.into(),
            mime_type: None,
            content_id: None,
            inline: false,
            method: AttachMethod::ByValue,
        }
    }

    /// Set the MIME type
    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    /// Mark the attachment inline and give it a content id
    pub fn inline(mut self, content_id: impl Into<String>) -> Self {
        self.content_id = Some(content_id.into());
        self.inline = true;
        self
    }
}

/// An Outlook message under construction
///
/// Populate with the setter methods, then serialize with
/// [`Message::write_to`] or [`Message::save`].
#[derive(Debug, Clone, Default)]
pub struct Message {
    pub(crate) subject: String,
    pub(crate) sender: Option<Sender>,
    pub(crate) body_text: Option<String>,
    pub(crate) body_html: Option<Vec<u8>>,
    pub(crate) recipients: Vec<Recipient>,
    pub(crate) attachments: Vec<Attachment>,
    pub(crate) conversation_index: Option<Vec<u8>>,
    pub(crate) transport_headers: Option<String>,
    pub(crate) internet_message_id: Option<String>,
    pub(crate) codepage: u16,
    pub(crate) strict_encoding: bool,
    pub(crate) read: bool,
    pub(crate) unsent: bool,
    pub(crate) extra: PropertyBag,
}

impl Message {
    /// Create an empty message
    ///
    /// Defaults: read, sent, Windows-1252 codepage, lossy STRING8
    /// encoding, no recipients or attachments.
    pub fn new() -> Self {
        Self {
            codepage: codepage::DEFAULT_CODEPAGE,
            read: true,
            ..Self::default()
        }
    }

    /// Set the subject line
    pub fn set_subject(&mut self, subject: impl Into<String>) {
        self.subject = subject.into();
    }

    /// Set the sender
    ///
    /// `name` defaults to the address and `addr_type` to "SMTP". The
    /// address must not be empty.
    pub fn set_sender(
        &mut self,
        email: impl Into<String>,
        name: Option<&str>,
        addr_type: Option<&str>,
    ) -> Result<()> {
        let email = email.into();
        if email.is_empty() {
            return Err(MsgError::InvalidInput("empty sender address".to_string()));
        }
        let display_name = match name {
            Some(n) if !n.is_empty() => n.to_string(),
            _ => email.clone(),
        };
        self.sender = Some(Sender {
            email,
            display_name,
            addr_type: addr_type.unwrap_or(ADDRTYPE_SMTP).to_string(),
        });
        Ok(())
    }

    /// Set the plain text body
    pub fn set_body_text(&mut self, body: impl Into<String>) {
        self.body_text = Some(body.into());
    }

    /// Set the HTML body (stored verbatim as PR_HTML)
    pub fn set_body_html(&mut self, html: impl Into<Vec<u8>>) {
        self.body_html = Some(html.into());
    }

    /// Add a recipient
    ///
    /// `name` defaults to the address. Recipients keep their insertion
    /// order, which becomes their storage index and row id.
    pub fn add_recipient(
        &mut self,
        email: impl Into<String>,
        name: Option<&str>,
        kind: RecipientKind,
    ) -> Result<()> {
        let email = email.into();
        if email.is_empty() {
            return Err(MsgError::InvalidInput(
                "empty recipient address".to_string(),
            ));
        }
        let display_name = match name {
            Some(n) if !n.is_empty() => n.to_string(),
            _ => email.clone(),
        };
        self.recipients.push(Recipient {
            email,
            display_name,
            addr_type: ADDRTYPE_SMTP.to_string(),
            kind,
        });
        Ok(())
    }

    /// Add an attachment
    pub fn add_attachment(&mut self, attachment: Attachment) -> Result<()> {
        if attachment.filename.is_empty() {
            return Err(MsgError::InvalidInput(
                "empty attachment filename".to_string(),
            ));
        }
        self.attachments.push(attachment);
        Ok(())
    }

    /// Start a new conversation thread
    ///
    /// Synthesizes a fresh 22-byte conversation index with a random GUID.
    pub fn start_conversation(&mut self, now: DateTime<Utc>) {
        self.conversation_index = Some(conversation::new_index(now));
    }

    /// Thread this message as a reply to a parent conversation index
    pub fn reply_to(&mut self, parent_index: &[u8], now: DateTime<Utc>) -> Result<()> {
        self.conversation_index = Some(conversation::reply_index(parent_index, now)?);
        Ok(())
    }

    /// Supply a conversation index verbatim
    ///
    /// Useful for reproducible output together with
    /// [`conversation::new_index_with_guid`].
    pub fn set_conversation_index(&mut self, index: Vec<u8>) {
        self.conversation_index = Some(index);
    }

    /// The current conversation index, if threading is set
    pub fn conversation_index(&self) -> Option<&[u8]> {
        self.conversation_index.as_deref()
    }

    /// Synthesize RFC 5322 transport headers from the current sender,
    /// recipients, and subject
    ///
    /// The caller supplies the Message-ID, which also becomes
    /// PR_INTERNET_MESSAGE_ID. Call after sender and recipients are set;
    /// the headers are not regenerated by later changes.
    pub fn set_internet_headers(&mut self, message_id: &str, now: DateTime<Utc>) -> Result<()> {
        let sender = self.sender.as_ref().ok_or_else(|| {
            MsgError::InvalidInput("internet headers require a sender".to_string())
        })?;

        let collect = |kind: RecipientKind| -> Vec<headers::HeaderAddress> {
            self.recipients
                .iter()
                .filter(|r| r.kind == kind)
                .map(|r| (r.email.clone(), r.display_name.clone()))
                .collect()
        };

        self.transport_headers = Some(headers::format_internet_headers(
            &self.subject,
            &sender.email,
            &sender.display_name,
            &collect(RecipientKind::To),
            &collect(RecipientKind::Cc),
            message_id,
            now,
        ));
        self.internet_message_id = Some(message_id.to_string());
        Ok(())
    }

    /// Set the read flag (default: read)
    pub fn set_read(&mut self, read: bool) {
        self.read = read;
    }

    /// Mark the message unsent (a draft)
    pub fn set_unsent(&mut self, unsent: bool) {
        self.unsent = unsent;
    }

    /// Set the codepage used for STRING8 properties
    ///
    /// Fails for codepages without an encoder.
    pub fn set_codepage(&mut self, codepage: u16) -> Result<()> {
        if codepage::codepage_to_encoding(codepage).is_none() {
            return Err(MsgError::InvalidInput(format!(
                "unsupported codepage {}",
                codepage
            )));
        }
        self.codepage = codepage;
        Ok(())
    }

    /// Fail instead of substituting `?` when a STRING8 value does not fit
    /// the codepage
    pub fn set_strict_encoding(&mut self, strict: bool) {
        self.strict_encoding = strict;
    }

    /// Set an arbitrary tagged property on the message
    ///
    /// Fails with [`MsgError::UnsupportedType`] when the tag's type code
    /// is not implemented by the codec; nothing is recorded in that case.
    /// Caller-supplied properties override the generated defaults, except
    /// for the housekeeping flags that must stay consistent with the
    /// attachment list.
    pub fn set_property(&mut self, tag: PropertyTag, value: PropertyValue) -> Result<()> {
        self.extra.insert(tag, value)
    }

    /// Serialize the message to a sink
    ///
    /// `now` is stamped into the submit, delivery, creation, and
    /// modification time properties. The whole file is composed before
    /// the first byte reaches the sink; a partially written sink after an
    /// error is not a valid file and must be discarded.
    pub fn write_to<W: Write>(&self, sink: &mut W, now: DateTime<Utc>) -> Result<()> {
        let cfb = composer::compose(self, now)?;
        cfb.write_to(sink)?;
        Ok(())
    }

    /// Serialize the message to a file
    pub fn save<P: AsRef<std::path::Path>>(&self, path: P, now: DateTime<Utc>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let mut buffered = std::io::BufWriter::new(file);
        self.write_to(&mut buffered, now)?;
        buffered.flush()?;
        Ok(())
    }
}

/// Split a subject into its reply/forward prefix and the normalized rest
///
/// "RE: Hello" becomes ("RE: ", "Hello"); a subject without a recognized
/// prefix keeps an empty prefix.
pub(crate) fn split_subject(subject: &str) -> (String, String) {
    for prefix in ["re:", "fw:", "fwd:"] {
        match subject.get(..prefix.len()) {
            Some(head) if head.eq_ignore_ascii_case(prefix) => {
                let rest = subject[prefix.len()..].trim_start();
                return (format!("{} ", head), rest.to_string());
            },
            _ => {},
        }
    }
    (String::new(), subject.to_string())
}
