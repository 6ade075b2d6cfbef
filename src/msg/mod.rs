//! MAPI property serialization and the MSG message model
//!
//! This module lays message, recipient, and attachment properties out in
//! the stream-naming and stream-format conventions required by MS-OXMSG,
//! then hands the resulting tree of named streams to the [`crate::cfb`]
//! writer.

/// MAPI property ids, type codes, and flag bits
pub mod consts;

/// Error types for MSG writing
mod error;

/// Windows codepage to encoder mapping for STRING8 properties
pub mod codepage;

/// Typed property values and the property codec
mod property;

/// `__properties_version1.0` and `__substg1.0_*` stream generation
mod property_stream;

/// Conversation-index synthesis for email threading
pub mod conversation;

/// RFC 5322 transport-header synthesis
mod headers;

/// Message, recipient, and attachment model plus the builder facade
mod message;

/// Storage composer: message model to CFB directory tree
mod composer;

// Re-export public types
pub use error::{MsgError, Result};
pub use message::{AttachMethod, Attachment, Message, Recipient, RecipientKind, Sender};
pub use property::{PropertyBag, PropertyTag, PropertyValue};
