//! Longan - A Rust library for creating Microsoft Outlook MSG files
//!
//! This library synthesizes `.msg` files from scratch without any dependency
//! on Outlook, MAPI runtimes, or Windows APIs. It gives the caller full
//! control over every message property - including sender identity - which
//! mediated APIs forbid, making it suitable for eDiscovery, forensics,
//! archival reconstruction, and bulk-mail generation.
//!
//! # Features
//!
//! - **CFB Writer**: Serialize an OLE2 compound file (MS-CFB v3) with FAT,
//!   MiniFAT, DIFAT, and directory sectors
//! - **MAPI Properties**: Encode typed MAPI properties into the stream layout
//!   required by MS-OXMSG (`__properties_version1.0`, `__substg1.0_*`)
//! - **Recipients and Attachments**: To/Cc/Bcc recipients and regular or
//!   inline attachments, each in its own numbered sub-storage
//! - **Threading**: Conversation-index synthesis for reply chains
//! - **Deterministic output**: "now" is injected by the caller, so the same
//!   message always serializes to the same bytes
//!
//! # Example - A simple email
//!
//! ```no_run
//! use chrono::Utc;
//! use longan::msg::{Message, RecipientKind};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut msg = Message::new();
//! msg.set_subject("Quarterly report");
//! msg.set_sender("alice@example.com", Some("Alice"), None)?;
//! msg.add_recipient("bob@example.com", Some("Bob"), RecipientKind::To)?;
//! msg.set_body_text("Please find the report attached.");
//!
//! msg.save("report.msg", Utc::now())?;
//! # Ok(())
//! # }
//! ```
//!
//! # Example - Low-level CFB access
//!
//! ```no_run
//! use longan::cfb::CfbWriter;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut writer = CfbWriter::new();
//! writer.create_storage(&["MyStorage"])?;
//! writer.create_stream(&["MyStorage", "MyStream"], b"payload")?;
//!
//! let mut buffer = Vec::new();
//! writer.write_to(&mut buffer)?;
//! # Ok(())
//! # }
//! ```

/// OLE2 Compound File Binary (MS-CFB) container writer
///
/// This module serializes a logical tree of storages and streams into a
/// valid compound file. It is format-agnostic; the MSG-specific layout
/// lives in [`msg`].
pub mod cfb;

/// MAPI property serialization and the MSG message model (MS-OXMSG)
pub mod msg;

// Re-export commonly used types for convenience
pub use cfb::{CfbError, CfbWriter};
pub use msg::{
    AttachMethod, Attachment, Message, MsgError, PropertyTag, PropertyValue, Recipient,
    RecipientKind,
};
