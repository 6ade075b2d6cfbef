//! `__properties_version1.0` stream generation
//!
//! Every storage in an MSG file carries a property table stream. Fixed
//! length values sit directly in their 16-byte table entry; variable
//! length values (strings and binaries) live in dedicated
//! `__substg1.0_<TAG>` streams, with the table entry recording their
//! size. The table header differs by storage kind (MS-OXMSG 2.4.1).

use crate::msg::consts::PROPATTR_READABLE_WRITABLE;
use crate::msg::error::MsgError;
use crate::msg::property::{is_fixed_length, PropertyBag};

/// The kind of storage a property table belongs to, which decides the
/// header layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKind {
    /// The top-level message: 32-byte header with recipient and
    /// attachment counts
    Message {
        /// Number of recipient storages (also the next free recipient id)
        recipient_count: u32,
        /// Number of attachment storages (also the next free attachment id)
        attachment_count: u32,
    },
    /// An embedded message: same counts, but no trailing reserved block
    /// (24-byte header)
    EmbeddedMessage {
        /// Number of recipient storages
        recipient_count: u32,
        /// Number of attachment storages
        attachment_count: u32,
    },
    /// A recipient or attachment storage: 8 reserved bytes only
    RecipientOrAttachment,
}

/// A generated property table plus the variable-length streams it refers to
#[derive(Debug)]
pub struct EmittedProperties {
    /// The `__properties_version1.0` stream body
    pub table: Vec<u8>,
    /// One `(stream name, body)` pair per variable-length property, in
    /// table order
    pub streams: Vec<(String, Vec<u8>)>,
}

/// Serialize a property bag into its table stream and variable streams
///
/// Each value is encoded exactly once; the size recorded in the table is
/// the length of the emitted stream body, so the two can never disagree.
pub fn emit(
    bag: &PropertyBag,
    kind: StorageKind,
    codepage: u16,
    strict: bool,
) -> Result<EmittedProperties, MsgError> {
    let mut table = Vec::with_capacity(32 + bag.len() * 16);

    // Header
    match kind {
        StorageKind::Message {
            recipient_count,
            attachment_count,
        } => {
            table.extend_from_slice(&[0u8; 8]);
            table.extend_from_slice(&recipient_count.to_le_bytes());
            table.extend_from_slice(&attachment_count.to_le_bytes());
            table.extend_from_slice(&recipient_count.to_le_bytes());
            table.extend_from_slice(&attachment_count.to_le_bytes());
            table.extend_from_slice(&[0u8; 8]);
        },
        StorageKind::EmbeddedMessage {
            recipient_count,
            attachment_count,
        } => {
            table.extend_from_slice(&[0u8; 8]);
            table.extend_from_slice(&recipient_count.to_le_bytes());
            table.extend_from_slice(&attachment_count.to_le_bytes());
            table.extend_from_slice(&recipient_count.to_le_bytes());
            table.extend_from_slice(&attachment_count.to_le_bytes());
        },
        StorageKind::RecipientOrAttachment => {
            table.extend_from_slice(&[0u8; 8]);
        },
    }

    // Entries, in ascending tag order (PropertyBag iterates sorted)
    let mut streams = Vec::new();
    for (tag, value) in bag.iter() {
        let encoded = value.encode(codepage, strict)?;

        table.extend_from_slice(&tag.raw().to_le_bytes());
        table.extend_from_slice(&PROPATTR_READABLE_WRITABLE.to_le_bytes());

        if is_fixed_length(tag.type_code()) {
            // Value left-aligned in the 8-byte field, zero padded
            let mut field = [0u8; 8];
            field[..encoded.len()].copy_from_slice(&encoded);
            table.extend_from_slice(&field);
        } else {
            // Size of the external stream, then 4 reserved bytes
            table.extend_from_slice(&(encoded.len() as u32).to_le_bytes());
            table.extend_from_slice(&[0u8; 4]);
            streams.push((tag.stream_name(), encoded));
        }
    }

    Ok(EmittedProperties { table, streams })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::msg::consts::*;
    use crate::msg::property::{PropertyTag, PropertyValue};

    fn bag_with(entries: &[(u16, PropertyValue)]) -> PropertyBag {
        let mut bag = PropertyBag::new();
        for (id, value) in entries {
            bag.set(*id, value.clone());
        }
        bag
    }

    #[test]
    fn test_message_header_layout() {
        let bag = PropertyBag::new();
        let emitted = emit(
            &bag,
            StorageKind::Message {
                recipient_count: 2,
                attachment_count: 1,
            },
            1252,
            false,
        )
        .unwrap();

        assert_eq!(emitted.table.len(), 32);
        assert_eq!(&emitted.table[0..8], &[0u8; 8]);
        assert_eq!(&emitted.table[8..12], &2u32.to_le_bytes());
        assert_eq!(&emitted.table[12..16], &1u32.to_le_bytes());
        assert_eq!(&emitted.table[16..20], &2u32.to_le_bytes());
        assert_eq!(&emitted.table[20..24], &1u32.to_le_bytes());
        assert_eq!(&emitted.table[24..32], &[0u8; 8]);
    }

    #[test]
    fn test_embedded_header_is_24_bytes() {
        let emitted = emit(
            &PropertyBag::new(),
            StorageKind::EmbeddedMessage {
                recipient_count: 0,
                attachment_count: 0,
            },
            1252,
            false,
        )
        .unwrap();
        assert_eq!(emitted.table.len(), 24);
    }

    #[test]
    fn test_recipient_header_is_8_bytes() {
        let emitted = emit(
            &PropertyBag::new(),
            StorageKind::RecipientOrAttachment,
            1252,
            false,
        )
        .unwrap();
        assert_eq!(emitted.table.len(), 8);
    }

    #[test]
    fn test_fixed_entry_layout() {
        let bag = bag_with(&[(PR_MESSAGE_FLAGS, PropertyValue::Int32(0x11))]);
        let emitted = emit(&bag, StorageKind::RecipientOrAttachment, 1252, false).unwrap();

        assert_eq!(emitted.table.len(), 8 + 16);
        let entry = &emitted.table[8..24];
        let tag = PropertyTag::new(PR_MESSAGE_FLAGS, PT_LONG);
        assert_eq!(&entry[0..4], &tag.raw().to_le_bytes());
        assert_eq!(&entry[4..8], &PROPATTR_READABLE_WRITABLE.to_le_bytes());
        // 4-byte value left-aligned, zero padded to 8
        assert_eq!(&entry[8..16], &[0x11, 0, 0, 0, 0, 0, 0, 0]);
        assert!(emitted.streams.is_empty());
    }

    #[test]
    fn test_variable_entry_declares_stream_size() {
        let bag = bag_with(&[(PR_SUBJECT, PropertyValue::Unicode("Hello".into()))]);
        let emitted = emit(&bag, StorageKind::RecipientOrAttachment, 1252, false).unwrap();

        let entry = &emitted.table[8..24];
        // "Hello" in UTF-16LE plus terminator = 12 bytes
        assert_eq!(&entry[8..12], &12u32.to_le_bytes());
        assert_eq!(&entry[12..16], &[0u8; 4]);

        assert_eq!(emitted.streams.len(), 1);
        let (name, body) = &emitted.streams[0];
        assert_eq!(name, "__substg1.0_0037001F");
        assert_eq!(body.len(), 12);
    }

    #[test]
    fn test_entries_ascend_by_tag() {
        let bag = bag_with(&[
            (PR_MESSAGE_FLAGS, PropertyValue::Int32(1)),
            (PR_SUBJECT, PropertyValue::Unicode("s".into())),
            (PR_MESSAGE_CLASS, PropertyValue::Unicode("IPM.Note".into())),
        ]);
        let emitted = emit(&bag, StorageKind::RecipientOrAttachment, 1252, false).unwrap();

        let mut last = 0u32;
        for i in 0..3 {
            let off = 8 + i * 16;
            let tag = u32::from_le_bytes(emitted.table[off..off + 4].try_into().unwrap());
            assert!(tag > last);
            last = tag;
        }
    }
}
