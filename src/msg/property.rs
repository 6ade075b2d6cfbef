//! Typed MAPI property values and the property codec
//!
//! A MAPI property is a 32-bit tag (16-bit id in the high word, 16-bit
//! type code in the low word) paired with a typed value. This module
//! defines the value variants the codec supports, classifies types as
//! fixed or variable length, and encodes values to their on-wire form.

use crate::msg::codepage;
use crate::msg::consts::*;
use crate::msg::error::MsgError;
use chrono::{DateTime, Utc};

/// Seconds between 1601-01-01 (FILETIME epoch) and 1970-01-01 (Unix epoch)
const FILETIME_UNIX_OFFSET: i64 = 11_644_473_600;

/// A 32-bit MAPI property tag: property id in the high 16 bits, property
/// type code in the low 16 bits
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PropertyTag(u32);

impl PropertyTag {
    /// Build a tag from a property id and type code
    pub const fn new(id: u16, type_code: u16) -> Self {
        Self(((id as u32) << 16) | type_code as u32)
    }

    /// Reconstruct a tag from its raw 32-bit form
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// The raw 32-bit tag
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// The 16-bit property id
    pub const fn id(self) -> u16 {
        (self.0 >> 16) as u16
    }

    /// The 16-bit property type code
    pub const fn type_code(self) -> u16 {
        self.0 as u16
    }

    /// The `__substg1.0_` stream name for this tag: eight uppercase hex
    /// digits, id then type
    pub fn stream_name(self) -> String {
        format!("{}{:04X}{:04X}", SUBSTG_PREFIX, self.id(), self.type_code())
    }
}

/// A typed MAPI property value
///
/// One variant per supported wire type. The codec matches exhaustively,
/// so adding a variant forces every encoding site to handle it.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    /// PT_SHORT: 16-bit signed integer
    Int16(i16),
    /// PT_LONG: 32-bit signed integer
    Int32(i32),
    /// PT_BOOLEAN: stored as a 16-bit 0/1
    Bool(bool),
    /// PT_LONGLONG: 64-bit signed integer
    Int64(i64),
    /// PT_SYSTIME: an absolute instant, stored as FILETIME
    Time(DateTime<Utc>),
    /// PT_STRING8: codepage-encoded string with a single NUL terminator
    String8(String),
    /// PT_UNICODE: UTF-16LE string with a double NUL terminator
    Unicode(String),
    /// PT_BINARY: raw bytes
    Binary(Vec<u8>),
}

impl PropertyValue {
    /// The canonical MAPI type code for this value
    pub fn type_code(&self) -> u16 {
        match self {
            PropertyValue::Int16(_) => PT_SHORT,
            PropertyValue::Int32(_) => PT_LONG,
            PropertyValue::Bool(_) => PT_BOOLEAN,
            PropertyValue::Int64(_) => PT_LONGLONG,
            PropertyValue::Time(_) => PT_SYSTIME,
            PropertyValue::String8(_) => PT_STRING8,
            PropertyValue::Unicode(_) => PT_UNICODE,
            PropertyValue::Binary(_) => PT_BINARY,
        }
    }

    /// Encode this value to its on-wire byte form
    ///
    /// String terminators are included: one NUL byte for STRING8, two for
    /// UNICODE. `codepage` and `strict` only affect STRING8 values.
    pub fn encode(&self, codepage: u16, strict: bool) -> Result<Vec<u8>, MsgError> {
        match self {
            PropertyValue::Int16(v) => Ok(v.to_le_bytes().to_vec()),
            PropertyValue::Int32(v) => Ok(v.to_le_bytes().to_vec()),
            PropertyValue::Bool(v) => Ok((*v as u16).to_le_bytes().to_vec()),
            PropertyValue::Int64(v) => Ok(v.to_le_bytes().to_vec()),
            PropertyValue::Time(t) => Ok(filetime_ticks(*t).to_le_bytes().to_vec()),
            PropertyValue::String8(s) => {
                let mut bytes = codepage::encode_string8(s, codepage, strict)?;
                bytes.push(0);
                Ok(bytes)
            },
            PropertyValue::Unicode(s) => {
                let mut bytes = Vec::with_capacity(s.len() * 2 + 2);
                for unit in s.encode_utf16() {
                    bytes.extend_from_slice(&unit.to_le_bytes());
                }
                bytes.extend_from_slice(&[0, 0]);
                Ok(bytes)
            },
            PropertyValue::Binary(b) => Ok(b.clone()),
        }
    }
}

/// Whether a MAPI type code is fixed-length (its value fits the 8-byte
/// field of a property table entry)
///
/// Floats and error codes are classified here for table layout purposes
/// even though the codec does not encode them.
pub fn is_fixed_length(type_code: u16) -> bool {
    matches!(
        type_code,
        PT_SHORT | PT_LONG | PT_FLOAT | PT_DOUBLE | PT_ERROR | PT_BOOLEAN | PT_LONGLONG
            | PT_SYSTIME
    )
}

/// Whether the codec can encode values of a MAPI type code
pub fn is_supported_type(type_code: u16) -> bool {
    matches!(
        type_code,
        PT_SHORT | PT_LONG | PT_BOOLEAN | PT_LONGLONG | PT_SYSTIME | PT_STRING8 | PT_UNICODE
            | PT_BINARY
    )
}

/// Convert an instant to FILETIME ticks (100 ns intervals since
/// 1601-01-01 UTC)
///
/// Instants before the FILETIME epoch clamp to zero.
pub fn filetime_ticks(t: DateTime<Utc>) -> u64 {
    let seconds = t.timestamp() + FILETIME_UNIX_OFFSET;
    if seconds < 0 {
        return 0;
    }
    let subsec_ticks = (t.timestamp_subsec_nanos() / 100) as u64;
    seconds as u64 * 10_000_000 + subsec_ticks
}

/// An ordered collection of properties for one storage
///
/// Keyed by the raw 32-bit tag, so iteration is ascending tag order (the
/// order the property table requires) and tags are unique per storage.
#[derive(Debug, Clone, Default)]
pub struct PropertyBag {
    entries: std::collections::BTreeMap<u32, PropertyValue>,
}

impl PropertyBag {
    /// Create an empty bag
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a property, validating the tag's type code
    ///
    /// Fails with [`MsgError::UnsupportedType`] when the tag names a type
    /// the codec does not implement, and [`MsgError::InvalidInput`] when
    /// the tag's type disagrees with the value's. An existing property
    /// with the same tag is replaced.
    pub fn insert(&mut self, tag: PropertyTag, value: PropertyValue) -> Result<(), MsgError> {
        if !is_supported_type(tag.type_code()) {
            return Err(MsgError::UnsupportedType(tag.type_code()));
        }
        if tag.type_code() != value.type_code() {
            return Err(MsgError::InvalidInput(format!(
                "tag 0x{:08X} declares type 0x{:04X} but the value is type 0x{:04X}",
                tag.raw(),
                tag.type_code(),
                value.type_code()
            )));
        }
        self.entries.insert(tag.raw(), value);
        Ok(())
    }

    /// Insert a property under its value's canonical type code
    pub fn set(&mut self, id: u16, value: PropertyValue) {
        let tag = PropertyTag::new(id, value.type_code());
        self.entries.insert(tag.raw(), value);
    }

    /// Look up a property by raw tag
    pub fn get(&self, tag: PropertyTag) -> Option<&PropertyValue> {
        self.entries.get(&tag.raw())
    }

    /// Iterate properties in ascending tag order
    pub fn iter(&self) -> impl Iterator<Item = (PropertyTag, &PropertyValue)> {
        self.entries
            .iter()
            .map(|(&raw, value)| (PropertyTag::from_raw(raw), value))
    }

    /// Number of properties in the bag
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the bag is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Merge another bag into this one; the other bag's entries win
    pub fn merge(&mut self, other: &PropertyBag) {
        for (&raw, value) in &other.entries {
            self.entries.insert(raw, value.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_tag_layout() {
        let tag = PropertyTag::new(PR_SUBJECT, PT_UNICODE);
        assert_eq!(tag.raw(), 0x0037_001F);
        assert_eq!(tag.id(), 0x0037);
        assert_eq!(tag.type_code(), 0x001F);
    }

    #[test]
    fn test_stream_name() {
        let tag = PropertyTag::new(PR_SUBJECT, PT_UNICODE);
        assert_eq!(tag.stream_name(), "__substg1.0_0037001F");

        let tag = PropertyTag::new(PR_ATTACH_DATA_BIN, PT_BINARY);
        assert_eq!(tag.stream_name(), "__substg1.0_37010102");
    }

    #[test]
    fn test_fixed_length_classification() {
        assert!(is_fixed_length(PT_SHORT));
        assert!(is_fixed_length(PT_LONG));
        assert!(is_fixed_length(PT_BOOLEAN));
        assert!(is_fixed_length(PT_LONGLONG));
        assert!(is_fixed_length(PT_SYSTIME));
        assert!(is_fixed_length(PT_DOUBLE));

        assert!(!is_fixed_length(PT_STRING8));
        assert!(!is_fixed_length(PT_UNICODE));
        assert!(!is_fixed_length(PT_BINARY));
    }

    #[test]
    fn test_integer_encoding() {
        let v = PropertyValue::Int16(-2).encode(1252, false).unwrap();
        assert_eq!(v, vec![0xFE, 0xFF]);

        let v = PropertyValue::Int32(1).encode(1252, false).unwrap();
        assert_eq!(v, vec![1, 0, 0, 0]);

        let v = PropertyValue::Bool(true).encode(1252, false).unwrap();
        assert_eq!(v, vec![1, 0]);

        let v = PropertyValue::Int64(-1).encode(1252, false).unwrap();
        assert_eq!(v, vec![0xFF; 8]);
    }

    #[test]
    fn test_unicode_encoding() {
        let v = PropertyValue::Unicode("Hi".to_string())
            .encode(1252, false)
            .unwrap();
        assert_eq!(v, vec![b'H', 0, b'i', 0, 0, 0]);
    }

    #[test]
    fn test_string8_encoding() {
        let v = PropertyValue::String8("Hi".to_string())
            .encode(1252, false)
            .unwrap();
        assert_eq!(v, vec![b'H', b'i', 0]);
    }

    #[test]
    fn test_filetime_unix_epoch() {
        let epoch = Utc.timestamp_opt(0, 0).unwrap();
        let ticks = filetime_ticks(epoch);
        assert_eq!(ticks, 116_444_736_000_000_000);
        assert_eq!(
            ticks.to_le_bytes(),
            [0x00, 0x80, 0x3E, 0xD5, 0xDE, 0xB1, 0x9D, 0x01]
        );
    }

    #[test]
    fn test_filetime_subsecond() {
        let t = Utc.timestamp_opt(0, 1_500).unwrap();
        assert_eq!(filetime_ticks(t), 116_444_736_000_000_015);
    }

    #[test]
    fn test_filetime_before_1601_clamps() {
        let t = Utc.with_ymd_and_hms(1500, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(filetime_ticks(t), 0);
    }

    #[test]
    fn test_bag_rejects_unsupported_type() {
        let mut bag = PropertyBag::new();
        let err = bag
            .insert(
                PropertyTag::new(0x8000, PT_DOUBLE),
                PropertyValue::Int64(0),
            )
            .unwrap_err();
        assert!(matches!(err, MsgError::UnsupportedType(0x0005)));
        assert!(bag.is_empty());
    }

    #[test]
    fn test_bag_rejects_type_mismatch() {
        let mut bag = PropertyBag::new();
        let err = bag
            .insert(
                PropertyTag::new(PR_SUBJECT, PT_UNICODE),
                PropertyValue::Int32(1),
            )
            .unwrap_err();
        assert!(matches!(err, MsgError::InvalidInput(_)));
    }

    #[test]
    fn test_bag_iterates_in_tag_order() {
        let mut bag = PropertyBag::new();
        bag.set(PR_SUBJECT, PropertyValue::Unicode("s".into()));
        bag.set(PR_MESSAGE_CLASS, PropertyValue::Unicode("IPM.Note".into()));
        bag.set(PR_MESSAGE_FLAGS, PropertyValue::Int32(1));

        let tags: Vec<u32> = bag.iter().map(|(t, _)| t.raw()).collect();
        let mut sorted = tags.clone();
        sorted.sort();
        assert_eq!(tags, sorted);
        assert_eq!(tags[0], PropertyTag::new(PR_MESSAGE_CLASS, PT_UNICODE).raw());
    }
}
