//! MAPI constants: property ids (PidTag*), property type codes, and the
//! flag bits used by the MSG layout. Values are from MS-OXPROPS and
//! MS-OXMSG.

// Property type codes
/// 16-bit signed integer
pub const PT_SHORT: u16 = 0x0002;
/// 32-bit signed integer
pub const PT_LONG: u16 = 0x0003;
/// 32-bit float (classified fixed-length, not encodable)
pub const PT_FLOAT: u16 = 0x0004;
/// 64-bit float (classified fixed-length, not encodable)
pub const PT_DOUBLE: u16 = 0x0005;
/// 32-bit error code (classified fixed-length, not encodable)
pub const PT_ERROR: u16 = 0x000A;
/// Boolean, stored as a 16-bit 0/1
pub const PT_BOOLEAN: u16 = 0x000B;
/// 64-bit signed integer
pub const PT_LONGLONG: u16 = 0x0014;
/// Null-terminated codepage string in its own stream
pub const PT_STRING8: u16 = 0x001E;
/// Null-terminated UTF-16LE string in its own stream
pub const PT_UNICODE: u16 = 0x001F;
/// Windows FILETIME (100 ns ticks since 1601-01-01 UTC)
pub const PT_SYSTIME: u16 = 0x0040;
/// Raw bytes in their own stream
pub const PT_BINARY: u16 = 0x0102;

// Message envelope properties
pub const PR_MESSAGE_CLASS: u16 = 0x001A;
pub const PR_IMPORTANCE: u16 = 0x0017;
pub const PR_ORIGINATOR_DELIVERY_REPORT_REQUESTED: u16 = 0x0023;
pub const PR_PRIORITY: u16 = 0x0026;
pub const PR_READ_RECEIPT_REQUESTED: u16 = 0x0029;
pub const PR_SENSITIVITY: u16 = 0x0036;
pub const PR_SUBJECT: u16 = 0x0037;
pub const PR_SUBJECT_PREFIX: u16 = 0x003D;
pub const PR_CONVERSATION_TOPIC: u16 = 0x0070;
pub const PR_CONVERSATION_INDEX: u16 = 0x0071;
pub const PR_TRANSPORT_MESSAGE_HEADERS: u16 = 0x007D;
pub const PR_MESSAGE_FLAGS: u16 = 0x0E07;
pub const PR_MSG_STATUS: u16 = 0x0E17;
pub const PR_HASATTACH: u16 = 0x0E1B;
pub const PR_NORMALIZED_SUBJECT: u16 = 0x0E1D;
pub const PR_INTERNET_MESSAGE_ID: u16 = 0x1035;

// Time properties
pub const PR_CLIENT_SUBMIT_TIME: u16 = 0x0039;
pub const PR_MESSAGE_DELIVERY_TIME: u16 = 0x0E06;
pub const PR_CREATION_TIME: u16 = 0x3007;
pub const PR_LAST_MODIFICATION_TIME: u16 = 0x3008;

// Body properties
pub const PR_BODY: u16 = 0x1000;
pub const PR_HTML: u16 = 0x1013;
pub const PR_NATIVE_BODY: u16 = 0x1016;

// Sender properties
pub const PR_SENDER_NAME: u16 = 0x0C1A;
pub const PR_SENDER_SEARCH_KEY: u16 = 0x0C1D;
pub const PR_SENDER_ADDRTYPE: u16 = 0x0C1E;
pub const PR_SENDER_EMAIL_ADDRESS: u16 = 0x0C1F;

// Sent-representing properties (mirror the sender for ordinary mail)
pub const PR_SENT_REPRESENTING_SEARCH_KEY: u16 = 0x003B;
pub const PR_SENT_REPRESENTING_NAME: u16 = 0x0042;
pub const PR_SENT_REPRESENTING_ADDRTYPE: u16 = 0x0064;
pub const PR_SENT_REPRESENTING_EMAIL_ADDRESS: u16 = 0x0065;

// Recipient display rollups (on the message)
pub const PR_DISPLAY_BCC: u16 = 0x0E02;
pub const PR_DISPLAY_CC: u16 = 0x0E03;
pub const PR_DISPLAY_TO: u16 = 0x0E04;

// Recipient table properties
pub const PR_RECIPIENT_TYPE: u16 = 0x0C15;
pub const PR_OBJECT_TYPE: u16 = 0x0FFE;
pub const PR_ROWID: u16 = 0x3000;
pub const PR_DISPLAY_NAME: u16 = 0x3001;
pub const PR_ADDRTYPE: u16 = 0x3002;
pub const PR_EMAIL_ADDRESS: u16 = 0x3003;
pub const PR_SEARCH_KEY: u16 = 0x300B;
pub const PR_DISPLAY_TYPE: u16 = 0x3900;
pub const PR_SMTP_ADDRESS: u16 = 0x39FE;

// Attachment properties
pub const PR_ATTACH_SIZE: u16 = 0x0E20;
pub const PR_ATTACH_NUM: u16 = 0x0E21;
pub const PR_ATTACH_DATA_BIN: u16 = 0x3701;
pub const PR_ATTACH_EXTENSION: u16 = 0x3703;
pub const PR_ATTACH_FILENAME: u16 = 0x3704;
pub const PR_ATTACH_METHOD: u16 = 0x3705;
pub const PR_ATTACH_LONG_FILENAME: u16 = 0x3707;
pub const PR_RENDERING_POSITION: u16 = 0x370B;
pub const PR_ATTACH_MIME_TAG: u16 = 0x370E;
pub const PR_ATTACH_CONTENT_ID: u16 = 0x3712;
pub const PR_ATTACHMENT_FLAGS: u16 = 0x3714;
pub const PR_ATTACHMENT_HIDDEN: u16 = 0x7FFE;

// Store and locale properties
pub const PR_STORE_SUPPORT_MASK: u16 = 0x340D;
pub const PR_MESSAGE_CODEPAGE: u16 = 0x3FFD;
pub const PR_INTERNET_CPID: u16 = 0x3FDE;
pub const PR_MESSAGE_LOCALE_ID: u16 = 0x3FF1;

// PR_MESSAGE_FLAGS bits
/// The message has been read
pub const MSGFLAG_READ: i32 = 0x0001;
/// The message has not been sent
pub const MSGFLAG_UNSENT: i32 = 0x0008;
/// The message has at least one attachment
pub const MSGFLAG_HASATTACH: i32 = 0x0010;

// PR_ATTACHMENT_FLAGS bits
/// The attachment is referenced from the HTML body (inline)
pub const ATT_MHTML_REF: i32 = 0x0004;

// PR_OBJECT_TYPE values
/// Recipient rows are mail users
pub const MAPI_MAILUSER: i32 = 6;
/// Attachment objects
pub const MAPI_ATTACH: i32 = 7;

// PR_NATIVE_BODY values
/// The native body is plain text
pub const NATIVE_BODY_PLAIN: i32 = 1;
/// The native body is HTML
pub const NATIVE_BODY_HTML: i32 = 3;

// PR_STORE_SUPPORT_MASK: STORE_UNICODE_OK
pub const STORE_UNICODE_OK: i32 = 0x0004_0000;

/// Locale id for en-US, the default PR_MESSAGE_LOCALE_ID
pub const LOCALE_EN_US: i32 = 0x0409;

/// Flags field of every property table entry (readable | writable)
pub const PROPATTR_READABLE_WRITABLE: u32 = 0x0000_0006;

/// Message class for a standard interpersonal email
pub const MESSAGE_CLASS_NOTE: &str = "IPM.Note";

/// Default address type when the caller does not specify one
pub const ADDRTYPE_SMTP: &str = "SMTP";

// Storage and stream naming (MS-OXMSG section 2.2)
/// Prefix of a variable-length property stream
pub const SUBSTG_PREFIX: &str = "__substg1.0_";
/// Name of the per-storage property table stream
pub const PROPERTIES_STREAM: &str = "__properties_version1.0";
/// Prefix of a recipient storage, followed by an 8-hex index
pub const RECIP_STORAGE_PREFIX: &str = "__recip_version1.0_#";
/// Prefix of an attachment storage, followed by an 8-hex index
pub const ATTACH_STORAGE_PREFIX: &str = "__attach_version1.0_#";
/// Name of the named-property map storage
pub const NAMEID_STORAGE: &str = "__nameid_version1.0";
