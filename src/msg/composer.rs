//! Storage composer: message model to CFB directory tree
//!
//! Assembles the MS-OXMSG storage layout: the top-level property table
//! and variable-length streams, the named-property map, and one numbered
//! sub-storage per recipient and attachment. The resulting [`CfbWriter`]
//! holds the complete logical tree, ready to serialize.

use crate::cfb::CfbWriter;
use crate::msg::consts::*;
use crate::msg::error::Result;
use crate::msg::message::{split_subject, Attachment, Message, Recipient, RecipientKind};
use crate::msg::property::{PropertyBag, PropertyValue};
use crate::msg::property_stream::{self, StorageKind};
use chrono::{DateTime, Utc};

/// Build the complete CFB tree for a message
pub(crate) fn compose(msg: &Message, now: DateTime<Utc>) -> Result<CfbWriter> {
    let mut cfb = CfbWriter::new();

    // Top-level message properties
    let bag = message_bag(msg, now);
    let emitted = property_stream::emit(
        &bag,
        StorageKind::Message {
            recipient_count: msg.recipients.len() as u32,
            attachment_count: msg.attachments.len() as u32,
        },
        msg.codepage,
        msg.strict_encoding,
    )?;
    cfb.create_stream(&[PROPERTIES_STREAM], &emitted.table)?;
    for (name, body) in &emitted.streams {
        cfb.create_stream(&[name.as_str()], body)?;
    }

    // Named-property map: the minimal three empty streams (GUID, entry,
    // and string streams) readers expect even when no named property is
    // mapped
    cfb.create_storage(&[NAMEID_STORAGE])?;
    for suffix in ["00020102", "00030102", "00040102"] {
        let name = format!("{}{}", SUBSTG_PREFIX, suffix);
        cfb.create_stream(&[NAMEID_STORAGE, name.as_str()], b"")?;
    }

    // Recipient storages, numbered by insertion order
    for (index, recipient) in msg.recipients.iter().enumerate() {
        let storage = format!("{}{:08X}", RECIP_STORAGE_PREFIX, index);
        cfb.create_storage(&[storage.as_str()])?;

        let emitted = property_stream::emit(
            &recipient_bag(recipient, index as i32),
            StorageKind::RecipientOrAttachment,
            msg.codepage,
            msg.strict_encoding,
        )?;
        cfb.create_stream(&[storage.as_str(), PROPERTIES_STREAM], &emitted.table)?;
        for (name, body) in &emitted.streams {
            cfb.create_stream(&[storage.as_str(), name.as_str()], body)?;
        }
    }

    // Attachment storages, numbered by insertion order
    for (index, attachment) in msg.attachments.iter().enumerate() {
        let storage = format!("{}{:08X}", ATTACH_STORAGE_PREFIX, index);
        cfb.create_storage(&[storage.as_str()])?;

        let emitted = property_stream::emit(
            &attachment_bag(attachment, index as i32),
            StorageKind::RecipientOrAttachment,
            msg.codepage,
            msg.strict_encoding,
        )?;
        cfb.create_stream(&[storage.as_str(), PROPERTIES_STREAM], &emitted.table)?;
        for (name, body) in &emitted.streams {
            cfb.create_stream(&[storage.as_str(), name.as_str()], body)?;
        }
    }

    Ok(cfb)
}

/// Search key bytes: uppercase `TYPE:ADDRESS` with a trailing NUL
fn search_key(addr_type: &str, email: &str) -> Vec<u8> {
    let mut key = format!("{}:{}", addr_type, email).to_uppercase().into_bytes();
    key.push(0);
    key
}

/// Build the top-level message property bag
fn message_bag(msg: &Message, now: DateTime<Utc>) -> PropertyBag {
    let mut bag = PropertyBag::new();

    // Housekeeping defaults
    bag.set(
        PR_MESSAGE_CLASS,
        PropertyValue::Unicode(MESSAGE_CLASS_NOTE.to_string()),
    );
    bag.set(PR_IMPORTANCE, PropertyValue::Int32(1));
    bag.set(PR_PRIORITY, PropertyValue::Int32(0));
    bag.set(PR_SENSITIVITY, PropertyValue::Int32(0));
    bag.set(
        PR_STORE_SUPPORT_MASK,
        PropertyValue::Int32(STORE_UNICODE_OK),
    );
    bag.set(
        PR_MESSAGE_CODEPAGE,
        PropertyValue::Int32(msg.codepage as i32),
    );
    bag.set(PR_INTERNET_CPID, PropertyValue::Int32(65001));
    bag.set(PR_MESSAGE_LOCALE_ID, PropertyValue::Int32(LOCALE_EN_US));
    bag.set(PR_MSG_STATUS, PropertyValue::Int32(0));
    bag.set(PR_READ_RECEIPT_REQUESTED, PropertyValue::Bool(false));
    bag.set(
        PR_ORIGINATOR_DELIVERY_REPORT_REQUESTED,
        PropertyValue::Bool(false),
    );

    // Timestamps, all from the injected instant
    bag.set(PR_CLIENT_SUBMIT_TIME, PropertyValue::Time(now));
    bag.set(PR_MESSAGE_DELIVERY_TIME, PropertyValue::Time(now));
    bag.set(PR_CREATION_TIME, PropertyValue::Time(now));
    bag.set(PR_LAST_MODIFICATION_TIME, PropertyValue::Time(now));

    // Subject family
    let (prefix, normalized) = split_subject(&msg.subject);
    bag.set(PR_SUBJECT, PropertyValue::Unicode(msg.subject.clone()));
    bag.set(PR_SUBJECT_PREFIX, PropertyValue::Unicode(prefix));
    bag.set(
        PR_NORMALIZED_SUBJECT,
        PropertyValue::Unicode(normalized.clone()),
    );
    bag.set(PR_CONVERSATION_TOPIC, PropertyValue::Unicode(normalized));

    // Sender and the sent-representing mirror
    if let Some(sender) = &msg.sender {
        let key = search_key(&sender.addr_type, &sender.email);
        bag.set(
            PR_SENDER_NAME,
            PropertyValue::Unicode(sender.display_name.clone()),
        );
        bag.set(
            PR_SENDER_EMAIL_ADDRESS,
            PropertyValue::Unicode(sender.email.clone()),
        );
        bag.set(
            PR_SENDER_ADDRTYPE,
            PropertyValue::Unicode(sender.addr_type.clone()),
        );
        bag.set(PR_SENDER_SEARCH_KEY, PropertyValue::Binary(key.clone()));
        bag.set(
            PR_SENT_REPRESENTING_NAME,
            PropertyValue::Unicode(sender.display_name.clone()),
        );
        bag.set(
            PR_SENT_REPRESENTING_EMAIL_ADDRESS,
            PropertyValue::Unicode(sender.email.clone()),
        );
        bag.set(
            PR_SENT_REPRESENTING_ADDRTYPE,
            PropertyValue::Unicode(sender.addr_type.clone()),
        );
        bag.set(PR_SENT_REPRESENTING_SEARCH_KEY, PropertyValue::Binary(key));
    }

    // Bodies and the native-body hint
    if let Some(body) = &msg.body_text {
        bag.set(PR_BODY, PropertyValue::Unicode(body.clone()));
    }
    if let Some(html) = &msg.body_html {
        bag.set(PR_HTML, PropertyValue::Binary(html.clone()));
    }
    if msg.body_html.is_some() {
        bag.set(PR_NATIVE_BODY, PropertyValue::Int32(NATIVE_BODY_HTML));
    } else if msg.body_text.is_some() {
        bag.set(PR_NATIVE_BODY, PropertyValue::Int32(NATIVE_BODY_PLAIN));
    }

    // Display rollups
    for (id, kind) in [
        (PR_DISPLAY_TO, RecipientKind::To),
        (PR_DISPLAY_CC, RecipientKind::Cc),
        (PR_DISPLAY_BCC, RecipientKind::Bcc),
    ] {
        let names: Vec<&str> = msg
            .recipients
            .iter()
            .filter(|r| r.kind == kind)
            .map(|r| r.display_name.as_str())
            .collect();
        if !names.is_empty() {
            bag.set(id, PropertyValue::Unicode(names.join("; ")));
        }
    }

    // Threading
    if let Some(index) = &msg.conversation_index {
        bag.set(PR_CONVERSATION_INDEX, PropertyValue::Binary(index.clone()));
    }

    // Transport headers
    if let Some(headers) = &msg.transport_headers {
        bag.set(
            PR_TRANSPORT_MESSAGE_HEADERS,
            PropertyValue::Unicode(headers.clone()),
        );
    }
    if let Some(id) = &msg.internet_message_id {
        bag.set(PR_INTERNET_MESSAGE_ID, PropertyValue::Unicode(id.clone()));
    }

    // Caller-supplied extras override the defaults above
    bag.merge(&msg.extra);

    // Flags stay consistent with the attachment list and read state, even
    // against an extra property
    let mut flags = 0i32;
    if msg.read {
        flags |= MSGFLAG_READ;
    }
    if msg.unsent {
        flags |= MSGFLAG_UNSENT;
    }
    if !msg.attachments.is_empty() {
        flags |= MSGFLAG_HASATTACH;
    }
    bag.set(PR_MESSAGE_FLAGS, PropertyValue::Int32(flags));
    bag.set(
        PR_HASATTACH,
        PropertyValue::Bool(!msg.attachments.is_empty()),
    );

    bag
}

/// Build the property bag for one recipient row
fn recipient_bag(recipient: &Recipient, index: i32) -> PropertyBag {
    let mut bag = PropertyBag::new();

    bag.set(PR_OBJECT_TYPE, PropertyValue::Int32(MAPI_MAILUSER));
    bag.set(PR_DISPLAY_TYPE, PropertyValue::Int32(0));
    bag.set(
        PR_RECIPIENT_TYPE,
        PropertyValue::Int32(recipient.kind as i32),
    );
    bag.set(PR_ROWID, PropertyValue::Int32(index));
    bag.set(
        PR_DISPLAY_NAME,
        PropertyValue::Unicode(recipient.display_name.clone()),
    );
    bag.set(
        PR_ADDRTYPE,
        PropertyValue::Unicode(recipient.addr_type.clone()),
    );
    bag.set(
        PR_EMAIL_ADDRESS,
        PropertyValue::Unicode(recipient.email.clone()),
    );
    bag.set(
        PR_SEARCH_KEY,
        PropertyValue::Binary(search_key(&recipient.addr_type, &recipient.email)),
    );
    if recipient.addr_type == ADDRTYPE_SMTP {
        bag.set(
            PR_SMTP_ADDRESS,
            PropertyValue::Unicode(recipient.email.clone()),
        );
    }

    bag
}

/// Build the property bag for one attachment
fn attachment_bag(attachment: &Attachment, index: i32) -> PropertyBag {
    let mut bag = PropertyBag::new();

    bag.set(PR_OBJECT_TYPE, PropertyValue::Int32(MAPI_ATTACH));
    bag.set(
        PR_ATTACH_METHOD,
        PropertyValue::Int32(attachment.method as i32),
    );
    bag.set(PR_ATTACH_NUM, PropertyValue::Int32(index));
    bag.set(
        PR_ATTACH_SIZE,
        PropertyValue::Int32(attachment.data.len() as i32),
    );
    bag.set(
        PR_ATTACH_FILENAME,
        PropertyValue::Unicode(attachment.filename.clone()),
    );
    bag.set(
        PR_ATTACH_LONG_FILENAME,
        PropertyValue::Unicode(attachment.filename.clone()),
    );
    bag.set(
        PR_ATTACH_DATA_BIN,
        PropertyValue::Binary(attachment.data.clone()),
    );

    if let Some(dot) = attachment.filename.rfind('.') {
        let ext = &attachment.filename[dot..];
        if ext.len() > 1 {
            bag.set(PR_ATTACH_EXTENSION, PropertyValue::Unicode(ext.to_string()));
        }
    }

    if let Some(mime) = &attachment.mime_type {
        bag.set(PR_ATTACH_MIME_TAG, PropertyValue::Unicode(mime.clone()));
    }
    if let Some(content_id) = &attachment.content_id {
        bag.set(
            PR_ATTACH_CONTENT_ID,
            PropertyValue::Unicode(content_id.clone()),
        );
    }
    if attachment.inline {
        bag.set(PR_ATTACHMENT_FLAGS, PropertyValue::Int32(ATT_MHTML_REF));
        bag.set(PR_ATTACHMENT_HIDDEN, PropertyValue::Bool(true));
        bag.set(PR_RENDERING_POSITION, PropertyValue::Int32(-1));
    }

    bag
}
