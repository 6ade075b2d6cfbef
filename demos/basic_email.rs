use chrono::Utc;
use longan::msg::{Attachment, Message, RecipientKind};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Basic MSG Creation ===\n");

    let mut msg = Message::new();
    msg.set_subject("Project status update");
    msg.set_sender("alice@example.com", Some("Alice Johnson"), None)?;
    msg.add_recipient("bob@example.com", Some("Bob Smith"), RecipientKind::To)?;
    msg.add_recipient("carol@example.com", Some("Carol"), RecipientKind::Cc)?;
    msg.set_body_text(
        "Hi Bob,\n\nThe milestone is on track. Full notes attached.\n\n-- Alice",
    );
    msg.add_attachment(
        Attachment::new("notes.txt", b"Milestone notes\n".to_vec())
            .with_mime_type("text/plain"),
    )?;
    msg.set_internet_headers("<status-001@example.com>", Utc::now())?;

    msg.save("status_update.msg", Utc::now())?;
    println!("Wrote status_update.msg");

    Ok(())
}
