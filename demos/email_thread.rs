use chrono::Utc;
use longan::msg::{Message, RecipientKind};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Threaded Conversation ===\n");

    let now = Utc::now();

    // Root of the thread
    let mut original = Message::new();
    original.set_subject("Planning the offsite");
    original.set_sender("alice@example.com", Some("Alice"), None)?;
    original.add_recipient("bob@example.com", Some("Bob"), RecipientKind::To)?;
    original.set_body_text("Thoughts on dates for the offsite?");
    original.start_conversation(now);
    original.save("thread_1.msg", now)?;
    println!("Wrote thread_1.msg");

    // Reply: same conversation index extended by a response block, so
    // Outlook groups the two messages into one thread
    let parent_index = original
        .conversation_index()
        .expect("conversation started above")
        .to_vec();

    let later = now + chrono::Duration::hours(4);
    let mut reply = Message::new();
    reply.set_subject("RE: Planning the offsite");
    reply.set_sender("bob@example.com", Some("Bob"), None)?;
    reply.add_recipient("alice@example.com", Some("Alice"), RecipientKind::To)?;
    reply.set_body_text("Second week of June works for me.");
    reply.reply_to(&parent_index, later)?;
    reply.save("thread_2.msg", later)?;
    println!("Wrote thread_2.msg");

    Ok(())
}
