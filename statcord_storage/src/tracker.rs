use anyhow::Result;
use chrono::{DateTime, Utc};
use log::debug;

use crate::{CommandRecord, Counter, MessageCipher, MessageLogEntry, Storage};

const IMAGE_EXTENSIONS: [&str; 3] = [".jpg", ".png", ".gif"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentRef {
    pub filename: String,
    pub url: String,
}

/// The parts of an inbound chat message that usage tracking cares about.
#[derive(Debug, Clone)]
pub struct InboundMessage {
    pub id: u64,
    pub author_id: u64,
    pub author_is_bot: bool,
    pub channel_id: u64,
    pub guild_id: Option<u64>,
    pub created_at: DateTime<Utc>,
    pub content: String,
    pub attachments: Vec<AttachmentRef>,
}

/// URL of the first attachment, if that attachment is an image.
///
/// Only the first attachment is ever considered.
pub fn image_attachment_url(attachments: &[AttachmentRef]) -> Option<&str> {
    let first = attachments.first()?;
    let filename = first.filename.to_ascii_lowercase();

    IMAGE_EXTENSIONS
        .iter()
        .any(|ext| filename.ends_with(ext))
        .then_some(first.url.as_str())
}

/// Counts messages and commands, and keeps the encrypted message log.
#[derive(Clone)]
pub struct UsageTracker {
    storage: Storage,
    cipher: MessageCipher,
}

impl UsageTracker {
    pub fn new(storage: Storage, cipher: MessageCipher) -> Self {
        Self { storage, cipher }
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    /// Count the message, then log it unless it was sent by a bot or outside of a guild.
    pub async fn on_message(&self, message: &InboundMessage) -> Result<Option<MessageLogEntry>> {
        self.storage.increment(Counter::Messages).await?;

        let Some(guild_id) = message.guild_id else {
            return Ok(None);
        };

        if message.author_is_bot {
            return Ok(None);
        }

        let entry = MessageLogEntry::new(
            message.id,
            message.author_id,
            message.channel_id,
            guild_id,
            message.created_at,
            self.cipher.encrypt(&message.content)?,
            image_attachment_url(&message.attachments).map(str::to_string),
        );

        self.storage.insert_message(&entry).await?;

        Ok(Some(entry))
    }

    pub async fn on_command_completed(&self, record: &CommandRecord) -> Result<()> {
        self.storage.increment(Counter::Commands).await?;
        self.storage.insert_command(record).await?;

        debug!("Recorded completed command '{}'", record.name);

        Ok(())
    }

    pub async fn sweep_expired(&self, now: DateTime<Utc>) -> Result<u64> {
        let removed = self.storage.delete_expired_messages(now).await?;

        debug!("Removed {removed} expired message log entries");

        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::test_storage;
    use chrono::Duration;
    use pretty_assertions::assert_eq;

    fn tracker(storage: Storage) -> UsageTracker {
        UsageTracker::new(storage, MessageCipher::new(&MessageCipher::generate_key()))
    }

    fn message(id: u64) -> InboundMessage {
        InboundMessage {
            id,
            author_id: 42,
            author_is_bot: false,
            channel_id: 7,
            guild_id: Some(1),
            created_at: Utc::now(),
            content: "hello".to_string(),
            attachments: Vec::new(),
        }
    }

    fn attachment(filename: &str) -> AttachmentRef {
        AttachmentRef {
            filename: filename.to_string(),
            url: format!("https://cdn.example/{filename}"),
        }
    }

    #[test]
    fn only_first_attachment_is_considered() {
        assert_eq!(image_attachment_url(&[]), None);
        assert_eq!(image_attachment_url(&[attachment("photo.bmp")]), None);
        assert_eq!(
            image_attachment_url(&[attachment("photo.bmp"), attachment("second.png")]),
            None
        );
        assert_eq!(
            image_attachment_url(&[attachment("cat.PNG"), attachment("x.txt")]),
            Some("https://cdn.example/cat.PNG")
        );
        assert_eq!(
            image_attachment_url(&[attachment("a.gif")]),
            Some("https://cdn.example/a.gif")
        );
    }

    #[tokio::test]
    async fn bot_message_is_counted_but_not_logged() {
        let (_dir, storage) = test_storage().await;
        let tracker = tracker(storage.clone());

        let mut msg = message(1);
        msg.author_is_bot = true;

        assert_eq!(tracker.on_message(&msg).await.unwrap(), None);
        assert_eq!(storage.counter(Counter::Messages).await.unwrap(), 1);
        assert_eq!(storage.message(1).await.unwrap(), None);
    }

    #[tokio::test]
    async fn direct_message_is_counted_but_not_logged() {
        let (_dir, storage) = test_storage().await;
        let tracker = tracker(storage.clone());

        let mut msg = message(2);
        msg.guild_id = None;

        assert_eq!(tracker.on_message(&msg).await.unwrap(), None);
        assert_eq!(storage.counter(Counter::Messages).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn guild_message_is_logged_encrypted() {
        let (_dir, storage) = test_storage().await;
        let cipher = MessageCipher::new(&MessageCipher::generate_key());
        let tracker = UsageTracker::new(storage.clone(), cipher.clone());

        let mut msg = message(3);
        msg.attachments = vec![attachment("photo.bmp")];

        let entry = tracker.on_message(&msg).await.unwrap().expect("message is logged");
        assert_eq!(entry.attachment, None);
        assert_ne!(entry.content, "hello");
        assert_eq!(cipher.decrypt(&entry.content).unwrap(), "hello");
        assert_eq!(entry.expiry - entry.created_at, Duration::days(14));

        let stored = storage.message(3).await.unwrap().expect("row exists");
        assert_eq!(stored.expiry - stored.created_at, Duration::days(14));
        assert_eq!(stored.attachment, None);
    }

    #[tokio::test]
    async fn completed_command_counts_and_records() {
        let (_dir, storage) = test_storage().await;
        let tracker = tracker(storage.clone());

        let record = CommandRecord {
            name: "wsping".to_string(),
            invoked_at: Utc::now(),
            guild_id: None,
            user_id: 42,
            channel_id: 7,
        };
        tracker.on_command_completed(&record).await.unwrap();
        tracker.on_command_completed(&record).await.unwrap();

        assert_eq!(storage.counter(Counter::Commands).await.unwrap(), 2);
        assert_eq!(storage.top_commands(3).await.unwrap()[0].count, 2);
    }

    #[tokio::test]
    async fn sweep_removes_only_expired_entries() {
        let (_dir, storage) = test_storage().await;
        let tracker = tracker(storage.clone());

        let mut old = message(4);
        old.created_at = Utc::now() - Duration::days(20);
        tracker.on_message(&old).await.unwrap();
        tracker.on_message(&message(5)).await.unwrap();

        assert_eq!(tracker.sweep_expired(Utc::now()).await.unwrap(), 1);
        assert_eq!(tracker.sweep_expired(Utc::now()).await.unwrap(), 0);
        assert!(storage.message(5).await.unwrap().is_some());
    }
}
