mod cipher;
mod tracker;

pub use cipher::MessageCipher;
pub use tracker::{image_attachment_url, AttachmentRef, InboundMessage, UsageTracker};

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use sqlx::{
    migrate::Migrator,
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous},
    Row, SqlitePool,
};
use std::path::PathBuf;
use tokio::fs;

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

const DB_FILENAME: &str = "statcord.sqlite";

/// Named usage counters, one row each in the `stats` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Counter {
    Messages,
    Commands,
}

impl Counter {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Messages => "messages",
            Self::Commands => "commands",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageLogEntry {
    pub message_id: u64,
    pub author_id: u64,
    pub channel_id: u64,
    pub guild_id: u64,
    pub created_at: DateTime<Utc>,
    /// Encrypted message body
    pub content: String,
    pub attachment: Option<String>,
    pub expiry: DateTime<Utc>,
}

impl MessageLogEntry {
    pub fn new(
        message_id: u64,
        author_id: u64,
        channel_id: u64,
        guild_id: u64,
        created_at: DateTime<Utc>,
        content: String,
        attachment: Option<String>,
    ) -> Self {
        Self {
            message_id,
            author_id,
            channel_id,
            guild_id,
            created_at,
            content,
            attachment,
            expiry: created_at + Duration::days(statcord_config::MESSAGE_LOG_TTL_DAYS),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRecord {
    pub name: String,
    pub invoked_at: DateTime<Utc>,
    pub guild_id: Option<u64>,
    pub user_id: u64,
    pub channel_id: u64,
}

/// A key together with how many command invocations it accounts for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ranked<K> {
    pub key: K,
    pub count: i64,
}

#[derive(Clone)]
pub struct Storage {
    data_dir: PathBuf,
    pool: SqlitePool,
}

impl Storage {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();

        let options = SqliteConnectOptions::new()
            .filename(data_dir.join(DB_FILENAME))
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(std::time::Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_lazy_with(options);

        Self { data_dir, pool }
    }

    pub async fn init(&self) -> Result<()> {
        fs::create_dir_all(&self.data_dir)
            .await
            .context("Failed to create data directory")?;

        MIGRATOR
            .run(&self.pool)
            .await
            .context("Failed to run database migrations")?;

        Ok(())
    }

    /// Insert the counter with a value of 1, or add 1 to the existing row.
    ///
    /// Returns the value after the increment.
    pub async fn increment(&self, counter: Counter) -> Result<i64> {
        let value = sqlx::query_scalar(
            r#"
INSERT INTO stats (item, value) VALUES (?, 1)
ON CONFLICT (item) DO UPDATE SET value = COALESCE(stats.value, 0) + 1
RETURNING value
            "#,
        )
        .bind(counter.as_str())
        .fetch_one(&self.pool)
        .await
        .with_context(|| format!("Failed to increment counter '{}'", counter.as_str()))?;

        Ok(value)
    }

    /// Current value of a counter, 0 if it was never incremented.
    pub async fn counter(&self, counter: Counter) -> Result<i64> {
        let value: Option<i64> = sqlx::query_scalar("SELECT value FROM stats WHERE item = ?")
            .bind(counter.as_str())
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("Failed to read counter '{}'", counter.as_str()))?;

        Ok(value.unwrap_or_default())
    }

    pub async fn insert_message(&self, entry: &MessageLogEntry) -> Result<()> {
        sqlx::query(
            r#"
INSERT INTO messages (mid, aid, cid, gid, ts, content, attachment, expiry)
VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(entry.message_id as i64)
        .bind(entry.author_id as i64)
        .bind(entry.channel_id as i64)
        .bind(entry.guild_id as i64)
        .bind(entry.created_at.timestamp())
        .bind(&entry.content)
        .bind(&entry.attachment)
        .bind(entry.expiry.timestamp())
        .execute(&self.pool)
        .await
        .context("Failed to insert message log entry")?;

        Ok(())
    }

    pub async fn message(&self, message_id: u64) -> Result<Option<MessageLogEntry>> {
        let row = sqlx::query(
            r#"
SELECT mid, aid, cid, gid, ts, content, attachment, expiry
FROM messages
WHERE mid = ?
            "#,
        )
        .bind(message_id as i64)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch message log entry")?;

        let Some(row) = row else {
            return Ok(None);
        };

        Ok(Some(MessageLogEntry {
            message_id: row.try_get::<i64, _>("mid")? as u64,
            author_id: row.try_get::<i64, _>("aid")? as u64,
            channel_id: row.try_get::<i64, _>("cid")? as u64,
            guild_id: row.try_get::<i64, _>("gid")? as u64,
            created_at: from_epoch_seconds(row.try_get("ts")?)?,
            content: row.try_get("content")?,
            attachment: row.try_get("attachment")?,
            expiry: from_epoch_seconds(row.try_get("expiry")?)?,
        }))
    }

    /// Delete every logged message whose expiry is at or before `now`.
    pub async fn delete_expired_messages(&self, now: DateTime<Utc>) -> Result<u64> {
        let result = sqlx::query("DELETE FROM messages WHERE expiry <= ?")
            .bind(now.timestamp())
            .execute(&self.pool)
            .await
            .context("Failed to delete expired messages")?;

        Ok(result.rows_affected())
    }

    pub async fn insert_command(&self, record: &CommandRecord) -> Result<()> {
        sqlx::query("INSERT INTO commands (name, ts, gid, uid, cid) VALUES (?, ?, ?, ?, ?)")
            .bind(&record.name)
            .bind(record.invoked_at.timestamp())
            .bind(record.guild_id.map(|id| id as i64))
            .bind(record.user_id as i64)
            .bind(record.channel_id as i64)
            .execute(&self.pool)
            .await
            .context("Failed to insert command record")?;

        Ok(())
    }

    pub async fn top_commands(&self, limit: u32) -> Result<Vec<Ranked<String>>> {
        let rows = sqlx::query(
            r#"
SELECT name, COUNT(*) AS count
FROM commands
GROUP BY name
ORDER BY count DESC, name ASC
LIMIT ?
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .context("Failed to rank commands")?;

        rows.into_iter()
            .map(|row| {
                Ok::<_, anyhow::Error>(Ranked {
                    key: row.try_get("name")?,
                    count: row.try_get("count")?,
                })
            })
            .collect()
    }

    pub async fn top_users(&self, limit: u32) -> Result<Vec<Ranked<u64>>> {
        let rows = sqlx::query(
            r#"
SELECT uid, COUNT(*) AS count
FROM commands
GROUP BY uid
ORDER BY count DESC, uid ASC
LIMIT ?
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .context("Failed to rank command users")?;

        rows.into_iter()
            .map(|row| {
                Ok::<_, anyhow::Error>(Ranked {
                    key: row.try_get::<i64, _>("uid")? as u64,
                    count: row.try_get("count")?,
                })
            })
            .collect()
    }

    /// Guilds ranked by command usage. Invocations outside of a guild are not counted.
    pub async fn top_guilds(&self, limit: u32) -> Result<Vec<Ranked<u64>>> {
        let rows = sqlx::query(
            r#"
SELECT gid, COUNT(*) AS count
FROM commands
WHERE gid IS NOT NULL
GROUP BY gid
ORDER BY count DESC, gid ASC
LIMIT ?
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .context("Failed to rank command guilds")?;

        rows.into_iter()
            .map(|row| {
                Ok::<_, anyhow::Error>(Ranked {
                    key: row.try_get::<i64, _>("gid")? as u64,
                    count: row.try_get("count")?,
                })
            })
            .collect()
    }
}

fn from_epoch_seconds(seconds: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp(seconds, 0).context("Stored timestamp is out of range")
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;
    use tokio::task::JoinSet;

    pub(crate) async fn test_storage() -> (TempDir, Storage) {
        let dir = tempfile::tempdir().expect("create temp dir");
        let storage = Storage::new(dir.path());
        storage.init().await.expect("initialize storage");
        (dir, storage)
    }

    fn record(name: &str, guild_id: Option<u64>, user_id: u64) -> CommandRecord {
        CommandRecord {
            name: name.to_string(),
            invoked_at: Utc::now(),
            guild_id,
            user_id,
            channel_id: 5,
        }
    }

    #[tokio::test]
    async fn missing_counter_reads_zero() {
        let (_dir, storage) = test_storage().await;

        assert_eq!(storage.counter(Counter::Messages).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn first_increment_inserts_one() {
        let (_dir, storage) = test_storage().await;

        assert_eq!(storage.increment(Counter::Commands).await.unwrap(), 1);
        assert_eq!(storage.counter(Counter::Commands).await.unwrap(), 1);
        assert_eq!(storage.counter(Counter::Messages).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn concurrent_increments_are_all_counted() {
        let (_dir, storage) = test_storage().await;

        let mut tasks = JoinSet::new();
        for _ in 0..25 {
            let storage = storage.clone();
            tasks.spawn(async move { storage.increment(Counter::Messages).await });
        }
        while let Some(result) = tasks.join_next().await {
            result.unwrap().unwrap();
        }

        assert_eq!(storage.counter(Counter::Messages).await.unwrap(), 25);

        let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM stats WHERE item = 'messages'")
            .fetch_one(&storage.pool)
            .await
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[tokio::test]
    async fn delete_expired_keeps_live_rows() {
        let (_dir, storage) = test_storage().await;
        let now = Utc::now();

        let old = MessageLogEntry::new(1, 2, 3, 4, now - Duration::days(15), "a".into(), None);
        let fresh = MessageLogEntry::new(10, 2, 3, 4, now - Duration::days(1), "b".into(), None);
        storage.insert_message(&old).await.unwrap();
        storage.insert_message(&fresh).await.unwrap();

        assert_eq!(storage.delete_expired_messages(now).await.unwrap(), 1);
        assert!(storage.message(1).await.unwrap().is_none());
        assert!(storage.message(10).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn message_roundtrips_through_table() {
        let (_dir, storage) = test_storage().await;
        let created_at = DateTime::from_timestamp(1_700_000_000, 0).unwrap();

        let entry = MessageLogEntry::new(
            99,
            1,
            2,
            3,
            created_at,
            "ciphertext".into(),
            Some("https://cdn.example/a.png".into()),
        );
        storage.insert_message(&entry).await.unwrap();

        assert_eq!(storage.message(99).await.unwrap(), Some(entry));
    }

    #[tokio::test]
    async fn rankings_are_ordered_by_count() {
        let (_dir, storage) = test_storage().await;

        for (name, guild, user) in [
            ("about", Some(1), 10),
            ("wsping", Some(1), 10),
            ("wsping", Some(2), 11),
            ("wsping", None, 12),
            ("profile", Some(2), 11),
            ("profile", Some(2), 11),
        ] {
            storage.insert_command(&record(name, guild, user)).await.unwrap();
        }

        let commands = storage.top_commands(3).await.unwrap();
        assert_eq!(
            commands,
            vec![
                Ranked { key: "wsping".to_string(), count: 3 },
                Ranked { key: "profile".to_string(), count: 2 },
                Ranked { key: "about".to_string(), count: 1 },
            ]
        );

        let users = storage.top_users(2).await.unwrap();
        assert_eq!(
            users,
            vec![Ranked { key: 11, count: 3 }, Ranked { key: 10, count: 2 }]
        );

        let guilds = storage.top_guilds(3).await.unwrap();
        assert_eq!(
            guilds,
            vec![Ranked { key: 2, count: 3 }, Ranked { key: 1, count: 2 }]
        );
    }
}
