//! Metadata store trait and SQLite implementation.

use crate::error::{MetadataError, MetadataResult};
use crate::repos::{EmailRepo, MailboxRepo};
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// Combined metadata store trait.
#[async_trait]
pub trait MailStore: MailboxRepo + EmailRepo + Send + Sync {
    /// Apply the database schema.
    async fn migrate(&self) -> MetadataResult<()>;

    /// Check database connectivity and health.
    async fn health_check(&self) -> MetadataResult<()>;
}

/// SQLite-based metadata store.
pub struct SqliteStore {
    pool: Pool<Sqlite>,
}

impl SqliteStore {
    /// Create a new SQLite store, applying the schema.
    pub async fn new(path: impl AsRef<Path>) -> MetadataResult<Self> {
        let path = path.as_ref();

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| MetadataError::Config(format!("cannot create {parent:?}: {e}")))?;
        }

        let opts = SqliteConnectOptions::from_str(&format!("sqlite:{}?mode=rwc", path.display()))?
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
            .foreign_keys(true)
            // Prevent transient "database is locked" errors under concurrent access.
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            // SQLite permits limited write concurrency; a single connection avoids
            // persistent "database is locked" failures under axum concurrency.
            .max_connections(1)
            .connect_with(opts)
            .await?;

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }
}

#[async_trait]
impl MailStore for SqliteStore {
    async fn migrate(&self) -> MetadataResult<()> {
        sqlx::query(SCHEMA_SQL).execute(&self.pool).await?;
        Ok(())
    }

    async fn health_check(&self) -> MetadataResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

// Implement the repository traits for SqliteStore
mod sqlite_impl {
    use super::*;
    use crate::models::{EmailRow, MailboxRow};
    use crate::repos::EmailPage;
    use uuid::Uuid;

    #[async_trait]
    impl MailboxRepo for SqliteStore {
        async fn create_mailbox(&self, mailbox: &MailboxRow) -> MetadataResult<()> {
            sqlx::query(
                "INSERT INTO mailboxes (mailbox_id, address, created_at, expires_at, is_active) \
                 VALUES (?, ?, ?, ?, ?)",
            )
            .bind(mailbox.mailbox_id)
            .bind(&mailbox.address)
            .bind(mailbox.created_at)
            .bind(mailbox.expires_at)
            .bind(mailbox.is_active)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                MetadataError::from_sqlx(e, &format!("address '{}'", mailbox.address))
            })?;
            Ok(())
        }

        async fn get_mailbox(&self, mailbox_id: Uuid) -> MetadataResult<Option<MailboxRow>> {
            let row =
                sqlx::query_as::<_, MailboxRow>("SELECT * FROM mailboxes WHERE mailbox_id = ?")
                    .bind(mailbox_id)
                    .fetch_optional(&self.pool)
                    .await?;
            Ok(row)
        }

        async fn get_mailbox_by_address(
            &self,
            address: &str,
        ) -> MetadataResult<Option<MailboxRow>> {
            let row = sqlx::query_as::<_, MailboxRow>("SELECT * FROM mailboxes WHERE address = ?")
                .bind(address)
                .fetch_optional(&self.pool)
                .await?;
            Ok(row)
        }

        async fn list_mailboxes(&self) -> MetadataResult<Vec<MailboxRow>> {
            let rows = sqlx::query_as::<_, MailboxRow>(
                "SELECT * FROM mailboxes WHERE is_active = 1 ORDER BY created_at DESC, address",
            )
            .fetch_all(&self.pool)
            .await?;
            Ok(rows)
        }

        async fn delete_mailbox(&self, mailbox_id: Uuid) -> MetadataResult<()> {
            let result = sqlx::query("DELETE FROM mailboxes WHERE mailbox_id = ?")
                .bind(mailbox_id)
                .execute(&self.pool)
                .await?;
            if result.rows_affected() == 0 {
                return Err(MetadataError::NotFound(format!(
                    "mailbox_id {mailbox_id} not found"
                )));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl EmailRepo for SqliteStore {
        async fn create_email(&self, email: &EmailRow) -> MetadataResult<()> {
            sqlx::query(
                r#"
                INSERT INTO emails (
                    email_id, mailbox_id, from_address, from_name, subject,
                    html_body, text_body, received_at, is_read
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(email.email_id)
            .bind(email.mailbox_id)
            .bind(&email.from_address)
            .bind(&email.from_name)
            .bind(&email.subject)
            .bind(&email.html_body)
            .bind(&email.text_body)
            .bind(email.received_at)
            .bind(email.is_read)
            .execute(&self.pool)
            .await?;
            Ok(())
        }

        async fn get_email(&self, email_id: Uuid) -> MetadataResult<Option<EmailRow>> {
            let row = sqlx::query_as::<_, EmailRow>("SELECT * FROM emails WHERE email_id = ?")
                .bind(email_id)
                .fetch_optional(&self.pool)
                .await?;
            Ok(row)
        }

        async fn mark_email_read(&self, email_id: Uuid) -> MetadataResult<()> {
            let result = sqlx::query("UPDATE emails SET is_read = 1 WHERE email_id = ?")
                .bind(email_id)
                .execute(&self.pool)
                .await?;
            if result.rows_affected() == 0 {
                return Err(MetadataError::NotFound(format!(
                    "email_id {email_id} not found"
                )));
            }
            Ok(())
        }

        async fn list_emails(
            &self,
            mailbox_id: Uuid,
            limit: u32,
            offset: u32,
        ) -> MetadataResult<EmailPage> {
            let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM emails WHERE mailbox_id = ?")
                .bind(mailbox_id)
                .fetch_one(&self.pool)
                .await?;

            let emails = sqlx::query_as::<_, EmailRow>(
                "SELECT * FROM emails WHERE mailbox_id = ? \
                 ORDER BY received_at DESC, email_id LIMIT ? OFFSET ?",
            )
            .bind(mailbox_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

            Ok(EmailPage {
                emails,
                total: total as u64,
            })
        }
    }
}

const SCHEMA_SQL: &str = r#"
-- Mailboxes
CREATE TABLE IF NOT EXISTS mailboxes (
    mailbox_id BLOB PRIMARY KEY,
    address TEXT NOT NULL UNIQUE,
    created_at TEXT NOT NULL,
    -- Present for future retention; written as NULL and never read.
    expires_at TEXT,
    is_active INTEGER NOT NULL DEFAULT 1
);
CREATE INDEX IF NOT EXISTS idx_mailboxes_created ON mailboxes(created_at);

-- Emails
CREATE TABLE IF NOT EXISTS emails (
    email_id BLOB PRIMARY KEY,
    mailbox_id BLOB NOT NULL REFERENCES mailboxes(mailbox_id) ON DELETE CASCADE,
    from_address TEXT NOT NULL,
    from_name TEXT,
    subject TEXT,
    html_body TEXT,
    text_body TEXT,
    received_at TEXT NOT NULL,
    is_read INTEGER NOT NULL DEFAULT 0
);
CREATE INDEX IF NOT EXISTS idx_emails_mailbox_received ON emails(mailbox_id, received_at DESC);
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EmailRow, MailboxRow};
    use time::OffsetDateTime;
    use uuid::Uuid;

    async fn test_store() -> (tempfile::TempDir, SqliteStore) {
        let temp = tempfile::tempdir().unwrap();
        let store = SqliteStore::new(temp.path().join("metadata.db"))
            .await
            .unwrap();
        (temp, store)
    }

    fn mailbox(address: &str) -> MailboxRow {
        MailboxRow {
            mailbox_id: Uuid::new_v4(),
            address: address.to_string(),
            created_at: OffsetDateTime::now_utc(),
            expires_at: None,
            is_active: true,
        }
    }

    fn email(mailbox_id: Uuid, subject: &str, received_at: OffsetDateTime) -> EmailRow {
        EmailRow {
            email_id: Uuid::new_v4(),
            mailbox_id,
            from_address: "sender@example.com".to_string(),
            from_name: Some("Sender".to_string()),
            subject: Some(subject.to_string()),
            html_body: Some("<p>hi</p>".to_string()),
            text_body: Some("hi".to_string()),
            received_at,
            is_read: false,
        }
    }

    #[tokio::test]
    async fn mailbox_roundtrip() {
        let (_temp, store) = test_store().await;
        let row = mailbox("abc@drift.test");
        store.create_mailbox(&row).await.unwrap();

        let by_id = store.get_mailbox(row.mailbox_id).await.unwrap().unwrap();
        assert_eq!(by_id.address, "abc@drift.test");
        assert!(by_id.is_active);
        assert!(by_id.expires_at.is_none());

        let by_address = store
            .get_mailbox_by_address("abc@drift.test")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_address.mailbox_id, row.mailbox_id);
    }

    #[tokio::test]
    async fn duplicate_address_is_already_exists() {
        let (_temp, store) = test_store().await;
        store.create_mailbox(&mailbox("dup@drift.test")).await.unwrap();

        let err = store
            .create_mailbox(&mailbox("dup@drift.test"))
            .await
            .unwrap_err();
        assert!(matches!(err, MetadataError::AlreadyExists(_)), "{err}");
    }

    #[tokio::test]
    async fn list_mailboxes_newest_first() {
        let (_temp, store) = test_store().await;
        let now = OffsetDateTime::now_utc();

        let mut older = mailbox("older@drift.test");
        older.created_at = now - time::Duration::hours(1);
        let newer = mailbox("newer@drift.test");
        store.create_mailbox(&older).await.unwrap();
        store.create_mailbox(&newer).await.unwrap();

        let listed = store.list_mailboxes().await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].address, "newer@drift.test");
        assert_eq!(listed[1].address, "older@drift.test");
    }

    #[tokio::test]
    async fn delete_mailbox_cascades_to_emails() {
        let (_temp, store) = test_store().await;
        let row = mailbox("gone@drift.test");
        store.create_mailbox(&row).await.unwrap();

        let msg = email(row.mailbox_id, "hello", OffsetDateTime::now_utc());
        store.create_email(&msg).await.unwrap();

        store.delete_mailbox(row.mailbox_id).await.unwrap();
        assert!(store.get_mailbox(row.mailbox_id).await.unwrap().is_none());
        assert!(store.get_email(msg.email_id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_missing_mailbox_is_not_found() {
        let (_temp, store) = test_store().await;
        let err = store.delete_mailbox(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, MetadataError::NotFound(_)));
    }

    #[tokio::test]
    async fn list_emails_pages_newest_first() {
        let (_temp, store) = test_store().await;
        let row = mailbox("inbox@drift.test");
        store.create_mailbox(&row).await.unwrap();

        let now = OffsetDateTime::now_utc();
        for i in 0..5 {
            let msg = email(
                row.mailbox_id,
                &format!("message {i}"),
                now - time::Duration::minutes(i),
            );
            store.create_email(&msg).await.unwrap();
        }

        let page = store.list_emails(row.mailbox_id, 2, 0).await.unwrap();
        assert_eq!(page.total, 5);
        assert_eq!(page.emails.len(), 2);
        assert_eq!(page.emails[0].subject.as_deref(), Some("message 0"));
        assert_eq!(page.emails[1].subject.as_deref(), Some("message 1"));

        let last = store.list_emails(row.mailbox_id, 2, 4).await.unwrap();
        assert_eq!(last.emails.len(), 1);
        assert_eq!(last.emails[0].subject.as_deref(), Some("message 4"));
    }

    #[tokio::test]
    async fn mark_email_read() {
        let (_temp, store) = test_store().await;
        let row = mailbox("read@drift.test");
        store.create_mailbox(&row).await.unwrap();

        let msg = email(row.mailbox_id, "unread", OffsetDateTime::now_utc());
        store.create_email(&msg).await.unwrap();
        assert!(!store.get_email(msg.email_id).await.unwrap().unwrap().is_read);

        store.mark_email_read(msg.email_id).await.unwrap();
        assert!(store.get_email(msg.email_id).await.unwrap().unwrap().is_read);

        let err = store.mark_email_read(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, MetadataError::NotFound(_)));
    }
}
