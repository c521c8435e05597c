//! # Client Repository
//!
//! Database operations for clients.
//!
//! Every successful write publishes a [`ChangeEvent`] on the shared feed.
//! Deleting a client leaves its quotations in place: their `client_id`
//! becomes NULL and the snapshot copied at save time stays.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::changes::{ChangeEvent, ChangeFeed, ChangeKind, Table};
use crate::error::{DbError, DbResult};
use prequote_core::validation::validate_client;
use prequote_core::{Client, ClientInput};

/// Repository for client database operations.
#[derive(Debug, Clone)]
pub struct ClientRepository {
    pool: SqlitePool,
    changes: ChangeFeed,
}

#[derive(Debug, sqlx::FromRow)]
struct ClientRow {
    id: String,
    name: String,
    brand: Option<String>,
    email: Option<String>,
    our_ref: Option<String>,
    client_ref: Option<String>,
    description: Option<String>,
    sample_size: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ClientRow> for Client {
    fn from(row: ClientRow) -> Self {
        Client {
            id: row.id,
            name: row.name,
            brand: row.brand,
            email: row.email,
            our_ref: row.our_ref,
            client_ref: row.client_ref,
            description: row.description,
            sample_size: row.sample_size,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const SELECT_CLIENT: &str = r#"
    SELECT id, name, brand, email, our_ref, client_ref, description, sample_size,
           created_at, updated_at
    FROM clients
"#;

/// Trims optional text, turning blanks into NULL.
fn blank_to_none(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

impl ClientRepository {
    /// Creates a new ClientRepository.
    pub fn new(pool: SqlitePool, changes: ChangeFeed) -> Self {
        ClientRepository { pool, changes }
    }

    /// Lists all clients ordered by name.
    pub async fn list(&self) -> DbResult<Vec<Client>> {
        let rows: Vec<ClientRow> =
            sqlx::query_as(&format!("{SELECT_CLIENT} ORDER BY name COLLATE NOCASE, id"))
                .fetch_all(&self.pool)
                .await?;

        debug!(count = rows.len(), "Listed clients");
        Ok(rows.into_iter().map(Client::from).collect())
    }

    /// Gets a client by ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Client))` - Client found
    /// * `Ok(None)` - Client not found
    pub async fn get(&self, id: &str) -> DbResult<Option<Client>> {
        let row: Option<ClientRow> = sqlx::query_as(&format!("{SELECT_CLIENT} WHERE id = ?1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Client::from))
    }

    /// Creates a client with a fresh ID.
    ///
    /// ## Returns
    /// * `Ok(Client)` - The stored client
    /// * `Err(DbError::Rejected)` - Missing name or malformed email
    pub async fn create(&self, input: &ClientInput) -> DbResult<Client> {
        self.insert(&Uuid::new_v4().to_string(), input).await
    }

    async fn insert(&self, id: &str, input: &ClientInput) -> DbResult<Client> {
        validate_client(input)?;
        let now = Utc::now();

        debug!(id = %id, name = %input.name, "Creating client");

        sqlx::query(
            r#"
            INSERT INTO clients (
                id, name, brand, email, our_ref, client_ref, description, sample_size,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?9)
            "#,
        )
        .bind(id)
        .bind(input.name.trim())
        .bind(blank_to_none(&input.brand))
        .bind(blank_to_none(&input.email))
        .bind(blank_to_none(&input.our_ref))
        .bind(blank_to_none(&input.client_ref))
        .bind(blank_to_none(&input.description))
        .bind(blank_to_none(&input.sample_size))
        .bind(now)
        .execute(&self.pool)
        .await?;

        self.changes
            .publish(ChangeEvent::new(Table::Clients, ChangeKind::Created, id));

        self.get(id)
            .await?
            .ok_or_else(|| DbError::not_found("Client", id))
    }

    /// Overwrites every field of an existing client.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - No client with this ID
    pub async fn update(&self, id: &str, input: &ClientInput) -> DbResult<Client> {
        validate_client(input)?;

        debug!(id = %id, "Updating client");

        let result = sqlx::query(
            r#"
            UPDATE clients SET
                name = ?2, brand = ?3, email = ?4, our_ref = ?5, client_ref = ?6,
                description = ?7, sample_size = ?8, updated_at = ?9
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(input.name.trim())
        .bind(blank_to_none(&input.brand))
        .bind(blank_to_none(&input.email))
        .bind(blank_to_none(&input.our_ref))
        .bind(blank_to_none(&input.client_ref))
        .bind(blank_to_none(&input.description))
        .bind(blank_to_none(&input.sample_size))
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Client", id));
        }

        self.changes
            .publish(ChangeEvent::new(Table::Clients, ChangeKind::Updated, id));

        self.get(id)
            .await?
            .ok_or_else(|| DbError::not_found("Client", id))
    }

    /// Full-record upsert.
    ///
    /// Updates when `id` names an existing client, otherwise creates one
    /// (keeping the given `id` if there is one).
    ///
    /// ## Returns
    /// The client's ID.
    pub async fn upsert(&self, id: Option<&str>, input: &ClientInput) -> DbResult<String> {
        let client = match id {
            Some(id) if self.exists(id).await? => self.update(id, input).await?,
            Some(id) => self.insert(id, input).await?,
            None => self.create(input).await?,
        };
        Ok(client.id)
    }

    /// Deletes a client by ID.
    ///
    /// Quotations that referenced the client keep their snapshot and lose
    /// the `client_id` (`ON DELETE SET NULL`). Each of them is announced as
    /// an updated quotation after the commit.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - No client with this ID
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting client");

        let mut tx = self.pool.begin().await?;

        let detached: Vec<String> =
            sqlx::query_scalar("SELECT id FROM quotations WHERE client_id = ?1 ORDER BY id")
                .bind(id)
                .fetch_all(&mut *tx)
                .await?;

        let result = sqlx::query("DELETE FROM clients WHERE id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Client", id));
        }

        tx.commit().await?;

        self.changes
            .publish(ChangeEvent::new(Table::Clients, ChangeKind::Deleted, id));
        for quotation_id in detached {
            self.changes.publish(ChangeEvent::new(
                Table::Quotations,
                ChangeKind::Updated,
                quotation_id,
            ));
        }
        Ok(())
    }

    /// Counts stored clients.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM clients")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn exists(&self, id: &str) -> DbResult<bool> {
        let found: Option<i64> = sqlx::query_scalar("SELECT 1 FROM clients WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(found.is_some())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::changes::{ChangeKind, FeedMessage, Table};
    use crate::error::DbError;
    use crate::{Database, DbConfig};
    use chrono::NaiveDate;
    use prequote_core::{ClientInput, QuotationInput};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 14).unwrap()
    }

    fn input(name: &str) -> ClientInput {
        ClientInput {
            name: name.to_string(),
            brand: Some("  ".to_string()),
            email: Some("buyer@example.com".to_string()),
            ..ClientInput::default()
        }
    }

    async fn db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let db = db().await;
        let created = db.clients().create(&input("Acme")).await.unwrap();

        let fetched = db.clients().get(&created.id).await.unwrap().unwrap();
        assert_eq!(fetched, created);
        assert_eq!(fetched.brand, None);
        assert_eq!(fetched.email.as_deref(), Some("buyer@example.com"));
    }

    #[tokio::test]
    async fn test_list_is_ordered_by_name() {
        let db = db().await;
        for name in ["zeta", "Alpha", "beta"] {
            db.clients().create(&input(name)).await.unwrap();
        }
        let names: Vec<String> = db
            .clients()
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Alpha", "beta", "zeta"]);
    }

    #[tokio::test]
    async fn test_blank_name_is_rejected_without_write() {
        let db = db().await;
        let err = db.clients().create(&input("   ")).await.unwrap_err();
        assert!(matches!(err, DbError::Rejected(_)));
        assert_eq!(db.clients().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_upsert_creates_then_updates() {
        let db = db().await;
        let id = db.clients().upsert(None, &input("Acme")).await.unwrap();
        let same = db
            .clients()
            .upsert(Some(&id), &input("Acme Textiles"))
            .await
            .unwrap();
        assert_eq!(id, same);
        assert_eq!(db.clients().count().await.unwrap(), 1);
        assert_eq!(
            db.clients().get(&id).await.unwrap().unwrap().name,
            "Acme Textiles"
        );

        let explicit = db
            .clients()
            .upsert(Some("client-fixed-id"), &input("Other"))
            .await
            .unwrap();
        assert_eq!(explicit, "client-fixed-id");
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let db = db().await;
        let err = db.clients().update("nope", &input("Acme")).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete_publishes_and_is_not_repeatable() {
        let db = db().await;
        let client = db.clients().create(&input("Acme")).await.unwrap();
        let mut sub = db.subscribe();

        db.clients().delete(&client.id).await.unwrap();
        assert!(matches!(
            sub.recv().await,
            Some(FeedMessage::Change(e)) if e.kind == ChangeKind::Deleted && e.id == client.id
        ));

        let err = db.clients().delete(&client.id).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete_announces_detached_quotations() {
        let db = db().await;
        let client = db.clients().create(&input("Acme")).await.unwrap();

        let mut linked = QuotationInput::default();
        linked.client.name = "Acme".to_string();
        linked.client_id = Some(client.id.clone());
        let quotation = db.quotations().create(&linked, today()).await.unwrap();

        let mut unlinked = QuotationInput::default();
        unlinked.client.name = "Other".to_string();
        db.quotations().create(&unlinked, today()).await.unwrap();

        let mut sub = db.subscribe();
        db.clients().delete(&client.id).await.unwrap();

        match sub.recv().await {
            Some(FeedMessage::Change(e)) => {
                assert_eq!((e.table, e.kind), (Table::Clients, ChangeKind::Deleted));
            }
            other => panic!("unexpected {other:?}"),
        }
        match sub.recv().await {
            Some(FeedMessage::Change(e)) => {
                assert_eq!((e.table, e.kind), (Table::Quotations, ChangeKind::Updated));
                assert_eq!(e.id, quotation.id);
            }
            other => panic!("unexpected {other:?}"),
        }

        // the unlinked quotation is not announced
        db.clients().create(&input("Next")).await.unwrap();
        match sub.recv().await {
            Some(FeedMessage::Change(e)) => assert_eq!(e.table, Table::Clients),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_failed_write_publishes_nothing() {
        let db = db().await;
        let mut sub = db.subscribe();
        let _ = db.clients().update("nope", &input("Acme")).await;
        db.clients().create(&input("Real")).await.unwrap();

        match sub.recv().await {
            Some(FeedMessage::Change(e)) => assert_eq!(e.kind, ChangeKind::Created),
            other => panic!("unexpected {other:?}"),
        }
    }
}
