//! # Quotation Repository
//!
//! Database operations for quotations and their line items.
//!
//! ## Save Path
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                  create(input, today) / update(id, input)               │
//! │                                                                         │
//! │  1. validate_quotation(input)     tiers > 0, linkage, image, client    │
//! │       │   (nothing written on failure)                                 │
//! │       ▼                                                                 │
//! │  2. BEGIN                                                              │
//! │       ├── create: sequences['quotation'] += 1  → code + reference      │
//! │       ├── INSERT / UPDATE quotations                                   │
//! │       ├── DELETE old line-item rows (update only)                      │
//! │       └── INSERT components, developments (position = list index)      │
//! │  3. COMMIT                                                             │
//! │       ▼                                                                 │
//! │  4. publish ChangeEvent                                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The sequence counter only ever increases, so deleting a quotation never
//! lets a later one reuse its code.

use std::collections::HashMap;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info};
use uuid::Uuid;

use crate::changes::{ChangeEvent, ChangeFeed, ChangeKind, Table};
use crate::error::{DbError, DbResult};
use prequote_core::codes::{quotation_code, quotation_reference};
use prequote_core::validation::validate_quotation;
use prequote_core::{
    ClientDetails, Component, Development, Language, LineItems, Quotation, QuotationInput,
};

/// Counter row that numbers quotations.
const QUOTATION_SEQUENCE: &str = "quotation";

/// Repository for quotation database operations.
#[derive(Debug, Clone)]
pub struct QuotationRepository {
    pool: SqlitePool,
    changes: ChangeFeed,
}

// =============================================================================
// Rows
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct QuotationRow {
    id: String,
    code: String,
    reference: String,
    date: NaiveDate,
    client_id: Option<String>,
    client_name: String,
    client_brand: Option<String>,
    client_email: Option<String>,
    client_our_ref: Option<String>,
    client_client_ref: Option<String>,
    client_description: Option<String>,
    client_sample_size: Option<String>,
    article_image: Option<String>,
    quantity_1: i64,
    quantity_2: i64,
    quantity_3: i64,
    margin_1: String,
    margin_2: String,
    margin_3: String,
    language: Language,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, sqlx::FromRow)]
struct ComponentRow {
    quotation_id: String,
    id: String,
    description: String,
    supplier: String,
    unit_price: String,
    consumption: String,
    has_moq: bool,
    moq_development_id: Option<String>,
    legacy_moq_quantity: Option<String>,
    legacy_moq_cost: Option<String>,
}

#[derive(Debug, sqlx::FromRow)]
struct DevelopmentRow {
    quotation_id: String,
    id: String,
    description: String,
    cost: String,
    supplier: Option<String>,
    is_from_moq: bool,
    source_component_id: Option<String>,
    moq_quantity: i64,
    include_in_subtotal: bool,
    show_in_pdf: bool,
}

fn decimal(entity: &str, field: &str, raw: &str) -> DbResult<Decimal> {
    Decimal::from_str(raw).map_err(|e| DbError::corrupt(entity, format!("{field} '{raw}': {e}")))
}

fn count(entity: &str, field: &str, raw: i64) -> DbResult<u32> {
    u32::try_from(raw).map_err(|_| DbError::corrupt(entity, format!("{field} out of range: {raw}")))
}

impl ComponentRow {
    fn into_component(self) -> DbResult<Component> {
        let legacy = |field: &str, raw: Option<String>| {
            raw.map(|r| decimal("component", field, &r)).transpose()
        };
        Ok(Component {
            unit_price: decimal("component", "unit_price", &self.unit_price)?,
            consumption: decimal("component", "consumption", &self.consumption)?,
            moq_quantity: legacy("legacy_moq_quantity", self.legacy_moq_quantity)?,
            moq_cost: legacy("legacy_moq_cost", self.legacy_moq_cost)?,
            id: self.id,
            description: self.description,
            supplier: self.supplier,
            has_moq: self.has_moq,
            moq_development_id: self.moq_development_id,
        })
    }
}

impl DevelopmentRow {
    fn into_development(self) -> DbResult<Development> {
        Ok(Development {
            cost: decimal("development", "cost", &self.cost)?,
            moq_quantity: count("development", "moq_quantity", self.moq_quantity)?,
            id: self.id,
            description: self.description,
            supplier: self.supplier,
            is_from_moq: self.is_from_moq,
            source_component_id: self.source_component_id,
            include_in_subtotal: self.include_in_subtotal,
            show_in_pdf: self.show_in_pdf,
        })
    }
}

impl QuotationRow {
    fn into_quotation(self, items: LineItems) -> DbResult<Quotation> {
        Ok(Quotation {
            quantities: [
                count("quotation", "quantity_1", self.quantity_1)?,
                count("quotation", "quantity_2", self.quantity_2)?,
                count("quotation", "quantity_3", self.quantity_3)?,
            ],
            margins: [
                decimal("quotation", "margin_1", &self.margin_1)?,
                decimal("quotation", "margin_2", &self.margin_2)?,
                decimal("quotation", "margin_3", &self.margin_3)?,
            ],
            id: self.id,
            code: self.code,
            reference: self.reference,
            date: self.date,
            client_id: self.client_id,
            client: ClientDetails {
                name: self.client_name,
                brand: self.client_brand,
                email: self.client_email,
                our_ref: self.client_our_ref,
                client_ref: self.client_client_ref,
                description: self.client_description,
                sample_size: self.client_sample_size,
            },
            article_image: self.article_image,
            items,
            language: self.language,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

const SELECT_QUOTATION: &str = r#"
    SELECT id, code, reference, date, client_id,
           client_name, client_brand, client_email, client_our_ref, client_client_ref,
           client_description, client_sample_size,
           article_image,
           quantity_1, quantity_2, quantity_3, margin_1, margin_2, margin_3,
           language, created_at, updated_at
    FROM quotations
"#;

// =============================================================================
// Repository
// =============================================================================

impl QuotationRepository {
    /// Creates a new QuotationRepository.
    pub fn new(pool: SqlitePool, changes: ChangeFeed) -> Self {
        QuotationRepository { pool, changes }
    }

    /// Lists all quotations, newest first, with their line items.
    pub async fn list(&self) -> DbResult<Vec<Quotation>> {
        let rows: Vec<QuotationRow> =
            sqlx::query_as(&format!("{SELECT_QUOTATION} ORDER BY created_at DESC, rowid DESC"))
                .fetch_all(&self.pool)
                .await?;
        let mut items = self.load_items(None).await?;

        debug!(count = rows.len(), "Listed quotations");
        rows.into_iter()
            .map(|row| {
                let line_items = items.remove(&row.id).unwrap_or_default();
                row.into_quotation(line_items)
            })
            .collect()
    }

    /// Gets a quotation by ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Quotation))` - Quotation found
    /// * `Ok(None)` - Quotation not found
    pub async fn get(&self, id: &str) -> DbResult<Option<Quotation>> {
        let row: Option<QuotationRow> =
            sqlx::query_as(&format!("{SELECT_QUOTATION} WHERE id = ?1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        let items = self.load_items(Some(id)).await?.remove(id).unwrap_or_default();
        row.into_quotation(items).map(Some)
    }

    /// Line items grouped by quotation, in stored order.
    async fn load_items(&self, quotation_id: Option<&str>) -> DbResult<HashMap<String, LineItems>> {
        let components: Vec<ComponentRow> = sqlx::query_as(
            r#"
            SELECT quotation_id, id, description, supplier, unit_price, consumption,
                   has_moq, moq_development_id, legacy_moq_quantity, legacy_moq_cost
            FROM quotation_components
            WHERE ?1 IS NULL OR quotation_id = ?1
            ORDER BY quotation_id, position
            "#,
        )
        .bind(quotation_id)
        .fetch_all(&self.pool)
        .await?;

        let developments: Vec<DevelopmentRow> = sqlx::query_as(
            r#"
            SELECT quotation_id, id, description, cost, supplier, is_from_moq,
                   source_component_id, moq_quantity, include_in_subtotal, show_in_pdf
            FROM quotation_developments
            WHERE ?1 IS NULL OR quotation_id = ?1
            ORDER BY quotation_id, position
            "#,
        )
        .bind(quotation_id)
        .fetch_all(&self.pool)
        .await?;

        let mut grouped: HashMap<String, LineItems> = HashMap::new();
        for row in components {
            let entry = grouped.entry(row.quotation_id.clone()).or_default();
            entry.components.push(row.into_component()?);
        }
        for row in developments {
            let entry = grouped.entry(row.quotation_id.clone()).or_default();
            entry.developments.push(row.into_development()?);
        }
        Ok(grouped)
    }

    /// Creates a quotation, numbering it from the sequence counter.
    ///
    /// ## Arguments
    /// * `input` - The record; `input.date` defaults to `today`
    /// * `today` - The caller's current date
    ///
    /// ## Returns
    /// * `Ok(Quotation)` - The stored quotation with its code and reference
    /// * `Err(DbError::Rejected)` - Zero quantity, inconsistent MOQ pairing,
    ///   undecodable image or missing client name
    pub async fn create(&self, input: &QuotationInput, today: NaiveDate) -> DbResult<Quotation> {
        self.insert(&Uuid::new_v4().to_string(), input, today).await
    }

    async fn insert(&self, id: &str, input: &QuotationInput, today: NaiveDate) -> DbResult<Quotation> {
        validate_quotation(input)?;
        let date = input.date.unwrap_or(today);
        let now = Utc::now();

        let mut tx = self.pool.begin().await?;

        let sequence: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO sequences (name, value) VALUES (?1, 1)
            ON CONFLICT (name) DO UPDATE SET value = value + 1
            RETURNING value
            "#,
        )
        .bind(QUOTATION_SEQUENCE)
        .fetch_one(&mut *tx)
        .await?;
        let sequence = count("sequence", QUOTATION_SEQUENCE, sequence)?;

        let code = quotation_code(date, sequence);
        let reference = quotation_reference(date, sequence);

        debug!(id = %id, code = %code, "Creating quotation");

        sqlx::query(
            r#"
            INSERT INTO quotations (
                id, code, reference, date, client_id,
                client_name, client_brand, client_email, client_our_ref, client_client_ref,
                client_description, client_sample_size,
                article_image,
                quantity_1, quantity_2, quantity_3, margin_1, margin_2, margin_3,
                language, created_at, updated_at
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5,
                ?6, ?7, ?8, ?9, ?10,
                ?11, ?12,
                ?13,
                ?14, ?15, ?16, ?17, ?18, ?19,
                ?20, ?21, ?21
            )
            "#,
        )
        .bind(id)
        .bind(&code)
        .bind(&reference)
        .bind(date)
        .bind(&input.client_id)
        .bind(input.client.name.trim())
        .bind(&input.client.brand)
        .bind(&input.client.email)
        .bind(&input.client.our_ref)
        .bind(&input.client.client_ref)
        .bind(&input.client.description)
        .bind(&input.client.sample_size)
        .bind(&input.article_image)
        .bind(i64::from(input.quantities[0]))
        .bind(i64::from(input.quantities[1]))
        .bind(i64::from(input.quantities[2]))
        .bind(input.margins[0].to_string())
        .bind(input.margins[1].to_string())
        .bind(input.margins[2].to_string())
        .bind(input.language)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        insert_items(&mut tx, id, &input.items).await?;
        tx.commit().await?;

        info!(id = %id, code = %code, reference = %reference, "Quotation created");
        self.changes
            .publish(ChangeEvent::new(Table::Quotations, ChangeKind::Created, id));

        self.get(id)
            .await?
            .ok_or_else(|| DbError::not_found("Quotation", id))
    }

    /// Full-record update. Code and reference never change; the line items
    /// are replaced as a whole.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - No quotation with this ID
    /// * `Err(DbError::Rejected)` - Same checks as `create`
    pub async fn update(&self, id: &str, input: &QuotationInput) -> DbResult<Quotation> {
        validate_quotation(input)?;

        debug!(id = %id, "Updating quotation");

        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE quotations SET
                date = COALESCE(?2, date),
                client_id = ?3,
                client_name = ?4, client_brand = ?5, client_email = ?6, client_our_ref = ?7,
                client_client_ref = ?8, client_description = ?9, client_sample_size = ?10,
                article_image = ?11,
                quantity_1 = ?12, quantity_2 = ?13, quantity_3 = ?14,
                margin_1 = ?15, margin_2 = ?16, margin_3 = ?17,
                language = ?18,
                updated_at = ?19
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(input.date)
        .bind(&input.client_id)
        .bind(input.client.name.trim())
        .bind(&input.client.brand)
        .bind(&input.client.email)
        .bind(&input.client.our_ref)
        .bind(&input.client.client_ref)
        .bind(&input.client.description)
        .bind(&input.client.sample_size)
        .bind(&input.article_image)
        .bind(i64::from(input.quantities[0]))
        .bind(i64::from(input.quantities[1]))
        .bind(i64::from(input.quantities[2]))
        .bind(input.margins[0].to_string())
        .bind(input.margins[1].to_string())
        .bind(input.margins[2].to_string())
        .bind(input.language)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Quotation", id));
        }

        sqlx::query("DELETE FROM quotation_components WHERE quotation_id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM quotation_developments WHERE quotation_id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        insert_items(&mut tx, id, &input.items).await?;

        tx.commit().await?;

        self.changes
            .publish(ChangeEvent::new(Table::Quotations, ChangeKind::Updated, id));

        self.get(id)
            .await?
            .ok_or_else(|| DbError::not_found("Quotation", id))
    }

    /// Full-record upsert.
    ///
    /// Updates when `id` names an existing quotation, otherwise creates one
    /// (keeping the given `id` if there is one).
    ///
    /// ## Returns
    /// The quotation's ID.
    pub async fn upsert(
        &self,
        id: Option<&str>,
        input: &QuotationInput,
        today: NaiveDate,
    ) -> DbResult<String> {
        let quotation = match id {
            Some(id) if self.exists(id).await? => self.update(id, input).await?,
            Some(id) => self.insert(id, input, today).await?,
            None => self.create(input, today).await?,
        };
        Ok(quotation.id)
    }

    /// Deletes a quotation and its line items.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - No quotation with this ID
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting quotation");

        let result = sqlx::query("DELETE FROM quotations WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Quotation", id));
        }

        self.changes
            .publish(ChangeEvent::new(Table::Quotations, ChangeKind::Deleted, id));
        Ok(())
    }

    /// Counts stored quotations.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM quotations")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn exists(&self, id: &str) -> DbResult<bool> {
        let found: Option<i64> = sqlx::query_scalar("SELECT 1 FROM quotations WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(found.is_some())
    }
}

/// Inserts the line-item rows of one quotation, `position` = list index.
async fn insert_items(
    conn: &mut SqliteConnection,
    quotation_id: &str,
    items: &LineItems,
) -> DbResult<()> {
    for (position, c) in items.components.iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO quotation_components (
                quotation_id, id, position, description, supplier, unit_price, consumption,
                has_moq, moq_development_id, legacy_moq_quantity, legacy_moq_cost
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
        )
        .bind(quotation_id)
        .bind(&c.id)
        .bind(position as i64)
        .bind(&c.description)
        .bind(&c.supplier)
        .bind(c.unit_price.to_string())
        .bind(c.consumption.to_string())
        .bind(c.has_moq)
        .bind(&c.moq_development_id)
        .bind(c.moq_quantity.map(|d| d.to_string()))
        .bind(c.moq_cost.map(|d| d.to_string()))
        .execute(&mut *conn)
        .await?;
    }

    for (position, d) in items.developments.iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO quotation_developments (
                quotation_id, id, position, description, cost, supplier, is_from_moq,
                source_component_id, moq_quantity, include_in_subtotal, show_in_pdf
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
        )
        .bind(quotation_id)
        .bind(&d.id)
        .bind(position as i64)
        .bind(&d.description)
        .bind(d.cost.to_string())
        .bind(&d.supplier)
        .bind(d.is_from_moq)
        .bind(&d.source_component_id)
        .bind(i64::from(d.moq_quantity))
        .bind(d.include_in_subtotal)
        .bind(d.show_in_pdf)
        .execute(&mut *conn)
        .await?;
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use prequote_core::{ClientInput, CoreError};

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn march_14() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 14).unwrap()
    }

    fn input() -> QuotationInput {
        let mut items = LineItems::new();
        items.add_component(Component::new("Fabric", "Tecidos SA", dec("2.5"), dec("4")));
        let mut zipper = Component::new("Zipper", "YKK", dec("0.0375"), dec("1"));
        zipper.has_moq = true;
        zipper.moq_cost = Some(dec("9.99"));
        let zipper_id = items.add_component(zipper);
        let mut tooling = Development::new("Tooling", dec("150"));
        tooling.show_in_pdf = false;
        items.add_development(tooling);

        let pair_id = items.moq_pair(&zipper_id).unwrap().id.clone();
        let mut pair = items.development(&pair_id).unwrap().clone();
        pair.cost = dec("100");
        pair.moq_quantity = 500;
        pair.include_in_subtotal = true;
        items.update_development(pair).unwrap();

        QuotationInput {
            client: ClientDetails {
                name: "Acme".to_string(),
                ..ClientDetails::default()
            },
            items,
            ..QuotationInput::default()
        }
    }

    async fn db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_create_assigns_code_and_reference() {
        let db = db().await;
        let repo = db.quotations();

        let first = repo.create(&input(), march_14()).await.unwrap();
        let second = repo.create(&input(), march_14()).await.unwrap();

        assert_eq!(first.code, "PC2503001");
        assert_eq!(first.reference, "250314001");
        assert_eq!(second.code, "PC2503002");
        assert_eq!(first.date, march_14());
    }

    #[tokio::test]
    async fn test_sequence_is_not_reused_after_delete() {
        let db = db().await;
        let repo = db.quotations();

        let first = repo.create(&input(), march_14()).await.unwrap();
        repo.create(&input(), march_14()).await.unwrap();
        repo.delete(&first.id).await.unwrap();

        let third = repo.create(&input(), march_14()).await.unwrap();
        assert_eq!(third.code, "PC2503003");
    }

    #[tokio::test]
    async fn test_line_items_round_trip_in_order() {
        let db = db().await;
        let original = input();
        let saved = db.quotations().create(&original, march_14()).await.unwrap();

        assert_eq!(saved.items, original.items);
        assert_eq!(saved.quantities, [100, 250, 500]);
        assert_eq!(saved.margins, [dec("30"), dec("25"), dec("20")]);
        assert_eq!(saved.items.components[1].moq_cost, Some(dec("9.99")));
        assert!(saved.items.check_linkage().is_empty());
    }

    #[tokio::test]
    async fn test_update_replaces_items_and_keeps_code() {
        let db = db().await;
        let repo = db.quotations();
        let saved = repo.create(&input(), march_14()).await.unwrap();

        let mut edit = QuotationInput::from(&saved);
        let fabric_id = edit.items.components[0].id.clone();
        edit.items.remove_component(&fabric_id).unwrap();
        edit.language = Language::Fr;

        let updated = repo.update(&saved.id, &edit).await.unwrap();
        assert_eq!(updated.code, saved.code);
        assert_eq!(updated.items.components.len(), 1);
        assert_eq!(updated.language, Language::Fr);
        assert!(updated.updated_at >= saved.updated_at);
    }

    #[tokio::test]
    async fn test_zero_quantity_is_rejected_without_write() {
        let db = db().await;
        let mut bad = input();
        bad.quantities[1] = 0;

        let err = db.quotations().create(&bad, march_14()).await.unwrap_err();
        assert!(matches!(err, DbError::Rejected(CoreError::Validation(_))));
        assert_eq!(db.quotations().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_inconsistent_linkage_is_rejected() {
        let db = db().await;
        let mut bad = input();
        bad.items.developments.retain(|d| !d.is_from_moq);

        let err = db.quotations().create(&bad, march_14()).await.unwrap_err();
        assert!(matches!(err, DbError::Rejected(CoreError::Linkage(_))));
    }

    #[tokio::test]
    async fn test_failed_transaction_rolls_back_sequence() {
        let db = db().await;
        let mut bad = input();
        bad.client_id = Some("no-such-client".to_string());

        let err = db.quotations().create(&bad, march_14()).await.unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
        assert_eq!(db.quotations().count().await.unwrap(), 0);

        let ok = db.quotations().create(&input(), march_14()).await.unwrap();
        assert_eq!(ok.code, "PC2503001");
    }

    #[tokio::test]
    async fn test_deleting_client_keeps_snapshot() {
        let db = db().await;
        let client = db
            .clients()
            .create(&ClientInput {
                name: "Acme".to_string(),
                ..ClientInput::default()
            })
            .await
            .unwrap();
        let mut with_client = input();
        with_client.client_id = Some(client.id.clone());
        with_client.client = ClientDetails::from(&client);
        let saved = db.quotations().create(&with_client, march_14()).await.unwrap();

        db.clients().delete(&client.id).await.unwrap();

        let reloaded = db.quotations().get(&saved.id).await.unwrap().unwrap();
        assert_eq!(reloaded.client_id, None);
        assert_eq!(reloaded.client.name, "Acme");
    }

    #[tokio::test]
    async fn test_delete_cascades_line_items() {
        let db = db().await;
        let saved = db.quotations().create(&input(), march_14()).await.unwrap();
        db.quotations().delete(&saved.id).await.unwrap();

        let left: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM quotation_components")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(left, 0);
        assert!(db.quotations().get(&saved.id).await.unwrap().is_none());
        assert!(matches!(
            db.quotations().delete(&saved.id).await,
            Err(DbError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_list_is_newest_first() {
        let db = db().await;
        let a = db.quotations().create(&input(), march_14()).await.unwrap();
        let b = db.quotations().create(&input(), march_14()).await.unwrap();

        let listed = db.quotations().list().await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, b.id);
        assert_eq!(listed[1].id, a.id);
        assert_eq!(listed[0].items.components.len(), 2);
    }

    #[tokio::test]
    async fn test_upsert_with_explicit_id() {
        let db = db().await;
        let id = db
            .quotations()
            .upsert(Some("legacy-1"), &input(), march_14())
            .await
            .unwrap();
        assert_eq!(id, "legacy-1");

        let mut edit = input();
        edit.margins = [dec("40"), dec("35"), dec("30")];
        db.quotations()
            .upsert(Some("legacy-1"), &edit, march_14())
            .await
            .unwrap();
        assert_eq!(db.quotations().count().await.unwrap(), 1);
        let reloaded = db.quotations().get("legacy-1").await.unwrap().unwrap();
        assert_eq!(reloaded.margins[0], dec("40"));
    }
}
