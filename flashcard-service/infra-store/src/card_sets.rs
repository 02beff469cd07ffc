use async_trait::async_trait;
use rusqlite::{params, OptionalExtension};
use tracing::instrument;
use uuid::Uuid;

use flashcard_domain::{CardSet, CardSetRepository, DomainError};

use crate::database::Database;
use crate::error::StoreError;

/// Card sets stored as JSON documents keyed by id. Queries run on the
/// blocking pool so a slow disk never holds up an async worker.
#[derive(Clone)]
pub struct SqliteCardSetRepository {
    db: Database,
}

impl SqliteCardSetRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    async fn run_blocking<T, F>(&self, op: F) -> Result<T, DomainError>
    where
        T: Send + 'static,
        F: FnOnce(Self) -> Result<T, StoreError> + Send + 'static,
    {
        let repo = self.clone();
        tokio::task::spawn_blocking(move || op(repo))
            .await
            .map_err(|err| DomainError::internal_error(&format!("store task failed: {err}")))?
            .map_err(DomainError::from)
    }

    #[instrument(skip(self, card_set), fields(card_set_id = %card_set.id))]
    fn insert_row(&self, card_set: &CardSet) -> Result<(), StoreError> {
        let document = serde_json::to_string(card_set)?;
        self.db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO card_sets (id, document) VALUES (?1, ?2)",
                params![card_set.id.to_string(), document],
            )?;
            Ok(())
        })
    }

    fn list_rows(&self) -> Result<Vec<CardSet>, StoreError> {
        self.db.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT document FROM card_sets ORDER BY rowid")?;
            let documents = stmt
                .query_map([], |row| row.get::<_, String>(0))?
                .collect::<Result<Vec<_>, _>>()?;
            documents
                .iter()
                .map(|document| serde_json::from_str(document).map_err(StoreError::from))
                .collect()
        })
    }

    fn find_row(&self, id: Uuid) -> Result<Option<CardSet>, StoreError> {
        let document: Option<String> = self.db.with_conn(|conn| {
            Ok(conn
                .query_row(
                    "SELECT document FROM card_sets WHERE id = ?1",
                    [id.to_string()],
                    |row| row.get(0),
                )
                .optional()?)
        })?;
        document
            .map(|document| serde_json::from_str(&document).map_err(StoreError::from))
            .transpose()
    }

    #[instrument(skip(self, card_set), fields(card_set_id = %card_set.id))]
    fn replace_row(&self, card_set: &CardSet) -> Result<bool, StoreError> {
        let document = serde_json::to_string(card_set)?;
        self.db.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE card_sets SET document = ?2 WHERE id = ?1",
                params![card_set.id.to_string(), document],
            )?;
            Ok(changed > 0)
        })
    }

    #[instrument(skip(self), fields(card_set_id = %id))]
    fn delete_row(&self, id: Uuid) -> Result<bool, StoreError> {
        self.db.with_conn(|conn| {
            let changed = conn.execute("DELETE FROM card_sets WHERE id = ?1", [id.to_string()])?;
            Ok(changed > 0)
        })
    }
}

#[async_trait]
impl CardSetRepository for SqliteCardSetRepository {
    async fn insert(&self, card_set: &CardSet) -> Result<(), DomainError> {
        let card_set = card_set.clone();
        self.run_blocking(move |repo| repo.insert_row(&card_set))
            .await
    }

    async fn list(&self) -> Result<Vec<CardSet>, DomainError> {
        self.run_blocking(|repo| repo.list_rows()).await
    }

    async fn find(&self, id: Uuid) -> Result<Option<CardSet>, DomainError> {
        self.run_blocking(move |repo| repo.find_row(id)).await
    }

    async fn replace(&self, card_set: &CardSet) -> Result<bool, DomainError> {
        let card_set = card_set.clone();
        self.run_blocking(move |repo| repo.replace_row(&card_set))
            .await
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        self.run_blocking(move |repo| repo.delete_row(id)).await
    }
}
