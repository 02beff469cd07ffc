use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use flashcard_domain::{CardSet, CardSetRepository, DomainError};

use crate::{ApplicationError, CardSetPayload};

#[async_trait]
pub trait CardSetUseCase: Send + Sync {
    async fn create(&self, payload: CardSetPayload) -> Result<CardSet, ApplicationError>;
    async fn list(&self) -> Result<Vec<CardSet>, ApplicationError>;
    async fn get(&self, id: &str) -> Result<CardSet, ApplicationError>;
    async fn replace(&self, id: &str, payload: CardSetPayload)
        -> Result<CardSet, ApplicationError>;
    async fn delete(&self, id: &str) -> Result<(), ApplicationError>;
}

pub struct CardSetUseCaseImpl {
    repository: Arc<dyn CardSetRepository>,
}

impl CardSetUseCaseImpl {
    pub fn new(repository: Arc<dyn CardSetRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl CardSetUseCase for CardSetUseCaseImpl {
    async fn create(&self, payload: CardSetPayload) -> Result<CardSet, ApplicationError> {
        let card_set = build_card_set(Uuid::new_v4(), payload);
        self.repository.insert(&card_set).await?;
        tracing::debug!(
            card_set_id = %card_set.id,
            card_count = card_set.cards.len(),
            "card set created"
        );
        Ok(card_set)
    }

    async fn list(&self) -> Result<Vec<CardSet>, ApplicationError> {
        Ok(self.repository.list().await?)
    }

    async fn get(&self, id: &str) -> Result<CardSet, ApplicationError> {
        let id = parse_card_set_id(id)?;
        self.repository
            .find(id)
            .await?
            .ok_or_else(|| not_found(id))
    }

    async fn replace(
        &self,
        id: &str,
        payload: CardSetPayload,
    ) -> Result<CardSet, ApplicationError> {
        let id = parse_card_set_id(id)?;
        let card_set = build_card_set(id, payload);
        if !self.repository.replace(&card_set).await? {
            return Err(not_found(id));
        }
        tracing::debug!(
            card_set_id = %card_set.id,
            card_count = card_set.cards.len(),
            "card set replaced"
        );
        Ok(card_set)
    }

    async fn delete(&self, id: &str) -> Result<(), ApplicationError> {
        let id = parse_card_set_id(id)?;
        if !self.repository.delete(id).await? {
            return Err(not_found(id));
        }
        tracing::debug!(card_set_id = %id, "card set deleted");
        Ok(())
    }
}

fn build_card_set(id: Uuid, payload: CardSetPayload) -> CardSet {
    CardSet::with_fresh_card_ids(
        id,
        payload.name,
        payload.cover_image,
        payload
            .cards
            .into_iter()
            .map(|card| (card.word, card.image)),
    )
}

fn parse_card_set_id(value: &str) -> Result<Uuid, ApplicationError> {
    Uuid::parse_str(value.trim())
        .map_err(|err| ApplicationError::Validation(format!("invalid card set id `{value}`: {err}")))
}

fn not_found(id: Uuid) -> ApplicationError {
    DomainError::not_found("card set", id.to_string()).into()
}
