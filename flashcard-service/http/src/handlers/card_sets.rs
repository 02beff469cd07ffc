use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};

use flashcard_application::{ApplicationError, CardSetPayload};
use flashcard_domain::CardSet;

use crate::error::{error_mapper, HttpError};
use crate::extract::ValidatedJson;
use crate::state::AppState;

const CARD_SET_NOT_FOUND: &str = "the card set was not found";

pub async fn create_card_set(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CardSetPayload>,
) -> Result<Json<CardSet>, HttpError> {
    tracing::info!(card_count = payload.cards.len(), "received create card set request");
    let card_set = state.card_sets.create(payload).await.map_err(card_set_error)?;
    tracing::info!(card_set_id = %card_set.id, "card set created");
    Ok(Json(card_set))
}

pub async fn list_card_sets(
    State(state): State<AppState>,
) -> Result<Json<Vec<CardSet>>, HttpError> {
    let card_sets = state.card_sets.list().await.map_err(card_set_error)?;
    tracing::info!(count = card_sets.len(), "card sets listed");
    Ok(Json(card_sets))
}

pub async fn get_card_set(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CardSet>, HttpError> {
    let card_set = state.card_sets.get(&id).await.map_err(card_set_error)?;
    Ok(Json(card_set))
}

pub async fn replace_card_set(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<CardSetPayload>,
) -> Result<Json<CardSet>, HttpError> {
    tracing::info!(card_set_id = %id, card_count = payload.cards.len(), "received replace card set request");
    let card_set = state
        .card_sets
        .replace(&id, payload)
        .await
        .map_err(card_set_error)?;
    tracing::info!(card_set_id = %card_set.id, "card set replaced");
    Ok(Json(card_set))
}

pub async fn delete_card_set(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, HttpError> {
    state.card_sets.delete(&id).await.map_err(card_set_error)?;
    tracing::info!(card_set_id = %id, "card set deleted");
    Ok(StatusCode::OK)
}

fn card_set_error(error: ApplicationError) -> HttpError {
    tracing::warn!(error = %error, "card set request failed");
    let missing = matches!(&error, ApplicationError::Domain(domain) if domain.is_not_found());
    let http_error = error_mapper(error);
    if missing {
        http_error.with_alt_message(CARD_SET_NOT_FOUND)
    } else {
        http_error
    }
}
