/*
 * Responsibility
 * - /user handlers (create, get by id)
 * - body is taken as untyped JSON and validated by NewUser::validate
 * - repo errors are logged here and mapped to generic 500s
 */
use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use serde_json::Value;

use crate::{
    api::dto::users::{FieldError, NewUser, UserResponse},
    error::AppError,
    repos::error::RepoError,
    state::AppState,
};

pub async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    let Json(payload) = payload.map_err(|rejection| {
        AppError::Validation(vec![FieldError::new(
            "",
            "invalid_json",
            rejection.body_text(),
        )])
    })?;

    let new_user = NewUser::validate(&payload).map_err(AppError::Validation)?;

    let existing = state
        .users
        .find_by_email(&new_user.email)
        .await
        .map_err(|e| {
            tracing::error!(error = ?e, "user lookup by email failed");
            AppError::CreateFailed
        })?;
    if existing.is_some() {
        return Err(AppError::UserAlreadyExists);
    }

    let row = state
        .users
        .insert(&new_user.id, &new_user.email, new_user.name.as_deref())
        .await
        .map_err(|e| match e {
            // lost a race with a concurrent create
            RepoError::Conflict => AppError::UserAlreadyExists,
            RepoError::Db(_) => {
                tracing::error!(error = ?e, "user insert failed");
                AppError::CreateFailed
            }
        })?;

    tracing::info!(user_id = %row.id, "user created");

    Ok((StatusCode::CREATED, Json(row.into())))
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<UserResponse>, AppError> {
    let row = state
        .users
        .find_by_id(&id)
        .await
        .map_err(|e| {
            tracing::error!(error = ?e, user_id = %id, "user lookup by id failed");
            AppError::FetchFailed
        })?
        .ok_or(AppError::UserNotFound)?;

    Ok(Json(row.into()))
}
