//! Group lookup handler.

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use dinnersync_core::dining::GroupView;
use dinnersync_core::storage::RepositoryError;

use crate::{context::CurrentUser, handlers::AppError, state::AppState};

/// Look up a group with its restaurant and roster (GET /api/groups/{id}).
pub async fn get_group(
    CurrentUser(_user_id): CurrentUser,
    State(state): State<AppState>,
    Path(group_id): Path<Uuid>,
) -> Result<Json<GroupView>, AppError> {
    let view = state
        .membership
        .group_view(group_id)
        .await?
        .ok_or_else(|| {
            AppError(
                RepositoryError::NotFound {
                    entity_type: "DinnerGroup",
                    id: group_id.to_string(),
                }
                .into(),
            )
        })?;

    Ok(Json(view))
}
