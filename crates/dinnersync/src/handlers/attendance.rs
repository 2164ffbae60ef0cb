//! Attendance handlers.
//!
//! Join, leave, and current-membership endpoints. All of them identify the
//! caller via the `x-user-id` header; the membership invariants themselves
//! are enforced in the service and storage layers.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};

use dinnersync_core::dining::{Attendee, GroupView};

use crate::{context::CurrentUser, handlers::AppError, state::AppState};

/// Request body for joining a dinner group.
#[derive(Debug, Deserialize)]
pub struct JoinRequest {
    pub place_id: String,
}

/// Response for a successful join.
#[derive(Debug, Serialize)]
pub struct JoinResponse {
    pub attendee: Attendee,
    pub view: GroupView,
}

/// Response for a leave request.
#[derive(Debug, Serialize)]
pub struct LeaveResponse {
    pub removed: bool,
}

/// Join the group at a restaurant (POST /api/attendance).
///
/// Replaces any membership the user already holds. Returns 201 with the
/// attendee row and the resulting group view.
pub async fn join(
    CurrentUser(user_id): CurrentUser,
    State(state): State<AppState>,
    Json(payload): Json<JoinRequest>,
) -> Result<(StatusCode, Json<JoinResponse>), AppError> {
    let view = state.membership.join(user_id, &payload.place_id).await?;

    let attendee = view
        .attendees
        .iter()
        .find(|a| a.user_id == user_id)
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("Joined group view is missing the joining user"))?;

    Ok((StatusCode::CREATED, Json(JoinResponse { attendee, view })))
}

/// Leave the current group (DELETE /api/attendance).
///
/// Idempotent: reports whether a membership was actually removed.
pub async fn leave(
    CurrentUser(user_id): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<LeaveResponse>, AppError> {
    let removed = state.membership.leave(user_id).await?;
    Ok(Json(LeaveResponse { removed }))
}

/// The caller's current group view, or JSON null (GET /api/attendance).
pub async fn current(
    CurrentUser(user_id): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<Option<GroupView>>, AppError> {
    let view = state.membership.current_view(user_id).await?;
    Ok(Json(view))
}
