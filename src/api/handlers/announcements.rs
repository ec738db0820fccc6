use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
    Extension,
};
use uuid::Uuid;

use crate::{
    api::{state::AppState, middleware::auth::CurrentTeacher},
    domain::{AnnouncementRecord, NewAnnouncement, UpdateAnnouncementRequest},
    error::Result,
};

pub async fn create(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentTeacher>,
    Json(request): Json<NewAnnouncement>,
) -> Result<(StatusCode, Json<AnnouncementRecord>)> {
    let created = state.service_context.announcement_service
        .submit(&current.teacher, request)
        .await?;

    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Extension(current): Extension<CurrentTeacher>,
    Json(request): Json<UpdateAnnouncementRequest>,
) -> Result<Json<AnnouncementRecord>> {
    let updated = state.service_context.announcement_service
        .edit(&current.teacher, id, request)
        .await?;

    Ok(Json(updated))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Extension(current): Extension<CurrentTeacher>,
) -> Result<StatusCode> {
    state.service_context.announcement_service
        .remove(&current.teacher, id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
