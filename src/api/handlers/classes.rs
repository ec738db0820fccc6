use axum::{
    extract::{Path, Query, State},
    Json,
    Extension,
};
use chrono::{Local, NaiveDate};
use serde::Deserialize;

use crate::{
    api::{state::AppState, middleware::auth::CurrentTeacher},
    domain::{AnnouncementRecord, Partition},
    error::Result,
    search::UpcomingAction,
    service::SearchOutcome,
};

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Deserialize)]
pub struct WindowQuery {
    /// Overrides the server's local date.
    pub today: Option<NaiveDate>,
}

fn partition_from_path((school, section): (String, String)) -> Partition {
    Partition::new(&school, &section)
}

pub async fn list_schools(State(state): State<AppState>) -> Result<Json<Vec<String>>> {
    let schools = state.service_context.announcement_service.list_schools().await?;
    Ok(Json(schools))
}

pub async fn list_classes(State(state): State<AppState>) -> Result<Json<Vec<Partition>>> {
    let partitions = state.service_context.announcement_service.list_partitions().await?;
    Ok(Json(partitions))
}

pub async fn search(
    State(state): State<AppState>,
    Path(path): Path<(String, String)>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<SearchOutcome>> {
    let partition = partition_from_path(path);
    let outcome = state.service_context.announcement_service
        .search(&partition, &params.q)
        .await?;

    Ok(Json(outcome))
}

pub async fn keywords(
    State(state): State<AppState>,
    Path(path): Path<(String, String)>,
) -> Result<Json<Vec<String>>> {
    let partition = partition_from_path(path);
    let keywords = state.service_context.announcement_service.keywords(&partition).await?;
    Ok(Json(keywords))
}

pub async fn recent(
    State(state): State<AppState>,
    Path(path): Path<(String, String)>,
    Query(params): Query<WindowQuery>,
) -> Result<Json<Vec<AnnouncementRecord>>> {
    let partition = partition_from_path(path);
    let today = params.today.unwrap_or_else(|| Local::now().date_naive());
    let recent = state.service_context.announcement_service.recent(&partition, today).await?;
    Ok(Json(recent))
}

pub async fn upcoming(
    State(state): State<AppState>,
    Path(path): Path<(String, String)>,
    Query(params): Query<WindowQuery>,
) -> Result<Json<Vec<UpcomingAction>>> {
    let partition = partition_from_path(path);
    let today = params.today.unwrap_or_else(|| Local::now().date_naive());
    let upcoming = state.service_context.announcement_service.upcoming(&partition, today).await?;
    Ok(Json(upcoming))
}

pub async fn mine(
    State(state): State<AppState>,
    Path(path): Path<(String, String)>,
    Extension(current): Extension<CurrentTeacher>,
) -> Result<Json<Vec<AnnouncementRecord>>> {
    let partition = partition_from_path(path);
    let own = state.service_context.announcement_service
        .list_own(&current.teacher, &partition)
        .await?;
    Ok(Json(own))
}
