use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::warn;
use uuid::Uuid;

use tally_db::models::FeatureRow;
use tally_types::api::CreateFeatureRequest;
use tally_types::events::GatewayEvent;
use tally_types::models::FeatureView;

use crate::auth::AppState;
use crate::error::ApiError;
use crate::middleware::{AuthUser, Viewer};

/// Public listing. A valid bearer token personalizes `has_voted`; anything
/// else (no token, bad token, missing secret) reads as anonymous.
pub async fn list_features(
    State(state): State<AppState>,
    Viewer(claims): Viewer,
) -> Result<impl IntoResponse, ApiError> {
    let viewer = claims.map(|c| c.sub.to_string());

    let db = state.clone();
    let rows = tokio::task::spawn_blocking(move || db.db.list_features(viewer.as_deref()))
        .await
        .map_err(ApiError::internal)?
        .map_err(ApiError::internal)?;

    let views: Vec<FeatureView> = rows.into_iter().map(view_from_row).collect();
    Ok(Json(views))
}

pub async fn create_feature(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Json(req): Json<CreateFeatureRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let name = req.name.trim().to_string();
    if name.is_empty() {
        return Err(ApiError::validation("Feature name is required"));
    }

    let feature_id = Uuid::new_v4();

    let db = state.clone();
    let feature_name = name.clone();
    let creator = claims.sub.to_string();
    tokio::task::spawn_blocking(move || {
        db.db
            .create_feature(&feature_id.to_string(), &feature_name, &creator)
    })
    .await
    .map_err(ApiError::internal)?
    .map_err(|e| ApiError::from_store(e, "Feature already exists"))?;

    // A fresh feature has no votes, so the view is known without a re-read.
    let view = FeatureView {
        id: feature_id,
        name,
        created_by: claims.sub,
        creator_username: claims.username,
        votes: 0,
        has_voted: false,
    };

    state
        .dispatcher
        .broadcast(GatewayEvent::FeatureCreated(view.clone()));

    Ok((StatusCode::CREATED, Json(view)))
}

pub async fn upvote_feature(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let feature_id: Uuid = id
        .parse()
        .map_err(|_| ApiError::validation("Invalid feature ID"))?;

    let db = state.clone();
    let voter = claims.sub.to_string();
    let (viewer_row, broadcast_row) = tokio::task::spawn_blocking(move || {
        let fid = feature_id.to_string();

        // Check order matters: already-voted first, then existence, then
        // ownership.
        if db.db.has_voted(&voter, &fid).map_err(ApiError::internal)? {
            return Err(ApiError::conflict(
                "You have already voted for this feature",
            ));
        }

        let feature = db
            .db
            .get_feature(&fid, None)
            .map_err(ApiError::internal)?
            .ok_or_else(|| ApiError::not_found("Feature not found"))?;

        if feature.created_by == voter {
            return Err(ApiError::forbidden("Cannot upvote your own feature"));
        }

        // The pre-check above can lose a race; the UNIQUE constraint makes
        // the duplicate surface here as a 409 either way.
        db.db
            .record_vote(&Uuid::new_v4().to_string(), &voter, &fid)
            .map_err(|e| ApiError::from_store(e, "You have already voted for this feature"))?;

        let viewer_row = db
            .db
            .get_feature(&fid, Some(&voter))
            .map_err(ApiError::internal)?
            .ok_or_else(|| ApiError::internal(anyhow::anyhow!("feature vanished after vote")))?;

        // Separate anonymous read for the broadcast payload.
        let broadcast_row = db
            .db
            .get_feature(&fid, None)
            .map_err(ApiError::internal)?
            .ok_or_else(|| ApiError::internal(anyhow::anyhow!("feature vanished after vote")))?;

        Ok((viewer_row, broadcast_row))
    })
    .await
    .map_err(ApiError::internal)??;

    // Recipients must not inherit the acting voter's relative state.
    let mut broadcast_view = view_from_row(broadcast_row);
    broadcast_view.has_voted = false;
    state
        .dispatcher
        .broadcast(GatewayEvent::FeatureUpvoted(broadcast_view));

    Ok(Json(view_from_row(viewer_row)))
}

fn view_from_row(row: FeatureRow) -> FeatureView {
    FeatureView {
        id: row.id.parse().unwrap_or_else(|e| {
            warn!("Corrupt feature id '{}': {}", row.id, e);
            Uuid::default()
        }),
        created_by: row.created_by.parse().unwrap_or_else(|e| {
            warn!("Corrupt created_by '{}' on feature '{}': {}", row.created_by, row.id, e);
            Uuid::default()
        }),
        name: row.name,
        creator_username: row.creator_username,
        votes: row.votes,
        has_voted: row.has_voted,
    }
}
