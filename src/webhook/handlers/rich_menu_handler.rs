//! Development endpoints for managing the channel's rich menus.

use crate::{
    error::Result, models::line::RichMenuResponse, services::DeleteSweep, state::AppState,
};
use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RichMenuSetupResponse {
    pub status: &'static str,
    pub rich_menu_id: String,
}

#[derive(Debug, Serialize)]
pub struct RichMenuDeleteResponse {
    pub status: &'static str,
    pub message: String,
    pub listed: usize,
    pub deleted: usize,
}

impl From<DeleteSweep> for RichMenuDeleteResponse {
    fn from(sweep: DeleteSweep) -> Self {
        if sweep.is_complete() {
            Self {
                status: "success",
                message: "All rich menus deleted successfully".to_string(),
                listed: sweep.listed,
                deleted: sweep.deleted,
            }
        } else {
            Self {
                status: "partial",
                message: format!("Deleted {} of {} rich menus", sweep.deleted, sweep.listed),
                listed: sweep.listed,
                deleted: sweep.deleted,
            }
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RichMenuListBody {
    pub status: &'static str,
    pub rich_menus: Vec<RichMenuResponse>,
}

/// POST /webhook/rich-menu/setup/:user_id
pub async fn setup_rich_menu(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<RichMenuSetupResponse>> {
    info!("Setting up rich menu for user: {}", user_id);
    let rich_menu_id = state.rich_menus.setup_for_user(&user_id).await?;

    Ok(Json(RichMenuSetupResponse {
        status: "success",
        rich_menu_id,
    }))
}

/// DELETE /webhook/rich-menu/all
pub async fn delete_all_rich_menus(
    State(state): State<Arc<AppState>>,
) -> Result<Json<RichMenuDeleteResponse>> {
    info!("Deleting all rich menus");
    let sweep = state.rich_menus.delete_all().await?;

    Ok(Json(sweep.into()))
}

/// GET /webhook/rich-menu/list
pub async fn list_rich_menus(State(state): State<Arc<AppState>>) -> Result<Json<RichMenuListBody>> {
    let rich_menus = state.rich_menus.list().await?;

    Ok(Json(RichMenuListBody {
        status: "success",
        rich_menus,
    }))
}
