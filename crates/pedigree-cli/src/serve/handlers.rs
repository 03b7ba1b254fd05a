//! HTTP route handlers for the share-link server.
//!
//! Each request builds a fresh [`Controller`] from its query string, so the
//! pages follow exactly the same view rules as the terminal client. Handlers
//! stay thin; HTML lives in `pages`.

use std::sync::Arc;

use axum::{
    extract::{Path, RawQuery, State},
    http::StatusCode,
    response::Html,
    Json,
};

use pedigree_core::{Controller, Horse, HorseId, LoadState, RecordStore, StartupQuery, TreeLayout};

use super::models::{ApiError, LineageResponse};
use super::pages;
use super::AppState;

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<ApiError>)>;

/// Controller for one request, already loaded.
///
/// A failed load is returned as the error message.
async fn load(
    state: &AppState,
    query: StartupQuery,
) -> Result<Controller<Arc<dyn RecordStore>>, String> {
    let mut ctl = Controller::new(state.store.clone(), &state.config, query);
    if let LoadState::Failed { message } = ctl.fetch_all().await {
        return Err(message.clone());
    }
    Ok(ctl)
}

fn parse_query(raw: Option<String>) -> StartupQuery {
    StartupQuery::parse(raw.as_deref().unwrap_or_default())
}

// =============================================================================
// Page Handlers
// =============================================================================

/// GET `/` - Horse list, or one horse's details when `?id=` is given.
pub async fn index(State(state): State<Arc<AppState>>, RawQuery(raw): RawQuery) -> Html<String> {
    let query = parse_query(raw);
    match load(&state, query).await {
        Ok(ctl) => Html(pages::view_page(&ctl, &state.config.share)),
        Err(message) => Html(pages::load_error_page(&message)),
    }
}

/// GET `/tree?id=` - Ancestry diagram with pan and zoom.
pub async fn tree(State(state): State<Arc<AppState>>, RawQuery(raw): RawQuery) -> Html<String> {
    let query = parse_query(raw);
    let shared = query.shared;

    let mut ctl = match load(&state, query).await {
        Ok(ctl) => ctl,
        Err(message) => return Html(pages::load_error_page(&message)),
    };
    ctl.request_tree();

    let layout = ctl
        .lineage()
        .map(|tree| TreeLayout::compute(&tree, &state.config.tree));
    Html(pages::tree_page(
        ctl.detail(),
        layout.as_ref(),
        &state.config.tree,
        shared,
    ))
}

// =============================================================================
// API Handlers
// =============================================================================

/// GET `/api/horses` - Every registered horse.
pub async fn api_horses(State(state): State<Arc<AppState>>) -> ApiResult<Vec<Horse>> {
    let ctl = load(&state, StartupQuery::default())
        .await
        .map_err(|message| (StatusCode::BAD_GATEWAY, Json(ApiError::new(message))))?;
    Ok(Json(ctl.horses().to_vec()))
}

/// GET `/api/lineage/{id}` - Ancestry tree and layout for one horse.
///
/// Response format:
/// ```json
/// {
///   "tree": {"id": "3", "name": "C", "children": [...]},
///   "layout": {"nodes": [{"id": "3", "x": 0, "y": 46, ...}], "links": [...]}
/// }
/// ```
pub async fn api_lineage(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<LineageResponse> {
    let query = StartupQuery {
        id: Some(HorseId::from(id.as_str())),
        shared: false,
    };
    let mut ctl = load(&state, query)
        .await
        .map_err(|message| (StatusCode::BAD_GATEWAY, Json(ApiError::new(message))))?;
    ctl.request_tree();

    let tree = ctl.lineage().ok_or_else(|| {
        (
            StatusCode::NOT_FOUND,
            Json(ApiError::new(format!("No horse with id '{}'", id))),
        )
    })?;
    let layout = TreeLayout::compute(&tree, &state.config.tree);

    Ok(Json(LineageResponse { tree, layout }))
}
