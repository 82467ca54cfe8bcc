use axum::{extract::State, Json};
use service_core::error::AppError;

use crate::{
    dtos::paging::{PagingQuery, SearchQuery},
    middleware::AuthenticatedClient,
    models::Department,
    services::{metrics, PagingResult},
    utils::validation::ValidatedQuery,
    AppState,
};

/// `GET /v1/depts`
pub async fn list_departments(
    State(state): State<AppState>,
    AuthenticatedClient(client_id): AuthenticatedClient,
    ValidatedQuery(paging): ValidatedQuery<PagingQuery>,
) -> Result<Json<PagingResult<Department>>, AppError> {
    metrics::record_directory_query("list_departments");
    let page = paging.page_request()?;
    tracing::debug!(client_id = %client_id, cursor = %page.cursor, size = page.size, "Listing departments");

    Ok(Json(state.directory.list_departments(page).await?))
}

/// `GET /v1/depts/search`
pub async fn search_departments(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<SearchQuery>,
) -> Result<Json<PagingResult<Department>>, AppError> {
    metrics::record_directory_query("search_departments");

    Ok(Json(state.directory.search_departments(&query.keyword).await?))
}
