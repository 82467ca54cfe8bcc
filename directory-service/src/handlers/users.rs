use axum::{extract::State, Json};
use service_core::error::AppError;

use crate::{
    dtos::paging::{DepartmentFilter, PagingQuery, SearchQuery},
    middleware::AuthenticatedClient,
    models::User,
    services::{metrics, PagingResult},
    utils::validation::ValidatedQuery,
    AppState,
};

/// `GET /v1/users?department_id=...`: direct members of one department,
/// by main or secondary membership.
pub async fn list_users_in_department(
    State(state): State<AppState>,
    AuthenticatedClient(client_id): AuthenticatedClient,
    ValidatedQuery(filter): ValidatedQuery<DepartmentFilter>,
    ValidatedQuery(paging): ValidatedQuery<PagingQuery>,
) -> Result<Json<PagingResult<User>>, AppError> {
    metrics::record_directory_query("list_users_in_department");
    let page = paging.page_request()?;
    tracing::debug!(
        client_id = %client_id,
        department_id = %filter.department_id,
        cursor = %page.cursor,
        size = page.size,
        "Listing department users"
    );

    Ok(Json(
        state
            .directory
            .list_users_in_department(&filter.department_id, page)
            .await?,
    ))
}

/// `GET /v1/users/search`
pub async fn search_users(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<SearchQuery>,
) -> Result<Json<PagingResult<User>>, AppError> {
    metrics::record_directory_query("search_users");

    Ok(Json(state.directory.search_users(&query.keyword).await?))
}
