use axum::{extract::State, Json};
use service_core::error::AppError;

use crate::{
    dtos::paging::{GroupFilter, PagingQuery, SearchQuery},
    models::Group,
    services::{metrics, PagingResult},
    utils::validation::ValidatedQuery,
    AppState,
};

/// `GET /v1/groups`
pub async fn list_groups(
    State(state): State<AppState>,
    ValidatedQuery(paging): ValidatedQuery<PagingQuery>,
) -> Result<Json<PagingResult<Group>>, AppError> {
    metrics::record_directory_query("list_groups");
    let page = paging.page_request()?;

    Ok(Json(state.directory.list_groups(page).await?))
}

/// `GET /v1/groups/search`
pub async fn search_groups(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<SearchQuery>,
) -> Result<Json<PagingResult<Group>>, AppError> {
    metrics::record_directory_query("search_groups");

    Ok(Json(state.directory.search_groups(&query.keyword).await?))
}

/// `GET /v1/groups/users?group_id=...`: member user ids, paged.
pub async fn list_users_in_group(
    State(state): State<AppState>,
    ValidatedQuery(filter): ValidatedQuery<GroupFilter>,
    ValidatedQuery(paging): ValidatedQuery<PagingQuery>,
) -> Result<Json<PagingResult<String>>, AppError> {
    metrics::record_directory_query("list_users_in_group");
    let page = paging.page_request()?;

    Ok(Json(
        state
            .directory
            .list_users_in_group(&filter.group_id, page)
            .await?,
    ))
}
