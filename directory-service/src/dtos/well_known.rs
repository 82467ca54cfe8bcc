use serde::{Deserialize, Serialize};

/// Discovery document listing the absolute URL of every endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WellKnownResponse {
    pub token_endpoint: String,
    pub list_users_in_department_endpoint: String,
    pub search_user_endpoint: String,
    pub list_departments_endpoint: String,
    pub search_department_endpoint: String,
    pub list_groups_endpoint: String,
    pub search_group_endpoint: String,
    pub list_users_in_group_endpoint: String,
}

impl WellKnownResponse {
    /// `base` is the absolute URL the endpoint paths are appended to, with
    /// or without a trailing slash.
    pub fn new(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        let url = |path: &str| format!("{base}/{path}");
        Self {
            token_endpoint: url("token"),
            list_users_in_department_endpoint: url("users"),
            search_user_endpoint: url("users/search"),
            list_departments_endpoint: url("depts"),
            search_department_endpoint: url("depts/search"),
            list_groups_endpoint: url("groups"),
            search_group_endpoint: url("groups/search"),
            list_users_in_group_endpoint: url("groups/users"),
        }
    }
}
