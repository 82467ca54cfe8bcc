use serde::Deserialize;
use validator::Validate;

use crate::services::{PageRequest, ServiceError, DEFAULT_PAGE_SIZE};

/// `cursor` and `size` query parameters shared by every listing.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct PagingQuery {
    #[serde(default)]
    pub cursor: Option<String>,
    #[validate(range(min = 1, max = 1000, message = "size must be between 1 and 1000"))]
    #[serde(default)]
    pub size: Option<usize>,
}

impl PagingQuery {
    pub fn page_request(&self) -> Result<PageRequest, ServiceError> {
        let cursor = self.cursor.as_deref().unwrap_or_default().parse()?;
        Ok(PageRequest::new(cursor, self.size.unwrap_or(DEFAULT_PAGE_SIZE)))
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct SearchQuery {
    #[serde(default)]
    pub keyword: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct DepartmentFilter {
    #[validate(length(min = 1, message = "department_id is required"))]
    pub department_id: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct GroupFilter {
    #[validate(length(min = 1, message = "group_id is required"))]
    pub group_id: String,
}
