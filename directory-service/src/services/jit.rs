//! Synthetic directory for load and mock testing.
//!
//! Nothing is stored: every department and user is a pure function of the
//! generator parameters and its index, so the same request always produces
//! the same page.

use async_trait::async_trait;

use super::{
    directory::DirectoryStore,
    error::ServiceError,
    paging::{page_bounds, Cursor, PageRequest, PagingResult},
};
use crate::models::{Department, Group, User, UserStatus};

#[derive(Debug, Clone)]
pub struct JitDirectory {
    prefix: String,
    departments: usize,
    users_per_department: usize,
}

impl JitDirectory {
    pub fn new(prefix: impl Into<String>, departments: usize, users_per_department: usize) -> Self {
        Self {
            prefix: prefix.into(),
            departments,
            users_per_department,
        }
    }

    /// Saturates instead of overflowing for absurd configurations.
    pub fn total_users(&self) -> usize {
        self.departments.saturating_mul(self.users_per_department)
    }

    /// `{prefix}-{n}` where `n` is the 1-based index, zero-padded to the
    /// width of the department count.
    fn department(&self, index: usize) -> Department {
        let width = self.departments.to_string().len();
        let id = format!("{}-{:0width$}", self.prefix, index + 1, width = width);
        Department {
            name: id.clone(),
            id,
            parent_id: None,
            order: index as i64 + 1,
        }
    }

    fn user(&self, department_id: &str, index: usize) -> User {
        let id = format!("{department_id}-u-{index}");
        User {
            username: Some(id.clone()),
            email: Some(format!("{id}@mailinator.com")),
            mobile: None,
            name: id.clone(),
            position: Some("mock".to_string()),
            employee_number: Some(id.clone()),
            status: UserStatus::Initialized,
            order: index as i64,
            main_department_id: department_id.to_string(),
            other_department_ids: Vec::new(),
            id,
        }
    }
}

fn generate<T>(total: usize, page: PageRequest, make: impl Fn(usize) -> T) -> PagingResult<T> {
    let (range, next) = page_bounds(total, page.cursor.offset(), page.size);
    PagingResult::with_next(range.map(make).collect(), next.map(Cursor::at))
}

#[async_trait]
impl DirectoryStore for JitDirectory {
    async fn list_departments(
        &self,
        page: PageRequest,
    ) -> Result<PagingResult<Department>, ServiceError> {
        Ok(generate(self.departments, page, |i| self.department(i)))
    }

    async fn search_departments(
        &self,
        _keyword: &str,
    ) -> Result<PagingResult<Department>, ServiceError> {
        Err(ServiceError::Unsupported("department search"))
    }

    /// Every department has the same `users_per_department` users; the
    /// department id is not checked against the generated ones.
    async fn list_users_in_department(
        &self,
        department_id: &str,
        page: PageRequest,
    ) -> Result<PagingResult<User>, ServiceError> {
        Ok(generate(self.users_per_department, page, |i| {
            self.user(department_id, i)
        }))
    }

    async fn search_users(&self, _keyword: &str) -> Result<PagingResult<User>, ServiceError> {
        Err(ServiceError::Unsupported("user search"))
    }

    async fn list_groups(&self, _page: PageRequest) -> Result<PagingResult<Group>, ServiceError> {
        Err(ServiceError::Unsupported("group listing"))
    }

    async fn search_groups(&self, _keyword: &str) -> Result<PagingResult<Group>, ServiceError> {
        Err(ServiceError::Unsupported("group search"))
    }

    async fn list_users_in_group(
        &self,
        _group_id: &str,
        _page: PageRequest,
    ) -> Result<PagingResult<String>, ServiceError> {
        Err(ServiceError::Unsupported("group membership listing"))
    }
}
