use async_trait::async_trait;
use std::path::PathBuf;

use super::{
    error::ServiceError,
    loader::CollectionLoader,
    paging::{paginate, PageRequest, PagingResult},
};
use crate::models::{Department, Group, GroupMembership, User};

/// Maximum number of records a search ever returns.
pub const SEARCH_LIMIT: usize = 10;

/// Read access to an organization directory.
///
/// Listings are paged with the offset cursor contract from
/// [`super::paging`]; searches always return a single bounded page.
#[async_trait]
pub trait DirectoryStore: Send + Sync {
    async fn list_departments(
        &self,
        page: PageRequest,
    ) -> Result<PagingResult<Department>, ServiceError>;

    async fn search_departments(
        &self,
        keyword: &str,
    ) -> Result<PagingResult<Department>, ServiceError>;

    async fn list_users_in_department(
        &self,
        department_id: &str,
        page: PageRequest,
    ) -> Result<PagingResult<User>, ServiceError>;

    async fn search_users(&self, keyword: &str) -> Result<PagingResult<User>, ServiceError>;

    async fn list_groups(&self, page: PageRequest) -> Result<PagingResult<Group>, ServiceError>;

    async fn search_groups(&self, keyword: &str) -> Result<PagingResult<Group>, ServiceError>;

    /// Member user ids of `group_id`, paged.
    async fn list_users_in_group(
        &self,
        group_id: &str,
        page: PageRequest,
    ) -> Result<PagingResult<String>, ServiceError>;
}

/// Locations of the four collection files behind a [`FileDirectory`].
#[derive(Debug, Clone)]
pub struct DirectoryFiles {
    pub departments: PathBuf,
    pub users: PathBuf,
    pub groups: PathBuf,
    pub group_users: PathBuf,
}

/// Directory backed by JSON snapshot files, each read once on first use.
pub struct FileDirectory {
    departments: CollectionLoader<Department>,
    users: CollectionLoader<User>,
    groups: CollectionLoader<Group>,
    group_users: CollectionLoader<GroupMembership>,
}

impl FileDirectory {
    pub fn new(files: &DirectoryFiles) -> Self {
        Self {
            departments: CollectionLoader::from_file(&files.departments),
            users: CollectionLoader::from_file(&files.users),
            groups: CollectionLoader::from_file(&files.groups),
            group_users: CollectionLoader::from_file(&files.group_users),
        }
    }

    pub fn from_records(
        departments: Vec<Department>,
        users: Vec<User>,
        groups: Vec<Group>,
        group_users: Vec<GroupMembership>,
    ) -> Self {
        Self {
            departments: CollectionLoader::from_records(departments),
            users: CollectionLoader::from_records(users),
            groups: CollectionLoader::from_records(groups),
            group_users: CollectionLoader::from_records(group_users),
        }
    }

    /// Read every collection now and fail on the first unreadable one.
    pub async fn preload(&self) -> Result<(), anyhow::Error> {
        self.departments.try_load().await?;
        self.users.try_load().await?;
        self.groups.try_load().await?;
        self.group_users.try_load().await?;
        Ok(())
    }
}

#[async_trait]
impl DirectoryStore for FileDirectory {
    async fn list_departments(
        &self,
        page: PageRequest,
    ) -> Result<PagingResult<Department>, ServiceError> {
        let departments = self.departments.load().await;
        Ok(paginate(&departments, page))
    }

    async fn search_departments(
        &self,
        keyword: &str,
    ) -> Result<PagingResult<Department>, ServiceError> {
        let departments = self.departments.load().await;
        Ok(search(&departments, keyword, |d, kw| {
            equals_ignore_case(&d.name, kw) || equals_ignore_case(&d.id, kw)
        }))
    }

    async fn list_users_in_department(
        &self,
        department_id: &str,
        page: PageRequest,
    ) -> Result<PagingResult<User>, ServiceError> {
        let users = self.users.load().await;
        let members: Vec<User> = users
            .iter()
            .filter(|u| u.is_member_of(department_id))
            .cloned()
            .collect();
        Ok(paginate(&members, page))
    }

    async fn search_users(&self, keyword: &str) -> Result<PagingResult<User>, ServiceError> {
        let users = self.users.load().await;
        Ok(search(&users, keyword, user_matches))
    }

    async fn list_groups(&self, page: PageRequest) -> Result<PagingResult<Group>, ServiceError> {
        let groups = self.groups.load().await;
        Ok(paginate(&groups, page))
    }

    async fn search_groups(&self, keyword: &str) -> Result<PagingResult<Group>, ServiceError> {
        let groups = self.groups.load().await;
        Ok(search(&groups, keyword, |g, kw| {
            equals_ignore_case(&g.name, kw) || equals_ignore_case(&g.id, kw)
        }))
    }

    async fn list_users_in_group(
        &self,
        group_id: &str,
        page: PageRequest,
    ) -> Result<PagingResult<String>, ServiceError> {
        let memberships = self.group_users.load().await;
        let members: Vec<String> = memberships
            .iter()
            .filter(|m| m.group_id == group_id)
            .flat_map(|m| m.member_user_ids.iter().cloned())
            .collect();
        Ok(paginate(&members, page))
    }
}

/// A directory with nothing in it. Every listing and search is empty.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmptyDirectory;

#[async_trait]
impl DirectoryStore for EmptyDirectory {
    async fn list_departments(
        &self,
        _page: PageRequest,
    ) -> Result<PagingResult<Department>, ServiceError> {
        Ok(PagingResult::empty())
    }

    async fn search_departments(
        &self,
        _keyword: &str,
    ) -> Result<PagingResult<Department>, ServiceError> {
        Ok(PagingResult::empty())
    }

    async fn list_users_in_department(
        &self,
        _department_id: &str,
        _page: PageRequest,
    ) -> Result<PagingResult<User>, ServiceError> {
        Ok(PagingResult::empty())
    }

    async fn search_users(&self, _keyword: &str) -> Result<PagingResult<User>, ServiceError> {
        Ok(PagingResult::empty())
    }

    async fn list_groups(&self, _page: PageRequest) -> Result<PagingResult<Group>, ServiceError> {
        Ok(PagingResult::empty())
    }

    async fn search_groups(&self, _keyword: &str) -> Result<PagingResult<Group>, ServiceError> {
        Ok(PagingResult::empty())
    }

    async fn list_users_in_group(
        &self,
        _group_id: &str,
        _page: PageRequest,
    ) -> Result<PagingResult<String>, ServiceError> {
        Ok(PagingResult::empty())
    }
}

/// First [`SEARCH_LIMIT`] records accepted by `matches`, in sequence order.
///
/// The keyword is trimmed first; a blank keyword matches nothing.
fn search<T, F>(records: &[T], keyword: &str, matches: F) -> PagingResult<T>
where
    T: Clone,
    F: Fn(&T, &str) -> bool,
{
    let keyword = keyword.trim();
    if keyword.is_empty() {
        return PagingResult::empty();
    }

    let found = records
        .iter()
        .filter(|r| matches(r, keyword))
        .take(SEARCH_LIMIT)
        .cloned()
        .collect();
    PagingResult::last(found)
}

fn equals_ignore_case(field: &str, keyword: &str) -> bool {
    field.to_lowercase() == keyword.to_lowercase()
}

fn user_matches(user: &User, keyword: &str) -> bool {
    let keyword = keyword.to_lowercase();
    let optional = |f: &Option<String>| f.as_deref().unwrap_or_default().to_lowercase();

    [
        user.name.to_lowercase(),
        user.id.to_lowercase(),
        optional(&user.username),
        optional(&user.email),
        optional(&user.mobile),
        optional(&user.employee_number),
    ]
    .iter()
    .any(|field| field.contains(&keyword))
}
