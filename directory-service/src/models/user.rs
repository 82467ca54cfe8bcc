use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserStatus {
    #[default]
    Initialized,
    Active,
    Disabled,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_number: Option<String>,
    #[serde(default)]
    pub status: UserStatus,
    #[serde(default)]
    pub order: i64,
    pub main_department_id: String,
    #[serde(default)]
    pub other_department_ids: Vec<String>,
}

impl User {
    /// Whether the user belongs to `department_id`, either as main or as a
    /// secondary department.
    pub fn is_member_of(&self, department_id: &str) -> bool {
        self.main_department_id == department_id
            || self.other_department_ids.iter().any(|d| d == department_id)
    }
}
