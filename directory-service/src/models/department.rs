use serde::{Deserialize, Serialize};

/// A node of the organization tree.
///
/// Only `parent_id` links departments together; nothing here walks the tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Department {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub order: i64,
}
