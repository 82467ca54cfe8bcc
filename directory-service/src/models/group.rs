use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: String,
    pub name: String,
}

/// Members of one group. A group normally has a single membership record,
/// but several records with the same `group_id` are all honoured.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupMembership {
    pub group_id: String,
    #[serde(default)]
    pub member_user_ids: Vec<String>,
}
