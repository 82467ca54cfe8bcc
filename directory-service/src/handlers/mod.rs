pub mod departments;
pub mod groups;
pub mod health;
pub mod token;
pub mod users;
pub mod well_known;

pub use departments::{list_departments, search_departments};
pub use groups::{list_groups, list_users_in_group, search_groups};
pub use health::{health_check, metrics};
pub use token::issue_token;
pub use users::{list_users_in_department, search_users};
pub use well_known::well_known;
