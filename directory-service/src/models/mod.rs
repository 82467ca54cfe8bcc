pub mod client;
pub mod department;
pub mod group;
pub mod token;
pub mod user;

pub use client::ClientCredential;
pub use department::Department;
pub use group::{Group, GroupMembership};
pub use token::Token;
pub use user::{User, UserStatus};
