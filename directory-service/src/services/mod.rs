//! Core services: collection loading, paging, directory queries, client
//! credentials and bearer tokens.

pub mod auth;
pub mod clients;
pub mod directory;
pub mod error;
pub mod jit;
pub mod loader;
pub mod metrics;
pub mod paging;
pub mod tokens;

pub use auth::AuthService;
pub use clients::{AllowAnyClients, ClientStore, MemoryClientStore};
pub use directory::{DirectoryFiles, DirectoryStore, EmptyDirectory, FileDirectory, SEARCH_LIMIT};
pub use error::{ServiceError, TokenRejection};
pub use jit::JitDirectory;
pub use loader::CollectionLoader;
pub use paging::{Cursor, PageRequest, PagingResult, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
pub use tokens::{
    AllowAnyAuthority, JwtTokenAuthority, SigningAlgorithm, SigningKeys, TokenAuthority,
};
