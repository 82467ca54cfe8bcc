pub mod paging;
pub mod token;
pub mod well_known;

pub use service_core::error::ErrorResponse;
