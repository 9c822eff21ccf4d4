//! Request and response data transfer objects.

pub mod response;

pub use response::ApiResponse;
