pub mod client;
pub mod errors;
pub mod pipeline;
pub mod types;

pub use client::{OPT_OUT_COOKIE, PageFetcher};
pub use errors::FetchError;
pub use types::PageResponse;
