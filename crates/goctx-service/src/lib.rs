//! # goctx-service
//!
//! The service facade consumed by the request transport: three operations
//! — `index_codebase`, `search_code`, `get_status` — over one project's
//! store, embedder, indexer, and search engine, all constructed once at
//! service start and passed down explicitly.

pub mod error;
pub mod paths;
pub mod requests;
pub mod responses;
pub mod service;

pub use error::ServiceError;
pub use requests::{IndexCodebaseRequest, SearchCodeRequest, SearchFiltersRequest, StatusRequest};
pub use responses::{IndexCodebaseResponse, SearchCodeResponse, StatusResponse};
pub use service::ContextService;
