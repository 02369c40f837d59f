//! HTTP plumbing shared by the agent client and the knowledge store.

pub mod http;
pub mod multipart;

pub use http::{auth_headers, endpoint, read_json, shared_client, status_to_error};
