//! HTTP module for the admission check API.

mod server;
mod service;

pub use server::HttpServer;
pub use service::{router, PRINCIPAL_HEADER};
