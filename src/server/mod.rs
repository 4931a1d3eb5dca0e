mod analyze_routes;
pub mod config;
mod error;
mod http_layers;
pub mod metrics;
pub mod server;
pub mod state;
mod upload;

#[cfg(test)]
mod test_utils;

pub use config::ServerConfig;
pub use error::{ApiError, ErrorResponse};
pub use http_layers::*;
pub use server::{make_app, run_server};
pub use upload::UploadError;
