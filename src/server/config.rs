use super::RequestsLoggingLevel;
use crate::config::DEFAULT_MAX_UPLOAD_BYTES;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub requests_logging_level: RequestsLoggingLevel,
    pub port: u16,
    pub bind_address: String,
    /// Directory served in place of the embedded page, if set.
    pub frontend_dir_path: Option<String>,
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            requests_logging_level: RequestsLoggingLevel::Path,
            port: 8000,
            bind_address: "0.0.0.0".to_string(),
            frontend_dir_path: None,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}
