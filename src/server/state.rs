use crate::analysis::MediaAnalyzer;
use std::sync::Arc;
use std::time::Instant;

use super::ServerConfig;

pub type GuardedAnalyzer = Arc<dyn MediaAnalyzer>;

#[derive(Clone)]
pub struct ServerState {
    pub config: ServerConfig,
    pub start_time: Instant,
    pub analyzer: GuardedAnalyzer,
    pub hash: String,
}

impl ServerState {
    pub fn new(config: ServerConfig, analyzer: GuardedAnalyzer) -> Self {
        ServerState {
            config,
            start_time: Instant::now(),
            analyzer,
            hash: env!("GIT_HASH").to_owned(),
        }
    }
}

