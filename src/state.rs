use crate::config::settings::AppConfig;
use crate::infrastructure::http::client::Fetcher;
use crate::infrastructure::media::MediaProcessor;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub fetcher: Fetcher,
    pub processor: Arc<dyn MediaProcessor>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        fetcher: Fetcher,
        processor: Arc<dyn MediaProcessor>,
    ) -> Self {
        Self {
            config,
            fetcher,
            processor,
        }
    }
}
