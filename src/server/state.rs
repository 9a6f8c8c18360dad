use std::sync::Arc;

use crate::templates::TemplateStore;
use crate::typography::Typography;

/// Shared by every request. Only the font cache is mutated, behind its own lock.
#[derive(Debug, Clone)]
pub struct AppState {
    pub typography: Arc<Typography>,
    pub templates: TemplateStore,
    pub(crate) http: reqwest::Client,
}

impl AppState {
    pub fn new(typography: Arc<Typography>, templates: TemplateStore) -> Self {
        Self {
            typography,
            templates,
            http: reqwest::Client::new(),
        }
    }
}
