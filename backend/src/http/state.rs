//! Shared state handed to every handler.

use std::sync::Arc;

use crate::db::repository::FullRepository;

/// The repository the server was started with, behind a trait object so
/// handlers do not depend on the backend.
#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<dyn FullRepository>,
}

impl AppState {
    pub fn new(repository: Arc<dyn FullRepository>) -> Self {
        Self { repository }
    }
}

impl<R> From<Arc<R>> for AppState
where
    R: FullRepository + 'static,
{
    fn from(repository: Arc<R>) -> Self {
        Self::new(repository)
    }
}
