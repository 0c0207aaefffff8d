use crate::domain::chat::SearchDocument;
use async_trait::async_trait;

/// Repository for the training-document index.
#[async_trait]
pub trait SearchRepository: Send + Sync {
    /// Full-text search over document titles and content
    ///
    /// Returns at most `top` documents that have content, best match first.
    async fn search(&self, query: &str, top: usize) -> Result<Vec<SearchDocument>, String>;
}
