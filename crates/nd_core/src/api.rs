use async_trait::async_trait;
use crate::types::{Article, Category, FilterState, Source};
use crate::Result;

#[async_trait]
pub trait NewsApi: Send + Sync {
    /// Top headlines matching the category, keyword and date range of `filters`
    async fn top_headlines(&self, filters: &FilterState) -> Result<Vec<Article>>;

    /// Outlets available for a category
    async fn sources(&self, category: Category) -> Result<Vec<Source>>;
}
