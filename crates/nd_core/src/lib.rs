pub mod api;
pub mod config;
pub mod error;
pub mod types;

pub use api::NewsApi;
pub use config::NewsConfig;
pub use error::{Error, Result};
pub use types::{Article, ArticleSource, Category, FilterState, Source, PLACEHOLDER_IMAGE};
