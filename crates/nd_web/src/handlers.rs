use axum::{
    extract::State,
    response::{Html, IntoResponse, Redirect},
    Form, Json,
};
use std::sync::Arc;
use nd_core::types::parse_date;
use nd_core::{Article, Category, Source};
use serde::Deserialize;
use tracing::info;

use crate::error::WebError;
use crate::page::{FilterEdit, PageState};
use crate::render;
use crate::AppState;

pub const HOME: &str = "/home";

/// Submitted filter form. Fields left out of the submission are unchanged.
#[derive(Debug, Default, Deserialize)]
pub struct FilterForm {
    pub category: Option<String>,
    pub keyword: Option<String>,
    pub source: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub action: Option<String>,
}

impl FilterForm {
    pub fn is_search(&self) -> bool {
        self.action.as_deref() == Some("search")
    }

    /// Converts the submitted fields into edits, rejecting malformed values
    /// before anything is applied.
    pub fn edits(&self) -> nd_core::Result<Vec<FilterEdit>> {
        let mut edits = Vec::new();
        if let Some(source) = &self.source {
            let source = source.trim();
            edits.push(FilterEdit::Source(
                (!source.is_empty()).then(|| source.to_string()),
            ));
        }
        if let Some(from) = &self.from {
            edits.push(FilterEdit::FromDate(parse_date(from)?));
        }
        if let Some(to) = &self.to {
            edits.push(FilterEdit::ToDate(parse_date(to)?));
        }
        if let Some(category) = &self.category {
            edits.push(FilterEdit::Category(category.parse::<Category>()?));
        }
        if let Some(keyword) = &self.keyword {
            edits.push(FilterEdit::Keyword(keyword.clone()));
        }
        Ok(edits)
    }
}

pub async fn index() -> Redirect {
    Redirect::to(HOME)
}

pub async fn home(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(render::render_page(&state.homepage.snapshot()))
}

pub async fn update_filters(
    State(state): State<Arc<AppState>>,
    Form(form): Form<FilterForm>,
) -> Result<impl IntoResponse, WebError> {
    let edits = form.edits()?;
    let page = &state.homepage;

    match page.apply(edits) {
        Some(fetch) => {
            info!("🔎 Filters changed, refreshing headlines and sources");
            fetch.spawn();
        }
        None if form.is_search() => {
            info!("🔎 Searching headlines");
            page.search().spawn();
        }
        None => {}
    }

    Ok(Redirect::to(HOME))
}

pub async fn get_state(State(state): State<Arc<AppState>>) -> Json<PageState> {
    Json(state.homepage.snapshot())
}

pub async fn list_articles(State(state): State<Arc<AppState>>) -> Json<Vec<Article>> {
    Json(state.homepage.snapshot().articles)
}

pub async fn list_sources(State(state): State<Arc<AppState>>) -> Json<Vec<Source>> {
    Json(state.homepage.snapshot().sources)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_form_edits() {
        let form = FilterForm {
            category: Some("science".to_string()),
            keyword: Some("mars".to_string()),
            source: Some(String::new()),
            from: Some("2024-03-01".to_string()),
            to: Some(String::new()),
            action: None,
        };
        let edits = form.edits().unwrap();
        assert_eq!(
            edits,
            vec![
                FilterEdit::Source(None),
                FilterEdit::FromDate(NaiveDate::from_ymd_opt(2024, 3, 1)),
                FilterEdit::ToDate(None),
                FilterEdit::Category(Category::Science),
                FilterEdit::Keyword("mars".to_string()),
            ]
        );
        assert!(!form.is_search());
    }

    #[test]
    fn test_form_rejects_bad_values() {
        let form = FilterForm {
            category: Some("weather".to_string()),
            ..FilterForm::default()
        };
        assert!(form.edits().is_err());

        let form = FilterForm {
            to: Some("yesterday".to_string()),
            ..FilterForm::default()
        };
        assert!(form.edits().is_err());
    }

    #[test]
    fn test_missing_fields_produce_no_edits() {
        let form = FilterForm {
            action: Some("search".to_string()),
            ..FilterForm::default()
        };
        assert!(form.edits().unwrap().is_empty());
        assert!(form.is_search());
    }
}
