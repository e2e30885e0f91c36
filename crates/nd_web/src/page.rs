//! In-memory state of the news page and the fetches that update it.
//!
//! Every fetch is tagged with a sequence number when it begins. A response
//! is applied only if no newer fetch of the same kind has begun since, so
//! the most recently dispatched request always wins.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::NaiveDate;
use futures::future::{self, BoxFuture};
use nd_core::{Article, Category, FilterState, NewsApi, Source};
use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::{debug, error};

#[derive(Debug, Clone, Serialize)]
pub struct PageState {
    pub filters: FilterState,
    pub articles: Vec<Article>,
    pub sources: Vec<Source>,
    pub loading: bool,
    #[serde(skip)]
    pub(crate) headlines_seq: u64,
    #[serde(skip)]
    pub(crate) sources_seq: u64,
}

impl Default for PageState {
    fn default() -> Self {
        Self {
            filters: FilterState::default(),
            articles: Vec::new(),
            sources: Vec::new(),
            loading: true,
            headlines_seq: 0,
            sources_seq: 0,
        }
    }
}

/// A single change to the filter form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterEdit {
    Category(Category),
    Keyword(String),
    Source(Option<String>),
    FromDate(Option<NaiveDate>),
    ToDate(Option<NaiveDate>),
}

/// Requests that have begun but not yet resolved.
///
/// Beginning a fetch already marks the page as loading; the network part
/// runs when the fetch is awaited with [`Fetch::run`] or spawned.
#[must_use = "a fetch does nothing until it is run or spawned"]
pub struct Fetch {
    requests: Vec<BoxFuture<'static, ()>>,
}

impl Fetch {
    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    pub async fn run(self) {
        future::join_all(self.requests).await;
    }

    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }
}

/// Clears the loading flag when the headlines fetch it belongs to ends,
/// however it ends.
struct LoadingGuard {
    state: Arc<Mutex<PageState>>,
    seq: u64,
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        let mut state = lock(&self.state);
        if state.headlines_seq == self.seq {
            state.loading = false;
        }
    }
}

fn lock(state: &Mutex<PageState>) -> MutexGuard<'_, PageState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Clone)]
pub struct Homepage {
    api: Arc<dyn NewsApi>,
    state: Arc<Mutex<PageState>>,
}

impl Homepage {
    pub fn new(api: Arc<dyn NewsApi>) -> Self {
        Self {
            api,
            state: Arc::new(Mutex::new(PageState::default())),
        }
    }

    pub fn snapshot(&self) -> PageState {
        lock(&self.state).clone()
    }

    /// Initial load: headlines and sources for the default filters.
    pub fn mount(&self) -> Fetch {
        self.refresh()
    }

    /// Applies one field change. Category and keyword changes refetch
    /// headlines and sources; every other field only updates state.
    pub fn edit(&self, edit: FilterEdit) -> Option<Fetch> {
        self.apply([edit])
    }

    /// Applies several field changes at once, refetching at most once.
    pub fn apply(&self, edits: impl IntoIterator<Item = FilterEdit>) -> Option<Fetch> {
        let mut changed = false;
        {
            let mut state = lock(&self.state);
            let filters = &mut state.filters;
            for edit in edits {
                match edit {
                    FilterEdit::Category(category) => {
                        changed |= set_if_changed(&mut filters.category, category)
                    }
                    FilterEdit::Keyword(keyword) => {
                        changed |= set_if_changed(&mut filters.keyword, keyword)
                    }
                    FilterEdit::Source(source) => filters.source = source,
                    FilterEdit::FromDate(from) => filters.from = from,
                    FilterEdit::ToDate(to) => filters.to = to,
                }
            }
        }
        changed.then(|| self.refresh())
    }

    /// Refetches headlines with every current filter value, unvalidated.
    pub fn search(&self) -> Fetch {
        Fetch {
            requests: vec![self.begin_headlines()],
        }
    }

    fn refresh(&self) -> Fetch {
        Fetch {
            requests: vec![self.begin_headlines(), self.begin_sources()],
        }
    }

    fn begin_headlines(&self) -> BoxFuture<'static, ()> {
        let (seq, filters) = {
            let mut state = lock(&self.state);
            state.headlines_seq += 1;
            state.loading = true;
            (state.headlines_seq, state.filters.clone())
        };
        let api = self.api.clone();
        let state = self.state.clone();
        let guard = LoadingGuard {
            state: state.clone(),
            seq,
        };

        Box::pin(async move {
            let _guard = guard;
            match api.top_headlines(&filters).await {
                Ok(articles) => {
                    let mut state = lock(&state);
                    if state.headlines_seq == seq {
                        debug!("Showing {} headlines", articles.len());
                        state.articles = articles;
                    } else {
                        debug!("Discarding stale headlines response #{}", seq);
                    }
                }
                Err(e) => error!("Error fetching news articles: {}", e),
            }
        })
    }

    fn begin_sources(&self) -> BoxFuture<'static, ()> {
        let (seq, category) = {
            let mut state = lock(&self.state);
            state.sources_seq += 1;
            (state.sources_seq, state.filters.category)
        };
        let api = self.api.clone();
        let state = self.state.clone();

        Box::pin(async move {
            match api.sources(category).await {
                Ok(sources) => {
                    let mut state = lock(&state);
                    if state.sources_seq == seq {
                        state.sources = sources;
                    } else {
                        debug!("Discarding stale sources response #{}", seq);
                    }
                }
                Err(e) => error!("Error fetching news sources: {}", e),
            }
        })
    }
}

fn set_if_changed<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}
