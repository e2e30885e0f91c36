//! HTML for the news page.

use std::fmt::Write;

use nd_core::types::format_date;
use nd_core::{Article, Category, FilterState, Source};

use crate::page::PageState;

pub const FILTERS_ACTION: &str = "/home/filters";

const STYLESHEET: &str = "https://cdn.jsdelivr.net/npm/bootstrap@5.3.3/dist/css/bootstrap.min.css";

/// Whole page: title, filter form, and either the loading indicator or the
/// article grid.
pub fn render_page(state: &PageState) -> String {
    let refresh = if state.loading {
        r#"<meta http-equiv="refresh" content="1">"#
    } else {
        ""
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
{refresh}
<title>News</title>
<link rel="stylesheet" href="{STYLESHEET}">
</head>
<body>
<div class="container">
<h1 class="my-4 text-center text-uppercase display-1">News</h1>
{form}
<div class="row" id="results">
{results}
</div>
</div>
</body>
</html>
"#,
        form = render_filters(&state.filters, &state.sources),
        results = render_results(state),
    )
}

pub fn render_filters(filters: &FilterState, sources: &[Source]) -> String {
    let mut categories = String::new();
    for category in Category::ALL {
        let _ = write!(
            categories,
            r#"<option value="{}"{}>{}</option>"#,
            category.as_str(),
            selected(filters.category == category),
            category.label(),
        );
    }

    format!(
        r#"<form class="mb-4" method="post" action="{FILTERS_ACTION}">
<div class="row g-3">
<div class="col-md-6">
<label class="form-label" for="category">Category</label>
<select class="form-select" id="category" name="category" onchange="this.form.requestSubmit()">{categories}</select>
</div>
<div class="col-md-6">
<label class="form-label" for="keyword">Search</label>
<input class="form-control" type="text" id="keyword" name="keyword" placeholder="Enter keyword" value="{keyword}" onchange="this.form.requestSubmit()">
</div>
<div class="col-md-6">
<label class="form-label" for="source">Source</label>
<select class="form-select" id="source" name="source">{sources}</select>
</div>
<div class="col-md-3">
<label class="form-label" for="from">From Date</label>
<input class="form-control" type="date" id="from" name="from" value="{from}">
</div>
<div class="col-md-3">
<label class="form-label" for="to">To Date</label>
<input class="form-control" type="date" id="to" name="to" value="{to}">
</div>
</div>
<button class="btn btn-dark mt-3" type="submit" name="action" value="search">Search</button>
</form>"#,
        keyword = escape(&filters.keyword),
        sources = render_source_options(sources, filters.source.as_deref()),
        from = format_date(filters.from),
        to = format_date(filters.to),
    )
}

/// "All Sources" followed by every source in the order given.
pub fn render_source_options(sources: &[Source], current: Option<&str>) -> String {
    let mut html = format!(
        r#"<option value=""{}>All Sources</option>"#,
        selected(current.is_none())
    );
    for source in sources {
        let _ = write!(
            html,
            r#"<option value="{}"{}>{}</option>"#,
            escape(&source.id),
            selected(current == Some(source.id.as_str())),
            escape(&source.name),
        );
    }
    html
}

pub fn render_results(state: &PageState) -> String {
    if state.loading {
        return r#"<h2 class="loading">Loading...</h2>"#.to_string();
    }
    state
        .articles
        .iter()
        .map(|article| format!(r#"<div class="col-md-4 mb-4">{}</div>"#, render_card(article)))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_card(article: &Article) -> String {
    format!(
        r#"<div class="card h-100 article-card">
<img class="card-img-top article-img" src="{image}" alt="{title}">
<div class="card-body">
<h5 class="card-title">{title}</h5>
{byline}<p class="card-text">{description}</p>
<a class="btn btn-dark" href="{url}" target="_blank" rel="noopener noreferrer">Read More</a>
</div>
</div>"#,
        image = escape(article.image_url()),
        title = escape(&article.title),
        byline = article
            .byline()
            .map(|b| format!("<p class=\"card-subtitle text-muted small\">{}</p>\n", escape(&b)))
            .unwrap_or_default(),
        description = escape(article.description.as_deref().unwrap_or_default()),
        url = escape(&article.url),
    )
}

fn selected(is_selected: bool) -> &'static str {
    if is_selected {
        " selected"
    } else {
        ""
    }
}

/// Escapes text for use in element content and quoted attribute values.
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use nd_core::PLACEHOLDER_IMAGE;
    use scraper::{Html, Selector};

    fn loaded(articles: Vec<Article>, sources: Vec<Source>) -> PageState {
        PageState {
            articles,
            sources,
            loading: false,
            ..PageState::default()
        }
    }

    fn select<'a>(document: &'a Html, selector: &str) -> Vec<scraper::ElementRef<'a>> {
        let selector = Selector::parse(selector).unwrap();
        document.select(&selector).collect()
    }

    fn text(element: &scraper::ElementRef<'_>) -> String {
        element.text().collect::<String>()
    }

    #[test]
    fn test_one_card_per_article_in_order() {
        let mut with_image = Article::new("First", "https://example.com/1");
        with_image.description = Some("About the first".to_string());
        with_image.url_to_image = Some("https://img.example.com/1.jpg".to_string());
        let without_image = Article::new("Second", "https://example.com/2");

        let html = render_page(&loaded(vec![with_image, without_image], vec![]));
        let document = Html::parse_document(&html);

        let cards = select(&document, ".article-card");
        assert_eq!(cards.len(), 2);

        let titles: Vec<String> = select(&document, ".card-title").iter().map(text).collect();
        assert_eq!(titles, vec!["First", "Second"]);

        let descriptions: Vec<String> = select(&document, ".card-text").iter().map(text).collect();
        assert_eq!(descriptions, vec!["About the first", ""]);

        let images: Vec<&str> = select(&document, ".card-img-top")
            .iter()
            .filter_map(|img| img.value().attr("src"))
            .collect();
        assert_eq!(images, vec!["https://img.example.com/1.jpg", PLACEHOLDER_IMAGE]);

        let links = select(&document, ".card-body a");
        assert_eq!(links[1].value().attr("href"), Some("https://example.com/2"));
        assert!(links.iter().all(|a| a.value().attr("target") == Some("_blank")));
        assert!(select(&document, ".loading").is_empty());
    }

    #[test]
    fn test_card_byline() {
        let mut article = Article::new("Signed", "https://example.com/s");
        article.author = Some("Ana <Staff>".to_string());
        let html = render_card(&article);
        let document = Html::parse_fragment(&html);
        let byline = select(&document, ".card-subtitle");
        assert_eq!(byline.len(), 1);
        assert_eq!(text(&byline[0]), "Ana <Staff>");

        let html = render_card(&Article::new("Unsigned", "https://example.com/u"));
        let document = Html::parse_fragment(&html);
        assert!(select(&document, ".card-subtitle").is_empty());
    }

    #[test]
    fn test_loading_hides_cards() {
        let mut state = loaded(vec![Article::new("Hidden", "https://example.com")], vec![]);
        state.loading = true;

        let html = render_page(&state);
        let document = Html::parse_document(&html);
        let loading = select(&document, ".loading");
        assert_eq!(loading.len(), 1);
        assert_eq!(text(&loading[0]), "Loading...");
        assert!(select(&document, ".article-card").is_empty());
        assert!(html.contains(r#"http-equiv="refresh""#));
    }

    #[test]
    fn test_source_options() {
        let sources = vec![
            Source { id: "bbc-news".to_string(), name: "BBC News".to_string() },
            Source { id: "cnn".to_string(), name: "CNN".to_string() },
        ];
        let html = render_page(&loaded(vec![], sources));
        let document = Html::parse_document(&html);

        let options = select(&document, "#source option");
        let labels: Vec<String> = options.iter().map(text).collect();
        assert_eq!(labels, vec!["All Sources", "BBC News", "CNN"]);
        let values: Vec<&str> = options
            .iter()
            .filter_map(|o| o.value().attr("value"))
            .collect();
        assert_eq!(values, vec!["", "bbc-news", "cnn"]);
    }

    #[test]
    fn test_form_reflects_filters() {
        let mut state = loaded(vec![], vec![]);
        state.filters.category = Category::Health;
        state.filters.keyword = "flu \"season\"".to_string();
        state.filters.from = chrono::NaiveDate::from_ymd_opt(2024, 1, 2);

        let html = render_page(&state);
        let document = Html::parse_document(&html);

        let selected: Vec<String> = select(&document, "#category option[selected]")
            .iter()
            .map(text)
            .collect();
        assert_eq!(selected, vec!["Health"]);
        assert_eq!(select(&document, "#category option").len(), 7);
        assert_eq!(
            select(&document, "#keyword")[0].value().attr("value"),
            Some("flu \"season\"")
        );
        assert_eq!(select(&document, "#from")[0].value().attr("value"), Some("2024-01-02"));
        assert_eq!(select(&document, "#to")[0].value().attr("value"), Some(""));
    }

    #[test]
    fn test_escape() {
        assert_eq!(
            escape(r#"<script>alert("x") & 'y'</script>"#),
            "&lt;script&gt;alert(&quot;x&quot;) &amp; &#39;y&#39;&lt;/script&gt;"
        );
    }
}
