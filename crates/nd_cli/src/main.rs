use chrono::NaiveDate;
use clap::Parser;
use nd_client::NewsApiClient;
use nd_core::config::{DEFAULT_BASE_URL, DEFAULT_COUNTRY, DEFAULT_LANGUAGE};
use nd_core::{Article, Category, FilterState, NewsApi, NewsConfig, Result, Source};
use nd_web::Homepage;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

mod logging;

#[derive(Parser, Debug)]
#[command(author, version, about = "Browse top headlines from the News API", long_about = None)]
pub struct Cli {
    /// News API key
    #[arg(long, env = "NEWS_API_KEY", hide_env_values = true)]
    api_key: String,
    #[arg(long, env = "NEWS_API_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,
    #[arg(long, default_value = DEFAULT_COUNTRY)]
    country: String,
    #[arg(long, default_value = DEFAULT_LANGUAGE)]
    language: String,
    /// More log output (-v, -vv). RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Serve the news page
    Serve {
        #[arg(long, default_value = "127.0.0.1:3000")]
        addr: SocketAddr,
    },
    /// Print top headlines
    Headlines {
        #[arg(long, default_value_t = Category::General)]
        category: Category,
        #[arg(long, short = 'q', default_value = "")]
        keyword: String,
        /// Earliest publication date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<NaiveDate>,
        /// Latest publication date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<NaiveDate>,
        #[arg(long)]
        json: bool,
    },
    /// Print the sources available for a category
    Sources {
        #[arg(long, default_value_t = Category::General)]
        category: Category,
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    fn news_config(&self) -> Result<NewsConfig> {
        Ok(NewsConfig::new(self.api_key.clone())?
            .with_base_url(&self.base_url)?
            .with_country(self.country.clone())
            .with_language(self.language.clone()))
    }
}

fn format_headline(article: &Article) -> String {
    let mut lines = vec![format!("📰 {}", article.title)];
    if let Some(source) = &article.source {
        lines.push(format!("   🏷️  {}", source.name));
    }
    if let Some(byline) = article.byline() {
        lines.push(format!("   ✍️  {}", byline));
    }
    if let Some(description) = article.description.as_deref().filter(|d| !d.is_empty()) {
        lines.push(format!("   {}", description));
    }
    lines.push(format!("   🔗 {}", article.url));
    lines.join("\n")
}

fn format_source(source: &Source) -> String {
    format!("{:<28} {}", source.id, source.name)
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    let config = cli.news_config()?;
    info!("🗞️ Using News API at {}", config.base_url);
    let client = NewsApiClient::new(config);

    match cli.command {
        Commands::Serve { addr } => {
            let homepage = Homepage::new(Arc::new(client));
            nd_web::serve(addr, homepage).await?;
        }
        Commands::Headlines { category, keyword, from, to, json } => {
            let filters = FilterState {
                category,
                keyword,
                source: None,
                from,
                to,
            };
            let articles = client.top_headlines(&filters).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&articles)?);
            } else {
                info!("Found {} headlines", articles.len());
                for article in &articles {
                    println!("{}\n", format_headline(article));
                }
            }
        }
        Commands::Sources { category, json } => {
            let sources = client.sources(category).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&sources)?);
            } else {
                println!("All Sources");
                for source in &sources {
                    println!("{}", format_source(source));
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use nd_core::ArticleSource;

    #[test]
    fn test_parse_headlines_args() {
        let cli = Cli::try_parse_from([
            "nd",
            "--api-key",
            "k",
            "headlines",
            "--category",
            "science",
            "-q",
            "mars",
            "--from",
            "2024-05-02",
            "--to",
            "2024-05-01",
        ])
        .unwrap();
        match cli.command {
            Commands::Headlines { category, keyword, from, to, json } => {
                assert_eq!(category, Category::Science);
                assert_eq!(keyword, "mars");
                assert_eq!(from, NaiveDate::from_ymd_opt(2024, 5, 2));
                assert_eq!(to, NaiveDate::from_ymd_opt(2024, 5, 1));
                assert!(!json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_rejects_unknown_category() {
        let result = Cli::try_parse_from(["nd", "--api-key", "k", "sources", "--category", "weather"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_news_config_from_args() {
        let cli = Cli::try_parse_from([
            "nd",
            "--api-key",
            "k",
            "--base-url",
            "http://localhost:8080/v2",
            "--country",
            "gb",
            "serve",
        ])
        .unwrap();
        let config = cli.news_config().unwrap();
        assert_eq!(config.base_url.as_str(), "http://localhost:8080/v2");
        assert_eq!(config.country, "gb");
        assert_eq!(config.language, "en");
    }

    #[test]
    fn test_format_headline() {
        let mut article = Article::new("Rates hold", "https://example.com/rates");
        article.description = Some("The bank held rates.".to_string());
        article.source = Some(ArticleSource {
            id: None,
            name: "Example Wire".to_string(),
        });
        article.author = Some("Jo Reporter".to_string());
        let text = format_headline(&article);
        assert!(text.contains("✍️  Jo Reporter"));
        assert!(text.starts_with("📰 Rates hold"));
        assert!(text.contains("Example Wire"));
        assert!(text.contains("The bank held rates."));
        assert!(text.ends_with("🔗 https://example.com/rates"));
    }
}
