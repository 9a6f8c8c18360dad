//! News command implementation.
//!
//! Prints headlines that can be fed to `generate --text`.

use clap::{ArgGroup, Args};

use crate::config::Config;
use crate::error::{PostError, Result};
use crate::news::{Article, NewsFetcher, NewsQuery};
use crate::output::{plural, Printer};

/// Fetch headlines from Google News
#[derive(Args, Debug)]
#[command(group(
    ArgGroup::new("query").args(["keyword", "topic", "location", "site"])
))]
pub struct NewsArgs {
    /// Search for a keyword
    #[arg(long)]
    pub keyword: Option<String>,

    /// Topic section, e.g. TECHNOLOGY or BUSINESS
    #[arg(long)]
    pub topic: Option<String>,

    /// Headlines about a place
    #[arg(long)]
    pub location: Option<String>,

    /// Headlines from one site, e.g. bbc.co.uk
    #[arg(long)]
    pub site: Option<String>,

    /// Number of articles to print
    #[arg(long, default_value = "5")]
    pub limit: usize,

    /// Print the articles as JSON
    #[arg(long)]
    pub json: bool,
}

impl NewsArgs {
    pub fn query(&self) -> NewsQuery {
        if let Some(k) = &self.keyword {
            NewsQuery::Keyword(k.clone())
        } else if let Some(t) = &self.topic {
            NewsQuery::Topic(t.clone())
        } else if let Some(l) = &self.location {
            NewsQuery::Location(l.clone())
        } else if let Some(s) = &self.site {
            NewsQuery::Site(s.clone())
        } else {
            NewsQuery::Top
        }
    }
}

pub fn run(args: NewsArgs, config: &Config, printer: &Printer) -> Result<()> {
    let fetcher = NewsFetcher::new(
        config.news.language.clone(),
        config.news.country.clone(),
        config.news.max_results.max(args.limit),
    );
    let query = args.query();

    let runtime = tokio::runtime::Runtime::new()?;
    let articles = runtime.block_on(fetcher.articles_for_posts(&query, args.limit))?;

    if args.json {
        let json = serde_json::to_string_pretty(&articles).map_err(|e| PostError::Parse {
            message: e.to_string(),
            help: None,
        })?;
        println!("{}", json);
        return Ok(());
    }

    if articles.is_empty() {
        printer.warning("Empty", "no articles found");
        return Ok(());
    }
    printer.info("Fetched", &plural(articles.len(), "article", "articles"));
    for article in &articles {
        print_article(article, printer);
    }
    Ok(())
}

fn print_article(article: &Article, printer: &Printer) {
    printer.item(&article.title, Some(&article.publisher));
    if !article.url.is_empty() {
        println!("    {}", printer.dim(&article.url));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;
    use pretty_assertions::assert_eq;

    fn parse(argv: &[&str]) -> std::result::Result<NewsArgs, clap::Error> {
        let mut full = vec!["postgen", "news"];
        full.extend_from_slice(argv);
        Cli::try_parse_from(full).map(|cli| match cli.command {
            Commands::News(args) => args,
            other => panic!("expected news, got {:?}", other),
        })
    }

    #[test]
    fn test_query_selection() {
        assert_eq!(parse(&[]).unwrap().query(), NewsQuery::Top);
        assert_eq!(
            parse(&["--topic", "science"]).unwrap().query(),
            NewsQuery::Topic("science".to_string())
        );
        assert_eq!(
            parse(&["--site", "example.com"]).unwrap().query(),
            NewsQuery::Site("example.com".to_string())
        );
    }

    #[test]
    fn test_query_flags_conflict() {
        assert!(parse(&["--keyword", "rust", "--topic", "SCIENCE"]).is_err());
    }

    #[test]
    fn test_default_limit() {
        assert_eq!(parse(&[]).unwrap().limit, 5);
    }
}
