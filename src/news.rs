//! Headline source backed by the Google News RSS feeds.
//!
//! [`NewsFetcher`] builds the feed URL for a [`NewsQuery`], downloads it with
//! `reqwest` and parses the items with `quick-xml`. Failures are returned to
//! the caller; nothing here retries.

use std::borrow::Cow;

use quick_xml::events::Event;
use quick_xml::Reader;
use serde::{Deserialize, Serialize};

use crate::error::{PostError, Result};

const BASE_URL: &str = "https://news.google.com/rss";

/// Section names the topic feed is known to accept.
pub const TOPICS: [&str; 10] = [
    "WORLD",
    "NATION",
    "BUSINESS",
    "TECHNOLOGY",
    "ENTERTAINMENT",
    "SPORTS",
    "SCIENCE",
    "HEALTH",
    "POLITICS",
    "CELEBRITIES",
];

/// A news item trimmed down to what a post needs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub description: String,
    pub url: String,
    pub publisher: String,
    pub published_date: String,
}

/// Which feed to read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NewsQuery {
    Top,
    Keyword(String),
    Topic(String),
    Location(String),
    Site(String),
}

/// Google News client settings.
#[derive(Debug, Clone)]
pub struct NewsFetcher {
    pub language: String,
    pub country: String,
    pub max_results: usize,
    client: reqwest::Client,
}

impl Default for NewsFetcher {
    fn default() -> Self {
        Self::new("en", "US", 10)
    }
}

impl NewsFetcher {
    pub fn new(language: impl Into<String>, country: impl Into<String>, max_results: usize) -> Self {
        Self {
            language: language.into(),
            country: country.into(),
            max_results,
            client: reqwest::Client::new(),
        }
    }

    /// Feed URL and query parameters for `query`.
    pub fn request_for(&self, query: &NewsQuery) -> (String, Vec<(&'static str, String)>) {
        let mut params = Vec::new();
        let url = match query {
            NewsQuery::Top => BASE_URL.to_string(),
            NewsQuery::Keyword(q) | NewsQuery::Location(q) => {
                params.push(("q", q.clone()));
                format!("{}/search", BASE_URL)
            }
            NewsQuery::Site(site) => {
                params.push(("q", format!("site:{}", site)));
                format!("{}/search", BASE_URL)
            }
            NewsQuery::Topic(topic) => {
                let topic = topic.to_ascii_uppercase();
                if !TOPICS.contains(&topic.as_str()) {
                    tracing::warn!(topic = %topic, "topic is not in the known list, querying anyway");
                }
                format!("{}/headlines/section/topic/{}", BASE_URL, topic)
            }
        };

        params.push(("hl", self.language.clone()));
        params.push(("gl", self.country.clone()));
        params.push(("ceid", format!("{}:{}", self.country, self.language)));
        (url, params)
    }

    /// Fetch up to `max_results` articles.
    pub async fn fetch(&self, query: &NewsQuery) -> Result<Vec<Article>> {
        let (url, params) = self.request_for(query);
        tracing::debug!(%url, ?query, "fetching news feed");

        let response = self
            .client
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(network)?;

        let status = response.status();
        if !status.is_success() {
            return Err(PostError::Network {
                message: format!("{} returned {}", url, status),
            });
        }

        let body = response.text().await.map_err(network)?;
        parse_rss(&body, self.max_results)
    }

    /// Fetch articles and keep the first `limit`.
    pub async fn articles_for_posts(&self, query: &NewsQuery, limit: usize) -> Result<Vec<Article>> {
        let mut articles = self.fetch(query).await?;
        articles.truncate(limit);
        Ok(articles)
    }
}

fn network(e: reqwest::Error) -> PostError {
    PostError::Network {
        message: e.to_string(),
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Field {
    Title,
    Link,
    Description,
    PubDate,
    Source,
}

impl Field {
    fn from_tag(name: &[u8]) -> Option<Self> {
        match name {
            b"title" => Some(Field::Title),
            b"link" => Some(Field::Link),
            b"description" => Some(Field::Description),
            b"pubDate" => Some(Field::PubDate),
            b"source" => Some(Field::Source),
            _ => None,
        }
    }
}

/// Parse RSS 2.0 `<item>`s, stopping after `limit`.
pub fn parse_rss(xml: &str, limit: usize) -> Result<Vec<Article>> {
    let mut articles = Vec::new();
    if limit == 0 {
        return Ok(articles);
    }

    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut current: Option<Article> = None;
    let mut field: Option<Field> = None;

    loop {
        let event = reader.read_event().map_err(|e| PostError::Parse {
            message: format!("invalid RSS at byte {}: {}", reader.buffer_position(), e),
            help: None,
        })?;

        match event {
            Event::Eof => break,
            Event::Start(start) => match start.name().as_ref() {
                b"item" => current = Some(Article::default()),
                name if current.is_some() => field = Field::from_tag(name),
                _ => {}
            },
            Event::End(end) => {
                if end.name().as_ref() == b"item" {
                    if let Some(article) = current.take() {
                        articles.push(finish(article));
                        if articles.len() >= limit {
                            break;
                        }
                    }
                }
                field = None;
            }
            Event::Text(text) => {
                let value = text.unescape().map_err(|e| PostError::Parse {
                    message: e.to_string(),
                    help: None,
                })?;
                append(current.as_mut(), field, &value);
            }
            Event::CData(data) => {
                let bytes = data.into_inner();
                append(current.as_mut(), field, &String::from_utf8_lossy(&bytes));
            }
            _ => {}
        }
    }

    Ok(articles)
}

fn append(article: Option<&mut Article>, field: Option<Field>, value: &str) {
    let (Some(article), Some(field)) = (article, field) else {
        return;
    };
    let target = match field {
        Field::Title => &mut article.title,
        Field::Link => &mut article.url,
        Field::Description => &mut article.description,
        Field::PubDate => &mut article.published_date,
        Field::Source => &mut article.publisher,
    };
    target.push_str(value);
}

fn finish(mut article: Article) -> Article {
    article.description = strip_tags(&article.description).into_owned();
    // Google appends " - Publisher" to every title.
    if !article.publisher.is_empty() {
        let suffix = format!(" - {}", article.publisher);
        if let Some(stripped) = article.title.strip_suffix(&suffix) {
            article.title = stripped.to_string();
        }
    } else {
        article.publisher = "Unknown".to_string();
    }
    article
}

/// Drop HTML tags and `&nbsp;`, then collapse whitespace.
fn strip_tags(html: &str) -> Cow<'_, str> {
    if !html.contains('<') {
        return Cow::Borrowed(html.trim());
    }
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    for ch in html.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            c if !in_tag => out.push(c),
            _ => {}
        }
    }
    let out = out.replace("&nbsp;", " ");
    Cow::Owned(out.split_whitespace().collect::<Vec<_>>().join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Top stories - Google News</title>
    <item>
      <title>Rust 2.0 released - The Daily Crab</title>
      <link>https://example.com/rust</link>
      <pubDate>Mon, 05 Oct 2026 10:00:00 GMT</pubDate>
      <description>&lt;a href="https://example.com/rust"&gt;Rust 2.0 released&lt;/a&gt;&amp;nbsp;</description>
      <source url="https://example.com">The Daily Crab</source>
    </item>
    <item>
      <title><![CDATA[Markets & more]]></title>
      <link>https://example.com/markets</link>
    </item>
    <item>
      <title>Third</title>
    </item>
  </channel>
</rss>"#;

    #[test]
    fn test_parse_rss_items() {
        let articles = parse_rss(FEED, 10).unwrap();
        assert_eq!(articles.len(), 3);
        assert_eq!(
            articles[0],
            Article {
                title: "Rust 2.0 released".to_string(),
                description: "Rust 2.0 released".to_string(),
                url: "https://example.com/rust".to_string(),
                publisher: "The Daily Crab".to_string(),
                published_date: "Mon, 05 Oct 2026 10:00:00 GMT".to_string(),
            }
        );
        assert_eq!(articles[1].title, "Markets & more");
        assert_eq!(articles[1].publisher, "Unknown");
    }

    #[test]
    fn test_channel_title_is_ignored() {
        let articles = parse_rss(FEED, 10).unwrap();
        assert!(articles.iter().all(|a| !a.title.contains("Google News")));
    }

    #[test]
    fn test_parse_rss_limit() {
        assert_eq!(parse_rss(FEED, 2).unwrap().len(), 2);
        assert!(parse_rss(FEED, 0).unwrap().is_empty());
    }

    #[test]
    fn test_request_urls() {
        let fetcher = NewsFetcher::new("en", "GB", 5);

        let (url, params) = fetcher.request_for(&NewsQuery::Topic("business".to_string()));
        assert_eq!(url, "https://news.google.com/rss/headlines/section/topic/BUSINESS");
        assert!(params.contains(&("ceid", "GB:en".to_string())));

        let (url, params) = fetcher.request_for(&NewsQuery::Site("example.com".to_string()));
        assert_eq!(url, "https://news.google.com/rss/search");
        assert_eq!(params[0], ("q", "site:example.com".to_string()));

        let (url, _) = fetcher.request_for(&NewsQuery::Top);
        assert_eq!(url, "https://news.google.com/rss");
    }

    #[test]
    fn test_strip_tags() {
        assert_eq!(strip_tags("<b>bold</b>  text"), "bold text");
        assert_eq!(strip_tags("<p>a</p><p>b</p>"), "ab");
        assert_eq!(strip_tags(" plain "), "plain");
    }
}
