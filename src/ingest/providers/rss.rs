use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use metrics::histogram;
use quick_xml::de::from_str;
use serde::Deserialize;
use time::{format_description::well_known::Rfc2822, OffsetDateTime};

use crate::config::FeedCfg;
use crate::hashing::fnv1a64_str;
use crate::ingest::normalize_text;
use crate::ingest::types::{IdeaSource, RawIdea};

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}

#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    items: Vec<Item>,
}

#[derive(Debug, Deserialize)]
struct Item {
    title: Option<String>,
    link: Option<String>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
    description: Option<String>,
    #[serde(rename = "category", default)]
    categories: Vec<String>,
}

fn parse_rfc2822(ts: &str) -> Option<DateTime<Utc>> {
    let odt = OffsetDateTime::parse(ts.trim(), &Rfc2822).ok()?;
    DateTime::from_timestamp(odt.unix_timestamp(), 0)
}

/// RSS 2.0 feed as an idea source. Each `<item>` becomes one `RawIdea` tagged with the
/// feed's name as `source`; item categories become tags.
pub struct RssFeedProvider {
    name: String,
    category: String,
    mode: Mode,
}

enum Mode {
    Fixture(String),
    Http { url: String, client: reqwest::Client },
}

impl RssFeedProvider {
    /// Parse from an in-memory XML document (tests, offline runs).
    pub fn from_fixture_str(name: &str, category: &str, xml: &str) -> Self {
        Self {
            name: name.to_string(),
            category: category.to_string(),
            mode: Mode::Fixture(xml.to_string()),
        }
    }

    pub fn from_url(name: &str, category: &str, url: &str) -> Self {
        Self {
            name: name.to_string(),
            category: category.to_string(),
            mode: Mode::Http {
                url: url.to_string(),
                client: reqwest::Client::new(),
            },
        }
    }

    pub fn from_feed_cfg(cfg: &FeedCfg) -> Self {
        Self::from_url(&cfg.name, &cfg.category, &cfg.url)
    }

    fn parse_items_from_str(&self, s: &str) -> Result<Vec<RawIdea>> {
        let t0 = std::time::Instant::now();
        let xml_clean = scrub_html_entities_for_xml(s);
        let rss: Rss = from_str(&xml_clean)
            .with_context(|| format!("parsing rss xml for feed `{}`", self.name))?;

        let mut out = Vec::with_capacity(rss.channel.items.len());
        for it in rss.channel.items {
            let title = normalize_text(it.title.as_deref().unwrap_or_default());
            if title.is_empty() {
                continue;
            }
            let id = fnv1a64_str(it.link.as_deref().unwrap_or(&title));
            let category = if self.category.is_empty() {
                it.categories.first().cloned().unwrap_or_default()
            } else {
                self.category.clone()
            };

            out.push(RawIdea {
                description: normalize_text(it.description.as_deref().unwrap_or_default()),
                url: it.link,
                category,
                tags: it.categories.iter().map(|c| normalize_text(c)).collect(),
                created_at: it.pub_date.as_deref().and_then(parse_rfc2822),
                ..RawIdea::new(id, title, self.name.clone())
            });
        }

        let ms = t0.elapsed().as_secs_f64() * 1_000.0;
        histogram!("scout_parse_ms").record(ms);
        Ok(out)
    }
}

#[async_trait]
impl IdeaSource for RssFeedProvider {
    async fn fetch_latest(&self) -> Result<Vec<RawIdea>> {
        match &self.mode {
            Mode::Fixture(s) => self.parse_items_from_str(s),
            Mode::Http { url, client } => {
                let body = client
                    .get(url.as_str())
                    .send()
                    .await
                    .and_then(|r| r.error_for_status())
                    .with_context(|| format!("rss http get {url}"))?
                    .text()
                    .await
                    .context("rss http .text()")?;
                self.parse_items_from_str(&body)
            }
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// quick-xml only knows the XML predefined entities; map the common HTML ones first.
fn scrub_html_entities_for_xml(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&ndash;", "-")
        .replace("&mdash;", "-")
        .replace("&ldquo;", "\"")
        .replace("&rdquo;", "\"")
        .replace("&lsquo;", "'")
        .replace("&rsquo;", "'")
        .replace("&hellip;", "...")
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>AI Daily</title>
    <item>
      <title>Claude agents automate small business workflows</title>
      <link>https://example.test/agents</link>
      <description>&lt;p&gt;A practical guide&lt;/p&gt; for non-technical owners&hellip;</description>
      <pubDate>Mon, 10 Mar 2025 08:00:00 +0000</pubDate>
      <category>AI</category>
      <category>Automation</category>
    </item>
    <item>
      <title>   </title>
      <link>https://example.test/empty</link>
    </item>
  </channel>
</rss>"#;

    #[tokio::test]
    async fn parses_items_and_skips_empty_titles() {
        let p = RssFeedProvider::from_fixture_str("AI Daily", "", FEED);
        let ideas = p.fetch_latest().await.expect("parse");
        assert_eq!(ideas.len(), 1);

        let i = &ideas[0];
        assert_eq!(i.source, "AI Daily");
        assert_eq!(i.category, "AI");
        assert_eq!(i.tags, vec!["AI".to_string(), "Automation".to_string()]);
        assert_eq!(i.description, "A practical guide for non-technical owners...");
        assert_eq!(i.id, fnv1a64_str("https://example.test/agents"));
        assert_eq!(
            i.created_at.map(|t| t.timestamp()),
            Some(1_741_593_600)
        );
    }

    #[tokio::test]
    async fn configured_category_wins_over_item_category() {
        let p = RssFeedProvider::from_fixture_str("AI Daily", "business", FEED);
        let ideas = p.fetch_latest().await.expect("parse");
        assert_eq!(ideas[0].category, "business");
    }

    #[tokio::test]
    async fn malformed_xml_is_an_error() {
        let p = RssFeedProvider::from_fixture_str("Broken", "", "<rss><channel>");
        assert!(p.fetch_latest().await.is_err());
    }
}
