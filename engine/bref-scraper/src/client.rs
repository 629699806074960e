//! Rate-limited Basketball Reference fetcher.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use regex::Regex;
use reqwest::Client;
use scraper::Html;
use std::time::Duration;
use tracing::debug;

const BASE_URL: &str = "https://www.basketball-reference.com";

/// Fixed pause before every request. The site informally allows ~20
/// requests per minute; 3.5s keeps a full run safely under that.
const REQUEST_DELAY: Duration = Duration::from_millis(3500);

const USER_AGENT: &str = "Mozilla/5.0 (Macintosh)";

/// HTTP client for Basketball Reference pages.
pub struct BrefClient {
    client: Client,
}

impl BrefClient {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self { client })
    }

    /// Box score page for a game, keyed by date and the home team's code.
    pub fn box_score_url(home_abbrev: &str, date: NaiveDate) -> String {
        format!(
            "{BASE_URL}/boxscores/{}0{}.html",
            date.format("%Y%m%d"),
            crate::normalize::to_bref(home_abbrev)
        )
    }

    /// Team roster page. The site keys team pages by the season's ending
    /// year, so season 2025 fetches `/teams/BOS/2026.html`.
    pub fn roster_url(team_abbrev: &str, season: i32) -> String {
        format!(
            "{BASE_URL}/teams/{}/{}.html",
            crate::normalize::to_bref(team_abbrev),
            season + 1
        )
    }

    /// Player page, keyed by the slug's first letter and the slug.
    pub fn player_url(slug: &str) -> String {
        let letter = slug.get(..1).unwrap_or_default();
        format!("{BASE_URL}/players/{letter}/{slug}.html")
    }

    /// GET a page and parse it, honoring the fixed inter-request delay.
    ///
    /// Non-success statuses are errors; callers log them and skip the unit.
    pub async fn fetch(&self, url: &str) -> Result<Html> {
        tokio::time::sleep(REQUEST_DELAY).await;
        debug!("Fetching {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Failed to fetch {url}"))?;
        if !response.status().is_success() {
            anyhow::bail!("HTTP {} for {url}", response.status());
        }
        let html = response
            .text()
            .await
            .context("Failed to read response body")?;
        Ok(Html::parse_document(&unmask_comments(&html)))
    }
}

/// Rewrite commented-out markup back into live markup.
///
/// The site ships its "advanced" tables inside HTML comments and reveals
/// them with JavaScript; a parsed document would not contain them. This is
/// a text pre-pass that runs before the document is parsed, not a DOM
/// operation.
pub fn unmask_comments(html: &str) -> String {
    let pattern = Regex::new(r"(?s)<!--\s*(<div[^>]*>.*?</div>)\s*-->").unwrap();
    pattern.replace_all(html, "$1").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::find_table;

    #[test]
    fn url_builders_translate_abbreviations() {
        let date = NaiveDate::from_ymd_opt(2024, 10, 22).unwrap();
        assert_eq!(
            BrefClient::box_score_url("PHX", date),
            "https://www.basketball-reference.com/boxscores/202410220PHO.html"
        );
        assert_eq!(
            BrefClient::roster_url("BKN", 2024),
            "https://www.basketball-reference.com/teams/BRK/2025.html"
        );
        assert_eq!(
            BrefClient::player_url("curryst01"),
            "https://www.basketball-reference.com/players/c/curryst01.html"
        );
    }

    #[test]
    fn unmasking_reveals_hidden_tables() {
        let html = r#"<html><body>
            <!--
            <div class="table_container">
            <table id="box-BOS-game-advanced"><thead><tr><th data-stat="player">P</th></tr></thead><tbody></tbody></table>
            </div>
            -->
        </body></html>"#;

        let hidden = Html::parse_document(html);
        assert!(find_table(&hidden, "box-BOS-game-advanced").is_none());

        let revealed = Html::parse_document(&unmask_comments(html));
        assert!(find_table(&revealed, "box-BOS-game-advanced").is_some());
    }

    #[tokio::test]
    async fn fetch_rejects_non_success_status() {
        use std::io::{Read, Write};

        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        std::thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let mut buf = [0u8; 1024];
                let _ = stream.read(&mut buf);
                let _ = stream.write_all(
                    b"HTTP/1.1 404 Not Found\r\ncontent-length: 0\r\nconnection: close\r\n\r\n",
                );
            }
        });

        let client = BrefClient::new().unwrap();
        let err = client
            .fetch(&format!("http://{addr}/boxscores/999999990XXX.html"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("404"));
    }
}
