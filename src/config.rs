//! Command-line and environment configuration.
//!
//! Every option has a default matching the public Guardian test setup, so
//! the binary runs with no arguments.  The API key and endpoint can also
//! come from the environment (`NEWS_API_KEY`, `NEWS_ENDPOINT`).

use std::path::PathBuf;

use anyhow::{bail, Result};
use chrono::NaiveDate;
use clap::Parser;

use crate::source::Timeouts;

pub const DEFAULT_ENDPOINT: &str = "http://content.guardianapis.com/search";

#[derive(Parser, Debug)]
#[command(author, version, about = "Browse Guardian news search results in the terminal")]
pub struct Cli {
    /// Base URL of the search endpoint
    #[arg(long, env = "NEWS_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// API key appended to every request
    #[arg(long, env = "NEWS_API_KEY", default_value = "test", hide_env_values = true)]
    pub api_key: String,

    /// Search term
    #[arg(long, short, default_value = "france")]
    pub query: String,

    /// First publication date to include (YYYY-MM-DD)
    #[arg(long, default_value = "2017-07-01")]
    pub from_date: NaiveDate,

    /// Last publication date to include (YYYY-MM-DD)
    #[arg(long, default_value = "2017-07-31")]
    pub to_date: NaiveDate,

    /// Result ordering understood by the API
    #[arg(long, default_value = "newest")]
    pub order_by: String,

    /// Full request URL; overrides the endpoint and query options.
    /// An empty value leaves the loader without a URL.
    #[arg(long)]
    pub url: Option<String>,

    #[arg(long, default_value_t = Timeouts::DEFAULT_CONNECT_MS)]
    pub connect_timeout_ms: u64,

    #[arg(long, default_value_t = Timeouts::DEFAULT_READ_MS)]
    pub read_timeout_ms: u64,

    /// Print the articles once to stdout instead of opening the UI
    #[arg(long)]
    pub plain: bool,

    /// Write logs to this file (terminal mode logs nowhere otherwise)
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

/// Query parameters of the search request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsQuery {
    pub endpoint: String,
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
    pub order_by: String,
    pub term: String,
    pub api_key: String,
}

impl NewsQuery {
    /// `<endpoint>?from-date=..&to-date=..&order-by=..&q=..&api-key=..`
    ///
    /// The endpoint is not validated here; a bad one surfaces as a
    /// malformed-URL failure when the request is made.
    pub fn request_url(&self) -> String {
        let query = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("from-date", &self.from_date.format("%Y-%m-%d").to_string())
            .append_pair("to-date", &self.to_date.format("%Y-%m-%d").to_string())
            .append_pair("order-by", &self.order_by)
            .append_pair("q", &self.term)
            .append_pair("api-key", &self.api_key)
            .finish();

        let separator = if self.endpoint.contains('?') { '&' } else { '?' };
        format!("{}{separator}{query}", self.endpoint)
    }
}

/// Settled configuration the rest of the binary works from.
#[derive(Debug, Clone)]
pub struct Config {
    pub request_url: Option<String>,
    pub timeouts: Timeouts,
    pub plain: bool,
    pub log_file: Option<PathBuf>,
}

impl Cli {
    pub fn into_config(self) -> Result<Config> {
        if self.from_date > self.to_date {
            bail!(
                "--from-date {} is after --to-date {}",
                self.from_date,
                self.to_date
            );
        }

        let request_url = match self.url {
            Some(url) if url.trim().is_empty() => None,
            Some(url) => Some(url),
            None => Some(
                NewsQuery {
                    endpoint: self.endpoint,
                    from_date: self.from_date,
                    to_date: self.to_date,
                    order_by: self.order_by,
                    term: self.query,
                    api_key: self.api_key,
                }
                .request_url(),
            ),
        };

        Ok(Config {
            request_url,
            timeouts: Timeouts::from_millis(self.connect_timeout_ms, self.read_timeout_ms),
            plain: self.plain,
            log_file: self.log_file,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["guardian-news"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn defaults_build_the_guardian_request() {
        let config = parse(&[]).into_config().unwrap();
        assert_eq!(
            config.request_url.as_deref(),
            Some(
                "http://content.guardianapis.com/search?from-date=2017-07-01&to-date=2017-07-31\
                 &order-by=newest&q=france&api-key=test"
            )
        );
        assert_eq!(config.timeouts, Timeouts::default());
        assert!(!config.plain);
    }

    #[test]
    fn query_values_are_encoded() {
        let query = NewsQuery {
            endpoint: "https://example.com/search?format=json".into(),
            from_date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            to_date: NaiveDate::from_ymd_opt(2024, 2, 29).unwrap(),
            order_by: "oldest".into(),
            term: "tour de france & co".into(),
            api_key: "k3y".into(),
        };
        assert_eq!(
            query.request_url(),
            "https://example.com/search?format=json&from-date=2024-02-01&to-date=2024-02-29\
             &order-by=oldest&q=tour+de+france+%26+co&api-key=k3y"
        );
    }

    #[test]
    fn url_override_wins() {
        let config = parse(&["--url", "http://localhost:8080/x", "--query", "ignored"])
            .into_config()
            .unwrap();
        assert_eq!(config.request_url.as_deref(), Some("http://localhost:8080/x"));
    }

    #[test]
    fn empty_url_override_means_no_url() {
        let config = parse(&["--url", ""]).into_config().unwrap();
        assert!(config.request_url.is_none());
    }

    #[test]
    fn timeouts_are_overridable() {
        let config = parse(&["--connect-timeout-ms", "500", "--read-timeout-ms", "250"])
            .into_config()
            .unwrap();
        assert_eq!(config.timeouts, Timeouts::from_millis(500, 250));
    }

    #[test]
    fn inverted_date_range_is_rejected() {
        let err = parse(&["--from-date", "2017-08-01", "--to-date", "2017-07-01"])
            .into_config()
            .unwrap_err();
        assert!(err.to_string().contains("after"));
    }

    #[test]
    fn bad_date_is_a_parse_error() {
        assert!(Cli::try_parse_from(["guardian-news", "--from-date", "July"]).is_err());
    }
}
