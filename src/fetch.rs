use std::path::PathBuf;
use std::time::Duration;

use crate::config::Config;
use crate::error::{Result, ScanError};

/// Anything that can produce the raw HTML of a page
pub trait HtmlSource {
    fn fetch_html(&self, url: &str) -> Result<String>;
}

/// Fetches pages through a CORS relay that takes the target as `?url=`
pub struct RelayClient {
    agent: ureq::Agent,
    relay_url: String,
    user_agent: String,
}

impl RelayClient {
    pub fn new(config: &Config) -> Self {
        // Non-2xx statuses are surfaced as FetchError, not as transport errors
        let agent = ureq::Agent::config_builder()
            .timeout_global(config.fetch_timeout_secs.map(Duration::from_secs))
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            relay_url: config.relay_url.clone(),
            user_agent: config.user_agent.clone(),
        }
    }
}

impl HtmlSource for RelayClient {
    fn fetch_html(&self, url: &str) -> Result<String> {
        let request_url = relay_request_url(&self.relay_url, url);
        log::debug!("GET {}", request_url);

        let response = self
            .agent
            .get(&request_url)
            .header("User-Agent", &self.user_agent)
            .call()?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScanError::FetchError {
                status: status.as_u16(),
            });
        }

        let html = response.into_body().read_to_string()?;
        log::debug!("Relay returned {} bytes for {}", html.len(), url);
        Ok(html)
    }
}

/// Reads a saved page from disk; the URL is only used for labelling
pub struct FileSource {
    pub path: PathBuf,
}

impl HtmlSource for FileSource {
    fn fetch_html(&self, _url: &str) -> Result<String> {
        Ok(std::fs::read_to_string(&self.path)?)
    }
}

/// Build the relay request URL for a target page
pub fn relay_request_url(relay: &str, target: &str) -> String {
    let separator = if relay.contains('?') { '&' } else { '?' };
    format!("{}{}url={}", relay, separator, urlencoding::encode(target))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_relay_request_url_encodes_target() {
        assert_eq!(
            relay_request_url("https://api.allorigins.win/raw", "https://example.com/a?b=c&d=e"),
            "https://api.allorigins.win/raw?url=https%3A%2F%2Fexample.com%2Fa%3Fb%3Dc%26d%3De"
        );
    }

    #[test]
    fn test_relay_request_url_appends_to_existing_query() {
        assert_eq!(
            relay_request_url("https://relay.test/get?mode=raw", "https://example.com"),
            "https://relay.test/get?mode=raw&url=https%3A%2F%2Fexample.com"
        );
    }

    /// Serve one canned HTTP response on a local port and return the relay URL
    fn one_shot_relay(status_line: &'static str, body: &'static str) -> (String, std::thread::JoinHandle<()>) {
        use std::io::{BufRead, BufReader};
        use std::net::TcpListener;

        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let relay = format!("http://{}/raw", listener.local_addr().unwrap());
        let handle = std::thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream);
            let mut line = String::new();
            while reader.read_line(&mut line).unwrap() > 0 && line != "\r\n" {
                line.clear();
            }
            let mut stream = reader.into_inner();
            write!(
                stream,
                "{}\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            )
            .unwrap();
        });
        (relay, handle)
    }

    fn client_for(relay: String) -> RelayClient {
        RelayClient::new(&Config {
            relay_url: relay,
            fetch_timeout_secs: Some(10),
            ..Config::default()
        })
    }

    #[test]
    fn test_relay_error_status_is_fetch_error() {
        let (relay, server) = one_shot_relay("HTTP/1.1 503 Service Unavailable", "busy");
        let result = client_for(relay).fetch_html("https://example.com");
        server.join().unwrap();

        match result {
            Err(ScanError::FetchError { status }) => assert_eq!(status, 503),
            other => panic!("expected FetchError, got {:?}", other),
        }
    }

    #[test]
    fn test_relay_success_returns_body() {
        let (relay, server) = one_shot_relay("HTTP/1.1 200 OK", "<p>page</p>");
        let html = client_for(relay).fetch_html("https://example.com").unwrap();
        server.join().unwrap();
        assert_eq!(html, "<p>page</p>");
    }

    #[test]
    fn test_file_source_reads_html() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "<html><body>saved</body></html>").unwrap();
        let source = FileSource {
            path: file.path().to_path_buf(),
        };
        let html = source.fetch_html("https://example.com").unwrap();
        assert!(html.contains("saved"));
    }

    #[test]
    fn test_file_source_missing_file() {
        let source = FileSource {
            path: PathBuf::from("/definitely/not/here.html"),
        };
        assert!(matches!(
            source.fetch_html("https://example.com"),
            Err(ScanError::IoError(_))
        ));
    }
}
