//! Live ad-filter statistics provider.
//!
//! The filter daemon exposes a local HTTP endpoint with the current
//! session's counters. This is the only network call the daemon makes and
//! the only operation with an explicit timeout; it bounds the worst-case
//! render-tick stall.

use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, warn};

/// Hard ceiling on the stats fetch.
pub const STATS_TIMEOUT: Duration = Duration::from_secs(2);

/// Current-session counters from the filter endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LiveStats {
    pub dns_queries_today: u64,
    pub ads_blocked_today: u64,
    pub ads_percentage_today: f64,
    pub unique_clients: u64,
}

/// Blocking HTTP client for the stats endpoint.
pub struct StatsClient {
    client: reqwest::blocking::Client,
    url: String,
}

impl StatsClient {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    /// Fetches the current stats, or `None` on timeout, connection
    /// failure, non-2xx status or a malformed payload.
    pub fn fetch(&self) -> Option<LiveStats> {
        let response = match self.client.get(&self.url).send() {
            Ok(response) => response,
            Err(e) => {
                debug!("stats endpoint unreachable: {}", e);
                return None;
            }
        };
        if !response.status().is_success() {
            warn!("stats endpoint returned {}", response.status());
            return None;
        }
        match response.json() {
            Ok(stats) => Some(stats),
            Err(e) => {
                warn!("stats payload malformed: {}", e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;

    /// Serves exactly one canned HTTP response on a loopback port.
    fn one_shot_server(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut buf = [0u8; 1024];
            let _ = stream.read(&mut buf);
            let response = format!(
                "{}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            let _ = stream.write_all(response.as_bytes());
        });
        format!("http://{}/api.php", addr)
    }

    #[test]
    fn successful_fetch_parses_counters() {
        let url = one_shot_server(
            "HTTP/1.1 200 OK",
            r#"{"dns_queries_today": 100, "ads_blocked_today": 7, "ads_percentage_today": 7.0, "unique_clients": 2}"#,
        );
        let client = StatsClient::new(url, Duration::from_secs(2)).unwrap();
        let stats = client.fetch().unwrap();
        assert_eq!(stats.dns_queries_today, 100);
        assert_eq!(stats.ads_blocked_today, 7);
    }

    #[test]
    fn server_error_degrades_to_none() {
        let url = one_shot_server("HTTP/1.1 500 Internal Server Error", "");
        let client = StatsClient::new(url, Duration::from_secs(2)).unwrap();
        assert_eq!(client.fetch(), None);
    }

    #[test]
    fn malformed_body_degrades_to_none() {
        let url = one_shot_server("HTTP/1.1 200 OK", "not json");
        let client = StatsClient::new(url, Duration::from_secs(2)).unwrap();
        assert_eq!(client.fetch(), None);
    }

    #[test]
    fn payload_deserializes() {
        let stats: LiveStats = serde_json::from_str(
            r#"{
                "dns_queries_today": 9823,
                "ads_blocked_today": 1204,
                "ads_percentage_today": 12.3,
                "unique_clients": 4,
                "status": "enabled"
            }"#,
        )
        .unwrap();
        assert_eq!(stats.dns_queries_today, 9823);
        assert_eq!(stats.ads_blocked_today, 1204);
        assert_eq!(stats.unique_clients, 4);
    }

    #[test]
    fn malformed_payload_is_an_error() {
        assert!(serde_json::from_str::<LiveStats>(r#"{"dns_queries_today": "lots"}"#).is_err());
    }

    #[test]
    fn unreachable_endpoint_degrades_to_none() {
        // Port 1 is never listening; connection is refused immediately.
        let client =
            StatsClient::new("http://127.0.0.1:1/api.php", Duration::from_millis(200)).unwrap();
        assert_eq!(client.fetch(), None);
    }
}
