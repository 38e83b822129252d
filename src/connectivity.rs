//! "Is the network reachable?" check made before a load is started.
//!
//! When the probe says no, the loader is never started and the UI shows a
//! connectivity message instead.

use std::time::Duration;

use tokio::net::{lookup_host, TcpStream};
use tokio::runtime::Handle;
use tracing::debug;
use url::Url;

pub trait ConnectivityProbe {
    fn has_connectivity(&self) -> bool;
}

/// Probes by opening (and immediately closing) a TCP connection to the
/// host serving the request URL.
///
/// Name resolution and every connection attempt together share one
/// `timeout`, so the caller blocks for at most that long.
pub struct TcpProbe {
    target: Option<(String, u16)>,
    timeout: Duration,
    runtime: Handle,
}

impl TcpProbe {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3);

    /// Probe the host and port of `url`, running the I/O on `runtime`.
    ///
    /// A URL without a usable host cannot be probed; the probe then reports
    /// connectivity and leaves it to the loader to surface the real error.
    pub fn for_url(url: Option<&str>, timeout: Duration, runtime: Handle) -> Self {
        let target = url
            .and_then(|raw| Url::parse(raw).ok())
            .and_then(|url| {
                let host = url.host_str()?.to_string();
                let port = url.port_or_known_default()?;
                Some((host, port))
            });
        Self {
            target,
            timeout,
            runtime,
        }
    }

    async fn reachable(host: &str, port: u16) -> bool {
        let addrs = match lookup_host((host, port)).await {
            Ok(addrs) => addrs,
            Err(e) => {
                debug!(%host, error = %e, "name resolution failed");
                return false;
            }
        };

        for addr in addrs {
            let reachable = TcpStream::connect(addr).await.is_ok();
            debug!(%addr, reachable, "connectivity probe");
            if reachable {
                return true;
            }
        }
        false
    }
}

impl ConnectivityProbe for TcpProbe {
    /// Must be called from outside the runtime (the UI thread).
    fn has_connectivity(&self) -> bool {
        let Some((host, port)) = &self.target else {
            return true;
        };

        let probe = tokio::time::timeout(self.timeout, Self::reachable(host, *port));
        match self.runtime.block_on(probe) {
            Ok(reachable) => reachable,
            Err(_) => {
                debug!(%host, timeout = ?self.timeout, "connectivity probe timed out");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpListener;
    use std::time::Instant;

    use tokio::runtime::Runtime;

    const TIMEOUT: Duration = Duration::from_millis(500);

    fn probe(rt: &Runtime, url: Option<&str>, timeout: Duration) -> TcpProbe {
        TcpProbe::for_url(url, timeout, rt.handle().clone())
    }

    #[test]
    fn listening_port_is_reachable() {
        let rt = Runtime::new().unwrap();
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();

        let url = format!("http://127.0.0.1:{port}/search");
        assert!(probe(&rt, Some(&url), TIMEOUT).has_connectivity());
    }

    #[test]
    fn closed_port_is_unreachable() {
        let rt = Runtime::new().unwrap();
        let port = TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();

        let url = format!("http://127.0.0.1:{port}/search");
        assert!(!probe(&rt, Some(&url), TIMEOUT).has_connectivity());
    }

    #[test]
    fn unresponsive_host_is_bounded_by_the_timeout() {
        let rt = Runtime::new().unwrap();
        // TEST-NET-1 is never routed; the connect either hangs or fails fast.
        let probe = probe(&rt, Some("http://192.0.2.1:81/"), Duration::from_millis(200));

        let started = Instant::now();
        assert!(!probe.has_connectivity());
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[test]
    fn default_port_comes_from_the_scheme() {
        let rt = Runtime::new().unwrap();
        let probe = probe(&rt, Some("https://content.guardianapis.com/search"), TIMEOUT);
        assert_eq!(
            probe.target,
            Some(("content.guardianapis.com".to_string(), 443))
        );
    }

    #[test]
    fn unprobeable_urls_defer_to_the_loader() {
        let rt = Runtime::new().unwrap();
        assert!(probe(&rt, None, TIMEOUT).has_connectivity());
        assert!(probe(&rt, Some("not a url"), TIMEOUT).has_connectivity());
    }
}
