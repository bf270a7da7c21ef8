#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use bytes::Bytes;
use verdict_core::{
    HttpExchange, HttpHop, HttpRequest, HttpTimings, Transport, TransportError, VuConfig,
};
use verdict_lua::{LuaVu, Result};
use verdict_metrics::{MetricSeriesSummary, Registry};

pub const BASE_URL: &str = "http://test.local";

pub fn scripts_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("scripts")
}

pub fn load_test_script(name: &str) -> std::io::Result<String> {
    std::fs::read_to_string(scripts_dir().join(name))
}

fn timings() -> HttpTimings {
    HttpTimings {
        blocked: Duration::from_millis(3),
        connecting: Duration::from_millis(2),
        tls_handshaking: Duration::ZERO,
        sending: Duration::from_millis(1),
        waiting: Duration::from_millis(10),
        receiving: Duration::from_millis(2),
    }
}

fn hop(url: &str, status: u16) -> HttpHop {
    HttpHop {
        url: url.to_string(),
        status,
        proto: "HTTP/1.1".to_string(),
        timings: timings(),
    }
}

/// In-memory transport answering by path.
///
/// - `/status/{code}` answers `code`
/// - `/redirect/{n}` answers `n` 302 hops, then 200 from `/get`
/// - `/echo` answers 200 with the request body and content-type
/// - `/fail` and `/timeout` fail at the transport
/// - anything else answers 200 `ok`
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    seen: Mutex<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.seen
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn answer(req: &HttpRequest) -> std::result::Result<HttpExchange, TransportError> {
        let path = url::Url::parse(&req.url)
            .map(|u| u.path().to_string())
            .unwrap_or_default();

        let mut headers = vec![("server".to_string(), "scripted".to_string())];
        let mut body = Bytes::from_static(b"ok");
        let mut hops = Vec::new();

        if let Some(code) = path.strip_prefix("/status/") {
            let status = code
                .parse::<u16>()
                .map_err(|err| TransportError::Failed(err.to_string()))?;
            hops.push(hop(&req.url, status));
        } else if let Some(n) = path.strip_prefix("/redirect/") {
            let n = n
                .parse::<u32>()
                .map_err(|err| TransportError::Failed(err.to_string()))?;
            for left in (1..=n).rev() {
                hops.push(hop(&format!("{BASE_URL}/redirect/{left}"), 302));
            }
            hops.push(hop(&format!("{BASE_URL}/get"), 200));
        } else if path == "/echo" {
            if let Some((_, ct)) = req
                .headers
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case("content-type"))
            {
                headers.push(("content-type".to_string(), ct.clone()));
            }
            body = req.body.clone();
            hops.push(hop(&req.url, 200));
        } else if path == "/fail" {
            return Err(TransportError::Failed("connection refused".to_string()));
        } else if path == "/timeout" {
            return Err(TransportError::Timeout(
                req.timeout.unwrap_or(Duration::from_secs(60)),
            ));
        } else {
            hops.push(hop(&req.url, 200));
        }

        Ok(HttpExchange {
            hops,
            headers,
            body,
        })
    }
}

impl Transport for ScriptedTransport {
    async fn execute(&self, req: HttpRequest) -> std::result::Result<HttpExchange, TransportError> {
        let res = Self::answer(&req);
        self.seen
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(req);
        res
    }
}

pub struct TestVu {
    pub vu: LuaVu,
    pub metrics: Arc<Registry>,
    pub transport: Arc<ScriptedTransport>,
}

pub fn spawn_vu(script_name: &str) -> Result<TestVu> {
    spawn_vu_with(script_name, VuConfig::default())
}

pub fn spawn_vu_with(script_name: &str, config: VuConfig) -> Result<TestVu> {
    let script = load_test_script(script_name)?;
    let metrics = Arc::new(Registry::default());
    let transport = Arc::new(ScriptedTransport::default());
    let vu = LuaVu::new(config, metrics.clone(), &script, transport.clone())?;
    Ok(TestVu {
        vu,
        metrics,
        transport,
    })
}

pub fn series_with<'a>(
    series: &'a [MetricSeriesSummary],
    name: &str,
    tags: &[(&str, &str)],
) -> Vec<&'a MetricSeriesSummary> {
    series
        .iter()
        .filter(|s| s.name == name && tags.iter().all(|(k, v)| s.tag(k) == Some(*v)))
        .collect()
}
