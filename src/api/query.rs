use crate::api::error::DashboardError;
use crate::api::transport::{ApiRequest, Transport};
use flate2::Compression;
use flate2::write::GzEncoder;
use reqwest::StatusCode;
use reqwest::header::{CONTENT_ENCODING, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::io::Write;
use tracing::debug;
use url::form_urlencoded;

/// Payloads shorter than this are not worth compressing.
pub const COMPRESSION_THRESHOLD: usize = 100;

/// Address prefix of the local development server, which does not support gzip.
pub const LOCAL_DEV_PREFIX: &str = "http://localhost:";

pub fn should_compress(addr: &str, len: usize) -> bool {
    len >= COMPRESSION_THRESHOLD && !addr.is_empty() && !addr.starts_with(LOCAL_DEV_PREFIX)
}

/// `<addr>/api?client=..&key=..&method=..`
pub fn api_url(addr: &str, client: &str, key: &str, method: &str) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("client", client)
        .append_pair("key", key)
        .append_pair("method", method)
        .finish();

    format!("{}/api?{}", addr, query)
}

fn gzip(data: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::with_capacity(data.len()), Compression::default());
    encoder.write_all(data)?;
    encoder.finish()
}

/// Serializes `req` and applies the compression policy.
pub fn build_request<Req>(
    client: &str,
    addr: &str,
    key: &str,
    method: &str,
    req: Option<&Req>,
) -> Result<ApiRequest, DashboardError>
where
    Req: Serialize + ?Sized,
{
    let url = api_url(addr, client, key, method);
    let mut headers = HeaderMap::new();

    let body = match req {
        Some(req) => {
            let data = serde_json::to_vec(req).map_err(DashboardError::Encoding)?;
            let gzipped = should_compress(addr, data.len());

            debug!(
                "dashboard call {}: {} bytes, gzip: {}",
                method,
                data.len(),
                gzipped
            );

            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
            if gzipped {
                headers.insert(CONTENT_ENCODING, HeaderValue::from_static("gzip"));
                Some(gzip(&data).map_err(DashboardError::Compression)?)
            } else {
                Some(data)
            }
        }
        None => {
            debug!("dashboard call {}: no body", method);
            None
        }
    };

    Ok(ApiRequest { url, headers, body })
}

async fn round_trip<T, Req>(
    transport: &T,
    client: &str,
    addr: &str,
    key: &str,
    method: &str,
    req: Option<&Req>,
) -> Result<Vec<u8>, DashboardError>
where
    T: Transport,
    Req: Serialize + ?Sized,
{
    let request = build_request(client, addr, key, method, req)?;

    let response = transport
        .post(request)
        .await
        .map_err(DashboardError::Transport)?;

    if response.status != StatusCode::OK {
        return Err(DashboardError::Remote {
            status: response.status,
            body: String::from_utf8_lossy(&response.body).into_owned(),
        });
    }

    Ok(response.body)
}

/// Sends one request and ignores the reply body.
pub async fn query<T, Req>(
    transport: &T,
    client: &str,
    addr: &str,
    key: &str,
    method: &str,
    req: Option<&Req>,
) -> Result<(), DashboardError>
where
    T: Transport,
    Req: Serialize + ?Sized,
{
    round_trip(transport, client, addr, key, method, req).await?;
    Ok(())
}

/// Sends one request and decodes the JSON reply.
pub async fn query_reply<T, Req, Resp>(
    transport: &T,
    client: &str,
    addr: &str,
    key: &str,
    method: &str,
    req: Option<&Req>,
) -> Result<Resp, DashboardError>
where
    T: Transport,
    Req: Serialize + ?Sized,
    Resp: DeserializeOwned,
{
    let body = round_trip(transport, client, addr, key, method, req).await?;
    serde_json::from_slice(&body).map_err(DashboardError::Decoding)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::{Crash, LogEntry};
    use flate2::read::GzDecoder;
    use std::io::Read;

    #[test]
    fn test_should_compress() {
        assert!(!should_compress("https://dash.example.com", 99));
        assert!(should_compress("https://dash.example.com", 100));
        assert!(!should_compress("", 4096));
        assert!(!should_compress("http://localhost:8080", 4096));
        assert!(should_compress("http://127.0.0.1:8080", 4096));
    }

    #[test]
    fn test_api_url() {
        assert_eq!(
            api_url("https://dash.example.com", "ci", "s3cr3t", "upload_build"),
            "https://dash.example.com/api?client=ci&key=s3cr3t&method=upload_build"
        );
        assert_eq!(
            api_url("", "ci one", "a&b", "poll"),
            "/api?client=ci+one&key=a%26b&method=poll"
        );
    }

    #[test]
    fn test_build_request_without_body() {
        let request =
            build_request::<()>("ci", "https://dash.example.com", "k", "poll", None).unwrap();
        assert!(request.body.is_none());
        assert!(request.headers.is_empty());
    }

    #[test]
    fn test_small_body_is_plain() {
        let entry = LogEntry {
            name: "ci".to_string(),
            text: "oops".to_string(),
        };
        let request = build_request(
            "ci",
            "https://dash.example.com",
            "k",
            "log_error",
            Some(&entry),
        )
        .unwrap();

        assert_eq!(request.headers[CONTENT_TYPE], "application/json");
        assert!(request.headers.get(CONTENT_ENCODING).is_none());
        assert_eq!(request.body.unwrap(), serde_json::to_vec(&entry).unwrap());
    }

    #[test]
    fn test_large_body_is_gzipped() {
        let crash = Crash {
            build_id: "b1".to_string(),
            title: "general protection fault in ext4_fill_super".to_string(),
            log: vec![b'x'; 512],
            ..Default::default()
        };
        let request = build_request(
            "ci",
            "https://dash.example.com",
            "k",
            "report_crash",
            Some(&crash),
        )
        .unwrap();

        assert_eq!(request.headers[CONTENT_ENCODING], "gzip");

        let mut decoded = Vec::new();
        GzDecoder::new(&request.body.unwrap()[..])
            .read_to_end(&mut decoded)
            .unwrap();
        assert_eq!(decoded, serde_json::to_vec(&crash).unwrap());
    }

    #[test]
    fn test_large_body_to_localhost_is_plain() {
        let crash = Crash {
            log: vec![b'x'; 512],
            ..Default::default()
        };
        let request = build_request(
            "ci",
            "http://localhost:8080",
            "k",
            "report_crash",
            Some(&crash),
        )
        .unwrap();

        assert!(request.headers.get(CONTENT_ENCODING).is_none());
        assert_eq!(request.body.unwrap(), serde_json::to_vec(&crash).unwrap());
    }
}
