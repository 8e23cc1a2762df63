//! Request helpers shared by the service clients.
//!
//! Every call is one attempt: no retry and no backoff. Non-2xx statuses are
//! surfaced as `UpstreamStatus` instead of being read as empty data.

use bionode_common::{BionodeError, Result, SandboxClient};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

const JSON: &str = "application/json";

/// GET `url` and parse the body as JSON.
pub async fn get_json(client: &SandboxClient, url: &str) -> Result<Value> {
    debug!(url, "GET");
    let resp = client.get(url)?.header(ACCEPT, JSON).send().await?;
    read_json(url, resp).await
}

/// GET `url` with query parameters and parse the body as JSON.
pub async fn get_json_query(client: &SandboxClient, url: &str, query: &[(&str, String)]) -> Result<Value> {
    debug!(url, ?query, "GET");
    let resp = client.get(url)?.header(ACCEPT, JSON).query(query).send().await?;
    read_json(url, resp).await
}

/// POST a JSON body to `url` and parse the body as JSON.
pub async fn post_json<B: Serialize + ?Sized>(client: &SandboxClient, url: &str, body: &B) -> Result<Value> {
    debug!(url, "POST");
    let resp = client
        .post(url)?
        .header(ACCEPT, JSON)
        .header(CONTENT_TYPE, JSON)
        .json(body)
        .send()
        .await?;
    read_json(url, resp).await
}

async fn read_json(url: &str, resp: reqwest::Response) -> Result<Value> {
    let status = resp.status();
    if !status.is_success() {
        return Err(BionodeError::UpstreamStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }
    let bytes = resp.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Joins a base URL and a path without doubling or dropping the `/`.
pub fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_url() {
        assert_eq!(join_url("https://api.glygen.org/", "/protein/list/"), "https://api.glygen.org/protein/list/");
        assert_eq!(join_url("http://127.0.0.1:8080", "glycan/detail/G1"), "http://127.0.0.1:8080/glycan/detail/G1");
    }
}
