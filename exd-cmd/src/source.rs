//! Dataset sources for the CLI: a local site directory or a published site.

use anyhow::Context;
use exd_data::pipeline::FetchResponse;
use log::debug;
use std::path::PathBuf;
use std::time::Duration;

/// Timeout for a single HTTP dataset request.
const HTTP_TIMEOUT_SECS: u64 = 60;

/// Root that `data/processed/<id>.json` paths are resolved against.
#[derive(Debug, Clone)]
pub enum DatasetSource {
    Dir(PathBuf),
    Http { base: String, client: reqwest::Client },
}

impl DatasetSource {
    /// `http://` and `https://` values are base URLs; anything else is a directory.
    pub fn from_arg(arg: &str) -> anyhow::Result<Self> {
        if arg.starts_with("http://") || arg.starts_with("https://") {
            let client = reqwest::Client::builder()
                .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
                .build()?;
            Ok(DatasetSource::Http {
                base: arg.trim_end_matches('/').to_string(),
                client,
            })
        } else {
            Ok(DatasetSource::Dir(PathBuf::from(arg)))
        }
    }

    /// Human-readable location of a relative path within this source.
    pub fn locate(&self, path: &str) -> String {
        match self {
            DatasetSource::Dir(root) => root.join(path).display().to_string(),
            DatasetSource::Http { base, .. } => format!("{}/{}", base, path),
        }
    }

    /// Fetch a relative path.
    ///
    /// A missing file maps to a 404 response so both sources report it the
    /// same way; other I/O and network failures are errors.
    pub async fn fetch(&self, path: &str) -> anyhow::Result<FetchResponse> {
        let location = self.locate(path);
        debug!("Fetching {}", location);
        match self {
            DatasetSource::Dir(root) => match tokio::fs::read_to_string(root.join(path)).await {
                Ok(body) => Ok(FetchResponse::ok(body)),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    Ok(FetchResponse::new(404, ""))
                }
                Err(e) => Err(e).with_context(|| format!("reading {}", location)),
            },
            DatasetSource::Http { client, .. } => {
                let response = client
                    .get(&location)
                    .send()
                    .await
                    .with_context(|| format!("requesting {}", location))?;
                let status = response.status().as_u16();
                let body = response.text().await?;
                Ok(FetchResponse::new(status, body))
            }
        }
    }
}
