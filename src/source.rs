//! Line-stream sources. Both variants surface the same buffered
//! line-readable stream, so the driver never knows where the export
//! lives.

use std::path::PathBuf;

use anyhow::{Context, Result};
use futures_util::TryStreamExt;
use tokio::fs::File;
use tokio::io::{AsyncBufRead, BufReader};
use tokio_util::io::StreamReader;

pub type LineReader = Box<dyn AsyncBufRead + Unpin + Send>;

pub enum Source {
    /// Local newline-delimited JSON file.
    File(PathBuf),
    /// Remote object fetched over HTTP, e.g. a pre-signed object URL.
    Url(String),
}

impl Source {
    /// Open the source. Failures here are stream-level fatal errors and
    /// surface to the caller instead of a run summary.
    pub async fn open(&self) -> Result<LineReader> {
        match self {
            Source::File(path) => {
                let file = File::open(path)
                    .await
                    .with_context(|| format!("cannot open {}", path.display()))?;
                Ok(Box::new(BufReader::new(file)))
            }
            Source::Url(url) => {
                let response = reqwest::get(url)
                    .await
                    .and_then(|r| r.error_for_status())
                    .with_context(|| format!("cannot fetch {}", url))?;
                let bytes = Box::pin(response.bytes_stream().map_err(std::io::Error::other));
                Ok(Box::new(StreamReader::new(bytes)))
            }
        }
    }
}
