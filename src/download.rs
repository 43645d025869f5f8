#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::{io::Write, path::PathBuf, time::Duration};

use anyhow::{Context, Result, ensure};
use futures::future::join_all;

use crate::{config, util};

/// Where downloaded response bodies go.
///
/// The original host API accepted null, a directory string, or a parallel
/// array of paths; this is the same contract as a tagged type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// Fetch for side effects only; bodies are dropped.
    Discard,
    /// Write one file per URL into this directory, named by the URL's
    /// final path segment.
    Directory(PathBuf),
    /// Explicit output path per URL, same length as the URL list.
    Paths(Vec<PathBuf>),
}

/// Derives an output file name from a URL's final path segment.
fn filename_from_url(link: &str) -> &str {
    match link.rsplit('/').next() {
        Some(name) if !name.is_empty() => name,
        _ => "index.html",
    }
}

/// Resolves the output path for every URL up front, or `None` when bodies
/// are discarded. Fails on a length mismatch between URLs and explicit
/// paths.
fn resolved_destinations(
    links: &[String],
    destination: &Destination,
) -> Result<Option<Vec<PathBuf>>> {
    match destination {
        Destination::Discard => Ok(None),
        Destination::Directory(dir) => {
            Ok(Some(links.iter().map(|link| dir.join(filename_from_url(link))).collect()))
        }
        Destination::Paths(paths) => {
            ensure!(
                paths.len() == links.len(),
                "Destination path count ({}) does not match URL count ({})",
                paths.len(),
                links.len()
            );
            Ok(Some(paths.clone()))
        }
    }
}

/// Fetches every URL concurrently, waits for all requests to finish, then
/// persists the bodies per `destination`.
///
/// A failed individual download is not distinguished from an empty
/// response; it is logged and an empty body is written. Only filesystem
/// problems and a destination/URL length mismatch are reported as errors.
/// A zero `timeout` falls back to the configured default.
pub fn download_all(links: &[String], destination: &Destination, timeout: Duration) -> Result<()> {
    let outputs = resolved_destinations(links, destination)?;

    let client = config::http_client()?;
    let timeout = if timeout.is_zero() { config::http_timeout() } else { timeout };

    let bodies: Vec<Vec<u8>> = config::runtime().block_on(async {
        let requests = links.iter().map(|link| {
            let client = client.clone();
            async move {
                let response = match client.get(link).timeout(timeout).send().await {
                    Ok(response) => response,
                    Err(e) => {
                        tracing::warn!("Download of {link} failed: {e}");
                        return Vec::new();
                    }
                };
                match response.bytes().await {
                    Ok(body) => body.to_vec(),
                    Err(e) => {
                        tracing::warn!("Reading body of {link} failed: {e}");
                        Vec::new()
                    }
                }
            }
        });
        join_all(requests).await
    });

    let Some(outputs) = outputs else {
        return Ok(());
    };

    for (path, body) in outputs.iter().zip(bodies) {
        let mut handle = util::create_file(path)?;
        handle
            .write_all(&body)
            .with_context(|| format!("Could not write downloaded file {}", path.display()))?;
    }

    Ok(())
}
