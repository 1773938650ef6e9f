use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use futures::future::{BoxFuture, FutureExt};
use futures::TryStreamExt;
use tokio::fs;
use tokio_util::io::ReaderStream;
use tracing::{debug, error, warn};

use crate::entry::{sort_entries, Entry, SortKey};
use crate::error::FileServerError;
use crate::listing::DirListing;
use crate::AppState;

/// Names that make a directory serve a page instead of a listing.
const INDEX_NAMES: [&str; 2] = ["index.html", "index.htm"];

/// The parts of an incoming request the resolver looks at.
///
/// Carried unchanged into the index re-entry so revalidation and sorting
/// behave the same for `/dir/` and `/dir/index.html`.
#[derive(Debug)]
struct ResourceRequest<'a> {
    /// Percent-decoded URL path
    url_path: &'a str,
    /// Raw path and query, used to pick the listing order
    target: &'a str,
    if_modified_since: Option<SystemTime>,
}

// ============================================================================
// Path normalization
// ============================================================================

/// Resolve `.` and `..` segments of a URL path lexically against `/`.
///
/// `..` at the top is dropped, so the result never climbs above `/`.
/// Empty segments collapse. The result always starts with `/`.
pub fn clean_path(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            name => segments.push(name),
        }
    }

    format!("/{}", segments.join("/"))
}

/// Map a decoded URL path to a filesystem path under `root`.
pub fn resolve_path(root: &Path, url_path: &str) -> PathBuf {
    let cleaned = clean_path(url_path);
    let relative = cleaned.trim_start_matches('/');

    if relative.is_empty() {
        root.to_path_buf()
    } else {
        root.join(relative)
    }
}

/// Whole seconds since the epoch, flooring pre-epoch instants.
fn unix_seconds(time: SystemTime) -> i64 {
    DateTime::<Utc>::from(time).timestamp()
}

// ============================================================================
// Handlers
// ============================================================================

/// Entry point for every request, whatever the method or path.
pub async fn handle_file(State(state): State<AppState>, uri: Uri, headers: HeaderMap) -> Response {
    let url_path = match urlencoding::decode(uri.path()) {
        Ok(path) => path.into_owned(),
        Err(err) => {
            return FileServerError::NotFound(format!("undecodable path {}: {}", uri.path(), err))
                .into_response();
        }
    };

    let target = uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| uri.path());

    let if_modified_since = headers
        .get(header::IF_MODIFIED_SINCE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| httpdate::parse_http_date(value).ok());

    let request = ResourceRequest {
        url_path: &url_path,
        target,
        if_modified_since,
    };

    let path = resolve_path(&state.root_dir, &url_path);

    match serve_path(&state, path, &request).await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}

/// Dispatch on what `path` is: directory, regular file, or anything else.
///
/// The type is checked before opening, so named pipes are never opened.
fn serve_path<'a>(
    state: &'a AppState,
    path: PathBuf,
    request: &'a ResourceRequest<'a>,
) -> BoxFuture<'a, Result<Response, FileServerError>> {
    async move {
        let metadata = fs::metadata(&path)
            .await
            .map_err(|e| FileServerError::NotFound(format!("{}: {}", path.display(), e)))?;

        if metadata.is_dir() {
            return handle_directory(state, &path, request).await;
        }

        if !metadata.is_file() {
            return Err(FileServerError::Forbidden(format!(
                "{} is not a regular file ({:?})",
                path.display(),
                metadata.file_type()
            )));
        }

        serve_regular_file(&path, request).await
    }
    .boxed()
}

/// Serve an index page if the directory has one, otherwise a listing.
async fn handle_directory(
    state: &AppState,
    dir: &Path,
    request: &ResourceRequest<'_>,
) -> Result<Response, FileServerError> {
    let mut read_dir = fs::read_dir(dir)
        .await
        .map_err(|e| FileServerError::NotFound(format!("reading {}: {}", dir.display(), e)))?;

    let mut members = Vec::new();
    while let Some(member) = read_dir
        .next_entry()
        .await
        .map_err(|e| FileServerError::Internal(format!("reading {}: {}", dir.display(), e)))?
    {
        let name = member.file_name().to_string_lossy().into_owned();
        if INDEX_NAMES.contains(&name.as_str()) {
            // Either name leads to index.html.
            debug!("Found {} in {}, serving index.html", name, dir.display());
            return serve_path(state, dir.join("index.html"), request).await;
        }
        members.push((name, member.path()));
    }

    let mut directories = Vec::new();
    let mut files = Vec::new();

    for (name, member_path) in members {
        if state.config.is_hidden(&name) {
            continue;
        }

        let metadata = match fs::metadata(&member_path).await {
            Ok(m) => m,
            Err(e) => {
                warn!("Skipping {} in listing: {}", member_path.display(), e);
                continue;
            }
        };

        let modified = metadata.modified().unwrap_or(UNIX_EPOCH);
        let entry = Entry::new(name, metadata.len(), modified);

        if metadata.is_dir() {
            directories.push(entry);
        } else {
            files.push(entry);
        }
    }

    let key = SortKey::from_request_target(request.target);
    sort_entries(&mut directories, key);
    sort_entries(&mut files, key);

    debug!(
        "Listing {}: {} directories, {} files, {:?}",
        dir.display(),
        directories.len(),
        files.len(),
        key
    );

    // Breadcrumb segments are embedded raw, so only the cleaned path goes in.
    let shown_path = format!("{}/", clean_path(request.url_path).trim_end_matches('/'));
    let html = DirListing::new(&shown_path, directories, files)
        .with_escaped_directory_names(state.config.escape_directory_names)
        .render()
        .map_err(|e| {
            FileServerError::Internal(format!("rendering listing for {}: {}", dir.display(), e))
        })?;

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
        html,
    )
        .into_response())
}

/// Stream a regular file, honouring `If-Modified-Since`.
///
/// Once streaming has started the status is committed; a read failure after
/// that point is logged and ends the body early.
async fn serve_regular_file(
    path: &Path,
    request: &ResourceRequest<'_>,
) -> Result<Response, FileServerError> {
    let file = fs::File::open(path)
        .await
        .map_err(|e| FileServerError::NotFound(format!("{}: {}", path.display(), e)))?;

    let metadata = file
        .metadata()
        .await
        .map_err(|e| FileServerError::Internal(format!("stat {}: {}", path.display(), e)))?;
    let modified = metadata
        .modified()
        .map_err(|e| FileServerError::Internal(format!("mtime {}: {}", path.display(), e)))?;

    if let Some(since) = request.if_modified_since {
        if unix_seconds(modified) <= unix_seconds(since) {
            debug!("Not modified: {}", path.display());
            return Ok(StatusCode::NOT_MODIFIED.into_response());
        }
    }

    let mime = mime_guess::from_path(path).first_or_octet_stream();

    debug!("Streaming file: {} ({})", path.display(), mime);

    let shown = path.display().to_string();
    let stream = ReaderStream::new(file)
        .inspect_err(move |e| error!("Read failed while streaming {}: {}", shown, e));

    Ok((
        StatusCode::OK,
        [
            (header::LAST_MODIFIED, httpdate::fmt_http_date(modified)),
            (header::CONTENT_TYPE, mime.to_string()),
            (header::CONTENT_LENGTH, metadata.len().to_string()),
        ],
        Body::from_stream(stream),
    )
        .into_response())
}
