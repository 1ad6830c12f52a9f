//! HTTP adapter: routing, JSON (de)serialization, and error mapping.
//!
//! Stateless translation between the wire and the song service. Each
//! inbound connection gets its own tokio task; handlers block on the
//! database (and, for creation, the song info service) before responding.
//! Every failure yields a JSON body `{code, message}` where `code` is the
//! HTTP status.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use http_body_util::{BodyExt, Full, Limited};
use hyper::body::{Bytes, Incoming};
use hyper::header::CONTENT_TYPE;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto;
use hyper_util::server::graceful::GracefulShutdown;
use serde::Serialize;
use tokio::net::TcpListener;

use crate::enrichment::SongInfoApi;
use crate::error::Error;
use crate::lyrics::paginate_verses;
use crate::model::{NewSong, SongUpdate};
use crate::service::SongService;

/// Request bodies larger than this are rejected outright.
const MAX_BODY_SIZE: usize = 64 * 1024;

/// Everything a handler needs, shared across connections.
pub struct AppState {
    pub service: SongService,
    pub song_info: Arc<dyn SongInfoApi>,
}

/// JSON error body: `code` mirrors the HTTP status.
#[derive(Debug, Serialize)]
struct ErrorResponse {
    code: u16,
    message: String,
}

/// JSON success body for update/delete.
#[derive(Debug, Serialize)]
struct StatusResponse {
    message: &'static str,
    id: i64,
}

/// Bind and serve until ctrl-c, then drain in-flight connections.
pub async fn serve(addr: SocketAddr, state: AppState) -> anyhow::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "listening");

    serve_with_shutdown(listener, state, async {
        let _ = tokio::signal::ctrl_c().await;
    })
    .await
}

/// Accept loop with an injectable shutdown signal.
///
/// Once `shutdown` resolves, no new connections are accepted; open
/// connections are told to finish their current request and the function
/// returns only after all of them have drained.
async fn serve_with_shutdown(
    listener: TcpListener,
    state: AppState,
    shutdown: impl std::future::Future<Output = ()>,
) -> anyhow::Result<()> {
    let state = Arc::new(state);
    let graceful = GracefulShutdown::new();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            accepted = listener.accept() => {
                let (stream, peer) = accepted?;
                let state = Arc::clone(&state);
                let io = TokioIo::new(stream);
                let service = service_fn(move |req| {
                    let state = Arc::clone(&state);
                    async move { handle(state, req).await }
                });
                let builder = auto::Builder::new(TokioExecutor::new());
                let conn = builder.serve_connection(io, service);
                let conn = graceful.watch(conn.into_owned());
                tokio::spawn(async move {
                    if let Err(e) = conn.await {
                        tracing::debug!(%peer, error = %e, "connection error");
                    }
                });
            }
            _ = &mut shutdown => {
                tracing::info!("shutdown signal received");
                break;
            }
        }
    }

    graceful.shutdown().await;
    Ok(())
}

/// Collect the request body and dispatch. Never fails: every error is
/// translated into a JSON error response.
async fn handle(
    state: Arc<AppState>,
    req: Request<Incoming>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let (parts, body) = req.into_parts();

    let body = match Limited::new(body, MAX_BODY_SIZE).collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) if e.downcast_ref::<http_body_util::LengthLimitError>().is_some() => {
            return Ok(error_response(
                StatusCode::PAYLOAD_TOO_LARGE,
                "request body too large",
            ));
        }
        Err(e) => {
            return Ok(error_response(
                StatusCode::BAD_REQUEST,
                &format!("failed to read request body: {e}"),
            ));
        }
    };

    let response = dispatch(
        &state,
        &parts.method,
        parts.uri.path(),
        parts.uri.query(),
        &body,
    )
    .await;

    tracing::debug!(
        method = %parts.method,
        path = %parts.uri.path(),
        status = response.status().as_u16(),
        "handled request"
    );

    Ok(response)
}

/// Route on `(method, path segments)`.
async fn dispatch(
    state: &AppState,
    method: &Method,
    path: &str,
    query: Option<&str>,
    body: &[u8],
) -> Response<Full<Bytes>> {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    let result = match segments.as_slice() {
        ["songs"] if *method == Method::GET => list_songs(state, query).await,
        ["songs"] if *method == Method::POST => post_song(state, body).await,
        ["songs", id, "lyrics"] if *method == Method::GET => song_lyrics(state, id, query).await,
        ["songs", id] if *method == Method::PUT => update_song(state, id, body).await,
        ["songs", id] if *method == Method::DELETE => delete_song(state, id).await,
        _ => {
            return error_response(StatusCode::NOT_FOUND, "not found");
        }
    };

    result.unwrap_or_else(|err| {
        tracing::debug!(error = %err, "request failed");
        let status = StatusCode::from_u16(err.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        error_response(status, &err.to_string())
    })
}

async fn list_songs(state: &AppState, query: Option<&str>) -> Result<Response<Full<Bytes>>, Error> {
    let params = QueryParams::parse(query);

    let songs = state
        .service
        .get_songs(
            params.get("group").unwrap_or(""),
            params.get("name").unwrap_or(""),
            params.get("page"),
            params.get("limit"),
        )
        .await?;

    Ok(json_response(StatusCode::OK, &songs))
}

async fn song_lyrics(
    state: &AppState,
    id: &str,
    query: Option<&str>,
) -> Result<Response<Full<Bytes>>, Error> {
    let id = parse_id(id)?;
    let params = QueryParams::parse(query);

    // `verse` is mandatory and 1-based; `limit` falls back to one verse
    // per page when absent or unparsable.
    let verse = params
        .get("verse")
        .and_then(|v| v.parse::<usize>().ok())
        .filter(|&v| v >= 1)
        .ok_or_else(|| Error::invalid_argument("verse"))?;
    let limit = match params.get("limit").map(|v| v.parse::<usize>()) {
        Some(Ok(n)) if n >= 1 => n,
        _ => 1,
    };

    let song = state.service.get_song_by_id(id).await?;
    let verses = paginate_verses(&song.lyrics, verse, limit);

    Ok(json_response(StatusCode::OK, &verses))
}

async fn post_song(state: &AppState, body: &[u8]) -> Result<Response<Full<Bytes>>, Error> {
    let new_song: NewSong =
        serde_json::from_slice(body).map_err(|e| Error::bad_body(e.to_string()))?;
    if new_song.group_name.is_empty() {
        return Err(Error::invalid_argument("group"));
    }
    if new_song.song_name.is_empty() {
        return Err(Error::invalid_argument("song"));
    }

    // Enrich first; an upstream failure must abort before any write.
    let details = state
        .song_info
        .fetch_details(&new_song.group_name, &new_song.song_name)
        .await?;

    let song = new_song.into_song(&details);
    let id = state.service.post_song(&song).await?;
    tracing::debug!(id, group = %song.group_name, song = %song.song_name, "created song");

    Ok(json_response(StatusCode::OK, &details))
}

async fn update_song(
    state: &AppState,
    id: &str,
    body: &[u8],
) -> Result<Response<Full<Bytes>>, Error> {
    let id = parse_id(id)?;
    let update: SongUpdate =
        serde_json::from_slice(body).map_err(|e| Error::bad_body(e.to_string()))?;

    state.service.update_song_by_id(id, update).await?;
    tracing::debug!(id, "updated song");

    Ok(json_response(
        StatusCode::OK,
        &StatusResponse {
            message: "Song successfully updated",
            id,
        },
    ))
}

async fn delete_song(state: &AppState, id: &str) -> Result<Response<Full<Bytes>>, Error> {
    let id = parse_id(id)?;

    state.service.delete_song_by_id(id).await?;
    tracing::debug!(id, "deleted song");

    Ok(json_response(
        StatusCode::OK,
        &StatusResponse {
            message: "Song successfully deleted",
            id,
        },
    ))
}

/// Path ids must be positive integers.
fn parse_id(raw: &str) -> Result<i64, Error> {
    raw.parse::<i64>()
        .ok()
        .filter(|&id| id >= 1)
        .ok_or_else(|| Error::invalid_argument("id"))
}

/// Decoded query-string pairs.
struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    fn parse(query: Option<&str>) -> Self {
        let pairs = query
            .unwrap_or("")
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| {
                let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
                (decode(key), decode(value))
            })
            .collect();
        Self(pairs)
    }

    fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

fn decode(raw: &str) -> String {
    // '+' is a space in query strings; percent-decode the rest.
    let raw = raw.replace('+', " ");
    urlencoding::decode(&raw)
        .map(|s| s.into_owned())
        .unwrap_or(raw)
}

fn json_response<T: Serialize>(status: StatusCode, value: &T) -> Response<Full<Bytes>> {
    match serde_json::to_vec(value) {
        Ok(body) => Response::builder()
            .status(status)
            .header(CONTENT_TYPE, "application/json")
            .body(Full::new(Bytes::from(body)))
            .expect("response construction cannot fail"),
        Err(e) => error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            &format!("failed to encode response: {e}"),
        ),
    }
}

fn error_response(status: StatusCode, message: &str) -> Response<Full<Bytes>> {
    let body = ErrorResponse {
        code: status.as_u16(),
        message: message.to_string(),
    };
    let body = serde_json::to_vec(&body).unwrap_or_else(|_| b"{}".to_vec());
    Response::builder()
        .status(status)
        .header(CONTENT_TYPE, "application/json")
        .body(Full::new(Bytes::from(body)))
        .expect("response construction cannot fail")
}
