//! Stub safety API: three read-only collections and the journey score.

use hyper::header::{CONTENT_TYPE, HeaderValue};
use hyper::{Body, Method, Request, Response, StatusCode};
use sefguard_core::{CompanionStore, DEFAULT_NEARBY_DISTANCE_M, ScoreError, ScoreRequest};
use serde::Serialize;
use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::Arc;
use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    BadRequest(#[from] ScoreError),
    #[error("{message}")]
    Internal {
        message: &'static str,
        #[source]
        source: BoxError,
    },
    #[error("Not found")]
    NotFound,
    #[error("Method not allowed")]
    MethodNotAllowed,
}

impl ApiError {
    const fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
        }
    }

    fn into_response(self) -> Response<Body> {
        if let Self::Internal { message, source } = &self {
            log::error!("{message}: {source}");
        }
        let body = serde_json::json!({ "message": self.to_string() }).to_string();
        let mut response = Response::new(Body::from(body));
        *response.status_mut() = self.status();
        response
            .headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        response
    }
}

fn internal<E>(message: &'static str) -> impl FnOnce(E) -> ApiError
where
    E: std::error::Error + Send + Sync + 'static,
{
    move |err| ApiError::Internal {
        message,
        source: Box::new(err),
    }
}

fn json<T: Serialize>(body: &T, message: &'static str) -> Result<Response<Body>, ApiError> {
    let bytes = serde_json::to_vec(body).map_err(internal(message))?;
    Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(bytes))
        .map_err(internal(message))
}

/// Decoded query string; the first occurrence of a key wins.
#[derive(Debug, Default)]
struct Query(HashMap<String, String>);

impl Query {
    fn parse(raw: Option<&str>) -> Self {
        let mut params = HashMap::new();
        if let Some(raw) = raw {
            for (key, value) in url::form_urlencoded::parse(raw.as_bytes()) {
                params.entry(key.into_owned()).or_insert_with(|| value.into_owned());
            }
        }
        Self(params)
    }

    fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }
}

/// Leading-integer parse: optional sign then digits, trailing junk ignored.
fn parse_int_prefix(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    let value: i64 = digits[..end].parse().ok()?;
    Some(if negative { -value } else { value })
}

/// Radius for `/api/responders/nearby`. Missing, unparseable, and zero values
/// fall back to the default; a negative radius matches nobody.
fn nearby_radius(query: &Query) -> Option<u32> {
    match query.get("distance").and_then(parse_int_prefix) {
        None | Some(0) => Some(DEFAULT_NEARBY_DISTANCE_M),
        Some(n) if n < 0 => None,
        Some(n) => Some(u32::try_from(n).unwrap_or(u32::MAX)),
    }
}

fn route<S: CompanionStore>(store: &S, req: &Request<Body>) -> Result<Response<Body>, ApiError> {
    const RESPONDERS: &str = "Failed to fetch responders";
    const NEARBY: &str = "Failed to fetch nearby responders";
    const HAVENS: &str = "Failed to fetch safe havens";
    const SCORE: &str = "Failed to calculate safety score";

    let path = req.uri().path();
    let known = matches!(
        path,
        "/api/responders"
            | "/api/responders/nearby"
            | "/api/safe-havens"
            | "/api/journey/safety-score"
    );
    if !known {
        return Err(ApiError::NotFound);
    }
    if req.method() != Method::GET {
        return Err(ApiError::MethodNotAllowed);
    }

    let query = Query::parse(req.uri().query());
    match path {
        "/api/responders" => json(&store.responders().map_err(internal(RESPONDERS))?, RESPONDERS),
        "/api/responders/nearby" => {
            let responders = match nearby_radius(&query) {
                Some(radius) => store.nearby_responders(radius).map_err(internal(NEARBY))?,
                None => Vec::new(),
            };
            json(&responders, NEARBY)
        }
        "/api/safe-havens" => json(&store.safe_havens().map_err(internal(HAVENS))?, HAVENS),
        _ => {
            let request =
                ScoreRequest::from_query(query.get("from"), query.get("to"), query.get("mode"))?;
            let score = store
                .journey_safety_score(&request)
                .map_err(internal(SCORE))?;
            json(&score, SCORE)
        }
    }
}

/// hyper service entry point.
///
/// # Errors
///
/// Never fails; every error is rendered as a JSON response.
pub async fn handle<S>(store: Arc<S>, req: Request<Body>) -> Result<Response<Body>, Infallible>
where
    S: CompanionStore + Send + Sync + 'static,
{
    let response = route(store.as_ref(), &req).unwrap_or_else(ApiError::into_response);
    log::info!(
        "{} {} -> {}",
        req.method(),
        req.uri().path(),
        response.status().as_u16()
    );
    Ok(response)
}
