use axum::body::Bytes;
use axum::extract::rejection::{BytesRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use serde_json::{json, Value};

use crate::config::Config;
use crate::errors::HookError;
use crate::jobs::fanout::{self, FanoutReport};
use crate::models::destination;
use crate::models::message::{NormalizedMessage, TEST_MESSAGE};
use crate::models::responses::DefaultResponse;
use crate::models::submission::Submission;
use crate::AppState;

pub const SECRET_HEADER: &str = "x-webhook-secret";

/// `POST /hook`: relays a form submission.
pub async fn receive(
    State(state): State<AppState>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let query = match query_submission(query) {
        Ok(query) => query,
        Err(err) => return err.into_response(),
    };

    let body = match body {
        Ok(body) => body,
        Err(rejection) => {
            let err = HookError::InvalidBody(rejection.to_string());
            tracing::warn!(error = %err, "rejected hook body");
            return err.into_response();
        }
    };

    let payload = match parse_body(&headers, &body) {
        Ok(payload) => payload,
        Err(err) => {
            tracing::warn!(error = %err, "rejected hook body");
            return err.into_response();
        }
    };

    let secret = header_secret(&headers)
        .or_else(|| query.secret())
        .or_else(|| payload.secret());

    let submission = payload.fill_missing(query);

    let result = relay(&state, secret, &submission, |submission| {
        NormalizedMessage::from_submission(submission).render()
    })
    .await;

    respond(result)
}

/// `GET /hook`: sends a fixed test message; only the query string is read.
pub async fn ping(
    State(state): State<AppState>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
    headers: HeaderMap,
) -> Response {
    let query = match query_submission(query) {
        Ok(query) => query,
        Err(err) => return err.into_response(),
    };
    let secret = header_secret(&headers).or_else(|| query.secret());

    let result = relay(&state, secret, &query, |_| TEST_MESSAGE.to_string()).await;

    respond(result)
}

async fn relay(
    state: &AppState,
    secret: Option<String>,
    submission: &Submission,
    render: fn(&Submission) -> String,
) -> Result<FanoutReport, HookError> {
    authorize(&state.config, secret.as_deref())?;

    let bot_token = state
        .config
        .bot_token()
        .ok_or(HookError::MissingBotToken)?;

    let chat_ids = destination::resolve(submission, &state.config);
    let text = render(submission);

    fanout::fan_out(&state.telegram, bot_token, &chat_ids, &text)
        .await?
        .into_result()
}

fn authorize(config: &Config, secret: Option<&str>) -> Result<(), HookError> {
    match config.shared_secret() {
        Some(expected) if secret != Some(expected) => {
            tracing::warn!(provided = secret.is_some(), "shared secret mismatch");
            Err(HookError::Unauthorized)
        }
        _ => Ok(()),
    }
}

fn respond(result: Result<FanoutReport, HookError>) -> Response {
    match result {
        Ok(report) => {
            let body = DefaultResponse::ok()
                .with_sent_to(report.sent_to())
                .with_result(json!(report))
                .into_json();

            (StatusCode::OK, body).into_response()
        }
        Err(err) => {
            if let HookError::AllDeliveriesFailed(_) = &err {
                tracing::error!(error = %err, "no destination received the message");
            }

            err.into_response()
        }
    }
}

fn query_submission(
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Submission, HookError> {
    match query {
        Ok(Query(pairs)) => Ok(Submission::from_pairs(pairs)),
        Err(rejection) => Err(HookError::InvalidBody(rejection.to_string())),
    }
}

/// An empty header counts as absent.
fn header_secret(headers: &HeaderMap) -> Option<String> {
    headers
        .get(SECRET_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

fn parse_body(headers: &HeaderMap, body: &[u8]) -> Result<Submission, HookError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Submission::default());
    }

    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_ascii_lowercase();

    if content_type.starts_with("application/json") {
        parse_json(body)
    } else if content_type.starts_with("application/x-www-form-urlencoded") {
        Submission::from_form(body).map_err(HookError::InvalidBody)
    } else {
        parse_json(body)
            .or_else(|_| Submission::from_form(body).map_err(HookError::InvalidBody))
    }
}

fn parse_json(body: &[u8]) -> Result<Submission, HookError> {
    let value = serde_json::from_slice::<Value>(body)
        .map_err(|err| HookError::InvalidBody(err.to_string()))?;

    Submission::from_json(value).map_err(HookError::InvalidBody)
}
