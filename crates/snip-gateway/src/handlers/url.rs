use crate::app::RESERVED_SHORTCODES;
use crate::error::{AppError, Result};
use crate::model::{iso8601, CreateUrlRequest, CreateUrlResponse, StatsResponse};
use crate::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use snip_core::{CreateParams, Level, Package, ShortCode, ShortenerError, Validity};

pub async fn create_url_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<CreateUrlRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreateUrlResponse>)> {
    let Json(request) = payload.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
    let url = request.url.unwrap_or_default();

    state.log(
        Level::Info,
        Package::Route,
        format!("Creating short URL for: {url}"),
    );

    let params = build_params(&state, url.clone(), request.validity, request.shortcode)
        .inspect_err(|e| log_create_failure(&state, &url, e))?;

    let record = state
        .shortener()
        .create(params)
        .await
        .inspect_err(|e| log_create_failure(&state, &url, e))?;

    let short_link = record.shortcode().to_url(state.base_url());
    state.log(
        Level::Info,
        Package::Route,
        format!("Short URL created: {short_link}"),
    );

    Ok((
        StatusCode::CREATED,
        Json(CreateUrlResponse {
            short_link,
            expiry: iso8601(record.expires_at()),
        }),
    ))
}

fn build_params(
    state: &AppState,
    target_url: String,
    validity: Option<f64>,
    shortcode: Option<String>,
) -> std::result::Result<CreateParams, ShortenerError> {
    let validity = match validity {
        None => state.default_validity(),
        Some(minutes) => Validity::from_minutes(whole_minutes(minutes)?)?,
    };

    let custom_alias = shortcode
        .filter(|code| !code.is_empty())
        .map(|code| {
            if RESERVED_SHORTCODES.contains(&code.as_str()) {
                return Err(ShortenerError::InvalidShortCode(format!(
                    "short code is reserved: {code}"
                )));
            }
            ShortCode::new(code)
        })
        .transpose()?;

    Ok(CreateParams {
        target_url,
        validity,
        custom_alias,
    })
}

fn whole_minutes(minutes: f64) -> std::result::Result<u32, ShortenerError> {
    if minutes.fract() != 0.0 || !(0.0..=f64::from(u32::MAX)).contains(&minutes) {
        return Err(ShortenerError::InvalidValidity(format!(
            "validity must be a whole number of minutes, got {minutes}"
        )));
    }
    Ok(minutes as u32)
}

fn log_create_failure(state: &AppState, url: &str, error: &ShortenerError) {
    match error {
        ShortenerError::InvalidUrl(_) => {
            state.log(Level::Error, Package::Route, format!("Invalid URL format: {url}"))
        }
        ShortenerError::Conflict(code) => {
            state.log(Level::Warn, Package::Route, format!("Shortcode collision: {code}"))
        }
        other => state.log(
            Level::Error,
            Package::Route,
            format!("Failed to create short URL: {other}"),
        ),
    }
}

pub async fn stats_handler(
    Path(shortcode): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<StatsResponse>> {
    state.log(
        Level::Debug,
        Package::Route,
        format!("Fetching stats for shortcode: {shortcode}"),
    );

    let record = state
        .shortener()
        .resolve(&ShortCode::new_unchecked(&shortcode))
        .await
        .inspect_err(|_| log_missing(&state, &shortcode))?;

    Ok(Json(StatsResponse::from(&record)))
}

pub async fn redirect_handler(
    Path(shortcode): Path<String>,
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response> {
    state.log(
        Level::Info,
        Package::Route,
        format!("Redirecting shortcode: {shortcode}"),
    );

    let referrer = headers
        .get(header::REFERER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);

    let record = state
        .shortener()
        .resolve_and_track(&ShortCode::new_unchecked(&shortcode), referrer)
        .await
        .inspect_err(|_| log_missing(&state, &shortcode))?;

    Ok((
        StatusCode::FOUND,
        [(header::LOCATION, record.target_url().to_owned())],
    )
        .into_response())
}

fn log_missing(state: &AppState, shortcode: &str) {
    state.log(
        Level::Error,
        Package::Route,
        format!("Non-existent or expired link: {shortcode}"),
    );
}
