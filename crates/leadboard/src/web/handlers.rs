//! Route handlers.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, warn};

use super::error::WebError;
use super::views::{self, CitySearch, DashboardPage, LeadRows};
use super::AppState;
use crate::analytics::{self, DashboardMetrics, Summary};
use crate::filter;
use crate::lead::{count_with_coordinates, Lead};
use crate::store::{LoadState, StoreSnapshot};

/// Query of `/filter`.
#[derive(Debug, Deserialize)]
pub struct StateQuery {
    state: Option<String>,
}

/// Query of `/search`.
#[derive(Debug, Deserialize)]
pub struct CompanyQuery {
    company: Option<String>,
}

/// Query of `/city-search`.
#[derive(Debug, Deserialize)]
pub struct CitySearchQuery {
    city: Option<String>,
    radius: Option<String>,
}

/// Query of the debug routes.
#[derive(Debug, Deserialize)]
pub struct DebugQuery {
    key: Option<String>,
    city: Option<String>,
}

/// Snapshot of loaded data, or the page explaining why there is none.
async fn loaded(state: &AppState) -> Result<StoreSnapshot, WebError> {
    let snapshot = state.store.snapshot().await;
    match &snapshot.state {
        LoadState::Ready => Ok(snapshot),
        LoadState::Loading => Err(WebError::Loading),
        LoadState::Failed(message) => Err(WebError::LoadFailed(message.clone())),
    }
}

fn dashboard_page<'a>(
    state: &AppState,
    snapshot: &StoreSnapshot,
    rows: LeadRows<'a>,
    metrics: &'a DashboardMetrics,
    summary: Summary,
) -> DashboardPage<'a> {
    DashboardPage {
        rows,
        summary,
        metrics,
        selected_state: None,
        search_term: None,
        city_search: None,
        error: None,
        last_refresh: snapshot.last_refresh,
        show_logout: state.sessions.login_required(),
    }
}

fn metrics_for(leads: &[Lead]) -> (DashboardMetrics, Summary) {
    (DashboardMetrics::compute(leads), analytics::summarize(leads))
}

/// `GET /`
pub async fn dashboard(State(state): State<Arc<AppState>>) -> Result<Html<String>, WebError> {
    let snapshot = loaded(&state).await?;
    let leads = snapshot.leads.as_slice();
    let (metrics, summary) = metrics_for(leads);

    let page = dashboard_page(&state, &snapshot, LeadRows::Plain(leads), &metrics, summary);
    Ok(Html(views::render_dashboard(&page)))
}

/// `GET /filter?state=`
pub async fn filter_by_state(
    State(state): State<Arc<AppState>>,
    Query(query): Query<StateQuery>,
) -> Result<Html<String>, WebError> {
    let snapshot = loaded(&state).await?;
    let selected = query.state.as_deref().map(str::trim);
    let leads = filter::by_state(&snapshot.leads, selected);
    let (metrics, summary) = metrics_for(&leads);

    let mut page = dashboard_page(&state, &snapshot, LeadRows::Plain(&leads), &metrics, summary);
    page.selected_state = selected.filter(|s| !s.is_empty());
    Ok(Html(views::render_dashboard(&page)))
}

/// `GET /search?company=`
pub async fn search_company(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CompanyQuery>,
) -> Result<Html<String>, WebError> {
    let snapshot = loaded(&state).await?;
    let term = query.company.unwrap_or_default();
    let leads = filter::by_company(&snapshot.leads, &term);
    let (metrics, summary) = metrics_for(&leads);

    let mut page = dashboard_page(&state, &snapshot, LeadRows::Plain(&leads), &metrics, summary);
    page.search_term = Some(term.trim());
    Ok(Html(views::render_dashboard(&page)))
}

/// `GET /city-search?city=&radius=`
pub async fn city_search(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CitySearchQuery>,
) -> Result<Response, WebError> {
    let snapshot = loaded(&state).await?;

    let city = query.city.as_deref().map(str::trim).unwrap_or_default();
    if city.is_empty() {
        return Ok(Redirect::to("/").into_response());
    }
    let radius = filter::parse_radius(query.radius.as_deref());

    let Some(center) = state.geocoder.geocode(city).await else {
        warn!(city, "City search could not geocode city");
        let metrics = DashboardMetrics::default();
        let mut page =
            dashboard_page(&state, &snapshot, LeadRows::Plain(&[]), &metrics, Summary::default());
        page.city_search = Some(CitySearch {
            city,
            radius,
            center: None,
        });
        page.error = Some(format!(
            "Could not find coordinates for \"{city}\". Please try a different city name."
        ));
        return Ok(Html(views::render_dashboard(&page)).into_response());
    };

    let found = filter::within_radius(&snapshot.leads, center.coordinates, radius);
    info!(city, radius, matches = found.len(), "City search");

    let leads: Vec<Lead> = found.iter().map(|s| s.lead.clone()).collect();
    let (metrics, summary) = metrics_for(&leads);
    let mut page = dashboard_page(&state, &snapshot, LeadRows::Scored(&found), &metrics, summary);
    page.city_search = Some(CitySearch {
        city,
        radius,
        center: Some(&center),
    });
    Ok(Html(views::render_dashboard(&page)).into_response())
}

/// `POST /refresh-data`
pub async fn refresh_data(State(state): State<Arc<AppState>>) -> Response {
    match state.store.refresh(state.source.as_ref()).await {
        Ok(count) => Json(json!({
            "success": true,
            "message": format!("Data refreshed successfully! Loaded {count} leads."),
        }))
        .into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "success": false,
                "message": format!("Error refreshing data: {e}"),
            })),
        )
            .into_response(),
    }
}

/// `GET /api/dashboard-data`
pub async fn dashboard_data(State(state): State<Arc<AppState>>) -> Result<Json<Value>, WebError> {
    let snapshot = loaded(&state).await?;
    let summary = analytics::summarize(&snapshot.leads);
    let distribution = DashboardMetrics::compute(&snapshot.leads);
    Ok(Json(json!({
        "summary": summary,
        "distribution": distribution,
    })))
}

/// `GET /health`
pub async fn health(State(state): State<Arc<AppState>>) -> Json<Value> {
    let snapshot = state.store.snapshot().await;
    let smartsuite = &state.config.smartsuite;
    Json(json!({
        "status": "ok",
        "timestamp": Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
        "data": {
            "loaded": snapshot.state.is_ready(),
            "total_records": snapshot.leads.len(),
            "records_with_coordinates": count_with_coordinates(&snapshot.leads),
            "last_refresh": snapshot
                .last_refresh
                .map_or_else(|| "never".to_string(), |ts| ts.to_rfc3339()),
        },
        "smartsuite_config": {
            "has_api_key": !smartsuite.api_key.is_empty(),
            "account_id": smartsuite.account_id,
            "table_id": smartsuite.table_id,
        },
    }))
}

fn check_debug_key(state: &AppState, provided: Option<&str>) -> Result<(), WebError> {
    let Some(expected) = state.config.debug.key.as_deref().filter(|k| !k.is_empty()) else {
        return Err(WebError::NotFound);
    };
    if provided == Some(expected) {
        Ok(())
    } else {
        Err(WebError::Unauthorized)
    }
}

/// `GET /debug/geocoding?city=&key=`
pub async fn debug_geocoding(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DebugQuery>,
) -> Result<Json<Value>, WebError> {
    check_debug_key(&state, query.key.as_deref())?;

    let city = query
        .city
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .ok_or_else(|| WebError::BadRequest("City parameter required".to_string()))?;

    let result = state.geocoder.geocode(city).await;
    Ok(Json(json!({
        "city": city,
        "success": result.is_some(),
        "result": result,
        "cache_size": state.geocoder.cache_size(),
        "geocoding_enabled": state.geocoder.is_enabled(),
    })))
}

/// `GET /debug/current-data?key=`
pub async fn debug_current_data(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DebugQuery>,
) -> Result<Json<Value>, WebError> {
    check_debug_key(&state, query.key.as_deref())?;

    let snapshot = state.store.snapshot().await;
    let samples: Vec<&Lead> = snapshot.leads.iter().take(3).collect();
    Ok(Json(json!({
        "loaded": snapshot.state.is_ready(),
        "total_records": snapshot.leads.len(),
        "records_with_coordinates": count_with_coordinates(&snapshot.leads),
        "last_refresh": snapshot.last_refresh.map(|ts| ts.to_rfc3339()),
        "sample_records": samples,
    })))
}

/// `GET /debug/smartsuite-data?key=`
pub async fn debug_smartsuite_data(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DebugQuery>,
) -> Result<Json<Value>, WebError> {
    check_debug_key(&state, query.key.as_deref())?;

    let Some(record) = state.source.sample().await? else {
        return Ok(Json(json!({ "message": "No records found" })));
    };

    let location_id = &state.config.smartsuite.fields.location;
    let location = record.get(location_id).cloned().unwrap_or(Value::Null);
    let location_type = match &location {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    };
    let location_keys: Vec<&String> = location
        .as_object()
        .map(|obj| obj.keys().collect())
        .unwrap_or_default();

    Ok(Json(json!({
        "sample_record": record,
        "location_field_id": location_id,
        "location_field": location,
        "location_field_type": location_type,
        "location_field_keys": location_keys,
    })))
}

/// `GET /favicon.ico`
pub async fn favicon(State(state): State<Arc<AppState>>) -> Response {
    let path = state.config.server.public_dir.join("favicon.ico");
    match tokio::fs::read(&path).await {
        Ok(bytes) if !bytes.is_empty() => {
            ([(header::CONTENT_TYPE, "image/x-icon")], bytes).into_response()
        }
        _ => StatusCode::NO_CONTENT.into_response(),
    }
}
