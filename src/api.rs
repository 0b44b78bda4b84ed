use std::sync::Arc;

use axum::{
    Router,
    extract::{DefaultBodyLimit, Multipart, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::assembler::RoutePlanner;
use crate::error::RouteError;
use crate::models::{Route, Stop};

#[derive(Deserialize)]
pub struct TripRequest {
    pub query: String,
}

#[derive(Deserialize)]
pub struct ManualRouteRequest {
    pub stops: Vec<Stop>,
}

#[derive(Serialize)]
pub struct TripResponse {
    pub trip_id: String,
    pub route: Route,
}

#[derive(Deserialize)]
pub struct SearchParams {
    pub q: String,
}

#[derive(Serialize)]
pub struct SearchResponse {
    pub name: String,
    pub coordinates: [f64; 2],
    pub country_code: String,
}

/// Error body in the `{"detail": ...}` shape the frontend expects
pub struct ApiError {
    status: StatusCode,
    detail: String,
}

impl From<RouteError> for ApiError {
    fn from(err: RouteError) -> Self {
        let status = match &err {
            RouteError::PlaceNotRecognized { .. } | RouteError::EmptyRecognizedText => {
                StatusCode::BAD_REQUEST
            }
            RouteError::UpstreamUnavailable { .. } => StatusCode::BAD_GATEWAY,
            RouteError::MalformedModelOutput { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            detail: err.user_message(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "detail": self.detail }))).into_response()
    }
}

pub fn router(planner: Arc<RoutePlanner>, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/generate-route", post(generate_route))
        .route("/manual-route", post(manual_route))
        .route("/upload-image", post(upload_image))
        .route("/search", get(search_place))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .with_state(planner)
}

async fn generate_route(
    State(planner): State<Arc<RoutePlanner>>,
    Json(request): Json<TripRequest>,
) -> Result<Json<TripResponse>, ApiError> {
    let route = planner.resolve_from_text(&request.query).await?;
    Ok(Json(TripResponse {
        trip_id: "auto_gen".to_string(),
        route,
    }))
}

async fn manual_route(
    State(planner): State<Arc<RoutePlanner>>,
    Json(request): Json<ManualRouteRequest>,
) -> Result<Json<TripResponse>, ApiError> {
    let route = planner.resolve_route(&request.stops).await?;
    Ok(Json(TripResponse {
        trip_id: "manual_trip".to_string(),
        route,
    }))
}

async fn upload_image(
    State(planner): State<Arc<RoutePlanner>>,
    mut multipart: Multipart,
) -> Result<Json<TripResponse>, ApiError> {
    let mut image = Vec::new();
    while let Some(field) = multipart.next_field().await.map_err(|_| ApiError {
        status: StatusCode::BAD_REQUEST,
        detail: "Invalid multipart body".to_string(),
    })? {
        if field.name() == Some("file") {
            image = field
                .bytes()
                .await
                .map_err(|_| ApiError {
                    status: StatusCode::BAD_REQUEST,
                    detail: "Could not read uploaded file".to_string(),
                })?
                .to_vec();
            break;
        }
    }

    // An absent or empty file behaves like an unreadable image
    let route = planner.resolve_from_image(&image).await?;
    Ok(Json(TripResponse {
        trip_id: "auto_gen".to_string(),
        route,
    }))
}

async fn search_place(
    State(planner): State<Arc<RoutePlanner>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, ApiError> {
    let (coordinates, country_code) = planner.resolve_place(&params.q).await?;
    Ok(Json(SearchResponse {
        name: params.q,
        coordinates,
        country_code,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_error_status_mapping() {
        let bad: ApiError = RouteError::unrecognized("Atlantis").into();
        assert_eq!(bad.status, StatusCode::BAD_REQUEST);
        assert!(bad.detail.contains("Atlantis"));

        let empty: ApiError = RouteError::EmptyRecognizedText.into();
        assert_eq!(empty.status, StatusCode::BAD_REQUEST);

        let upstream: ApiError = RouteError::upstream("down").into();
        assert_eq!(upstream.status, StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_manual_request_defaults_transport_mode() {
        let request: ManualRouteRequest =
            serde_json::from_str(r#"{"stops": [{"name": "Beijing"}]}"#).unwrap();
        assert_eq!(request.stops[0].transport_mode, "flight");
    }

    #[test]
    fn test_trip_response_wire_shape() {
        let response = TripResponse {
            trip_id: "manual_trip".to_string(),
            route: Route::default(),
        };
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["trip_id"], "manual_trip");
        assert!(value["route"].is_array());
    }
}
