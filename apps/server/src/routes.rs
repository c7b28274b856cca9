use crate::error::ApiError;
use crate::model::RadarRecord;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::cors::CorsLayer;

pub type SharedRecord = Arc<Mutex<RadarRecord>>;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResponse {
    pub status: &'static str,
    pub radar_state: RadarRecord,
}

pub fn router(record: SharedRecord) -> Router {
    Router::new()
        .route("/data", get(get_data))
        .route("/update", post(post_update))
        .layer(CorsLayer::permissive())
        .with_state(record)
}

pub async fn get_data(State(record): State<SharedRecord>) -> Json<RadarRecord> {
    let snapshot = record.lock().await.snapshot();
    Json(snapshot)
}

pub async fn post_update(
    State(record): State<SharedRecord>,
    Json(updates): Json<Map<String, Value>>,
) -> Result<Json<UpdateResponse>, ApiError> {
    let keys = updates.keys().cloned().collect::<Vec<_>>();
    let radar_state = record.lock().await.apply_update(&updates)?;
    tracing::info!(?keys, "radar record updated");

    Ok(Json(UpdateResponse {
        status: "ok",
        radar_state,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CoupletTrend;
    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use axum::response::{IntoResponse, Response};
    use tower::ServiceExt;
    use serde_json::json;

    fn shared() -> SharedRecord {
        Arc::new(Mutex::new(RadarRecord::default()))
    }

    fn body(value: Value) -> Json<Map<String, Value>> {
        match value {
            Value::Object(map) => Json(map),
            other => panic!("expected an object, got {other}"),
        }
    }

    #[tokio::test]
    async fn data_returns_recalculated_record() {
        let Json(record) = get_data(State(shared())).await;

        assert!((record.derived.inbound_velocity - 95.0).abs() < 1e-9);
        assert_eq!(record.derived.velocity_couplet, CoupletTrend::Strengthening);
    }

    #[tokio::test]
    async fn update_then_read_reflects_new_velocity() -> Result<(), Box<dyn std::error::Error>> {
        let state = shared();

        let Json(response) =
            post_update(State(state.clone()), body(json!({ "trueVelocity": 200 }))).await?;
        assert_eq!(response.status, "ok");

        let Json(record) = get_data(State(state)).await;
        assert!((record.derived.reflectivity - 70.0).abs() < 1e-9);
        assert!(record.derived.high_reflectivity_core);
        assert!(record.derived.possible_hail_core);
        Ok(())
    }

    #[tokio::test]
    async fn unknown_field_leaves_record_unchanged() -> Result<(), Box<dyn std::error::Error>> {
        let state = shared();
        let Json(before) = get_data(State(state.clone())).await;

        let Json(response) =
            post_update(State(state.clone()), body(json!({ "unknownField": 1 }))).await?;

        assert_eq!(response.radar_state, before);
        let json = serde_json::to_value(&response)?;
        assert_eq!(json["status"], "ok");
        assert!(json["radarState"].get("unknownField").is_none());
        Ok(())
    }

    #[tokio::test]
    async fn type_mismatch_is_bad_request() -> Result<(), Box<dyn std::error::Error>> {
        let state = shared();

        let result = post_update(
            State(state.clone()),
            body(json!({ "trueVelocity": 150, "envAlerts": false })),
        )
        .await;
        let response = match result {
            Ok(_) => panic!("update should have been rejected"),
            Err(error) => error.into_response(),
        };
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
        let json: Value = serde_json::from_slice(&bytes)?;
        assert_eq!(json["status"], "error");
        assert_eq!(json["field"], "envAlerts");

        let Json(record) = get_data(State(state)).await;
        assert!((record.base.true_velocity - 100.0).abs() < f64::EPSILON);
        Ok(())
    }

    async fn send(request: Request<Body>) -> Result<Response, Box<dyn std::error::Error>> {
        Ok(router(shared()).oneshot(request).await?)
    }

    #[tokio::test]
    async fn data_route_allows_any_origin() -> Result<(), Box<dyn std::error::Error>> {
        let response = send(
            Request::builder()
                .uri("/data")
                .header(header::ORIGIN, "http://radar.example")
                .body(Body::empty())?,
        )
        .await?;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response
                .headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .map(|value| value.as_bytes()),
            Some(&b"*"[..])
        );
        Ok(())
    }

    #[tokio::test]
    async fn update_route_rejects_non_object_body() -> Result<(), Box<dyn std::error::Error>> {
        let response = send(
            Request::builder()
                .method(Method::POST)
                .uri("/update")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("[1,2]"))?,
        )
        .await?;

        assert!(response.status().is_client_error(), "got {}", response.status());
        Ok(())
    }

    #[tokio::test]
    async fn update_route_applies_json_object() -> Result<(), Box<dyn std::error::Error>> {
        let response = send(
            Request::builder()
                .method(Method::POST)
                .uri("/update")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"trueVelocity":200}"#))?,
        )
        .await?;
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
        let json: Value = serde_json::from_slice(&bytes)?;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["radarState"]["reflectivity"], 70.0);
        Ok(())
    }
}
