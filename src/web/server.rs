use axum::{routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::WebConfig;
use crate::query::QueryService;

use super::api::devices as device_handlers;
use super::api_doc::ApiDoc;

#[derive(Clone)]
pub struct AppState {
    pub queries: QueryService,
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(
            "/latest-info/{device_id}",
            get(device_handlers::latest_info),
        )
        .route(
            "/start-end-locations/{device_id}",
            get(device_handlers::start_end_locations),
        )
        .route(
            "/location-points/{device_id}",
            get(device_handlers::location_points),
        )
        // OpenAPI / Swagger
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()))
        // Middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run_server(config: &WebConfig, queries: QueryService) -> std::io::Result<()> {
    let app = router(AppState { queries });

    log::info!("Starting server on {}", config.bind);

    let listener = tokio::net::TcpListener::bind(&config.bind).await?;
    axum::serve(listener, app).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    use crate::ingest::Aggregator;
    use crate::location::RawSample;
    use crate::store::{DeviceSummaryStore, FieldMap, KeyValueStore, MemoryStore, StoreError};

    struct UnreachableStore;

    #[async_trait]
    impl KeyValueStore for UnreachableStore {
        async fn put(&self, _key: &str, _fields: FieldMap) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("connection refused".into()))
        }

        async fn get_all_fields(&self, _key: &str) -> Result<Option<FieldMap>, StoreError> {
            Err(StoreError::Unavailable("connection refused".into()))
        }

        fn backend_name(&self) -> &str {
            "unreachable"
        }
    }

    fn sample(device_id: i64, lat: f64, lon: f64, ts: &str) -> RawSample {
        RawSample {
            device_id,
            latitude: lat,
            longitude: lon,
            timestamp: ts.to_string(),
        }
    }

    async fn app() -> Router {
        let store = DeviceSummaryStore::new(Arc::new(MemoryStore::new()), None);
        Aggregator::new(store.clone())
            .run(&[
                sample(1, 10.0, 20.0, "2023-01-01T00:00:00Z"),
                sample(1, 12.0, 22.0, "2023-01-01T01:00:00Z"),
            ])
            .await
            .unwrap();
        router(AppState {
            queries: QueryService::new(store),
        })
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn latest_info_returns_last_fix() {
        let (status, body) = get_json(app().await, "/latest-info/1").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "device_id": 1,
                "latitude": 12.0,
                "longitude": 22.0,
                "time_stamp": "2023-01-01 01:00:00"
            })
        );
    }

    #[tokio::test]
    async fn start_end_returns_nested_locations() {
        let (status, body) = get_json(app().await, "/start-end-locations/1").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "device_id": 1,
                "start_location": {"latitude": 10.0, "longitude": 20.0},
                "end_location": {"latitude": 12.0, "longitude": 22.0}
            })
        );
    }

    #[tokio::test]
    async fn location_points_filters_window() {
        let (status, body) = get_json(
            app().await,
            "/location-points/1?start_time=2023-01-01%2000:00:00&end_time=2023-01-01%2000:30:00",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "device_id": 1,
                "location_points": [
                    {"latitude": 10.0, "longitude": 20.0, "time_stamp": "2023-01-01 00:00:00"}
                ]
            })
        );
    }

    #[tokio::test]
    async fn inverted_window_is_empty_ok() {
        let (status, body) = get_json(
            app().await,
            "/location-points/1?start_time=2023-01-02+00:00:00&end_time=2023-01-01+00:00:00",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["location_points"], json!([]));
    }

    #[tokio::test]
    async fn unknown_device_is_404_on_every_route() {
        for uri in [
            "/latest-info/999",
            "/start-end-locations/999",
            "/location-points/999?start_time=2023-01-01%2000:00:00&end_time=2023-01-01%2001:00:00",
        ] {
            let (status, body) = get_json(app().await, uri).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
            assert_eq!(body["error"], "device_not_found");
            assert_eq!(body["message"], "device 999 not found");
        }
    }

    #[tokio::test]
    async fn malformed_or_missing_times_are_400() {
        for uri in [
            "/location-points/1?start_time=2023-01-01T00:00:00Z&end_time=2023-01-01%2001:00:00",
            "/location-points/1?start_time=2023-01-01%2000:00:00",
            "/location-points/1",
        ] {
            let (status, body) = get_json(app().await, uri).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
            assert_eq!(body["error"], "validation_failed");
            assert!(body["message"].as_str().unwrap().starts_with("invalid time range"));
        }
    }

    #[tokio::test]
    async fn unknown_device_is_404_whatever_the_times() {
        for uri in [
            "/location-points/999",
            "/location-points/999?start_time=2023-01-01%2000:00:00",
            "/location-points/999?start_time=noon&end_time=2023-01-01%2001:00:00",
        ] {
            let (status, body) = get_json(app().await, uri).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
            assert_eq!(body["error"], "device_not_found");
        }
    }

    #[tokio::test]
    async fn non_integer_device_id_is_400() {
        let (status, body) = get_json(app().await, "/latest-info/abc").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "validation_failed");
    }

    #[tokio::test]
    async fn unreachable_store_is_503() {
        let store = DeviceSummaryStore::new(Arc::new(UnreachableStore), None);
        let app = router(AppState {
            queries: QueryService::new(store),
        });

        let (status, body) = get_json(app, "/latest-info/1").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"], "store_unavailable");
        assert!(!body["message"]
            .as_str()
            .unwrap()
            .contains("connection refused"));
    }

    #[tokio::test]
    async fn serves_openapi_document() {
        let (status, body) = get_json(app().await, "/api-doc/openapi.json").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body["paths"]["/latest-info/{device_id}"].is_object());
        assert!(body["paths"]["/start-end-locations/{device_id}"].is_object());
        assert!(body["paths"]["/location-points/{device_id}"].is_object());
    }
}
