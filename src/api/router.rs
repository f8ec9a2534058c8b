//! Dashboard router.
//!
//! Mounts the embedded page at `/` and the JSON API under `/api/`.
//! Chart routes carry `Cache-Control: no-store` — every control change
//! recomputes its view from the full table, and the header states that
//! contract to clients.

use axum::http::header::{HeaderValue, CACHE_CONTROL};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::set_header::SetResponseHeaderLayer;

use crate::api::endpoints;
use crate::api::page;
use crate::api::types::ApiContext;

/// Build the dashboard router with all routes mounted.
pub fn dashboard_router(ctx: ApiContext) -> Router {
    let charts = Router::new()
        .route("/age-distribution", get(endpoints::charts::age_distribution))
        .route("/condition-share", get(endpoints::charts::condition_share))
        .route("/insurance-billing", get(endpoints::charts::insurance_billing))
        .route(
            "/billing-distribution",
            get(endpoints::charts::billing_distribution),
        )
        .route("/admission-trends", get(endpoints::charts::admission_trends))
        .layer(SetResponseHeaderLayer::overriding(
            CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ));

    let api = Router::new()
        .route("/health", get(endpoints::health::check))
        .route("/meta", get(endpoints::meta::describe))
        .nest("/charts", charts)
        .route("/upload", post(endpoints::upload::accept))
        .layer(CorsLayer::permissive());

    Router::new()
        .route("/", get(page::dashboard))
        .nest("/api", api)
        .with_state(ctx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use crate::dataset::{Dataset, Encounter, YearMonth};

    fn test_dataset() -> Arc<Dataset> {
        let row = |gender: &str, age, condition: &str, billing, (y, m, d), provider: &str| {
            let date = chrono::NaiveDate::from_ymd_opt(y, m, d).unwrap();
            Encounter {
                gender: gender.to_string(),
                age,
                condition: condition.to_string(),
                billing_amount: billing,
                admission_date: date,
                insurance_provider: provider.to_string(),
                admission_month: YearMonth::of(date),
            }
        };
        Arc::new(Dataset::new(vec![
            row("Male", 40, "Flu", 100.0, (2023, 1, 10), "Aetna"),
            row("Female", 30, "Flu", 200.0, (2023, 1, 20), "Cigna"),
            row("Male", 50, "Cold", 300.0, (2023, 2, 5), "Aetna"),
        ]))
    }

    fn test_app() -> (Router, tempfile::TempDir) {
        let uploads = tempfile::tempdir().unwrap();
        let ctx = ApiContext::new(test_dataset(), uploads.path().to_path_buf());
        (dashboard_router(ctx), uploads)
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    fn post_json(uri: &str, body: &serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn response_json(response: axum::http::Response<Body>) -> serde_json::Value {
        let body = axum::body::to_bytes(response.into_body(), 1 << 20).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn root_serves_dashboard_page() {
        let (app, _uploads) = test_app();
        let response = app.oneshot(get_request("/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), 1 << 20).await.unwrap();
        let html = String::from_utf8(body.to_vec()).unwrap();
        assert!(html.contains("<!DOCTYPE html>"));
        assert!(html.contains("Wardview"));
    }

    #[tokio::test]
    async fn health_response_shape() {
        let (app, _uploads) = test_app();
        let response = app.oneshot(get_request("/api/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = response_json(response).await;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["rows"], 3);
        assert!(!json["version"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn meta_response_shape() {
        let (app, _uploads) = test_app();
        let response = app.oneshot(get_request("/api/meta")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = response_json(response).await;
        assert_eq!(json["genders"], serde_json::json!(["Female", "Male"]));
        assert_eq!(json["conditions"], serde_json::json!(["Cold", "Flu"]));
        assert_eq!(json["billing"]["min"], 100.0);
        assert_eq!(json["billing"]["median"], 200.0);
        assert_eq!(json["billing"]["max"], 300.0);
        assert_eq!(json["rows"], 3);
    }

    #[tokio::test]
    async fn age_distribution_filters_by_gender() {
        let (app, _uploads) = test_app();
        let response = app
            .oneshot(get_request("/api/charts/age-distribution?gender=Male"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = response_json(response).await;
        assert_eq!(json["data"].as_array().unwrap().len(), 1);
        assert_eq!(json["data"][0]["name"], "Male");
        assert_eq!(json["data"][0]["x"], serde_json::json!([40, 50]));
    }

    #[tokio::test]
    async fn age_distribution_empty_filter_renders_empty_figure() {
        let (app, _uploads) = test_app();
        let response = app
            .oneshot(get_request("/api/charts/age-distribution?gender=Unknown"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = response_json(response).await;
        assert!(json["data"].as_array().unwrap().is_empty());
        assert_eq!(json["layout"]["annotations"][0]["text"], "No matching records");
    }

    #[tokio::test]
    async fn chart_routes_are_not_cached() {
        let (app, _uploads) = test_app();
        let response = app
            .oneshot(get_request("/api/charts/condition-share"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers().get("Cache-Control").unwrap(), "no-store");
    }

    #[tokio::test]
    async fn condition_share_without_selection_counts_everything() {
        let (app, _uploads) = test_app();
        let response = app
            .oneshot(get_request("/api/charts/condition-share"))
            .await
            .unwrap();
        let json = response_json(response).await;
        assert_eq!(json["data"][0]["type"], "pie");
        assert_eq!(json["data"][0]["labels"], serde_json::json!(["Cold", "Flu"]));
        assert_eq!(json["data"][0]["values"], serde_json::json!([1, 2]));
    }

    #[tokio::test]
    async fn insurance_billing_groups_bars() {
        let (app, _uploads) = test_app();
        let response = app
            .oneshot(get_request("/api/charts/insurance-billing"))
            .await
            .unwrap();
        let json = response_json(response).await;
        assert_eq!(json["layout"]["barmode"], "group");
        // One trace per condition present in the table.
        assert_eq!(json["data"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn billing_distribution_defaults_ceiling_to_median() {
        let (app, _uploads) = test_app();
        let response = app
            .oneshot(get_request("/api/charts/billing-distribution"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        // Median ceiling (200) keeps two of the three rows.
        let json = response_json(response).await;
        let counts: u64 = json["data"][0]["y"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_u64().unwrap())
            .sum();
        assert_eq!(counts, 2);
    }

    #[tokio::test]
    async fn billing_distribution_rejects_malformed_ceiling() {
        let (app, _uploads) = test_app();
        let response = app
            .oneshot(get_request("/api/charts/billing-distribution?ceiling=high"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = response_json(response).await;
        assert_eq!(json["error"]["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn admission_trends_defaults_to_line() {
        let (app, _uploads) = test_app();
        let response = app
            .oneshot(get_request("/api/charts/admission-trends"))
            .await
            .unwrap();
        let json = response_json(response).await;
        assert_eq!(json["data"][0]["type"], "scatter");
        assert_eq!(json["data"][0]["x"], serde_json::json!(["2023-01", "2023-02"]));
        assert_eq!(json["data"][0]["y"], serde_json::json!([2, 1]));
    }

    #[tokio::test]
    async fn admission_trends_bar_kind_and_condition_filter() {
        let (app, _uploads) = test_app();
        let response = app
            .oneshot(get_request("/api/charts/admission-trends?condition=Flu&kind=bar"))
            .await
            .unwrap();
        let json = response_json(response).await;
        assert_eq!(json["data"][0]["type"], "bar");
        assert_eq!(json["data"][0]["x"], serde_json::json!(["2023-01"]));
    }

    #[tokio::test]
    async fn admission_trends_rejects_unknown_kind() {
        let (app, _uploads) = test_app();
        let response = app
            .oneshot(get_request("/api/charts/admission-trends?kind=pie"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn upload_persists_blob_verbatim() {
        let (app, uploads) = test_app();
        let body = serde_json::json!({
            "filename": "a.csv",
            "contents": "data:text/csv;base64,Y29sCjEK"
        });
        let response = app.oneshot(post_json("/api/upload", &body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = response_json(response).await;
        assert_eq!(json["stored_name"], "a.csv");
        assert_eq!(json["size_bytes"], 6);
        assert_eq!(
            std::fs::read(uploads.path().join("a.csv")).unwrap(),
            b"col\n1\n"
        );
    }

    #[tokio::test]
    async fn upload_absent_contents_reports_no_file() {
        let (app, uploads) = test_app();
        let body = serde_json::json!({ "filename": null, "contents": null });
        let response = app.oneshot(post_json("/api/upload", &body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = response_json(response).await;
        assert_eq!(json["status"], "Nothing uploaded yet.");
        assert!(json["stored_name"].is_null());
        // No filesystem I/O happened.
        assert_eq!(std::fs::read_dir(uploads.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn upload_rejects_traversal_filename() {
        let (app, uploads) = test_app();
        let body = serde_json::json!({
            "filename": "../escape.csv",
            "contents": "data:text/csv;base64,Y29sCjEK"
        });
        let response = app.oneshot(post_json("/api/upload", &body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(std::fs::read_dir(uploads.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn upload_rejects_undecodable_payload() {
        let (app, _uploads) = test_app();
        let body = serde_json::json!({
            "filename": "a.csv",
            "contents": "data:text/csv;base64,not base64!!"
        });
        let response = app.oneshot(post_json("/api/upload", &body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn not_found_for_unknown_route() {
        let (app, _uploads) = test_app();
        let response = app.oneshot(get_request("/api/nonexistent")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn identical_requests_yield_identical_bodies() {
        let (app, _uploads) = test_app();
        let first = app
            .clone()
            .oneshot(get_request("/api/charts/admission-trends?condition=Flu"))
            .await
            .unwrap();
        let second = app
            .oneshot(get_request("/api/charts/admission-trends?condition=Flu"))
            .await
            .unwrap();
        let a = axum::body::to_bytes(first.into_body(), 1 << 20).await.unwrap();
        let b = axum::body::to_bytes(second.into_body(), 1 << 20).await.unwrap();
        assert_eq!(a, b);
    }
}
