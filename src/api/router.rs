//! API router.
//!
//! Returns a composable `Router` that can be mounted on any axum server.
//! Routes are nested under `/api/` and served CORS-open, like the edge
//! functions this service replaces.

use axum::routing::{get, post, put};
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::api::endpoints;
use crate::api::types::ApiContext;

/// Build the API router.
pub fn api_router(ctx: ApiContext) -> Router {
    let api = Router::new()
        .route("/health", get(endpoints::health::check))
        .route("/detect", post(endpoints::detect::detect))
        .route(
            "/scans",
            post(endpoints::scans::submit).get(endpoints::scans::list),
        )
        .route("/analytics", get(endpoints::analytics::dashboard))
        .route("/patients", get(endpoints::patients::list))
        .route("/patients/history", get(endpoints::patients::history))
        .route("/patients/status", put(endpoints::patients::set_status))
        .route("/notify", post(endpoints::notifications::send))
        .route(
            "/settings/notifications/:user_id",
            get(endpoints::settings::get).put(endpoints::settings::put),
        )
        .with_state(ctx);

    Router::new().nest("/api", api).layer(CorsLayer::permissive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use crate::db::open_memory_database;
    use crate::detection::{Detector, SimulatedClassifier};
    use crate::notify::{LogMailer, Mailer, NotifyError};

    /// Mailer that records (to, subject) pairs for assertions.
    #[derive(Default)]
    struct RecordingMailer {
        sent: Mutex<Vec<(String, String)>>,
    }

    impl Mailer for RecordingMailer {
        fn send(&self, to: &str, subject: &str, _html: &str) -> Result<(), NotifyError> {
            self.sent
                .lock()
                .unwrap()
                .push((to.to_string(), subject.to_string()));
            Ok(())
        }
    }

    fn test_ctx_with_mailer(mailer: Arc<dyn Mailer>) -> ApiContext {
        let detector = Detector::new(
            Arc::new(SimulatedClassifier::new()),
            Duration::from_secs(5),
        )
        .without_probe();
        ApiContext::new(open_memory_database().unwrap(), detector, mailer)
    }

    fn test_router() -> Router {
        api_router(test_ctx_with_mailer(Arc::new(LogMailer)))
    }

    fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), 1 << 20).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn unknown_route_returns_404() {
        let response = test_router()
            .oneshot(get_request("/nonexistent"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let response = test_router()
            .oneshot(get_request("/api/health"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["version"], crate::config::APP_VERSION);
    }

    #[tokio::test]
    async fn detect_requires_image_url() {
        let response = test_router()
            .oneshot(json_request("POST", "/api/detect", serde_json::json!({})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "VALIDATION");
        assert_eq!(json["error"]["message"], "Image URL is required");
    }

    #[tokio::test]
    async fn detect_rejects_malformed_url() {
        let response = test_router()
            .oneshot(json_request(
                "POST",
                "/api/detect",
                serde_json::json!({"imageUrl": "not a url"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn detect_is_deterministic_across_calls() {
        let router = test_router();
        let body = serde_json::json!({"imageUrl": "https://x/img1.png"});

        let first = router
            .clone()
            .oneshot(json_request("POST", "/api/detect", body.clone()))
            .await
            .unwrap();
        assert_eq!(first.status(), StatusCode::OK);
        let first = body_json(first).await;

        let second = router
            .oneshot(json_request("POST", "/api/detect", body))
            .await
            .unwrap();
        let second = body_json(second).await;

        assert_eq!(first["result"], second["result"]);
        assert_eq!(first["confidence"], second["confidence"]);
        assert_eq!(first["message"], second["message"]);
        assert_eq!(first["modelUsed"], "AI Analysis");
        assert!(first["processingTime"].is_number());
    }

    #[tokio::test]
    async fn submit_scan_persists_and_lists() {
        let router = test_router();

        let response = router
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/scans",
                serde_json::json!({
                    "patientName": "Ana Flores",
                    "patientAge": 67,
                    "imageUrl": "https://x/eye-1.png",
                    "notes": "left eye"
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let stored = body_json(response).await;
        assert_eq!(stored["patientName"], "Ana Flores");
        assert!(stored["confidence"].as_f64().unwrap() <= 1.0);

        let response = router.oneshot(get_request("/api/scans")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let scans = body_json(response).await;
        assert_eq!(scans.as_array().unwrap().len(), 1);
        assert_eq!(scans[0]["id"], stored["id"]);
    }

    #[tokio::test]
    async fn submit_scan_validates_patient_fields() {
        let router = test_router();

        let response = router
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/scans",
                serde_json::json!({
                    "patientName": "",
                    "patientAge": 67,
                    "imageUrl": "https://x/eye.png"
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = router
            .oneshot(json_request(
                "POST",
                "/api/scans",
                serde_json::json!({
                    "patientName": "Ana",
                    "patientAge": 130,
                    "imageUrl": "https://x/eye.png"
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn submit_scan_fires_notification_when_enabled() {
        let mailer = Arc::new(RecordingMailer::default());
        let router = api_router(test_ctx_with_mailer(mailer.clone()));

        let response = router
            .oneshot(json_request(
                "POST",
                "/api/scans",
                serde_json::json!({
                    "patientName": "Ana",
                    "patientAge": 67,
                    "imageUrl": "https://x/eye.png",
                    "notifyEmail": "doc@clinic.org"
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let sent = mailer.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "doc@clinic.org");
        assert_eq!(sent[0].1, "Cataract Analysis Complete - Ana");
    }

    #[tokio::test]
    async fn submit_scan_skips_notification_when_disabled() {
        let mailer = Arc::new(RecordingMailer::default());
        let router = api_router(test_ctx_with_mailer(mailer.clone()));

        // Disable email notifications for this user first
        let response = router
            .clone()
            .oneshot(json_request(
                "PUT",
                "/api/settings/notifications/doc@clinic.org",
                serde_json::json!({
                    "emailNotifications": false,
                    "reportNotifications": true
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = router
            .oneshot(json_request(
                "POST",
                "/api/scans",
                serde_json::json!({
                    "patientName": "Ana",
                    "patientAge": 67,
                    "imageUrl": "https://x/eye.png",
                    "notifyEmail": "doc@clinic.org"
                }),
            ))
            .await
            .unwrap();
        // Save still succeeds; only the notification is suppressed
        assert_eq!(response.status(), StatusCode::CREATED);
        assert!(mailer.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn analytics_on_empty_log_is_all_zero() {
        let response = test_router()
            .oneshot(get_request("/api/analytics"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["totalScans"], 0);
        assert_eq!(json["successRate"], 0.0);
        assert_eq!(json["monthlyTrend"].as_array().unwrap().len(), 0);
        assert_eq!(json["recentActivity"].as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn analytics_counts_submitted_scans() {
        let router = test_router();
        for i in 0..3 {
            let response = router
                .clone()
                .oneshot(json_request(
                    "POST",
                    "/api/scans",
                    serde_json::json!({
                        "patientName": format!("Patient {i}"),
                        "patientAge": 60 + i,
                        "imageUrl": format!("https://x/eye-{i}.png")
                    }),
                ))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::CREATED);
        }

        let response = router.oneshot(get_request("/api/analytics")).await.unwrap();
        let json = body_json(response).await;
        assert_eq!(json["totalScans"], 3);
        let partition = json["positiveCases"].as_u64().unwrap()
            + json["negativeCases"].as_u64().unwrap()
            + json["uncertainCases"].as_u64().unwrap();
        assert_eq!(partition, 3);
        assert_eq!(json["recentActivity"].as_array().unwrap().len(), 3);
        assert_eq!(json["monthlyTrend"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn patients_derive_group_and_status() {
        let router = test_router();
        for url in ["https://x/a.png", "https://x/b.png"] {
            router
                .clone()
                .oneshot(json_request(
                    "POST",
                    "/api/scans",
                    serde_json::json!({
                        "patientName": "Ana",
                        "patientAge": 67,
                        "imageUrl": url
                    }),
                ))
                .await
                .unwrap();
        }

        let response = router
            .clone()
            .oneshot(get_request("/api/patients"))
            .await
            .unwrap();
        let patients = body_json(response).await;
        assert_eq!(patients.as_array().unwrap().len(), 1);
        assert_eq!(patients[0]["totalScans"], 2);
        assert_eq!(patients[0]["status"], "Active");

        let response = router
            .clone()
            .oneshot(json_request(
                "PUT",
                "/api/patients/status",
                serde_json::json!({
                    "patientName": "Ana",
                    "patientAge": 67,
                    "status": "Inactive"
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = router
            .clone()
            .oneshot(get_request("/api/patients"))
            .await
            .unwrap();
        let patients = body_json(response).await;
        assert_eq!(patients[0]["status"], "Inactive");

        // Search filter
        let response = router
            .clone()
            .oneshot(get_request("/api/patients?q=an"))
            .await
            .unwrap();
        assert_eq!(body_json(response).await.as_array().unwrap().len(), 1);
        let response = router
            .oneshot(get_request("/api/patients?q=zzz"))
            .await
            .unwrap();
        assert!(body_json(response).await.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn patient_history_filters_by_name_and_age() {
        let router = test_router();
        for (name, age) in [("Ana", 67), ("Ana", 67), ("Ben", 44)] {
            router
                .clone()
                .oneshot(json_request(
                    "POST",
                    "/api/scans",
                    serde_json::json!({
                        "patientName": name,
                        "patientAge": age,
                        "imageUrl": "https://x/eye.png"
                    }),
                ))
                .await
                .unwrap();
        }

        let response = router
            .oneshot(get_request("/api/patients/history?name=Ana&age=67"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let history = body_json(response).await;
        assert_eq!(history.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn notify_validates_and_sends() {
        let mailer = Arc::new(RecordingMailer::default());
        let router = api_router(test_ctx_with_mailer(mailer.clone()));

        // Missing fields
        let response = router
            .clone()
            .oneshot(json_request("POST", "/api/notify", serde_json::json!({})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        // Bad address
        let response = router
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/notify",
                serde_json::json!({
                    "to": "not-an-email",
                    "subject": "s",
                    "message": "m"
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"]["message"], "Invalid email address");

        // Valid
        let response = router
            .oneshot(json_request(
                "POST",
                "/api/notify",
                serde_json::json!({
                    "to": "doc@clinic.org",
                    "subject": "Report Generated - June",
                    "message": "Your report is ready.",
                    "type": "report"
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["success"], true);
        assert_eq!(json["type"], "report");
        assert_eq!(mailer.sent.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn settings_round_trip_with_defaults() {
        let router = test_router();

        let response = router
            .clone()
            .oneshot(get_request("/api/settings/notifications/u1"))
            .await
            .unwrap();
        let json = body_json(response).await;
        assert_eq!(json["emailNotifications"], true);
        assert_eq!(json["reportNotifications"], true);

        let response = router
            .clone()
            .oneshot(json_request(
                "PUT",
                "/api/settings/notifications/u1",
                serde_json::json!({
                    "emailNotifications": false,
                    "reportNotifications": true
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = router
            .oneshot(get_request("/api/settings/notifications/u1"))
            .await
            .unwrap();
        let json = body_json(response).await;
        assert_eq!(json["emailNotifications"], false);
        assert_eq!(json["reportNotifications"], true);
    }
}
