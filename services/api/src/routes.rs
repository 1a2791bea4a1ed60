use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Extension;
use axum::Json;
use chrono::{DateTime, Utc};
use hr_admin::error::AppError;
use hr_admin::records::{GroceryItem, TimestampField};
use hr_admin::reports::export::{export_file_name, fleet_report_csv, with_bom};
use hr_admin::reports::fleet::FleetDataset;
use hr_admin::reports::talent::{validate_trend_months, TalentDataset, TalentReport};
use hr_admin::reports::{group_groceries_by_month, DateRangeSelector, ReportFilterSpec};
use hr_admin::workflows::approvals::{approval_router, ApprovalRepository, ApprovalService};
use hr_admin::workflows::forms::{form_router, FormSubmissionService, SubmissionRepository};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct FleetReportRequest {
    #[serde(flatten)]
    pub(crate) dataset: FleetDataset,
    #[serde(default)]
    pub(crate) vehicle_id: Option<String>,
    #[serde(default)]
    pub(crate) date_range: Option<DateRangeSelector>,
    #[serde(default)]
    pub(crate) now: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TalentReportRequest {
    #[serde(flatten)]
    pub(crate) dataset: TalentDataset,
    #[serde(default)]
    pub(crate) job_posting_id: Option<String>,
    #[serde(default)]
    pub(crate) trend_months: Option<u32>,
    #[serde(default)]
    pub(crate) now: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GroceryGroupingRequest {
    #[serde(default)]
    pub(crate) items: Vec<GroceryItem>,
    #[serde(default)]
    pub(crate) group_by: TimestampField,
}

pub(crate) fn app_router<S, A>(
    forms: Arc<FormSubmissionService<S>>,
    approvals: Arc<ApprovalService<A>>,
) -> axum::Router
where
    S: SubmissionRepository + 'static,
    A: ApprovalRepository + 'static,
{
    form_router(forms)
        .merge(approval_router(approvals))
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/reports/vehicles", post(fleet_report_endpoint))
        .route(
            "/api/v1/reports/vehicles/export",
            post(fleet_export_endpoint),
        )
        .route(
            "/api/v1/reports/talent-acquisition",
            post(talent_report_endpoint),
        )
        .route("/api/v1/groceries/by-month", post(grocery_months_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

fn fleet_filter(state: &AppState, request: &FleetReportRequest) -> ReportFilterSpec {
    ReportFilterSpec::new(
        request.vehicle_id.clone(),
        request.date_range.unwrap_or(state.reports.default_range),
    )
}

pub(crate) async fn fleet_report_endpoint(
    Extension(state): Extension<AppState>,
    Json(request): Json<FleetReportRequest>,
) -> Response {
    let filter = fleet_filter(&state, &request);
    let now = request.now.unwrap_or_else(Utc::now);
    let report = request.dataset.report(&filter, now);
    (StatusCode::OK, Json(report)).into_response()
}

pub(crate) async fn fleet_export_endpoint(
    Extension(state): Extension<AppState>,
    Json(request): Json<FleetReportRequest>,
) -> Result<Response, AppError> {
    let filter = fleet_filter(&state, &request);
    let now = request.now.unwrap_or_else(Utc::now);
    let report = request.dataset.report(&filter, now);
    let csv = fleet_report_csv(&report)?;

    let disposition = format!(
        "attachment; filename=\"{}\"",
        export_file_name(now.date_naive())
    );
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        with_bom(&csv),
    )
        .into_response())
}

pub(crate) async fn talent_report_endpoint(
    Extension(state): Extension<AppState>,
    Json(request): Json<TalentReportRequest>,
) -> Result<Json<TalentReport>, AppError> {
    let now = request.now.unwrap_or_else(Utc::now);
    let months = match request.trend_months {
        Some(months) => validate_trend_months(months)?,
        None => state.reports.trend_months,
    };
    Ok(Json(request.dataset.report(
        request.job_posting_id.as_deref(),
        now,
        months,
    )))
}

pub(crate) async fn grocery_months_endpoint(
    Json(request): Json<GroceryGroupingRequest>,
) -> Response {
    let grouping = group_groceries_by_month(&request.items, request.group_by);
    (StatusCode::OK, Json(grouping)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::{InMemoryApprovalRepository, InMemorySubmissionRepository};
    use axum::body::Body;
    use axum::http::Request;
    use hr_admin::config::ReportConfig;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use serde_json::Value;
    use std::sync::atomic::AtomicBool;
    use tower::ServiceExt;

    fn state(ready: bool) -> AppState {
        let recorder = PrometheusBuilder::new().build_recorder();
        AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(recorder.handle()),
            reports: ReportConfig::default(),
        }
    }

    fn router(ready: bool) -> axum::Router {
        let forms = Arc::new(FormSubmissionService::new(Arc::new(
            InMemorySubmissionRepository::default(),
        )));
        let approvals = Arc::new(ApprovalService::new(Arc::new(
            InMemoryApprovalRepository::default(),
        )));
        app_router(forms, approvals).layer(Extension(state(ready)))
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request builds")
    }

    async fn body_bytes(response: Response) -> Vec<u8> {
        axum::body::to_bytes(response.into_body(), 256 * 1024)
            .await
            .expect("read body")
            .to_vec()
    }

    fn fleet_body() -> Value {
        json!({
            "now": "2024-06-30T12:00:00Z",
            "vehicleId": "veh-1",
            "dateRange": 30,
            "vehicles": [{ "_id": "veh-1", "make": "Toyota", "model": "Hilux", "licensePlate": "LEA-1" }],
            "maintenance": [
                { "vehicleId": "veh-1", "serviceDate": "2024-06-27", "cost": 100 },
                { "vehicleId": "veh-1", "serviceDate": "2024-05-21", "cost": 200 }
            ],
            "logBook": []
        })
    }

    #[tokio::test]
    async fn readiness_reflects_flag() {
        let response = router(false)
            .oneshot(Request::get("/ready").body(Body::empty()).expect("request"))
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let response = router(true)
            .oneshot(Request::get("/health").body(Body::empty()).expect("request"))
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn fleet_report_route_filters_by_vehicle_and_window() {
        let response = router(true)
            .oneshot(post_json("/api/v1/reports/vehicles", fleet_body()))
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::OK);
        let payload: Value = serde_json::from_slice(&body_bytes(response).await).expect("json");
        assert_eq!(payload["vehicle_display_name"], json!("Toyota Hilux (LEA-1)"));
        assert_eq!(payload["maintenance_frequency"], json!(1));
        assert_eq!(payload["total_maintenance_cost"], json!("100"));
        assert_eq!(payload["date_range"], json!(30));
    }

    #[tokio::test]
    async fn fleet_export_route_returns_csv_with_bom() {
        let response = router(true)
            .oneshot(post_json("/api/v1/reports/vehicles/export", fleet_body()))
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/csv; charset=utf-8"
        );
        assert!(response.headers()[header::CONTENT_DISPOSITION]
            .to_str()
            .unwrap_or_default()
            .contains("vehicle-reports-2024-06-30.csv"));

        let bytes = body_bytes(response).await;
        assert!(bytes.starts_with(&[0xEF, 0xBB, 0xBF]));
        let text = String::from_utf8(bytes).expect("utf-8");
        assert!(text.contains("SUMMARY METRICS\nTotal Maintenance Cost,100\n"));
    }

    #[tokio::test]
    async fn talent_route_uses_configured_trend_window() {
        let response = router(true)
            .oneshot(post_json(
                "/api/v1/reports/talent-acquisition",
                json!({
                    "now": "2024-03-15T00:00:00Z",
                    "applications": [{ "status": "hired", "createdAt": "2024-03-01", "updatedAt": "2024-03-10" }],
                    "candidates": [],
                    "jobPostings": []
                }),
            ))
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::OK);
        let payload: Value = serde_json::from_slice(&body_bytes(response).await).expect("json");
        assert_eq!(payload["monthly_trends"].as_array().map(Vec::len), Some(6));
        assert_eq!(payload["hires_last_30_days"], json!(1));
        assert_eq!(payload["conversion_rate"], json!("100"));
    }

    #[tokio::test]
    async fn talent_route_rejects_out_of_range_trend_window() {
        for months in [0_u64, 25, 4_000_000_000] {
            let response = router(true)
                .oneshot(post_json(
                    "/api/v1/reports/talent-acquisition",
                    json!({ "now": "2024-03-15T00:00:00Z", "trendMonths": months }),
                ))
                .await
                .expect("route executes");

            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "trendMonths={months}");
            let payload: Value =
                serde_json::from_slice(&body_bytes(response).await).expect("json");
            assert!(payload["error"]
                .as_str()
                .unwrap_or_default()
                .contains("trend window"));
        }
    }

    #[tokio::test]
    async fn grocery_route_groups_newest_month_first() {
        let response = router(true)
            .oneshot(post_json(
                "/api/v1/groceries/by-month",
                json!({
                    "items": [
                        { "name": "rice", "createdAt": "2024-01-15" },
                        { "name": "flour", "createdAt": "2024-03-02" },
                        { "name": "sugar", "createdAt": "2024-01-20" },
                        { "name": "salt" }
                    ]
                }),
            ))
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::OK);
        let payload: Value = serde_json::from_slice(&body_bytes(response).await).expect("json");
        assert_eq!(payload["groups"][0]["key"], json!("2024-03"));
        assert_eq!(payload["groups"][1]["label"], json!("January 2024"));
        assert_eq!(payload["groups"][1]["items"][1]["name"], json!("sugar"));
        assert_eq!(payload["undated"][0]["name"], json!("salt"));
    }

    #[tokio::test]
    async fn form_and_approval_routes_are_mounted() {
        let app = router(true);
        let response = app
            .clone()
            .oneshot(post_json(
                "/api/v1/forms/application/steps/0/check",
                json!({ "jobPosting": "job-1", "candidate": "cand-1" }),
            ))
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(
                Request::get("/api/v1/approvals/apr-000404")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
