use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryApprovalRepository, InMemorySubmissionRepository};
use crate::routes::app_router;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use hr_admin::config::AppConfig;
use hr_admin::error::AppError;
use hr_admin::telemetry;
use hr_admin::workflows::approvals::ApprovalService;
use hr_admin::workflows::forms::FormSubmissionService;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        reports: config.reports.clone(),
    };

    let forms = Arc::new(FormSubmissionService::new(Arc::new(
        InMemorySubmissionRepository::default(),
    )));
    let approvals = Arc::new(ApprovalService::new(Arc::new(
        InMemoryApprovalRepository::default(),
    )));

    let app = app_router(forms, approvals)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        default_range = %config.reports.default_range,
        "hr admin service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
