//! Subscription Snapshot server binary.
//!
//! Loads configuration, connects to PostgreSQL, serves the report API and,
//! when enabled, runs the monthly email scheduler until SIGINT/SIGTERM.

use std::error::Error;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use subscription_snapshot::adapters::http::{app_router, ReportsAppState};
use subscription_snapshot::adapters::{
    MonthlyReportScheduler, OidcConfig, OidcSessionValidator, PostgresRecordSource,
    PostgresReportSettingsStore, ResendConfig, ResendMailer, TabularReportExporter,
};
use subscription_snapshot::application::handlers::reporting::{
    GenerateReportHandler, SendMonthlyReportHandler,
};
use subscription_snapshot::config::{AppConfig, ServerConfig};
use subscription_snapshot::ports::{RecordSource, ReportExporter, ReportSettingsStore};

type BoxError = Box<dyn Error + Send + Sync>;

fn init_tracing(server: &ServerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(server.log_level.as_str()));

    if server.is_production() {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}

async fn wait_for_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
            (Ok(mut sigterm), Ok(mut sigint)) => {
                tokio::select! {
                    _ = sigterm.recv() => {}
                    _ = sigint.recv() => {}
                }
            }
            _ => {
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let config = AppConfig::load()?;
    init_tracing(&config.server);
    config.validate()?;

    let pool = config
        .database
        .pool_options()
        .connect(&config.database.url)
        .await?;
    if config.database.run_migrations {
        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Database migrations applied");
    }

    let settings_store = Arc::new(PostgresReportSettingsStore::new(pool.clone()));
    if let Some(raw) = config.report.seed_recipient() {
        settings_store.seed_recipient(raw).await?;
    }

    let report_settings = config.report.settings()?;
    let record_source: Arc<dyn RecordSource> = Arc::new(PostgresRecordSource::new(pool));
    let settings_store: Arc<dyn ReportSettingsStore> = settings_store;
    let exporter: Arc<dyn ReportExporter> = Arc::new(TabularReportExporter::new());

    let validator = OidcSessionValidator::new(
        OidcConfig::new(&config.auth.issuer_url, &config.auth.audience)
            .with_cache_duration(config.auth.jwks_cache_ttl())
            .with_capability_claim(&config.auth.capability_claim),
    )?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let scheduler_task = if config.report.schedule_enabled {
        let api_key = config
            .email
            .resend_api_key
            .clone()
            .ok_or("email.resend_api_key is required for scheduled delivery")?;
        let mailer = ResendMailer::new(
            ResendConfig::new(api_key, config.email.from_header())
                .with_base_url(&config.email.api_base_url),
        );
        let handler = SendMonthlyReportHandler::new(
            settings_store.clone(),
            Arc::new(GenerateReportHandler::new(record_source.clone(), report_settings)),
            exporter.clone(),
            Arc::new(mailer),
        );
        let scheduler = MonthlyReportScheduler::new(Arc::new(handler), report_settings.timezone);
        Some(tokio::spawn(async move { scheduler.run(shutdown_rx).await }))
    } else {
        tracing::info!("Scheduled report delivery disabled");
        None
    };

    let state = ReportsAppState::new(record_source, settings_store, exporter, report_settings);
    let app = app_router(state, Arc::new(validator), config.server.request_timeout());

    let addr = config.server.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Subscription snapshot server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(wait_for_shutdown_signal())
        .await?;

    let _ = shutdown_tx.send(true);
    if let Some(task) = scheduler_task {
        if let Err(e) = task.await {
            tracing::error!(error = %e, "Scheduler task ended abnormally");
        }
    }
    tracing::info!("Shutdown complete");
    Ok(())
}
