use axum::{
    response::IntoResponse,
    routing::{get, MethodRouter},
    Extension, Router,
};
use axum_prometheus::PrometheusMetricLayer;
use axum_server::tls_rustls::RustlsConfig;
use axum_test::{transport_layer::IntoTransportLayer, TestServer};
use sentry_tower::{NewSentryLayer, SentryHttpLayer};
use std::{
    env,
    net::{IpAddr, SocketAddr},
};
use tokio::net::TcpListener;
use tower_http::compression::CompressionLayer;
use tracing::info;
use tracing_subscriber::{
    filter::EnvFilter,
    fmt::{
        self,
        format::{Format, JsonFields},
    },
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

use crate::errors::AppError;

#[derive(Default)]
pub struct App {
    router: Router,
}

impl App {
    pub fn new() -> Self {
        dotenvy::dotenv().ok();
        logger();
        Self::default()
    }

    pub async fn start(self) -> anyhow::Result<()> {
        start(self.into_router()).await
    }

    pub fn router(self, router: Router) -> Self {
        Self {
            router: self.router.merge(router),
        }
    }

    /// Makes `t` available to the routes added so far through `Extension<T>`.
    pub fn inject<T: Clone + Send + Sync + 'static>(self, t: T) -> Self {
        Self {
            router: self.router.layer(Extension(t)),
        }
    }

    pub fn route(self, path: &str, method_router: MethodRouter<()>) -> Self {
        let mut app = self;
        app.router = app.router.route(path, method_router);
        app
    }

    pub fn as_test_server(self) -> anyhow::Result<TestServer> {
        TestServer::new(self)
    }

    /// Adds the service endpoints every app exposes and wraps all routes in
    /// the metrics layer.
    fn into_router(self) -> Router {
        let router = self
            .router
            .route("/status/liveness", get(|| async { "".into_response() }))
            .fallback(|| async { AppError::from(axum::http::StatusCode::NOT_FOUND) });
        prometheus(router)
    }
}

impl IntoTransportLayer for App {
    fn into_http_transport_layer(
        self,
        builder: axum_test::transport_layer::TransportLayerBuilder,
    ) -> anyhow::Result<Box<dyn axum_test::transport_layer::TransportLayer>> {
        self.into_router().into_http_transport_layer(builder)
    }

    fn into_mock_transport_layer(
        self,
    ) -> anyhow::Result<Box<dyn axum_test::transport_layer::TransportLayer>> {
        self.into_router().into_mock_transport_layer()
    }
}

async fn start(app: Router) -> anyhow::Result<()> {
    let _guard = sentry();
    let compression_layer: CompressionLayer = CompressionLayer::new()
        .br(true)
        .deflate(true)
        .gzip(true)
        .zstd(true);
    let app = app
        .layer(NewSentryLayer::new_from_top())
        .layer(SentryHttpLayer::with_transaction())
        .layer(compression_layer);

    let addr = bind_address()?;
    if env::var("TLS").is_ok() {
        let pem_cert = env::var("TLS_PEM_CERT")?;
        let pem_key = env::var("TLS_PEM_KEY")?;
        // sentry and axum-server can each pull in a provider, so pick one explicitly
        rustls::crypto::aws_lc_rs::default_provider()
            .install_default()
            .ok();
        info!("Starting server on {addr} with TLS ON");
        let tls_config = RustlsConfig::from_pem_file(pem_cert, pem_key).await?;
        axum_server::bind_rustls(addr, tls_config)
            .serve(app.into_make_service())
            .await?
    } else {
        info!("Starting server on {addr}");
        axum::serve(TcpListener::bind(addr).await?, app).await?;
    }
    Ok(())
}

/// Address from `SERVER_BIND` and `SERVER_PORT`, defaulting to `0.0.0.0:8080`.
pub(crate) fn bind_address() -> anyhow::Result<SocketAddr> {
    let bind = env::var("SERVER_BIND").unwrap_or("0.0.0.0".into());
    let port = env::var("SERVER_PORT")
        .ok()
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(8080);
    let ip: IpAddr = bind
        .parse()
        .map_err(|e| anyhow::anyhow!("invalid SERVER_BIND {bind:?}: {e}"))?;
    Ok(SocketAddr::new(ip, port))
}

fn sentry() -> Option<sentry::ClientInitGuard> {
    if let Ok(url) = env::var("SENTRY_URL") {
        return Some(sentry::init((
            url,
            sentry::ClientOptions {
                release: sentry::release_name!(),
                traces_sample_rate: 1.0,
                ..Default::default()
            },
        )));
    }
    None
}

fn structured_logging() -> bool {
    env::var("STRUCTURED_LOGGING")
        .map(|s| s.parse::<bool>().unwrap_or(false))
        .unwrap_or(false)
}

pub(crate) fn logger() {
    if structured_logging() {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .event_format(Format::default().json())
                    .fmt_fields(JsonFields::new()),
            )
            .with(EnvFilter::from_default_env())
            .try_init()
            .ok();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer())
            .with(EnvFilter::from_default_env())
            .try_init()
            .ok();
    };
}

fn prometheus(app: Router) -> Router {
    let (metric_gatherer, metric_printer) = PrometheusMetricLayer::pair();
    app.route(
        "/metrics/prometheus",
        get(|| async move { metric_printer.render() }),
    )
    .layer(metric_gatherer)
}
