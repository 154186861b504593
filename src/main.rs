mod core;
mod features;
mod modules;
mod shared;

use crate::core::config::Config;
use crate::core::middleware;
use crate::core::openapi::{ApiDoc, SwaggerInfoModifier};
use crate::features::contact::{
    routes as contact_routes, ContactNotifier, ContactService, SmtpNotifier, TracingNotifier,
};
use crate::features::content::ContentService;
use crate::features::pages::{routes as pages_routes, PagesState};
use crate::features::rate_limits::{spawn_sweeper, RateLimitGuard, RateLimitPolicy, RateLimitStore};
use crate::modules::cms::CmsClient;
use crate::shared::templates::SiteRenderer;
use axum::{middleware::from_fn, Router};
use std::sync::Arc;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::Modify;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

fn main() -> anyhow::Result<()> {
    // Build Tokio runtime with configurable worker threads
    let worker_threads = std::env::var("TOKIO_WORKER_THREADS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|p| p.get())
                .unwrap_or(4)
        });

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(worker_threads)
        .max_blocking_threads(worker_threads * 4)
        .enable_all()
        .build()?;

    runtime.block_on(async_main(worker_threads))
}

async fn async_main(worker_threads: usize) -> anyhow::Result<()> {
    // Load .env file BEFORE initializing logger so RUST_LOG is available
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;

    tracing::info!(
        "System info: tokio_worker_threads={}, pid={}, environment={:?}",
        worker_threads,
        std::process::id(),
        config.app.environment
    );
    tracing::info!("Configuration loaded successfully");

    // Initialize CMS client
    let cms_client = Arc::new(
        CmsClient::new(&config.cms)
            .map_err(|e| anyhow::anyhow!("Failed to initialize CMS client: {}", e))?,
    );
    tracing::info!(
        "CMS client initialized for {} (token: {})",
        cms_client.base_url(),
        if config.cms.api_token.is_some() { "set" } else { "none" }
    );

    // Initialize Content Service
    let content_service = Arc::new(ContentService::new(
        Arc::clone(&cms_client),
        config.cms.default_image.clone(),
    ));
    tracing::info!("Content service initialized");

    // Load site templates
    let renderer = Arc::new(
        SiteRenderer::from_dir(&config.app.template_dir)
            .map_err(|e| anyhow::anyhow!("Failed to load templates: {}", e))?,
    );
    tracing::info!("Site templates loaded from {}", config.app.template_dir);

    // Initialize rate limit store and its sweeper
    let rate_limit_store = Arc::new(RateLimitStore::new());
    let contact_policy =
        RateLimitPolicy::new(config.contact.max_requests, config.contact.window);
    if config.contact.sweep_enabled {
        spawn_sweeper(Arc::clone(&rate_limit_store), config.contact.sweep_interval);
        tracing::info!(
            "Rate limit sweeper spawned (every {}s)",
            config.contact.sweep_interval.as_secs()
        );
    } else {
        tracing::info!("Rate limit sweeper disabled");
    }
    tracing::info!(
        "Contact rate limit: {} requests per {}s",
        contact_policy.max_requests,
        contact_policy.window.as_secs()
    );

    // Initialize Contact Service
    let notifier: Arc<dyn ContactNotifier> = match &config.contact.smtp {
        Some(smtp) => {
            let notifier = SmtpNotifier::new(smtp)
                .map_err(|e| anyhow::anyhow!("Failed to initialize SMTP notifier: {}", e))?;
            tracing::info!(
                "Contact messages mailed via {}:{} to {}",
                smtp.host,
                smtp.port,
                smtp.mail_to
            );
            Arc::new(notifier)
        }
        None => {
            tracing::warn!("SMTP_HOST not set, contact messages are only logged");
            Arc::new(TracingNotifier::new(config.contact.mail_to.clone()))
        }
    };
    let contact_service = Arc::new(ContactService::new(notifier));
    tracing::info!("Contact service initialized");

    let pages_state = Arc::new(PagesState::new(
        Arc::clone(&content_service),
        Arc::clone(&renderer),
        config.app.site_url.clone(),
    ));

    // Build application router with dynamic swagger config
    let swagger_modifier = SwaggerInfoModifier {
        title: config.swagger.title.clone(),
        version: config.swagger.version.clone(),
        description: config.swagger.description.clone(),
    };

    let mut openapi = ApiDoc::openapi();
    swagger_modifier.modify(&mut openapi);

    // Build swagger router
    let swagger = if let Some(credentials) = config.swagger.credentials() {
        tracing::info!("Swagger UI basic auth enabled");
        Router::new()
            .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
            .layer(from_fn(middleware::basic_auth_middleware(Arc::new(
                credentials,
            ))))
    } else {
        tracing::info!("Swagger UI basic auth disabled (no credentials configured)");
        Router::new().merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
    };

    // Simple health check endpoint
    async fn health_check() -> axum::http::StatusCode {
        axum::http::StatusCode::OK
    }
    let health_route = Router::new().route("/health", axum::routing::get(health_check));

    let api_routes = Router::new().merge(contact_routes::routes(
        contact_service,
        RateLimitGuard::new(Arc::clone(&rate_limit_store), contact_policy),
    ));

    let app = Router::new()
        .merge(swagger)
        .merge(health_route)
        .merge(api_routes)
        // Catch-all slug route goes last
        .merge(pages_routes::routes(pages_state))
        .layer(middleware::cors_layer(
            config.app.cors_allowed_origins.clone(),
        ))
        // Propagate X-Request-Id to response headers
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(middleware::MakeSpanWithRequestId)
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Generate X-Request-Id using UUID v7 (or use client-provided one)
        .layer(SetRequestIdLayer::x_request_id(middleware::MakeRequestUuid));

    // Start server
    let addr = config.app.server_address();
    let socket_addr: std::net::SocketAddr = addr
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid address: {}", e))?;

    // Use socket2 for TCP listener configuration
    let socket = socket2::Socket::new(
        socket2::Domain::for_address(socket_addr),
        socket2::Type::STREAM,
        Some(socket2::Protocol::TCP),
    )?;

    socket.set_reuse_address(true)?;
    #[cfg(unix)]
    socket.set_reuse_port(true)?;
    socket.set_nodelay(true)?;

    let keepalive = socket2::TcpKeepalive::new().with_time(std::time::Duration::from_secs(60));
    socket.set_tcp_keepalive(&keepalive)?;

    socket.set_nonblocking(true)?;
    socket.bind(&socket_addr.into())?;
    socket.listen(1024)?;

    let listener = tokio::net::TcpListener::from_std(socket.into())?;
    tracing::info!("Server listening on {}", format!("http://{}", addr));
    tracing::info!(
        "Swagger UI available at {}",
        format!("http://{}/swagger-ui/", addr)
    );

    axum::serve(listener, app).await?;

    Ok(())
}
