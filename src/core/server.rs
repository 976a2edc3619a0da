//! HTTP 服务器启动和路由装配

use axum::{Router, middleware, routing::get};
use std::net::SocketAddr;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::core::{Config, ServerState};
use crate::gate;

/// HTTP 请求日志中间件
async fn log_request(
    request: axum::extract::Request,
    next: middleware::Next,
) -> axum::response::Response {
    let method = request.method().clone();
    let uri = request.uri().clone();

    let response = next.run(request).await;

    tracing::info!(target: "http_access", "{} {} {}", method, uri, response.status());

    response
}

/// 装配完整路由 (不含状态)
///
/// 前台接口直接挂载；后台接口统一嵌在 `/admin/api` 下并套
/// [`crate::auth::require_admin`]。门卫中间件在最外层，所有
/// 请求先过 IP 检查和会话刷新。
pub fn build_app(state: ServerState) -> Router {
    let admin_api = Router::<ServerState>::new()
        .merge(crate::api::menu::admin_router())
        .merge(crate::api::bookings::admin_router())
        .merge(crate::api::reviews::admin_router())
        .merge(crate::api::orders::admin_router())
        .merge(crate::api::upload::admin_router())
        .layer(middleware::from_fn(crate::auth::require_admin));

    Router::<ServerState>::new()
        // Public APIs
        .merge(crate::api::health::router())
        .merge(crate::api::auth::router())
        .merge(crate::api::menu::router())
        .merge(crate::api::bookings::router())
        .merge(crate::api::reviews::router())
        .merge(crate::api::orders::router())
        .merge(crate::api::cart::router())
        .merge(crate::api::events::router())
        // Back office
        .nest("/admin/api", admin_api)
        // Gate rewrites blocked requests here; keep it reachable directly too
        .route("/access-denied", get(|| async { gate::access_denied() }))
        // Stored dish images
        .nest_service("/images", ServeDir::new(state.images.dir()))
        .layer(middleware::from_fn_with_state(state.clone(), gate::request_gate))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(log_request))
}

/// HTTP Server
pub struct Server {
    config: Config,
    state: Option<ServerState>,
}

impl Server {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            state: None,
        }
    }

    /// 复用已初始化的状态 (测试和预热场景)
    pub fn with_state(config: Config, state: ServerState) -> Self {
        Self {
            config,
            state: Some(state),
        }
    }

    pub async fn run(&self) -> anyhow::Result<()> {
        let state = match &self.state {
            Some(s) => s.clone(),
            None => ServerState::initialize(&self.config).await?,
        };

        let app = build_app(state);

        let addr = SocketAddr::from(([0, 0, 0, 0], self.config.http_port));
        tracing::info!("Maison server starting on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr).await?;

        // ConnectInfo 供门卫读取对端地址
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down...");
        })
        .await?;

        Ok(())
    }
}
