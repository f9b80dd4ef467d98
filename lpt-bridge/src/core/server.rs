//! Server Implementation
//!
//! HTTP 服务器启动和管理

use tokio::net::TcpListener;

use crate::api::build_app;
use crate::core::{BackgroundTasks, Config, ServerState};

/// HTTP Server
pub struct Server {
    config: Config,
    state: ServerState,
}

impl Server {
    /// Create server with existing state
    pub fn with_state(config: Config, state: ServerState) -> Self {
        Self { config, state }
    }

    pub async fn run(&self) -> anyhow::Result<()> {
        let state = self.state.clone();

        // Background tasks: janitor sweeps once now, then hourly
        let mut tasks = BackgroundTasks::new();
        let token = tasks.shutdown_token();
        tasks.spawn("spool_janitor", state.spool_janitor().run(token));

        let addr = std::net::SocketAddr::from(([0, 0, 0, 0], self.config.listen_port));
        let listener = TcpListener::bind(addr).await?;
        tracing::info!(
            "Parallel Port Printer Server running at: http://localhost:{}",
            self.config.listen_port
        );
        tracing::info!(
            default_port = %state.settings.current().default_port,
            spool_dir = %self.config.spool_dir.display(),
            "Printer bridge ready"
        );

        let shutdown = async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down...");
        };

        let result = axum::serve(listener, build_app(state))
            .with_graceful_shutdown(shutdown)
            .await;

        tasks.shutdown().await;
        result.map_err(Into::into)
    }
}
