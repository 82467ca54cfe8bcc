use service_core::error::AppError;
use service_core::middleware::rate_limit::create_ip_rate_limiter;
use std::future::{Future, IntoFuture};
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::Arc;
use tokio::{net::TcpListener, signal};

use crate::config::{AuthMode, DirectoryConfig, DirectorySource};
use crate::services::{
    AllowAnyAuthority, AllowAnyClients, AuthService, ClientStore, DirectoryStore, EmptyDirectory,
    FileDirectory, JitDirectory, JwtTokenAuthority, MemoryClientStore, SigningKeys,
    TokenAuthority,
};
use crate::{build_router, AppState};

/// Wire the configured client registry, token authority and directory into
/// an [`AppState`].
pub async fn build_state(config: DirectoryConfig) -> Result<AppState, AppError> {
    let auth = build_auth(&config)?;
    let directory = build_directory(&config.directory).await?;
    let token_rate_limiter = create_ip_rate_limiter(
        config.rate_limit.token_requests,
        config.rate_limit.token_window_seconds,
    );

    Ok(AppState {
        config: Arc::new(config),
        auth,
        directory,
        token_rate_limiter,
    })
}

fn build_auth(config: &DirectoryConfig) -> Result<AuthService, AppError> {
    if config.auth.mode == AuthMode::AllowAny {
        tracing::warn!("Authentication is disabled: any credentials and any token are accepted");
        return Ok(AuthService::new(
            Arc::new(AllowAnyClients),
            Arc::new(AllowAnyAuthority),
        ));
    }

    let clients: Arc<dyn ClientStore> =
        Arc::new(MemoryClientStore::new(config.auth.clients.iter().cloned()));

    let token = &config.auth.token;
    let keys = match (&token.private_key_path, &token.public_key_path) {
        (Some(private_key), Some(public_key)) => {
            SigningKeys::from_files(token.algorithm, private_key, public_key)
        }
        _ => {
            tracing::warn!(
                "No signing keys configured, generating an ephemeral RSA key pair; \
                 issued tokens will not survive a restart"
            );
            SigningKeys::generate_rsa()
        }
    }
    .map_err(AppError::ConfigError)?;

    tracing::info!(
        algorithm = ?keys.algorithm(),
        clients = config.auth.clients.len(),
        ttl_seconds = token.ttl_seconds,
        "Token authority initialized"
    );

    let tokens: Arc<dyn TokenAuthority> = Arc::new(JwtTokenAuthority::new(
        keys,
        token.ttl_seconds,
        clients.clone(),
        token.require_known_subject,
    ));

    Ok(AuthService::new(clients, tokens))
}

async fn build_directory(source: &DirectorySource) -> Result<Arc<dyn DirectoryStore>, AppError> {
    match source {
        DirectorySource::File { strict, .. } => {
            let files = source
                .files()
                .ok_or_else(|| AppError::ConfigError(anyhow::anyhow!("Missing directory files")))?;
            let directory = FileDirectory::new(&files);
            if *strict {
                directory.preload().await.map_err(AppError::ConfigError)?;
            }
            tracing::info!(files = ?files, strict = *strict, "Using file directory");
            Ok(Arc::new(directory))
        }
        DirectorySource::Jit {
            prefix,
            departments,
            users_per_department,
        } => {
            let directory = JitDirectory::new(prefix.clone(), *departments, *users_per_department);
            tracing::info!(
                prefix = %prefix,
                departments = *departments,
                users_per_department = *users_per_department,
                total_users = directory.total_users(),
                "Using synthetic directory"
            );
            Ok(Arc::new(directory))
        }
        DirectorySource::Empty => {
            tracing::warn!("No directory source configured, serving an empty directory");
            Ok(Arc::new(EmptyDirectory))
        }
    }
}

type ServerFuture = Pin<Box<dyn Future<Output = std::io::Result<()>> + Send>>;

pub struct Application {
    port: u16,
    server: ServerFuture,
}

impl Application {
    pub async fn build(config: DirectoryConfig) -> Result<Self, AppError> {
        let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
            .parse()
            .map_err(|e| AppError::ConfigError(anyhow::anyhow!("Invalid server address: {}", e)))?;

        let state = build_state(config).await?;
        let app = build_router(state);

        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!(address = %addr, port, "Listening");

        let server = axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal());

        Ok(Self {
            port,
            server: Box::pin(server.into_future()),
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        self.server.await
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received SIGINT, starting graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        },
    }
}
