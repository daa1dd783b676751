use std::{future::Future, sync::Arc};

use axum::Router;
use configs::AppConfig;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use service::{
    merchant::{KvMerchantRepository, MerchantRepository},
    seed::{self, SeedPlan},
    storage::KvStore,
};

use crate::routes::{self, ServerState};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Open the store named in `cfg`, seeding it when it was just created.
pub async fn open_store(cfg: &AppConfig) -> anyhow::Result<Arc<KvStore>> {
    let path = cfg.storage.path.clone();
    let create = cfg.storage.create_if_absent;
    let store = tokio::task::spawn_blocking(move || KvStore::open(path, create)).await??;
    let store = Arc::new(store);

    if store.is_fresh() && cfg.storage.seed_on_create {
        let repo = KvMerchantRepository::new(Arc::clone(&store));
        let plan = SeedPlan {
            merchants: cfg.storage.seed_merchants,
            members_per_merchant: cfg.storage.seed_members_per_merchant,
        };
        let codes = seed::seed(&repo, plan).await?;
        info!(count = codes.len(), "seeded fresh store with sample merchants");
    }
    Ok(store)
}

/// Router over `store` with the configured page size.
pub fn build_app(store: Arc<KvStore>, per_page: u32) -> Router {
    let repo: Arc<dyn MerchantRepository> = Arc::new(KvMerchantRepository::new(store));
    routes::build_router(ServerState::new(repo, per_page), build_cors())
}

/// Serve `app` on `listener` until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, app: Router, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, app).with_graceful_shutdown(shutdown).await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for ctrl-c");
        return;
    }
    info!("shutdown signal received");
}

/// Public entry: bind the configured address and serve until Ctrl+C.
/// Logging and `.env` are the caller's concern.
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let addr = cfg.bind_addr()?;
    let listener = TcpListener::bind(addr).await?;
    run_with_listener(cfg, listener, shutdown_signal()).await
}

/// Open the store, serve on `listener` until `shutdown` resolves, then close the store.
pub async fn run_with_listener<F>(cfg: AppConfig, listener: TcpListener, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let store = open_store(&cfg).await?;
    let app = build_app(Arc::clone(&store), cfg.pagination.per_page);

    info!(addr = %listener.local_addr()?, storage = %cfg.storage.path, "starting merchant server");
    serve(listener, app, shutdown).await?;

    // 停机后关闭存储，确保数据已落盘
    match Arc::try_unwrap(store) {
        Ok(store) => store.close(false)?,
        Err(_) => warn!("store still referenced at shutdown, skipping close"),
    }
    info!("merchant server stopped");
    Ok(())
}
