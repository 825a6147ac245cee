//src/main.rs

use std::time::Duration;

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use shelfmark::{
    build_router,
    config::{AppState, Config},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Inicializa o logger. RUST_LOG controla o nível (padrão: info).
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    let config = Config::from_env()?;
    let app_state = AppState::new(config).await?;

    // Faz o app rodar as migrações do SQLx na inicialização
    if let Some(pool) = &app_state.db_pool {
        sqlx::migrate!().run(pool).await?;
        tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");
    }

    spawn_orphan_reconciler(&app_state);

    let app = build_router(app_state.clone());

    // Inicia o servidor
    let listener = TcpListener::bind(&app_state.config.bind_addr).await?;
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}

// Limpa periodicamente contas sem documento de usuário (registro interrompido)
fn spawn_orphan_reconciler(app_state: &AppState) {
    let secs = app_state.config.orphan_reconcile_secs;
    if secs == 0 {
        return;
    }

    let registration = app_state.registration_service.clone();
    tokio::spawn(async move {
        let period = Duration::from_secs(secs);
        let grace = chrono::Duration::seconds(secs as i64);
        let mut ticker = tokio::time::interval(period);
        ticker.tick().await;

        loop {
            ticker.tick().await;
            match registration.reconcile_orphans(grace).await {
                Ok(0) => {}
                Ok(removed) => tracing::info!(removed, "Reconciliação de contas órfãs concluída"),
                Err(e) => tracing::error!(error = %e, "Falha na reconciliação de contas órfãs"),
            }
        }
    });
}
