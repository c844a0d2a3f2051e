//src/main.rs

use anyhow::Context;
use axum::{
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::{AppState, Config};
use crate::docs::ApiDoc;
use crate::middleware::{auth::auth_guard, subscription::subscription_guard};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    // Se a configuração falhar, a aplicação não deve iniciar
    let config = Config::from_env()?;
    let app_state = AppState::new(&config).await?;

    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .context("Falha ao rodar as migrações do banco de dados")?;

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    // Rotas públicas de autenticação
    let auth_routes = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login));

    // Perfil (só exige login)
    let user_routes = Router::new()
        .route("/me", get(handlers::auth::get_me).put(handlers::auth::update_me))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Assinatura: acessível mesmo com o trial vencido, para poder pagar
    let subscription_routes = Router::new()
        .route("/", get(handlers::subscription::get_status))
        .route("/plan", put(handlers::subscription::change_plan))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Área da carteira: login + assinatura válida.
    // A última layer roda primeiro: auth_guard antes do subscription_guard.
    let wallet_routes = Router::new()
        .route(
            "/shifts",
            post(handlers::shifts::create_shift).get(handlers::shifts::list_shifts),
        )
        .route(
            "/shifts/{id}",
            put(handlers::shifts::update_shift).delete(handlers::shifts::delete_shift),
        )
        .route("/shifts/{id}/duplicate", post(handlers::shifts::duplicate_shift))
        .route(
            "/institutions",
            post(handlers::institutions::create_institution)
                .get(handlers::institutions::list_institutions),
        )
        .route(
            "/institutions/{id}",
            put(handlers::institutions::update_institution)
                .delete(handlers::institutions::delete_institution),
        )
        .route("/dashboard/summary", get(handlers::dashboard::get_summary))
        .route("/dashboard/report", get(handlers::dashboard::get_report))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            subscription_guard,
        ))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Combina tudo no router principal
    let app = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/plans", get(handlers::subscription::list_plans))
        .nest("/api/auth", auth_routes)
        .nest("/api/users", user_routes)
        .nest("/api/subscription", subscription_routes)
        .nest("/api", wallet_routes)
        .with_state(app_state);

    let listener = TcpListener::bind(&config.app_addr)
        .await
        .with_context(|| format!("Falha ao iniciar o listener TCP em {}", config.app_addr))?;
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr()?);

    axum::serve(listener, app).await.context("Erro no servidor Axum")?;
    Ok(())
}
