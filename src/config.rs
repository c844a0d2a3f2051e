// src/config.rs

use std::{env, sync::Arc, time::Duration};

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    common::i18n::I18nStore,
    db::{InstitutionRepository, ShiftRepository, SubscriptionRepository, UserRepository},
    services::{
        auth::AuthService, dashboard_service::DashboardService,
        institution_service::InstitutionService, shift_service::ShiftService,
        subscription_service::SubscriptionService,
    },
};

const DEFAULT_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

// Variáveis de ambiente (.env em desenvolvimento)
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub app_addr: String,
    pub max_connections: u32,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").context("DATABASE_URL deve ser definida")?;
        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET deve ser definido")?;
        let app_addr = env::var("APP_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());
        let max_connections = match env::var("DATABASE_MAX_CONNECTIONS") {
            Ok(raw) => raw
                .parse()
                .with_context(|| format!("DATABASE_MAX_CONNECTIONS inválido: {}", raw))?,
            Err(_) => DEFAULT_MAX_CONNECTIONS,
        };

        Ok(Self {
            database_url,
            jwt_secret,
            app_addr,
            max_connections,
        })
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub i18n_store: Arc<I18nStore>,
    pub auth_service: AuthService,
    pub shift_service: ShiftService,
    pub institution_service: InstitutionService,
    pub subscription_service: SubscriptionService,
    pub dashboard_service: DashboardService,
}

impl AppState {
    pub async fn new(config: &Config) -> anyhow::Result<Self> {
        let db_pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&config.database_url)
            .await
            .context("Falha ao conectar no banco de dados")?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        let i18n_store = Arc::new(I18nStore::load()?);

        // --- Monta o gráfico de dependências ---
        let user_repo = UserRepository::new(db_pool.clone());
        let shift_repo = ShiftRepository::new();
        let institution_repo = InstitutionRepository::new();
        let subscription_repo = Arc::new(SubscriptionRepository::new(db_pool.clone()));

        let auth_service = AuthService::new(user_repo, config.jwt_secret.clone());
        let shift_service = ShiftService::new(shift_repo.clone(), institution_repo.clone());
        let institution_service = InstitutionService::new(institution_repo.clone());
        let subscription_service = SubscriptionService::new(subscription_repo);
        let dashboard_service = DashboardService::new(shift_repo, institution_repo);

        Ok(Self {
            db_pool,
            i18n_store,
            auth_service,
            shift_service,
            institution_service,
            subscription_service,
            dashboard_service,
        })
    }
}
