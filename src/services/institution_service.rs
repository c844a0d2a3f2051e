// src/services/institution_service.rs

use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::InstitutionRepository,
    models::institutions::{Institution, InstitutionPayload},
};

#[derive(Clone)]
pub struct InstitutionService {
    repo: InstitutionRepository,
}

impl InstitutionService {
    pub fn new(repo: InstitutionRepository) -> Self {
        Self { repo }
    }

    pub async fn list<'e, E>(&self, executor: E, user_id: Uuid) -> Result<Vec<Institution>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo.list_by_user(executor, user_id).await
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        payload: &InstitutionPayload,
    ) -> Result<Institution, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let institution = self.repo.create(executor, user_id, payload).await?;
        tracing::info!("🏥 Instituição '{}' cadastrada", institution.name);
        Ok(institution)
    }

    pub async fn update<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        id: Uuid,
        payload: &InstitutionPayload,
    ) -> Result<Institution, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo.update(executor, user_id, id, payload).await
    }

    // Plantões que apontavam para ela passam a aparecer como "Sem instituição"
    pub async fn delete<'e, E>(&self, executor: E, user_id: Uuid, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo.delete(executor, user_id, id).await?;
        tracing::info!("🗑️ Instituição {} removida", id);
        Ok(())
    }
}
