// src/db/tenancy_repo.rs

use sqlx::PgPool;
use uuid::Uuid;
use crate::{common::error::AppError, models::tenancy::Tenant};

#[derive(Clone)]
pub struct TenantRepository {
    pool: PgPool,
}

impl TenantRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Resolve o tenant pelo valor do cabeçalho: UUID ou slug.
    /// Tenants inativos contam como inexistentes.
    pub async fn find_active_by_identifier(
        &self,
        identifier: &str,
    ) -> Result<Option<Tenant>, AppError> {
        let tenant = match Uuid::parse_str(identifier) {
            Ok(tenant_id) => {
                sqlx::query_as::<_, Tenant>("SELECT * FROM tenants WHERE id = $1")
                    .bind(tenant_id)
                    .fetch_optional(&self.pool)
                    .await?
            }
            Err(_) => {
                sqlx::query_as::<_, Tenant>("SELECT * FROM tenants WHERE slug = $1")
                    .bind(identifier)
                    .fetch_optional(&self.pool)
                    .await?
            }
        };

        Ok(tenant.filter(|t| t.ativo))
    }
}
