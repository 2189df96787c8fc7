// src/models/tenancy.rs

use serde::{Serialize, Deserialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// ---
// Tenant (A "instância" do marketplace)
// ---
// Fronteira de isolamento: todas as outras entidades carregam um tenant_id.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Tenant {
    pub id: Uuid,
    #[schema(example = "Marketplace Lisboa")]
    pub nome: String,
    #[schema(example = "lisboa")]
    pub slug: String,
    pub ativo: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
