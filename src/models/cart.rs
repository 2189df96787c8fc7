// src/models/cart.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::catalog::{ItemRef, ItemTipo};

// Uma linha por (cliente_id, tenant_id, tipo, ref_id).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct CartItem {
    pub id: Uuid,
    #[schema(ignore)]
    pub tenant_id: Uuid,
    #[schema(ignore)]
    pub cliente_id: Uuid,
    pub tipo: ItemTipo,
    pub ref_id: Uuid,
    #[schema(example = 2)]
    pub quantidade: i32,
    #[schema(example = "10.00")]
    pub preco_unitario: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CartItem {
    pub fn item_ref(&self) -> ItemRef {
        ItemRef::new(self.tipo, self.ref_id)
    }
}
