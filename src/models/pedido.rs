// src/models/pedido.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, types::Json};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{catalog::ItemTipo, cliente::EnderecoSnapshot},
};

// --- Enums ---
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "pedido_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PedidoStatus {
    Criado,
    PendentePagamento,
    Pago,
    Cancelado,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "pedido_origem", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PedidoOrigem {
    #[default]
    Web,
    Mobile,
    Backoffice,
}

impl PedidoOrigem {
    /// `None` vira `WEB`; texto desconhecido é erro do cliente.
    pub fn from_payload(raw: Option<&str>) -> Result<Self, AppError> {
        match raw {
            None => Ok(PedidoOrigem::default()),
            Some("WEB") => Ok(PedidoOrigem::Web),
            Some("MOBILE") => Ok(PedidoOrigem::Mobile),
            Some("BACKOFFICE") => Ok(PedidoOrigem::Backoffice),
            Some(other) => Err(AppError::InvalidOrigin(other.to_string())),
        }
    }
}

// --- Pedido (registo histórico) ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Pedido {
    pub id: Uuid,
    #[schema(ignore)]
    pub tenant_id: Uuid,
    pub cliente_id: Uuid,
    #[schema(example = "45.00")]
    pub subtotal: Decimal,
    #[schema(example = "45.00")]
    pub total: Decimal,
    pub status: PedidoStatus,
    pub origem: PedidoOrigem,
    pub metodo_pagamento: Option<String>,
    pub estado_pagamento: Option<String>,
    pub cliente_nome_snapshot: Option<String>,
    pub cliente_email_snapshot: Option<String>,
    pub cliente_telefone_snapshot: Option<String>,
    #[schema(value_type = Object)]
    pub endereco_entrega_snapshot: Json<EnderecoSnapshot>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ItemPedido {
    pub id: Uuid,
    #[schema(ignore)]
    pub tenant_id: Uuid,
    pub pedido_id: Uuid,
    /// Ordem de entrada no checkout.
    pub posicao: i32,
    pub tipo: ItemTipo,
    pub ref_id: Uuid,
    #[schema(example = 2)]
    pub quantidade: i32,
    #[schema(example = "10.00")]
    pub preco_unitario: Decimal,
    #[schema(example = "20.00")]
    pub total_linha: Decimal,
    pub nome_snapshot: Option<String>,
    pub merchant_id: Option<Uuid>,
    pub prestador_id: Option<Uuid>,
    pub categoria_id_snapshot: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// O agregado devolvido pelo checkout e pelas vistas de merchant.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PedidoComItens {
    #[serde(flatten)]
    pub pedido: Pedido,
    pub itens: Vec<ItemPedido>,
}
