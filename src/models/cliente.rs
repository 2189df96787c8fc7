// src/models/cliente.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// --- CLIENTE ---
// `default_address_id` é uma referência fraca: só serve para lookup.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Cliente {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub user_id: Uuid,
    pub nome: String,
    pub email: String,
    pub telefone: String,
    pub default_address_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ClienteEndereco {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub cliente_id: Uuid,
    pub apelido: Option<String>,
    pub linha1: String,
    pub linha2: Option<String>,
    pub cidade: String,
    pub codigo_postal: String,
    pub pais: String,
    pub telefone: Option<String>,
    pub latitude: Option<Decimal>,
    pub longitude: Option<Decimal>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ---
// Snapshot de entrega (cópia congelada no pedido)
// ---
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct EnderecoEntrega {
    pub apelido: Option<String>,
    pub linha1: String,
    pub linha2: Option<String>,
    pub cidade: String,
    pub codigo_postal: String,
    pub pais: String,
    pub telefone: Option<String>,
    /// Graus decimais; `null` quando ausente.
    pub latitude: Option<Decimal>,
    pub longitude: Option<Decimal>,
}

/// O que fica gravado em `pedidos.endereco_entrega_snapshot`.
/// Sem endereço o JSON é `{}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EnderecoSnapshot {
    Completo(EnderecoEntrega),
    Vazio {},
}

impl EnderecoSnapshot {
    pub fn vazio() -> Self {
        EnderecoSnapshot::Vazio {}
    }

    pub fn cidade(&self) -> Option<&str> {
        match self {
            EnderecoSnapshot::Completo(e) => Some(&e.cidade),
            EnderecoSnapshot::Vazio {} => None,
        }
    }
}

impl Default for EnderecoSnapshot {
    fn default() -> Self {
        Self::vazio()
    }
}

impl From<&ClienteEndereco> for EnderecoSnapshot {
    fn from(endereco: &ClienteEndereco) -> Self {
        EnderecoSnapshot::Completo(EnderecoEntrega {
            apelido: endereco.apelido.clone(),
            linha1: endereco.linha1.clone(),
            linha2: endereco.linha2.clone(),
            cidade: endereco.cidade.clone(),
            codigo_postal: endereco.codigo_postal.clone(),
            pais: endereco.pais.clone(),
            telefone: endereco.telefone.clone(),
            latitude: endereco.latitude,
            longitude: endereco.longitude,
        })
    }
}
