// src/models/catalog.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::common::error::AppError;

// --- Discriminador de item ---
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "item_tipo", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ItemTipo {
    Produto,
    Servico,
}

impl ItemTipo {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemTipo::Produto => "produto",
            ItemTipo::Servico => "servico",
        }
    }

    /// Converte o `tipo` cru do payload. Qualquer outro valor é `InvalidItemType`.
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        match raw {
            "produto" => Ok(ItemTipo::Produto),
            "servico" => Ok(ItemTipo::Servico),
            other => Err(AppError::InvalidItemType(other.to_string())),
        }
    }
}

impl fmt::Display for ItemTipo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// --- Referência polimórfica ---
// Substitui o par solto (tipo, ref_id): depois de construída, não existe tipo inválido.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemRef {
    Produto(Uuid),
    Servico(Uuid),
}

impl ItemRef {
    pub fn new(tipo: ItemTipo, ref_id: Uuid) -> Self {
        match tipo {
            ItemTipo::Produto => ItemRef::Produto(ref_id),
            ItemTipo::Servico => ItemRef::Servico(ref_id),
        }
    }

    pub fn parse(tipo: &str, ref_id: Uuid) -> Result<Self, AppError> {
        ItemTipo::parse(tipo).map(|t| ItemRef::new(t, ref_id))
    }

    pub fn tipo(&self) -> ItemTipo {
        match self {
            ItemRef::Produto(_) => ItemTipo::Produto,
            ItemRef::Servico(_) => ItemTipo::Servico,
        }
    }

    pub fn ref_id(&self) -> Uuid {
        match self {
            ItemRef::Produto(id) | ItemRef::Servico(id) => *id,
        }
    }
}

// --- Merchant (dono dos produtos) ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Merchant {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub nome: String,
    pub slug: String,
    pub owner_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// --- Produto ---
// O stock só é alterado pelo checkout.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Produto {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub merchant_id: Uuid,
    pub categoria_id: Option<Uuid>,
    pub nome: String,
    #[schema(example = "10.00")]
    pub preco: Decimal,
    pub stock_atual: i32,
    pub stock_minimo: i32,
    pub permitir_backorder: bool,
    pub disponivel: bool,
    pub ativo: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// --- Serviço + estado do prestador ---
// Linha do JOIN servicos/prestadores usada na revalidação de preço.
#[derive(Debug, Clone, FromRow)]
pub struct ServicoOferta {
    pub id: Uuid,
    pub prestador_id: Uuid,
    pub categoria_id: Option<Uuid>,
    pub nome: String,
    pub preco: Decimal,
    pub ativo: bool,
    pub prestador_ativo: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tipos_validos() {
        let id = Uuid::new_v4();
        assert_eq!(ItemRef::parse("produto", id).unwrap(), ItemRef::Produto(id));
        assert_eq!(ItemRef::parse("servico", id).unwrap(), ItemRef::Servico(id));
    }

    #[test]
    fn test_parse_tipo_invalido() {
        let err = ItemRef::parse("assinatura", Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, AppError::InvalidItemType(ref t) if t == "assinatura"));
    }

    #[test]
    fn test_parse_e_sensivel_a_maiusculas() {
        assert!(ItemTipo::parse("Produto").is_err());
    }

    #[test]
    fn test_item_ref_expoe_tipo_e_id() {
        let id = Uuid::new_v4();
        let item = ItemRef::new(ItemTipo::Servico, id);
        assert_eq!(item.tipo(), ItemTipo::Servico);
        assert_eq!(item.ref_id(), id);
        assert_eq!(item.tipo().to_string(), "servico");
    }
}
