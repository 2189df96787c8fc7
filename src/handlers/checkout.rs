// src/handlers/checkout.rs

use axum::{extract::State, Json};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{perfil::ClienteAtual, tenancy::TenantContext},
    models::{
        catalog::ItemRef,
        checkout::{CandidateItem, CheckoutMeta},
        pedido::{PedidoComItens, PedidoOrigem},
    },
    services::checkout_service::CheckoutRequest,
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CheckoutItemPayload {
    #[schema(example = "produto")]
    pub tipo: String,
    pub ref_id: Uuid,
    #[validate(range(min = 1, max = 9999, message = "A quantidade deve estar entre 1 e 9999."))]
    #[schema(example = 1)]
    pub quantidade: i32,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CheckoutPayload {
    /// Ausente ou vazio: usa o carrinho guardado.
    pub itens: Option<Vec<CheckoutItemPayload>>,
    #[schema(example = "WEB")]
    pub origem: Option<String>,
    pub metodo_pagamento: Option<String>,
    pub estado_pagamento: Option<String>,
    pub endereco_id: Option<Uuid>,
}

impl CheckoutPayload {
    /// Valida e converte para tipos do domínio. O `tipo` é verificado aqui,
    /// antes de qualquer acesso ao banco.
    pub fn into_request(self) -> Result<CheckoutRequest, AppError> {
        let itens = match self.itens {
            Some(itens) => {
                let mut candidatos = Vec::with_capacity(itens.len());
                for item in itens {
                    item.validate()?;
                    candidatos.push(CandidateItem {
                        item: ItemRef::parse(&item.tipo, item.ref_id)?,
                        quantidade: item.quantidade,
                    });
                }
                Some(candidatos)
            }
            None => None,
        };

        Ok(CheckoutRequest {
            itens,
            endereco_id: self.endereco_id,
            meta: CheckoutMeta {
                origem: PedidoOrigem::from_payload(self.origem.as_deref())?,
                metodo_pagamento: self.metodo_pagamento,
                estado_pagamento: self.estado_pagamento,
            },
        })
    }
}

// POST /api/checkout
#[utoipa::path(
    post,
    path = "/api/checkout",
    tag = "Checkout",
    request_body = CheckoutPayload,
    responses(
        (status = 200, description = "Pedido criado", body = PedidoComItens),
        (status = 400, description = "Carrinho vazio, stock insuficiente ou dados inválidos"),
        (status = 404, description = "Item ou endereço não encontrado")
    ),
    params(
        ("x-tenant-id" = String, Header, description = "ID ou slug do tenant")
    ),
    security(("api_jwt" = []))
)]
pub async fn checkout(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    ClienteAtual(cliente): ClienteAtual,
    Json(payload): Json<CheckoutPayload>,
) -> Result<Json<PedidoComItens>, AppError> {
    let request = payload.into_request()?;
    tracing::debug!(tenant = %tenant.slug, "Checkout recebido");

    let pedido = app_state.checkout_service
        .create_pedido(&app_state.db_pool, tenant.id, &cliente, request)
        .await?;

    Ok(Json(pedido))
}
