// src/handlers/pedidos.rs

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{perfil::MerchantAtual, tenancy::TenantContext},
    models::pedido::PedidoComItens,
};

// GET /api/merchant/pedidos
#[utoipa::path(
    get,
    path = "/api/merchant/pedidos",
    tag = "Merchant",
    responses(
        (status = 200, description = "Pedidos com linhas deste merchant (só essas linhas)", body = Vec<PedidoComItens>),
        (status = 403, description = "Utilizador não é merchant")
    ),
    params(
        ("x-tenant-id" = String, Header, description = "ID ou slug do tenant")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_pedidos(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    MerchantAtual(merchant): MerchantAtual,
) -> Result<Json<Vec<PedidoComItens>>, AppError> {
    let pedidos = app_state.pedido_service
        .list_for_merchant(tenant.id, merchant.id)
        .await?;
    Ok(Json(pedidos))
}

// GET /api/merchant/pedidos/{pedido_id}
#[utoipa::path(
    get,
    path = "/api/merchant/pedidos/{pedido_id}",
    tag = "Merchant",
    responses(
        (status = 200, description = "Detalhe do pedido", body = PedidoComItens),
        (status = 404, description = "Pedido não encontrado")
    ),
    params(
        ("pedido_id" = Uuid, Path, description = "ID do pedido"),
        ("x-tenant-id" = String, Header, description = "ID ou slug do tenant")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_pedido(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    MerchantAtual(merchant): MerchantAtual,
    Path(pedido_id): Path<Uuid>,
) -> Result<Json<PedidoComItens>, AppError> {
    let pedido = app_state.pedido_service
        .get_for_merchant(tenant.id, merchant.id, pedido_id)
        .await?;
    Ok(Json(pedido))
}
