// src/handlers/carrinho.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{perfil::ClienteAtual, tenancy::TenantContext},
    models::{cart::CartItem, catalog::ItemRef},
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AddCartItemPayload {
    #[schema(example = "produto")]
    pub tipo: String,
    pub ref_id: Uuid,
    #[validate(range(min = 1, max = 9999, message = "A quantidade deve estar entre 1 e 9999."))]
    #[schema(example = 1)]
    pub quantidade: i32,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateCartItemPayload {
    #[validate(range(min = 1, max = 9999, message = "A quantidade deve estar entre 1 e 9999."))]
    #[schema(example = 3)]
    pub quantidade: i32,
}

// GET /api/me/carrinho
#[utoipa::path(
    get,
    path = "/api/me/carrinho",
    tag = "Carrinho",
    responses(
        (status = 200, description = "Itens do carrinho (mais antigos primeiro)", body = Vec<CartItem>)
    ),
    params(
        ("x-tenant-id" = String, Header, description = "ID ou slug do tenant")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_cart(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    ClienteAtual(cliente): ClienteAtual,
) -> Result<Json<Vec<CartItem>>, AppError> {
    let itens = app_state.cart_service.list_items(tenant.id, cliente.id).await?;
    Ok(Json(itens))
}

// POST /api/me/carrinho/itens
#[utoipa::path(
    post,
    path = "/api/me/carrinho/itens",
    tag = "Carrinho",
    request_body = AddCartItemPayload,
    responses(
        (status = 201, description = "Item adicionado ou somado", body = CartItem),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Item indisponível")
    ),
    params(
        ("x-tenant-id" = String, Header, description = "ID ou slug do tenant")
    ),
    security(("api_jwt" = []))
)]
pub async fn add_cart_item(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    ClienteAtual(cliente): ClienteAtual,
    Json(payload): Json<AddCartItemPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let item = ItemRef::parse(&payload.tipo, payload.ref_id)?;

    let cart_item = app_state.cart_service
        .add_item(&app_state.db_pool, tenant.id, cliente.id, item, payload.quantidade)
        .await?;

    Ok((StatusCode::CREATED, Json(cart_item)))
}

// PATCH /api/me/carrinho/itens/{item_id}
#[utoipa::path(
    patch,
    path = "/api/me/carrinho/itens/{item_id}",
    tag = "Carrinho",
    request_body = UpdateCartItemPayload,
    responses(
        (status = 200, description = "Quantidade atualizada", body = CartItem),
        (status = 404, description = "Item não encontrado")
    ),
    params(
        ("item_id" = Uuid, Path, description = "ID do item do carrinho"),
        ("x-tenant-id" = String, Header, description = "ID ou slug do tenant")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_cart_item(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    ClienteAtual(cliente): ClienteAtual,
    Path(item_id): Path<Uuid>,
    Json(payload): Json<UpdateCartItemPayload>,
) -> Result<Json<CartItem>, AppError> {
    payload.validate()?;

    let cart_item = app_state.cart_service
        .update_quantidade(tenant.id, cliente.id, item_id, payload.quantidade)
        .await?;

    Ok(Json(cart_item))
}

// DELETE /api/me/carrinho/itens/{item_id}
#[utoipa::path(
    delete,
    path = "/api/me/carrinho/itens/{item_id}",
    tag = "Carrinho",
    responses(
        (status = 204, description = "Item removido"),
        (status = 404, description = "Item não encontrado")
    ),
    params(
        ("item_id" = Uuid, Path, description = "ID do item do carrinho"),
        ("x-tenant-id" = String, Header, description = "ID ou slug do tenant")
    ),
    security(("api_jwt" = []))
)]
pub async fn remove_cart_item(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    ClienteAtual(cliente): ClienteAtual,
    Path(item_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    app_state.cart_service.remove_item(tenant.id, cliente.id, item_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
