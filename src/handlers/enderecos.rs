// src/handlers/enderecos.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    db::cliente_repo::NovoEndereco,
    middleware::{perfil::ClienteAtual, tenancy::TenantContext},
    models::cliente::ClienteEndereco,
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateEnderecoPayload {
    #[schema(example = "Casa")]
    pub apelido: Option<String>,

    #[validate(length(min = 1, message = "A linha 1 é obrigatória."))]
    #[schema(example = "Rua 123")]
    pub linha1: String,

    pub linha2: Option<String>,

    #[validate(length(min = 1, message = "A cidade é obrigatória."))]
    #[schema(example = "Lisboa")]
    pub cidade: String,

    #[validate(length(min = 1, message = "O código postal é obrigatório."))]
    #[schema(example = "1000-000")]
    pub codigo_postal: String,

    #[validate(length(min = 2, message = "O país é obrigatório."))]
    #[schema(example = "PT")]
    pub pais: String,

    pub telefone: Option<String>,
    pub latitude: Option<Decimal>,
    pub longitude: Option<Decimal>,

    #[serde(default)]
    pub definir_como_padrao: bool,
}

// GET /api/me/enderecos
#[utoipa::path(
    get,
    path = "/api/me/enderecos",
    tag = "Endereços",
    responses(
        (status = 200, description = "Endereços do cliente (mais recentes primeiro)", body = Vec<ClienteEndereco>)
    ),
    params(
        ("x-tenant-id" = String, Header, description = "ID ou slug do tenant")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_enderecos(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    ClienteAtual(cliente): ClienteAtual,
) -> Result<Json<Vec<ClienteEndereco>>, AppError> {
    let enderecos = app_state.cliente_service
        .list_enderecos(tenant.id, cliente.id)
        .await?;
    Ok(Json(enderecos))
}

// POST /api/me/enderecos
#[utoipa::path(
    post,
    path = "/api/me/enderecos",
    tag = "Endereços",
    request_body = CreateEnderecoPayload,
    responses(
        (status = 201, description = "Endereço criado", body = ClienteEndereco),
        (status = 400, description = "Dados inválidos")
    ),
    params(
        ("x-tenant-id" = String, Header, description = "ID ou slug do tenant")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_endereco(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    ClienteAtual(cliente): ClienteAtual,
    Json(payload): Json<CreateEnderecoPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let novo = NovoEndereco {
        apelido: payload.apelido.as_deref(),
        linha1: &payload.linha1,
        linha2: payload.linha2.as_deref(),
        cidade: &payload.cidade,
        codigo_postal: &payload.codigo_postal,
        pais: &payload.pais,
        telefone: payload.telefone.as_deref(),
        latitude: payload.latitude,
        longitude: payload.longitude,
    };

    let endereco = app_state.cliente_service
        .create_endereco(
            &app_state.db_pool,
            tenant.id,
            cliente.id,
            &novo,
            payload.definir_como_padrao,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(endereco)))
}

// DELETE /api/me/enderecos/{endereco_id}
#[utoipa::path(
    delete,
    path = "/api/me/enderecos/{endereco_id}",
    tag = "Endereços",
    responses(
        (status = 204, description = "Endereço removido"),
        (status = 404, description = "Endereço não encontrado")
    ),
    params(
        ("endereco_id" = Uuid, Path, description = "ID do endereço"),
        ("x-tenant-id" = String, Header, description = "ID ou slug do tenant")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_endereco(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    ClienteAtual(cliente): ClienteAtual,
    Path(endereco_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    app_state.cliente_service
        .delete_endereco(&app_state.db_pool, tenant.id, cliente.id, endereco_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
