// src/middleware/tenancy.rs

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::auth::UserRole,
};

// O nome do nosso cabeçalho HTTP customizado
const TENANT_ID_HEADER: &str = "x-tenant-id";

/// Tenant ativo resolvido para este pedido HTTP.
#[derive(Debug, Clone)]
pub struct TenantContext {
    pub id: Uuid,
    pub slug: String,
}

/// Lê o `X-Tenant-ID` (UUID ou slug) e confirma que o tenant existe e está ativo.
/// Tem de correr depois do `auth_guard`.
pub async fn tenant_guard(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let identifier = request
        .headers()
        .get(TENANT_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or(AppError::MissingTenant)?
        .to_owned();

    let tenant = app_state.tenant_repo
        .find_active_by_identifier(&identifier)
        .await?
        .ok_or(AppError::TenantNotFound)?;

    // Utilizador de outro tenant: responde como "não encontrado".
    if let Some(AuthenticatedUser(user)) = request.extensions().get::<AuthenticatedUser>() {
        if user.role != UserRole::Superadmin && user.tenant_id != tenant.id {
            tracing::warn!(user_id = %user.id, tenant_id = %tenant.id, "Acesso a tenant alheio");
            return Err(AppError::TenantMismatch);
        }
    }

    request.extensions_mut().insert(TenantContext {
        id: tenant.id,
        slug: tenant.slug,
    });
    Ok(next.run(request).await)
}

impl<S> FromRequestParts<S> for TenantContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<TenantContext>()
            .cloned()
            .ok_or(AppError::MissingTenant)
    }
}
