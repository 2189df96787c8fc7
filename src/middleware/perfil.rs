// src/middleware/perfil.rs
// Extratores por papel: exigem auth_guard + tenant_guard na rota.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{auth::AuthenticatedUser, tenancy::TenantContext},
    models::{auth::UserRole, catalog::Merchant, cliente::Cliente},
};

/// O cliente do utilizador autenticado dentro do tenant atual.
#[derive(Debug, Clone)]
pub struct ClienteAtual(pub Cliente);

/// O merchant cujo dono é o utilizador autenticado, dentro do tenant atual.
#[derive(Debug, Clone)]
pub struct MerchantAtual(pub Merchant);

fn exigir_papel(user: &AuthenticatedUser, papel: UserRole) -> Result<(), AppError> {
    if user.0.role != papel {
        return Err(AppError::PermissaoInsuficiente);
    }
    Ok(())
}

impl<S> FromRequestParts<S> for ClienteAtual
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        let user = AuthenticatedUser::from_request_parts(parts, state).await?;
        let tenant = TenantContext::from_request_parts(parts, state).await?;

        exigir_papel(&user, UserRole::Cliente)?;

        let cliente = app_state.cliente_service
            .find_cliente(tenant.id, user.0.id)
            .await?;
        Ok(ClienteAtual(cliente))
    }
}

impl<S> FromRequestParts<S> for MerchantAtual
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        let user = AuthenticatedUser::from_request_parts(parts, state).await?;
        let tenant = TenantContext::from_request_parts(parts, state).await?;

        exigir_papel(&user, UserRole::Merchant)?;

        let merchant = app_state.catalog_repo
            .find_merchant_by_owner(tenant.id, user.0.id)
            .await?
            .ok_or(AppError::MerchantNotFound)?;
        Ok(MerchantAtual(merchant))
    }
}
