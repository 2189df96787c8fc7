use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    // --- Checkout / catálogo ---
    #[error("Item indisponível")]
    ItemUnavailable,

    #[error("Stock insuficiente para o produto")]
    InsufficientStock,

    #[error("Tipo de item inválido: {0}")]
    InvalidItemType(String),

    #[error("Carrinho vazio")]
    EmptyCart,

    #[error("Quantidade acima do máximo permitido")]
    QuantidadeExcessiva,

    #[error("Endereço não encontrado")]
    AddressNotFound,

    #[error("Origem inválida: {0}")]
    InvalidOrigin(String),

    // Reportado sempre como "não encontrado" para não revelar dados de outro tenant.
    #[error("Entidade de outro tenant")]
    TenantMismatch,

    #[error("Item do carrinho não encontrado")]
    CartItemNotFound,

    #[error("Pedido não encontrado")]
    PedidoNotFound,

    // --- Contexto do pedido HTTP ---
    #[error("Tenant não informado")]
    MissingTenant,

    #[error("Tenant inválido ou inativo")]
    TenantNotFound,

    #[error("Cliente não encontrado")]
    ClienteNotFound,

    #[error("Merchant não encontrado para o utilizador")]
    MerchantNotFound,

    #[error("Permissões insuficientes")]
    PermissaoInsuficiente,

    // --- Autenticação ---
    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Usuário não encontrado")]
    UserNotFound,

    // Variante para erros de banco de dados
    #[error("Erro de banco de dados: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Erro interno do servidor: {0}")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl AppError {
    /// Status HTTP e mensagem pública de cada variante.
    pub fn status_and_message(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::ValidationError(_) => (StatusCode::BAD_REQUEST, "Um ou mais campos são inválidos."),
            AppError::ItemUnavailable => (StatusCode::NOT_FOUND, "Item indisponível."),
            AppError::InsufficientStock => (StatusCode::BAD_REQUEST, "Stock insuficiente para o produto."),
            AppError::InvalidItemType(_) => (StatusCode::BAD_REQUEST, "Tipo de item inválido."),
            AppError::EmptyCart => (StatusCode::BAD_REQUEST, "Carrinho vazio."),
            AppError::QuantidadeExcessiva => (StatusCode::BAD_REQUEST, "Quantidade acima do máximo permitido."),
            AppError::AddressNotFound => (StatusCode::NOT_FOUND, "Endereço não encontrado."),
            AppError::InvalidOrigin(_) => (StatusCode::BAD_REQUEST, "Origem inválida."),
            AppError::TenantMismatch => (StatusCode::NOT_FOUND, "Recurso não encontrado."),
            AppError::CartItemNotFound => (StatusCode::NOT_FOUND, "Item não encontrado."),
            AppError::PedidoNotFound => (StatusCode::NOT_FOUND, "Pedido não encontrado."),
            AppError::MissingTenant => (StatusCode::BAD_REQUEST, "Tenant não informado."),
            AppError::TenantNotFound => (StatusCode::NOT_FOUND, "Tenant inválido/inativo."),
            AppError::ClienteNotFound => (StatusCode::NOT_FOUND, "Cliente não encontrado."),
            AppError::MerchantNotFound => (StatusCode::NOT_FOUND, "Merchant não encontrado para o utilizador."),
            AppError::PermissaoInsuficiente => (StatusCode::FORBIDDEN, "Permissões insuficientes."),
            AppError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "E-mail ou senha inválidos."),
            AppError::InvalidToken => (StatusCode::UNAUTHORIZED, "Token de autenticação inválido ou ausente."),
            AppError::UserNotFound => (StatusCode::UNAUTHORIZED, "Utilizador não encontrado."),
            AppError::DatabaseError(_)
            | AppError::InternalServerError(_)
            | AppError::BcryptError(_)
            | AppError::JwtError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Ocorreu um erro inesperado."),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = self.status_and_message();

        if let AppError::ValidationError(errors) = &self {
            let mut details = std::collections::HashMap::new();
            for (field, field_errors) in errors.field_errors() {
                let messages: Vec<String> = field_errors.iter()
                    .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                    .collect();
                details.insert(field.to_string(), messages);
            }
            let body = Json(json!({
                "error": error_message,
                "details": details,
            }));
            return (status, body).into_response();
        }

        if status.is_server_error() {
            // O detalhe fica no log, o cliente recebe só a mensagem genérica.
            tracing::error!("Erro Interno do Servidor: {}", self);
        }

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_erros_de_checkout_sao_erros_do_cliente() {
        for err in [
            AppError::ItemUnavailable,
            AppError::InsufficientStock,
            AppError::InvalidItemType("x".into()),
            AppError::EmptyCart,
            AppError::QuantidadeExcessiva,
            AppError::AddressNotFound,
            AppError::InvalidOrigin("x".into()),
        ] {
            assert!(err.status_and_message().0.is_client_error(), "{err}");
        }
    }

    #[test]
    fn test_tenant_mismatch_nunca_e_forbidden() {
        let (status, _) = AppError::TenantMismatch.status_and_message();
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_item_indisponivel_e_404() {
        let response = AppError::ItemUnavailable.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_erro_de_banco_vira_500() {
        let response = AppError::DatabaseError(sqlx::Error::RowNotFound).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
