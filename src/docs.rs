// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::login,

        // --- Users ---
        handlers::auth::get_me,

        // --- Checkout ---
        handlers::checkout::checkout,

        // --- Carrinho ---
        handlers::carrinho::list_cart,
        handlers::carrinho::add_cart_item,
        handlers::carrinho::update_cart_item,
        handlers::carrinho::remove_cart_item,

        // --- Endereços ---
        handlers::enderecos::list_enderecos,
        handlers::enderecos::create_endereco,
        handlers::enderecos::delete_endereco,

        // --- Merchant ---
        handlers::pedidos::list_pedidos,
        handlers::pedidos::get_pedido,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::UserRole,
            models::auth::User,
            models::auth::LoginUserPayload,
            models::auth::AuthResponse,

            // --- Catálogo / Carrinho ---
            models::catalog::ItemTipo,
            models::cart::CartItem,

            // --- Cliente ---
            models::cliente::ClienteEndereco,
            models::cliente::EnderecoEntrega,

            // --- Pedidos ---
            models::pedido::PedidoStatus,
            models::pedido::PedidoOrigem,
            models::pedido::Pedido,
            models::pedido::ItemPedido,
            models::pedido::PedidoComItens,

            // --- Payloads ---
            handlers::checkout::CheckoutPayload,
            handlers::checkout::CheckoutItemPayload,
            handlers::carrinho::AddCartItemPayload,
            handlers::carrinho::UpdateCartItemPayload,
            handlers::enderecos::CreateEnderecoPayload,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação"),
        (name = "Users", description = "Dados do Usuário"),
        (name = "Checkout", description = "Criação de pedidos"),
        (name = "Carrinho", description = "Carrinho do cliente"),
        (name = "Endereços", description = "Endereços de entrega do cliente"),
        (name = "Merchant", description = "Pedidos vistos pelo merchant")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_documento_tem_rotas_de_checkout_e_seguranca() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/api/checkout"));
        assert!(doc.paths.paths.contains_key("/api/merchant/pedidos/{pedido_id}"));
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("api_jwt"));
    }
}
