//src/main.rs

use axum::{
    middleware as axum_middleware,
    routing::{delete, get, patch, post},
    Router,
};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;
#[cfg(test)]
mod test_support;

use crate::config::AppState;
use crate::docs::ApiDoc;
use crate::middleware::{auth::auth_guard, tenancy::tenant_guard};

fn app(app_state: AppState) -> Router {
    // Rotas públicas de autenticação
    let auth_routes = Router::new()
        .route("/login", post(handlers::auth::login));

    // Só precisam do utilizador
    let user_routes = Router::new()
        .route("/me", get(handlers::auth::get_me))
        .route_layer(axum_middleware::from_fn_with_state(app_state.clone(), auth_guard));

    // Utilizador + tenant. O último layer corre primeiro: auth antes de tenant.
    let tenant_routes = Router::new()
        .route("/checkout", post(handlers::checkout::checkout))
        .route("/me/carrinho", get(handlers::carrinho::list_cart))
        .route("/me/carrinho/itens", post(handlers::carrinho::add_cart_item))
        .route(
            "/me/carrinho/itens/{item_id}",
            patch(handlers::carrinho::update_cart_item)
                .delete(handlers::carrinho::remove_cart_item),
        )
        .route(
            "/me/enderecos",
            get(handlers::enderecos::list_enderecos)
                .post(handlers::enderecos::create_endereco),
        )
        .route(
            "/me/enderecos/{endereco_id}",
            delete(handlers::enderecos::delete_endereco),
        )
        .route("/merchant/pedidos", get(handlers::pedidos::list_pedidos))
        .route("/merchant/pedidos/{pedido_id}", get(handlers::pedidos::get_pedido))
        .route_layer(axum_middleware::from_fn_with_state(app_state.clone(), tenant_guard))
        .route_layer(axum_middleware::from_fn_with_state(app_state.clone(), auth_guard));

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/auth", auth_routes)
        .nest("/api/users", user_routes)
        .nest("/api", tenant_routes)
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // RUST_LOG controla o nível; por omissão "info".
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    let app_state = AppState::new().await?;

    // Faz o app rodar as migrações do SQLx na inicialização
    sqlx::migrate!().run(&app_state.db_pool).await?;
    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    let listener = TcpListener::bind(&app_state.server_addr).await?;
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr()?);

    axum::serve(listener, app(app_state)).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use sqlx::{postgres::PgPoolOptions, PgPool};
    use tower::ServiceExt;
    use uuid::Uuid;

    use crate::{models::auth::UserRole, test_support as ts};

    // Pool "lazy": não abre ligação enquanto nenhuma query correr.
    fn state() -> AppState {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/nao_usado")
            .unwrap();
        AppState::from_pool(pool, "segredo".into(), "127.0.0.1:0".into())
    }

    #[tokio::test]
    async fn test_health() {
        let response = app(state())
            .oneshot(Request::builder().uri("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_checkout_sem_token_e_401() {
        let response = app(state())
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/checkout")
                    .header("content-type", "application/json")
                    .header("x-tenant-id", "lisboa")
                    .body(Body::from("{}"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_token_invalido_e_401() {
        let response = app(state())
            .oneshot(
                Request::builder()
                    .uri("/api/me/carrinho")
                    .header("authorization", "Bearer nao-e-um-jwt")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    // ---
    // Guard de tenant (com banco)
    // ---

    fn state_com_banco(pool: &PgPool) -> AppState {
        AppState::from_pool(pool.clone(), "segredo".into(), "127.0.0.1:0".into())
    }

    async fn pedir(
        app_state: AppState,
        metodo: &str,
        uri: &str,
        token: &str,
        tenant: Option<&str>,
        corpo: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut request = Request::builder()
            .method(metodo)
            .uri(uri)
            .header("authorization", format!("Bearer {token}"));
        if let Some(tenant) = tenant {
            request = request.header("x-tenant-id", tenant);
        }
        let body = match corpo {
            Some(corpo) => {
                request = request.header("content-type", "application/json");
                Body::from(corpo.to_string())
            }
            None => Body::empty(),
        };

        let response = app(app_state).oneshot(request.body(body).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "precisa de DATABASE_URL"]
    async fn test_sem_cabecalho_de_tenant_e_400(pool: PgPool) {
        let tenant_id = ts::tenant(&pool, "lisboa").await;
        let cliente = ts::cliente(&pool, tenant_id, "c@example.com").await;
        let app_state = state_com_banco(&pool);
        let token = app_state.auth_service.create_token(cliente.user_id).unwrap();

        let (status, _) = pedir(app_state.clone(), "GET", "/api/me/carrinho", &token, None, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = pedir(app_state, "GET", "/api/me/carrinho", &token, Some(""), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "precisa de DATABASE_URL"]
    async fn test_tenant_desconhecido_ou_inativo_e_404(pool: PgPool) {
        let tenant_id = ts::tenant(&pool, "lisboa").await;
        let cliente = ts::cliente(&pool, tenant_id, "c@example.com").await;
        let app_state = state_com_banco(&pool);
        let token = app_state.auth_service.create_token(cliente.user_id).unwrap();

        let desconhecido = Uuid::new_v4().to_string();
        for tenant in ["porto", desconhecido.as_str()] {
            let (status, _) = pedir(app_state.clone(), "GET", "/api/me/carrinho", &token, Some(tenant), None).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "tenant {tenant}");
        }

        sqlx::query("UPDATE tenants SET ativo = false WHERE id = $1")
            .bind(tenant_id)
            .execute(&pool)
            .await
            .unwrap();
        let (status, _) = pedir(app_state, "GET", "/api/me/carrinho", &token, Some("lisboa"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "precisa de DATABASE_URL"]
    async fn test_utilizador_de_outro_tenant_e_404(pool: PgPool) {
        let lisboa = ts::tenant(&pool, "lisboa").await;
        ts::tenant(&pool, "porto").await;
        let cliente = ts::cliente(&pool, lisboa, "c@example.com").await;
        let app_state = state_com_banco(&pool);
        let token = app_state.auth_service.create_token(cliente.user_id).unwrap();

        let (status, _) = pedir(app_state, "GET", "/api/me/carrinho", &token, Some("porto"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "precisa de DATABASE_URL"]
    async fn test_superadmin_passa_o_guard_de_qualquer_tenant(pool: PgPool) {
        let lisboa = ts::tenant(&pool, "lisboa").await;
        ts::tenant(&pool, "porto").await;
        let admin_id = ts::user(&pool, lisboa, "admin@example.com", UserRole::Superadmin).await;
        let app_state = state_com_banco(&pool);
        let token = app_state.auth_service.create_token(admin_id).unwrap();

        // Passa o tenant; o carrinho é só para clientes.
        let (status, _) = pedir(app_state, "GET", "/api/me/carrinho", &token, Some("porto"), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "precisa de DATABASE_URL"]
    async fn test_tenant_por_slug_ou_uuid(pool: PgPool) {
        let tenant_id = ts::tenant(&pool, "lisboa").await;
        let cliente = ts::cliente(&pool, tenant_id, "c@example.com").await;
        let app_state = state_com_banco(&pool);
        let token = app_state.auth_service.create_token(cliente.user_id).unwrap();

        let por_uuid = tenant_id.to_string();
        for tenant in ["lisboa", por_uuid.as_str()] {
            let (status, corpo) = pedir(app_state.clone(), "GET", "/api/me/carrinho", &token, Some(tenant), None).await;
            assert_eq!(status, StatusCode::OK, "tenant {tenant}");
            assert_eq!(corpo, json!([]));
        }
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "precisa de DATABASE_URL"]
    async fn test_checkout_de_ponta_a_ponta(pool: PgPool) {
        let tenant_id = ts::tenant(&pool, "lisboa").await;
        let cliente = ts::cliente(&pool, tenant_id, "c@example.com").await;
        let servico_id = ts::servico(&pool, tenant_id, "25.00").await;
        let app_state = state_com_banco(&pool);
        let token = app_state.auth_service.create_token(cliente.user_id).unwrap();

        let corpo = json!({
            "itens": [{"tipo": "servico", "ref_id": servico_id, "quantidade": 2}],
            "origem": "MOBILE"
        });
        let (status, pedido) = pedir(app_state, "POST", "/api/checkout", &token, Some("lisboa"), Some(corpo)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(pedido["total"].as_f64(), Some(50.0));
        assert_eq!(pedido["origem"], json!("MOBILE"));
        assert_eq!(pedido["itens"].as_array().map(Vec::len), Some(1));
        assert_eq!(ts::contar(&pool, "pedidos").await, 1);
    }
}
