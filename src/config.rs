// src/config.rs

use crate::{
    db::{
        CartRepository, CatalogRepository, ClienteRepository, PedidoRepository,
        TenantRepository, UserRepository,
    },
    services::{
        auth::AuthService,
        cart_service::CartService,
        checkout_service::CheckoutService,
        cliente_service::ClienteService,
        pedido_service::PedidoService,
        pricing_service::PricingService,
    },
};
use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::{env, time::Duration};

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub server_addr: String,

    pub tenant_repo: TenantRepository,
    pub catalog_repo: CatalogRepository,

    pub auth_service: AuthService,
    pub checkout_service: CheckoutService,
    pub cart_service: CartService,
    pub cliente_service: ClienteService,
    pub pedido_service: PedidoService,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").context("DATABASE_URL deve ser definida")?;
        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET deve ser definido")?;
        let max_connections = match env::var("DATABASE_MAX_CONNECTIONS") {
            Ok(valor) => valor
                .parse::<u32>()
                .context("DATABASE_MAX_CONNECTIONS deve ser um número")?,
            Err(_) => 5,
        };
        let server_addr = env::var("SERVER_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

        let db_pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await
            .context("Falha ao conectar ao banco de dados")?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        Ok(Self::from_pool(db_pool, jwt_secret, server_addr))
    }

    // --- Monta o gráfico de dependências ---
    pub fn from_pool(db_pool: PgPool, jwt_secret: String, server_addr: String) -> Self {
        let user_repo = UserRepository::new(db_pool.clone());
        let tenant_repo = TenantRepository::new(db_pool.clone());
        let catalog_repo = CatalogRepository::new(db_pool.clone());
        let cart_repo = CartRepository::new(db_pool.clone());
        let cliente_repo = ClienteRepository::new(db_pool.clone());
        let pedido_repo = PedidoRepository::new(db_pool.clone());

        let pricing = PricingService::new(catalog_repo.clone());
        let auth_service = AuthService::new(user_repo, jwt_secret);
        let checkout_service = CheckoutService::new(
            pricing.clone(),
            cart_repo.clone(),
            cliente_repo.clone(),
            pedido_repo.clone(),
        );
        let cart_service = CartService::new(cart_repo, pricing, db_pool.clone());
        let cliente_service = ClienteService::new(cliente_repo);
        let pedido_service = PedidoService::new(pedido_repo);

        Self {
            db_pool,
            server_addr,
            tenant_repo,
            catalog_repo,
            auth_service,
            checkout_service,
            cart_service,
            cliente_service,
            pedido_service,
        }
    }
}
