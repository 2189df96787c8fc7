// src/test_support.rs
// Dados de teste gravados direto no banco (testes com #[sqlx::test]).

use rust_decimal::Decimal;
use sqlx::PgPool;
use std::str::FromStr;
use uuid::Uuid;

use crate::models::{auth::UserRole, cliente::Cliente};

pub fn dec(valor: &str) -> Decimal {
    Decimal::from_str(valor).unwrap()
}

pub async fn tenant(pool: &PgPool, slug: &str) -> Uuid {
    sqlx::query_scalar("INSERT INTO tenants (nome, slug) VALUES ($1, $1) RETURNING id")
        .bind(slug)
        .fetch_one(pool)
        .await
        .unwrap()
}

pub async fn user(pool: &PgPool, tenant_id: Uuid, email: &str, role: UserRole) -> Uuid {
    let hash = bcrypt::hash("segredo123", 4).unwrap();
    sqlx::query_scalar(
        "INSERT INTO users (tenant_id, email, password_hash, role) VALUES ($1, $2, $3, $4) RETURNING id",
    )
        .bind(tenant_id)
        .bind(email)
        .bind(hash)
        .bind(role)
        .fetch_one(pool)
        .await
        .unwrap()
}

pub async fn cliente(pool: &PgPool, tenant_id: Uuid, email: &str) -> Cliente {
    let user_id = user(pool, tenant_id, email, UserRole::Cliente).await;
    sqlx::query_as::<_, Cliente>(
        r#"
        INSERT INTO clientes (tenant_id, user_id, nome, email, telefone)
        VALUES ($1, $2, 'Ana Silva', $3, '+351910000000')
        RETURNING *
        "#,
    )
        .bind(tenant_id)
        .bind(user_id)
        .bind(email)
        .fetch_one(pool)
        .await
        .unwrap()
}

pub async fn merchant(pool: &PgPool, tenant_id: Uuid, owner_id: Option<Uuid>) -> Uuid {
    sqlx::query_scalar(
        "INSERT INTO merchants (tenant_id, nome, slug, owner_id) VALUES ($1, 'Loja', 'loja', $2) RETURNING id",
    )
        .bind(tenant_id)
        .bind(owner_id)
        .fetch_one(pool)
        .await
        .unwrap()
}

pub async fn produto(
    pool: &PgPool,
    tenant_id: Uuid,
    merchant_id: Uuid,
    preco: &str,
    stock: i32,
) -> Uuid {
    sqlx::query_scalar(
        r#"
        INSERT INTO produtos (tenant_id, merchant_id, nome, preco, stock_atual)
        VALUES ($1, $2, 'Produto A', $3, $4)
        RETURNING id
        "#,
    )
        .bind(tenant_id)
        .bind(merchant_id)
        .bind(dec(preco))
        .bind(stock)
        .fetch_one(pool)
        .await
        .unwrap()
}

pub async fn servico(pool: &PgPool, tenant_id: Uuid, preco: &str) -> Uuid {
    let prestador_id: Uuid = sqlx::query_scalar(
        "INSERT INTO prestadores (tenant_id, nome) VALUES ($1, 'Prestador') RETURNING id",
    )
        .bind(tenant_id)
        .fetch_one(pool)
        .await
        .unwrap();

    sqlx::query_scalar(
        "INSERT INTO servicos (tenant_id, prestador_id, nome, preco) VALUES ($1, $2, 'Servico B', $3) RETURNING id",
    )
        .bind(tenant_id)
        .bind(prestador_id)
        .bind(dec(preco))
        .fetch_one(pool)
        .await
        .unwrap()
}

pub async fn endereco(pool: &PgPool, tenant_id: Uuid, cliente_id: Uuid, cidade: &str) -> Uuid {
    sqlx::query_scalar(
        r#"
        INSERT INTO cliente_enderecos (tenant_id, cliente_id, linha1, cidade, codigo_postal, pais)
        VALUES ($1, $2, 'Rua 123', $3, '1000-000', 'PT')
        RETURNING id
        "#,
    )
        .bind(tenant_id)
        .bind(cliente_id)
        .bind(cidade)
        .fetch_one(pool)
        .await
        .unwrap()
}

pub async fn stock(pool: &PgPool, produto_id: Uuid) -> i32 {
    sqlx::query_scalar("SELECT stock_atual FROM produtos WHERE id = $1")
        .bind(produto_id)
        .fetch_one(pool)
        .await
        .unwrap()
}

pub async fn contar(pool: &PgPool, tabela: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {tabela}"))
        .fetch_one(pool)
        .await
        .unwrap()
}
