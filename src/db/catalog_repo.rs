// src/db/catalog_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;
use crate::{
    common::error::AppError,
    models::catalog::{Merchant, Produto, ServicoOferta},
};

#[derive(Clone)]
pub struct CatalogRepository {
    pool: PgPool,
}

impl CatalogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---
    // Leituras de catálogo (sempre filtradas por tenant)
    // ---

    pub async fn find_produto<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        produto_id: Uuid,
    ) -> Result<Option<Produto>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let produto = sqlx::query_as::<_, Produto>(
            "SELECT * FROM produtos WHERE id = $1 AND tenant_id = $2",
        )
            .bind(produto_id)
            .bind(tenant_id)
            .fetch_optional(executor)
            .await?;
        Ok(produto)
    }

    /// Lê o produto com `FOR UPDATE`. Dentro da transação do checkout a linha fica
    /// bloqueada até ao commit/rollback: dois checkouts do mesmo produto serializam aqui.
    pub async fn lock_produto<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        produto_id: Uuid,
    ) -> Result<Option<Produto>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let produto = sqlx::query_as::<_, Produto>(
            "SELECT * FROM produtos WHERE id = $1 AND tenant_id = $2 FOR UPDATE",
        )
            .bind(produto_id)
            .bind(tenant_id)
            .fetch_optional(executor)
            .await?;
        Ok(produto)
    }

    /// Bloqueia vários produtos de uma vez, sempre por ordem de `id`.
    /// Dois checkouts com os mesmos produtos em ordens diferentes pedem os
    /// bloqueios na mesma sequência e não entram em deadlock.
    pub async fn lock_produtos<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        produto_ids: &[Uuid],
    ) -> Result<Vec<Uuid>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let bloqueados = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT id FROM produtos
            WHERE tenant_id = $1 AND id = ANY($2)
            ORDER BY id
            FOR UPDATE
            "#,
        )
            .bind(tenant_id)
            .bind(produto_ids)
            .fetch_all(executor)
            .await?;
        Ok(bloqueados)
    }

    /// Serviço + estado do prestador dono (o prestador tem de ser do mesmo tenant).
    pub async fn find_servico_oferta<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        servico_id: Uuid,
    ) -> Result<Option<ServicoOferta>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let oferta = sqlx::query_as::<_, ServicoOferta>(
            r#"
            SELECT
                s.id, s.prestador_id, s.categoria_id,
                s.nome, s.preco, s.ativo,
                p.ativo AS prestador_ativo
            FROM servicos s
            JOIN prestadores p ON p.id = s.prestador_id AND p.tenant_id = s.tenant_id
            WHERE s.id = $1 AND s.tenant_id = $2
            "#,
        )
            .bind(servico_id)
            .bind(tenant_id)
            .fetch_optional(executor)
            .await?;
        Ok(oferta)
    }

    /// Baixa de stock condicional, atómica por linha.
    /// Devolve `false` quando a condição falha (stock insuficiente sem backorder).
    pub async fn decrement_stock<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        produto_id: Uuid,
        quantidade: i32,
    ) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            r#"
            UPDATE produtos
            SET stock_atual = stock_atual - $3, updated_at = NOW()
            WHERE id = $1 AND tenant_id = $2
              AND (permitir_backorder OR stock_atual >= $3)
            "#,
        )
            .bind(produto_id)
            .bind(tenant_id)
            .bind(quantidade)
            .execute(executor)
            .await?;

        Ok(result.rows_affected() == 1)
    }

    // ---
    // Merchants
    // ---

    pub async fn find_merchant_by_owner(
        &self,
        tenant_id: Uuid,
        owner_id: Uuid,
    ) -> Result<Option<Merchant>, AppError> {
        let merchant = sqlx::query_as::<_, Merchant>(
            "SELECT * FROM merchants WHERE tenant_id = $1 AND owner_id = $2 LIMIT 1",
        )
            .bind(tenant_id)
            .bind(owner_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(merchant)
    }
}
