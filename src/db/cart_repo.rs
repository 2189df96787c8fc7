// src/db/cart_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;
use crate::{
    common::error::AppError,
    models::{cart::CartItem, catalog::ItemRef, checkout::QUANTIDADE_MAXIMA},
};

// O carrinho só é escrito pelo próprio cliente e pela limpeza final do checkout.
#[derive(Clone)]
pub struct CartRepository {
    pool: PgPool,
}

impl CartRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_for_cliente<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        cliente_id: Uuid,
    ) -> Result<Vec<CartItem>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let itens = sqlx::query_as::<_, CartItem>(
            r#"
            SELECT * FROM cart_items
            WHERE tenant_id = $1 AND cliente_id = $2
            ORDER BY created_at ASC, id ASC
            "#,
        )
            .bind(tenant_id)
            .bind(cliente_id)
            .fetch_all(executor)
            .await?;
        Ok(itens)
    }

    /// "UPSERT": adições repetidas somam a quantidade e renovam o preço.
    /// Se a soma passar de `QUANTIDADE_MAXIMA` a linha fica como estava e o erro é do cliente.
    pub async fn upsert_item<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        cliente_id: Uuid,
        item: ItemRef,
        quantidade: i32,
        preco_unitario: Decimal,
    ) -> Result<CartItem, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        // A soma é feita em BIGINT para não estourar o INTEGER antes da comparação.
        let cart_item = sqlx::query_as::<_, CartItem>(
            r#"
            INSERT INTO cart_items (tenant_id, cliente_id, tipo, ref_id, quantidade, preco_unitario)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (cliente_id, tenant_id, tipo, ref_id)
            DO UPDATE SET
                quantidade = cart_items.quantidade + EXCLUDED.quantidade,
                preco_unitario = EXCLUDED.preco_unitario,
                updated_at = NOW()
            WHERE cart_items.quantidade::BIGINT + EXCLUDED.quantidade::BIGINT <= $7
            RETURNING *
            "#,
        )
            .bind(tenant_id)
            .bind(cliente_id)
            .bind(item.tipo())
            .bind(item.ref_id())
            .bind(quantidade)
            .bind(preco_unitario)
            .bind(i64::from(QUANTIDADE_MAXIMA))
            .fetch_optional(executor)
            .await?;

        cart_item.ok_or(AppError::QuantidadeExcessiva)
    }

    pub async fn update_quantidade(
        &self,
        tenant_id: Uuid,
        cliente_id: Uuid,
        item_id: Uuid,
        quantidade: i32,
    ) -> Result<Option<CartItem>, AppError> {
        let cart_item = sqlx::query_as::<_, CartItem>(
            r#"
            UPDATE cart_items
            SET quantidade = $4, updated_at = NOW()
            WHERE id = $1 AND tenant_id = $2 AND cliente_id = $3
            RETURNING *
            "#,
        )
            .bind(item_id)
            .bind(tenant_id)
            .bind(cliente_id)
            .bind(quantidade)
            .fetch_optional(&self.pool)
            .await?;
        Ok(cart_item)
    }

    pub async fn delete_item(
        &self,
        tenant_id: Uuid,
        cliente_id: Uuid,
        item_id: Uuid,
    ) -> Result<bool, AppError> {
        let result = sqlx::query(
            "DELETE FROM cart_items WHERE id = $1 AND tenant_id = $2 AND cliente_id = $3",
        )
            .bind(item_id)
            .bind(tenant_id)
            .bind(cliente_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Apaga o carrinho inteiro do cliente neste tenant.
    pub async fn clear_for_cliente<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        cliente_id: Uuid,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM cart_items WHERE tenant_id = $1 AND cliente_id = $2")
            .bind(tenant_id)
            .bind(cliente_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }
}
