// src/db/pedido_repo.rs

use sqlx::{Executor, PgPool, Postgres, types::Json};
use uuid::Uuid;
use crate::{
    common::error::AppError,
    models::{
        checkout::{CheckoutMeta, ItemPedidoDraft, PedidoDraft},
        pedido::{ItemPedido, Pedido, PedidoStatus},
    },
};

#[derive(Clone)]
pub struct PedidoRepository {
    pool: PgPool,
}

impl PedidoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  ESCRITA (sempre dentro da transação do checkout)
    // =========================================================================

    pub async fn insert_pedido<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        draft: &PedidoDraft,
        meta: &CheckoutMeta,
    ) -> Result<Pedido, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let pedido = sqlx::query_as::<_, Pedido>(
            r#"
            INSERT INTO pedidos (
                tenant_id, cliente_id, subtotal, total, status, origem,
                metodo_pagamento, estado_pagamento,
                cliente_nome_snapshot, cliente_email_snapshot, cliente_telefone_snapshot,
                endereco_entrega_snapshot
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING *
            "#,
        )
            .bind(tenant_id)
            .bind(draft.cliente_id)
            .bind(draft.subtotal)
            .bind(draft.total)
            .bind(PedidoStatus::Criado)
            .bind(meta.origem)
            .bind(meta.metodo_pagamento.as_deref())
            .bind(meta.estado_pagamento.as_deref())
            .bind(&draft.cliente_nome_snapshot)
            .bind(&draft.cliente_email_snapshot)
            .bind(&draft.cliente_telefone_snapshot)
            .bind(Json(&draft.endereco_entrega_snapshot))
            .fetch_one(executor)
            .await?;
        Ok(pedido)
    }

    pub async fn insert_item<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        pedido_id: Uuid,
        item: &ItemPedidoDraft,
    ) -> Result<ItemPedido, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let item_pedido = sqlx::query_as::<_, ItemPedido>(
            r#"
            INSERT INTO itens_pedido (
                tenant_id, pedido_id, posicao, tipo, ref_id, quantidade,
                preco_unitario, total_linha, nome_snapshot,
                merchant_id, prestador_id, categoria_id_snapshot
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING *
            "#,
        )
            .bind(tenant_id)
            .bind(pedido_id)
            .bind(item.posicao)
            .bind(item.item.tipo())
            .bind(item.item.ref_id())
            .bind(item.quantidade)
            .bind(item.preco_unitario)
            .bind(item.total_linha)
            .bind(&item.nome_snapshot)
            .bind(item.merchant_id)
            .bind(item.prestador_id)
            .bind(item.categoria_id_snapshot)
            .fetch_one(executor)
            .await?;
        Ok(item_pedido)
    }

    // =========================================================================
    //  LEITURA (vistas de merchant, apenas pool)
    // =========================================================================

    /// Pedidos do tenant com pelo menos uma linha deste merchant.
    pub async fn list_for_merchant(
        &self,
        tenant_id: Uuid,
        merchant_id: Uuid,
    ) -> Result<Vec<Pedido>, AppError> {
        let pedidos = sqlx::query_as::<_, Pedido>(
            r#"
            SELECT p.* FROM pedidos p
            WHERE p.tenant_id = $1
              AND EXISTS (
                  SELECT 1 FROM itens_pedido i
                  WHERE i.pedido_id = p.id AND i.tenant_id = $1 AND i.merchant_id = $2
              )
            ORDER BY p.created_at DESC
            "#,
        )
            .bind(tenant_id)
            .bind(merchant_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(pedidos)
    }

    pub async fn find_for_merchant(
        &self,
        tenant_id: Uuid,
        merchant_id: Uuid,
        pedido_id: Uuid,
    ) -> Result<Option<Pedido>, AppError> {
        let pedido = sqlx::query_as::<_, Pedido>(
            r#"
            SELECT p.* FROM pedidos p
            WHERE p.id = $3 AND p.tenant_id = $1
              AND EXISTS (
                  SELECT 1 FROM itens_pedido i
                  WHERE i.pedido_id = p.id AND i.tenant_id = $1 AND i.merchant_id = $2
              )
            "#,
        )
            .bind(tenant_id)
            .bind(merchant_id)
            .bind(pedido_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(pedido)
    }

    /// Linhas do merchant para um conjunto de pedidos, na ordem original.
    pub async fn list_itens_do_merchant(
        &self,
        tenant_id: Uuid,
        merchant_id: Uuid,
        pedido_ids: &[Uuid],
    ) -> Result<Vec<ItemPedido>, AppError> {
        let itens = sqlx::query_as::<_, ItemPedido>(
            r#"
            SELECT * FROM itens_pedido
            WHERE tenant_id = $1 AND merchant_id = $2 AND pedido_id = ANY($3)
            ORDER BY pedido_id, posicao
            "#,
        )
            .bind(tenant_id)
            .bind(merchant_id)
            .bind(pedido_ids)
            .fetch_all(&self.pool)
            .await?;
        Ok(itens)
    }
}
