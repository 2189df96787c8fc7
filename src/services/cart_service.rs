// src/services/cart_service.rs

use sqlx::{Acquire, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::CartRepository,
    models::{cart::CartItem, catalog::ItemRef, checkout::QUANTIDADE_MAXIMA},
    services::pricing_service::PricingService,
};

#[derive(Clone)]
pub struct CartService {
    cart_repo: CartRepository,
    pricing: PricingService,
    pool: PgPool,
}

impl CartService {
    pub fn new(cart_repo: CartRepository, pricing: PricingService, pool: PgPool) -> Self {
        Self { cart_repo, pricing, pool }
    }

    pub async fn list_items(&self, tenant_id: Uuid, cliente_id: Uuid) -> Result<Vec<CartItem>, AppError> {
        self.cart_repo.list_for_cliente(&self.pool, tenant_id, cliente_id).await
    }

    /// Adiciona ou soma. O preço guardado é sempre o do catálogo (referência);
    /// o checkout volta a revalidá-lo.
    pub async fn add_item<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        cliente_id: Uuid,
        item: ItemRef,
        quantidade: i32,
    ) -> Result<CartItem, AppError>
    where
        E: Acquire<'e, Database = Postgres>,
    {
        if quantidade > QUANTIDADE_MAXIMA {
            return Err(AppError::QuantidadeExcessiva);
        }
        let mut tx = executor.begin().await?;

        let preco = self.pricing.reference_price(&mut tx, tenant_id, item).await?;
        let cart_item = self.cart_repo
            .upsert_item(&mut *tx, tenant_id, cliente_id, item, quantidade, preco)
            .await?;

        tx.commit().await?;
        Ok(cart_item)
    }

    pub async fn update_quantidade(
        &self,
        tenant_id: Uuid,
        cliente_id: Uuid,
        item_id: Uuid,
        quantidade: i32,
    ) -> Result<CartItem, AppError> {
        if quantidade > QUANTIDADE_MAXIMA {
            return Err(AppError::QuantidadeExcessiva);
        }
        self.cart_repo
            .update_quantidade(tenant_id, cliente_id, item_id, quantidade)
            .await?
            .ok_or(AppError::CartItemNotFound)
    }

    pub async fn remove_item(&self, tenant_id: Uuid, cliente_id: Uuid, item_id: Uuid) -> Result<(), AppError> {
        let apagado = self.cart_repo
            .delete_item(tenant_id, cliente_id, item_id)
            .await?;
        if !apagado {
            return Err(AppError::CartItemNotFound);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{db::CatalogRepository, test_support::{self as ts, dec}};

    fn service(pool: &PgPool) -> CartService {
        CartService::new(
            CartRepository::new(pool.clone()),
            PricingService::new(CatalogRepository::new(pool.clone())),
            pool.clone(),
        )
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "precisa de DATABASE_URL"]
    async fn test_adicionar_duas_vezes_soma_a_quantidade(pool: PgPool) {
        let tenant_id = ts::tenant(&pool, "t").await;
        let cliente = ts::cliente(&pool, tenant_id, "c@example.com").await;
        let merchant_id = ts::merchant(&pool, tenant_id, None).await;
        let produto_id = ts::produto(&pool, tenant_id, merchant_id, "10.00", 1).await;
        let svc = service(&pool);

        svc.add_item(&pool, tenant_id, cliente.id, ItemRef::Produto(produto_id), 2).await.unwrap();
        let item = svc.add_item(&pool, tenant_id, cliente.id, ItemRef::Produto(produto_id), 3).await.unwrap();

        // O carrinho não olha para o stock.
        assert_eq!(item.quantidade, 5);
        assert_eq!(item.preco_unitario, dec("10.00"));
        assert_eq!(svc.list_items(tenant_id, cliente.id).await.unwrap().len(), 1);
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "precisa de DATABASE_URL"]
    async fn test_soma_acima_do_maximo_e_recusada(pool: PgPool) {
        let tenant_id = ts::tenant(&pool, "t").await;
        let cliente = ts::cliente(&pool, tenant_id, "c@example.com").await;
        let servico_id = ts::servico(&pool, tenant_id, "25.00").await;
        let svc = service(&pool);

        let item = svc.add_item(&pool, tenant_id, cliente.id, ItemRef::Servico(servico_id), 9999).await.unwrap();

        let err = svc.add_item(&pool, tenant_id, cliente.id, ItemRef::Servico(servico_id), 1).await.unwrap_err();
        assert!(matches!(err, AppError::QuantidadeExcessiva));
        let err = svc.add_item(&pool, tenant_id, cliente.id, ItemRef::Servico(servico_id), i32::MAX).await.unwrap_err();
        assert!(matches!(err, AppError::QuantidadeExcessiva));
        let err = svc.update_quantidade(tenant_id, cliente.id, item.id, 10_000).await.unwrap_err();
        assert!(matches!(err, AppError::QuantidadeExcessiva));

        let itens = svc.list_items(tenant_id, cliente.id).await.unwrap();
        assert_eq!(itens.len(), 1);
        assert_eq!(itens[0].quantidade, 9999);
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "precisa de DATABASE_URL"]
    async fn test_item_inexistente_nao_entra_no_carrinho(pool: PgPool) {
        let tenant_id = ts::tenant(&pool, "t").await;
        let cliente = ts::cliente(&pool, tenant_id, "c@example.com").await;

        let err = service(&pool)
            .add_item(&pool, tenant_id, cliente.id, ItemRef::Servico(Uuid::new_v4()), 1)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ItemUnavailable));
        assert_eq!(ts::contar(&pool, "cart_items").await, 0);
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "precisa de DATABASE_URL"]
    async fn test_item_de_outro_cliente_e_404(pool: PgPool) {
        let tenant_id = ts::tenant(&pool, "t").await;
        let dono = ts::cliente(&pool, tenant_id, "d@example.com").await;
        let outro = ts::cliente(&pool, tenant_id, "o@example.com").await;
        let servico_id = ts::servico(&pool, tenant_id, "25.00").await;
        let svc = service(&pool);

        let item = svc.add_item(&pool, tenant_id, dono.id, ItemRef::Servico(servico_id), 1).await.unwrap();

        let err = svc.update_quantidade(tenant_id, outro.id, item.id, 4).await.unwrap_err();
        assert!(matches!(err, AppError::CartItemNotFound));
        let err = svc.remove_item(tenant_id, outro.id, item.id).await.unwrap_err();
        assert!(matches!(err, AppError::CartItemNotFound));

        svc.remove_item(tenant_id, dono.id, item.id).await.unwrap();
        assert!(svc.list_items(tenant_id, dono.id).await.unwrap().is_empty());
    }
}
