// src/services/pedido_service.rs

use std::collections::HashMap;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::PedidoRepository,
    models::pedido::{ItemPedido, Pedido, PedidoComItens},
};

/// Junta cada pedido com as suas linhas, mantendo a ordem dos pedidos.
fn agrupar(pedidos: Vec<Pedido>, itens: Vec<ItemPedido>) -> Vec<PedidoComItens> {
    let mut por_pedido: HashMap<Uuid, Vec<ItemPedido>> = HashMap::new();
    for item in itens {
        por_pedido.entry(item.pedido_id).or_default().push(item);
    }

    pedidos
        .into_iter()
        .map(|pedido| {
            let mut itens = por_pedido.remove(&pedido.id).unwrap_or_default();
            itens.sort_by_key(|i| i.posicao);
            PedidoComItens { pedido, itens }
        })
        .collect()
}

// Vistas só de leitura para o merchant: apenas as suas linhas.
#[derive(Clone)]
pub struct PedidoService {
    pedido_repo: PedidoRepository,
}

impl PedidoService {
    pub fn new(pedido_repo: PedidoRepository) -> Self {
        Self { pedido_repo }
    }

    pub async fn list_for_merchant(
        &self,
        tenant_id: Uuid,
        merchant_id: Uuid,
    ) -> Result<Vec<PedidoComItens>, AppError> {
        let pedidos = self.pedido_repo.list_for_merchant(tenant_id, merchant_id).await?;
        if pedidos.is_empty() {
            return Ok(vec![]);
        }

        let ids: Vec<Uuid> = pedidos.iter().map(|p| p.id).collect();
        let itens = self.pedido_repo
            .list_itens_do_merchant(tenant_id, merchant_id, &ids)
            .await?;

        Ok(agrupar(pedidos, itens))
    }

    pub async fn get_for_merchant(
        &self,
        tenant_id: Uuid,
        merchant_id: Uuid,
        pedido_id: Uuid,
    ) -> Result<PedidoComItens, AppError> {
        let pedido = self.pedido_repo
            .find_for_merchant(tenant_id, merchant_id, pedido_id)
            .await?
            .ok_or(AppError::PedidoNotFound)?;

        let itens = self.pedido_repo
            .list_itens_do_merchant(tenant_id, merchant_id, &[pedido.id])
            .await?;

        Ok(PedidoComItens { pedido, itens })
    }
}
