// src/services/pricing_service.rs

use rust_decimal::Decimal;
use sqlx::PgConnection;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::CatalogRepository,
    models::{
        catalog::{ItemRef, Produto, ServicoOferta},
        checkout::{CandidateItem, ResolvedLine},
    },
};

// ---
// Regras puras (sem banco)
// ---

/// Inexistente, inativo ou indisponível dão o mesmo erro: não se revela qual foi.
pub fn produto_vendavel(produto: Option<Produto>) -> Result<Produto, AppError> {
    match produto {
        Some(p) if p.ativo && p.disponivel => Ok(p),
        _ => Err(AppError::ItemUnavailable),
    }
}

pub fn verificar_stock(produto: &Produto, quantidade: i32) -> Result<(), AppError> {
    if !produto.permitir_backorder && produto.stock_atual < quantidade {
        return Err(AppError::InsufficientStock);
    }
    Ok(())
}

/// O serviço e o prestador dono têm de estar ativos.
pub fn servico_vendavel(oferta: Option<ServicoOferta>) -> Result<ServicoOferta, AppError> {
    match oferta {
        Some(s) if s.ativo && s.prestador_ativo => Ok(s),
        _ => Err(AppError::ItemUnavailable),
    }
}

/// Produtos distintos de um checkout, ordenados: a ordem em que se pedem os bloqueios.
pub fn produtos_a_bloquear(candidatos: &[CandidateItem]) -> Vec<Uuid> {
    let mut ids: Vec<Uuid> = candidatos
        .iter()
        .filter_map(|c| match c.item {
            ItemRef::Produto(id) => Some(id),
            ItemRef::Servico(_) => None,
        })
        .collect();
    ids.sort();
    ids.dedup();
    ids
}

fn linha_de_produto(produto: Produto, quantidade: i32) -> ResolvedLine {
    ResolvedLine {
        item: ItemRef::Produto(produto.id),
        quantidade,
        preco_unitario: produto.preco,
        nome_snapshot: produto.nome,
        merchant_id: Some(produto.merchant_id),
        prestador_id: None,
        categoria_id_snapshot: produto.categoria_id,
    }
}

fn linha_de_servico(oferta: ServicoOferta, quantidade: i32) -> ResolvedLine {
    ResolvedLine {
        item: ItemRef::Servico(oferta.id),
        quantidade,
        preco_unitario: oferta.preco,
        nome_snapshot: oferta.nome,
        merchant_id: None,
        prestador_id: Some(oferta.prestador_id),
        categoria_id_snapshot: oferta.categoria_id,
    }
}

#[derive(Clone)]
pub struct PricingService {
    catalog_repo: CatalogRepository,
}

impl PricingService {
    pub fn new(catalog_repo: CatalogRepository) -> Self {
        Self { catalog_repo }
    }

    /// Bloqueia de uma vez todos os produtos do checkout, antes de os revalidar.
    /// Produtos que não existem neste tenant são ignorados aqui; `resolve` rejeita-os.
    pub async fn lock_candidatos(
        &self,
        conn: &mut PgConnection,
        tenant_id: Uuid,
        candidatos: &[CandidateItem],
    ) -> Result<(), AppError> {
        let ids = produtos_a_bloquear(candidatos);
        if ids.is_empty() {
            return Ok(());
        }

        let bloqueados = self.catalog_repo.lock_produtos(conn, tenant_id, &ids).await?;
        tracing::debug!(produtos = bloqueados.len(), "Produtos bloqueados");
        Ok(())
    }

    /// Revalida um item dentro da transação do checkout.
    ///
    /// Produtos: a linha fica bloqueada (`FOR UPDATE`) e a baixa de stock é feita
    /// com um UPDATE condicional. As duas coisas juntas impedem o oversell quando
    /// dois checkouts disputam o mesmo produto. A baixa só fica durável no commit.
    /// No checkout os bloqueios já foram tomados por `lock_candidatos`.
    pub async fn resolve(
        &self,
        conn: &mut PgConnection,
        tenant_id: Uuid,
        candidato: &CandidateItem,
    ) -> Result<ResolvedLine, AppError> {
        match candidato.item {
            ItemRef::Produto(produto_id) => {
                let produto = self.catalog_repo
                    .lock_produto(&mut *conn, tenant_id, produto_id)
                    .await?;
                let produto = produto_vendavel(produto)?;
                verificar_stock(&produto, candidato.quantidade)?;

                let baixou = self.catalog_repo
                    .decrement_stock(&mut *conn, tenant_id, produto_id, candidato.quantidade)
                    .await?;
                if !baixou {
                    return Err(AppError::InsufficientStock);
                }

                Ok(linha_de_produto(produto, candidato.quantidade))
            }
            ItemRef::Servico(servico_id) => {
                let oferta = self.catalog_repo
                    .find_servico_oferta(&mut *conn, tenant_id, servico_id)
                    .await?;
                let oferta = servico_vendavel(oferta)?;
                Ok(linha_de_servico(oferta, candidato.quantidade))
            }
        }
    }

    /// Preço de referência para o carrinho: mesmas regras, sem stock nem bloqueio.
    pub async fn reference_price(
        &self,
        conn: &mut PgConnection,
        tenant_id: Uuid,
        item: ItemRef,
    ) -> Result<Decimal, AppError> {
        match item {
            ItemRef::Produto(produto_id) => {
                let produto = self.catalog_repo.find_produto(conn, tenant_id, produto_id).await?;
                Ok(produto_vendavel(produto)?.preco)
            }
            ItemRef::Servico(servico_id) => {
                let oferta = self.catalog_repo
                    .find_servico_oferta(conn, tenant_id, servico_id)
                    .await?;
                Ok(servico_vendavel(oferta)?.preco)
            }
        }
    }
}
