// src/services/assembly.rs

use rust_decimal::Decimal;

use crate::{
    common::error::AppError,
    models::{
        checkout::{ItemPedidoDraft, PedidoDraft, ResolvedLine},
        cliente::{Cliente, EnderecoSnapshot},
    },
};

/// Monta o pedido em memória a partir das linhas já revalidadas.
///
/// Toda a aritmética é em `Decimal`. `total` é igual a `subtotal`: não há
/// impostos, descontos nem portes.
pub fn montar_pedido(
    cliente: &Cliente,
    linhas: Vec<ResolvedLine>,
    endereco: EnderecoSnapshot,
) -> Result<PedidoDraft, AppError> {
    if linhas.is_empty() {
        return Err(AppError::EmptyCart);
    }

    let itens: Vec<ItemPedidoDraft> = linhas
        .into_iter()
        .enumerate()
        .map(|(posicao, linha)| ItemPedidoDraft {
            posicao: posicao as i32,
            item: linha.item,
            quantidade: linha.quantidade,
            preco_unitario: linha.preco_unitario,
            total_linha: linha.preco_unitario * Decimal::from(linha.quantidade),
            nome_snapshot: linha.nome_snapshot,
            merchant_id: linha.merchant_id,
            prestador_id: linha.prestador_id,
            categoria_id_snapshot: linha.categoria_id_snapshot,
        })
        .collect();

    let subtotal: Decimal = itens.iter().map(|i| i.total_linha).sum();

    Ok(PedidoDraft {
        cliente_id: cliente.id,
        subtotal,
        total: subtotal,
        cliente_nome_snapshot: cliente.nome.clone(),
        cliente_email_snapshot: cliente.email.clone(),
        cliente_telefone_snapshot: cliente.telefone.clone(),
        endereco_entrega_snapshot: endereco,
        itens,
    })
}
