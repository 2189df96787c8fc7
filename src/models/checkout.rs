// src/models/checkout.rs

use rust_decimal::Decimal;
use std::fmt;
use uuid::Uuid;

use crate::models::{
    catalog::ItemRef,
    cliente::EnderecoSnapshot,
    pedido::PedidoOrigem,
};

/// Teto por linha (carrinho e checkout). Com preços em NUMERIC(10,2) o total
/// de uma linha cabe sempre em NUMERIC(14,2).
pub const QUANTIDADE_MAXIMA: i32 = 9999;

/// Item a revalidar, vindo do payload ou do carrinho guardado.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CandidateItem {
    pub item: ItemRef,
    pub quantidade: i32,
}

/// Resultado da revalidação de um item: preço lido do catálogo, nunca do cliente.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedLine {
    pub item: ItemRef,
    pub quantidade: i32,
    pub preco_unitario: Decimal,
    pub nome_snapshot: String,
    pub merchant_id: Option<Uuid>,
    pub prestador_id: Option<Uuid>,
    pub categoria_id_snapshot: Option<Uuid>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ItemPedidoDraft {
    pub posicao: i32,
    pub item: ItemRef,
    pub quantidade: i32,
    pub preco_unitario: Decimal,
    pub total_linha: Decimal,
    pub nome_snapshot: String,
    pub merchant_id: Option<Uuid>,
    pub prestador_id: Option<Uuid>,
    pub categoria_id_snapshot: Option<Uuid>,
}

/// Pedido montado em memória, ainda não persistido.
#[derive(Debug, Clone, PartialEq)]
pub struct PedidoDraft {
    pub cliente_id: Uuid,
    pub subtotal: Decimal,
    pub total: Decimal,
    pub cliente_nome_snapshot: String,
    pub cliente_email_snapshot: String,
    pub cliente_telefone_snapshot: String,
    pub endereco_entrega_snapshot: EnderecoSnapshot,
    pub itens: Vec<ItemPedidoDraft>,
}

/// Campos de pagamento/origem que o chamador fornece e que só são gravados.
#[derive(Debug, Clone, Default)]
pub struct CheckoutMeta {
    pub origem: PedidoOrigem,
    pub metodo_pagamento: Option<String>,
    pub estado_pagamento: Option<String>,
}

/// Estados do checkout. Qualquer falha leva a `Aborted` e nada é gravado.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutStage {
    Collecting,
    Pricing,
    Assembling,
    Persisting,
    Committed,
    Aborted,
}

impl fmt::Display for CheckoutStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CheckoutStage::Collecting => "collecting",
            CheckoutStage::Pricing => "pricing",
            CheckoutStage::Assembling => "assembling",
            CheckoutStage::Persisting => "persisting",
            CheckoutStage::Committed => "committed",
            CheckoutStage::Aborted => "aborted",
        };
        f.write_str(label)
    }
}
