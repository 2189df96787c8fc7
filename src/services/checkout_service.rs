// src/services/checkout_service.rs

use sqlx::{Acquire, PgConnection, Postgres};
use tracing::Instrument;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{CartRepository, ClienteRepository, PedidoRepository},
    models::{
        cart::CartItem,
        checkout::{CandidateItem, CheckoutMeta, CheckoutStage, QUANTIDADE_MAXIMA},
        cliente::{Cliente, EnderecoSnapshot},
        pedido::PedidoComItens,
    },
    services::{assembly::montar_pedido, pricing_service::PricingService},
};

/// Pedido de checkout já convertido para tipos do domínio.
#[derive(Debug, Clone, Default)]
pub struct CheckoutRequest {
    /// Lista ad-hoc. Vazia ou ausente: usa o carrinho guardado.
    pub itens: Option<Vec<CandidateItem>>,
    pub endereco_id: Option<Uuid>,
    pub meta: CheckoutMeta,
}

fn candidato_do_carrinho(item: &CartItem) -> CandidateItem {
    CandidateItem {
        item: item.item_ref(),
        quantidade: item.quantidade,
    }
}

fn avancar(stage: &mut CheckoutStage, proximo: CheckoutStage) {
    tracing::debug!(de = %stage, para = %proximo, "checkout: transição");
    *stage = proximo;
}

#[derive(Clone)]
pub struct CheckoutService {
    pricing: PricingService,
    cart_repo: CartRepository,
    cliente_repo: ClienteRepository,
    pedido_repo: PedidoRepository,
}

impl CheckoutService {
    pub fn new(
        pricing: PricingService,
        cart_repo: CartRepository,
        cliente_repo: ClienteRepository,
        pedido_repo: PedidoRepository,
    ) -> Self {
        Self { pricing, cart_repo, cliente_repo, pedido_repo }
    }

    /// Itens a fechar: a lista explícita tal como veio (sem deduplicar),
    /// ou o carrinho guardado. Não altera o carrinho.
    pub async fn materializar(
        &self,
        conn: &mut PgConnection,
        tenant_id: Uuid,
        cliente_id: Uuid,
        explicitos: Option<Vec<CandidateItem>>,
    ) -> Result<Vec<CandidateItem>, AppError> {
        if let Some(itens) = explicitos.filter(|itens| !itens.is_empty()) {
            return Ok(itens);
        }

        let carrinho = self.cart_repo.list_for_cliente(conn, tenant_id, cliente_id).await?;
        Ok(carrinho.iter().map(candidato_do_carrinho).collect())
    }

    /// Endereço explícito (do cliente e do tenant), senão o padrão, senão `{}`.
    pub async fn resolver_endereco(
        &self,
        conn: &mut PgConnection,
        tenant_id: Uuid,
        cliente: &Cliente,
        endereco_id: Option<Uuid>,
    ) -> Result<EnderecoSnapshot, AppError> {
        if let Some(endereco_id) = endereco_id {
            let endereco = self.cliente_repo
                .find_endereco_do_cliente(conn, tenant_id, cliente.id, endereco_id)
                .await?
                .ok_or(AppError::AddressNotFound)?;
            return Ok(EnderecoSnapshot::from(&endereco));
        }

        let Some(padrao_id) = cliente.default_address_id else {
            return Ok(EnderecoSnapshot::vazio());
        };

        let padrao = self.cliente_repo
            .find_endereco_padrao(conn, cliente.id, padrao_id)
            .await?;
        Ok(padrao.as_ref().map(EnderecoSnapshot::from).unwrap_or_default())
    }

    /// Cria o pedido numa única transação.
    ///
    /// Qualquer erro antes do commit devolve a transação ao pool sem commit
    /// (rollback): stock, pedido, itens e carrinho ficam como estavam.
    pub async fn create_pedido<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        cliente: &Cliente,
        request: CheckoutRequest,
    ) -> Result<PedidoComItens, AppError>
    where
        E: Acquire<'e, Database = Postgres>,
    {
        let span = tracing::info_span!("checkout", %tenant_id, cliente_id = %cliente.id);
        let mut stage = CheckoutStage::Collecting;

        let resultado = self
            .executar(executor, tenant_id, cliente, request, &mut stage)
            .instrument(span.clone())
            .await;

        let _entered = span.enter();
        match &resultado {
            Ok(pedido) => {
                tracing::info!(
                    pedido_id = %pedido.pedido.id,
                    total = %pedido.pedido.total,
                    itens = pedido.itens.len(),
                    entrega = pedido.pedido.endereco_entrega_snapshot.cidade(),
                    "Pedido criado"
                );
            }
            Err(e) => {
                tracing::warn!(stage = %stage, erro = %e, "Checkout abortado");
                avancar(&mut stage, CheckoutStage::Aborted);
            }
        }
        resultado
    }

    async fn executar<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        cliente: &Cliente,
        request: CheckoutRequest,
        stage: &mut CheckoutStage,
    ) -> Result<PedidoComItens, AppError>
    where
        E: Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        // 1. Collecting
        let candidatos = self
            .materializar(&mut tx, tenant_id, cliente.id, request.itens)
            .await?;
        if candidatos.is_empty() {
            return Err(AppError::EmptyCart);
        }
        if candidatos.iter().any(|c| c.quantidade > QUANTIDADE_MAXIMA) {
            return Err(AppError::QuantidadeExcessiva);
        }

        // 2. Pricing: bloqueios por ordem de id, depois revalidação em ordem de
        // entrada; o primeiro erro aborta tudo
        avancar(stage, CheckoutStage::Pricing);
        self.pricing.lock_candidatos(&mut tx, tenant_id, &candidatos).await?;
        let mut linhas = Vec::with_capacity(candidatos.len());
        for candidato in &candidatos {
            linhas.push(self.pricing.resolve(&mut tx, tenant_id, candidato).await?);
        }

        // 3. Assembling
        avancar(stage, CheckoutStage::Assembling);
        let endereco = self
            .resolver_endereco(&mut tx, tenant_id, cliente, request.endereco_id)
            .await?;
        let draft = montar_pedido(cliente, linhas, endereco)?;

        // 4. Persisting
        avancar(stage, CheckoutStage::Persisting);
        let pedido = self.pedido_repo
            .insert_pedido(&mut *tx, tenant_id, &draft, &request.meta)
            .await?;

        let mut itens = Vec::with_capacity(draft.itens.len());
        for item in &draft.itens {
            itens.push(
                self.pedido_repo
                    .insert_item(&mut *tx, tenant_id, pedido.id, item)
                    .await?,
            );
        }

        // O carrinho inteiro sai, mesmo quando a lista explícita era outra.
        let removidos = self.cart_repo
            .clear_for_cliente(&mut *tx, tenant_id, cliente.id)
            .await?;
        tracing::debug!(removidos, "Carrinho limpo");

        // 5. Commit
        tx.commit().await?;
        avancar(stage, CheckoutStage::Committed);

        Ok(PedidoComItens { pedido, itens })
    }
}
