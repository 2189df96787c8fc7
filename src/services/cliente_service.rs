// src/services/cliente_service.rs

use sqlx::{Acquire, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{ClienteRepository, cliente_repo::NovoEndereco},
    models::cliente::{Cliente, ClienteEndereco},
};

#[derive(Clone)]
pub struct ClienteService {
    cliente_repo: ClienteRepository,
}

impl ClienteService {
    pub fn new(cliente_repo: ClienteRepository) -> Self {
        Self { cliente_repo }
    }

    pub async fn find_cliente(&self, tenant_id: Uuid, user_id: Uuid) -> Result<Cliente, AppError> {
        self.cliente_repo
            .find_by_user(tenant_id, user_id)
            .await?
            .ok_or(AppError::ClienteNotFound)
    }

    pub async fn list_enderecos(
        &self,
        tenant_id: Uuid,
        cliente_id: Uuid,
    ) -> Result<Vec<ClienteEndereco>, AppError> {
        self.cliente_repo.list_enderecos(tenant_id, cliente_id).await
    }

    pub async fn create_endereco<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        cliente_id: Uuid,
        novo: &NovoEndereco<'_>,
        definir_como_padrao: bool,
    ) -> Result<ClienteEndereco, AppError>
    where
        E: Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let endereco = self.cliente_repo
            .create_endereco(&mut *tx, tenant_id, cliente_id, novo)
            .await?;

        if definir_como_padrao {
            self.cliente_repo
                .set_default_address(&mut *tx, cliente_id, Some(endereco.id))
                .await?;
        }

        tx.commit().await?;
        Ok(endereco)
    }

    /// Se for o endereço padrão, o ponteiro é limpo na mesma transação.
    pub async fn delete_endereco<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        cliente_id: Uuid,
        endereco_id: Uuid,
    ) -> Result<(), AppError>
    where
        E: Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        self.cliente_repo
            .find_endereco_do_cliente(&mut *tx, tenant_id, cliente_id, endereco_id)
            .await?
            .ok_or(AppError::AddressNotFound)?;

        let era_padrao = self.cliente_repo
            .clear_default_address_if(&mut *tx, cliente_id, endereco_id)
            .await?;
        if era_padrao {
            tracing::debug!(%cliente_id, %endereco_id, "Endereço padrão removido");
        }

        self.cliente_repo.delete_endereco(&mut *tx, endereco_id).await?;

        tx.commit().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support as ts;
    use sqlx::PgPool;

    fn novo(cidade: &str) -> NovoEndereco<'_> {
        NovoEndereco {
            apelido: Some("Casa"),
            linha1: "Rua 123",
            linha2: None,
            cidade,
            codigo_postal: "1000-000",
            pais: "PT",
            telefone: None,
            latitude: None,
            longitude: None,
        }
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "precisa de DATABASE_URL"]
    async fn test_criar_como_padrao_e_apagar_limpa_o_ponteiro(pool: PgPool) {
        let tenant_id = ts::tenant(&pool, "t").await;
        let cliente = ts::cliente(&pool, tenant_id, "c@example.com").await;
        let svc = ClienteService::new(ClienteRepository::new(pool.clone()));

        let endereco = svc
            .create_endereco(&pool, tenant_id, cliente.id, &novo("Lisboa"), true)
            .await
            .unwrap();
        let atual = svc.find_cliente(tenant_id, cliente.user_id).await.unwrap();
        assert_eq!(atual.default_address_id, Some(endereco.id));

        svc.delete_endereco(&pool, tenant_id, cliente.id, endereco.id).await.unwrap();
        let atual = svc.find_cliente(tenant_id, cliente.user_id).await.unwrap();
        assert_eq!(atual.default_address_id, None);
        assert!(svc.list_enderecos(tenant_id, cliente.id).await.unwrap().is_empty());
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "precisa de DATABASE_URL"]
    async fn test_apagar_endereco_alheio_e_404(pool: PgPool) {
        let tenant_id = ts::tenant(&pool, "t").await;
        let dono = ts::cliente(&pool, tenant_id, "d@example.com").await;
        let outro = ts::cliente(&pool, tenant_id, "o@example.com").await;
        let endereco_id = ts::endereco(&pool, tenant_id, dono.id, "Porto").await;
        let svc = ClienteService::new(ClienteRepository::new(pool.clone()));

        let err = svc.delete_endereco(&pool, tenant_id, outro.id, endereco_id).await.unwrap_err();
        assert!(matches!(err, AppError::AddressNotFound));
        assert_eq!(svc.list_enderecos(tenant_id, dono.id).await.unwrap().len(), 1);
    }
}
