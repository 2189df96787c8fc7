// src/db/cliente_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;
use crate::{
    common::error::AppError,
    models::cliente::{Cliente, ClienteEndereco},
};

/// Dados de um endereço novo (já validados pelo handler).
#[derive(Debug, Clone)]
pub struct NovoEndereco<'a> {
    pub apelido: Option<&'a str>,
    pub linha1: &'a str,
    pub linha2: Option<&'a str>,
    pub cidade: &'a str,
    pub codigo_postal: &'a str,
    pub pais: &'a str,
    pub telefone: Option<&'a str>,
    pub latitude: Option<Decimal>,
    pub longitude: Option<Decimal>,
}

#[derive(Clone)]
pub struct ClienteRepository {
    pool: PgPool,
}

impl ClienteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_user(
        &self,
        tenant_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Cliente>, AppError> {
        let cliente = sqlx::query_as::<_, Cliente>(
            "SELECT * FROM clientes WHERE tenant_id = $1 AND user_id = $2",
        )
            .bind(tenant_id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(cliente)
    }

    // =========================================================================
    //  ENDEREÇOS
    // =========================================================================

    /// Endereço explícito: tem de ser do cliente E do tenant.
    pub async fn find_endereco_do_cliente<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        cliente_id: Uuid,
        endereco_id: Uuid,
    ) -> Result<Option<ClienteEndereco>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let endereco = sqlx::query_as::<_, ClienteEndereco>(
            r#"
            SELECT * FROM cliente_enderecos
            WHERE id = $1 AND cliente_id = $2 AND tenant_id = $3
            "#,
        )
            .bind(endereco_id)
            .bind(cliente_id)
            .bind(tenant_id)
            .fetch_optional(executor)
            .await?;
        Ok(endereco)
    }

    /// Endereço padrão: o ponteiro foi gravado por caminhos já filtrados por tenant,
    /// por isso aqui só se confirma o dono.
    pub async fn find_endereco_padrao<'e, E>(
        &self,
        executor: E,
        cliente_id: Uuid,
        endereco_id: Uuid,
    ) -> Result<Option<ClienteEndereco>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let endereco = sqlx::query_as::<_, ClienteEndereco>(
            "SELECT * FROM cliente_enderecos WHERE id = $1 AND cliente_id = $2",
        )
            .bind(endereco_id)
            .bind(cliente_id)
            .fetch_optional(executor)
            .await?;
        Ok(endereco)
    }

    pub async fn list_enderecos(
        &self,
        tenant_id: Uuid,
        cliente_id: Uuid,
    ) -> Result<Vec<ClienteEndereco>, AppError> {
        let enderecos = sqlx::query_as::<_, ClienteEndereco>(
            r#"
            SELECT * FROM cliente_enderecos
            WHERE tenant_id = $1 AND cliente_id = $2
            ORDER BY created_at DESC
            "#,
        )
            .bind(tenant_id)
            .bind(cliente_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(enderecos)
    }

    pub async fn create_endereco<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        cliente_id: Uuid,
        novo: &NovoEndereco<'_>,
    ) -> Result<ClienteEndereco, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let endereco = sqlx::query_as::<_, ClienteEndereco>(
            r#"
            INSERT INTO cliente_enderecos (
                tenant_id, cliente_id, apelido, linha1, linha2,
                cidade, codigo_postal, pais, telefone, latitude, longitude
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
            .bind(tenant_id)
            .bind(cliente_id)
            .bind(novo.apelido)
            .bind(novo.linha1)
            .bind(novo.linha2)
            .bind(novo.cidade)
            .bind(novo.codigo_postal)
            .bind(novo.pais)
            .bind(novo.telefone)
            .bind(novo.latitude)
            .bind(novo.longitude)
            .fetch_one(executor)
            .await?;
        Ok(endereco)
    }

    pub async fn set_default_address<'e, E>(
        &self,
        executor: E,
        cliente_id: Uuid,
        endereco_id: Option<Uuid>,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            "UPDATE clientes SET default_address_id = $2, updated_at = NOW() WHERE id = $1",
        )
            .bind(cliente_id)
            .bind(endereco_id)
            .execute(executor)
            .await?;
        Ok(())
    }

    /// Limpa o ponteiro só se ainda apontar para este endereço.
    pub async fn clear_default_address_if<'e, E>(
        &self,
        executor: E,
        cliente_id: Uuid,
        endereco_id: Uuid,
    ) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            r#"
            UPDATE clientes SET default_address_id = NULL, updated_at = NOW()
            WHERE id = $1 AND default_address_id = $2
            "#,
        )
            .bind(cliente_id)
            .bind(endereco_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn delete_endereco<'e, E>(
        &self,
        executor: E,
        endereco_id: Uuid,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("DELETE FROM cliente_enderecos WHERE id = $1")
            .bind(endereco_id)
            .execute(executor)
            .await?;
        Ok(())
    }
}
