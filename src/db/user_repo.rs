// src/db/user_repo.rs

use async_trait::async_trait;
use sqlx::{PgPool, types::Json};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::store::{SessionStore, UserStore},
    models::{
        auth::{SessionUser, User},
        company::Company,
    },
};

// Usuários, empresas e sessões (tabelas `users`, `companies`, `sessions`)
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn find_user(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_company(&self, id: Uuid) -> Result<Option<Company>, AppError> {
        let company = sqlx::query_as::<_, Company>("SELECT * FROM companies WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(company)
    }

    // Empresa e usuário na mesma transação. Se qualquer INSERT falhar,
    // o `tx` é descartado sem commit e nada fica gravado.
    async fn create_seller(&self, user: &User, company: &Company) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO users (
                id, first_name, last_name, email, telephone, role, company_id,
                is_active, is_super_admin, is_email_verified, is_phone_verified,
                created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(user.id)
        .bind(user.first_name.as_deref())
        .bind(user.last_name.as_deref())
        .bind(user.email.as_deref())
        .bind(user.telephone.as_deref())
        .bind(user.role)
        .bind(user.company_id)
        .bind(user.is_active)
        .bind(user.is_super_admin)
        .bind(user.is_email_verified)
        .bind(user.is_phone_verified)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO companies (
                id, owner_id, name, ruc, corporate_email, phone, address, industry,
                is_active, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(company.id)
        .bind(company.owner_id)
        .bind(&company.name)
        .bind(&company.ruc)
        .bind(&company.corporate_email)
        .bind(company.phone.as_deref())
        .bind(company.address.as_deref())
        .bind(company.industry.as_deref())
        .bind(company.is_active)
        .bind(company.created_at)
        .bind(company.updated_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }
}

#[async_trait]
impl SessionStore for UserRepository {
    async fn save_session(&self, session: &SessionUser) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO sessions (user_id, data, updated_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (user_id) DO UPDATE SET data = EXCLUDED.data, updated_at = NOW()
            "#,
        )
        .bind(session.id)
        .bind(Json(session))
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_session(&self, user_id: Uuid) -> Result<Option<SessionUser>, AppError> {
        let row: Option<Json<SessionUser>> =
            sqlx::query_scalar("SELECT data FROM sessions WHERE user_id = $1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(|Json(session)| session))
    }
}
