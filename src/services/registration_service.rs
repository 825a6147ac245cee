// src/services/registration_service.rs
//
// Registro de vendedor: conta no provedor de identidade + empresa + usuário.
// Empresa e usuário vão numa única escrita atômica do store. Se ela falhar,
// a conta recém-criada é apagada (compensação). O que escapar disso (ex: o
// processo caiu entre as duas etapas) é limpo por `reconcile_orphans`.

use std::sync::Arc;

use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::UserStore,
    models::{
        auth::{RegisterResponse, RegisterSellerPayload, User, UserRole},
        company::Company,
    },
    services::identity::IdentityProvider,
};

const EMAIL_TAKEN: &str = "An account with this email already exists.";

#[derive(Clone)]
pub struct RegistrationService {
    identity: Arc<dyn IdentityProvider>,
    users: Arc<dyn UserStore>,
}

impl RegistrationService {
    pub fn new(identity: Arc<dyn IdentityProvider>, users: Arc<dyn UserStore>) -> Self {
        Self { identity, users }
    }

    pub async fn register_seller(
        &self,
        payload: RegisterSellerPayload,
    ) -> Result<RegisterResponse, AppError> {
        if self.identity.find_account_by_email(&payload.email).await?.is_some() {
            tracing::warn!(email = %payload.email, "Registro com e-mail já existente");
            return Err(AppError::BadRequest(EMAIL_TAKEN.into()));
        }

        // Duas requisições simultâneas com o mesmo e-mail: a segunda cai no UNIQUE
        let uid = match self.identity.create_account(&payload.email, &payload.password).await {
            Ok(uid) => uid,
            Err(AppError::Conflict(_)) => return Err(AppError::BadRequest(EMAIL_TAKEN.into())),
            Err(e) => return Err(e),
        };
        tracing::info!(%uid, "Conta criada no provedor de identidade");

        let now = Utc::now();
        let company = Company {
            id: Uuid::new_v4(),
            owner_id: uid,
            name: payload.company_name,
            ruc: payload.company_ruc,
            corporate_email: payload.company_corporate_email,
            phone: payload.company_phone,
            address: payload.company_address,
            industry: payload.company_industry,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        let user = User {
            id: uid,
            first_name: Some(payload.first_name),
            last_name: Some(payload.last_name),
            email: Some(payload.email),
            telephone: Some(payload.telephone),
            role: Some(UserRole::Seller),
            company_id: Some(company.id),
            is_active: true,
            is_super_admin: false,
            is_email_verified: false,
            is_phone_verified: false,
            created_at: now,
            updated_at: now,
        };

        if let Err(e) = self.users.create_seller(&user, &company).await {
            tracing::error!(%uid, error = %e, "Falha ao gravar empresa/usuário; desfazendo a conta");
            if let Err(rollback) = self.identity.delete_account(uid).await {
                // Fica para a reconciliação
                tracing::error!(%uid, error = %rollback, "Falha na compensação da conta");
            }
            return Err(e);
        }

        tracing::info!(%uid, company_id = %company.id, "Vendedor registrado");
        Ok(RegisterResponse {
            message: "Seller registered successfully".into(),
            uid,
            company_id: company.id,
        })
    }

    /// Apaga contas mais velhas que `grace` sem documento de usuário. Devolve quantas.
    pub async fn reconcile_orphans(&self, grace: Duration) -> Result<usize, AppError> {
        let cutoff = Utc::now() - grace;
        let mut removed = 0;

        for account in self.identity.list_accounts().await? {
            if account.created_at > cutoff {
                continue;
            }
            if self.users.find_user(account.id).await?.is_none() {
                self.identity.delete_account(account.id).await?;
                tracing::warn!(uid = %account.id, email = %account.email, "Conta órfã removida");
                removed += 1;
            }
        }
        Ok(removed)
    }
}
