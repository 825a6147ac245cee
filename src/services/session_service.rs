// src/services/session_service.rs
//
// Ponte entre a identidade verificada e a sessão persistida no servidor.

use std::sync::Arc;

use validator::Validate;

use crate::{
    common::error::AppError,
    db::{SessionStore, UserStore},
    models::auth::{SessionCompany, SessionUser, UserRole, VerifiedIdentity},
};

#[derive(Clone)]
pub struct SessionService {
    users: Arc<dyn UserStore>,
    sessions: Arc<dyn SessionStore>,
}

impl SessionService {
    pub fn new(users: Arc<dyn UserStore>, sessions: Arc<dyn SessionStore>) -> Self {
        Self { users, sessions }
    }

    // Empresa do vendedor. Falha aqui não derruba a sessão.
    async fn session_company(&self, company_id: uuid::Uuid) -> Option<SessionCompany> {
        match self.users.find_company(company_id).await {
            Ok(Some(company)) => Some(SessionCompany::from(company)),
            Ok(None) => {
                tracing::warn!(%company_id, "Empresa do vendedor não encontrada");
                None
            }
            Err(e) => {
                tracing::error!(%company_id, error = %e, "Erro ao buscar a empresa; sessão segue sem ela");
                None
            }
        }
    }

    pub async fn create_session(&self, identity: &VerifiedIdentity) -> Result<SessionUser, AppError> {
        let user = self
            .users
            .find_user(identity.uid)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found in database".into()))?;

        let company = match (user.role, user.company_id) {
            (Some(UserRole::Seller), Some(company_id)) => self.session_company(company_id).await,
            _ => None,
        };

        let session = SessionUser::from_user(user, company);
        if let Err(e) = session.validate() {
            tracing::warn!(uid = %identity.uid, errors = %e, "Dados do usuário fora do formato da sessão");
            return Err(AppError::BadRequest("Invalid user data format".into()));
        }

        self.sessions.save_session(&session).await?;
        tracing::info!(
            uid = %session.id,
            has_company = session.company.is_some(),
            "Sessão criada"
        );
        Ok(session)
    }

    pub async fn current_session(&self, identity: &VerifiedIdentity) -> Result<SessionUser, AppError> {
        self.sessions
            .find_session(identity.uid)
            .await?
            .ok_or_else(|| AppError::NotFound("Session not found".into()))
    }
}
