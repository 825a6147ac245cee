// src/common/ownership.rs
//
// Regras de "dono" compartilhadas pelos três recursos do vendedor.

use uuid::Uuid;

use crate::{common::error::AppError, db::store::Document};

/// Id vindo do path. Um id que nem é UUID não pode existir no store: vira 404.
pub fn parse_id(raw: &str, not_found: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw.trim()).map_err(|_| AppError::NotFound(not_found.to_string()))
}

/// Ausente -> 404; de outro vendedor -> 403; senão devolve o documento.
pub fn ensure_owned<T: Document>(found: Option<T>, seller_id: Uuid) -> Result<T, AppError> {
    let doc = found.ok_or_else(|| AppError::NotFound(T::NOT_FOUND_MESSAGE.to_string()))?;
    if doc.seller_id() != seller_id {
        tracing::warn!(
            kind = T::KIND,
            id = %doc.id(),
            %seller_id,
            "Acesso negado a documento de outro vendedor"
        );
        return Err(AppError::Forbidden(T::FORBIDDEN_MESSAGE.to_string()));
    }
    Ok(doc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::product::Product;
    use chrono::Utc;
    use rust_decimal::Decimal;

    fn product(seller_id: Uuid) -> Product {
        let now = Utc::now();
        Product {
            id: Uuid::new_v4(),
            seller_id,
            name: "Lamp".into(),
            description: "Desk lamp".into(),
            price: Decimal::new(1999, 2),
            quantity: 3,
            sku: "LMP-1".into(),
            category: "Lighting".into(),
            stock_alert: 10,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn missing_document_is_not_found() {
        let err = ensure_owned::<Product>(None, Uuid::new_v4()).unwrap_err();
        assert_eq!(err.to_string(), "Product not found");
    }

    #[test]
    fn foreign_document_is_forbidden() {
        let err = ensure_owned(Some(product(Uuid::new_v4())), Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
        assert_eq!(err.to_string(), "Access denied - Product belongs to another seller");
    }

    #[test]
    fn own_document_passes_through() {
        let seller = Uuid::new_v4();
        let doc = ensure_owned(Some(product(seller)), seller).unwrap();
        assert_eq!(doc.seller_id, seller);
    }

    #[test]
    fn malformed_path_id_is_not_found() {
        let err = parse_id("not-a-uuid", "Location not found").unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
