//! Shared content lookups used by multiple feature modules.
//! Feature-specific queries live with their feature.

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::card::CardRow;
use crate::models::career::CareerRow;

pub async fn find_card(pool: &PgPool, id: Uuid) -> Result<Option<CardRow>, sqlx::Error> {
    sqlx::query_as::<_, CardRow>("SELECT * FROM cards WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Batched card lookup for the recompute window; ids with no matching card
/// are silently absent from the result.
pub async fn find_cards_by_ids(pool: &PgPool, ids: &[Uuid]) -> Result<Vec<CardRow>, sqlx::Error> {
    sqlx::query_as::<_, CardRow>("SELECT * FROM cards WHERE id = ANY($1)")
        .bind(ids)
        .fetch_all(pool)
        .await
}

pub async fn find_career(pool: &PgPool, id: Uuid) -> Result<Option<CareerRow>, sqlx::Error> {
    sqlx::query_as::<_, CareerRow>("SELECT * FROM careers WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}
