use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::tasks::repo::ServiceCategory;

/// A performer's standing declaration of a category they serve. One row
/// per `(performer, category)`, enforced by the store.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ServiceOffer {
    pub id: Uuid,
    pub performer_id: Uuid,
    pub category: ServiceCategory,
    pub description: Option<String>,
    pub hourly_rate: Option<f64>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

const OFFER_COLUMNS: &str =
    "id, performer_id, category, description, hourly_rate, created_at, updated_at";

impl ServiceOffer {
    /// Re-declaration replaces the performer's whole offer set: clear then
    /// insert, in one transaction.
    pub async fn replace_all(
        db: &PgPool,
        performer_id: Uuid,
        categories: &[ServiceCategory],
        description: Option<&str>,
        hourly_rate: Option<f64>,
    ) -> sqlx::Result<Vec<ServiceOffer>> {
        let mut tx = db.begin().await?;

        sqlx::query("DELETE FROM service_offers WHERE performer_id = $1")
            .bind(performer_id)
            .execute(&mut *tx)
            .await?;

        let mut offers = Vec::with_capacity(categories.len());
        for category in categories {
            let offer = sqlx::query_as::<_, ServiceOffer>(&format!(
                "INSERT INTO service_offers (performer_id, category, description, hourly_rate)
                 VALUES ($1, $2, $3, $4)
                 RETURNING {OFFER_COLUMNS}"
            ))
            .bind(performer_id)
            .bind(category)
            .bind(description)
            .bind(hourly_rate)
            .fetch_one(&mut *tx)
            .await?;
            offers.push(offer);
        }

        tx.commit().await?;
        Ok(offers)
    }

    pub async fn list_for_performer(
        db: &PgPool,
        performer_id: Uuid,
    ) -> sqlx::Result<Vec<ServiceOffer>> {
        sqlx::query_as::<_, ServiceOffer>(&format!(
            "SELECT {OFFER_COLUMNS} FROM service_offers
             WHERE performer_id = $1
             ORDER BY created_at DESC"
        ))
        .bind(performer_id)
        .fetch_all(db)
        .await
    }

    /// Ownership-guarded partial update; `None` when no row matched.
    pub async fn update(
        db: &PgPool,
        offer_id: Uuid,
        performer_id: Uuid,
        description: Option<&str>,
        hourly_rate: Option<f64>,
    ) -> sqlx::Result<Option<ServiceOffer>> {
        sqlx::query_as::<_, ServiceOffer>(&format!(
            "UPDATE service_offers SET
                 description = COALESCE($3, description),
                 hourly_rate = COALESCE($4, hourly_rate),
                 updated_at = now()
             WHERE id = $1 AND performer_id = $2
             RETURNING {OFFER_COLUMNS}"
        ))
        .bind(offer_id)
        .bind(performer_id)
        .bind(description)
        .bind(hourly_rate)
        .fetch_optional(db)
        .await
    }

    pub async fn exists(db: &PgPool, offer_id: Uuid) -> sqlx::Result<bool> {
        let found: Option<Uuid> =
            sqlx::query_scalar("SELECT id FROM service_offers WHERE id = $1")
                .bind(offer_id)
                .fetch_optional(db)
                .await?;
        Ok(found.is_some())
    }
}
