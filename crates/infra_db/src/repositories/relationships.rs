//! Ownership relationship repository

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::DatabaseError;

/// Repository for user-to-venue relationship edges
#[derive(Debug, Clone)]
pub struct RelationshipRepository {
    pool: PgPool,
}

impl RelationshipRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts an edge
    ///
    /// A second owner for a venue violates `venue_relationships_single_owner`
    /// and is returned as `DatabaseError::DuplicateEntry`.
    pub async fn insert(&self, row: &RelationshipRow) -> Result<RelationshipRow, DatabaseError> {
        let inserted = sqlx::query_as::<_, RelationshipRow>(
            r#"
            INSERT INTO venue_relationships (relationship_id, user_id, venue_id, relationship_type, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING relationship_id, user_id, venue_id, relationship_type, created_at
            "#,
        )
        .bind(row.relationship_id)
        .bind(row.user_id)
        .bind(row.venue_id)
        .bind(row.relationship_type)
        .bind(row.created_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(inserted)
    }

    /// The owner edge of a venue, if any
    pub async fn find_owner(&self, venue_id: Uuid) -> Result<Option<RelationshipRow>, DatabaseError> {
        let row = sqlx::query_as::<_, RelationshipRow>(
            r#"
            SELECT relationship_id, user_id, venue_id, relationship_type, created_at
            FROM venue_relationships
            WHERE venue_id = $1 AND relationship_type = 'owner'
            "#,
        )
        .bind(venue_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    /// Every edge of a user, oldest first
    pub async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<RelationshipRow>, DatabaseError> {
        let rows = sqlx::query_as::<_, RelationshipRow>(
            r#"
            SELECT relationship_id, user_id, venue_id, relationship_type, created_at
            FROM venue_relationships
            WHERE user_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}

/// Relationship type enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "relationship_type", rename_all = "snake_case")]
pub enum RelationshipType {
    Owner,
}

/// Database row for a relationship edge
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RelationshipRow {
    pub relationship_id: Uuid,
    pub user_id: Uuid,
    pub venue_id: Uuid,
    pub relationship_type: RelationshipType,
    pub created_at: DateTime<Utc>,
}
