use bucketly_badges::{Badge, BadgeCriteria};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use sqlx::types::Json;

#[derive(Debug, Clone, FromRow)]
pub struct BadgeRow {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub icon_path: Option<String>,
    pub criteria: Json<Value>,
}

impl From<BadgeRow> for Badge {
    fn from(row: BadgeRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
            icon_path: row.icon_path,
            criteria: BadgeCriteria::from_value(&row.criteria.0),
        }
    }
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct EarnedBadge {
    pub badge_id: i64,
    pub name: String,
    pub icon_path: Option<String>,
    pub earned_at: i64,
}
