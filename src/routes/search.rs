use axum::extract::rejection::FormRejection;
use axum::{
    extract::{Form, State},
    Json,
};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::entities::flat;
use crate::error::ApiError;
use crate::models::FlatView;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct SearchFilters {
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub max_rent: Option<String>,
}

/// Browse available flats. GET reads the query string, POST reads a form
/// body; either way an absent or unreadable body means "no filters".
pub async fn search_flats(
    State(state): State<AppState>,
    filters: Result<Form<SearchFilters>, FormRejection>,
) -> Result<Json<Value>, ApiError> {
    let filters = filters.map(|Form(f)| f).unwrap_or_default();

    // Filters compose conjunctively onto the base predicate; an absent
    // filter contributes no clause at all.
    let mut query = flat::Entity::find().filter(flat::Column::IsRented.eq(false));

    if let Some(location) = filters
        .location
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
    {
        query = query.filter(flat::Column::Address.contains(location));
    }

    if let Some(raw) = filters
        .max_rent
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
    {
        let max_rent: i64 = raw
            .parse()
            .map_err(|_| ApiError::Validation("max_rent must be a number".to_string()))?;
        query = query.filter(flat::Column::Rent.lte(max_rent));
    }

    let flats: Vec<FlatView> = query
        .order_by_asc(flat::Column::CreatedAt)
        .all(&state.db)
        .await?
        .into_iter()
        .map(FlatView::from)
        .collect();

    Ok(Json(json!({ "flats": flats })))
}
