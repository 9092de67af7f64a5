use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use axum::body::Bytes;
use axum_extra::extract::cookie::CookieJar;
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::entities::flat;
use crate::error::ApiError;
use crate::models::{is_valid_phone, now_timestamp, FlatView};
use crate::routes::auth;
use crate::state::AppState;

const PHONE_ERROR: &str = "Invalid mobile number. Must be exactly 10 digits.";

#[derive(Debug, Deserialize)]
pub struct UpdateFlatRequest {
    pub name: String,
    pub phone: String,
    pub address: String,
    pub location_link: String,
    pub rent: i64,
    pub facilities: String,
}

/// Accumulates the multipart fields of the listing form.
#[derive(Default)]
struct ListingForm {
    name: Option<String>,
    phone: Option<String>,
    address: Option<String>,
    location_link: Option<String>,
    rent: Option<String>,
    facilities: Option<String>,
    image_name: Option<String>,
    image_data: Option<Bytes>,
}

fn required(value: Option<String>, field: &str) -> Result<String, ApiError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::Validation(format!("Missing field: {field}")))
}

pub async fn create_flat(
    State(state): State<AppState>,
    jar: CookieJar,
    mut multipart: Multipart,
) -> Result<Json<Value>, ApiError> {
    let user = auth::current_user(&state, &jar)?;
    if !user.is_landlord() {
        return Err(ApiError::Forbidden(
            "Access denied: Only landlords can post flats".to_string(),
        ));
    }

    let mut form = ListingForm::default();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Validation(format!("Multipart error: {e}")))?
    {
        let field_name = field.name().unwrap_or("").to_string();
        if field_name == "image" {
            form.image_name = Some(field.file_name().unwrap_or("upload").to_string());
            form.image_data = Some(
                field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::Validation(format!("Read error: {e}")))?,
            );
            continue;
        }

        let value = field
            .text()
            .await
            .map_err(|e| ApiError::Validation(format!("Read error: {e}")))?;
        match field_name.as_str() {
            "name" => form.name = Some(value),
            "phone" => form.phone = Some(value),
            "address" => form.address = Some(value),
            "location_link" => form.location_link = Some(value),
            "rent" => form.rent = Some(value),
            "facilities" => form.facilities = Some(value),
            _ => {}
        }
    }

    let name = required(form.name, "name")?;
    let phone = required(form.phone, "phone")?;
    let address = required(form.address, "address")?;
    let location_link = required(form.location_link, "location_link")?;
    let facilities = required(form.facilities, "facilities")?;
    let rent: i64 = required(form.rent, "rent")?
        .parse()
        .map_err(|_| ApiError::Validation("Rent must be a number".to_string()))?;

    if !is_valid_phone(&phone) {
        return Err(ApiError::Validation(PHONE_ERROR.to_string()));
    }

    let image_data = form
        .image_data
        .ok_or_else(|| ApiError::Validation("Image file is required".to_string()))?;
    let image_name = form.image_name.unwrap_or_else(|| "upload".to_string());

    let image_path = state.uploads.save(&image_name, &image_data).await?;
    let image_path_str = image_path.to_string_lossy().into_owned();

    let id = Uuid::new_v4().to_string();
    let new_flat = flat::ActiveModel {
        id: Set(id.clone()),
        landlord_id: Set(user.id.clone()),
        name: Set(name),
        phone: Set(phone),
        address: Set(address),
        location_link: Set(location_link),
        rent: Set(rent),
        facilities: Set(facilities),
        image_path: Set(Some(image_path_str.clone())),
        is_rented: Set(false),
        created_at: Set(now_timestamp()),
    };

    if let Err(e) = flat::Entity::insert(new_flat).exec(&state.db).await {
        // Don't leave the image behind if the row never made it in.
        state.uploads.remove(&image_path_str).await;
        return Err(e.into());
    }

    tracing::info!(landlord = %user.username, flat = %id, "Flat listed");
    Ok(Json(json!({ "message": "Flat listed successfully!", "id": id })))
}

pub async fn list_my_flats(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Json<Value>, ApiError> {
    let user = auth::current_user(&state, &jar)?;

    let flats: Vec<FlatView> = flat::Entity::find()
        .filter(flat::Column::LandlordId.eq(&user.id))
        .order_by_asc(flat::Column::CreatedAt)
        .all(&state.db)
        .await?
        .into_iter()
        .map(FlatView::from)
        .collect();

    Ok(Json(json!({ "flats": flats })))
}

pub async fn update_flat(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(flat_id): Path<String>,
    Json(req): Json<UpdateFlatRequest>,
) -> Result<Json<Value>, ApiError> {
    let user = auth::current_user(&state, &jar)?;

    if !is_valid_phone(&req.phone) {
        return Err(ApiError::Validation(PHONE_ERROR.to_string()));
    }

    let result = flat::Entity::update_many()
        .col_expr(flat::Column::Name, Expr::value(req.name))
        .col_expr(flat::Column::Phone, Expr::value(req.phone))
        .col_expr(flat::Column::Address, Expr::value(req.address))
        .col_expr(flat::Column::LocationLink, Expr::value(req.location_link))
        .col_expr(flat::Column::Rent, Expr::value(req.rent))
        .col_expr(flat::Column::Facilities, Expr::value(req.facilities))
        .filter(flat::Column::Id.eq(&flat_id))
        .filter(flat::Column::LandlordId.eq(&user.id))
        .exec(&state.db)
        .await?;

    // The ownership filter means zero rows is "not yours or not there",
    // never a silent success.
    if result.rows_affected == 0 {
        return Err(ApiError::NotFound("Flat not found or not owned".to_string()));
    }

    Ok(Json(json!({ "message": "Flat updated successfully" })))
}

pub async fn delete_flat(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(flat_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let user = auth::current_user(&state, &jar)?;

    let found = flat::Entity::find()
        .filter(flat::Column::Id.eq(&flat_id))
        .filter(flat::Column::LandlordId.eq(&user.id))
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound("Flat not found".to_string()))?;

    flat::Entity::delete_by_id(found.id).exec(&state.db).await?;

    if let Some(image_path) = &found.image_path {
        state.uploads.remove(image_path).await;
    }

    tracing::info!(landlord = %user.username, flat = %flat_id, "Flat deleted");
    Ok(Json(json!({ "message": "Flat deleted successfully" })))
}
