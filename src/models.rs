use serde::Serialize;
use std::path::Path;

use crate::entities::flat;

pub const ROLE_TENANT: &str = "tenant";
pub const ROLE_LANDLORD: &str = "landlord";

/// A listing as returned to clients: the stored row plus the derived image
/// URL and the contact number tenants should call.
#[derive(Debug, Clone, Serialize)]
pub struct FlatView {
    pub id: String,
    pub landlord_id: String,
    pub name: String,
    pub phone: String,
    pub address: String,
    pub location_link: String,
    pub rent: i64,
    pub facilities: String,
    pub image_path: Option<String>,
    pub is_rented: bool,
    pub created_at: String,
    pub image_url: Option<String>,
    pub contact: String,
}

impl From<flat::Model> for FlatView {
    fn from(m: flat::Model) -> Self {
        let image_url = m.image_path.as_deref().and_then(image_url_for);
        let contact = if m.phone.is_empty() {
            "N/A".to_string()
        } else {
            m.phone.clone()
        };
        Self {
            id: m.id,
            landlord_id: m.landlord_id,
            name: m.name,
            phone: m.phone,
            address: m.address,
            location_link: m.location_link,
            rent: m.rent,
            facilities: m.facilities,
            image_path: m.image_path,
            is_rented: m.is_rented,
            created_at: m.created_at,
            image_url,
            contact,
        }
    }
}

/// Public URL for a stored image path, derived from its bare filename.
pub fn image_url_for(image_path: &str) -> Option<String> {
    Path::new(image_path)
        .file_name()
        .and_then(|name| name.to_str())
        .map(|name| format!("/static/uploads/{name}"))
}

/// A contact number must be exactly 10 ASCII digits.
pub fn is_valid_phone(phone: &str) -> bool {
    phone.len() == 10 && phone.bytes().all(|b| b.is_ascii_digit())
}

/// Timestamp format used for all persisted rows.
pub fn now_timestamp() -> String {
    chrono::Utc::now().format("%Y-%m-%d %H:%M:%S").to_string()
}
