use axum::{
    body::Body,
    extract::{Path, State},
    http::header,
    response::IntoResponse,
};

use crate::error::ApiError;
use crate::state::AppState;

fn content_type_for(filename: &str) -> &'static str {
    let ext = filename.rsplit('.').next().unwrap_or("");
    match ext.to_ascii_lowercase().as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        _ => "application/octet-stream",
    }
}

/// Serve a stored listing image by bare filename.
pub async fn serve_upload(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let data = state.uploads.read(&filename).await?;

    Ok((
        [
            (header::CONTENT_TYPE, content_type_for(&filename)),
            (header::CACHE_CONTROL, "public, max-age=86400"),
        ],
        Body::from(data),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_from_extension() {
        assert_eq!(content_type_for("a.png"), "image/png");
        assert_eq!(content_type_for("photo.JPG"), "image/jpeg");
        assert_eq!(content_type_for("anim.gif"), "image/gif");
        assert_eq!(content_type_for("noext"), "application/octet-stream");
    }
}
