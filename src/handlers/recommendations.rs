use crate::{
    error::{ApiError, Result},
    models::UploadedImage,
    services::RecommendationService,
};
use actix_multipart::{Field, Multipart};
use actix_web::{post, web, HttpResponse};
use futures::TryStreamExt;
use tracing::{info, Instrument};
use uuid::Uuid;

const FILE_FIELD: &str = "file";

/// Classify an uploaded clothing image and suggest complementary catalog products.
///
/// Expects a multipart body; the part named `file` is used, otherwise the first part.
#[post("/recommend")]
pub async fn recommend(
    payload: Multipart,
    service: web::Data<RecommendationService>,
) -> Result<HttpResponse> {
    let request_id = Uuid::new_v4();
    let span = tracing::info_span!("recommend", %request_id);

    async move {
        let image = read_image(payload).await?;
        info!(
            "Received {} byte upload ({})",
            image.bytes.len(),
            image.mime_type
        );

        let response = service.recommend(&image).await?;
        info!(
            "Recommending {} top, {} bottom, {} accessory items",
            response.recommendations.top.len(),
            response.recommendations.bottom.len(),
            response.recommendations.accessory.len()
        );

        Ok(HttpResponse::Ok().json(response))
    }
    .instrument(span)
    .await
}

async fn read_image(mut payload: Multipart) -> Result<UploadedImage> {
    let mut fallback: Option<UploadedImage> = None;

    while let Some(field) = payload.try_next().await? {
        let is_file_field = field.content_disposition().get_name() == Some(FILE_FIELD);
        if !is_file_field && fallback.is_some() {
            // drain so the stream can advance to the next part
            drain(field).await?;
            continue;
        }

        let image = read_field(field).await?;
        if is_file_field {
            return Ok(image);
        }
        fallback = Some(image);
    }

    fallback.ok_or_else(|| {
        ApiError::InvalidInput(format!(
            "Multipart body must contain an image in the '{}' field",
            FILE_FIELD
        ))
    })
}

async fn read_field(mut field: Field) -> Result<UploadedImage> {
    let mime_type = field.content_type().map(|mime| mime.to_string());

    let mut bytes = Vec::new();
    while let Some(chunk) = field.try_next().await? {
        bytes.extend_from_slice(&chunk);
    }

    Ok(UploadedImage::new(bytes, mime_type))
}

async fn drain(mut field: Field) -> Result<()> {
    while field.try_next().await?.is_some() {}
    Ok(())
}
