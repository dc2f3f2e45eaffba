use axum::{
    extract::{Multipart, State},
    http::{header, StatusCode},
    response::Response,
    Json,
    body::Body,
};
use std::sync::Arc;
use std::time::Instant;

use super::models::*;
use crate::config::Config;
use crate::pipeline::{Converter, Direction};
use crate::projection::Srs;
use crate::Error;

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (status, Json(ErrorResponse { error: message.into() }))
}

pub async fn gpx_to_pnezd(
    State(config): State<Arc<Config>>,
    multipart: Multipart,
) -> Result<Response, ApiError> {
    convert_upload(config, multipart, Direction::GpxToPnezd).await
}

pub async fn pnezd_to_gpx(
    State(config): State<Arc<Config>>,
    multipart: Multipart,
) -> Result<Response, ApiError> {
    convert_upload(config, multipart, Direction::PnezdToGpx).await
}

async fn read_upload(mut multipart: Multipart) -> Result<ConversionUpload, ApiError> {
    let mut upload = ConversionUpload::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| api_error(StatusCode::BAD_REQUEST, format!("Invalid upload: {}", e)))?
    {
        let name = field.name().unwrap_or("").to_string();
        let text = || api_error(StatusCode::BAD_REQUEST, format!("Field '{}' is not UTF-8 text", name));

        match name.as_str() {
            "file" => upload.file = Some(field.text().await.map_err(|_| text())?),
            "srs" => upload.srs = Some(field.text().await.map_err(|_| text())?),
            _ => {}
        }
    }

    Ok(upload)
}

async fn convert_upload(
    config: Arc<Config>,
    multipart: Multipart,
    direction: Direction,
) -> Result<Response, ApiError> {
    let start = Instant::now();
    let upload = read_upload(multipart).await?;

    let input = upload
        .file
        .ok_or_else(|| api_error(StatusCode::BAD_REQUEST, "Missing file field"))?;

    let srs = match upload.srs.filter(|s| !s.trim().is_empty()) {
        Some(text) => text
            .parse::<Srs>()
            .map_err(|e| api_error(StatusCode::BAD_REQUEST, e.to_string()))?,
        None => config.target_srs.clone(),
    };

    let output = tokio::task::spawn_blocking(move || {
        Converter::with_proj(&config).convert(direction, &input, &srs)
    })
    .await
    .map_err(|e| api_error(StatusCode::INTERNAL_SERVER_ERROR, format!("Conversion task failed: {}", e)))?
    .map_err(|e| {
        let status = match e {
            Error::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::UNPROCESSABLE_ENTITY,
        };
        api_error(status, format!("Failed to convert: {}", e))
    })?;

    tracing::info!(
        %direction,
        bytes = output.len(),
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        "served conversion"
    );

    let (content_type, filename) = match direction {
        Direction::GpxToPnezd => (mime::TEXT_CSV.as_ref(), "points.csv"),
        Direction::PnezdToGpx => ("application/gpx+xml", "waypoints.gpx"),
    };

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", filename),
        )
        .body(Body::from(output))
        .map_err(|e| api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
}
