use axum::body::Body;
use axum::http::{header, Request, Response, StatusCode};
use gpx_pnezd::api::create_router;
use gpx_pnezd::Config;
use tower::ServiceExt;

const BOUNDARY: &str = "api-conversion-boundary";

const WAYPOINTS: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<gpx creator="GPSMAP 64" version="1.1" xmlns="http://www.topografix.com/GPX/1/1">
  <wpt lat="41.097316" lon="-123.69617">
    <ele>107.7531</ele>
    <name>4501</name>
    <desc>SW212</desc>
  </wpt>
  <wpt lat="41.097400" lon="-123.69600">
    <name>4502</name>
  </wpt>
</gpx>"#;

fn upload(uri: &str, fields: &[(&str, &str)]) -> Request<Body> {
    let mut body = String::new();
    for (name, value) in fields {
        body.push_str(&format!(
            "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
            BOUNDARY, name, value
        ));
    }
    body.push_str(&format!("--{}--\r\n", BOUNDARY));

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn header_value<'a>(response: &'a Response<Body>, name: header::HeaderName) -> &'a str {
    response.headers().get(name).unwrap().to_str().unwrap()
}

#[tokio::test]
async fn test_gpx_upload_returns_pnezd() {
    let app = create_router(Config::default());
    let response = app
        .oneshot(upload("/api/gpx-to-pnezd", &[("file", WAYPOINTS), ("srs", "EPSG:2229")]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(header_value(&response, header::CONTENT_TYPE).starts_with("text/csv"));
    assert_eq!(
        header_value(&response, header::CONTENT_DISPOSITION),
        "attachment; filename=\"points.csv\""
    );

    let text = body_text(response).await;
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("4501,"));
    assert!(lines[0].ends_with(",SW212"));
    assert!(lines[1].ends_with(",,WAYPOINT"));
}

#[tokio::test]
async fn test_default_srs_from_config() {
    let app = create_router(Config::default());
    let response = app
        .oneshot(upload("/api/gpx-to-pnezd", &[("file", WAYPOINTS)]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await.lines().count(), 2);
}

#[tokio::test]
async fn test_pnezd_upload_returns_gpx() {
    let pnezd = "4501,2000000.0000,6000000.0000,353.5300,SW212\n";
    let app = create_router(Config::default());
    let response = app
        .oneshot(upload("/api/pnezd-to-gpx", &[("file", pnezd), ("srs", "EPSG:2229")]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(header_value(&response, header::CONTENT_TYPE), "application/gpx+xml");
    assert_eq!(
        header_value(&response, header::CONTENT_DISPOSITION),
        "attachment; filename=\"waypoints.gpx\""
    );

    let doc = body_text(response).await;
    assert_eq!(doc.matches("<wpt ").count(), 1);
    assert!(doc.contains("<name>4501</name>"));
}

#[tokio::test]
async fn test_malformed_gpx_is_unprocessable() {
    let app = create_router(Config::default());
    let response = app
        .oneshot(upload("/api/gpx-to-pnezd", &[("file", "<gpx><wpt lat=\"1\""), ("srs", "EPSG:2229")]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert!(json["error"].as_str().unwrap().starts_with("Failed to convert"));
}

#[tokio::test]
async fn test_malformed_pnezd_is_unprocessable() {
    let app = create_router(Config::default());
    let response = app
        .oneshot(upload("/api/pnezd-to-gpx", &[("file", "4501,2000000\n"), ("srs", "EPSG:2229")]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_unknown_srs_is_unprocessable() {
    let app = create_router(Config::default());
    let response = app
        .oneshot(upload("/api/gpx-to-pnezd", &[("file", WAYPOINTS), ("srs", "EPSG:999999")]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}
