use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use std::path::Path;
use std::sync::Arc;
use tempfile::{tempdir, TempDir};
use tower::ServiceExt;

use api_rest::{app_router, AppState};
use guia_core::{CoreConfig, GuideService, RecordStore, UnmappedPolicy};

const SOURCE: &str = "\
Nº BMP,NOMECLATURA/COMPONENTE,Nº SERIE,VL. ATUALIZ.,Seção de Origem,Seção de Destino,Chefia de Origem,Chefia de Destino
101,Cadeira giratória,SN-1,1234.5,A,B,Capt. X,
202,Mesa \u{2013} MDF,SN-2,0,A,B,,Maj. Y
303,Armário,SN-3,10,C,,,
";

fn build_test_router(tmp: &TempDir) -> Router {
    let source = tmp.path().join("patrimonio.csv");
    std::fs::write(&source, SOURCE).unwrap();

    let store = RecordStore::from_csv_path(&source).unwrap();
    let cfg = CoreConfig::new(tmp.path().join("static"), UnmappedPolicy::Reject).unwrap();
    app_router(AppState {
        guide_service: GuideService::new(Arc::new(cfg), Arc::new(store)),
    })
}

fn json_request(method: Method, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn output_files(dir: &Path) -> usize {
    std::fs::read_dir(dir).map(|it| it.count()).unwrap_or(0)
}

#[tokio::test]
async fn health_reports_loaded_records() {
    let tmp = tempdir().unwrap();
    let app = build_test_router(&tmp);

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["ok"], true);
    assert_eq!(body["records"], 3);
}

#[tokio::test]
async fn form_context_lists_distinct_sections() {
    let tmp = tempdir().unwrap();
    let app = build_test_router(&tmp);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/form-context")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["origin_sections"], serde_json::json!(["A", "C"]));
    assert_eq!(body["destination_sections"], serde_json::json!(["B"]));
}

#[tokio::test]
async fn generate_returns_pdf_attachment() {
    let tmp = tempdir().unwrap();
    let app = build_test_router(&tmp);

    let response = app
        .oneshot(json_request(
            Method::POST,
            "/guides",
            serde_json::json!({
                "bmp_numbers": "101, 202",
                "origin_section": "A",
                "destination_section": "B",
                "origin_authority": "Capt. X",
                "destination_authority": "Maj. Y"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/pdf"
    );
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"guia_circulacao_interna.pdf\""
    );
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert!(bytes.starts_with(b"%PDF"));
    assert_eq!(output_files(&tmp.path().join("static")), 1);
}

#[tokio::test]
async fn generate_accepts_original_form_field_names() {
    let tmp = tempdir().unwrap();
    let app = build_test_router(&tmp);

    let response = app
        .oneshot(json_request(
            Method::POST,
            "/guides",
            serde_json::json!({
                "bmp_numbers": "303",
                "secao_origem": "C",
                "secao_destino": "B",
                "chefia_origem": "Ten. Z",
                "chefia_destino": "Maj. Y"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn generate_missing_field_returns_form_context() {
    let tmp = tempdir().unwrap();
    let app = build_test_router(&tmp);

    let response = app
        .oneshot(json_request(
            Method::POST,
            "/guides",
            serde_json::json!({
                "bmp_numbers": "101",
                "origin_section": "A",
                "destination_section": "B",
                "origin_authority": "Capt. X"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Preencha todos os campos!");
    assert_eq!(body["origin_sections"], serde_json::json!(["A", "C"]));
    assert_eq!(output_files(&tmp.path().join("static")), 0);
}

#[tokio::test]
async fn generate_unknown_ids_is_not_found_and_writes_nothing() {
    let tmp = tempdir().unwrap();
    let app = build_test_router(&tmp);

    let response = app
        .oneshot(json_request(
            Method::POST,
            "/guides",
            serde_json::json!({
                "bmp_numbers": "999",
                "origin_section": "A",
                "destination_section": "B",
                "origin_authority": "Capt. X",
                "destination_authority": "Maj. Y"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(
        body["error"],
        "Nenhum BMP encontrado para os números fornecidos."
    );
    assert_eq!(body["destination_sections"], serde_json::json!(["B"]));
    assert!(!tmp.path().join("static").exists());
}

#[tokio::test]
async fn generate_unsupported_character_is_unprocessable() {
    let tmp = tempdir().unwrap();
    let app = build_test_router(&tmp);

    let response = app
        .oneshot(json_request(
            Method::POST,
            "/guides",
            serde_json::json!({
                "bmp_numbers": "101",
                "origin_section": "A",
                "destination_section": "B",
                "origin_authority": "Capt. X \u{2603}",
                "destination_authority": "Maj. Y"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("U+2603"));
}

#[tokio::test]
async fn authority_lookup() {
    let tmp = tempdir().unwrap();
    let app = build_test_router(&tmp);

    let found = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/authority",
            serde_json::json!({"section": "A", "role": "origin"}),
        ))
        .await
        .unwrap();
    assert_eq!(found.status(), StatusCode::OK);
    assert_eq!(body_json(found).await["authority"], "Capt. X");

    let original = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/authority",
            serde_json::json!({"secao": "B", "tipo": "destino"}),
        ))
        .await
        .unwrap();
    assert_eq!(body_json(original).await["authority"], "Maj. Y");

    let empty = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/authority",
            serde_json::json!({"section": "C", "role": "origin"}),
        ))
        .await
        .unwrap();
    assert_eq!(empty.status(), StatusCode::OK);
    assert_eq!(body_json(empty).await["authority"], "");

    let invalid = app
        .oneshot(json_request(
            Method::POST,
            "/authority",
            serde_json::json!({"section": "A", "role": "owner"}),
        ))
        .await
        .unwrap();
    assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(invalid).await["error"], "Tipo inválido");
}
