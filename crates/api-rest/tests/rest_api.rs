use api_rest::{app, AppState};
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use pms_core::{JsonFileStore, MemoryStore};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt; // for `oneshot`

fn memory_app() -> Router {
    app(AppState::new(MemoryStore::new()))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            Value::String(String::from_utf8_lossy(&bytes).into_owned())
        })
    };
    (status, value)
}

async fn send_raw(
    app: &Router,
    method: &str,
    uri: &str,
    content_type: Option<&str>,
    body: &str,
) -> (StatusCode, String) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(content_type) = content_type {
        builder = builder.header("Content-Type", content_type);
    }
    let request = builder.body(Body::from(body.to_owned())).unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

fn patient(id: &str, height: f64, weight: f64) -> Value {
    json!({
        "id": id,
        "name": format!("Patient {id}"),
        "city": "Pune",
        "age": 30,
        "gender": "Male",
        "height": height,
        "weight": weight,
    })
}

fn asha() -> Value {
    json!({
        "id": "P002",
        "name": "Asha",
        "city": "Pune",
        "age": 28,
        "gender": "Female",
        "height": 160,
        "weight": 55,
    })
}

#[tokio::test]
async fn test_banner_about_and_health() {
    let app = memory_app();

    let (status, body) = send(&app, "GET", "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Patients Management System API");

    let (status, body) = send(&app, "GET", "/about", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["message"],
        "A fully functional Patients Management System API"
    );

    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);
}

#[tokio::test]
async fn test_create_then_view_patient_includes_derived_fields() {
    let app = memory_app();

    let (status, body) = send(&app, "POST", "/create", Some(asha())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Patient created successfully");

    let (status, body) = send(&app, "GET", "/patient/P002", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Asha");
    assert_eq!(body["bmi"], 21.48);
    assert_eq!(body["verdict"], "Normal weight");
}

#[tokio::test]
async fn test_view_returns_object_keyed_by_id_in_insertion_order() {
    let app = memory_app();
    for id in ["P003", "P001", "P002"] {
        let (status, _) = send(&app, "POST", "/create", Some(patient(id, 170.0, 60.0))).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, text) = send_raw(&app, "GET", "/view", None, "").await;
    assert_eq!(status, StatusCode::OK);

    // Key order is only visible in the raw body; `Value` maps are sorted.
    let positions: Vec<usize> = ["P003", "P001", "P002"]
        .iter()
        .map(|id| {
            text.find(&format!("\"{id}\":{{"))
                .unwrap_or_else(|| panic!("{id} missing from {text}"))
        })
        .collect();
    assert!(
        positions.windows(2).all(|pair| pair[0] < pair[1]),
        "keys out of insertion order: {text}"
    );

    let body: Value = serde_json::from_str(&text).unwrap();
    let object = body.as_object().expect("view should return an object");
    assert_eq!(object.len(), 3);
    assert_eq!(object["P001"]["id"], "P001");
    assert_eq!(object["P001"]["bmi"], 20.76);
}

#[tokio::test]
async fn test_unknown_patient_is_404() {
    let app = memory_app();

    let (status, body) = send(&app, "GET", "/patient/P404", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Patient not found");
}

#[tokio::test]
async fn test_duplicate_create_is_400() {
    let app = memory_app();
    send(&app, "POST", "/create", Some(asha())).await;

    let (status, body) = send(&app, "POST", "/create", Some(asha())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Patient ID already exists");
}

#[tokio::test]
async fn test_invalid_create_is_422() {
    let app = memory_app();

    let mut bad_age = asha();
    bad_age["age"] = json!(120);
    let (status, body) = send(&app, "POST", "/create", Some(bad_age)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["detail"].as_str().unwrap().contains("age"));

    let mut bad_gender = asha();
    bad_gender["gender"] = json!("Unknown");
    let (status, _) = send(&app, "POST", "/create", Some(bad_gender)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    // Missing required field is rejected by the JSON extractor.
    let (status, _) = send(&app, "POST", "/create", Some(json!({"id": "P009"}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (_, body) = send(&app, "GET", "/view", None).await;
    assert_eq!(body, json!({}));
}

#[tokio::test]
async fn test_malformed_json_bodies_are_422() {
    let app = memory_app();
    send(&app, "POST", "/create", Some(asha())).await;

    let (status, text) = send_raw(
        &app,
        "POST",
        "/create",
        Some("application/json"),
        r#"{"id": "#,
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = serde_json::from_str(&text).unwrap();
    assert!(body["detail"].is_string());

    let (status, _) = send_raw(
        &app,
        "PUT",
        "/edit/P002",
        Some("application/json"),
        "{oops",
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = send_raw(
        &app,
        "PUT",
        "/edit/P002",
        Some("application/json"),
        r#"{"age": "old"}"#,
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = send_raw(&app, "POST", "/create", None, &asha().to_string()).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (_, body) = send(&app, "GET", "/patient/P002", None).await;
    assert_eq!(body["age"], 28);
}

#[tokio::test]
async fn test_sort_by_bmi_desc_and_invalid_arguments() {
    let app = memory_app();
    send(&app, "POST", "/create", Some(patient("A", 100.0, 20.0))).await;
    send(&app, "POST", "/create", Some(patient("B", 100.0, 30.0))).await;
    send(&app, "POST", "/create", Some(patient("C", 200.0, 80.0))).await;

    let (status, body) = send(&app, "GET", "/sort?sort_by=bmi&order=desc", None).await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["B", "A", "C"]);

    let (status, body) = send(&app, "GET", "/sort?sort_by=weight", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["id"], "A");

    let (status, _) = send(&app, "GET", "/sort?sort_by=age&order=asc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "GET", "/sort?sort_by=bmi&order=random", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "GET", "/sort", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_edit_merges_partial_fields() {
    let app = memory_app();
    send(&app, "POST", "/create", Some(asha())).await;

    let (status, body) = send(
        &app,
        "PUT",
        "/edit/P002",
        Some(json!({"city": "Mumbai", "weight": 70})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Patient updated successfully");

    let (_, body) = send(&app, "GET", "/patient/P002", None).await;
    assert_eq!(body["city"], "Mumbai");
    assert_eq!(body["name"], "Asha");
    assert_eq!(body["bmi"], 27.34);
    assert_eq!(body["verdict"], "Overweight");
}

#[tokio::test]
async fn test_edit_rejects_invalid_merge_and_unknown_id() {
    let app = memory_app();
    send(&app, "POST", "/create", Some(asha())).await;

    let (status, _) = send(
        &app,
        "PUT",
        "/edit/P002",
        Some(json!({"city": "Mumbai", "age": 0})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = send(&app, "PUT", "/edit/P002", Some(json!({"name": null}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (_, body) = send(&app, "GET", "/patient/P002", None).await;
    assert_eq!(body["city"], "Pune");
    assert_eq!(body["age"], 28);

    let (status, body) = send(&app, "PUT", "/edit/P404", Some(json!({"age": 30}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Patient not found");
}

#[tokio::test]
async fn test_delete_removes_patient() {
    let app = memory_app();
    send(&app, "POST", "/create", Some(asha())).await;

    let (status, body) = send(&app, "DELETE", "/delete/P002", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Patient deleted successfully");

    let (status, _) = send(&app, "GET", "/patient/P002", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "DELETE", "/delete/P002", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_file_store_layout_after_requests() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("patients.json");
    let app = app(AppState::new(JsonFileStore::new(&path)));

    send(&app, "POST", "/create", Some(asha())).await;
    send(&app, "PUT", "/edit/P002", Some(json!({"age": 29}))).await;

    let raw: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(
        raw,
        json!({
            "P002": {
                "name": "Asha",
                "city": "Pune",
                "age": 29,
                "gender": "Female",
                "height": 160.0,
                "weight": 55.0
            }
        })
    );
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let app = memory_app();

    let (status, body) = send(&app, "GET", "/api-docs/openapi.json", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/create"].is_object());
    assert!(body["components"]["schemas"]["PatientView"].is_object());
}
