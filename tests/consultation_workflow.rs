//! Consultation Workflow Tests
//!
//! End-to-end consultation rules over the real router: consultations
//! attach to completed appointments only, one per appointment, with
//! parties matching the appointment record.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use chrono::{Duration, Utc};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use carebase::auth::{JwtConfig, JwtManager, Role};
use carebase::http_server::HttpServer;

fn app() -> Router {
    HttpServer::new().router()
}

fn admin_token() -> String {
    JwtManager::new(JwtConfig::default())
        .issue(Uuid::new_v4(), Role::Admin)
        .unwrap()
}

async fn send(
    app: &Router,
    method: &str,
    path: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }

    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, body)
}

struct Ward {
    token: String,
    patient_id: String,
    doctor_id: String,
    appointment_id: String,
}

/// Provision a clinic and one appointment, optionally already
/// completed.
async fn seed_ward(app: &Router, complete: bool) -> Ward {
    let admin = admin_token();

    let (_, body) = send(
        app,
        "POST",
        "/auth/signup",
        None,
        Some(json!({
            "username": "fluepatient",
            "email": "flue.patient@example.com",
            "password": "correct-horse-9",
            "first_name": "Frida",
            "last_name": "Flue"
        })),
    )
    .await;
    let patient_user_id = body["id"].as_str().unwrap().to_string();

    let (_, body) = send(
        app,
        "POST",
        "/auth/login",
        None,
        Some(json!({ "email": "flue.patient@example.com", "password": "correct-horse-9" })),
    )
    .await;
    let token = body["token"].as_str().unwrap().to_string();

    let (_, body) = send(
        app,
        "POST",
        "/patients/profile",
        Some(&token),
        Some(json!({
            "user_id": patient_user_id,
            "date_of_birth": "1979-11-21",
            "gender": "FEMALE",
            "blood_group": "B+",
            "emergency_contact_name": "Frank Flue",
            "emergency_contact_phone": "+15550177"
        })),
    )
    .await;
    let patient_id = body["id"].as_str().unwrap().to_string();

    let (_, body) = send(
        app,
        "POST",
        "/admin/departments",
        Some(&admin),
        Some(json!({ "name": "General Medicine" })),
    )
    .await;
    let department_id = body["id"].as_str().unwrap().to_string();

    let (_, body) = send(
        app,
        "POST",
        "/admin/users",
        Some(&admin),
        Some(json!({
            "username": "drhouse",
            "email": "house@hospital.example.com",
            "password": "not-lupus-123",
            "first_name": "Greg",
            "last_name": "House",
            "role": "DOCTOR"
        })),
    )
    .await;
    let doctor_user_id = body["id"].as_str().unwrap().to_string();

    let (_, body) = send(
        app,
        "POST",
        "/admin/doctors",
        Some(&admin),
        Some(json!({
            "user_id": doctor_user_id,
            "specialization": "Diagnostics",
            "license_number": "MD-0042",
            "department_id": department_id,
            "consultation_fee": 250.0
        })),
    )
    .await;
    let doctor_id = body["id"].as_str().unwrap().to_string();

    let when = Utc::now() + Duration::days(1);
    let (_, body) = send(
        app,
        "POST",
        "/appointments",
        Some(&token),
        Some(json!({
            "patient_id": patient_id,
            "doctor_id": doctor_id,
            "scheduled_at": when,
            "duration_minutes": 45,
            "notes": "persistent cough"
        })),
    )
    .await;
    let appointment_id = body["id"].as_str().unwrap().to_string();

    if complete {
        let (status, _) = send(
            app,
            "PUT",
            &format!("/appointments/{appointment_id}"),
            Some(&token),
            Some(json!({
                "scheduled_at": when,
                "duration_minutes": 45,
                "status": "COMPLETED"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    Ward {
        token,
        patient_id,
        doctor_id,
        appointment_id,
    }
}

fn consultation_body(ward: &Ward, diagnosis: &str) -> Value {
    json!({
        "appointment_id": ward.appointment_id,
        "patient_id": ward.patient_id,
        "doctor_id": ward.doctor_id,
        "diagnosis": diagnosis,
        "notes": "rest and fluids"
    })
}

// =============================================================================
// Creation rules
// =============================================================================

/// A consultation for a completed appointment is created editable.
#[tokio::test]
async fn test_consultation_after_completion() {
    let app = app();
    let ward = seed_ward(&app, true).await;

    let (status, body) = send(
        &app,
        "POST",
        "/consultations",
        Some(&ward.token),
        Some(consultation_body(&ward, "flu")),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["diagnosis"], "flu");
    assert_eq!(body["is_editable"], true);
    assert_eq!(body["appointment_id"].as_str().unwrap(), ward.appointment_id);
}

/// A second consultation for the same appointment is a conflict.
#[tokio::test]
async fn test_second_consultation_is_409() {
    let app = app();
    let ward = seed_ward(&app, true).await;

    let (status, _) = send(
        &app,
        "POST",
        "/consultations",
        Some(&ward.token),
        Some(consultation_body(&ward, "flu")),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        &app,
        "POST",
        "/consultations",
        Some(&ward.token),
        Some(consultation_body(&ward, "second opinion")),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "consultation already exists for this appointment");
}

/// A pending appointment cannot carry a consultation yet.
#[tokio::test]
async fn test_pending_appointment_rejected() {
    let app = app();
    let ward = seed_ward(&app, false).await;

    let (status, body) = send(
        &app,
        "POST",
        "/consultations",
        Some(&ward.token),
        Some(consultation_body(&ward, "flu")),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"],
        "consultation can only be created for completed appointments"
    );
}

/// The consultation's parties must match the appointment's.
#[tokio::test]
async fn test_party_mismatch_rejected() {
    let app = app();
    let ward = seed_ward(&app, true).await;

    let mut body = consultation_body(&ward, "flu");
    body["patient_id"] = json!(Uuid::new_v4());
    let (status, response) = send(&app, "POST", "/consultations", Some(&ward.token), Some(body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["error"], "patient and doctor must match the appointment");
}

/// An empty diagnosis is rejected.
#[tokio::test]
async fn test_blank_diagnosis_rejected() {
    let app = app();
    let ward = seed_ward(&app, true).await;

    let (status, body) = send(
        &app,
        "POST",
        "/consultations",
        Some(&ward.token),
        Some(consultation_body(&ward, "   ")),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "diagnosis is required");
}

/// An unknown appointment is 404.
#[tokio::test]
async fn test_unknown_appointment_is_404() {
    let app = app();
    let ward = seed_ward(&app, true).await;

    let mut body = consultation_body(&ward, "flu");
    body["appointment_id"] = json!(Uuid::new_v4());
    let (status, response) = send(&app, "POST", "/consultations", Some(&ward.token), Some(body)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(response["error"], "appointment not found");
}

// =============================================================================
// Queries
// =============================================================================

/// The appointment filter answers the single 1:1 record; the patient
/// filter answers a list.
#[tokio::test]
async fn test_query_shapes() {
    let app = app();
    let ward = seed_ward(&app, true).await;

    let (_, created) = send(
        &app,
        "POST",
        "/consultations",
        Some(&ward.token),
        Some(consultation_body(&ward, "flu")),
    )
    .await;
    let consultation_id = created["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        "GET",
        &format!("/consultations?appointment_id={}", ward.appointment_id),
        Some(&ward.token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"].as_str().unwrap(), consultation_id);

    let (status, body) = send(
        &app,
        "GET",
        &format!("/consultations?patient_id={}", ward.patient_id),
        Some(&ward.token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, body) = send(&app, "GET", "/consultations", Some(&ward.token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"],
        "appointment_id or patient_id query parameter is required"
    );

    let (status, body) = send(
        &app,
        "GET",
        &format!("/consultations/{consultation_id}"),
        Some(&ward.token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["diagnosis"], "flu");
}

// =============================================================================
// Updates
// =============================================================================

/// Updates replace the diagnosis and notes while the record is
/// editable.
#[tokio::test]
async fn test_update_replaces_diagnosis() {
    let app = app();
    let ward = seed_ward(&app, true).await;

    let (_, created) = send(
        &app,
        "POST",
        "/consultations",
        Some(&ward.token),
        Some(consultation_body(&ward, "flu")),
    )
    .await;
    let consultation_id = created["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/consultations/{consultation_id}"),
        Some(&ward.token),
        Some(json!({ "diagnosis": "influenza A", "notes": "antivirals prescribed" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["diagnosis"], "influenza A");
    assert_eq!(body["notes"], "antivirals prescribed");

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/consultations/{consultation_id}"),
        Some(&ward.token),
        Some(json!({ "diagnosis": "" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "diagnosis is required");
}
