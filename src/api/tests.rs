//! End-to-end tests driving the router against in-memory SQLite.

use super::{AppState, router};
use crate::config::AppConfig;
use crate::db::{self, create_schema, seed_defaults};
use crate::models::Bulan;
use crate::report::school_offset;
use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::header::{AUTHORIZATION, CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::{HeaderMap, Method, Request, StatusCode};
use chrono::{Datelike, Utc};
use serde_json::{Value, json};
use tower::ServiceExt;

async fn setup() -> Router {
    let config = AppConfig::default();
    let db = db::connect("sqlite::memory:").await.unwrap();
    create_schema(&db).await.unwrap();
    seed_defaults(&db, &config.auth).await.unwrap();
    router(AppState::new(db, config).unwrap())
}

async fn raw(app: &Router, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, HeaderMap, Vec<u8>) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, headers, bytes.to_vec())
}

async fn call(app: &Router, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
    let (status, _, bytes) = raw(app, method, uri, token, body).await;
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

async fn login(app: &Router, username: &str, password: &str) -> String {
    let (status, body) = call(
        app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "username": username, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed for {username}: {body}");
    body["token"].as_str().unwrap().to_string()
}

fn student_body(nis: &str, username: &str, kelas: &str) -> Value {
    json!({
        "nis": nis,
        "nama": format!("Siswa {nis}"),
        "kelas": kelas,
        "no_wa": "081234567890",
        "username": username,
        "password": "rahasia",
    })
}

async fn create_student(app: &Router, admin: &str, nis: &str, username: &str) -> String {
    let (status, body) = call(
        app,
        Method::POST,
        "/api/students",
        Some(admin),
        Some(student_body(nis, username, "XI-1")),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body["id"].as_str().unwrap().to_string()
}

/// Billing period containing today in the school's time zone.
fn current_period() -> (Bulan, i32) {
    let now = Utc::now().with_timezone(&school_offset(7));
    (Bulan::from_number(now.month()).unwrap(), now.year())
}

async fn generate_current(app: &Router, admin: &str) -> Value {
    let (bulan, tahun) = current_period();
    let (status, body) = call(
        app,
        Method::POST,
        "/api/bills/generate",
        Some(admin),
        Some(json!({ "bulan": bulan.name(), "tahun": tahun })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body
}

async fn first_bill(app: &Router, admin: &str, id_siswa: &str) -> Value {
    let (status, body) = call(app, Method::GET, &format!("/api/bills?id_siswa={id_siswa}"), Some(admin), None).await;
    assert_eq!(status, StatusCode::OK);
    body[0].clone()
}

#[tokio::test]
async fn test_root_is_public() {
    let app = setup().await;
    let (status, body) = call(&app, Method::GET, "/api/", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "SPP System API");
}

#[tokio::test]
async fn test_login_and_me() {
    let app = setup().await;
    let token = login(&app, "admin", "admin123").await;

    let (status, body) = call(&app, Method::GET, "/api/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "admin");
    assert!(body["exp"].as_i64().unwrap() > body["iat"].as_i64().unwrap());
}

#[tokio::test]
async fn test_login_wrong_password() {
    let app = setup().await;
    let (status, body) = call(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "username": "admin", "password": "salah" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["detail"], "Username atau password salah");
}

#[tokio::test]
async fn test_missing_token_and_wrong_role() {
    let app = setup().await;
    let (status, _) = call(&app, Method::GET, "/api/students", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = call(&app, Method::GET, "/api/students", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let kepsek = login(&app, "kepsek", "kepsek123").await;
    let (status, body) = call(&app, Method::GET, "/api/students", Some(&kepsek), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body["detail"].is_string());

    let (status, body) = call(&app, Method::GET, "/api/classes", Some(&kepsek), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_student_crud_rules() {
    let app = setup().await;
    let admin = login(&app, "admin", "admin123").await;
    let id = create_student(&app, &admin, "1001", "budi").await;

    let (status, body) = call(&app, Method::POST, "/api/students", Some(&admin), Some(student_body("1001", "other", "X-1"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "NIS sudah terdaftar");

    let (status, _) = call(&app, Method::POST, "/api/students", Some(&admin), Some(student_body("1002", "budi", "X-1"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = call(&app, Method::POST, "/api/students", Some(&admin), Some(student_body("1003", "admin", "X-1"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = call(&app, Method::POST, "/api/students", Some(&admin), Some(student_body("1004", "cici", "XIII-9"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = call(&app, Method::GET, "/api/students?q=100", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert!(body[0].get("password").is_none());

    // Update without a password keeps the old one.
    let mut update = student_body("1001", "budi", "X-1");
    update["password"] = json!("");
    let (status, body) = call(&app, Method::PUT, &format!("/api/students/{id}"), Some(&admin), Some(update)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["kelas"], "X-1");
    login(&app, "budi", "rahasia").await;

    let (status, _) = call(&app, Method::PUT, "/api/students/missing", Some(&admin), Some(student_body("9", "z", "X-1"))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_student_login_returns_nis() {
    let app = setup().await;
    let admin = login(&app, "admin", "admin123").await;
    create_student(&app, &admin, "2001", "sari").await;

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "username": "sari", "password": "rahasia" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["role"], "siswa");
    assert_eq!(body["user"]["nis"], "2001");
}

#[tokio::test]
async fn test_generate_skips_existing_bills() {
    let app = setup().await;
    let admin = login(&app, "admin", "admin123").await;
    let id = create_student(&app, &admin, "3001", "andi").await;

    let body = generate_current(&app, &admin).await;
    assert_eq!(body["generated"], 1);
    assert_eq!(body["message"], "Berhasil generate 1 tagihan");

    let body = generate_current(&app, &admin).await;
    assert_eq!(body["generated"], 0);
    assert_eq!(body["skipped"], 1);

    let bill = first_bill(&app, &admin, &id).await;
    assert_eq!(bill["jumlah"], 550_000);
    assert_eq!(bill["status"], "belum");
    assert_eq!(bill["siswa"]["nis"], "3001");
}

#[tokio::test]
async fn test_student_payment_then_confirm() {
    let app = setup().await;
    let admin = login(&app, "admin", "admin123").await;
    let id = create_student(&app, &admin, "4001", "dewi").await;
    generate_current(&app, &admin).await;
    let bill = first_bill(&app, &admin, &id).await;
    let bill_id = bill["id"].as_str().unwrap().to_string();

    let siswa = login(&app, "dewi", "rahasia").await;
    let payment = json!({ "id_tagihan": bill_id, "id_siswa": id, "jumlah": 550_000 });
    let (status, body) = call(&app, Method::POST, "/api/payments", Some(&siswa), Some(payment.clone())).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["payment"]["status"], "pending");
    assert_eq!(body["payment"]["metode"], "transfer");

    let bill = first_bill(&app, &admin, &id).await;
    assert_eq!(bill["status"], "menunggu_konfirmasi");

    let (status, _) = call(&app, Method::POST, "/api/payments", Some(&siswa), Some(payment)).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = call(
        &app,
        Method::PUT,
        &format!("/api/bills/{bill_id}/confirm"),
        Some(&admin),
        Some(json!({ "status": "lunas" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tagihan"]["status"], "lunas");
    assert_eq!(body["payment"]["status"], "diterima");

    let (status, _) = call(
        &app,
        Method::PUT,
        &format!("/api/bills/{bill_id}/confirm"),
        Some(&admin),
        Some(json!({ "status": "lunas" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (bulan, tahun) = current_period();
    let (status, body) = call(
        &app,
        Method::GET,
        &format!("/api/reports/monthly?bulan={}&tahun={tahun}", bulan.name()),
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_pemasukan"], 550_000);
    assert_eq!(body["total_tagihan"], 1);
    assert_eq!(body["total_lunas"], 1);
    assert_eq!(body["total_belum_lunas"], 0);
    assert_eq!(body["payments"][0]["siswa"]["nis"], "4001");

    let (_, body) = call(&app, Method::GET, "/api/dashboard/stats", Some(&admin), None).await;
    assert_eq!(body["total_siswa"], 1);
    assert_eq!(body["total_bulan_ini"], 550_000);
    assert_eq!(body["siswa_menunggak"], 0);

    let (_, body) = call(&app, Method::GET, "/api/reports/daily", Some(&admin), None).await;
    assert_eq!(body["total"], 550_000);
}

#[tokio::test]
async fn test_rejected_payment_reopens_bill() {
    let app = setup().await;
    let admin = login(&app, "admin", "admin123").await;
    let id = create_student(&app, &admin, "5001", "eka").await;
    generate_current(&app, &admin).await;
    let bill_id = first_bill(&app, &admin, &id).await["id"].as_str().unwrap().to_string();

    let siswa = login(&app, "eka", "rahasia").await;
    let payment = json!({ "id_tagihan": bill_id, "id_siswa": id, "jumlah": 550_000 });
    let (status, _) = call(&app, Method::POST, "/api/payments", Some(&siswa), Some(payment)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = call(
        &app,
        Method::PUT,
        &format!("/api/bills/{bill_id}/confirm"),
        Some(&admin),
        Some(json!({ "status": "belum" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tagihan"]["status"], "belum");

    let (_, body) = call(&app, Method::GET, &format!("/api/student/payments/{id}"), Some(&siswa), None).await;
    assert_eq!(body.as_array().unwrap().len(), 0);

    let (_, body) = call(&app, Method::GET, "/api/dashboard/stats", Some(&admin), None).await;
    assert_eq!(body["siswa_menunggak"], 1);
    assert_eq!(body["total_bulan_ini"], 0);
}

#[tokio::test]
async fn test_admin_payment_is_paid_immediately() {
    let app = setup().await;
    let admin = login(&app, "admin", "admin123").await;
    let id = create_student(&app, &admin, "6001", "fajar").await;
    generate_current(&app, &admin).await;
    let bill_id = first_bill(&app, &admin, &id).await["id"].as_str().unwrap().to_string();

    let payment = json!({ "id_tagihan": bill_id, "id_siswa": id, "jumlah": 550_000, "metode": "tunai" });
    let (status, body) = call(&app, Method::POST, "/api/payments", Some(&admin), Some(payment.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["payment"]["status"], "diterima");
    assert_eq!(first_bill(&app, &admin, &id).await["status"], "lunas");

    let (status, body) = call(&app, Method::POST, "/api/payments", Some(&admin), Some(payment)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Tagihan sudah lunas");

    let (_, body) = call(&app, Method::GET, &format!("/api/payments?id_siswa={id}"), Some(&admin), None).await;
    assert_eq!(body[0]["tagihan"]["tahun"], current_period().1);
}

#[tokio::test]
async fn test_payment_must_match_bill_amount() {
    let app = setup().await;
    let admin = login(&app, "admin", "admin123").await;
    let id = create_student(&app, &admin, "6101", "gilang").await;
    generate_current(&app, &admin).await;
    let bill_id = first_bill(&app, &admin, &id).await["id"].as_str().unwrap().to_string();

    for jumlah in [1, 549_999, 600_000] {
        let payment = json!({ "id_tagihan": bill_id, "id_siswa": id, "jumlah": jumlah });
        let (status, body) = call(&app, Method::POST, "/api/payments", Some(&admin), Some(payment)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["detail"], "Jumlah pembayaran harus sama dengan tagihan (Rp 550.000)");
    }

    let siswa = login(&app, "gilang", "rahasia").await;
    let payment = json!({ "id_tagihan": bill_id, "id_siswa": id, "jumlah": 1 });
    let (status, _) = call(&app, Method::POST, "/api/payments", Some(&siswa), Some(payment)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert_eq!(first_bill(&app, &admin, &id).await["status"], "belum");
    let (bulan, tahun) = current_period();
    let (_, body) = call(
        &app,
        Method::GET,
        &format!("/api/reports/monthly?bulan={}&tahun={tahun}", bulan.name()),
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(body["total_pemasukan"], 0);
    assert_eq!(body["total_lunas"], 0);
}

#[tokio::test]
async fn test_student_cannot_touch_other_students() {
    let app = setup().await;
    let admin = login(&app, "admin", "admin123").await;
    let first = create_student(&app, &admin, "7001", "gita").await;
    let second = create_student(&app, &admin, "7002", "hadi").await;
    generate_current(&app, &admin).await;
    let other_bill = first_bill(&app, &admin, &second).await["id"].as_str().unwrap().to_string();

    let siswa = login(&app, "gita", "rahasia").await;
    let (status, body) = call(&app, Method::GET, &format!("/api/student/profile/{first}"), Some(&siswa), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.get("password").is_none());

    let (status, _) = call(&app, Method::GET, &format!("/api/student/bills/{second}"), Some(&siswa), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let payment = json!({ "id_tagihan": other_bill, "id_siswa": second, "jumlah": 550_000 });
    let (status, _) = call(&app, Method::POST, "/api/payments", Some(&siswa), Some(payment)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = call(&app, Method::GET, &format!("/api/student/bills/{first}"), Some(&siswa), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_class_rules() {
    let app = setup().await;
    let admin = login(&app, "admin", "admin123").await;
    let id = create_student(&app, &admin, "8001", "indah").await;

    let (_, classes) = call(&app, Method::GET, "/api/classes?q=xi-", Some(&admin), None).await;
    let class_id = classes[0]["id"].as_str().unwrap().to_string();
    assert_eq!(classes[0]["nama_kelas"], "XI-1");

    let (status, _) = call(&app, Method::DELETE, &format!("/api/classes/{class_id}"), Some(&admin), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = call(
        &app,
        Method::POST,
        "/api/classes",
        Some(&admin),
        Some(json!({ "nama_kelas": "X-1", "nominal_spp": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = call(
        &app,
        Method::PUT,
        &format!("/api/classes/{class_id}"),
        Some(&admin),
        Some(json!({ "nama_kelas": "XI-IPA", "nominal_spp": 575_000 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["nama_kelas"], "XI-IPA");

    let (_, students) = call(&app, Method::GET, "/api/students", Some(&admin), None).await;
    assert_eq!(students[0]["id"], id.as_str());
    assert_eq!(students[0]["kelas"], "XI-IPA");

    let (status, _) = call(&app, Method::DELETE, &format!("/api/students/{id}"), Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = call(&app, Method::DELETE, &format!("/api/classes/{class_id}"), Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_delete_student_removes_bills() {
    let app = setup().await;
    let admin = login(&app, "admin", "admin123").await;
    let id = create_student(&app, &admin, "9001", "joko").await;
    generate_current(&app, &admin).await;

    let (status, _) = call(&app, Method::DELETE, &format!("/api/students/{id}"), Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = call(&app, Method::GET, "/api/bills", Some(&admin), None).await;
    assert_eq!(body.as_array().unwrap().len(), 0);

    let (status, _) = call(&app, Method::DELETE, &format!("/api/students/{id}"), Some(&admin), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_exports_are_attachments() {
    let app = setup().await;
    let kepsek = login(&app, "kepsek", "kepsek123").await;

    let (status, headers, bytes) = raw(
        &app,
        Method::GET,
        "/api/reports/export-excel?bulan=Januari&tahun=2025",
        Some(&kepsek),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        headers[CONTENT_DISPOSITION].to_str().unwrap(),
        "attachment; filename=laporan_Januari_2025.xlsx"
    );
    assert!(bytes.starts_with(b"PK"));

    let (status, headers, bytes) = raw(
        &app,
        Method::GET,
        "/api/reports/export-pdf?bulan=Januari&tahun=2025",
        Some(&kepsek),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers[CONTENT_TYPE].to_str().unwrap(), "application/pdf");
    assert!(bytes.starts_with(b"%PDF"));
}

#[tokio::test]
async fn test_whatsapp_send_uses_mock() {
    let app = setup().await;
    let admin = login(&app, "admin", "admin123").await;
    let (status, body) = call(
        &app,
        Method::POST,
        "/api/whatsapp/send",
        Some(&admin),
        Some(json!({ "nomor": "081234567890", "pesan": "Halo" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["mock"], true);
}

#[tokio::test]
async fn test_bad_input_is_400_with_detail() {
    let app = setup().await;
    let admin = login(&app, "admin", "admin123").await;

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/bills/generate",
        Some(&admin),
        Some(json!({ "bulan": "January", "tahun": 2025 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].as_str().unwrap().contains("Bulan tidak valid"));

    let (status, body) = call(&app, Method::GET, "/api/reports/monthly?bulan=Mei", Some(&admin), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].is_string());
}

#[tokio::test]
async fn test_confirm_cannot_set_waiting() {
    let app = setup().await;
    let admin = login(&app, "admin", "admin123").await;
    let id = create_student(&app, &admin, "9101", "kiki").await;
    generate_current(&app, &admin).await;
    let bill_id = first_bill(&app, &admin, &id).await["id"].as_str().unwrap().to_string();

    let (status, _) = call(
        &app,
        Method::PUT,
        &format!("/api/bills/{bill_id}/confirm"),
        Some(&admin),
        Some(json!({ "status": "menunggu_konfirmasi" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = call(
        &app,
        Method::PUT,
        &format!("/api/bills/{bill_id}/confirm"),
        Some(&admin),
        Some(json!({ "status": "lunas" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["payment"]["metode"], "tunai");
    assert_eq!(body["payment"]["jumlah"], 550_000);
}
