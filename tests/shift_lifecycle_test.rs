mod common;

use axum::http::StatusCode;
use chrono::{Days, NaiveDate};
use common::TestApp;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use std::str::FromStr;

fn decimal_field(value: &Value) -> Decimal {
    match value {
        Value::String(s) => Decimal::from_str(s).expect("decimal string"),
        Value::Number(n) => Decimal::from_str(&n.to_string()).expect("decimal number"),
        other => panic!("not a decimal value: {other}"),
    }
}

async fn open_shift(app: &TestApp, token: &str, fecha: &str, tipo: &str) -> (StatusCode, Value) {
    app.request(
        "POST",
        "/api/shifts",
        Some(token),
        Some(json!({"fecha": fecha, "tipo": tipo})),
    )
    .await
}

async fn seed_product(app: &TestApp, token: &str, nombre: &str, precio: &str, stock: i32) -> i64 {
    let (status, body) = app
        .request(
            "POST",
            "/api/products",
            Some(token),
            Some(json!({"nombre": nombre, "precio": precio, "stock": stock})),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    body["data"]["id"].as_i64().unwrap()
}

#[tokio::test]
async fn opening_a_shift_creates_four_zeroed_pump_readings() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;

    let (status, body) = open_shift(&app, &token, "2024-01-01", "dia").await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["estado"], "abierto");
    assert_eq!(body["data"]["encargado_nombre"], "admin delturno");
    assert!(body["data"]["fecha_cierre"].is_null());
    // The open response itself carries no nested readings
    assert!(body["data"].get("surtidores").is_none());

    let (status, body) = app
        .request("GET", "/api/shifts/active", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let surtidores = body["data"]["surtidores"].as_array().unwrap();
    assert_eq!(surtidores.len(), 4);
    for (idx, surtidor) in surtidores.iter().enumerate() {
        assert_eq!(surtidor["numero_surtidor"], (idx + 1) as i64);
        assert_eq!(decimal_field(&surtidor["lectura_inicial"]), Decimal::ZERO);
        assert_eq!(decimal_field(&surtidor["lectura_final"]), Decimal::ZERO);
        // Unit price snapshot comes from the configured fuel price
        assert_eq!(
            decimal_field(&surtidor["precio_metro"]),
            dec!(1500)
        );
    }
    assert_eq!(body["data"]["ventas"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn only_one_shift_may_be_open() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;

    let (status, _) = open_shift(&app, &token, "2024-01-01", "dia").await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = open_shift(&app, &token, "2024-01-01", "noche").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "A shift is already open");
}

#[tokio::test]
async fn no_active_shift_is_a_null_payload_not_an_error() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;

    let (status, body) = app
        .request("GET", "/api/shifts/active", Some(&token), None)
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert!(body["data"].is_null());
}

#[tokio::test]
async fn recording_a_sale_decrements_stock_and_snapshots_the_price() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;
    let product_id = seed_product(&app, &token, "Aceite", "2000", 10).await;

    let (_, body) = open_shift(&app, &token, "2024-01-01", "dia").await;
    let shift_id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = app
        .request(
            "POST",
            "/api/shifts/sale",
            Some(&token),
            Some(json!({"turno_id": shift_id, "producto_id": product_id, "cantidad": 5})),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["producto_nombre"], "Aceite");
    assert_eq!(body["data"]["cantidad"], 5);
    assert_eq!(
        decimal_field(&body["data"]["precio_unitario"]),
        dec!(2000)
    );
    assert_eq!(decimal_field(&body["data"]["total"]), dec!(10000));

    // Stock dropped from 10 to 5
    let (_, body) = app.request("GET", "/api/products", Some(&token), None).await;
    assert_eq!(body["data"][0]["stock"], 5);

    // A later price change does not rewrite the recorded sale
    app.request(
        "PUT",
        &format!("/api/products/{product_id}"),
        Some(&token),
        Some(json!({"nombre": "Aceite", "precio": "9999", "stock": 5})),
    )
    .await;

    let (_, body) = app
        .request("GET", "/api/shifts/active", Some(&token), None)
        .await;
    let ventas = body["data"]["ventas"].as_array().unwrap();
    assert_eq!(ventas.len(), 1);
    assert_eq!(
        decimal_field(&ventas[0]["precio_unitario"]),
        dec!(2000)
    );
}

#[tokio::test]
async fn insufficient_stock_leaves_stock_and_sales_untouched() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;
    let product_id = seed_product(&app, &token, "Aceite", "2000", 3).await;

    let (_, body) = open_shift(&app, &token, "2024-01-01", "dia").await;
    let shift_id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = app
        .request(
            "POST",
            "/api/shifts/sale",
            Some(&token),
            Some(json!({"turno_id": shift_id, "producto_id": product_id, "cantidad": 4})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    let (_, body) = app.request("GET", "/api/products", Some(&token), None).await;
    assert_eq!(body["data"][0]["stock"], 3);

    let (_, body) = app
        .request("GET", "/api/shifts/active", Some(&token), None)
        .await;
    assert_eq!(body["data"]["ventas"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn sales_require_an_existing_open_shift_and_active_product() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;
    let product_id = seed_product(&app, &token, "Aceite", "2000", 10).await;

    // Unknown shift
    let (status, _) = app
        .request(
            "POST",
            "/api/shifts/sale",
            Some(&token),
            Some(json!({"turno_id": 999, "producto_id": product_id, "cantidad": 1})),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = open_shift(&app, &token, "2024-01-01", "dia").await;
    let shift_id = body["data"]["id"].as_i64().unwrap();

    // Unknown product
    let (status, _) = app
        .request(
            "POST",
            "/api/shifts/sale",
            Some(&token),
            Some(json!({"turno_id": shift_id, "producto_id": 999, "cantidad": 1})),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Soft-deleted product cannot be sold
    app.request(
        "DELETE",
        &format!("/api/products/{product_id}"),
        Some(&token),
        None,
    )
    .await;
    let (status, _) = app
        .request(
            "POST",
            "/api/shifts/sale",
            Some(&token),
            Some(json!({"turno_id": shift_id, "producto_id": product_id, "cantidad": 1})),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Closed shift rejects sales
    app.request(
        "PUT",
        &format!("/api/shifts/{shift_id}/close"),
        Some(&token),
        None,
    )
    .await;
    let other_product = seed_product(&app, &token, "Aditivo", "500", 5).await;
    let (status, body) = app
        .request(
            "POST",
            "/api/shifts/sale",
            Some(&token),
            Some(json!({"turno_id": shift_id, "producto_id": other_product, "cantidad": 1})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn pump_reading_updates_are_validated() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;

    let (_, body) = open_shift(&app, &token, "2024-01-01", "dia").await;
    let shift_id = body["data"]["id"].as_i64().unwrap();

    let (_, body) = app
        .request("GET", "/api/shifts/active", Some(&token), None)
        .await;
    let reading_id = body["data"]["surtidores"][0]["id"].as_i64().unwrap();

    // Final below initial is rejected
    let (status, _) = app
        .request(
            "PUT",
            &format!("/api/shifts/surtidor/{reading_id}"),
            Some(&token),
            Some(json!({"lectura_inicial": "100", "lectura_final": "50"})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Valid update persists
    let (status, body) = app
        .request(
            "PUT",
            &format!("/api/shifts/surtidor/{reading_id}"),
            Some(&token),
            Some(json!({"lectura_inicial": "100", "lectura_final": "150"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(decimal_field(&body["data"]["lectura_final"]), dec!(150));

    // Unknown reading
    let (status, _) = app
        .request(
            "PUT",
            "/api/shifts/surtidor/9999",
            Some(&token),
            Some(json!({"lectura_inicial": "0", "lectura_final": "0"})),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Readings freeze once the shift closes
    app.request(
        "PUT",
        &format!("/api/shifts/{shift_id}/close"),
        Some(&token),
        None,
    )
    .await;
    let (status, _) = app
        .request(
            "PUT",
            &format!("/api/shifts/surtidor/{reading_id}"),
            Some(&token),
            Some(json!({"lectura_inicial": "100", "lectura_final": "200"})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn closing_a_shift_is_terminal() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;

    let (_, body) = open_shift(&app, &token, "2024-01-01", "dia").await;
    let shift_id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = app
        .request(
            "PUT",
            &format!("/api/shifts/{shift_id}/close"),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["estado"], "cerrado");
    assert!(body["data"]["fecha_cierre"].is_string());

    // Second close: the shift is no longer open
    let (status, _) = app
        .request(
            "PUT",
            &format!("/api/shifts/{shift_id}/close"),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // And a new shift can be opened again
    let (status, _) = open_shift(&app, &token, "2024-01-02", "dia").await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn shift_history_orders_by_date_then_type_descending() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;

    for (fecha, tipo) in [
        ("2024-01-02", "dia"),
        ("2024-01-01", "noche"),
        ("2024-01-02", "noche"),
    ] {
        let (status, body) = open_shift(&app, &token, fecha, tipo).await;
        assert_eq!(status, StatusCode::CREATED);
        let id = body["data"]["id"].as_i64().unwrap();
        let (status, _) = app
            .request("PUT", &format!("/api/shifts/{id}/close"), Some(&token), None)
            .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = app.request("GET", "/api/shifts", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 3);

    let order: Vec<(String, String)> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| {
            (
                s["fecha"].as_str().unwrap().to_string(),
                s["tipo"].as_str().unwrap().to_string(),
            )
        })
        .collect();
    assert_eq!(
        order,
        vec![
            ("2024-01-02".to_string(), "noche".to_string()),
            ("2024-01-02".to_string(), "dia".to_string()),
            ("2024-01-01".to_string(), "noche".to_string()),
        ]
    );
}

#[tokio::test]
async fn shift_history_returns_at_most_fifty_rows() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;

    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    for day in 0..55u64 {
        let fecha = start.checked_add_days(Days::new(day)).unwrap();
        let (status, body) =
            open_shift(&app, &token, &fecha.format("%Y-%m-%d").to_string(), "dia").await;
        assert_eq!(status, StatusCode::CREATED);
        let id = body["data"]["id"].as_i64().unwrap();
        app.request("PUT", &format!("/api/shifts/{id}/close"), Some(&token), None)
            .await;
    }

    let (status, body) = app.request("GET", "/api/shifts", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 50);
    // Newest first
    assert_eq!(body["data"][0]["fecha"], "2024-02-24");
}
