//! REST integration test macro for storage backends.
//!
//! The `rest_integration_tests!` macro generates HTTP-level tests that drive
//! a `CountryStore` through full REST round-trips:
//! JSON/form → HTTP request → handler → repository → store → HTTP response → JSON.

/// Generate a REST integration test suite for a storage backend.
///
/// `$store_factory` must produce an `impl CountryStore + 'static`.
///
/// # Generated Tests
///
/// ## Lifecycle
/// - `test_rest_lifecycle` - PUT 201, GET 200, DELETE 204, GET 404
/// - `test_rest_create_conflict` - PUT twice → 409, also over a deleted id
/// - `test_rest_patch` - PATCH 200 with one field changed
/// - `test_rest_double_delete` - second DELETE → 404
/// - `test_rest_with_deleted` - `?with_deleted=true` reads through deletes
/// - `test_rest_list`
///
/// ## Payloads
/// - `test_rest_form_body` - form-encoded PUT
/// - `test_rest_missing_field` - 400 with field details
/// - `test_rest_oversize_field` - 400
/// - `test_rest_blank_name` - whitespace-only name → 400
///
/// ## Error handling
/// - `test_rest_invalid_id` - non-integer id → 400
/// - `test_rest_invalid_query` - malformed `with_deleted` → 400 JSON body
/// - `test_rest_patch_not_found`, `test_rest_delete_not_found`
/// - `test_rest_response_hides_deleted_flag`
#[macro_export]
macro_rules! rest_integration_tests {
    ($store_factory:expr) => {
        mod rest_integration_tests {
            use super::*;
            use axum::http::StatusCode;
            use axum_test::TestServer;
            use serde_json::{Value, json};
            use std::sync::Arc;

            async fn make_server() -> TestServer {
                let store = $store_factory;
                let router = storage_harness::integration::build_test_router(Arc::new(store));
                TestServer::new(router)
            }

            fn afghanistan_json() -> Value {
                json!({
                    "country_name": "Afghanistan",
                    "alpha_2_code": "AF",
                    "alpha_3_code": "AFG",
                    "currencies": "AFN"
                })
            }

            // ==============================================================
            // Lifecycle
            // ==============================================================

            #[tokio::test]
            async fn test_rest_lifecycle() {
                let server = make_server().await;

                let response = server.put("/country/0").json(&afghanistan_json()).await;
                response.assert_status(StatusCode::CREATED);
                let body: Value = response.json();
                assert_eq!(body["id"], 0);
                assert_eq!(body["country_name"], "Afghanistan");

                let response = server.get("/country/0").await;
                response.assert_status(StatusCode::OK);
                assert_eq!(
                    response.json::<Value>(),
                    json!({
                        "id": 0,
                        "country_name": "Afghanistan",
                        "alpha_2_code": "AF",
                        "alpha_3_code": "AFG",
                        "currencies": "AFN"
                    })
                );

                server
                    .delete("/country/0")
                    .await
                    .assert_status(StatusCode::NO_CONTENT);

                let response = server.get("/country/0").await;
                response.assert_status(StatusCode::NOT_FOUND);
                assert_eq!(response.json::<Value>()["code"], "COUNTRY_NOT_FOUND");
            }

            #[tokio::test]
            async fn test_rest_create_conflict() {
                let server = make_server().await;

                server
                    .put("/country/1")
                    .json(&afghanistan_json())
                    .await
                    .assert_status(StatusCode::CREATED);

                let response = server.put("/country/1").json(&afghanistan_json()).await;
                response.assert_status(StatusCode::CONFLICT);
                let body: Value = response.json();
                assert_eq!(body["code"], "COUNTRY_ALREADY_EXISTS");
                assert_eq!(body["details"]["id"], 1);

                server.delete("/country/1").await;
                server
                    .put("/country/1")
                    .json(&afghanistan_json())
                    .await
                    .assert_status(StatusCode::CONFLICT);
            }

            #[tokio::test]
            async fn test_rest_patch() {
                let server = make_server().await;
                server.put("/country/2").json(&afghanistan_json()).await;

                let response = server
                    .patch("/country/2")
                    .json(&json!({"currencies": "USD", "country_name": ""}))
                    .await;
                response.assert_status(StatusCode::OK);

                let body: Value = response.json();
                assert_eq!(body["currencies"], "USD");
                assert_eq!(body["country_name"], "Afghanistan");
                assert_eq!(body["alpha_2_code"], "AF");
            }

            #[tokio::test]
            async fn test_rest_double_delete() {
                let server = make_server().await;
                server.put("/country/3").json(&afghanistan_json()).await;

                server
                    .delete("/country/3")
                    .await
                    .assert_status(StatusCode::NO_CONTENT);

                let response = server.delete("/country/3").await;
                response.assert_status(StatusCode::NOT_FOUND);
                assert_eq!(response.json::<Value>()["code"], "COUNTRY_ALREADY_DELETED");
            }

            #[tokio::test]
            async fn test_rest_with_deleted() {
                let server = make_server().await;
                server.put("/country/4").json(&afghanistan_json()).await;
                server.delete("/country/4").await;

                server
                    .get("/country/4")
                    .await
                    .assert_status(StatusCode::NOT_FOUND);

                let response = server
                    .get("/country/4")
                    .add_query_param("with_deleted", true)
                    .await;
                response.assert_status(StatusCode::OK);
                assert_eq!(response.json::<Value>()["country_name"], "Afghanistan");
            }

            #[tokio::test]
            async fn test_rest_list() {
                let server = make_server().await;
                server.put("/country/6").json(&afghanistan_json()).await;
                server.put("/country/5").json(&afghanistan_json()).await;
                server.delete("/country/6").await;

                let response = server.get("/country").await;
                response.assert_status(StatusCode::OK);
                let live: Vec<Value> = response.json();
                assert_eq!(live.len(), 1);
                assert_eq!(live[0]["id"], 5);

                let all: Vec<Value> = server
                    .get("/country")
                    .add_query_param("with_deleted", true)
                    .await
                    .json();
                assert_eq!(all.len(), 2);
                assert_eq!(all[0]["id"], 5);
                assert_eq!(all[1]["id"], 6);
            }

            // ==============================================================
            // Payloads
            // ==============================================================

            #[tokio::test]
            async fn test_rest_form_body() {
                let server = make_server().await;

                let response = server
                    .put("/country/7")
                    .form(&[
                        ("country_name", "Argentina"),
                        ("alpha_2_code", "AR"),
                        ("alpha_3_code", "ARG"),
                        ("currencies", "ARS"),
                    ])
                    .await;
                response.assert_status(StatusCode::CREATED);
                assert_eq!(response.json::<Value>()["country_name"], "Argentina");

                let response = server
                    .patch("/country/7")
                    .form(&[("alpha_2_code", "RA")])
                    .await;
                response.assert_status(StatusCode::OK);
                assert_eq!(response.json::<Value>()["alpha_2_code"], "RA");
            }

            #[tokio::test]
            async fn test_rest_blank_name() {
                let server = make_server().await;

                let response = server
                    .put("/country/9")
                    .json(&json!({
                        "country_name": "   ",
                        "alpha_2_code": "BR",
                        "alpha_3_code": "BRA",
                        "currencies": "BRL"
                    }))
                    .await;
                response.assert_status(StatusCode::BAD_REQUEST);
                assert_eq!(response.json::<Value>()["code"], "VALIDATION_ERROR");

                server
                    .get("/country/9")
                    .await
                    .assert_status(StatusCode::NOT_FOUND);
            }

            #[tokio::test]
            async fn test_rest_missing_field() {
                let server = make_server().await;

                let response = server
                    .put("/country/8")
                    .json(&json!({
                        "country_name": "Brazil",
                        "alpha_2_code": "BR",
                        "alpha_3_code": "BRA"
                    }))
                    .await;
                response.assert_status(StatusCode::BAD_REQUEST);

                let body: Value = response.json();
                assert_eq!(body["code"], "VALIDATION_ERROR");
                assert_eq!(body["details"]["fields"][0]["field"], "currencies");

                server
                    .get("/country/8")
                    .await
                    .assert_status(StatusCode::NOT_FOUND);
            }

            #[tokio::test]
            async fn test_rest_oversize_field() {
                let server = make_server().await;

                let mut body = afghanistan_json();
                body["alpha_2_code"] = json!("TOOLONG");

                server
                    .put("/country/9")
                    .json(&body)
                    .await
                    .assert_status(StatusCode::BAD_REQUEST);
            }

            // ==============================================================
            // Error handling
            // ==============================================================

            #[tokio::test]
            async fn test_rest_invalid_id() {
                let server = make_server().await;

                let response = server.get("/country/not-a-number").await;
                response.assert_status(StatusCode::BAD_REQUEST);
                assert_eq!(response.json::<Value>()["code"], "VALIDATION_ERROR");
            }

            #[tokio::test]
            async fn test_rest_invalid_query() {
                let server = make_server().await;
                server.put("/country/12").json(&afghanistan_json()).await;

                for path in ["/country", "/country/12"] {
                    let response = server
                        .get(path)
                        .add_query_param("with_deleted", 1)
                        .await;
                    response.assert_status(StatusCode::BAD_REQUEST);
                    assert_eq!(response.json::<Value>()["code"], "VALIDATION_ERROR");
                }
            }

            #[tokio::test]
            async fn test_rest_patch_not_found() {
                let server = make_server().await;

                server
                    .patch("/country/404")
                    .json(&json!({"currencies": "EUR"}))
                    .await
                    .assert_status(StatusCode::NOT_FOUND);
            }

            #[tokio::test]
            async fn test_rest_delete_not_found() {
                let server = make_server().await;

                server
                    .delete("/country/404")
                    .await
                    .assert_status(StatusCode::NOT_FOUND);
            }

            #[tokio::test]
            async fn test_rest_response_hides_deleted_flag() {
                let server = make_server().await;
                server.put("/country/11").json(&afghanistan_json()).await;
                server.delete("/country/11").await;

                let body: Value = server
                    .get("/country/11")
                    .add_query_param("with_deleted", true)
                    .await
                    .json();
                assert!(body.get("deleted").is_none());
            }

            #[tokio::test]
            async fn test_rest_health() {
                let server = make_server().await;

                let response = server.get("/healthz").await;
                response.assert_status(StatusCode::OK);
                assert_eq!(response.json::<Value>()["status"], "ok");
            }
        }
    };
}
