//! Integration tests for the tarot wizard: steps, checkout, payment
//! return, result generation, export, and reset.

mod common;

use axum::http::StatusCode;
use common::{body_bytes, body_json, get, post, post_json, session_of, tarot_paid, tarot_to_payment};
use serde_json::json;

// ---------------------------------------------------------------------------
// Wizard steps
// ---------------------------------------------------------------------------

#[tokio::test]
async fn fresh_flow_starts_at_welcome_with_catalogs() {
    let harness = common::build_test_app();
    let response = get(&harness.app, "/api/v1/readings/tarot", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["step"], "welcome");
    assert_eq!(json["data"]["payment_verified"], false);
    assert_eq!(json["data"]["catalog"]["spreads"].as_array().unwrap().len(), 7);
    assert_eq!(json["data"]["catalog"]["styles"].as_array().unwrap().len(), 4);
    assert!(json["data"]["catalog"]["analyses"].is_null());
}

#[tokio::test]
async fn welcome_then_configure_reaches_payment() {
    let harness = common::build_test_app();

    let response = post_json(
        &harness.app,
        "/api/v1/readings/tarot/welcome",
        None,
        json!({ "user_name": "  Luna  " }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let session = session_of(&response);
    let json = body_json(response).await;
    assert_eq!(json["data"]["step"], "configure");
    assert_eq!(json["data"]["user_name"], "Luna");

    let response = post_json(
        &harness.app,
        "/api/v1/readings/tarot/configure",
        Some(&session),
        json!({
            "spread_choice": "Cruz Celta",
            "reading_style": "Poética e Introspectiva",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["step"], "payment");
}

#[tokio::test]
async fn empty_name_is_rejected() {
    let harness = common::build_test_app();
    let response = post_json(
        &harness.app,
        "/api/v1/readings/tarot/welcome",
        None,
        json!({ "user_name": "   " }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn configure_before_welcome_is_rejected() {
    let harness = common::build_test_app();
    let response = post_json(
        &harness.app,
        "/api/v1/readings/tarot/configure",
        None,
        json!({
            "spread_choice": "Cruz Celta",
            "reading_style": "Prática e Direta",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_spread_is_not_found() {
    let harness = common::build_test_app();
    let response = post_json(
        &harness.app,
        "/api/v1/readings/tarot/welcome",
        None,
        json!({ "user_name": "Luna" }),
    )
    .await;
    let session = session_of(&response);

    let response = post_json(
        &harness.app,
        "/api/v1/readings/tarot/configure",
        Some(&session),
        json!({
            "spread_choice": "Tiragem Inventada",
            "reading_style": "Prática e Direta",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn back_walks_payment_to_configure_to_welcome() {
    let harness = common::build_test_app();
    let session = tarot_to_payment(&harness.app).await;

    let response = post(&harness.app, "/api/v1/readings/tarot/back", Some(&session)).await;
    assert_eq!(body_json(response).await["data"]["step"], "configure");

    let response = post(&harness.app, "/api/v1/readings/tarot/back", Some(&session)).await;
    assert_eq!(body_json(response).await["data"]["step"], "welcome");

    // No further back from welcome.
    let response = post(&harness.app, "/api/v1/readings/tarot/back", Some(&session)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Checkout
// ---------------------------------------------------------------------------

#[tokio::test]
async fn checkout_snapshots_the_full_configuration() {
    let harness = common::build_test_app();
    let session = tarot_to_payment(&harness.app).await;

    let response = post(
        &harness.app,
        "/api/v1/readings/tarot/checkout",
        Some(&session),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["data"]["url"]
        .as_str()
        .unwrap()
        .starts_with("https://checkout.test/"));

    let created = harness.gateway.created.lock().unwrap();
    let request = created.last().unwrap();
    assert_eq!(request.price_id, "price_tarot_test");
    assert!(uuid::Uuid::parse_str(&request.reference_id).is_ok());
    assert!(request.success_url.contains("{CHECKOUT_SESSION_ID}"));
    assert!(request
        .success_url
        .starts_with("http://localhost:3000/api/v1/readings/tarot/return"));

    let metadata = &request.metadata;
    assert_eq!(metadata.get("flow").unwrap(), "tarot");
    assert_eq!(metadata.get("user_name").unwrap(), "Luna");
    assert_eq!(
        metadata.get("spread_choice").unwrap(),
        "Passado, Presente e Futuro"
    );
    assert_eq!(metadata.get("reading_style").unwrap(), "Mística e Inspiradora");
    assert_eq!(metadata.get("question").unwrap(), "Devo mudar de cidade?");
}

#[tokio::test]
async fn repeated_checkouts_get_fresh_reference_ids() {
    let harness = common::build_test_app();
    let session = tarot_to_payment(&harness.app).await;

    post(&harness.app, "/api/v1/readings/tarot/checkout", Some(&session)).await;
    post(&harness.app, "/api/v1/readings/tarot/checkout", Some(&session)).await;

    let created = harness.gateway.created.lock().unwrap();
    assert_eq!(created.len(), 2);
    assert_ne!(created[0].reference_id, created[1].reference_id);
}

#[tokio::test]
async fn checkout_outside_payment_step_conflicts() {
    let harness = common::build_test_app();
    let response = post(&harness.app, "/api/v1/readings/tarot/checkout", None).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

// ---------------------------------------------------------------------------
// Payment return
// ---------------------------------------------------------------------------

#[tokio::test]
async fn paid_return_lands_on_result_step() {
    let harness = common::build_test_app();
    let session = tarot_paid(&harness).await;

    let response = get(&harness.app, "/api/v1/readings/tarot", Some(&session)).await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["step"], "result");
    assert_eq!(json["data"]["payment_verified"], true);
}

#[tokio::test]
async fn unpaid_return_stays_on_payment_with_a_message() {
    let harness = common::build_test_app();
    let session = tarot_to_payment(&harness.app).await;
    post(&harness.app, "/api/v1/readings/tarot/checkout", Some(&session)).await;

    let checkout_id = harness.gateway.complete_last("unpaid");
    let response = get(
        &harness.app,
        &format!("/api/v1/readings/tarot/return?session_id={checkout_id}"),
        Some(&session),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["step"], "payment");
    assert_eq!(json["data"]["payment_verified"], false);
    assert!(json["data"]["message"]
        .as_str()
        .unwrap()
        .contains("não foi confirmado"));
}

#[tokio::test]
async fn failed_lookup_resets_to_welcome_with_a_message() {
    let harness = common::build_test_app();
    let session = tarot_to_payment(&harness.app).await;
    post(&harness.app, "/api/v1/readings/tarot/checkout", Some(&session)).await;

    let response = get(
        &harness.app,
        "/api/v1/readings/tarot/return?session_id=cs_does_not_exist",
        Some(&session),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["step"], "welcome");
    assert!(json["data"]["message"]
        .as_str()
        .unwrap()
        .contains("verificar seu pagamento"));
}

#[tokio::test]
async fn return_without_session_id_resets_to_welcome() {
    let harness = common::build_test_app();
    let session = tarot_to_payment(&harness.app).await;

    let response = get(
        &harness.app,
        "/api/v1/readings/tarot/return",
        Some(&session),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["step"], "welcome");
}

#[tokio::test]
async fn paid_return_restores_a_lost_session_from_metadata() {
    let harness = common::build_test_app();
    let session = tarot_to_payment(&harness.app).await;
    post(&harness.app, "/api/v1/readings/tarot/checkout", Some(&session)).await;
    let checkout_id = harness.gateway.complete_last("paid");

    // No session header: the redirect arrives in a fresh browser context.
    let response = get(
        &harness.app,
        &format!("/api/v1/readings/tarot/return?session_id={checkout_id}"),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let fresh = session_of(&response);
    assert_ne!(fresh, session);
    let json = body_json(response).await;
    assert_eq!(json["data"]["step"], "result");
    assert_eq!(json["data"]["user_name"], "Luna");
    assert_eq!(json["data"]["payment_verified"], true);
}

#[tokio::test]
async fn replayed_return_does_not_disturb_a_verified_session() {
    let harness = common::build_test_app();
    let session = tarot_paid(&harness).await;

    // Generate the result, then replay the return URL.
    get(&harness.app, "/api/v1/readings/tarot/result", Some(&session)).await;
    assert_eq!(harness.oracle.call_count(), 1);

    let response = get(
        &harness.app,
        "/api/v1/readings/tarot/return?session_id=cs_test_1",
        Some(&session),
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["step"], "result");
    assert_eq!(json["data"]["has_result"], true);
    assert_eq!(harness.oracle.call_count(), 1);
}

// ---------------------------------------------------------------------------
// Result
// ---------------------------------------------------------------------------

#[tokio::test]
async fn result_is_generated_once_and_cached() {
    let harness = common::build_test_app();
    let session = tarot_paid(&harness).await;

    let response = get(&harness.app, "/api/v1/readings/tarot/result", Some(&session)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["title"], "Tarô Místico");
    assert_eq!(json["data"]["user_name"], "Luna");
    assert!(json["data"]["text"].as_str().unwrap().contains("A Revelação"));

    let units = json["data"]["units"].as_array().unwrap();
    assert_eq!(units.len(), 3);
    assert_eq!(units[0]["heading"], "O Passado");
    assert_eq!(units[1]["heading"], "O Presente");
    assert_eq!(units[2]["heading"], "O Futuro");

    // Second fetch must not call the generation service again.
    let response = get(&harness.app, "/api/v1/readings/tarot/result", Some(&session)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(harness.oracle.call_count(), 1);
}

#[tokio::test]
async fn result_prompt_carries_the_drawn_cards_and_question() {
    let harness = common::build_test_app();
    let session = tarot_paid(&harness).await;
    get(&harness.app, "/api/v1/readings/tarot/result", Some(&session)).await;

    let prompts = harness.oracle.prompts.lock().unwrap();
    let prompt = prompts.last().unwrap();
    assert!(prompt.user.contains("Passado, Presente e Futuro"));
    assert!(prompt.user.contains("Devo mudar de cidade?"));
    assert!(prompt.user.contains("O Passado"));
    assert_eq!(prompt.max_tokens, 1000);
    assert!((prompt.temperature - 0.75).abs() < 1e-9);
}

#[tokio::test]
async fn result_before_payment_is_forbidden() {
    let harness = common::build_test_app();
    let session = tarot_to_payment(&harness.app).await;

    let response = get(&harness.app, "/api/v1/readings/tarot/result", Some(&session)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await["code"], "FORBIDDEN");
}

#[tokio::test]
async fn generation_failure_stores_a_fallback_reading() {
    let harness = common::build_test_app();
    let session = tarot_paid(&harness).await;
    harness.oracle.set_fail(true);

    let response = get(&harness.app, "/api/v1/readings/tarot/result", Some(&session)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["data"]["text"]
        .as_str()
        .unwrap()
        .contains("O Oráculo Silenciou"));

    // The fallback is stored like a real result; no retry on refetch.
    harness.oracle.set_fail(false);
    get(&harness.app, "/api/v1/readings/tarot/result", Some(&session)).await;
    assert_eq!(harness.oracle.call_count(), 1);
}

// ---------------------------------------------------------------------------
// Export and reset
// ---------------------------------------------------------------------------

#[tokio::test]
async fn export_returns_a_pdf_attachment() {
    let harness = common::build_test_app();
    let session = tarot_paid(&harness).await;
    get(&harness.app, "/api/v1/readings/tarot/result", Some(&session)).await;

    let response = get(&harness.app, "/api/v1/readings/tarot/export", Some(&session)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "application/pdf"
    );
    assert!(response
        .headers()
        .get("content-disposition")
        .unwrap()
        .to_str()
        .unwrap()
        .contains("leitura-luna.pdf"));

    let bytes = body_bytes(response).await;
    assert!(bytes.starts_with(b"%PDF-1.4"));
}

#[tokio::test]
async fn export_before_payment_is_forbidden() {
    let harness = common::build_test_app();
    let session = tarot_to_payment(&harness.app).await;
    let response = get(&harness.app, "/api/v1/readings/tarot/export", Some(&session)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn reset_clears_the_session_and_revokes_the_result() {
    let harness = common::build_test_app();
    let session = tarot_paid(&harness).await;
    get(&harness.app, "/api/v1/readings/tarot/result", Some(&session)).await;

    let response = post(&harness.app, "/api/v1/readings/tarot/reset", Some(&session)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["step"], "welcome");
    assert_eq!(json["data"]["payment_verified"], false);
    assert_eq!(json["data"]["has_result"], false);

    let response = get(&harness.app, "/api/v1/readings/tarot/result", Some(&session)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
