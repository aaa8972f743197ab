// ABOUTME: Integration tests for quote endpoints
// ABOUTME: Caller-derived vendor identity, the one-quote-per-rfp rule, and visibility

mod common;

use common::{
    approve_vendor, create_category, delete, get, login, post_json, put_json, register_vendor,
    seed_admin, setup_test_server, TestContext, VENDOR_PASSWORD,
};
use serde_json::{json, Value};

/// Category + approved vendor + RFP assigned to it; returns
/// (admin_token, category_id, vendor_id, rfp_id).
async fn setup_rfp(ctx: &TestContext) -> (String, String, String, String) {
    let admin_token = seed_admin(ctx).await;
    let category_id = create_category(ctx, &admin_token, "Electronics").await;
    let vendor_id = register_vendor(ctx, "acme", Some(&category_id)).await;
    approve_vendor(ctx, &admin_token, &vendor_id).await;

    let response = post_json(
        &ctx.base_url,
        "/rfps",
        &json!({
            "name": "Bulk laptops",
            "description": "200 units",
            "quantity": 200,
            "last_date": "2026-12-31",
            "min_price": 400.0,
            "max_price": 900.0,
            "category_id": category_id,
            "assigned_vendor_id": vendor_id,
        }),
        Some(&admin_token),
    )
    .await;
    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.unwrap();
    let rfp_id = body["data"]["id"].as_str().unwrap().to_string();

    (admin_token, category_id, vendor_id, rfp_id)
}

#[tokio::test]
async fn test_vendor_identity_comes_from_caller_not_body() {
    let ctx = setup_test_server().await;
    let (_admin, category_id, vendor_id, rfp_id) = setup_rfp(&ctx).await;

    // a second vendor the caller will try to impersonate
    let other_vendor = register_vendor(&ctx, "other", Some(&category_id)).await;

    let token = login(&ctx, "vendor_acme", VENDOR_PASSWORD).await;
    let response = post_json(
        &ctx.base_url,
        "/quotes",
        &json!({
            "rfp_id": rfp_id,
            // a client-supplied vendor is ignored outright
            "vendor_id": other_vendor,
            "price": 650.0,
            "quantity": 200,
            "description": "Includes 3-year warranty",
            "total_cost": 130000.0,
        }),
        Some(&token),
    )
    .await;

    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["data"]["vendor_id"], vendor_id);
    assert_eq!(body["data"]["vendor_name"], "Ven Dor acme");
    assert_eq!(body["data"]["rfp_name"], "Bulk laptops");
}

#[tokio::test]
async fn test_second_quote_for_same_rfp_conflicts() {
    let ctx = setup_test_server().await;
    let (_admin, _category, _vendor, rfp_id) = setup_rfp(&ctx).await;
    let token = login(&ctx, "vendor_acme", VENDOR_PASSWORD).await;

    let payload = json!({
        "rfp_id": rfp_id,
        "price": 650.0,
        "quantity": 200,
        "total_cost": 130000.0,
    });

    let response = post_json(&ctx.base_url, "/quotes", &payload, Some(&token)).await;
    assert_eq!(response.status(), 201);

    let response = post_json(&ctx.base_url, "/quotes", &payload, Some(&token)).await;
    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(
        body["error"]["fields"]["rfp_id"],
        "A quote for this RFP already exists for this vendor"
    );

    assert_eq!(common::count_rows(&ctx, "quotes", None).await, 1);
}

#[tokio::test]
async fn test_quote_creation_is_vendor_only() {
    let ctx = setup_test_server().await;
    let (admin_token, _category, _vendor, rfp_id) = setup_rfp(&ctx).await;

    let payload = json!({
        "rfp_id": rfp_id,
        "price": 650.0,
        "quantity": 200,
        "total_cost": 130000.0,
    });

    // admins list quotes but cannot submit them
    let response = post_json(&ctx.base_url, "/quotes", &payload, Some(&admin_token)).await;
    assert_eq!(response.status(), 403);

    let response = post_json(&ctx.base_url, "/quotes", &payload, None).await;
    assert_eq!(response.status(), 401);
}

#[tokio::test]
async fn test_quote_for_missing_rfp_is_field_error() {
    let ctx = setup_test_server().await;
    let (_admin, _category, _vendor, _rfp) = setup_rfp(&ctx).await;
    let token = login(&ctx, "vendor_acme", VENDOR_PASSWORD).await;

    let response = post_json(
        &ctx.base_url,
        "/quotes",
        &json!({
            "rfp_id": "rfp-does-not-exist",
            "price": 650.0,
            "quantity": 200,
            "total_cost": 130000.0,
        }),
        Some(&token),
    )
    .await;

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"]["fields"]["rfp_id"], "RFP does not exist");
}

#[tokio::test]
async fn test_list_visibility_admin_all_vendor_own() {
    let ctx = setup_test_server().await;
    let (admin_token, category_id, _vendor, rfp_id) = setup_rfp(&ctx).await;
    register_vendor(&ctx, "other", Some(&category_id)).await;

    let acme_token = login(&ctx, "vendor_acme", VENDOR_PASSWORD).await;
    let other_token = login(&ctx, "vendor_other", VENDOR_PASSWORD).await;

    for (token, price) in [(&acme_token, 650.0), (&other_token, 700.0)] {
        let response = post_json(
            &ctx.base_url,
            "/quotes",
            &json!({
                "rfp_id": rfp_id,
                "price": price,
                "quantity": 200,
                "total_cost": price * 200.0,
            }),
            Some(token),
        )
        .await;
        assert_eq!(response.status(), 201);
    }

    // admin sees both
    let response = get(&ctx.base_url, "/quotes", Some(&admin_token)).await;
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    // each vendor sees only its own
    let response = get(&ctx.base_url, "/quotes", Some(&acme_token)).await;
    let body: Value = response.json().await.unwrap();
    let quotes = body["data"].as_array().unwrap();
    assert_eq!(quotes.len(), 1);
    assert_eq!(quotes[0]["vendor_name"], "Ven Dor acme");
}

#[tokio::test]
async fn test_detail_visibility_hides_other_vendors_quotes() {
    let ctx = setup_test_server().await;
    let (admin_token, category_id, _vendor, rfp_id) = setup_rfp(&ctx).await;
    register_vendor(&ctx, "other", Some(&category_id)).await;

    let acme_token = login(&ctx, "vendor_acme", VENDOR_PASSWORD).await;
    let other_token = login(&ctx, "vendor_other", VENDOR_PASSWORD).await;

    let response = post_json(
        &ctx.base_url,
        "/quotes",
        &json!({
            "rfp_id": rfp_id,
            "price": 650.0,
            "quantity": 200,
            "total_cost": 130000.0,
        }),
        Some(&acme_token),
    )
    .await;
    let body: Value = response.json().await.unwrap();
    let quote_id = body["data"]["id"].as_str().unwrap().to_string();

    // owner and admin can read it
    let response = get(&ctx.base_url, &format!("/quotes/{}", quote_id), Some(&acme_token)).await;
    assert_eq!(response.status(), 200);
    let response = get(&ctx.base_url, &format!("/quotes/{}", quote_id), Some(&admin_token)).await;
    assert_eq!(response.status(), 200);

    // another vendor cannot even see that it exists
    let response = get(&ctx.base_url, &format!("/quotes/{}", quote_id), Some(&other_token)).await;
    assert_eq!(response.status(), 404);

    // nor update or delete it
    let response = put_json(
        &ctx.base_url,
        &format!("/quotes/{}", quote_id),
        &json!({ "price": 1.0 }),
        Some(&other_token),
    )
    .await;
    assert_eq!(response.status(), 404);
    let response = delete(&ctx.base_url, &format!("/quotes/{}", quote_id), Some(&other_token)).await;
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_owner_updates_and_deletes_quote() {
    let ctx = setup_test_server().await;
    let (_admin, _category, _vendor, rfp_id) = setup_rfp(&ctx).await;
    let token = login(&ctx, "vendor_acme", VENDOR_PASSWORD).await;

    let response = post_json(
        &ctx.base_url,
        "/quotes",
        &json!({
            "rfp_id": rfp_id,
            "price": 650.0,
            "quantity": 200,
            "total_cost": 130000.0,
        }),
        Some(&token),
    )
    .await;
    let body: Value = response.json().await.unwrap();
    let quote_id = body["data"]["id"].as_str().unwrap().to_string();

    let response = put_json(
        &ctx.base_url,
        &format!("/quotes/{}", quote_id),
        &json!({ "price": 625.0, "total_cost": 125000.0 }),
        Some(&token),
    )
    .await;
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["data"]["price"], 625.0);
    assert_eq!(body["data"]["quantity"], 200);

    let response = delete(&ctx.base_url, &format!("/quotes/{}", quote_id), Some(&token)).await;
    assert_eq!(response.status(), 200);
    assert_eq!(common::count_rows(&ctx, "quotes", None).await, 0);
}

#[tokio::test]
async fn test_full_quote_flow_end_to_end() {
    let ctx = setup_test_server().await;

    // admin sets up a category and an RFP assigned to an approved vendor
    let (admin_token, _category, vendor_id, rfp_id) = setup_rfp(&ctx).await;

    // the vendor submits exactly one quote
    let token = login(&ctx, "vendor_acme", VENDOR_PASSWORD).await;
    let response = post_json(
        &ctx.base_url,
        "/quotes",
        &json!({
            "rfp_id": rfp_id,
            "price": 650.0,
            "quantity": 200,
            "total_cost": 130000.0,
        }),
        Some(&token),
    )
    .await;
    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["data"]["vendor_id"], vendor_id);

    // a second attempt for the same RFP conflicts
    let response = post_json(
        &ctx.base_url,
        "/quotes",
        &json!({
            "rfp_id": rfp_id,
            "price": 640.0,
            "quantity": 200,
            "total_cost": 128000.0,
        }),
        Some(&token),
    )
    .await;
    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"]["fields"]["rfp_id"]
        .as_str()
        .unwrap()
        .contains("already exists"));

    // the admin sees the single stored quote
    let response = get(&ctx.base_url, "/quotes", Some(&admin_token)).await;
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}
