// Integration tests for the diff preview pipeline

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{bearer_for, setup_repo, write};
use serde_json::json;
use shopgrade_core::{AuthRejection, ShopId};
use shopgrade_core_types::Sensitive;
use shopgrade_engine::commands::preview::{
    gather_changes, DiffPreviewHandler, PreviewOutcome, PreviewRequest,
};
use shopgrade_engine::EngineConfig;

fn handler(config: &EngineConfig) -> DiffPreviewHandler {
    DiffPreviewHandler::new(config.layout(), config.guard())
}

fn request(shop: &str, authorization: Option<String>, diff: bool) -> PreviewRequest {
    PreviewRequest {
        shop_id: Some(shop.to_string()),
        authorization: authorization.map(Sensitive::new),
        diff,
    }
}

fn seed_button_upgrade(root: &std::path::Path, shop: &str) {
    write(
        root,
        &format!("data/shops/{shop}/shop.json"),
        r#"{"componentVersions": {"@acme/button": "1.0.0"}}"#,
    );
    write(
        root,
        "packages/button/package.json",
        r#"{"name": "@acme/button", "version": "1.1.0"}"#,
    );
    write(root, "packages/button/CHANGELOG.md", "# Changelog\n\nFixed bug\n");
}

#[test]
fn test_valid_token_returns_changes() {
    // Given: a shop with one pending upgrade and a valid token
    let (dir, config) = setup_repo();
    seed_button_upgrade(dir.path(), "demo");

    // When
    let outcome = handler(&config)
        .handle(&request("demo", Some(bearer_for("demo")), false))
        .unwrap();

    // Then
    assert_eq!(outcome.status(), 200);
    assert_eq!(
        outcome.body(),
        json!({
            "components": [{
                "name": "@acme/button",
                "from": "1.0.0",
                "to": "1.1.0",
                "summary": "Fixed bug",
                "changelog": "packages/button/CHANGELOG.md"
            }]
        })
    );
}

#[test]
fn test_wrong_audience_is_forbidden() {
    let (dir, config) = setup_repo();
    seed_button_upgrade(dir.path(), "demo");
    let claims = json!({
        "aud": "wrong",
        "iss": "acme",
        "sub": "shop:demo:upgrade-preview",
        "exp": chrono::Utc::now().timestamp() + 600,
    });
    let token = jsonwebtoken::encode(
        &jsonwebtoken::Header::default(),
        &claims,
        &jsonwebtoken::EncodingKey::from_secret(common::SECRET.as_bytes()),
    )
    .unwrap();

    let outcome = handler(&config)
        .handle(&request("demo", Some(format!("Bearer {token}")), false))
        .unwrap();

    assert_eq!(outcome.status(), 403);
    assert_eq!(outcome.body(), json!({ "error": "Forbidden" }));
}

#[test]
fn test_missing_header_is_forbidden() {
    let (_dir, config) = setup_repo();
    let outcome = handler(&config).handle(&request("demo", None, false)).unwrap();
    assert_eq!(outcome, PreviewOutcome::Forbidden(AuthRejection::MissingBearer));
}

#[test]
fn test_unconfigured_secret_fails_closed() {
    // Given: a deployment with no secret, and a token signed with some secret
    let (_dir, mut config) = setup_repo();
    config.preview_secret = None;

    // When
    let outcome = handler(&config)
        .handle(&request("demo", Some(bearer_for("demo")), false))
        .unwrap();

    // Then
    assert_eq!(outcome.status(), 403);
}

#[test]
fn test_invalid_or_absent_shop_id() {
    let (_dir, config) = setup_repo();
    let handler = handler(&config);

    let absent = PreviewRequest::default();
    assert_eq!(handler.handle(&absent).unwrap().status(), 400);

    let outcome = handler
        .handle(&request("../demo", Some(bearer_for("../demo")), false))
        .unwrap();
    assert_eq!(outcome.body(), json!({ "error": "Invalid shop id" }));
}

#[test]
fn test_config_diff_only_when_requested() {
    // Given: a shop app overriding one template against the canonical app
    let (dir, config) = setup_repo();
    write(dir.path(), "packages/template-app/src/templates/home.html", "<h1/>");
    write(dir.path(), "apps/shop-demo/src/templates/home.html", "<h2/>");
    write(dir.path(), "apps/shop-demo/src/translations/en.json", "{}");

    // When: no diff flag
    let plain = handler(&config)
        .handle(&request("demo", Some(bearer_for("demo")), false))
        .unwrap();

    // Then: the key is absent entirely
    assert_eq!(plain.body(), json!({ "components": [] }));

    // When: diff flag set
    let with_diff = handler(&config)
        .handle(&request("demo", Some(bearer_for("demo")), true))
        .unwrap();

    // Then
    assert_eq!(
        with_diff.body(),
        json!({
            "components": [],
            "configDiff": { "templates": ["home.html"], "translations": ["en.json"] }
        })
    );
}

#[test]
fn test_broken_package_manifest_is_a_hard_failure() {
    // Given: a locked package whose manifest is corrupt
    let (dir, config) = setup_repo();
    write(
        dir.path(),
        "data/shops/demo/shop.json",
        r#"{"componentVersions": {"@acme/card": "1.0.0"}}"#,
    );
    write(dir.path(), "packages/card/package.json", "{ nope");

    // When
    let result = handler(&config).handle(&request("demo", Some(bearer_for("demo")), false));

    // Then: not an outcome, an error
    let err = result.unwrap_err();
    assert_eq!(err.code(), "ERR_INVALID_MANIFEST");
    assert_eq!(err.shop_id(), Some("demo"));
}

#[test]
fn test_gather_changes_is_lenient_about_the_shop_record() {
    let (dir, config) = setup_repo();
    let shop = ShopId::parse("demo").unwrap();
    assert!(gather_changes(&config.layout(), &shop).unwrap().is_empty());

    write(dir.path(), "data/shops/demo/shop.json", "garbage");
    assert!(gather_changes(&config.layout(), &shop).unwrap().is_empty());

    write(dir.path(), "data/shops/demo/shop.json", r#"{"componentVersions": null}"#);
    assert!(gather_changes(&config.layout(), &shop).unwrap().is_empty());
}

#[test]
fn test_current_and_removed_packages_are_not_changes() {
    let (dir, config) = setup_repo();
    write(
        dir.path(),
        "data/shops/demo/shop.json",
        r#"{"componentVersions": {"@acme/button": "1.1.0", "@acme/gone": "0.1.0", "@acme/new": null}}"#,
    );
    write(dir.path(), "packages/button/package.json", r#"{"name": "@acme/button", "version": "1.1.0"}"#);
    write(dir.path(), "packages/new/package.json", r#"{"name": "@acme/new", "version": "0.2.0"}"#);

    let changes = gather_changes(&config.layout(), &ShopId::parse("demo").unwrap()).unwrap();

    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0].name, "@acme/new");
    assert_eq!(changes[0].from, None);
    assert_eq!(changes[0].summary, "");
    assert_eq!(changes[0].changelog, "");
}
