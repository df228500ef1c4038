//! GitHub forge client tests against a local mock server.

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

use forgeform::forge::github::GitHubForge;
use forgeform::forge::{
    ApplyProtectionRequest, CreateLabelRequest, CreateRepositoryRequest, Forge, ForgeError,
};

fn forge_for(server: &MockServer) -> GitHubForge {
    GitHubForge::with_api_base("test-token", "someorg", "example", server.uri())
}

fn repo_body() -> serde_json::Value {
    json!({
        "name": "example",
        "description": "demo",
        "visibility": "public",
        "default_branch": "main",
        "allow_auto_merge": false,
        "allow_squash_merge": true,
        "allow_rebase_merge": false,
        "delete_branch_on_merge": true,
        "has_downloads": true,
        "has_issues": true,
        "has_projects": true
    })
}

fn create_repository_request() -> CreateRepositoryRequest {
    CreateRepositoryRequest {
        name: "example".to_string(),
        description: None,
        visibility: "public".to_string(),
        auto_init: true,
        allow_auto_merge: false,
        allow_squash_merge: true,
        allow_rebase_merge: false,
        delete_branch_on_merge: true,
        has_downloads: true,
        has_issues: true,
        has_projects: true,
    }
}

#[tokio::test]
async fn get_repository_maps_fields() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/someorg/example"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(repo_body()))
        .mount(&server)
        .await;

    let repo = forge_for(&server).get_repository().await.unwrap().unwrap();
    assert_eq!(repo.name, "example");
    assert_eq!(repo.description.as_deref(), Some("demo"));
    assert_eq!(repo.default_branch, "main");
    assert!(repo.allow_squash_merge);
    assert!(!repo.allow_rebase_merge);
}

#[tokio::test]
async fn absent_repository_is_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/someorg/example"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "Not Found"})))
        .mount(&server)
        .await;

    assert!(forge_for(&server).get_repository().await.unwrap().is_none());
}

#[tokio::test]
async fn unauthorized_is_auth_failed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/someorg/example"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"message": "Bad credentials"})),
        )
        .mount(&server)
        .await;

    let err = forge_for(&server).get_repository().await.unwrap_err();
    match err {
        ForgeError::AuthFailed(message) => assert_eq!(message, "Bad credentials"),
        other => panic!("expected auth failure, got {:?}", other),
    }
}

#[tokio::test]
async fn rate_limit_is_reported_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/someorg/example"))
        .respond_with(ResponseTemplate::new(403).set_body_json(
            json!({"message": "API rate limit exceeded for installation"}),
        ))
        .expect(1)
        .mount(&server)
        .await;

    let err = forge_for(&server).get_repository().await.unwrap_err();
    assert!(matches!(err, ForgeError::RateLimited));
}

#[tokio::test]
async fn create_repository_uses_org_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/orgs/someorg/repos"))
        .respond_with(ResponseTemplate::new(201).set_body_json(repo_body()))
        .expect(1)
        .mount(&server)
        .await;

    let repo = forge_for(&server)
        .create_repository(create_repository_request())
        .await
        .unwrap();
    assert_eq!(repo.name, "example");
}

#[tokio::test]
async fn create_repository_falls_back_to_user_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/orgs/someorg/repos"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "Not Found"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/user/repos"))
        .respond_with(ResponseTemplate::new(201).set_body_json(repo_body()))
        .expect(1)
        .mount(&server)
        .await;

    let repo = forge_for(&server)
        .create_repository(create_repository_request())
        .await
        .unwrap();
    assert_eq!(repo.name, "example");
}

#[tokio::test]
async fn set_default_branch_patches_repository() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/repos/someorg/example"))
        .and(body_json(json!({"default_branch": "main"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(repo_body()))
        .expect(1)
        .mount(&server)
        .await;

    forge_for(&server).set_default_branch("main").await.unwrap();
}

#[tokio::test]
async fn apply_branch_protection_puts_full_rule() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/repos/someorg/example/branches/main/protection"))
        .and(body_json(json!({
            "required_status_checks": {
                "strict": false,
                "contexts": ["Compile and test"]
            },
            "enforce_admins": false,
            "required_pull_request_reviews": {
                "required_approving_review_count": 1
            },
            "restrictions": null,
            "required_conversation_resolution": true
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    forge_for(&server)
        .apply_branch_protection(ApplyProtectionRequest {
            pattern: "main".to_string(),
            require_conversation_resolution: true,
            required_approving_review_count: 1,
            required_status_checks: vec!["Compile and test".to_string()],
            strict_status_checks: false,
            enforce_admins: false,
        })
        .await
        .unwrap();
}

#[tokio::test]
async fn unprotected_branch_is_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/someorg/example/branches/main/protection"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"message": "Branch not protected"})),
        )
        .mount(&server)
        .await;

    let protection = forge_for(&server)
        .get_branch_protection("main")
        .await
        .unwrap();
    assert!(protection.is_none());
}

#[tokio::test]
async fn get_branch_protection_maps_rule() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/someorg/example/branches/main/protection"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "required_status_checks": {
                "strict": false,
                "contexts": ["Compile and test"]
            },
            "required_pull_request_reviews": {
                "required_approving_review_count": 1
            },
            "required_conversation_resolution": { "enabled": true },
            "enforce_admins": { "enabled": false }
        })))
        .mount(&server)
        .await;

    let protection = forge_for(&server)
        .get_branch_protection("main")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(protection.required_approving_review_count, 1);
    assert_eq!(
        protection.required_status_checks,
        vec!["Compile and test".to_string()]
    );
    assert!(protection.require_conversation_resolution);
    assert!(!protection.enforce_admins);
}

#[tokio::test]
async fn create_label_posts_name_and_color() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/repos/someorg/example/labels"))
        .and(body_json(json!({"name": "Critical", "color": "ff0000"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "name": "Critical",
            "color": "FF0000"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let label = forge_for(&server)
        .create_label(CreateLabelRequest {
            name: "Critical".to_string(),
            color: "ff0000".to_string(),
            description: None,
        })
        .await
        .unwrap();
    // color normalizes to lowercase regardless of what the API echoes
    assert_eq!(label.color, "ff0000");
}

#[tokio::test]
async fn label_lookup_encodes_spaces() {
    let server = MockServer::start().await;
    // the space may arrive percent-encoded depending on the client
    Mock::given(method("GET"))
        .and(path_regex(r"^/repos/someorg/example/labels/needs(%20| )triage$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "needs triage",
            "color": "cccccc"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let label = forge_for(&server)
        .get_label("needs triage")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(label.name, "needs triage");
}
