use assert_matches::assert_matches;
use serde_json::json;
use wiremock::{MockServer, Mock, ResponseTemplate};
use wiremock::matchers::{method, path, body_json};

use auth_cell::{AuthError, SignInService};
use shared_models::AppError;
use shared_utils::test_utils::{TestConfig, TestUser, JwtTestUtils, MockBackendResponses};

fn service_for(server: &MockServer) -> SignInService {
    SignInService::new(&TestConfig::with_base_url(server.uri()).to_app_config())
}

#[tokio::test]
async fn test_sign_in_success_decodes_identity() {
    let mock_server = MockServer::start().await;
    let user = TestUser::admin("admin01");
    let token = JwtTestUtils::create_test_token(&user, "backend-secret", Some(6));

    Mock::given(method("POST"))
        .and(path("/auth/signin"))
        .and(body_json(json!({"userName": "admin01", "password": "secret123"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockBackendResponses::envelope(json!(token))))
        .expect(1)
        .mount(&mock_server)
        .await;

    let session = service_for(&mock_server)
        .sign_in("admin01", "secret123")
        .await
        .unwrap();

    assert_eq!(session.bearer(), token);
    assert_eq!(session.user.full_name, user.full_name);
    assert_eq!(session.user.email, user.email);
    assert!(session.is_admin());
}

#[tokio::test]
async fn test_sign_in_rejected_credentials() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/signin"))
        .respond_with(ResponseTemplate::new(401).set_body_json(MockBackendResponses::error_response("bad credentials")))
        .mount(&mock_server)
        .await;

    let result = service_for(&mock_server).sign_in("patient", "wrong-pass").await;
    assert_matches!(result, Err(AuthError::InvalidCredentials));
}

#[tokio::test]
async fn test_short_credentials_never_reach_backend() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/signin"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let service = service_for(&mock_server);
    assert_matches!(service.sign_in("ab", "secret123").await, Err(AuthError::InvalidUsername));
    assert_matches!(service.sign_in("abc", "123").await, Err(AuthError::InvalidPassword));
}

#[tokio::test]
async fn test_garbage_token_is_rejected() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/signin"))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockBackendResponses::envelope(json!("not-a-jwt"))))
        .mount(&mock_server)
        .await;

    let result = service_for(&mock_server).sign_in("patient", "secret123").await;
    assert_matches!(result, Err(AuthError::InvalidToken(_)));
}

#[tokio::test]
async fn test_backend_outage_is_surfaced() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/signin"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&mock_server)
        .await;

    let result = service_for(&mock_server).sign_in("patient", "secret123").await;
    assert_matches!(result, Err(AuthError::Api(AppError::ExternalService(_))));
}
