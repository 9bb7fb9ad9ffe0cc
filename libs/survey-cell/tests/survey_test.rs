use assert_matches::assert_matches;
use chrono::Utc;
use serde_json::json;
use wiremock::{MockServer, Mock, ResponseTemplate};
use wiremock::matchers::{body_json, body_string_contains, header, method, path};

use auth_cell::Session;
use shared_models::NoticeLevel;
use shared_utils::test_utils::{JwtTestUtils, MockBackendResponses, TestConfig, TestUser};
use survey_cell::{
    submission_notice, DepressionLevel, Submitter, SurveyEngine, SurveyError, SurveyPhase,
    SurveyService,
};

fn service_for(server: &MockServer) -> SurveyService {
    SurveyService::new(&TestConfig::with_base_url(server.uri()).to_app_config())
}

async fn mount_questions(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/questions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockBackendResponses::question(1, "Buon ba", &[0, 1, 2, 3]),
            MockBackendResponses::question(2, "Bi quan", &[0, 1, 2, 3]),
        ])))
        .mount(server)
        .await;
}

fn submitter() -> Submitter {
    Submitter {
        full_name: "Le Thi Lan".to_string(),
        email: "lan@example.com".to_string(),
    }
}

#[tokio::test]
async fn test_start_fetches_questions() {
    let mock_server = MockServer::start().await;
    mount_questions(&mock_server).await;

    let mut engine = SurveyEngine::new();
    service_for(&mock_server).start(&mut engine).await.unwrap();

    assert_eq!(engine.phase(), SurveyPhase::InProgress);
    assert_eq!(engine.question_count(), 2);
    assert_eq!(engine.current_question().unwrap().question_title, "Buon ba");
}

#[tokio::test]
async fn test_failed_fetch_stays_on_intro() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/questions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&mock_server)
        .await;

    let mut engine = SurveyEngine::new();
    let result = service_for(&mock_server).start(&mut engine).await;

    assert_matches!(result, Err(SurveyError::Api(_)));
    assert_eq!(engine.phase(), SurveyPhase::Intro);
}

#[tokio::test]
async fn test_full_run_submits_responses() {
    let mock_server = MockServer::start().await;
    mount_questions(&mock_server).await;

    Mock::given(method("POST"))
        .and(path("/questions/submit"))
        .and(body_json(json!({
            "email": "lan@example.com",
            "fullName": "Le Thi Lan",
            "content": [
                { "questionId": 1, "index": 3, "answerId": 12 },
                { "questionId": 2, "index": 4, "answerId": 23 }
            ]
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let service = service_for(&mock_server);
    let mut engine = SurveyEngine::new();
    service.start(&mut engine).await.unwrap();

    engine.select_answer(2).unwrap();
    engine.next().unwrap();
    engine.select_answer(3).unwrap();
    engine.next().unwrap();

    assert_eq!(engine.total_points(), 5);
    assert_eq!(engine.level(), Some(DepressionLevel::None));

    let result = service.submit(&engine, &submitter()).await;
    assert!(result.is_ok());
    assert_eq!(submission_notice(&result).level, NoticeLevel::Success);
}

#[tokio::test]
async fn test_unfinished_survey_is_not_submitted() {
    let mock_server = MockServer::start().await;
    mount_questions(&mock_server).await;

    Mock::given(method("POST"))
        .and(path("/questions/submit"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let service = service_for(&mock_server);
    let mut engine = SurveyEngine::new();
    service.start(&mut engine).await.unwrap();

    assert_matches!(service.submit(&engine, &submitter()).await, Err(SurveyError::NotFinished));
}

#[tokio::test]
async fn test_submitter_is_required() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/questions/submit"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let mut engine = SurveyEngine::new();
    engine.start(Vec::new());

    let anonymous = Submitter::from_session(None);
    let result = service_for(&mock_server).submit(&engine, &anonymous).await;
    assert_matches!(result, Err(SurveyError::MissingSubmitter("full name")));
    assert!(submission_notice(&result).is_error());
}

#[tokio::test]
async fn test_backend_failure_is_reported() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/questions/submit"))
        .respond_with(ResponseTemplate::new(400).set_body_json(MockBackendResponses::error_response("bad content")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut engine = SurveyEngine::new();
    engine.start(Vec::new());

    let result = service_for(&mock_server).submit(&engine, &submitter()).await;
    assert_matches!(result, Err(SurveyError::Api(_)));

    let notice = submission_notice(&result);
    assert!(notice.is_error());
    assert_eq!(notice.message, "Đã có lỗi xảy ra khi lưu kết quả!");
}

#[tokio::test]
async fn test_unreachable_backend_is_reported() {
    let mut engine = SurveyEngine::new();
    engine.start(Vec::new());

    let result = SurveyService::new(&TestConfig::with_base_url("http://127.0.0.1:1").to_app_config())
        .submit(&engine, &submitter())
        .await;

    assert_eq!(submission_notice(&result).message, "Không thể kết nối đến máy chủ!");
}

#[test]
fn test_submitter_defaults_from_session() {
    let token = JwtTestUtils::create_test_token(&TestUser::patient("lan"), "test-secret", Some(1));
    let session = Session::from_token(&token, 12, Utc::now()).unwrap();

    let submitter = Submitter::from_session(Some(&session));
    assert_eq!(submitter.full_name, "Nguyen Van lan");
    assert_eq!(submitter.email, "lan@example.com");
}

#[tokio::test]
async fn test_import_uploads_question_file() {
    let mock_server = MockServer::start().await;
    let file = serde_json::to_vec(&json!([
        MockBackendResponses::question(1, "Buon ba", &[0, 1, 2, 3])
    ]))
    .unwrap();

    Mock::given(method("POST"))
        .and(path("/questions/import"))
        .and(header("Authorization", "Bearer admin-token"))
        .and(body_string_contains("name=\"file\"; filename=\"beck.json\""))
        .and(body_string_contains("Buon ba"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    service_for(&mock_server)
        .import_questions("beck.json", file, "admin-token")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_invalid_import_file_is_never_uploaded() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/questions/import"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let result = service_for(&mock_server)
        .import_questions("beck.csv", b"Buon ba;0;1;2;3".to_vec(), "admin-token")
        .await;

    assert_matches!(result, Err(SurveyError::InvalidImport(_)));
}
