use std::time::Duration;

use assert_matches::assert_matches;
use chrono::NaiveDate;
use serde_json::json;
use wiremock::{MockServer, Mock, ResponseTemplate};
use wiremock::matchers::{method, path, header, query_param};

use doctor_cell::{AvailabilityService, AvailabilityView, DoctorService, SlotBoard};
use shared_models::AppError;
use shared_utils::test_utils::{TestConfig, MockBackendResponses};

const DOCTOR_ID: i64 = 12;

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
}

fn availability_for(server: &MockServer) -> AvailabilityService {
    AvailabilityService::new(&TestConfig::with_base_url(server.uri()).to_app_config())
}

async fn mount_schedule(server: &MockServer, date: NaiveDate, slots: Vec<serde_json::Value>) {
    Mock::given(method("GET"))
        .and(path("/api/bookings/doctor"))
        .and(query_param("doctorId", DOCTOR_ID.to_string()))
        .and(query_param("bookingDate", format!("{}T00:00:00.000Z", date.format("%Y-%m-%d"))))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            MockBackendResponses::doctor_schedule(DOCTOR_ID, date, slots),
        ))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_patient_view_only_shows_openings() {
    let mock_server = MockServer::start().await;
    mount_schedule(&mock_server, day(19), MockBackendResponses::default_slots()).await;

    let load = availability_for(&mock_server)
        .fetch_availability(DOCTOR_ID, day(19), AvailabilityView::Open, None)
        .await;

    assert!(load.error.is_none());
    assert_eq!(load.slots.iter().map(|s| s.id).collect::<Vec<_>>(), vec![1, 3]);
}

#[tokio::test]
async fn test_admin_view_only_shows_appointments() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/bookings/doctor"))
        .and(header("Authorization", "Bearer admin-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            MockBackendResponses::doctor_schedule(DOCTOR_ID, day(20), MockBackendResponses::default_slots()),
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    let load = availability_for(&mock_server)
        .fetch_availability(DOCTOR_ID, day(20), AvailabilityView::Booked, Some("admin-token"))
        .await;

    assert_eq!(load.slots.len(), 1);
    assert!(load.slots[0].booked);
}

#[tokio::test]
async fn test_views_cover_the_unfiltered_day() {
    let mock_server = MockServer::start().await;
    mount_schedule(&mock_server, day(21), MockBackendResponses::default_slots()).await;

    let service = availability_for(&mock_server);
    let all = service.fetch_availability(DOCTOR_ID, day(21), AvailabilityView::All, None).await;
    let open = service.fetch_availability(DOCTOR_ID, day(21), AvailabilityView::Open, None).await;
    let booked = service.fetch_availability(DOCTOR_ID, day(21), AvailabilityView::Booked, None).await;

    let mut union: Vec<i64> = open.slots.iter().chain(booked.slots.iter()).map(|s| s.id).collect();
    union.sort();
    let mut expected: Vec<i64> = all.slots.iter().map(|s| s.id).collect();
    expected.sort();

    assert_eq!(expected.len(), 3);
    assert_eq!(union, expected);
}

#[tokio::test]
async fn test_server_error_yields_empty_list() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/bookings/doctor"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&mock_server)
        .await;

    let load = availability_for(&mock_server)
        .fetch_availability(DOCTOR_ID, day(19), AvailabilityView::Open, None)
        .await;

    assert!(load.slots.is_empty());
    assert!(load.is_failed());
}

#[tokio::test]
async fn test_schema_mismatch_fails_closed() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/bookings/doctor"))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockBackendResponses::envelope(json!({
            "doctorId": DOCTOR_ID,
            "slots": []
        }))))
        .mount(&mock_server)
        .await;

    let service = availability_for(&mock_server);
    let load = service.fetch_availability(DOCTOR_ID, day(19), AvailabilityView::Open, None).await;
    assert!(load.slots.is_empty());
    assert!(load.is_failed());

    let raw = service.get_doctor_schedule(DOCTOR_ID, day(19), None).await;
    assert_matches!(raw, Err(AppError::Decode(_)));
}

#[tokio::test]
async fn test_non_ok_envelope_fails_closed() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/bookings/doctor"))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockBackendResponses::failed_envelope("no schedule")))
        .mount(&mock_server)
        .await;

    let load = availability_for(&mock_server)
        .fetch_availability(DOCTOR_ID, day(19), AvailabilityView::All, None)
        .await;

    assert!(load.slots.is_empty());
    assert_eq!(load.error.as_deref(), Some("External service error: no schedule"));
}

#[tokio::test]
async fn test_slow_stale_response_does_not_overwrite_newer_date() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/bookings/doctor"))
        .and(query_param("bookingDate", "2026-10-19T00:00:00.000Z"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(MockBackendResponses::doctor_schedule(
                    DOCTOR_ID,
                    day(19),
                    vec![MockBackendResponses::time_slot(1, "08:00", "09:00", false)],
                ))
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&mock_server)
        .await;

    mount_schedule(
        &mock_server,
        day(20),
        vec![MockBackendResponses::time_slot(7, "14:00", "15:00", false)],
    )
    .await;

    let service = availability_for(&mock_server);
    let mut board = SlotBoard::new(DOCTOR_ID, AvailabilityView::Open);

    let slow = board.select_date(day(19));
    let fast = board.select_date(day(20));

    let (slow_load, fast_load) = tokio::join!(
        service.load(&slow, AvailabilityView::Open, None),
        service.load(&fast, AvailabilityView::Open, None),
    );

    assert!(board.apply(&fast, fast_load));
    assert!(!board.apply(&slow, slow_load));

    assert_eq!(board.date(), Some(day(20)));
    assert_eq!(board.slots()[0].id, 7);
}

#[tokio::test]
async fn test_show_date_fetches_and_applies() {
    let mock_server = MockServer::start().await;
    mount_schedule(&mock_server, day(23), MockBackendResponses::default_slots()).await;

    let service = availability_for(&mock_server);
    let mut board = SlotBoard::new(DOCTOR_ID, AvailabilityView::Booked);

    assert!(board.show_date(day(23), &service, Some("admin-token")).await);
    assert!(!board.is_loading());
    assert_eq!(board.slots().iter().map(|s| s.id).collect::<Vec<_>>(), vec![2]);
}

#[tokio::test]
async fn test_get_doctor_unwraps_envelope() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/api/doctors/{}", DOCTOR_ID)))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            MockBackendResponses::envelope(MockBackendResponses::doctor(DOCTOR_ID)),
        ))
        .mount(&mock_server)
        .await;

    let doctor = DoctorService::new(&TestConfig::with_base_url(mock_server.uri()).to_app_config())
        .get_doctor(DOCTOR_ID, None)
        .await
        .unwrap();

    assert_eq!(doctor.full_name, "Tran Thi B");
    assert_eq!(doctor.display_name(), "ThS. BS Tran Thi B");
}

#[tokio::test]
async fn test_get_doctor_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/doctors/99"))
        .respond_with(ResponseTemplate::new(404).set_body_json(MockBackendResponses::error_response("missing")))
        .mount(&mock_server)
        .await;

    let result = DoctorService::new(&TestConfig::with_base_url(mock_server.uri()).to_app_config())
        .get_doctor(99, None)
        .await;

    assert_matches!(result, Err(AppError::NotFound(_)));
}
