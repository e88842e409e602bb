use house_keeper_auth::{Session, SessionStore};
use house_keeper_reminders::{
    NewReminder, ReminderQuery, ReminderUpdate, RemindersClient, RemindersError, RepeatType,
};
use chrono::{TimeZone, Utc};
use serde_json::json;
use wiremock::matchers::{body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn signed_in_store() -> SessionStore {
    let store = SessionStore::new();
    store.set(Session::from_access_token("test-token", "bearer"));
    store
}

fn client_for(server: &MockServer) -> RemindersClient {
    RemindersClient::new(&server.uri(), reqwest::Client::new(), signed_in_store())
}

fn reminder_body(id: i64, title: &str, is_completed: bool) -> serde_json::Value {
    json!({
        "id": id,
        "title": title,
        "description": null,
        "due_date": "2024-06-01T09:00:00Z",
        "repeat_type": "none",
        "is_completed": is_completed,
        "item_id": null,
        "owner_id": 1,
        "created_at": "2024-01-01T00:00:00Z",
        "updated_at": "2024-01-01T00:00:00Z"
    })
}

#[tokio::test]
async fn list_fetches_reminders_with_the_bearer_token() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reminders"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            reminder_body(1, "Replace water filter", false),
        ])))
        .mount(&server)
        .await;

    let reminders = client_for(&server)
        .list(&ReminderQuery::new())
        .await
        .unwrap();

    assert_eq!(reminders.len(), 1);
    assert_eq!(reminders[0].repeat_type, RepeatType::None);
    assert!(!reminders[0].is_completed);
}

#[tokio::test]
async fn due_sends_the_due_flag() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reminders"))
        .and(query_param("due", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            reminder_body(1, "Replace water filter", false),
        ])))
        .mount(&server)
        .await;

    let due = client_for(&server).due().await.unwrap();

    assert_eq!(due.len(), 1);
}

#[tokio::test]
async fn upcoming_sends_the_flag_and_the_window() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reminders"))
        .and(query_param("upcoming", "true"))
        .and(query_param("days", "14"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let upcoming = client_for(&server).upcoming(14).await.unwrap();

    assert!(upcoming.is_empty());
}

#[tokio::test]
async fn by_item_filters_on_item_id() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reminders"))
        .and(query_param("item_id", "42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            reminder_body(3, "Descale the kettle", false),
        ])))
        .mount(&server)
        .await;

    let reminders = client_for(&server).by_item(42).await.unwrap();

    assert_eq!(reminders.len(), 1);
}

#[tokio::test]
async fn create_posts_title_due_date_and_repeat() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/reminders"))
        .and(body_string_contains("Replace water filter"))
        .and(body_string_contains("\"repeat_type\":\"monthly\""))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(reminder_body(1, "Replace water filter", false)),
        )
        .mount(&server)
        .await;

    let due_date = Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap();
    let created = client_for(&server)
        .create(&NewReminder::new("Replace water filter", due_date).with_repeat(RepeatType::Monthly))
        .await
        .unwrap();

    assert_eq!(created.id, 1);
}

#[tokio::test]
async fn complete_posts_to_the_complete_endpoint() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/reminders/1/complete"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(reminder_body(1, "Replace water filter", true)),
        )
        .mount(&server)
        .await;

    let completed = client_for(&server).complete(1).await.unwrap();

    assert!(completed.is_completed);
}

#[tokio::test]
async fn update_can_push_back_the_due_date() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/reminders/1"))
        .and(body_string_contains("due_date"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(reminder_body(1, "Replace water filter", false)),
        )
        .mount(&server)
        .await;

    let due_date = Utc.with_ymd_and_hms(2024, 7, 1, 9, 0, 0).unwrap();
    let updated = client_for(&server)
        .update(1, &ReminderUpdate::new().with_due_date(due_date))
        .await
        .unwrap();

    assert_eq!(updated.id, 1);
}

#[tokio::test]
async fn a_missing_reminder_maps_to_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/reminders/99"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"detail": "Reminder not found"})),
        )
        .mount(&server)
        .await;

    let result = client_for(&server).delete(99).await;

    assert!(matches!(result, Err(RemindersError::NotFound(_))));
}
