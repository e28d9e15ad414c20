//! Tests of the HTTP client against a mocked backend

use chrono::NaiveDate;
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use fridge_door::error::{user_message, ApiError, GENERIC_ERROR_MESSAGE};
use fridge_door::traits::TodoSource;
use fridge_door::{Client, NewTask, TaskId, TaskUpdate};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn buy_milk(completed: bool) -> serde_json::Value {
    json!({
        "id": 1,
        "title": "Buy milk",
        "description": "",
        "completed": completed,
        "created_at": "2024-03-01 09:30:00",
        "due_date": "2024-03-15"
    })
}

async fn client_for(server: &MockServer) -> Client {
    let _ = env_logger::builder().is_test(true).try_init();
    Client::new(server.uri()).unwrap()
}


#[tokio::test]
async fn fetching_tasks() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/todos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            buy_milk(false),
            {
                "id": 2,
                "title": "Pay rent",
                "description": null,
                "completed": true,
                "created_at": "2024-03-02T18:00:00.123456",
                "due_date": null
            }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let tasks = client.get_todos().await.unwrap();
    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[0].title(), "Buy milk");
    assert_eq!(tasks[0].due_date(), Some(date(2024, 3, 15)));
    assert_eq!(tasks[1].description(), "");
    assert_eq!(tasks[1].due_date(), None);
    assert!(tasks[1].completed());
}

#[tokio::test]
async fn creating_a_task() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/todos"))
        .and(body_json(json!({"title": "Buy milk", "description": "", "due_date": "2024-03-15"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(buy_milk(false)))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let task = client.create_todo(&NewTask::new("Buy milk").due_on(date(2024, 3, 15))).await.unwrap();
    assert_eq!(task.id(), TaskId::from(1));
    assert_eq!(task.completed(), false);
}

#[tokio::test]
async fn month_and_day_queries() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/calendar/2024/3"))
        .and(query_param("show_completed", "false"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "2024-03-15": [buy_milk(false)]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/todos"))
        .and(query_param("date", "2024-03-15"))
        .and(query_param("show_completed", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([buy_milk(true)])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let month = client.get_month(2024, 3, false).await.unwrap();
    assert_eq!(month.keys().collect::<Vec<_>>(), vec![&date(2024, 3, 15)]);
    assert_eq!(month[&date(2024, 3, 15)][0].title(), "Buy milk");

    let day = client.get_todos_by_date(date(2024, 3, 15), true).await.unwrap();
    assert_eq!(day.len(), 1);
    assert!(day[0].completed());
}

#[tokio::test]
async fn updates_only_send_what_changes() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/todos/1"))
        .and(body_json(json!({"completed": true})))
        .respond_with(ResponseTemplate::new(200).set_body_json(buy_milk(true)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/todos/1"))
        .and(body_json(json!({"title": "Buy milk", "due_date": null})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 1, "title": "Buy milk", "completed": false, "created_at": "2024-03-01 09:30:00"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let task = client.update_todo(TaskId::from(1), &TaskUpdate::completion(true)).await.unwrap();
    assert!(task.completed());

    let update = TaskUpdate {
        title: Some("Buy milk".to_string()),
        due_date: Some(None),
        ..TaskUpdate::default()
    };
    let task = client.update_todo(TaskId::from(1), &update).await.unwrap();
    assert_eq!(task.due_date(), None);
}

#[tokio::test]
async fn deletions_and_stats() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/todos/clear-completed"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Deleted 2 completed tasks", "count": 2
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/todos/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "Todo deleted successfully"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/stats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"total": 5, "completed": 2, "pending": 3})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let (count, message) = client.clear_completed().await.unwrap();
    assert_eq!(count, 2);
    assert_eq!(message, "Deleted 2 completed tasks");

    client.delete_todo(TaskId::from(7)).await.unwrap();

    let stats = client.get_stats().await.unwrap();
    assert_eq!((stats.total, stats.completed, stats.pending), (5, 2, 3));
}

#[tokio::test]
async fn error_envelopes() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/todos/42"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": "Todo not found"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/todos"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/stats"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let client = client_for(&server).await;

    let err = client.update_todo(TaskId::from(42), &TaskUpdate::completion(true)).await.unwrap_err();
    assert_eq!(err.downcast_ref::<ApiError>(), Some(&ApiError::not_found("Todo not found")));
    assert_eq!(user_message(err.as_ref()), "Todo not found");

    let err = client.get_todos().await.unwrap_err();
    assert_eq!(err.downcast_ref::<ApiError>(), Some(&ApiError::Status { status: 500, message: None }));
    assert_eq!(user_message(err.as_ref()), GENERIC_ERROR_MESSAGE);

    let err = client.get_stats().await.unwrap_err();
    assert!(matches!(err.downcast_ref::<ApiError>(), Some(ApiError::InvalidPayload(_))));
}

#[tokio::test]
async fn unreachable_servers() {
    let _ = env_logger::builder().is_test(true).try_init();
    // Nothing listens on port 9 (discard) on test machines
    let client = Client::new("http://127.0.0.1:9/").unwrap();
    let err = client.get_todos().await.unwrap_err();
    assert_eq!(user_message(err.as_ref()), GENERIC_ERROR_MESSAGE);
}
