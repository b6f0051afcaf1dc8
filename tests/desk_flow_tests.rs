use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use deskboard::config::Config;
use http_body_util::BodyExt;
use tower::ServiceExt;

const ADMIN_PASSWORD: &str = "ucd2025";

async fn spawn_app() -> Router {
    let mut config = Config::default();
    config.general.database_path = "sqlite::memory:".to_string();
    config.general.max_db_connections = 1;
    config.general.min_db_connections = 1;

    let state = deskboard::api::create_app_state(&config)
        .await
        .expect("Failed to create app state");
    deskboard::api::router(state, &config)
}

async fn login(app: &Router) -> String {
    let response = app
        .clone()
        .oneshot(form_request(
            None,
            "/login",
            &format!("username=admin&password={ADMIN_PASSWORD}"),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let cookie = response
        .headers()
        .get("set-cookie")
        .expect("login should set a session cookie")
        .to_str()
        .unwrap();
    cookie.split(';').next().unwrap().to_string()
}

fn form_request(cookie: Option<&str>, uri: &str, body: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("Content-Type", "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header("Cookie", cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

async fn get_json(app: &Router, uri: &str) -> serde_json::Value {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK, "{uri}");
    json_body(response).await
}

fn desk(desks: &serde_json::Value, desk_id: i64) -> serde_json::Value {
    desks
        .as_array()
        .expect("desk list should be an array")
        .iter()
        .find(|d| d["desk_id"] == desk_id)
        .unwrap_or_else(|| panic!("desk {desk_id} missing from listing"))
        .clone()
}

#[tokio::test]
async fn seeded_desks_start_vacant() {
    let app = spawn_app().await;

    let desks = get_json(&app, "/list_desks").await;
    assert_eq!(desks.as_array().unwrap().len(), 40);

    let first = desk(&desks, 1);
    assert_eq!(first["occupant"], "Vacant");
    assert_eq!(first["arrival"], "-");
    assert_eq!(first["leaving"], "-");
    assert_eq!(first["location"], "Unassigned");
    assert_eq!(first["supervisor"], "-");
    assert_eq!(first["desk_status"], "Vacant");

    let vacant = get_json(&app, "/find_vacant_desks").await;
    assert_eq!(vacant["vacant"].as_array().unwrap().len(), 40);
}

#[tokio::test]
async fn add_occupant_reports_the_assignment() {
    let app = spawn_app().await;
    let cookie = login(&app).await;

    let response = app
        .clone()
        .oneshot(form_request(
            Some(&cookie),
            "/add_occupant",
            "desk_id=5&name=Alice&arrival=2025-01-01&leaving=2025-01-10",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(
        body["message"],
        "Added Alice to desk 5 from 2025-01-01 to 2025-01-10, \
         Location: Unassigned, Supervisor: None, Status: None."
    );

    let desks = get_json(&app, "/list_desks").await;
    let assigned = desk(&desks, 5);
    assert_eq!(assigned["occupant"], "Alice");
    assert_eq!(assigned["arrival"], "2025-01-01");
    assert_eq!(assigned["leaving"], "2025-01-10");
}

#[tokio::test]
async fn occupied_desk_is_marked_occupied_until_leaving() {
    let app = spawn_app().await;
    let cookie = login(&app).await;

    let response = app
        .clone()
        .oneshot(form_request(
            Some(&cookie),
            "/add_occupant",
            "desk_id=2&name=Bob&arrival=2024-01-01&leaving=2999-01-01&supervisor=Carol&status=Visiting",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let desks = get_json(&app, "/list_desks").await;
    let occupied = desk(&desks, 2);
    assert_eq!(occupied["desk_status"], "Occupied");
    assert_eq!(occupied["supervisor"], "Carol");
    assert_eq!(occupied["status"], "Visiting");

    // Occupied desks with a future leaving date are not offered as vacant
    let vacant = get_json(&app, "/find_vacant_desks").await;
    assert!(
        !vacant["vacant"]
            .as_array()
            .unwrap()
            .iter()
            .any(|d| d["desk_id"] == 2)
    );
}

#[tokio::test]
async fn desk_past_its_leaving_date_is_overdue_and_offered_as_vacant() {
    let app = spawn_app().await;
    let cookie = login(&app).await;

    let response = app
        .clone()
        .oneshot(form_request(
            Some(&cookie),
            "/add_occupant",
            "desk_id=7&name=Dana&arrival=2020-01-01&leaving=2020-02-01",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let desks = get_json(&app, "/list_desks").await;
    assert_eq!(desk(&desks, 7)["desk_status"], "Overdue");

    let vacant = get_json(&app, "/find_vacant_desks").await;
    assert!(
        vacant["vacant"]
            .as_array()
            .unwrap()
            .iter()
            .any(|d| d["desk_id"] == 7)
    );
}

#[tokio::test]
async fn assignment_ending_today_is_overdue_and_offered_as_vacant() {
    let app = spawn_app().await;
    let cookie = login(&app).await;

    let today = chrono::Local::now()
        .date_naive()
        .format("%Y-%m-%d")
        .to_string();

    // Equal arrival and leaving dates are a valid one-day booking
    let response = app
        .clone()
        .oneshot(form_request(
            Some(&cookie),
            "/add_occupant",
            &format!("desk_id=6&name=Hana&arrival={today}&leaving={today}"),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Overdue from the leaving date on, not the day after
    let desks = get_json(&app, "/list_desks").await;
    assert_eq!(desk(&desks, 6)["desk_status"], "Overdue");

    // and leaving <= today already satisfies the vacancy predicate
    let vacant = get_json(&app, "/find_vacant_desks").await;
    assert!(
        vacant["vacant"]
            .as_array()
            .unwrap()
            .iter()
            .any(|d| d["desk_id"] == 6)
    );
}

#[tokio::test]
async fn add_occupant_validation_errors() {
    let app = spawn_app().await;
    let cookie = login(&app).await;

    let cases = [
        (
            "desk_id=abc&name=Alice&arrival=2025-01-01&leaving=2025-01-10",
            "Invalid Desk ID. Enter a valid number.",
        ),
        (
            "desk_id=5&name=&arrival=2025-01-01&leaving=2025-01-10",
            "Occupant Name, Arrival, and Leaving dates are required.",
        ),
        (
            "desk_id=999&name=Alice&arrival=2025-01-01&leaving=2025-01-10",
            "Desk 999 does not exist.",
        ),
        (
            "desk_id=5&name=Alice&arrival=2025-02-30&leaving=2025-03-10",
            "Invalid date format. Use YYYY-MM-DD (e.g., 2025-09-10).",
        ),
        (
            "desk_id=5&name=Alice&arrival=2025-01-10&leaving=2025-01-01",
            "Leaving date must be after Arrival date.",
        ),
    ];

    for (body, expected) in cases {
        let response = app
            .clone()
            .oneshot(form_request(Some(&cookie), "/add_occupant", body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{body}");
        let json = json_body(response).await;
        assert_eq!(json["error"], expected, "{body}");
    }
}

#[tokio::test]
async fn add_occupant_rejects_an_occupied_desk() {
    let app = spawn_app().await;
    let cookie = login(&app).await;

    let body = "desk_id=9&name=Alice&arrival=2025-01-01&leaving=2999-01-01";
    let response = app
        .clone()
        .oneshot(form_request(Some(&cookie), "/add_occupant", body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(form_request(
            Some(&cookie),
            "/add_occupant",
            "desk_id=9&name=Eve&arrival=2025-02-01&leaving=2999-01-01",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = json_body(response).await;
    assert_eq!(json["error"], "Desk 9 is already occupied by Alice.");
}

#[tokio::test]
async fn remove_occupant_round_trip() {
    let app = spawn_app().await;
    let cookie = login(&app).await;

    let response = app
        .clone()
        .oneshot(form_request(
            Some(&cookie),
            "/add_occupant",
            "desk_id=3&name=Frank&arrival=2025-01-01&leaving=2999-01-01",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(form_request(Some(&cookie), "/remove_occupant", "desk_id=3"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["message"], "Removed Frank from desk 3 (Unassigned).");

    let desks = get_json(&app, "/list_desks").await;
    let cleared = desk(&desks, 3);
    assert_eq!(cleared["occupant"], "Vacant");
    assert_eq!(cleared["desk_status"], "Vacant");

    // A second removal finds nothing to clear
    let response = app
        .clone()
        .oneshot(form_request(Some(&cookie), "/remove_occupant", "desk_id=3"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = json_body(response).await;
    assert_eq!(json["error"], "Desk 3 is already vacant.");
}

#[tokio::test]
async fn set_details_overwrites_and_echoes_the_stored_row() {
    let app = spawn_app().await;
    let cookie = login(&app).await;

    let response = app
        .clone()
        .oneshot(form_request(
            Some(&cookie),
            "/set_details",
            "desk_id=4&location=Floor3&supervisor=Grace&status=Reserved",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(
        json["message"],
        "Updated desk 4: Location: Floor3, Supervisor: Grace, Status: Reserved."
    );

    // Blank fields fall back to the defaults
    let response = app
        .clone()
        .oneshot(form_request(
            Some(&cookie),
            "/set_details",
            "desk_id=4&location=&supervisor=&status=",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(
        json["message"],
        "Updated desk 4: Location: Unassigned, Supervisor: None, Status: None."
    );
}

#[tokio::test]
async fn set_details_rejects_missing_desk() {
    let app = spawn_app().await;
    let cookie = login(&app).await;

    let response = app
        .clone()
        .oneshot(form_request(
            Some(&cookie),
            "/set_details",
            "desk_id=500&location=Floor3",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = json_body(response).await;
    assert_eq!(json["error"], "Desk 500 does not exist.");
}

#[tokio::test]
async fn add_desk_ids_keep_increasing() {
    let app = spawn_app().await;
    let cookie = login(&app).await;

    let response = app
        .clone()
        .oneshot(form_request(Some(&cookie), "/add_desk", "location=Annex"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["message"], "Added new desk 41.");

    let response = app
        .clone()
        .oneshot(form_request(Some(&cookie), "/add_desk", ""))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["message"], "Added new desk 42.");

    let desks = get_json(&app, "/list_desks").await;
    assert_eq!(desks.as_array().unwrap().len(), 42);
    assert_eq!(desk(&desks, 41)["location"], "Annex");
    assert_eq!(desk(&desks, 42)["location"], "Unassigned");
}

#[tokio::test]
async fn listing_sorts_by_requested_column() {
    let app = spawn_app().await;
    let cookie = login(&app).await;

    let response = app
        .clone()
        .oneshot(form_request(
            Some(&cookie),
            "/add_occupant",
            "desk_id=20&name=Zoe&arrival=2025-01-01&leaving=2999-01-01",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Vacant desks sort as empty strings, so Zoe comes last ascending
    let desks = get_json(&app, "/list_desks?sort=occupant&order=asc").await;
    let last = desks.as_array().unwrap().last().unwrap().clone();
    assert_eq!(last["desk_id"], 20);

    // and first descending
    let desks = get_json(&app, "/list_desks?sort=occupant&order=desc").await;
    assert_eq!(desks.as_array().unwrap()[0]["desk_id"], 20);
}

#[tokio::test]
async fn unknown_sort_parameters_fall_back_to_desk_id() {
    let app = spawn_app().await;

    let desks = get_json(&app, "/list_desks?sort=bogus;drop&order=sideways").await;
    let ids: Vec<i64> = desks
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["desk_id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, (1..=40).collect::<Vec<i64>>());
}
