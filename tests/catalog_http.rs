use std::sync::{Arc, Mutex};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use foodwagen::{
    api::{HttpMealApi, MealApi},
    app::build_app,
    config::AppConfig,
    state::AppState,
};
use reqwest::Client;
use serde_json::{json, Value};

/// Stand-in for the remote `/Food` service.
#[derive(Clone, Default)]
struct FoodService {
    records: Arc<Mutex<Vec<Value>>>,
    writes: Arc<Mutex<usize>>,
}

async fn list(State(s): State<FoodService>) -> Json<Value> {
    Json(json!({ "data": s.records.lock().unwrap().clone() }))
}

async fn create(State(s): State<FoodService>, Json(mut body): Json<Value>) -> impl IntoResponse {
    *s.writes.lock().unwrap() += 1;
    body["id"] = json!(uuid::Uuid::new_v4().to_string());
    body["createdAt"] = json!("2024-05-01T12:00:00Z");
    s.records.lock().unwrap().push(body.clone());
    (StatusCode::CREATED, Json(body))
}

async fn show(State(s): State<FoodService>, Path(id): Path<String>) -> impl IntoResponse {
    let records = s.records.lock().unwrap();
    match records.iter().find(|r| r["id"] == json!(id)) {
        Some(r) => Json(r.clone()).into_response(),
        None => (StatusCode::NOT_FOUND, Json(json!({ "message": "Food not found" }))).into_response(),
    }
}

async fn update(
    State(s): State<FoodService>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    *s.writes.lock().unwrap() += 1;
    let mut records = s.records.lock().unwrap();
    let Some(record) = records.iter_mut().find(|r| r["id"] == json!(id)) else {
        return (StatusCode::NOT_FOUND, Json(json!({ "message": "Food not found" }))).into_response();
    };
    if let (Some(target), Some(changes)) = (record.as_object_mut(), body.as_object()) {
        for (k, v) in changes {
            target.insert(k.clone(), v.clone());
        }
    }
    Json(record.clone()).into_response()
}

async fn remove(State(s): State<FoodService>, Path(id): Path<String>) -> StatusCode {
    *s.writes.lock().unwrap() += 1;
    s.records.lock().unwrap().retain(|r| r["id"] != json!(id));
    StatusCode::OK
}

fn record(id: &str, name: &str, rating: f64, restaurant: &str, status: &str) -> Value {
    json!({
        "id": id,
        "food_name": name,
        "food_rating": rating,
        "food_image": format!("https://cdn.example.com/{id}.jpg"),
        "restaurant_name": restaurant,
        "restaurant_logo": format!("https://cdn.example.com/{id}-logo.png"),
        "restaurant_status": status,
    })
}

async fn bind(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

struct Harness {
    base: String,
    service: FoodService,
    http: Client,
}

impl Harness {
    async fn start() -> Self {
        let service = FoodService::default();
        service.records.lock().unwrap().extend([
            record("1", "Bow Lasagna", 4.6, "Subway", "Open Now"),
            record("2", "Avocado Smoothie", 4.2, "Juice Bar", "Closed"),
            record("3", "Pancake Stack", 4.9, "Breakfast Cafe", "Open Now"),
        ]);
        let backend = bind(
            Router::new()
                .route("/api/Food", get(list).post(create))
                .route("/api/Food/:id", get(show).put(update).delete(remove))
                .with_state(service.clone()),
        )
        .await;

        let config = AppConfig {
            api_url: format!("{backend}/api"),
            page_size: 2,
            ..AppConfig::default()
        };
        let api = HttpMealApi::with_client(Client::new(), &config.api_url, &config.resource).unwrap();
        let state = AppState::with_api(config, Arc::new(api) as Arc<dyn MealApi>);
        let base = bind(build_app(state)).await;

        Self {
            base: format!("{base}/api/v1"),
            service,
            http: Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    async fn get(&self, path: &str) -> (StatusCode, Value) {
        let resp = self.http.get(self.url(path)).send().await.unwrap();
        read(resp).await
    }

    async fn post(&self, path: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut req = self.http.post(self.url(path));
        if let Some(body) = body {
            req = req.json(&body);
        }
        read(req.send().await.unwrap()).await
    }

    fn writes(&self) -> usize {
        *self.service.writes.lock().unwrap()
    }
}

async fn read(resp: reqwest::Response) -> (StatusCode, Value) {
    let status = StatusCode::from_u16(resp.status().as_u16()).unwrap();
    let text = resp.text().await.unwrap();
    let body = serde_json::from_str(&text).unwrap_or(Value::Null);
    (status, body)
}

fn ids(page: &Value) -> Vec<String> {
    page["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["id"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn health_is_ok() {
    let h = Harness::start().await;
    let resp = h.http.get(h.url("/health")).send().await.unwrap();
    assert!(resp.status().is_success());
    assert_eq!(resp.text().await.unwrap(), "ok");
}

#[tokio::test]
async fn list_is_paged_and_formatted() {
    let h = Harness::start().await;

    let (status, page) = h.get("/meals").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["total"], 3);
    assert_eq!(page["has_more"], true);
    assert_eq!(ids(&page), vec!["1", "2"]);

    let first = &page["items"][0];
    assert_eq!(first["rating_display"], "4.6");
    assert_eq!(first["status_badge_class"], "food-badge--open");
    assert_eq!(first["food_image_src"], "https://cdn.example.com/1.jpg");

    let (_, page) = h.post("/ui/load-more", None).await;
    assert_eq!(ids(&page), vec!["1", "2", "3"]);
    assert_eq!(page["has_more"], false);
}

#[tokio::test]
async fn filters_narrow_the_list_and_reset() {
    let h = Harness::start().await;

    let resp = h
        .http
        .patch(h.url("/ui/filters"))
        .json(&json!({ "selected_status": "Open Now", "min_rating": 4.7 }))
        .send()
        .await
        .unwrap();
    let (status, ui) = read(resp).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ui["filters"]["selected_status"], "Open Now");

    let (_, page) = h.get("/meals").await;
    assert_eq!(ids(&page), vec!["3"]);

    let resp = h.http.delete(h.url("/ui/filters")).send().await.unwrap();
    let (_, ui) = read(resp).await;
    assert_eq!(ui["filters"]["selected_status"], "all");
    assert_eq!(h.get("/meals").await.1["total"], 3);
}

#[tokio::test]
async fn invalid_create_is_rejected_without_calling_backend() {
    let h = Harness::start().await;
    h.post("/ui/modal/add", None).await;

    let (status, body) = h
        .post("/meals", Some(json!({ "food_rating": "abc", "restaurant_status": "Maybe" })))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let fields: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert!(fields.contains(&"food_name"));
    assert!(fields.contains(&"food_rating"));
    assert!(fields.contains(&"restaurant_status"));
    assert_eq!(h.writes(), 0);

    let (_, ui) = h.get("/ui").await;
    assert_eq!(ui["modal"], "add");
}

#[tokio::test]
async fn wrongly_typed_fields_get_field_errors() {
    let h = Harness::start().await;

    let (status, body) = h
        .post(
            "/meals",
            Some(json!({
                "food_name": "Soup",
                "food_rating": true,
                "food_image": { "url": "https://cdn.example.com/soup.jpg" },
                "restaurant_name": "Bowl",
                "restaurant_logo": "https://cdn.example.com/bowl.png",
                "restaurant_status": "Open Now",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body["errors"],
        json!([
            { "field": "food_rating", "message": "Food rating must be a number" },
            { "field": "food_image", "message": "Food image URL is required" },
        ])
    );
    assert_eq!(h.writes(), 0);
}

#[tokio::test]
async fn create_shows_up_in_next_list() {
    let h = Harness::start().await;
    assert_eq!(h.get("/meals").await.1["total"], 3);
    h.post("/ui/modal/add", None).await;

    let (status, created) = h
        .post(
            "/meals",
            Some(json!({
                "food_name": "  Ramen  ",
                "food_rating": "4.4",
                "food_image": "https://cdn.example.com/ramen.jpg",
                "restaurant_name": "Noodle Bar",
                "restaurant_logo": "https://cdn.example.com/noodle.png",
                "restaurant_status": "Closed",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["food_name"], "Ramen");
    assert_eq!(created["status_text"], "Closed");
    assert_eq!(created["created_at"], "2024-05-01T12:00:00Z");

    assert_eq!(h.get("/meals").await.1["total"], 4);

    let (_, ui) = h.get("/ui").await;
    assert_eq!(ui["modal"], "none");
    assert_eq!(ui["mutations"]["create"]["state"], "success");
}

#[tokio::test]
async fn edit_submits_changes_and_refreshes() {
    let h = Harness::start().await;

    let (_, ui) = h.post("/ui/modal/edit/2", None).await;
    assert_eq!(ui["modal"], "edit");
    assert_eq!(ui["selected_meal"]["food_name"], "Avocado Smoothie");

    let resp = h
        .http
        .put(h.url("/meals/2"))
        .json(&json!({
            "food_name": "Avocado Smoothie",
            "food_rating": 3.1,
            "food_image": "https://cdn.example.com/2.jpg",
            "restaurant_name": "Juice Bar",
            "restaurant_logo": "https://cdn.example.com/2-logo.png",
            "restaurant_status": "Open Now",
        }))
        .send()
        .await
        .unwrap();
    let (status, updated) = read(resp).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["food_rating"], 3.1);
    assert_eq!(updated["restaurant_status"], "Open Now");

    let (_, meal) = h.get("/meals/2").await;
    assert_eq!(meal["rating_display"], "3.1");
}

#[tokio::test]
async fn delete_after_edit_targets_second_meal() {
    let h = Harness::start().await;

    h.post("/ui/modal/edit/1", None).await;
    let (_, ui) = h.post("/ui/modal/delete/3", None).await;
    assert_eq!(ui["modal"], "delete");
    assert_eq!(ui["is_edit_modal_open"], false);
    assert_eq!(ui["selected_meal"]["id"], "3");

    let resp = h.http.delete(h.url("/meals/3")).send().await.unwrap();
    assert_eq!(resp.status().as_u16(), 204);

    let (_, ui) = h.get("/ui").await;
    assert_eq!(ui["modal"], "none");
    assert_eq!(ui["selected_meal"], Value::Null);

    h.post("/ui/load-more", None).await;
    let (_, page) = h.get("/meals").await;
    assert_eq!(ids(&page), vec!["1", "2"]);
}

#[tokio::test]
async fn unknown_meal_is_not_found() {
    let h = Harness::start().await;

    let (status, body) = h.get("/meals/missing").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Food not found");

    let (status, _) = h.post("/ui/modal/edit/missing", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(h.get("/ui").await.1["modal"], "none");
}
