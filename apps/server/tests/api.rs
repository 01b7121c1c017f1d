use autoani::domain::config::ApiConfig;
use autoani_server::Server;
use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

const TOKEN: &str = "let-me-in";
const BOUNDARY: &str = "autoani-boundary";

struct TestApp {
    _uploads: TempDir,
    router: Router,
}

impl TestApp {
    async fn start(name: &str) -> Self {
        Self::start_with(name, |_| {}).await
    }

    async fn start_with(name: &str, tweak: impl FnOnce(&mut ApiConfig)) -> Self {
        let uploads = tempfile::tempdir().unwrap();
        let mut cfg = ApiConfig::default();
        cfg.database.database = name.to_owned();
        cfg.storage.uploads_dir = uploads.path().to_path_buf();
        cfg.security.admin_token = Some(TOKEN.to_owned());
        cfg.site.happy_customers = 1200;
        tweak(&mut cfg);

        let router = Server::builder().config(cfg).build().await.unwrap().into_router();
        Self { _uploads: uploads, router }
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Vec<u8>, Option<String>) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let bytes = response.into_body().collect().await.unwrap().to_bytes().to_vec();
        (status, bytes, content_type)
    }

    async fn json(&self, request: Request<Body>) -> (StatusCode, Value) {
        let (status, bytes, _) = self.send(request).await;
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.json(Request::get(uri).body(Body::empty()).unwrap()).await
    }

    async fn call(&self, method: Method, uri: &str, body: &Value, admin: bool) -> (StatusCode, Value) {
        let mut request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if admin {
            request = request.header(header::AUTHORIZATION, format!("Bearer {TOKEN}"));
        }
        self.json(request.body(Body::from(body.to_string())).unwrap()).await
    }
}

fn vehicle(title: &str, brand: &str) -> Value {
    json!({
        "title": title,
        "brand": brand,
        "model": "X5",
        "year": 2022,
        "price": 78500,
        "mileage": 12000,
        "transmission": "Automatic",
        "fuelType": "Petrol",
        "bodyType": "SUV",
        "color": "Black",
        "engineSize": 4.4,
        "horsepower": 523,
        "description": "Well maintained, one owner.",
        "featured": true
    })
}

fn multipart(folder: &str, filename: &str, mimetype: &str, bytes: &[u8]) -> Vec<u8> {
    let mut body = format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"folder\"\r\n\r\n{folder}\r\n\
         --{BOUNDARY}\r\nContent-Disposition: form-data; name=\"tags\"\r\n\r\nfront, exterior\r\n\
         --{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\n\
         Content-Type: {mimetype}\r\n\r\n"
    )
    .into_bytes();
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

#[tokio::test]
async fn health_and_docs_are_public() {
    let app = TestApp::start("health").await;

    let (status, body) = app.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "up");

    let (status, _, content_type) = app.send(Request::get("/api-docs").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    assert!(content_type.unwrap_or_default().starts_with("text/html"));
}

#[tokio::test]
async fn api_requests_are_rate_limited() {
    let app = TestApp::start_with("throttle", |cfg| {
        cfg.rate_limit.max_requests = 2;
        cfg.rate_limit.trust_forwarded_for = true;
    })
    .await;
    let from = |ip: &str| Request::get("/api/vehicles").header("x-forwarded-for", ip).body(Body::empty()).unwrap();

    assert_eq!(app.json(from("203.0.113.7")).await.0, StatusCode::OK);
    assert_eq!(app.json(from("203.0.113.7")).await.0, StatusCode::OK);

    let response = app.router.clone().oneshot(from("203.0.113.7")).await.unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(response.headers().contains_key(header::RETRY_AFTER));
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body, json!({"success": false, "error": "Too many requests from this IP, please try again later."}));

    assert_eq!(app.json(from("198.51.100.4")).await.0, StatusCode::OK);
    assert_eq!(app.get("/health").await.0, StatusCode::OK);
}

#[tokio::test]
async fn vehicle_lifecycle() {
    let app = TestApp::start("vehicles").await;

    let (status, body) = app.call(Method::POST, "/api/vehicles", &vehicle("BMW X5 M50i", "BMW"), false).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({"success": false, "error": "Admin access required"}));

    let (status, body) = app.call(Method::POST, "/api/vehicles", &vehicle("BMW X5 M50i", "BMW"), true).await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["data"]["id"].as_str().unwrap().to_owned();
    assert_eq!(body["data"]["slug"], "bmw-x5-m50i");
    assert_eq!(body["data"]["condition"], "Used");

    app.call(Method::POST, "/api/vehicles", &vehicle("Audi Q7", "Audi"), true).await;

    let (status, body) = app.get("/api/vehicles?brand=bmw").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["pagination"]["total"], 1);
    assert_eq!(body["data"]["data"][0]["id"], id.as_str());

    let (status, body) = app.get("/api/vehicles/slug/bmw-x5-m50i").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["title"], "BMW X5 M50i");
    assert_eq!(body["data"]["views"], 1);

    let uri = format!("/api/vehicles/{id}");
    let (_, body) = app.get(&uri).await;
    assert_eq!((body["data"]["views"].as_i64(), body["data"]["favorites"].as_i64()), (Some(2), Some(0)));

    let favorite = format!("{uri}/favorite");
    let (status, body) = app.call(Method::POST, &favorite, &Value::Null, false).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!({"views": 2, "favorites": 1}));

    let (_, body) = app.get("/api/vehicles?sort=most-viewed").await;
    assert_eq!(body["data"]["data"][0]["id"], id.as_str());

    let (_, body) = app.call(Method::GET, "/api/stats/dashboard", &Value::Null, true).await;
    assert_eq!(body["data"]["totals"]["views"], 2);
    assert_eq!(body["data"]["popularVehicles"][0]["id"], id.as_str());
    assert_eq!(body["data"]["popularVehicles"][0]["favorites"], 1);

    let (status, body) = app.get("/api/vehicles?page=0").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    let (status, body) = app.get("/api/stats/homepage").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["data"],
        json!({"totalVehicles": 2, "featuredVehicles": 2, "brandsCount": 0, "happyCustomers": 1200})
    );

    let (status, body) = app.call(Method::DELETE, &uri, &Value::Null, true).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Vehicle deleted successfully");

    let (status, body) = app.get(&uri).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Vehicle not found");

    let (status, _) = app.get("/api/vehicles/brand:abc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn invalid_payloads_list_field_errors() {
    let app = TestApp::start("invalid").await;

    let (status, body) = app.call(Method::POST, "/api/contact", &json!({"name": "", "email": "nope"}), false).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let fields: Vec<&str> = body["errors"].as_array().unwrap().iter().filter_map(|e| e["field"].as_str()).collect();
    assert_eq!(fields, ["name", "email", "subject", "message"]);

    let (status, body) = app.call(Method::POST, "/api/brands", &json!({"name": "BMW", "colour": "blue"}), true).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn contact_and_newsletter() {
    let app = TestApp::start("contact").await;

    let inquiry = json!({
        "name": "Besa Gashi",
        "email": "besa@example.com",
        "subject": "Financing",
        "message": "What are the terms for the Audi A8?",
        "inquiryType": "financing"
    });
    let (status, body) = app.call(Method::POST, "/api/contact", &inquiry, false).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true, "message": "Contact form submitted successfully"}));

    let (status, body) = app.call(Method::GET, "/api/contact", &Value::Null, true).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["data"][0]["inquiryType"], "financing");

    for _ in 0..2 {
        let (status, body) =
            app.call(Method::POST, "/api/contact/newsletter", &json!({"email": "besa@example.com", "language": "sq"}), false).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Subscribed successfully!");
    }
}

#[tokio::test]
async fn content_endpoints() {
    let app = TestApp::start("content").await;

    let (_, body) = app.get("/api/seo/unknown-page").await;
    assert_eq!(body["data"]["title"], "AutoAni - Premium Automotive Dealership");

    let (status, body) = app.get("/api/i18n/sq").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["nav"]["vehicles"], "Veturat");

    let (status, body) = app.get("/api/i18n/de").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);

    let (status, body) = app.call(Method::POST, "/api/auth/login", &json!({}), false).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Login endpoint");
}

#[tokio::test]
async fn uploads_are_stored_and_served() {
    let app = TestApp::start("uploads").await;

    let request = Request::post("/api/media")
        .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={BOUNDARY}"))
        .header(header::AUTHORIZATION, format!("Bearer {TOKEN}"))
        .body(Body::from(multipart("vehicles", "front.png", "image/png", b"\x89PNG-data")))
        .unwrap();
    let (status, body) = app.json(request).await;
    assert_eq!(status, StatusCode::CREATED);

    let file = &body["data"][0];
    assert_eq!(file["type"], "image");
    assert_eq!(file["folder"], "vehicles");
    assert_eq!(file["tags"], json!(["front", "exterior"]));
    let url = file["url"].as_str().unwrap().to_owned();

    let (status, bytes, content_type) = app.send(Request::get(url.as_str()).body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(bytes, b"\x89PNG-data");
    assert_eq!(content_type.as_deref(), Some("image/png"));

    let request = Request::post("/api/media")
        .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={BOUNDARY}"))
        .header(header::AUTHORIZATION, format!("Bearer {TOKEN}"))
        .body(Body::from(multipart("vehicles", "tool.exe", "application/x-msdownload", b"MZ")))
        .unwrap();
    let (status, body) = app.json(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    let (_, body) = app.get("/api/media/folders").await;
    let vehicles = body["data"].as_array().unwrap().iter().find(|f| f["name"] == "vehicles").unwrap();
    assert_eq!(vehicles["count"], 1);

    let (status, _) = app.get("/uploads/vehicles/missing.png").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
