use std::net::SocketAddr;

use reqwest::Client;
use sea_orm::DatabaseConnection;
use serde_json::{Value, json};
use tempfile::TempDir;

use training_server::config::{AppConfig, CorsConfig, DatabaseConfig, ServerConfig};
use training_server::state::AppState;

pub mod routes {
    pub const PARTICIPANTS: &str = "/participants";
    pub const CLASSES: &str = "/classes";
    pub const ENROLLMENTS: &str = "/enrollments";

    pub fn participant(id: i32) -> String {
        format!("/participants/{id}")
    }

    pub fn class(id: i32) -> String {
        format!("/classes/{id}")
    }

    pub fn enrollment(id: i32) -> String {
        format!("/enrollments/{id}")
    }

    pub fn participant_enrollments(participant_id: i32) -> String {
        format!("/enrollments/participant/{participant_id}")
    }

    pub fn class_enrollments(class_id: i32) -> String {
        format!("/enrollments/class/{class_id}")
    }
}

/// A running test server backed by its own SQLite database file.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub db: DatabaseConnection,
    // Keeps the database file alive for the lifetime of the test.
    _dir: TempDir,
}

/// Parsed HTTP response for test assertions.
pub struct TestResponse {
    pub status: u16,
    /// Raw response body as text.
    pub text: String,
    /// Parsed JSON body, or `Null` if the response is not valid JSON.
    pub body: Value,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let db_url = format!(
            "sqlite://{}?mode=rwc",
            dir.path().join("training.db").display()
        );

        let app_config = AppConfig {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                cors: CorsConfig {
                    allow_origins: vec![],
                    max_age: 3600,
                },
            },
            database: DatabaseConfig {
                url: db_url,
                max_connections: 5,
                min_connections: 1,
                connect_timeout_secs: 8,
                sqlx_logging: false,
            },
        };

        let db = training_server::database::init_db(&app_config.database)
            .await
            .expect("Failed to initialize test database");

        let state = AppState {
            db: db.clone(),
            config: app_config,
        };
        let app = training_server::build_router(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr,
            client: Client::new(),
            db,
            _dir: dir,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn post(&self, path: &str, body: &Value) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Failed to send POST request");

        TestResponse::from_response(res).await
    }

    pub async fn get(&self, path: &str) -> TestResponse {
        let res = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to send GET request");

        TestResponse::from_response(res).await
    }

    pub async fn patch(&self, path: &str, body: &Value) -> TestResponse {
        let res = self
            .client
            .patch(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Failed to send PATCH request");

        TestResponse::from_response(res).await
    }

    pub async fn delete(&self, path: &str) -> TestResponse {
        let res = self
            .client
            .delete(self.url(path))
            .send()
            .await
            .expect("Failed to send DELETE request");

        TestResponse::from_response(res).await
    }

    /// Create a participant via the API and return its `id`.
    pub async fn create_participant(&self, nim: &str, email: &str) -> i32 {
        let res = self
            .post(
                routes::PARTICIPANTS,
                &json!({
                    "nim": nim,
                    "full_name": "Budi Santoso",
                    "email": email,
                    "phone": "+6281234567",
                }),
            )
            .await;
        assert_eq!(res.status, 201, "create_participant failed: {}", res.text);
        res.id()
    }

    /// Create a class via the API and return its `id`.
    pub async fn create_class(&self, name: &str) -> i32 {
        let res = self
            .post(
                routes::CLASSES,
                &json!({
                    "name": name,
                    "instructor": "Pak Joko",
                }),
            )
            .await;
        assert_eq!(res.status, 201, "create_class failed: {}", res.text);
        res.id()
    }

    /// Enroll a participant in a class via the API and return the enrollment `id`.
    pub async fn enroll(&self, participant_id: i32, class_id: i32) -> i32 {
        let res = self
            .post(
                routes::ENROLLMENTS,
                &json!({
                    "participant_id": participant_id,
                    "class_id": class_id,
                }),
            )
            .await;
        assert_eq!(res.status, 201, "enroll failed: {}", res.text);
        res.id()
    }
}

impl TestResponse {
    pub async fn from_response(res: reqwest::Response) -> Self {
        let status = res.status().as_u16();
        let text = res.text().await.unwrap_or_default();
        let body = serde_json::from_str(&text).unwrap_or(Value::Null);
        Self { status, text, body }
    }

    pub fn id(&self) -> i32 {
        self.body["id"]
            .as_i64()
            .expect("response body should contain 'id'") as i32
    }

    pub fn ids(&self) -> Vec<i64> {
        self.body
            .as_array()
            .expect("response body should be an array")
            .iter()
            .map(|item| item["id"].as_i64().expect("item should contain 'id'"))
            .collect()
    }
}
