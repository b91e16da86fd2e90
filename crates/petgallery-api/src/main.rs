// Pet gallery API server
// Decision: Without DATABASE_URL the server runs on the in-memory store
// Decision: OpenAPI JSON is served directly; no bundled Swagger UI

mod actor;
mod config;
mod files;
mod pets;
mod services;

use anyhow::{Context, Result};
use axum::http::{header, HeaderValue, Method};
use axum::{extract::State, routing::get, Json, Router};
use petgallery_core::{
    AuditingPetRepository, FileStore, InMemoryPetStore, Pet, PetRepository, PetRequest,
};
use petgallery_storage::{create_db_pet_store, Database, ObjectFileStore};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;

use crate::actor::ACTOR_ID_HEADER;
use crate::config::Config;
use crate::services::{FileService, UnconfiguredFileStore};

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    store: &'static str,
}

async fn health(State(state): State<HealthState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        store: state.store,
    })
}

/// State for health endpoint
#[derive(Clone)]
struct HealthState {
    store: &'static str,
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        pets::list_pets,
        pets::get_pet,
        pets::create_pet,
        pets::update_pet,
        pets::delete_pet,
        files::upload_file,
    ),
    components(schemas(Pet, PetRequest, files::UploadForm)),
    tags(
        (name = "pets", description = "Pet gallery endpoints"),
        (name = "files", description = "Image upload endpoints")
    ),
    info(
        title = "Pet Gallery API",
        description = "API for managing gallery pets and their images"
    )
)]
struct ApiDoc;

async fn openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Collaborators the router is built from
struct AppParts {
    pets: Arc<dyn PetRepository>,
    files: Arc<dyn FileStore>,
    store: &'static str,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "petgallery_api=debug,petgallery_storage=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("petgallery-api starting...");

    let config = Config::from_env();

    let (pets, store): (Arc<dyn PetRepository>, &'static str) = match &config.database_url {
        Some(database_url) => {
            let db = Database::from_url(database_url)
                .await
                .context("Failed to connect to database")?;
            db.migrate().await.context("Failed to run migrations")?;
            tracing::info!("Connected to database");
            let repository: Arc<dyn PetRepository> =
                Arc::new(AuditingPetRepository::new(create_db_pet_store(db)));
            (repository, "postgres")
        }
        None => {
            tracing::warn!("DATABASE_URL not set, pets are kept in memory");
            let repository: Arc<dyn PetRepository> =
                Arc::new(AuditingPetRepository::new(InMemoryPetStore::new()));
            (repository, "memory")
        }
    };

    let files: Arc<dyn FileStore> = match &config.s3 {
        Some(s3) => {
            let store = ObjectFileStore::s3(s3).context("Failed to configure S3 file store")?;
            tracing::info!(bucket = %s3.bucket_name, region = %s3.region, "File uploads enabled");
            Arc::new(store)
        }
        None => {
            tracing::warn!("S3 bucket not configured, file uploads disabled");
            Arc::new(UnconfiguredFileStore)
        }
    };

    let app = build_app(&config, AppParts { pets, files, store });

    let listener = tokio::net::TcpListener::bind(&config.bind_address)
        .await
        .context("Failed to bind to address")?;
    tracing::info!("Listening on {}", config.bind_address);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

fn build_app(config: &Config, parts: AppParts) -> Router {
    let pets_state = pets::AppState::new(parts.pets, config.default_actor_id);
    let files_state = files::AppState::new(FileService::new(parts.files));
    let health_state = HealthState { store: parts.store };

    let app = Router::new()
        .route("/health", get(health).with_state(health_state))
        .route("/api-doc/openapi.json", get(openapi))
        .merge(pets::routes(pets_state))
        .merge(files::routes(files_state));

    let app = match cors_layer(&config.allowed_origins) {
        Some(cors) => app.layer(cors),
        None => app,
    };

    app.layer(TraceLayer::new_for_http())
}

/// CORS layer for the configured origins, or None when no origins are set
fn cors_layer(origins: &[String]) -> Option<CorsLayer> {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    if origins.is_empty() {
        tracing::info!("CORS not configured (same-origin requests only)");
        return None;
    }
    tracing::info!(origins = ?origins, "CORS origins configured");

    Some(
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods([Method::DELETE, Method::GET, Method::POST, Method::PUT])
            .allow_headers([
                header::CONTENT_TYPE,
                header::ACCEPT,
                header::ORIGIN,
                ACTOR_ID_HEADER,
            ]),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request};
    use http_body_util::BodyExt;
    use petgallery_core::{EntityEventKind, EntityType, InMemoryFileStore, PetStore};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn test_app(config: &Config) -> (InMemoryPetStore, Router) {
        let store = InMemoryPetStore::new();
        let parts = AppParts {
            pets: Arc::new(AuditingPetRepository::new(store.clone())),
            files: Arc::new(InMemoryFileStore::new()),
            store: "memory",
        };
        (store, build_app(config, parts))
    }

    async fn send(app: &Router, request: Request<Body>) -> (axum::http::StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    fn request(method: &str, uri: &str, body: Option<Value>) -> Request<Body> {
        let builder = Request::builder().method(method).uri(uri);
        match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_health() {
        let (_, app) = test_app(&Config::default());

        let (status, body) = send(&app, request("GET", "/health", None)).await;

        assert_eq!(status, 200);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["store"], "memory");
    }

    #[tokio::test]
    async fn test_openapi_lists_pet_routes() {
        let (_, app) = test_app(&Config::default());

        let (status, body) = send(&app, request("GET", "/api-doc/openapi.json", None)).await;

        assert_eq!(status, 200);
        assert!(body["paths"]["/api/pet"].is_object());
        assert!(body["paths"]["/api/pet/{id}"].is_object());
        assert!(body["paths"]["/api/file"].is_object());
    }

    #[tokio::test]
    async fn test_cors_preflight_allows_configured_origin() {
        let config = Config {
            allowed_origins: vec!["http://localhost:3000".to_string()],
            ..Config::default()
        };
        let (_, app) = test_app(&config);

        let response = app
            .oneshot(
                Request::builder()
                    .method("OPTIONS")
                    .uri("/api/pet")
                    .header("origin", "http://localhost:3000")
                    .header("access-control-request-method", "PUT")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            response.headers()["access-control-allow-origin"],
            "http://localhost:3000"
        );
    }

    #[tokio::test]
    async fn test_pet_lifecycle_is_audited() {
        let (store, app) = test_app(&Config::default());

        let (status, created) = send(
            &app,
            request(
                "POST",
                "/api/pet",
                Some(json!({"name": "Fritzy", "imageUrl": "https://example.com/fritzy.png"})),
            ),
        )
        .await;
        assert_eq!(status, 201);
        let id = created["petId"].as_i64().unwrap();
        assert_eq!(id, 1);

        let (status, fetched) = send(&app, request("GET", "/api/pet/1", None)).await;
        assert_eq!(status, 200);
        assert_eq!(fetched, created);

        let (status, _) = send(
            &app,
            request(
                "PUT",
                "/api/pet/2",
                Some(json!({"petId": 1, "name": "Fritz", "imageUrl": "https://example.com/f.png"})),
            ),
        )
        .await;
        assert_eq!(status, 409);

        let (status, _) = send(
            &app,
            request(
                "PUT",
                "/api/pet/1",
                Some(json!({"petId": 1, "name": "Fritz", "imageUrl": "https://example.com/f.png"})),
            ),
        )
        .await;
        assert_eq!(status, 204);

        let (status, _) = send(&app, request("DELETE", "/api/pet/1", None)).await;
        assert_eq!(status, 204);

        let (status, _) = send(&app, request("GET", "/api/pet/1", None)).await;
        assert_eq!(status, 404);

        let kinds: Vec<_> = store
            .find_events(EntityType::Pet, 1)
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.event_kind)
            .collect();
        assert_eq!(
            kinds,
            vec![
                EntityEventKind::Create,
                EntityEventKind::Update,
                EntityEventKind::Delete
            ]
        );
    }
}
