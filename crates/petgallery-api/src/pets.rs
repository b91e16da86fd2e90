// Pet CRUD HTTP routes

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use petgallery_core::{validate_pet, Pet, PetRepository, PetRequest, ResultType};
use std::sync::Arc;

use crate::actor::ActorHeader;
use crate::services::PetService;

/// App state for pet routes
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<PetService>,
    pub default_actor_id: i32,
}

impl AppState {
    pub fn new(repository: Arc<dyn PetRepository>, default_actor_id: i32) -> Self {
        Self {
            service: Arc::new(PetService::new(repository)),
            default_actor_id,
        }
    }
}

/// Create pet routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/api/pet", get(list_pets).post(create_pet))
        .route(
            "/api/pet/:id",
            get(get_pet).put(update_pet).delete(delete_pet),
        )
        .with_state(state)
}

/// Message returned when the body is not a JSON pet
pub const UNREADABLE_PET: &str = "Pet body could not be read.";

fn messages_response(status: StatusCode, messages: Vec<String>) -> Response {
    (status, Json(messages)).into_response()
}

/// Unwrap the JSON body, answering 400 with a message array when it cannot be parsed
fn pet_body(
    payload: Result<Json<Option<PetRequest>>, JsonRejection>,
) -> Result<Option<PetRequest>, Response> {
    payload.map(|Json(req)| req).map_err(|rejection| {
        tracing::warn!("Rejected pet body: {}", rejection.body_text());
        messages_response(StatusCode::BAD_REQUEST, vec![UNREADABLE_PET.to_string()])
    })
}

/// GET /api/pet - List all pets
#[utoipa::path(
    get,
    path = "/api/pet",
    responses(
        (status = 200, description = "List of pets", body = Vec<Pet>),
        (status = 500, description = "Internal server error")
    ),
    tag = "pets"
)]
pub async fn list_pets(State(state): State<AppState>) -> Result<Json<Vec<Pet>>, StatusCode> {
    let pets = state.service.find_all().await.map_err(|e| {
        tracing::error!("Failed to list pets: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Ok(Json(pets))
}

/// GET /api/pet/{id} - Get pet by ID
#[utoipa::path(
    get,
    path = "/api/pet/{id}",
    params(
        ("id" = i32, Path, description = "Pet ID")
    ),
    responses(
        (status = 200, description = "Pet found", body = Pet),
        (status = 404, description = "Pet not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "pets"
)]
pub async fn get_pet(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Pet>, StatusCode> {
    let pet = state
        .service
        .find_by_id(id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get pet: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .ok_or(StatusCode::NOT_FOUND)?;

    Ok(Json(pet))
}

/// POST /api/pet - Create a new pet
#[utoipa::path(
    post,
    path = "/api/pet",
    request_body = PetRequest,
    responses(
        (status = 201, description = "Pet created successfully", body = Pet),
        (status = 400, description = "Unreadable body or validation failed", body = Vec<String>),
        (status = 500, description = "Internal server error")
    ),
    tag = "pets"
)]
pub async fn create_pet(
    State(state): State<AppState>,
    actor: ActorHeader,
    payload: Result<Json<Option<PetRequest>>, JsonRejection>,
) -> Result<Response, StatusCode> {
    let req = match pet_body(payload) {
        Ok(req) => req,
        Err(response) => return Ok(response),
    };

    let result = state
        .service
        .add(req, actor.or(state.default_actor_id))
        .await
        .map_err(|e| {
            tracing::error!("Failed to create pet: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    if !result.is_success() {
        return Ok(messages_response(
            StatusCode::BAD_REQUEST,
            result.into_messages(),
        ));
    }

    let pet = result
        .into_payload()
        .ok_or(StatusCode::INTERNAL_SERVER_ERROR)?;

    Ok((StatusCode::CREATED, Json(pet)).into_response())
}

/// PUT /api/pet/{id} - Replace a pet
#[utoipa::path(
    put,
    path = "/api/pet/{id}",
    params(
        ("id" = i32, Path, description = "Pet ID")
    ),
    request_body = PetRequest,
    responses(
        (status = 204, description = "Pet updated successfully"),
        (status = 400, description = "Unreadable body or validation failed", body = Vec<String>),
        (status = 404, description = "Pet not found", body = Vec<String>),
        (status = 409, description = "Path id does not match body id"),
        (status = 500, description = "Internal server error")
    ),
    tag = "pets"
)]
pub async fn update_pet(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    actor: ActorHeader,
    payload: Result<Json<Option<PetRequest>>, JsonRejection>,
) -> Result<Response, StatusCode> {
    let req = match pet_body(payload) {
        Ok(req) => req,
        Err(response) => return Ok(response),
    };

    // Invalid bodies are reported before the id check.
    if let Err(messages) = validate_pet(req.as_ref()) {
        return Ok(messages_response(StatusCode::BAD_REQUEST, messages));
    }
    if req.as_ref().is_some_and(|pet| pet.pet_id != id) {
        return Ok(StatusCode::CONFLICT.into_response());
    }

    let result = state
        .service
        .update(req, actor.or(state.default_actor_id))
        .await
        .map_err(|e| {
            tracing::error!("Failed to update pet: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    Ok(match result.result_type() {
        ResultType::Success => StatusCode::NO_CONTENT.into_response(),
        ResultType::NotFound => messages_response(StatusCode::NOT_FOUND, result.into_messages()),
        ResultType::Invalid => messages_response(StatusCode::BAD_REQUEST, result.into_messages()),
    })
}

/// DELETE /api/pet/{id} - Delete a pet
#[utoipa::path(
    delete,
    path = "/api/pet/{id}",
    params(
        ("id" = i32, Path, description = "Pet ID")
    ),
    responses(
        (status = 204, description = "Pet deleted successfully"),
        (status = 404, description = "Pet not found", body = Vec<String>),
        (status = 500, description = "Internal server error")
    ),
    tag = "pets"
)]
pub async fn delete_pet(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    actor: ActorHeader,
) -> Result<Response, StatusCode> {
    let result = state
        .service
        .delete_by_id(id, actor.or(state.default_actor_id))
        .await
        .map_err(|e| {
            tracing::error!("Failed to delete pet: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    if result.is_success() {
        Ok(StatusCode::NO_CONTENT.into_response())
    } else {
        Ok(messages_response(
            StatusCode::NOT_FOUND,
            result.into_messages(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request};
    use http_body_util::BodyExt;
    use petgallery_core::{
        AuditingPetRepository, EntityEventKind, EntityType, InMemoryPetStore, PetStore,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn app() -> (InMemoryPetStore, Router) {
        let store = InMemoryPetStore::new();
        store
            .seed(vec![Pet::new(1, "Fluffy", "https://example.com/image-1")])
            .await;
        let repo = Arc::new(AuditingPetRepository::new(store.clone()));
        (store, routes(AppState::new(repo, 0)))
    }

    fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_list_pets() {
        let (_, app) = app().await;

        let response = app
            .oneshot(Request::builder().uri("/api/pet").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!([{"petId": 1, "name": "Fluffy", "imageUrl": "https://example.com/image-1"}])
        );
    }

    #[tokio::test]
    async fn test_get_missing_pet_is_404() {
        let (_, app) = app().await;

        let response = app
            .oneshot(Request::builder().uri("/api/pet/99").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_create_invalid_pet_is_400_with_messages() {
        let (store, app) = app().await;

        let response = app
            .oneshot(json_request(
                "POST",
                "/api/pet",
                json!({"name": " ", "imageUrl": "not a url"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            json!(["Pet name is required.", "Pet image URL must be a URL."])
        );
        assert_eq!(store.find_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_create_null_pet_is_400() {
        let (_, app) = app().await;

        let response = app
            .oneshot(json_request("POST", "/api/pet", Value::Null))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await, json!(["Pet cannot be null."]));
    }

    #[tokio::test]
    async fn test_create_records_actor_from_header() {
        let (store, app) = app().await;
        let mut request = json_request(
            "POST",
            "/api/pet",
            json!({"name": "Fritzy", "imageUrl": "https://example.com/i.png"}),
        );
        request
            .headers_mut()
            .insert("x-actor-id", "31".parse().unwrap());

        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let events = store.find_events(EntityType::Pet, 2).await.unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_kind, EntityEventKind::Create);
        assert_eq!(events[0].actor_id, 31);
    }

    #[tokio::test]
    async fn test_update_invalid_body_wins_over_id_mismatch() {
        let (_, app) = app().await;

        let response = app
            .oneshot(json_request(
                "PUT",
                "/api/pet/1",
                json!({"petId": 2, "name": "", "imageUrl": "https://example.com/x.png"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await, json!(["Pet name is required."]));
    }

    #[tokio::test]
    async fn test_update_missing_pet_is_404_with_message() {
        let (_, app) = app().await;

        let response = app
            .oneshot(json_request(
                "PUT",
                "/api/pet/4",
                json!({"petId": 4, "name": "New", "imageUrl": "https://example.com/x.png"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await, json!(["Pet id: '4' not found."]));
    }

    #[tokio::test]
    async fn test_update_existing_pet_is_204() {
        let (store, app) = app().await;

        let response = app
            .oneshot(json_request(
                "PUT",
                "/api/pet/1",
                json!({"petId": 1, "name": "Fluff", "imageUrl": "https://example.com/x.png"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(
            store.find_by_id(1).await.unwrap(),
            Some(Pet::new(1, "Fluff", "https://example.com/x.png"))
        );
    }

    #[tokio::test]
    async fn test_delete_missing_pet_is_404_with_message() {
        let (store, app) = app().await;

        let response = app
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/api/pet/8")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await, json!(["Pet id: '8' not found."]));
        assert!(store.events().await.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_actor_header_is_400() {
        let (_, app) = app().await;

        let response = app
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/api/pet/1")
                    .header("x-actor-id", "bob")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_create_with_mistyped_field_is_400_with_message() {
        let (store, app) = app().await;

        let response = app
            .oneshot(json_request(
                "POST",
                "/api/pet",
                json!({"name": 5, "imageUrl": "https://example.com/x.png"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await, json!([UNREADABLE_PET]));
        assert_eq!(store.find_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_with_malformed_json_is_400_with_message() {
        let (_, app) = app().await;

        let response = app
            .oneshot(
                Request::builder()
                    .method("PUT")
                    .uri("/api/pet/1")
                    .header("content-type", "application/json")
                    .body(Body::from("{\"petId\": 1, \"name\":"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await, json!([UNREADABLE_PET]));
    }
}
