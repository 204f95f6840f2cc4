//! Resource dispatcher: four routes per registered resource, each closing over its binding.

use crate::handlers::resource;
use crate::service::Identity;
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path},
    routing::{post, put},
    Json, Router,
};
use serde_json::Value;

/// POST/GET `/{name}` and PUT/DELETE `/{name}/:id` for every resource in the registry.
pub fn resource_routes(state: AppState) -> Router {
    let mut router: Router<AppState> = Router::new();
    for binding in state.registry.bindings() {
        let (on_create, on_read, on_update, on_delete) =
            (binding.clone(), binding.clone(), binding.clone(), binding.clone());
        router = router
            .route(
                &format!("/{}", binding.name()),
                post(move |identity: Identity, payload: Result<Json<Value>, JsonRejection>| {
                    resource::create(on_create, identity, payload)
                })
                .get(move |identity: Identity| resource::read(on_read, identity)),
            )
            .route(
                &format!("/{}/:id", binding.name()),
                put(
                    move |identity: Identity, Path(id): Path<String>, payload: Result<Json<Value>, JsonRejection>| {
                        resource::update(on_update, identity, id, payload)
                    },
                )
                .delete(move |identity: Identity, Path(id): Path<String>| {
                    resource::delete(on_delete, identity, id)
                }),
            );
    }
    router.with_state(state)
}
