use crate::{backend, llm, state::Gateway};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use mcore::DegradedResponsePolicy;

/// Build the proxy router.
pub fn router<P: DegradedResponsePolicy + 'static>(state: Gateway<P>) -> Router {
    let limit = state.body_limit;
    Router::new()
        .route(
            "/api/backend/{*path}",
            get(backend::forward::<P>)
                .post(backend::forward::<P>)
                .put(backend::forward::<P>)
                .delete(backend::forward::<P>),
        )
        .route(
            "/api/llm/query",
            post(llm::query::<P>).get(llm::status::<P>),
        )
        .layer(DefaultBodyLimit::max(limit))
        .with_state(state)
}
