pub mod health;

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::state::AppState;
use crate::{content, feed, interactions, likes, saved, users};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Users & profile
        .route("/api/v1/users", post(users::handle_register))
        .route("/api/v1/users/me", get(users::handle_get_me))
        .route("/api/v1/profile/tags", get(users::handle_get_profile_tags))
        // Content
        .route("/api/v1/cards", post(content::handle_new_card))
        .route("/api/v1/cards/:id", get(content::handle_get_card))
        .route("/api/v1/careers/:id", get(content::handle_get_career))
        // Engagement — all of these feed the affinity engine
        .route("/api/v1/cards/:id/likes", post(likes::handle_toggle_like))
        .route(
            "/api/v1/interactions",
            post(interactions::handlers::handle_new_interaction),
        )
        .route(
            "/api/v1/saved",
            post(saved::handle_save_item).get(saved::handle_get_saved),
        )
        .route("/api/v1/saved/:id", delete(saved::handle_unsave_item))
        // Personalized feed
        .route("/api/v1/feed", get(feed::handle_get_feed))
        .with_state(state)
}
