use std::sync::Arc;

use aide::axum::{
    ApiRouter,
    routing::{get, post, put},
};
use aide::openapi::{Info, OpenApi};
use aide::scalar::Scalar;
use axum::http::{HeaderValue, Method, header};
use axum::{Extension, Json, Router, routing::get as axum_get};
use tower_http::cors::CorsLayer;

use crate::db::DbPool;

use super::handlers::{
    add_category, attach_ticket, buy_ticket, drawing_results, get_ticket, get_user, health,
    latest_draw, list_categories, publish_draw, recent_draws, register_user, settle_draw,
    ticket_result, update_user, user_tickets,
};
use super::types::RouterState;

/// Full application router, OpenAPI docs included.
pub fn build_router(pool: DbPool, cors_origins: &[String]) -> Router {
    let mut api = OpenApi {
        info: Info {
            title: "Lotto HTTP API".to_owned(),
            version: env!("CARGO_PKG_VERSION").to_owned(),
            ..Default::default()
        },
        ..Default::default()
    };

    let app = ApiRouter::new()
        .route(
            "/api/docs",
            Scalar::new("/api/docs/openapi.json")
                .with_title("Lotto API Docs")
                .axum_route(),
        )
        .api_route("/health", get(health))
        .api_route("/api/v1/:game/draw", get(latest_draw).post(publish_draw))
        .api_route("/api/v1/:game/draws", get(recent_draws))
        .api_route("/api/v1/:game/draw/:id/settle", post(settle_draw))
        .api_route(
            "/api/v1/:game/categories",
            get(list_categories).post(add_category),
        )
        .api_route("/api/v1/:game/ticket", post(buy_ticket))
        .api_route("/api/v1/tickets/:id", get(get_ticket))
        .api_route("/api/v1/tickets/:id/drawing", put(attach_ticket))
        .api_route("/api/v1/tickets/:id/result", get(ticket_result))
        .api_route("/api/v1/drawings/:id/results", get(drawing_results))
        .api_route("/api/v1/users", post(register_user))
        .api_route("/api/v1/users/:id", get(get_user).put(update_user))
        .api_route("/api/v1/users/:id/tickets", get(user_tickets))
        .with_state(RouterState { pool })
        .finish_api(&mut api);

    let api = Arc::new(api);
    app.route("/api/docs/openapi.json", axum_get(serve_openapi))
        .layer(Extension(api))
        .layer(cors_layer(cors_origins))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(e) => {
                log::warn!("Ignoring invalid CORS origin {origin:?}: {e}");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
}

async fn serve_openapi(Extension(api): Extension<Arc<OpenApi>>) -> Json<OpenApi> {
    Json((*api).clone())
}
