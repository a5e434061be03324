use axum::extract::{Path, Query, State};
use axum::{Json, http::StatusCode};
use serde_json::json;

use crate::service::{self, NewCategory};

use super::types::{
    ApiResult, AttachDrawingRequest, BuyTicketRequest, DrawsQuery, GameDrawingPath, GamePath,
    IdPath, NewCategoryRequest, PublishDrawingRequest, RegisterUserRequest, RouterState,
    UpdateUserRequest, ok_value, parse_game, respond, service_error,
};

macro_rules! game_or_return {
    ($segment:expr) => {
        match parse_game(&$segment) {
            Ok(game) => game,
            Err(e) => return service_error(&e),
        }
    };
}

pub(super) async fn health(State(state): State<RouterState>) -> ApiResult {
    let database = match service::check_database(&state.pool).await {
        Ok(()) => "UP".to_owned(),
        Err(e) => {
            log::warn!("Health check: database unavailable: {e}");
            "DOWN".to_owned()
        }
    };
    ok_value(StatusCode::OK, json!({"status": "UP", "database": database}))
}

pub(super) async fn latest_draw(
    State(state): State<RouterState>,
    Path(path): Path<GamePath>,
) -> ApiResult {
    let game = game_or_return!(path.game);
    let drawing = service::latest_drawing(&state.pool, game).await;
    respond(StatusCode::OK, drawing.map(|d| d.view()))
}

pub(super) async fn recent_draws(
    State(state): State<RouterState>,
    Path(path): Path<GamePath>,
    Query(query): Query<DrawsQuery>,
) -> ApiResult {
    let game = game_or_return!(path.game);
    let drawings = service::recent_drawings(&state.pool, game, query.limit).await;
    respond(
        StatusCode::OK,
        drawings.map(|list| list.iter().map(|d| d.view()).collect::<Vec<_>>()),
    )
}

pub(super) async fn publish_draw(
    State(state): State<RouterState>,
    Path(path): Path<GamePath>,
    Json(payload): Json<PublishDrawingRequest>,
) -> ApiResult {
    let game = game_or_return!(path.game);
    let published = service::publish_drawing(
        &state.pool,
        game,
        payload.draw_time,
        payload.numbers,
        payload.bonus_number,
    )
    .await;
    respond(StatusCode::CREATED, published)
}

pub(super) async fn settle_draw(
    State(state): State<RouterState>,
    Path(path): Path<GameDrawingPath>,
) -> ApiResult {
    let game = game_or_return!(path.game);
    respond(
        StatusCode::OK,
        service::settle_drawing(&state.pool, game, path.id).await,
    )
}

pub(super) async fn list_categories(
    State(state): State<RouterState>,
    Path(path): Path<GamePath>,
) -> ApiResult {
    let game = game_or_return!(path.game);
    respond(
        StatusCode::OK,
        service::list_categories(&state.pool, game).await,
    )
}

pub(super) async fn add_category(
    State(state): State<RouterState>,
    Path(path): Path<GamePath>,
    Json(payload): Json<NewCategoryRequest>,
) -> ApiResult {
    let game = game_or_return!(path.game);
    let new = NewCategory {
        name: payload.name,
        match_count: payload.match_count,
        include_bonus: payload.include_bonus,
        prize_amount: payload.prize_amount,
        prize_percentage: payload.prize_percentage,
    };
    respond(
        StatusCode::CREATED,
        service::add_category(&state.pool, game, new).await,
    )
}

pub(super) async fn buy_ticket(
    State(state): State<RouterState>,
    Path(path): Path<GamePath>,
    Json(payload): Json<BuyTicketRequest>,
) -> ApiResult {
    let game = game_or_return!(path.game);
    let ticket = service::buy_ticket(
        &state.pool,
        game,
        payload.user_id,
        payload.numbers,
        payload.drawing_id,
    )
    .await;
    respond(StatusCode::CREATED, ticket.map(|t| t.view()))
}

pub(super) async fn get_ticket(
    State(state): State<RouterState>,
    Path(path): Path<IdPath>,
) -> ApiResult {
    let ticket = service::get_ticket(&state.pool, path.id).await;
    respond(StatusCode::OK, ticket.map(|t| t.view()))
}

pub(super) async fn attach_ticket(
    State(state): State<RouterState>,
    Path(path): Path<IdPath>,
    Json(payload): Json<AttachDrawingRequest>,
) -> ApiResult {
    let ticket = service::attach_ticket(&state.pool, path.id, payload.drawing_id).await;
    respond(StatusCode::OK, ticket.map(|t| t.view()))
}

pub(super) async fn ticket_result(
    State(state): State<RouterState>,
    Path(path): Path<IdPath>,
) -> ApiResult {
    let result = service::ticket_result(&state.pool, path.id)
        .await
        .and_then(|r| r.view().map_err(Into::into));
    respond(StatusCode::OK, result)
}

pub(super) async fn drawing_results(
    State(state): State<RouterState>,
    Path(path): Path<IdPath>,
) -> ApiResult {
    let results = service::drawing_results(&state.pool, path.id)
        .await
        .and_then(|list| {
            list.iter()
                .map(|r| r.view())
                .collect::<anyhow::Result<Vec<_>>>()
                .map_err(Into::into)
        });
    respond(StatusCode::OK, results)
}

pub(super) async fn register_user(
    State(state): State<RouterState>,
    Json(payload): Json<RegisterUserRequest>,
) -> ApiResult {
    respond(
        StatusCode::CREATED,
        service::register_user(&state.pool, &payload.username, &payload.email).await,
    )
}

pub(super) async fn get_user(
    State(state): State<RouterState>,
    Path(path): Path<IdPath>,
) -> ApiResult {
    respond(StatusCode::OK, service::get_user(&state.pool, path.id).await)
}

pub(super) async fn update_user(
    State(state): State<RouterState>,
    Path(path): Path<IdPath>,
    Json(payload): Json<UpdateUserRequest>,
) -> ApiResult {
    respond(
        StatusCode::OK,
        service::update_user(&state.pool, path.id, payload.username, payload.email).await,
    )
}

pub(super) async fn user_tickets(
    State(state): State<RouterState>,
    Path(path): Path<IdPath>,
) -> ApiResult {
    let tickets = service::user_tickets(&state.pool, path.id).await;
    respond(
        StatusCode::OK,
        tickets.map(|list| list.iter().map(|t| t.view()).collect::<Vec<_>>()),
    )
}
