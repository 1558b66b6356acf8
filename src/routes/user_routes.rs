use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use validator::Validate;

use crate::controllers::user_controller::UserController;
use crate::dto::user_dto::{LoginUserRequest, RegisterUserRequest, UserResponse};
use crate::state::AppState;
use crate::utils::errors::AppResult;

pub fn create_user_router() -> Router<AppState> {
    Router::new()
        .route("/", post(register_user))
        .route("/login", post(login_user))
}

async fn register_user(
    State(state): State<AppState>,
    Json(request): Json<RegisterUserRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    request.validate()?;

    let controller = UserController::new(state.pool.clone());
    let response = controller.register(request).await?;

    Ok((StatusCode::CREATED, Json(response)))
}

async fn login_user(
    State(state): State<AppState>,
    Json(request): Json<LoginUserRequest>,
) -> AppResult<Json<UserResponse>> {
    request.validate()?;

    let controller = UserController::new(state.pool.clone());
    let response = controller.login(request).await?;

    Ok(Json(response))
}
