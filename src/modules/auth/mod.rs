pub mod extract;
pub mod models;

use async_trait::async_trait;
use axum::{
    extract::{rejection::FormRejection, State},
    routing::post,
    Form, Json, Router,
};
use serde_json::json;
use time::OffsetDateTime;

use bookstall_http::AppError;
use bookstall_kernel::{InitCtx, Module};

use crate::error::auth_failure;
use crate::modules::sellers::repository as sellers;
use crate::state::AppState;
use models::{TokenRequest, TokenResponse};

pub use extract::CurrentSeller;

/// Issues bearer tokens for seller credentials at `/api/v1/token`
pub struct AuthModule;

impl AuthModule {
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Module for AuthModule {
    fn name(&self) -> &'static str {
        "auth"
    }

    fn mount_path(&self) -> &'static str {
        ""
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            token_ttl_minutes = ctx.settings.auth.access_token_ttl_minutes,
            "auth module initialized"
        );
        Ok(())
    }

    fn routes(&self, ctx: &InitCtx<'_>) -> Router {
        Router::new()
            .route("/token", post(issue_token))
            .with_state(AppState::from_ctx(ctx))
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(json!({
            "paths": {
                "/token": {
                    "post": {
                        "summary": "Exchange seller credentials for a bearer token",
                        "tags": ["Auth"],
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/x-www-form-urlencoded": {
                                    "schema": { "$ref": "#/components/schemas/TokenRequest" }
                                }
                            }
                        },
                        "responses": {
                            "200": {
                                "description": "Token issued",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/TokenResponse" }
                                    }
                                }
                            },
                            "401": {
                                "description": "Incorrect email or password",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                                    }
                                }
                            }
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "TokenRequest": {
                        "type": "object",
                        "properties": {
                            "username": { "type": "string", "format": "email" },
                            "password": { "type": "string" }
                        },
                        "required": ["username", "password"]
                    },
                    "TokenResponse": {
                        "type": "object",
                        "properties": {
                            "access_token": { "type": "string" },
                            "token_type": { "type": "string", "example": "bearer" },
                            "expires_in": { "type": "integer" }
                        },
                        "required": ["access_token", "token_type", "expires_in"]
                    }
                }
            }
        }))
    }
}

/// `POST /token`
async fn issue_token(
    State(state): State<AppState>,
    form: Result<Form<TokenRequest>, FormRejection>,
) -> Result<Json<TokenResponse>, AppError> {
    let Form(credentials) = form.map_err(form_rejection)?;

    let rejected = || AppError::unauthorized("Incorrect email or password");

    let seller = sellers::find_by_email(&state.db, &credentials.username)
        .await?
        .ok_or_else(rejected)?;

    let matches = state
        .passwords
        .verify(&credentials.password, &seller.password)
        .await
        .map_err(auth_failure)?;
    if !matches {
        tracing::info!(seller_id = seller.id, "rejected login with wrong password");
        return Err(rejected());
    }

    let issued = state.tokens.issue(&seller.email).map_err(auth_failure)?;
    let expires_in = (issued.expires_at - OffsetDateTime::now_utc()).whole_seconds();

    tracing::info!(seller_id = seller.id, "issued access token");
    Ok(Json(TokenResponse {
        access_token: issued.access_token,
        token_type: "bearer".to_string(),
        expires_in,
    }))
}

/// Missing or mistyped fields are a 422; a wrong content type or unreadable
/// body is a 400.
fn form_rejection(rejection: FormRejection) -> AppError {
    match rejection {
        FormRejection::FailedToDeserializeForm(_)
        | FormRejection::FailedToDeserializeFormBody(_) => AppError::validation(
            vec![json!({ "field": null, "error": rejection.body_text() })],
            "Expected form fields 'username' and 'password'",
        ),
        other => AppError::bad_request(other.body_text()),
    }
}

/// Create a new instance of the auth module
pub fn create_module() -> std::sync::Arc<dyn Module> {
    std::sync::Arc::new(AuthModule::new())
}
