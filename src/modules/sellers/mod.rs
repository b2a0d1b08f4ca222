pub mod models;
pub mod repository;
mod routes;

use async_trait::async_trait;
use axum::Router;
use serde_json::json;

use bookstall_kernel::{InitCtx, Migration, Module};

use crate::state::AppState;

/// Seller accounts mounted at `/api/v1/seller`
pub struct SellersModule;

impl SellersModule {
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Module for SellersModule {
    fn name(&self) -> &'static str {
        "seller"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sellers")
            .fetch_one(ctx.db)
            .await?;
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            sellers = count,
            "sellers module initialized"
        );
        Ok(())
    }

    fn routes(&self, ctx: &InitCtx<'_>) -> Router {
        routes::router(AppState::from_ctx(ctx))
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        let error = |description: &str| {
            json!({
                "description": description,
                "content": {
                    "application/json": {
                        "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                    }
                }
            })
        };
        let id_param = json!([{
            "name": "id",
            "in": "path",
            "required": true,
            "schema": { "type": "integer", "format": "int64" }
        }]);
        let bearer = json!([{ "bearerAuth": [] }]);

        Some(json!({
            "paths": {
                "/": {
                    "get": {
                        "summary": "List sellers",
                        "tags": ["Sellers"],
                        "responses": {
                            "200": {
                                "description": "All sellers",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "array",
                                            "items": { "$ref": "#/components/schemas/Seller" }
                                        }
                                    }
                                }
                            }
                        }
                    },
                    "post": {
                        "summary": "Register a seller",
                        "tags": ["Sellers"],
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/CreateSeller" }
                                }
                            }
                        },
                        "responses": {
                            "201": {
                                "description": "Seller created",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/Seller" }
                                    }
                                }
                            },
                            "409": error("Email already registered"),
                            "422": error("Validation error")
                        }
                    }
                },
                "/{id}": {
                    "get": {
                        "summary": "Get a seller with their books",
                        "tags": ["Sellers"],
                        "security": bearer,
                        "parameters": id_param,
                        "responses": {
                            "200": {
                                "description": "Seller detail",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/SellerDetail" }
                                    }
                                }
                            },
                            "401": error("Missing or invalid bearer token"),
                            "404": error("Seller not found")
                        }
                    },
                    "put": {
                        "summary": "Update the authenticated seller",
                        "tags": ["Sellers"],
                        "security": bearer,
                        "parameters": id_param,
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/UpdateSeller" }
                                }
                            }
                        },
                        "responses": {
                            "200": {
                                "description": "Seller updated",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/Seller" }
                                    }
                                }
                            },
                            "401": error("Missing or invalid bearer token"),
                            "403": error("Not the authenticated seller"),
                            "404": error("Seller not found"),
                            "409": error("Email already registered"),
                            "422": error("Validation error")
                        }
                    },
                    "delete": {
                        "summary": "Delete the authenticated seller and their books",
                        "tags": ["Sellers"],
                        "security": bearer,
                        "parameters": id_param,
                        "responses": {
                            "204": { "description": "Seller deleted" },
                            "401": error("Missing or invalid bearer token"),
                            "403": error("Not the authenticated seller"),
                            "404": error("Seller not found")
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Seller": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "integer", "format": "int64" },
                            "first_name": { "type": "string" },
                            "last_name": { "type": "string" },
                            "email": { "type": "string", "format": "email" }
                        },
                        "required": ["id", "first_name", "last_name", "email"]
                    },
                    "SellerDetail": {
                        "allOf": [
                            { "$ref": "#/components/schemas/Seller" },
                            {
                                "type": "object",
                                "properties": {
                                    "books": {
                                        "type": "array",
                                        "items": { "$ref": "#/components/schemas/BookInSeller" }
                                    }
                                },
                                "required": ["books"]
                            }
                        ]
                    },
                    "BookInSeller": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "integer", "format": "int64" },
                            "title": { "type": "string" },
                            "author": { "type": "string" },
                            "year": { "type": "integer" },
                            "pages": { "type": "integer" }
                        },
                        "required": ["id", "title", "author", "year", "pages"]
                    },
                    "CreateSeller": {
                        "type": "object",
                        "properties": {
                            "first_name": { "type": "string", "minLength": 1, "maxLength": 50 },
                            "last_name": { "type": "string", "minLength": 1, "maxLength": 50 },
                            "email": { "type": "string", "format": "email" },
                            "password": { "type": "string", "minLength": 6 }
                        },
                        "required": ["first_name", "last_name", "email", "password"]
                    },
                    "UpdateSeller": {
                        "type": "object",
                        "properties": {
                            "first_name": { "type": "string", "minLength": 1, "maxLength": 50 },
                            "last_name": { "type": "string", "minLength": 1, "maxLength": 50 },
                            "email": { "type": "string", "format": "email" }
                        }
                    }
                }
            }
        }))
    }

    fn migrations(&self) -> Vec<Migration> {
        vec![Migration {
            id: "001_init",
            up: r#"
                CREATE TABLE sellers (
                    id         INTEGER PRIMARY KEY AUTOINCREMENT,
                    first_name TEXT NOT NULL,
                    last_name  TEXT NOT NULL,
                    email      TEXT NOT NULL UNIQUE COLLATE NOCASE,
                    password   TEXT NOT NULL
                );
                "#,
        }]
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "sellers module stopped");
        Ok(())
    }
}

/// Create a new instance of the sellers module
pub fn create_module() -> std::sync::Arc<dyn Module> {
    std::sync::Arc::new(SellersModule::new())
}
