pub mod models;
pub mod repository;
mod routes;

use async_trait::async_trait;
use axum::Router;
use serde_json::json;

use bookstall_kernel::{InitCtx, Migration, Module};

use crate::state::AppState;

/// Books module: each book belongs to exactly one seller
pub struct BooksModule;

impl BooksModule {
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "books module initialized"
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
        let book = |description: &str| {
            json!({
                "description": description,
                "content": {
                    "application/json": {
                        "schema": { "$ref": "#/components/schemas/Book" }
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
        let book_input = |schema: &str| {
            json!({
                "required": true,
                "content": {
                    "application/json": {
                        "schema": { "$ref": format!("#/components/schemas/{}", schema) }
                    }
                }
            })
        };
        let book_fields = json!({
            "title": { "type": "string", "minLength": 1, "maxLength": 50 },
            "author": { "type": "string", "minLength": 1, "maxLength": 100 },
            "year": { "type": "integer", "minimum": models::MIN_YEAR },
            "pages": { "type": "integer", "minimum": 1 }
        });

        let mut create_fields = book_fields.clone();
        create_fields["seller_id"] = json!({
            "type": "integer",
            "format": "int64",
            "description": "Must match the authenticated seller when present"
        });

        Some(json!({
            "paths": {
                "/": {
                    "get": {
                        "summary": "List books",
                        "tags": ["Books"],
                        "responses": {
                            "200": {
                                "description": "All books",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/BookList" }
                                    }
                                }
                            }
                        }
                    },
                    "post": {
                        "summary": "Create a book for the authenticated seller",
                        "tags": ["Books"],
                        "security": bearer,
                        "requestBody": book_input("CreateBook"),
                        "responses": {
                            "201": book("Book created"),
                            "401": error("Missing or invalid bearer token"),
                            "403": error("seller_id is not the authenticated seller"),
                            "422": error("Validation error")
                        }
                    }
                },
                "/{id}": {
                    "get": {
                        "summary": "Get a book",
                        "tags": ["Books"],
                        "parameters": id_param,
                        "responses": {
                            "200": book("The book"),
                            "404": error("Book not found")
                        }
                    },
                    "put": {
                        "summary": "Replace a book's fields",
                        "tags": ["Books"],
                        "security": bearer,
                        "parameters": id_param,
                        "requestBody": book_input("UpdateBook"),
                        "responses": {
                            "200": book("Book updated"),
                            "401": error("Missing or invalid bearer token"),
                            "403": error("Book belongs to another seller"),
                            "404": error("Book not found"),
                            "422": error("Validation error")
                        }
                    },
                    "delete": {
                        "summary": "Delete a book",
                        "tags": ["Books"],
                        "security": bearer,
                        "parameters": id_param,
                        "responses": {
                            "204": { "description": "Book deleted" },
                            "401": error("Missing or invalid bearer token"),
                            "403": error("Book belongs to another seller"),
                            "404": error("Book not found")
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Book": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "integer", "format": "int64" },
                            "title": { "type": "string" },
                            "author": { "type": "string" },
                            "year": { "type": "integer" },
                            "pages": { "type": "integer" },
                            "seller_id": { "type": "integer", "format": "int64" }
                        },
                        "required": ["id", "title", "author", "year", "pages", "seller_id"]
                    },
                    "BookList": {
                        "type": "object",
                        "properties": {
                            "books": {
                                "type": "array",
                                "items": { "$ref": "#/components/schemas/Book" }
                            }
                        },
                        "required": ["books"]
                    },
                    "CreateBook": {
                        "type": "object",
                        "properties": create_fields,
                        "required": ["title", "author", "year", "pages"]
                    },
                    "UpdateBook": {
                        "type": "object",
                        "properties": book_fields,
                        "required": ["title", "author", "year", "pages"]
                    }
                }
            }
        }))
    }

    fn migrations(&self) -> Vec<Migration> {
        vec![Migration {
            id: "001_init",
            up: r#"
                CREATE TABLE books (
                    id        INTEGER PRIMARY KEY AUTOINCREMENT,
                    title     TEXT    NOT NULL,
                    author    TEXT    NOT NULL,
                    year      INTEGER NOT NULL CHECK (year >= 2020),
                    pages     INTEGER NOT NULL CHECK (pages > 0),
                    seller_id INTEGER NOT NULL REFERENCES sellers(id) ON DELETE CASCADE
                );
                CREATE INDEX books_seller_id ON books(seller_id);
                "#,
        }]
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module stopped");
        Ok(())
    }
}

/// Create a new instance of the books module
pub fn create_module() -> std::sync::Arc<dyn Module> {
    std::sync::Arc::new(BooksModule::new())
}
