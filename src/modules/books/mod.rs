pub mod models;
pub mod query;
pub mod routes;
pub mod service;
pub mod store;

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use bookshelf_kernel::{InitCtx, Module};
use serde_json::json;

use service::BookManager;
use store::InMemoryBookStore;

/// Book catalogue module; owns the store for the lifetime of the process.
pub struct BooksModule {
    manager: Arc<BookManager>,
}

impl BooksModule {
    pub fn new() -> Self {
        Self {
            manager: Arc::new(BookManager::new(InMemoryBookStore::new())),
        }
    }
}

impl Default for BooksModule {
    fn default() -> Self {
        Self::new()
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

    fn routes(&self) -> Router {
        routes::router(self.manager.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(openapi_fragment())
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        let books = self.manager.count().await;
        tracing::info!(
            module = self.name(),
            books,
            "books module stopped; in-memory catalogue discarded"
        );
        Ok(())
    }
}

fn error_response(description: &str) -> serde_json::Value {
    json!({
        "description": description,
        "content": {
            "application/json": {
                "schema": { "$ref": "#/components/schemas/ErrorResponse" }
            }
        }
    })
}

fn book_response(description: &str) -> serde_json::Value {
    json!({
        "description": description,
        "content": {
            "application/json": {
                "schema": { "$ref": "#/components/schemas/Book" }
            }
        }
    })
}

fn openapi_fragment() -> serde_json::Value {
    let id_parameter = json!({
        "name": "id",
        "in": "path",
        "required": true,
        "schema": { "type": "string" }
    });
    let query_parameter = |name: &str, kind: &str, description: &str| {
        json!({
            "name": name,
            "in": "query",
            "required": false,
            "description": description,
            "schema": { "type": kind }
        })
    };
    let update = json!({
        "summary": "Partially update a book",
        "tags": ["Books"],
        "parameters": [id_parameter.clone()],
        "requestBody": {
            "required": true,
            "content": {
                "application/json": {
                    "schema": { "$ref": "#/components/schemas/UpdateBook" }
                }
            }
        },
        "responses": {
            "200": book_response("Updated book"),
            "400": error_response("Validation error"),
            "404": error_response("Book not found"),
            "500": error_response("Internal server error")
        }
    });

    json!({
        "paths": {
            "": {
                "get": {
                    "summary": "List books",
                    "tags": ["Books"],
                    "parameters": [
                        query_parameter("search", "string", "Case-insensitive match on title or author"),
                        query_parameter("genre", "string", "Case-insensitive exact genre"),
                        query_parameter("isAvailable", "string", "\"true\" or \"false\""),
                        query_parameter("sortBy", "string", "Book field to sort ascending by"),
                        query_parameter("page", "integer", "1-based page, default 1"),
                        query_parameter("limit", "integer", "Page size, default 10")
                    ],
                    "responses": {
                        "200": {
                            "description": "Page of books",
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/BookPage" }
                                }
                            }
                        }
                    }
                },
                "post": {
                    "summary": "Create a book",
                    "tags": ["Books"],
                    "requestBody": {
                        "required": true,
                        "content": {
                            "application/json": {
                                "schema": { "$ref": "#/components/schemas/CreateBook" }
                            }
                        }
                    },
                    "responses": {
                        "201": book_response("Created book"),
                        "400": error_response("Validation error")
                    }
                }
            },
            "/{id}": {
                "get": {
                    "summary": "Get a book",
                    "tags": ["Books"],
                    "parameters": [id_parameter.clone()],
                    "responses": {
                        "200": book_response("Book"),
                        "404": error_response("Book not found")
                    }
                },
                "patch": update.clone(),
                "put": update,
                "delete": {
                    "summary": "Soft-delete a book (marks it unavailable)",
                    "tags": ["Books"],
                    "parameters": [id_parameter],
                    "responses": {
                        "204": { "description": "Book marked unavailable" },
                        "404": error_response("Book not found")
                    }
                }
            }
        },
        "components": {
            "schemas": {
                "Book": {
                    "type": "object",
                    "properties": {
                        "id": { "type": "string" },
                        "title": { "type": "string" },
                        "author": { "type": "string" },
                        "genre": { "type": "string" },
                        "publishedYear": { "type": "integer" },
                        "availableCopies": { "type": "integer", "minimum": 0 },
                        "isAvailable": { "type": "boolean" },
                        "createdAt": { "type": "string", "format": "date-time" }
                    },
                    "required": [
                        "id", "title", "author", "genre", "publishedYear",
                        "availableCopies", "isAvailable", "createdAt"
                    ]
                },
                "CreateBook": {
                    "type": "object",
                    "properties": {
                        "title": { "type": "string" },
                        "author": { "type": "string" },
                        "genre": { "type": "string" },
                        "publishedYear": { "type": "integer" },
                        "availableCopies": { "type": "integer", "minimum": 0 }
                    },
                    "required": ["title", "author", "genre", "publishedYear", "availableCopies"]
                },
                "UpdateBook": {
                    "type": "object",
                    "properties": {
                        "title": { "type": "string" },
                        "author": { "type": "string" },
                        "genre": { "type": "string" },
                        "publishedYear": { "type": "integer" },
                        "availableCopies": { "type": "integer", "minimum": 0 },
                        "isAvailable": { "type": "boolean" }
                    }
                },
                "BookPage": {
                    "type": "object",
                    "properties": {
                        "totalItems": { "type": "integer" },
                        "currentPage": { "type": "integer" },
                        "totalPages": { "type": "integer" },
                        "data": {
                            "type": "array",
                            "items": { "$ref": "#/components/schemas/Book" }
                        }
                    },
                    "required": ["totalItems", "currentPage", "totalPages", "data"]
                }
            }
        }
    })
}

/// Create a new instance of the books module
pub fn create_module() -> Arc<dyn Module> {
    Arc::new(BooksModule::new())
}
