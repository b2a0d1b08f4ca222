//! OpenAPI document assembled from module fragments

use serde_json::{json, Value};

use bookstall_kernel::ModuleRegistry;

use crate::router::API_PREFIX;

pub const API_TITLE: &str = "Bookstall API";

/// Public path of a module-relative OpenAPI path.
fn public_path(mount_path: &str, path: &str) -> String {
    let mount_path = mount_path.trim_matches('/');
    let base = if mount_path.is_empty() {
        API_PREFIX.to_string()
    } else {
        format!("{}/{}", API_PREFIX, mount_path)
    };
    if path == "/" && !mount_path.is_empty() {
        base
    } else {
        format!("{}{}", base, path)
    }
}

/// Merge every module's fragment into one OpenAPI 3 document.
pub fn merged_spec(registry: &ModuleRegistry) -> Value {
    let mut openapi_spec = json!({
        "openapi": "3.0.0",
        "info": {
            "title": API_TITLE,
            "version": "1.0.0",
            "description": "Sellers, their books, and bearer-token authentication"
        },
        "paths": {},
        "components": {
            "schemas": {},
            "securitySchemes": {
                "bearerAuth": {
                    "type": "http",
                    "scheme": "bearer",
                    "bearerFormat": "JWT"
                }
            }
        }
    });

    openapi_spec["components"]["schemas"]["ErrorResponse"] = json!({
        "type": "object",
        "properties": {
            "error": {
                "type": "object",
                "properties": {
                    "code": { "type": "string" },
                    "message": { "type": "string" },
                    "details": { "type": "array", "items": {} },
                    "trace_id": { "type": "string" },
                    "timestamp": { "type": "string" }
                },
                "required": ["code", "message", "trace_id", "timestamp"]
            }
        },
        "required": ["error"]
    });

    openapi_spec["paths"]["/healthz"] = json!({
        "get": {
            "summary": "Health check",
            "responses": {
                "200": {
                    "description": "OK",
                    "content": { "text/plain": { "schema": { "type": "string" } } }
                }
            }
        }
    });

    for module in registry.modules() {
        let Some(module_spec) = module.openapi() else {
            continue;
        };

        if let Some(paths) = module_spec.get("paths").and_then(Value::as_object) {
            for (path, path_item) in paths {
                let prefixed = public_path(module.mount_path(), path);
                openapi_spec["paths"][prefixed] = path_item.clone();
            }
        }

        if let Some(schemas) = module_spec
            .get("components")
            .and_then(|c| c.get("schemas"))
            .and_then(Value::as_object)
        {
            for (schema_name, schema_def) in schemas {
                openapi_spec["components"]["schemas"][schema_name] = schema_def.clone();
            }
        }
    }

    openapi_spec
}

#[cfg(test)]
mod tests {
    use super::*;
    use bookstall_kernel::Module;
    use std::sync::Arc;

    struct Fragment {
        name: &'static str,
        mount: &'static str,
    }

    #[async_trait::async_trait]
    impl Module for Fragment {
        fn name(&self) -> &'static str {
            self.name
        }

        fn mount_path(&self) -> &'static str {
            self.mount
        }

        fn openapi(&self) -> Option<Value> {
            Some(json!({
                "paths": { "/": { "get": {} }, "/{id}": { "get": {} } },
                "components": { "schemas": { (self.name): { "type": "object" } } }
            }))
        }
    }

    #[test]
    fn paths_are_prefixed_with_mount_path() {
        assert_eq!(public_path("books", "/"), "/api/v1/books");
        assert_eq!(public_path("books", "/{id}"), "/api/v1/books/{id}");
        assert_eq!(public_path("", "/token"), "/api/v1/token");
    }

    #[test]
    fn module_fragments_are_merged() {
        let mut registry = ModuleRegistry::new();
        registry.register(Arc::new(Fragment {
            name: "seller",
            mount: "seller",
        }));

        let spec = merged_spec(&registry);
        assert!(spec["paths"]["/api/v1/seller"].is_object());
        assert!(spec["paths"]["/api/v1/seller/{id}"].is_object());
        assert!(spec["paths"]["/healthz"].is_object());
        assert!(spec["components"]["schemas"]["seller"].is_object());
        assert!(spec["components"]["schemas"]["ErrorResponse"].is_object());
    }
}
