// Health check endpoint OpenAPI documentation

use serde_json::json;

fn health_response_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "status": {
                "type": "string",
                "enum": ["healthy", "degraded"],
                "description": "Overall health status"
            },
            "service": {
                "type": "string",
                "description": "Service name"
            },
            "timestamp": {
                "type": "string",
                "format": "date-time"
            },
            "components": {
                "type": "object",
                "properties": {
                    "postgresql": {
                        "type": "object",
                        "properties": {
                            "status": {
                                "type": "string",
                                "enum": ["healthy", "unhealthy"]
                            },
                            "max_connections": {
                                "type": "integer",
                                "nullable": true
                            },
                            "error": {
                                "type": "string",
                                "nullable": true
                            }
                        }
                    }
                }
            }
        }
    })
}

/// Health check endpoint documentation
pub fn health_endpoint() -> serde_json::Value {
    let schema = health_response_schema();

    json!({
        "get": {
            "tags": ["Health"],
            "summary": "Health check endpoint",
            "description": "Reports database reachability",
            "operationId": "healthCheck",
            "responses": {
                "200": {
                    "description": "Service is healthy",
                    "content": {
                        "application/json": { "schema": schema.clone() }
                    }
                },
                "503": {
                    "description": "Database unreachable",
                    "content": {
                        "application/json": { "schema": schema }
                    }
                }
            }
        }
    })
}
