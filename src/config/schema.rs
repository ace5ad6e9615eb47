use serde_json::{json, Value};
use std::sync::LazyLock;

pub static CONFIG_SCHEMA: LazyLock<Value> = LazyLock::new(|| {
    json!({
        "$schema": "http://json-schema.org/draft-07/schema#",
        "type": "object",
        "properties": {
            "graph": {
                "type": "object",
                "properties": {
                    "snapshot": { "type": "string" }
                },
                "additionalProperties": false
            },
            "protection": {
                "type": "object",
                "properties": {
                    "denylist": {
                        "type": "array",
                        "items": { "type": "string", "minLength": 1 }
                    }
                },
                "additionalProperties": false
            },
            "generation": {
                "type": "object",
                "properties": {
                    "max_parallel": { "type": "integer", "minimum": 1, "maximum": 256 }
                },
                "additionalProperties": false
            }
        },
        "additionalProperties": false
    })
});
