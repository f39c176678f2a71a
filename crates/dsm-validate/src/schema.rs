//! The fixed structural schema for module documents.
//!
//! The schema is not user-editable; it describes the persisted document
//! shape and is the single place where structural requirements (required
//! fields, confidence bounds) live.

use serde_json::{Value, json};

/// Build the draft-07 schema for a whole module document.
pub fn document_schema() -> Value {
    json!({
        "$schema": "http://json-schema.org/draft-07/schema#",
        "type": "object",
        "required": ["id", "name", "enabled", "categories", "purposes"],
        "properties": {
            "id": {"type": "string", "minLength": 1},
            "name": {"type": "string", "minLength": 1},
            "version": {"type": "string"},
            "description": {"type": "string"},
            "enabled": {"type": "boolean"},
            "categories": {"$ref": "#/definitions/hierarchyNodes"},
            "purposes": {"$ref": "#/definitions/hierarchyNodes"},
            "policies": {
                "type": "array",
                "items": {
                    "type": "object",
                    "required": ["id", "name"],
                    "properties": {
                        "id": {"type": "string", "minLength": 1},
                        "name": {"type": "string", "minLength": 1},
                        "control_authority": {"type": "string"},
                        "control_id": {"type": "string"}
                    }
                }
            },
            "rules": {
                "type": "object",
                "properties": {
                    "bindings": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "required": ["id"],
                            "properties": {
                                "id": {"type": "string", "minLength": 1},
                                "category": {"type": "string"},
                                "purpose": {"type": "string"},
                                "basis": {"$ref": "#/definitions/coding"},
                                "labels": {
                                    "type": "array",
                                    "items": {"$ref": "#/definitions/coding"}
                                },
                                "codeSets": {
                                    "type": "array",
                                    "items": {
                                        "type": "object",
                                        "properties": {
                                            "groupID": {"type": "string"},
                                            "codes": {
                                                "type": "array",
                                                "items": {
                                                    "type": "object",
                                                    "properties": {
                                                        "system": {"type": "string"},
                                                        "code": {"type": "string"},
                                                        "confidence": {
                                                            "type": "number",
                                                            "minimum": 0,
                                                            "maximum": 1
                                                        }
                                                    }
                                                }
                                            }
                                        }
                                    }
                                },
                                "policies": {
                                    "type": "array",
                                    "items": {"type": "object"}
                                }
                            }
                        }
                    }
                }
            },
            "settings": {
                "type": "object",
                "properties": {
                    "editable": {"type": "boolean"}
                }
            }
        },
        "definitions": {
            "hierarchyNodes": {
                "type": "array",
                "items": {
                    "type": "object",
                    "required": ["act_code", "name"],
                    "properties": {
                        "act_code": {"type": "string", "minLength": 1},
                        "name": {"type": "string", "minLength": 1},
                        "system": {"type": "string"},
                        "description": {"type": "string"},
                        "enabled": {"type": "boolean"},
                        "parentCode": {"type": "string"}
                    }
                }
            },
            "coding": {
                "type": "object",
                "properties": {
                    "system": {"type": "string"},
                    "code": {"type": "string"},
                    "display": {"type": "string"}
                }
            }
        }
    })
}
