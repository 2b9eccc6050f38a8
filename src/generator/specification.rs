//! Specification emitter: `doc/openapi.yaml`.
//!
//! The document is assembled as a `serde_json::Value`, checked by
//! deserialising it into the [`oas3`] model, and written as YAML. With
//! `generate_swagger` off the emitter contributes nothing.

use serde_json::{json, Map, Value};
use tracing::debug;

use super::emitter::{EmittedFile, Emitter, EmitterKind, RenderUnit};
use crate::artifact::{SolType, StateMutability};
use crate::config::ProjectConfiguration;
use crate::error::{GenerationError, Result};
use crate::model::{ContractModel, HttpMethod, ParamModel, ProjectModel, OPENAPI_YAML};

/// OpenAPI version of the emitted document.
pub const OPENAPI_VERSION: &str = "3.1.0";

const ERROR_SCHEMA: &str = "Error";

#[derive(Debug, Clone, Copy, Default)]
pub struct SpecificationEmitter;

impl Emitter for SpecificationEmitter {
    fn kind(&self) -> EmitterKind {
        EmitterKind::Specification
    }

    fn render(
        &self,
        unit: RenderUnit<'_>,
        config: &ProjectConfiguration,
    ) -> Result<Vec<EmittedFile>> {
        let RenderUnit::Project(project) = unit else {
            return Ok(Vec::new());
        };
        if !config.generate_swagger {
            debug!("OpenAPI document disabled");
            return Ok(Vec::new());
        }
        let document = openapi_document(project, config)?;
        check_document(&document)?;
        let yaml = serde_yaml::to_string(&document)
            .map_err(|e| GenerationError::malformed(OPENAPI_YAML, e.to_string()))?;
        Ok(vec![EmittedFile::text(
            OPENAPI_YAML,
            yaml,
            EmitterKind::Specification,
        )])
    }
}

/// Build the OpenAPI document describing every route of `project`.
///
/// # Errors
///
/// Returns [`GenerationError::MalformedArtifact`] naming the document when two
/// operations share a path and method or two schemas share a name.
pub fn openapi_document(project: &ProjectModel, config: &ProjectConfiguration) -> Result<Value> {
    let mut paths = Map::new();
    let mut schemas = Map::new();
    schemas.insert(
        ERROR_SCHEMA.to_string(),
        json!({
            "type": "object",
            "required": ["error"],
            "properties": { "error": { "type": "string" } }
        }),
    );

    for contract in &project.contracts {
        add_contract(contract, project.address_length, &mut paths, &mut schemas)?;
    }

    let tags: Vec<Value> = project
        .contracts
        .iter()
        .map(|c| json!({ "name": c.name, "description": format!("{} contract", c.name) }))
        .collect();

    Ok(json!({
        "openapi": OPENAPI_VERSION,
        "info": {
            "title": config.project_name,
            "version": config.version,
            "description": format!(
                "HTTP API for the {} contract(s) of {}",
                project.contracts.len(),
                config.project_name
            ),
        },
        "tags": tags,
        "paths": paths,
        "components": { "schemas": schemas },
    }))
}

/// Component name of a contract-local type. Contract type names are
/// alphanumeric, so the separator keeps keys of different contracts apart.
fn schema_name(contract: &ContractModel, local: &str) -> String {
    format!("{}_{local}", contract.type_name)
}

fn add_contract(
    contract: &ContractModel,
    address_length: u32,
    paths: &mut Map<String, Value>,
    schemas: &mut Map<String, Value>,
) -> Result<()> {
    if let Some(deploy) = &contract.deploy {
        let request = schema_name(contract, &deploy.request_type);
        let response = schema_name(contract, &deploy.response_type);
        let mut body = object_schema(&deploy.inputs, address_length);
        if deploy.payable {
            add_wei_value(&mut body);
        }
        insert_schema(schemas, &request, body)?;
        insert_schema(
            schemas,
            &response,
            json!({
                "type": "object",
                "required": ["contractAddress", "transactionHash"],
                "properties": {
                    "contractAddress": address_schema(address_length),
                    "transactionHash": { "type": "string" },
                }
            }),
        )?;
        let operation = json!({
            "operationId": deploy.operation_id,
            "tags": [contract.name],
            "summary": format!("Deploy a new {} instance", contract.name),
            "requestBody": json_body(&request),
            "responses": responses(&response),
        });
        insert_operation(paths, &deploy.route_path, HttpMethod::Post, operation)?;
    }

    for method in &contract.methods {
        let request = schema_name(contract, &method.request_type);
        let response = schema_name(contract, &method.response_type);
        let response_schema = if method.is_read_only() {
            object_schema(&method.outputs, address_length)
        } else {
            json!({
                "type": "object",
                "required": ["transactionHash"],
                "properties": { "transactionHash": { "type": "string" } }
            })
        };
        insert_schema(schemas, &response, response_schema)?;

        let mut operation = json!({
            "operationId": method.operation_id,
            "tags": [contract.name],
            "summary": format!("{} ({})", method.signature, method.mutability),
            "x-solidity-signature": method.signature,
            "responses": responses(&response),
        });
        match method.http_method {
            HttpMethod::Get => {
                let parameters: Vec<Value> = method
                    .inputs
                    .iter()
                    .map(|p| {
                        json!({
                            "name": p.name,
                            "in": "query",
                            "required": true,
                            "schema": schema_for(&p.sol_type, address_length),
                        })
                    })
                    .collect();
                if !parameters.is_empty() {
                    operation["parameters"] = Value::Array(parameters);
                }
            }
            HttpMethod::Post => {
                let mut body = object_schema(&method.inputs, address_length);
                if method.mutability == StateMutability::Payable {
                    add_wei_value(&mut body);
                }
                insert_schema(schemas, &request, body)?;
                operation["requestBody"] = json_body(&request);
            }
        }
        insert_operation(paths, &method.route_path, method.http_method, operation)?;
    }

    for event in &contract.events {
        let mut schema = object_schema(&event.fields, address_length);
        schema["x-solidity-event"] = json!(event.name);
        insert_schema(schemas, &schema_name(contract, &event.type_name), schema)?;
    }
    Ok(())
}

fn insert_schema(schemas: &mut Map<String, Value>, name: &str, schema: Value) -> Result<()> {
    if schemas.contains_key(name) {
        return Err(GenerationError::malformed(
            OPENAPI_YAML,
            format!("schema '{name}' is defined twice"),
        ));
    }
    schemas.insert(name.to_string(), schema);
    Ok(())
}

fn insert_operation(
    paths: &mut Map<String, Value>,
    path: &str,
    method: HttpMethod,
    op: Value,
) -> Result<()> {
    let item = paths
        .entry(path.to_string())
        .or_insert_with(|| Value::Object(Map::new()));
    if !item[method.as_lower()].is_null() {
        return Err(GenerationError::malformed(
            OPENAPI_YAML,
            format!("operation {method} {path} is defined twice"),
        ));
    }
    item[method.as_lower()] = op;
    Ok(())
}

fn schema_ref(name: &str) -> Value {
    json!({ "$ref": format!("#/components/schemas/{name}") })
}

fn json_body(schema: &str) -> Value {
    json!({
        "required": true,
        "content": { "application/json": { "schema": schema_ref(schema) } }
    })
}

fn responses(success: &str) -> Value {
    let error = |description: &str| {
        json!({
            "description": description,
            "content": { "application/json": { "schema": schema_ref(ERROR_SCHEMA) } }
        })
    };
    json!({
        "200": {
            "description": "Success",
            "content": { "application/json": { "schema": schema_ref(success) } }
        },
        "400": error("Invalid request"),
        "404": error("No deployed instance configured"),
        "502": error("Contract backend error"),
    })
}

fn add_wei_value(schema: &mut Value) {
    schema["properties"]["weiValue"] = json!({
        "type": "string",
        "pattern": "^[0-9]+$",
        "description": "Wei sent with the transaction",
    });
}

fn object_schema(params: &[ParamModel], address_length: u32) -> Value {
    let mut properties = Map::new();
    for p in params {
        properties.insert(p.name.clone(), schema_for(&p.sol_type, address_length));
    }
    let required: Vec<&str> = params.iter().map(|p| p.name.as_str()).collect();
    json!({ "type": "object", "required": required, "properties": properties })
}

fn address_schema(address_length: u32) -> Value {
    json!({
        "type": "string",
        "format": "address",
        "pattern": format!("^0x[0-9a-fA-F]{{{}}}$", address_length * 2),
    })
}

/// JSON schema of a Solidity value as carried by the generated service.
pub fn schema_for(ty: &SolType, address_length: u32) -> Value {
    match ty {
        SolType::Address => address_schema(address_length),
        SolType::Bool => json!({ "type": "boolean" }),
        SolType::String => json!({ "type": "string" }),
        SolType::Bytes => json!({
            "type": "string",
            "format": "bytes",
            "pattern": "^0x([0-9a-fA-F]{2})*$",
        }),
        SolType::FixedBytes(n) => json!({
            "type": "string",
            "format": format!("bytes{n}"),
            "pattern": format!("^0x[0-9a-fA-F]{{{}}}$", u32::from(*n) * 2),
        }),
        SolType::Uint(bits) if *bits <= 64 => json!({
            "type": "integer",
            "format": format!("uint{bits}"),
            "minimum": 0,
        }),
        SolType::Int(bits) if *bits <= 64 => json!({
            "type": "integer",
            "format": format!("int{bits}"),
        }),
        SolType::Uint(bits) => json!({
            "type": "string",
            "format": format!("uint{bits}"),
            "pattern": "^[0-9]+$",
        }),
        SolType::Int(bits) => json!({
            "type": "string",
            "format": format!("int{bits}"),
            "pattern": "^-?[0-9]+$",
        }),
        SolType::Array(inner, len) => {
            let mut schema = json!({ "type": "array", "items": schema_for(inner, address_length) });
            if let Some(len) = len {
                schema["minItems"] = json!(len);
                schema["maxItems"] = json!(len);
            }
            schema
        }
        SolType::Tuple(components) => {
            let mut properties = Map::new();
            for (i, c) in components.iter().enumerate() {
                let name = if c.name.is_empty() {
                    format!("field{i}")
                } else {
                    c.name.clone()
                };
                properties.insert(name, schema_for(&c.ty, address_length));
            }
            json!({ "type": "object", "properties": properties })
        }
    }
}

/// Reject a document the OpenAPI model cannot represent.
fn check_document(document: &Value) -> Result<()> {
    serde_json::from_value::<oas3::OpenApiV3Spec>(document.clone())
        .map(|_| ())
        .map_err(|e| GenerationError::malformed(OPENAPI_YAML, format!("invalid OpenAPI document: {e}")))
}
