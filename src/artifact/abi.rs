//! Solidity ABI parsing.
//!
//! An ABI document is first checked structurally against [`abi_json_schema`]
//! and then deserialised into typed entries. Any problem is reported as a
//! [`GenerationError::MalformedArtifact`] naming the contract.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use serde_json::{json, Value};

use super::types::{
    AbiConstructor, AbiEvent, AbiFunction, AbiParam, InterfaceDescription, SolType,
    StateMutability,
};
use crate::error::{GenerationError, Result};

static ARRAY_SUFFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<inner>.+)\[(?P<len>\d*)\]$").expect("array suffix regex should be valid")
});
static INTEGER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<sign>u?)int(?P<bits>\d*)$").expect("integer type regex should be valid")
});
static FIXED_BYTES: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^bytes(?P<len>\d+)$").expect("fixed bytes regex should be valid")
});

/// Compiled once; every ABI document is checked against the same schema.
static ABI_VALIDATOR: Lazy<jsonschema::Validator> = Lazy::new(|| {
    jsonschema::validator_for(&abi_json_schema()).expect("ABI JSON schema should compile")
});

/// JSON Schema every ABI document must satisfy before typed parsing.
pub fn abi_json_schema() -> Value {
    json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "type": "array",
        "items": {
            "type": "object",
            "properties": {
                "type": {
                    "enum": ["function", "constructor", "event", "fallback", "receive", "error"]
                },
                "name": { "type": ["string", "null"] },
                "inputs": { "type": "array", "items": { "$ref": "#/$defs/param" } },
                "outputs": { "type": "array", "items": { "$ref": "#/$defs/param" } },
                "stateMutability": { "enum": ["pure", "view", "nonpayable", "payable"] },
                "constant": { "type": "boolean" },
                "payable": { "type": "boolean" },
                "anonymous": { "type": "boolean" }
            }
        },
        "$defs": {
            "param": {
                "type": "object",
                "required": ["type"],
                "properties": {
                    "name": { "type": ["string", "null"] },
                    "type": { "type": "string", "minLength": 1 },
                    "indexed": { "type": "boolean" },
                    "components": { "type": "array", "items": { "$ref": "#/$defs/param" } }
                }
            }
        }
    })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEntry {
    #[serde(rename = "type", default = "default_entry_type")]
    kind: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    inputs: Vec<RawParam>,
    #[serde(default)]
    outputs: Vec<RawParam>,
    #[serde(default)]
    state_mutability: Option<String>,
    #[serde(default)]
    constant: Option<bool>,
    #[serde(default)]
    payable: Option<bool>,
    #[serde(default)]
    anonymous: bool,
}

#[derive(Debug, Deserialize)]
struct RawParam {
    #[serde(default)]
    name: Option<String>,
    #[serde(rename = "type")]
    ty: String,
    #[serde(default)]
    components: Vec<RawParam>,
    #[serde(default)]
    indexed: bool,
}

fn default_entry_type() -> String {
    "function".to_string()
}

/// Parse an ABI document (a bare array or a compiler artifact with an `abi`
/// field) into an [`InterfaceDescription`] named `name`.
pub fn parse_abi(name: &str, bytes: &[u8]) -> Result<InterfaceDescription> {
    let document: Value = serde_json::from_slice(bytes)
        .map_err(|e| GenerationError::malformed(name, format!("invalid JSON: {e}")))?;

    let abi = match document {
        Value::Object(mut obj) => obj.remove("abi").ok_or_else(|| {
            GenerationError::malformed(name, "expected an ABI array or an object with an 'abi' field")
        })?,
        other => other,
    };

    validate_structure(name, &abi)?;

    let entries: Vec<RawEntry> = serde_json::from_value(abi)
        .map_err(|e| GenerationError::malformed(name, format!("unexpected ABI shape: {e}")))?;

    let mut functions = Vec::new();
    let mut seen = HashSet::new();
    let mut constructor = None;
    let mut events = Vec::new();

    for entry in entries {
        match entry.kind.as_str() {
            "function" => {
                let fn_name = entry
                    .name
                    .clone()
                    .filter(|n| !n.is_empty())
                    .ok_or_else(|| GenerationError::malformed(name, "function entry without a name"))?;
                if !seen.insert(fn_name.clone()) {
                    return Err(GenerationError::malformed(
                        name,
                        format!("function '{fn_name}' is declared more than once (overloads are not supported)"),
                    ));
                }
                let mutability = mutability_of(&entry);
                functions.push(AbiFunction {
                    inputs: convert_params(name, &fn_name, &entry.inputs)?,
                    outputs: convert_params(name, &fn_name, &entry.outputs)?,
                    name: fn_name,
                    mutability,
                });
            }
            "constructor" => {
                if constructor.is_some() {
                    return Err(GenerationError::malformed(name, "more than one constructor declared"));
                }
                constructor = Some(AbiConstructor {
                    inputs: convert_params(name, "constructor", &entry.inputs)?,
                    mutability: mutability_of(&entry),
                });
            }
            "event" => {
                let ev_name = entry
                    .name
                    .clone()
                    .filter(|n| !n.is_empty())
                    .ok_or_else(|| GenerationError::malformed(name, "event entry without a name"))?;
                events.push(AbiEvent {
                    inputs: convert_params(name, &ev_name, &entry.inputs)?,
                    name: ev_name,
                    anonymous: entry.anonymous,
                });
            }
            other => {
                tracing::debug!(contract = name, entry = other, "skipping ABI entry");
            }
        }
    }

    Ok(InterfaceDescription {
        name: name.to_string(),
        functions,
        constructor,
        events,
    })
}

fn validate_structure(name: &str, abi: &Value) -> Result<()> {
    let problems: Vec<String> = ABI_VALIDATOR
        .iter_errors(abi)
        .take(3)
        .map(|e| e.to_string())
        .collect();
    if problems.is_empty() {
        Ok(())
    } else {
        Err(GenerationError::malformed(name, problems.join("; ")))
    }
}

fn mutability_of(entry: &RawEntry) -> StateMutability {
    match entry.state_mutability.as_deref() {
        Some("pure") => StateMutability::Pure,
        Some("view") => StateMutability::View,
        Some("payable") => StateMutability::Payable,
        Some(_) => StateMutability::NonPayable,
        None if entry.constant == Some(true) => StateMutability::View,
        None if entry.payable == Some(true) => StateMutability::Payable,
        None => StateMutability::NonPayable,
    }
}

fn convert_params(contract: &str, owner: &str, raw: &[RawParam]) -> Result<Vec<AbiParam>> {
    raw.iter()
        .map(|p| {
            let ty = parse_sol_type(&p.ty, &p.components).map_err(|reason| {
                GenerationError::malformed(contract, format!("{owner}: {reason}"))
            })?;
            Ok(AbiParam {
                name: p.name.clone().unwrap_or_default(),
                ty,
                indexed: p.indexed,
            })
        })
        .collect()
}

fn parse_sol_type(ty: &str, components: &[RawParam]) -> std::result::Result<SolType, String> {
    let ty = ty.trim();
    if let Some(caps) = ARRAY_SUFFIX.captures(ty) {
        let inner = parse_sol_type(&caps["inner"], components)?;
        let len = match &caps["len"] {
            "" => None,
            digits => Some(
                digits
                    .parse::<usize>()
                    .map_err(|_| format!("invalid array length in '{ty}'"))?,
            ),
        };
        if len == Some(0) {
            return Err(format!("zero-length array type '{ty}'"));
        }
        return Ok(SolType::Array(Box::new(inner), len));
    }

    match ty {
        "address" => return Ok(SolType::Address),
        "bool" => return Ok(SolType::Bool),
        "string" => return Ok(SolType::String),
        "bytes" => return Ok(SolType::Bytes),
        "function" => return Ok(SolType::FixedBytes(24)),
        "tuple" => {
            let mut fields = Vec::with_capacity(components.len());
            for c in components {
                fields.push(AbiParam {
                    name: c.name.clone().unwrap_or_default(),
                    ty: parse_sol_type(&c.ty, &c.components)?,
                    indexed: false,
                });
            }
            return Ok(SolType::Tuple(fields));
        }
        _ => {}
    }

    if let Some(caps) = INTEGER.captures(ty) {
        let bits = match &caps["bits"] {
            "" => 256,
            digits => digits.parse::<u16>().map_err(|_| format!("invalid integer width in '{ty}'"))?,
        };
        if bits == 0 || bits > 256 || bits % 8 != 0 {
            return Err(format!("invalid integer width in '{ty}'"));
        }
        return Ok(if &caps["sign"] == "u" {
            SolType::Uint(bits)
        } else {
            SolType::Int(bits)
        });
    }

    if let Some(caps) = FIXED_BYTES.captures(ty) {
        let len = caps["len"]
            .parse::<u16>()
            .map_err(|_| format!("invalid byte width in '{ty}'"))?;
        if len == 0 || len > 32 {
            return Err(format!("invalid byte width in '{ty}'"));
        }
        return Ok(SolType::FixedBytes(len));
    }

    Err(format!("unsupported ABI type '{ty}'"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(ty: &str) -> std::result::Result<SolType, String> {
        parse_sol_type(ty, &[])
    }

    #[test]
    fn test_parse_elementary_types() {
        assert_eq!(parse("address").unwrap(), SolType::Address);
        assert_eq!(parse("uint").unwrap(), SolType::Uint(256));
        assert_eq!(parse("int8").unwrap(), SolType::Int(8));
        assert_eq!(parse("bytes32").unwrap(), SolType::FixedBytes(32));
        assert_eq!(parse("function").unwrap(), SolType::FixedBytes(24));
    }

    #[test]
    fn test_parse_nested_arrays() {
        let ty = parse("uint256[2][]").unwrap();
        assert_eq!(
            ty,
            SolType::Array(
                Box::new(SolType::Array(Box::new(SolType::Uint(256)), Some(2))),
                None
            )
        );
        assert_eq!(ty.to_string(), "uint256[2][]");
    }

    #[test]
    fn test_rejects_unsupported_types() {
        assert!(parse("fixed128x18").is_err());
        assert!(parse("uint7").is_err());
        assert!(parse("uint512").is_err());
        assert!(parse("bytes33").is_err());
        assert!(parse("address[0]").is_err());
    }

    #[test]
    fn test_type_patterns_and_validator_compile() {
        assert!(ARRAY_SUFFIX.is_match("address[3]"));
        assert!(INTEGER.is_match("uint256"));
        assert!(FIXED_BYTES.is_match("bytes4"));
        assert!(ABI_VALIDATOR.is_valid(&json!([{ "type": "function", "name": "f" }])));
        assert!(!ABI_VALIDATOR.is_valid(&json!([{ "type": "method" }])));
        assert!(parse_abi("A", b"[]").is_ok());
        assert!(parse_abi("B", b"[]").is_ok());
    }

    #[test]
    fn test_legacy_constant_flag_maps_to_view() {
        let abi = br#"[{"type":"function","name":"total","constant":true,"inputs":[],"outputs":[{"name":"","type":"uint256"}]}]"#;
        let desc = parse_abi("Legacy", abi).unwrap();
        assert_eq!(desc.functions[0].mutability, StateMutability::View);
    }

    #[test]
    fn test_accepts_compiler_artifact_object() {
        let abi = br#"{"contractName":"Counter","abi":[{"type":"function","name":"inc","stateMutability":"nonpayable","inputs":[],"outputs":[]}]}"#;
        let desc = parse_abi("Counter", abi).unwrap();
        assert_eq!(desc.functions.len(), 1);
        assert_eq!(desc.functions[0].signature(), "inc()");
    }

    #[test]
    fn test_overloads_are_malformed() {
        let abi = br#"[
            {"type":"function","name":"mint","inputs":[],"outputs":[],"stateMutability":"nonpayable"},
            {"type":"function","name":"mint","inputs":[{"name":"to","type":"address"}],"outputs":[],"stateMutability":"nonpayable"}
        ]"#;
        let err = parse_abi("Token", abi).unwrap_err();
        assert!(matches!(err, GenerationError::MalformedArtifact { .. }));
        assert!(err.to_string().contains("mint"));
    }

    #[test]
    fn test_schema_rejects_unknown_entry_type() {
        let abi = br#"[{"type":"method","name":"x"}]"#;
        let err = parse_abi("Bad", abi).unwrap_err();
        assert!(matches!(err, GenerationError::MalformedArtifact { ref artifact, .. } if artifact == "Bad"));
    }

    #[test]
    fn test_tuple_components() {
        let abi = br#"[{"type":"function","name":"get","stateMutability":"view","inputs":[],
            "outputs":[{"name":"pos","type":"tuple","components":[{"name":"x","type":"int256"},{"name":"y","type":"int256"}]}]}]"#;
        let desc = parse_abi("Geo", abi).unwrap();
        match &desc.functions[0].outputs[0].ty {
            SolType::Tuple(fields) => {
                assert_eq!(fields.len(), 2);
                assert_eq!(fields[1].name, "y");
            }
            other => panic!("expected tuple, got {other:?}"),
        }
    }
}
