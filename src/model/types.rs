use std::fmt;

use crate::artifact::{SolType, StateMutability};

use super::layout::ProjectLayout;

/// HTTP verb a generated route is served with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    /// Lowercase name, as used by axum routing helpers and OpenAPI path items.
    pub fn as_lower(self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Post => "post",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HttpMethod::Get => write!(f, "GET"),
            HttpMethod::Post => write!(f, "POST"),
        }
    }
}

/// Dotted package namespace, e.g. `com.example.token`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageNamespace {
    pub segments: Vec<String>,
}

impl PackageNamespace {
    pub fn dotted(&self) -> String {
        self.segments.join(".")
    }

    /// Rust module path, e.g. `com::example::token`.
    pub fn module_path(&self) -> String {
        self.segments.join("::")
    }

    /// Source directory, e.g. `src/com/example/token`.
    pub fn source_dir(&self) -> String {
        format!("src/{}", self.segments.join("/"))
    }
}

/// A parameter, return value or event field ready for code generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamModel {
    /// Wire name (JSON key / query parameter), never empty
    pub name: String,
    /// Rust field identifier
    pub field_name: String,
    pub sol_type: SolType,
    /// Rust type used in generated structs
    pub rust_type: String,
    /// Event parameters only
    pub indexed: bool,
}

/// A contract function exposed as one route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodModel {
    /// ABI function name
    pub name: String,
    /// `name(type,...)`
    pub signature: String,
    /// Generated handler function (snake_case, unique per contract)
    pub handler_name: String,
    pub request_type: String,
    pub response_type: String,
    /// Full route, prefixed by the context path
    pub route_path: String,
    pub http_method: HttpMethod,
    pub mutability: StateMutability,
    /// Unique across the whole project
    pub operation_id: String,
    pub inputs: Vec<ParamModel>,
    pub outputs: Vec<ParamModel>,
}

impl MethodModel {
    pub fn is_read_only(&self) -> bool {
        self.mutability.is_read_only()
    }
}

/// Deployment route of a contract with non-empty bytecode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployModel {
    pub handler_name: String,
    pub request_type: String,
    pub response_type: String,
    pub route_path: String,
    pub operation_id: String,
    pub payable: bool,
    pub inputs: Vec<ParamModel>,
}

/// Contract event, rendered as a typed struct and an OpenAPI component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventModel {
    pub name: String,
    pub type_name: String,
    pub anonymous: bool,
    pub fields: Vec<ParamModel>,
}

/// Generation-ready view of one contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractModel {
    /// Contract name as supplied (file stem)
    pub name: String,
    /// CamelCase name used as a type / tag prefix
    pub type_name: String,
    /// snake_case module name of the handler source
    pub module_name: String,
    pub package: PackageNamespace,
    /// Relative path of the generated handler source
    pub source_path: String,
    /// Relative path of the bytecode resource
    pub resource_path: String,
    /// `/{context}`, or `/{context}/{Contract}` when the run has several contracts
    pub route_base: String,
    /// Byte width of addresses, identical across the run
    pub address_length: u32,
    /// `0x`-prefixed hex bytecode
    pub bytecode: String,
    pub deploy: Option<DeployModel>,
    pub methods: Vec<MethodModel>,
    pub events: Vec<EventModel>,
}

/// Every contract of a run plus the project-wide layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectModel {
    pub package: PackageNamespace,
    pub address_length: u32,
    /// Sorted by contract name
    pub contracts: Vec<ContractModel>,
    pub layout: ProjectLayout,
}

/// Rust type used for a Solidity type in generated code.
///
/// Integers up to 64 bits map to native integers; wider ones travel as
/// decimal strings. Byte strings travel as `0x` hex.
pub fn rust_type_for(ty: &SolType) -> String {
    match ty {
        SolType::Address => "Address".to_string(),
        SolType::Bool => "bool".to_string(),
        SolType::String | SolType::Bytes | SolType::FixedBytes(_) => "String".to_string(),
        SolType::Uint(bits) => native_int("u", *bits),
        SolType::Int(bits) => native_int("i", *bits),
        SolType::Array(inner, _) => format!("Vec<{}>", rust_type_for(inner)),
        SolType::Tuple(_) => "serde_json::Value".to_string(),
    }
}

fn native_int(prefix: &str, bits: u16) -> String {
    match bits {
        0..=8 => format!("{prefix}8"),
        9..=16 => format!("{prefix}16"),
        17..=32 => format!("{prefix}32"),
        33..=64 => format!("{prefix}64"),
        _ => "String".to_string(),
    }
}
