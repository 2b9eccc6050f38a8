use askama::Template;

use crate::artifact::StateMutability;
use crate::error::{GenerationError, Result};
use crate::model::{ContractModel, DeployModel, EventModel, HttpMethod, MethodModel, ParamModel};

/// Rust string literal for `s`.
pub(crate) fn rust_str(s: &str) -> String {
    format!("{s:?}")
}

/// Render a template, naming it in the error on failure.
pub(crate) fn render<T: Template>(template: &T, name: &'static str) -> Result<String> {
    template.render().map_err(|source| GenerationError::Template {
        template: name,
        source,
    })
}

/// A struct field in a generated request, response or event type
#[derive(Debug, Clone)]
pub struct FieldView {
    /// Wire name as a Rust string literal
    pub wire_lit: String,
    /// Rust identifier
    pub ident: String,
    /// Rust type
    pub ty: String,
    /// Solidity type, for doc comments
    pub sol_type: String,
    pub indexed: bool,
}

impl From<&ParamModel> for FieldView {
    fn from(p: &ParamModel) -> Self {
        Self {
            wire_lit: rust_str(&p.name),
            ident: p.field_name.clone(),
            ty: p.rust_type.clone(),
            sol_type: p.sol_type.to_string(),
            indexed: p.indexed,
        }
    }
}

/// Handler shape shared by function calls and deployment
#[derive(Debug, Clone)]
pub struct HandlerView {
    pub handler_name: String,
    pub request_type: String,
    pub response_type: String,
    /// Signature as a Rust string literal
    pub signature_lit: String,
    /// Human signature for the doc comment
    pub doc: String,
    /// `Query` for GET routes, `Json` otherwise
    pub extractor: &'static str,
    pub read_only: bool,
    pub payable: bool,
    pub inputs: Vec<FieldView>,
    pub outputs: Vec<FieldView>,
}

impl From<&MethodModel> for HandlerView {
    fn from(m: &MethodModel) -> Self {
        Self {
            handler_name: m.handler_name.clone(),
            request_type: m.request_type.clone(),
            response_type: m.response_type.clone(),
            signature_lit: rust_str(&m.signature),
            doc: format!("`{} {}` calls `{}` ({})", m.http_method, m.route_path, m.signature, m.mutability),
            extractor: match m.http_method {
                HttpMethod::Get => "Query",
                HttpMethod::Post => "Json",
            },
            read_only: m.is_read_only(),
            payable: m.mutability == StateMutability::Payable,
            inputs: m.inputs.iter().map(FieldView::from).collect(),
            outputs: m.outputs.iter().map(FieldView::from).collect(),
        }
    }
}

impl From<&DeployModel> for HandlerView {
    fn from(d: &DeployModel) -> Self {
        Self {
            handler_name: d.handler_name.clone(),
            request_type: d.request_type.clone(),
            response_type: d.response_type.clone(),
            signature_lit: rust_str("constructor"),
            doc: format!("`POST {}` deploys a new instance", d.route_path),
            extractor: "Json",
            read_only: false,
            payable: d.payable,
            inputs: d.inputs.iter().map(FieldView::from).collect(),
            outputs: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct EventView {
    pub type_name: String,
    pub name: String,
    pub anonymous: bool,
    pub fields: Vec<FieldView>,
}

impl From<&EventModel> for EventView {
    fn from(e: &EventModel) -> Self {
        Self {
            type_name: e.type_name.clone(),
            name: e.name.clone(),
            anonymous: e.anonymous,
            fields: e.fields.iter().map(FieldView::from).collect(),
        }
    }
}

/// Route registration line in `routes.rs`
#[derive(Debug, Clone)]
pub struct RouteView {
    /// `get` / `post`
    pub method: &'static str,
    /// Path as a Rust string literal
    pub path_lit: String,
    /// `contracts::token::balance_of`
    pub handler_path: String,
    /// `GET /Token/balanceOf`, for the route table
    pub display: String,
}

/// Template data for a per-contract handler module
#[derive(Template)]
#[template(path = "contract.rs.txt", escape = "none")]
pub struct ContractRsTemplate {
    pub contract_name: String,
    pub contract_lit: String,
    pub resource_path: String,
    pub deploy: Option<HandlerView>,
    pub handlers: Vec<HandlerView>,
    pub events: Vec<EventView>,
}

impl From<&ContractModel> for ContractRsTemplate {
    fn from(c: &ContractModel) -> Self {
        Self {
            contract_name: c.name.clone(),
            contract_lit: rust_str(&c.name),
            resource_path: c.resource_path.clone(),
            deploy: c.deploy.as_ref().map(HandlerView::from),
            handlers: c.methods.iter().map(HandlerView::from).collect(),
            events: c.events.iter().map(EventView::from).collect(),
        }
    }
}

/// Template data for generating main.rs entry point
#[derive(Template)]
#[template(path = "main.rs.txt", escape = "none")]
pub struct MainRsTemplate {
    pub project_name: String,
    /// First package segment, declared as a top-level module
    pub root_module: String,
    pub route_count: usize,
}

/// Template data for generating routes.rs
#[derive(Template)]
#[template(path = "routes.rs.txt", escape = "none")]
pub struct RoutesRsTemplate {
    /// `crate::com::example::token::contracts`
    pub contracts_path: String,
    pub routes: Vec<RouteView>,
    /// OpenAPI document route, when the document is generated
    pub openapi_route_lit: Option<String>,
}

#[derive(Template)]
#[template(path = "address.rs.txt", escape = "none")]
pub struct AddressRsTemplate {
    pub address_length: u32,
}

#[derive(Template)]
#[template(path = "error.rs.txt", escape = "none")]
pub struct ErrorRsTemplate;

#[derive(Template)]
#[template(path = "state.rs.txt", escape = "none")]
pub struct StateRsTemplate;

/// Template data for generating mod.rs module declarations
#[derive(Template)]
#[template(path = "mod.rs.txt", escape = "none")]
pub struct ModRsTemplate {
    pub modules: Vec<String>,
}

/// Template data for generating Cargo.toml
#[derive(Template)]
#[template(path = "Cargo.toml.txt", escape = "none")]
pub struct CargoTomlTemplate {
    pub crate_name_lit: String,
    pub version_lit: String,
    pub description_lit: String,
    /// `(name, inline spec)` pairs, sorted by name
    pub dependencies: Vec<(String, String)>,
    pub package_lit: String,
    pub context_path_lit: String,
    pub address_length: u32,
    pub sources: Vec<String>,
    pub resources: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rust_str_escapes_quotes() {
        assert_eq!(rust_str("a\"b"), r#""a\"b""#);
        assert_eq!(rust_str("Token"), "\"Token\"");
    }

    #[test]
    fn test_mod_rs_lists_modules() {
        let out = render(
            &ModRsTemplate {
                modules: vec!["erc20".to_string(), "token".to_string()],
            },
            "mod.rs.txt",
        )
        .unwrap();
        assert!(out.contains("pub mod erc20;"));
        assert!(out.contains("pub mod token;"));
    }
}
