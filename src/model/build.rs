use std::collections::HashSet;

use tracing::{debug, info};

use super::layout::{
    contract_resource_path, contract_source_path, ProjectLayout, RESERVED_TOP_MODULES,
};
use super::types::{
    rust_type_for, ContractModel, DeployModel, EventModel, HttpMethod, MethodModel,
    PackageNamespace, ParamModel, ProjectModel,
};
use crate::artifact::{AbiParam, ArtifactManifest, ContractArtifact, StateMutability};
use crate::config::ProjectConfiguration;
use crate::error::{GenerationError, Result};
use crate::naming::{
    clean_route_path, module_ident, sanitize_field_name, to_camel_case, unique_name,
    unique_type_name, RUST_KEYWORDS,
};

/// Name of the generated deployment handler in every deployable contract.
const DEPLOY_HANDLER: &str = "deploy";

/// Wire and field name of the member every payable request carries.
const WEI_VALUE: (&str, &str) = ("weiValue", "wei_value");

/// Build the generation-ready model of every contract in `manifest`.
///
/// # Errors
///
/// Returns [`GenerationError::InvalidConfiguration`] when the project name is
/// empty, the package is not a valid namespace, the address length is missing
/// or zero, no contracts were supplied, or contracts disagree on the address
/// length.
pub fn build_project_model(
    manifest: &ArtifactManifest,
    config: &ProjectConfiguration,
) -> Result<ProjectModel> {
    if config.project_name.trim().is_empty() {
        return Err(GenerationError::invalid_config(
            "project_name",
            "a project name is required",
        ));
    }
    let address_length = validate_address_length(config.address_length)?;
    let package = parse_package(&config.package_name)?;
    if manifest.is_empty() {
        return Err(GenerationError::invalid_config(
            "contracts",
            "at least one contract is required",
        ));
    }

    // BTreeMap iteration keeps contracts sorted by name. A contract route
    // segment is only added when the run has more than one contract.
    let scoped = manifest.contracts.len() > 1;
    let mut route_segments = HashSet::new();
    let mut type_names = HashSet::new();
    let mut contracts = Vec::with_capacity(manifest.contracts.len());
    for artifact in manifest.contracts.values() {
        let name = &artifact.interface.name;
        let route_base = if scoped {
            let segment = unique_name(&mut route_segments, &clean_route_path(name));
            format!("/{}/{segment}", config.context_path)
        } else {
            format!("/{}", config.context_path)
        };
        let type_name = unique_type_name(&mut type_names, &contract_type_name(name));
        contracts.push(build_contract(
            artifact,
            &package,
            route_base,
            type_name,
            address_length,
        ));
    }

    if let Some(odd) = contracts.iter().find(|c| c.address_length != address_length) {
        return Err(GenerationError::invalid_config(
            "address_length",
            format!(
                "contract '{}' uses {} byte addresses but the run uses {}",
                odd.name, odd.address_length, address_length
            ),
        ));
    }

    let layout = ProjectLayout::new(&package, &contracts);
    info!(
        contracts = contracts.len(),
        package = %package.dotted(),
        address_length,
        "contract models built"
    );
    Ok(ProjectModel {
        package,
        address_length,
        contracts,
        layout,
    })
}

fn validate_address_length(value: Option<u32>) -> Result<u32> {
    match value {
        None => Err(GenerationError::invalid_config(
            "address_length",
            "an address length must be supplied",
        )),
        Some(0) => Err(GenerationError::invalid_config(
            "address_length",
            "the address length must be positive",
        )),
        Some(n) => Ok(n),
    }
}

/// Validate a dotted namespace: non-empty segments of `[a-z0-9_]`, none
/// starting with a digit or being a Rust keyword, and a first segment that
/// does not shadow a generated top-level module.
pub fn parse_package(dotted: &str) -> Result<PackageNamespace> {
    if dotted.is_empty() {
        return Err(GenerationError::invalid_config(
            "package_name",
            "the package name must not be empty",
        ));
    }
    let segments: Vec<String> = dotted.split('.').map(str::to_string).collect();
    for segment in &segments {
        let reason = if segment.is_empty() {
            Some("contains an empty segment".to_string())
        } else if segment.starts_with(|c: char| c.is_ascii_digit()) {
            Some(format!("segment '{segment}' starts with a digit"))
        } else if !segment
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
        {
            Some(format!("segment '{segment}' contains invalid characters"))
        } else if segment == "_" || RUST_KEYWORDS.contains(&segment.as_str()) {
            Some(format!("segment '{segment}' is a reserved word"))
        } else {
            None
        };
        if let Some(reason) = reason {
            return Err(GenerationError::invalid_config(
                "package_name",
                format!("'{dotted}' is not a valid namespace: {reason}"),
            ));
        }
    }
    if RESERVED_TOP_MODULES.contains(&segments[0].as_str()) {
        return Err(GenerationError::invalid_config(
            "package_name",
            format!(
                "'{dotted}' is not a valid namespace: '{}' clashes with a generated module",
                segments[0]
            ),
        ));
    }
    Ok(PackageNamespace { segments })
}

fn contract_type_name(name: &str) -> String {
    let type_name = to_camel_case(name);
    if type_name.starts_with(|c: char| c.is_ascii_alphabetic()) {
        type_name
    } else {
        format!("Contract{type_name}")
    }
}

/// Reserve `{base}Request` and `{base}Response` together and return the prefix.
fn unique_type_prefix(taken: &mut HashSet<String>, base: &str) -> String {
    let mut prefix = base.to_string();
    let mut counter = 1;
    while taken.contains(&format!("{prefix}Request")) || taken.contains(&format!("{prefix}Response"))
    {
        prefix = format!("{base}{counter}");
        counter += 1;
    }
    taken.insert(format!("{prefix}Request"));
    taken.insert(format!("{prefix}Response"));
    prefix
}

fn build_contract(
    artifact: &ContractArtifact,
    package: &PackageNamespace,
    route_base: String,
    type_name: String,
    address_length: u32,
) -> ContractModel {
    let interface = &artifact.interface;
    let name = interface.name.clone();
    let module_name = module_ident(&name, "contract");

    // Handlers, routes and generated types share one namespace per contract.
    let mut handler_names = HashSet::new();
    let mut route_segments = HashSet::new();
    let mut type_names = HashSet::new();
    let deploy = if artifact.binary.is_deployable() {
        handler_names.insert(DEPLOY_HANDLER.to_string());
        let prefix = unique_type_prefix(&mut type_names, "Deploy");
        let constructor = interface.constructor.as_ref();
        let payable = constructor.is_some_and(|c| c.mutability == StateMutability::Payable);
        let inputs = constructor.map(|c| c.inputs.as_slice()).unwrap_or_default();
        Some(DeployModel {
            handler_name: DEPLOY_HANDLER.to_string(),
            request_type: format!("{prefix}Request"),
            response_type: format!("{prefix}Response"),
            route_path: route_base.clone(),
            operation_id: format!("{type_name}_deploy"),
            payable,
            inputs: input_params(inputs, payable),
        })
    } else {
        debug!(contract = %name, "empty bytecode; no deployment route");
        None
    };

    let methods = interface
        .functions
        .iter()
        .map(|function| {
            let handler_name = unique_name(&mut handler_names, &module_ident(&function.name, "call"));
            let type_prefix = unique_type_prefix(&mut type_names, &to_camel_case(&handler_name));
            let segment = unique_name(&mut route_segments, &clean_route_path(&function.name));
            let payable = function.mutability == StateMutability::Payable;
            let inputs = input_params(&function.inputs, payable);
            let all_scalar = inputs.iter().all(|p| p.sol_type.is_scalar());
            let http_method = if function.mutability.is_read_only() && all_scalar {
                HttpMethod::Get
            } else {
                HttpMethod::Post
            };
            MethodModel {
                name: function.name.clone(),
                signature: function.signature(),
                request_type: format!("{type_prefix}Request"),
                response_type: format!("{type_prefix}Response"),
                route_path: format!("{route_base}/{segment}"),
                http_method,
                mutability: function.mutability,
                operation_id: format!("{type_name}_{}", function.name),
                inputs,
                outputs: output_params(&function.outputs),
                handler_name,
            }
        })
        .collect();

    let events = interface
        .events
        .iter()
        .map(|event| EventModel {
            name: event.name.clone(),
            type_name: unique_type_name(&mut type_names, &format!("{}Event", to_camel_case(&event.name))),
            anonymous: event.anonymous,
            fields: to_param_models(&event.inputs, &[], |i, _| format!("arg{i}")),
        })
        .collect();

    ContractModel {
        source_path: contract_source_path(package, &module_name),
        resource_path: contract_resource_path(&module_name),
        module_name,
        name,
        type_name,
        package: package.clone(),
        route_base,
        address_length,
        bytecode: artifact.binary.to_hex(),
        deploy,
        methods,
        events,
    }
}

fn input_params(params: &[AbiParam], payable: bool) -> Vec<ParamModel> {
    let reserved: &[(&str, &str)] = if payable { &[WEI_VALUE] } else { &[] };
    to_param_models(params, reserved, |i, _| format!("arg{i}"))
}

fn output_params(params: &[AbiParam]) -> Vec<ParamModel> {
    let single = params.len() == 1;
    to_param_models(params, &[], move |i, _| {
        if single {
            "result".to_string()
        } else {
            format!("output{i}")
        }
    })
}

/// `reserved` holds `(wire, field)` names already used by generated members.
fn to_param_models(
    params: &[AbiParam],
    reserved: &[(&str, &str)],
    unnamed: impl Fn(usize, &AbiParam) -> String,
) -> Vec<ParamModel> {
    let mut wire_names: HashSet<String> = reserved.iter().map(|(w, _)| w.to_string()).collect();
    let mut field_names: HashSet<String> = reserved.iter().map(|(_, f)| f.to_string()).collect();
    params
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let base = if p.name.is_empty() {
                unnamed(i, p)
            } else {
                p.name.clone()
            };
            let name = unique_name(&mut wire_names, &base);
            ParamModel {
                field_name: unique_name(&mut field_names, &sanitize_field_name(&name)),
                rust_type: rust_type_for(&p.ty),
                sol_type: p.ty.clone(),
                indexed: p.indexed,
                name,
            }
        })
        .collect()
}
