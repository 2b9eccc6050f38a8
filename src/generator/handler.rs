//! Handler emitter: the Rust sources of the generated service.
//!
//! Per contract it renders the handler module and the bytecode resource; per
//! project the entry point, the route table, the shared `address`/`error`/
//! `state` modules and the `mod.rs` chain down to the contracts module.

use tracing::debug;

use super::emitter::{EmittedFile, Emitter, EmitterKind, RenderUnit};
use super::templates::{
    render, rust_str, AddressRsTemplate, ContractRsTemplate, ErrorRsTemplate, MainRsTemplate,
    ModRsTemplate, RouteView, RoutesRsTemplate, StateRsTemplate,
};
use crate::config::ProjectConfiguration;
use crate::error::Result;
use crate::model::{
    ContractModel, HttpMethod, ProjectModel, ADDRESS_RS, CONTRACTS_MODULE, ERROR_RS, MAIN_RS,
    OPENAPI_YAML, ROUTES_RS, STATE_RS,
};

#[derive(Debug, Clone, Copy, Default)]
pub struct HandlerEmitter;

impl Emitter for HandlerEmitter {
    fn kind(&self) -> EmitterKind {
        EmitterKind::Handler
    }

    fn render(
        &self,
        unit: RenderUnit<'_>,
        config: &ProjectConfiguration,
    ) -> Result<Vec<EmittedFile>> {
        match unit {
            RenderUnit::Contract(contract) => render_contract(contract),
            RenderUnit::Project(project) => render_project(project, config),
        }
    }
}

fn render_contract(contract: &ContractModel) -> Result<Vec<EmittedFile>> {
    let source = render(&ContractRsTemplate::from(contract), "contract.rs.txt")?;
    debug!(contract = %contract.name, path = %contract.source_path, "rendered handler module");
    Ok(vec![
        EmittedFile::text(&contract.source_path, source, EmitterKind::Handler),
        EmittedFile::text(
            &contract.resource_path,
            format!("{}\n", contract.bytecode),
            EmitterKind::Handler,
        ),
    ])
}

/// Every route of the project, deploy routes first within a contract.
pub(crate) fn route_views(project: &ProjectModel) -> Vec<RouteView> {
    let mut routes = Vec::new();
    for contract in &project.contracts {
        let module = format!("{CONTRACTS_MODULE}::{}", contract.module_name);
        if let Some(deploy) = &contract.deploy {
            routes.push(RouteView {
                method: HttpMethod::Post.as_lower(),
                path_lit: rust_str(&deploy.route_path),
                handler_path: format!("{module}::{}", deploy.handler_name),
                display: format!("{} {}", HttpMethod::Post, deploy.route_path),
            });
        }
        for method in &contract.methods {
            routes.push(RouteView {
                method: method.http_method.as_lower(),
                path_lit: rust_str(&method.route_path),
                handler_path: format!("{module}::{}", method.handler_name),
                display: format!("{} {}", method.http_method, method.route_path),
            });
        }
    }
    routes
}

fn render_project(
    project: &ProjectModel,
    config: &ProjectConfiguration,
) -> Result<Vec<EmittedFile>> {
    let routes = route_views(project);
    let root_module = project
        .package
        .segments
        .first()
        .cloned()
        .unwrap_or_else(|| CONTRACTS_MODULE.to_string());

    let mut files = vec![
        EmittedFile::text(
            MAIN_RS,
            render(
                &MainRsTemplate {
                    project_name: config.project_name.clone(),
                    root_module,
                    route_count: routes.len(),
                },
                "main.rs.txt",
            )?,
            EmitterKind::Handler,
        ),
        EmittedFile::text(
            ROUTES_RS,
            render(
                &RoutesRsTemplate {
                    contracts_path: format!(
                        "crate::{}::{CONTRACTS_MODULE}",
                        project.package.module_path()
                    ),
                    routes,
                    openapi_route_lit: config
                        .generate_swagger
                        .then(|| rust_str(&format!("/{}/{OPENAPI_YAML}", config.context_path))),
                },
                "routes.rs.txt",
            )?,
            EmitterKind::Handler,
        ),
        EmittedFile::text(
            ADDRESS_RS,
            render(
                &AddressRsTemplate {
                    address_length: project.address_length,
                },
                "address.rs.txt",
            )?,
            EmitterKind::Handler,
        ),
        EmittedFile::text(ERROR_RS, render(&ErrorRsTemplate, "error.rs.txt")?, EmitterKind::Handler),
        EmittedFile::text(STATE_RS, render(&StateRsTemplate, "state.rs.txt")?, EmitterKind::Handler),
    ];

    for module_file in &project.layout.module_files {
        let contents = render(
            &ModRsTemplate {
                modules: module_file.modules.clone(),
            },
            "mod.rs.txt",
        )?;
        files.push(EmittedFile::text(&module_file.path, contents, EmitterKind::Handler));
    }
    debug!(files = files.len(), "rendered project sources");
    Ok(files)
}
