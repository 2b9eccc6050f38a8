use std::fmt;

use crate::config::ProjectConfiguration;
use crate::error::Result;
use crate::model::{ContractModel, ProjectModel};

use super::build_descriptor::BuildDescriptorEmitter;
use super::handler::HandlerEmitter;
use super::specification::SpecificationEmitter;

/// What an emitter is asked to render: a single contract or the whole project.
#[derive(Debug, Clone, Copy)]
pub enum RenderUnit<'a> {
    Contract(&'a ContractModel),
    Project(&'a ProjectModel),
}

/// One output file, relative to the project root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmittedFile {
    /// `/`-separated path relative to the output directory
    pub path: String,
    pub contents: Vec<u8>,
    /// Emitter that produced the file
    pub emitter: EmitterKind,
}

impl EmittedFile {
    pub fn text(path: impl Into<String>, contents: String, emitter: EmitterKind) -> Self {
        Self {
            path: path.into(),
            contents: contents.into_bytes(),
            emitter,
        }
    }
}

/// Renders model units into files.
///
/// Emitters are pure: they never touch the filesystem and share no mutable
/// state, so any number of them can run concurrently.
pub trait Emitter: Send + Sync {
    fn kind(&self) -> EmitterKind;

    /// Render one unit. Emitters return an empty list for units they do not
    /// handle.
    fn render(
        &self,
        unit: RenderUnit<'_>,
        config: &ProjectConfiguration,
    ) -> Result<Vec<EmittedFile>>;
}

/// The emitter variants a run can be configured with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EmitterKind {
    /// Handler sources, the service entry point and bytecode resources
    Handler,
    /// `Cargo.toml` and `config/config.yaml`
    BuildDescriptor,
    /// `doc/openapi.yaml`, when enabled
    Specification,
}

impl EmitterKind {
    /// Default emitter set of a run, in merge order.
    pub const ALL: [EmitterKind; 3] = [
        EmitterKind::Handler,
        EmitterKind::BuildDescriptor,
        EmitterKind::Specification,
    ];
}

impl fmt::Display for EmitterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmitterKind::Handler => write!(f, "handler"),
            EmitterKind::BuildDescriptor => write!(f, "build-descriptor"),
            EmitterKind::Specification => write!(f, "specification"),
        }
    }
}

impl Emitter for EmitterKind {
    fn kind(&self) -> EmitterKind {
        *self
    }

    fn render(
        &self,
        unit: RenderUnit<'_>,
        config: &ProjectConfiguration,
    ) -> Result<Vec<EmittedFile>> {
        match self {
            EmitterKind::Handler => HandlerEmitter.render(unit, config),
            EmitterKind::BuildDescriptor => BuildDescriptorEmitter.render(unit, config),
            EmitterKind::Specification => SpecificationEmitter.render(unit, config),
        }
    }
}
