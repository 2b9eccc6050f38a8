use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// Solidity ABI type of a parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolType {
    Address,
    Bool,
    String,
    /// Dynamic `bytes`
    Bytes,
    /// `bytesN`, N in 1..=32
    FixedBytes(u16),
    /// `uintN`, N in 8..=256
    Uint(u16),
    /// `intN`, N in 8..=256
    Int(u16),
    /// `T[]` (None) or `T[N]` (Some(N))
    Array(Box<SolType>, Option<usize>),
    /// `tuple` with named components
    Tuple(Vec<AbiParam>),
}

impl SolType {
    /// Whether a value of this type fits in a single query-string parameter.
    pub fn is_scalar(&self) -> bool {
        !matches!(self, SolType::Array(..) | SolType::Tuple(_))
    }
}

impl fmt::Display for SolType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolType::Address => write!(f, "address"),
            SolType::Bool => write!(f, "bool"),
            SolType::String => write!(f, "string"),
            SolType::Bytes => write!(f, "bytes"),
            SolType::FixedBytes(n) => write!(f, "bytes{n}"),
            SolType::Uint(n) => write!(f, "uint{n}"),
            SolType::Int(n) => write!(f, "int{n}"),
            SolType::Array(inner, None) => write!(f, "{inner}[]"),
            SolType::Array(inner, Some(len)) => write!(f, "{inner}[{len}]"),
            SolType::Tuple(components) => {
                write!(f, "(")?;
                for (i, c) in components.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}", c.ty)?;
                }
                write!(f, ")")
            }
        }
    }
}

/// A single function, constructor or event parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbiParam {
    /// Declared name; empty when the ABI leaves it unnamed
    pub name: String,
    pub ty: SolType,
    /// Only meaningful for event parameters
    pub indexed: bool,
}

/// Solidity state mutability of a function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateMutability {
    Pure,
    View,
    NonPayable,
    Payable,
}

impl StateMutability {
    /// `pure` and `view` functions never change chain state.
    pub fn is_read_only(self) -> bool {
        matches!(self, StateMutability::Pure | StateMutability::View)
    }
}

impl fmt::Display for StateMutability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateMutability::Pure => write!(f, "pure"),
            StateMutability::View => write!(f, "view"),
            StateMutability::NonPayable => write!(f, "nonpayable"),
            StateMutability::Payable => write!(f, "payable"),
        }
    }
}

/// A callable contract function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbiFunction {
    pub name: String,
    pub inputs: Vec<AbiParam>,
    pub outputs: Vec<AbiParam>,
    pub mutability: StateMutability,
}

impl AbiFunction {
    /// Canonical signature, e.g. `balanceOf(address)`.
    pub fn signature(&self) -> String {
        let args = self
            .inputs
            .iter()
            .map(|p| p.ty.to_string())
            .collect::<Vec<_>>()
            .join(",");
        format!("{}({args})", self.name)
    }
}

/// Contract constructor (deployment inputs).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbiConstructor {
    pub inputs: Vec<AbiParam>,
    pub mutability: StateMutability,
}

/// Contract event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbiEvent {
    pub name: String,
    pub inputs: Vec<AbiParam>,
    pub anonymous: bool,
}

/// A named contract interface parsed from an ABI document.
///
/// Function names are unique within a description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceDescription {
    pub name: String,
    pub functions: Vec<AbiFunction>,
    pub constructor: Option<AbiConstructor>,
    pub events: Vec<AbiEvent>,
}

/// Opaque compiled bytes belonging to one interface description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryPayload {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl BinaryPayload {
    /// Render the payload as `0x`-prefixed lowercase hex.
    ///
    /// Text payloads (as written by solc) are trimmed and normalised; anything
    /// else is hex encoded byte by byte. An empty payload renders as `0x`.
    pub fn to_hex(&self) -> String {
        if let Ok(text) = std::str::from_utf8(&self.bytes) {
            let trimmed = text.trim();
            let body = trimmed
                .strip_prefix("0x")
                .or_else(|| trimmed.strip_prefix("0X"))
                .unwrap_or(trimmed);
            if body.chars().all(|c| c.is_ascii_hexdigit()) {
                return format!("0x{}", body.to_ascii_lowercase());
            }
        }
        let mut out = String::with_capacity(2 + self.bytes.len() * 2);
        out.push_str("0x");
        for b in &self.bytes {
            out.push_str(&format!("{b:02x}"));
        }
        out
    }

    /// An empty payload means the contract cannot be deployed (interfaces,
    /// abstract contracts).
    pub fn is_deployable(&self) -> bool {
        self.to_hex().len() > 2
    }
}

/// Interface description paired with its binary payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractArtifact {
    pub interface: InterfaceDescription,
    pub binary: BinaryPayload,
}

/// All contracts of a run, keyed (and therefore ordered) by contract name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtifactManifest {
    pub contracts: BTreeMap<String, ContractArtifact>,
}

impl ArtifactManifest {
    pub fn len(&self) -> usize {
        self.contracts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contracts.is_empty()
    }
}

/// Where an artifact's bytes come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactInput {
    /// A file on disk; the contract name is the file stem
    Path(PathBuf),
    /// Bytes already in memory
    Inline { name: String, bytes: Vec<u8> },
}

impl ArtifactInput {
    /// Contract name this artifact belongs to.
    pub fn contract_name(&self) -> String {
        match self {
            ArtifactInput::Path(path) => path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default(),
            ArtifactInput::Inline { name, .. } => name.clone(),
        }
    }

    /// Human readable origin, used in error messages.
    pub fn describe(&self) -> String {
        match self {
            ArtifactInput::Path(path) => path.display().to_string(),
            ArtifactInput::Inline { name, .. } => format!("<inline {name}>"),
        }
    }
}

/// Caller-supplied listing of interface descriptions and binary payloads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtifactListing {
    pub abis: Vec<ArtifactInput>,
    pub bins: Vec<ArtifactInput>,
}

impl ArtifactListing {
    pub fn from_paths(abis: Vec<PathBuf>, bins: Vec<PathBuf>) -> Self {
        Self {
            abis: abis.into_iter().map(ArtifactInput::Path).collect(),
            bins: bins.into_iter().map(ArtifactInput::Path).collect(),
        }
    }

    /// Add an in-memory ABI document.
    pub fn with_abi(mut self, name: &str, abi_json: impl Into<Vec<u8>>) -> Self {
        self.abis.push(ArtifactInput::Inline {
            name: name.to_string(),
            bytes: abi_json.into(),
        });
        self
    }

    /// Add an in-memory binary payload.
    pub fn with_bin(mut self, name: &str, bytes: impl Into<Vec<u8>>) -> Self {
        self.bins.push(ArtifactInput::Inline {
            name: name.to_string(),
            bytes: bytes.into(),
        });
        self
    }

    /// Add an ABI document and its binary payload under the same name.
    pub fn with_contract(
        self,
        name: &str,
        abi_json: impl Into<Vec<u8>>,
        bin: impl Into<Vec<u8>>,
    ) -> Self {
        self.with_abi(name, abi_json).with_bin(name, bin)
    }
}
