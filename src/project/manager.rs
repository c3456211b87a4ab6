//! In-memory data-model registry with semver-checked dependencies.

use std::collections::VecDeque;

use indexmap::IndexMap;
use rustc_hash::FxHashSet;
use semver::{Version, VersionReq};
use smol_str::SmolStr;
use thiserror::Error;

use super::registry::DataModelRegistry;
use crate::base::DataModelId;

/// Errors raised while registering data models.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("data model '{0}' is already registered")]
    Duplicate(DataModelId),

    #[error("unknown data model '{0}'")]
    Unknown(DataModelId),

    #[error("invalid version '{value}' for data model '{id}': {source}")]
    InvalidVersion {
        id: DataModelId,
        value: String,
        #[source]
        source: semver::Error,
    },

    #[error("invalid version requirement '{value}' on dependency '{target}': {source}")]
    InvalidRequirement {
        target: DataModelId,
        value: String,
        #[source]
        source: semver::Error,
    },
}

/// Whether dependency edges are followed transitively when deciding
/// visibility.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum VisibilityMode {
    /// Only direct dependencies are visible.
    #[default]
    Direct,
    /// Dependencies of dependencies are visible too.
    Transitive,
}

/// A declared dependency of one data model on another.
#[derive(Clone, Debug)]
pub struct DependencyDecl {
    pub target: DataModelId,
    pub requirement: VersionReq,
}

/// Everything the registry knows about one data model.
#[derive(Clone, Debug)]
pub struct DataModelInfo {
    pub id: DataModelId,
    pub reference_name: SmolStr,
    pub version: Version,
    /// Documents whose URI lies under this root belong to the data model.
    pub root_uri: String,
    pub dependencies: Vec<DependencyDecl>,
}

impl DataModelInfo {
    pub fn new(
        id: impl Into<DataModelId>,
        reference_name: impl Into<SmolStr>,
        root_uri: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            reference_name: reference_name.into(),
            version: Version::new(0, 0, 0),
            root_uri: root_uri.into(),
            dependencies: Vec::new(),
        }
    }

    pub fn with_version(mut self, version: &str) -> Result<Self, RegistryError> {
        self.version = Version::parse(version).map_err(|source| RegistryError::InvalidVersion {
            id: self.id.clone(),
            value: version.to_string(),
            source,
        })?;
        Ok(self)
    }

    /// Declare a dependency. An empty requirement accepts any version.
    pub fn with_dependency(
        mut self,
        target: impl Into<DataModelId>,
        requirement: &str,
    ) -> Result<Self, RegistryError> {
        let target = target.into();
        let requirement = if requirement.trim().is_empty() {
            VersionReq::STAR
        } else {
            VersionReq::parse(requirement).map_err(|source| RegistryError::InvalidRequirement {
                target: target.clone(),
                value: requirement.to_string(),
                source,
            })?
        };
        self.dependencies.push(DependencyDecl {
            target,
            requirement,
        });
        Ok(self)
    }

    fn owns(&self, uri: &str) -> bool {
        let root = self.root_uri.as_str();
        if uri == root {
            return true;
        }
        uri.starts_with(root) && (root.ends_with('/') || uri[root.len()..].starts_with('/'))
    }
}

/// In-memory [`DataModelRegistry`].
#[derive(Clone, Debug, Default)]
pub struct DataModelManager {
    models: IndexMap<DataModelId, DataModelInfo>,
    mode: VisibilityMode,
}

impl DataModelManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mode(mut self, mode: VisibilityMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn mode(&self) -> VisibilityMode {
        self.mode
    }

    /// Register a new data model.
    pub fn register(&mut self, info: DataModelInfo) -> Result<(), RegistryError> {
        if self.models.contains_key(&info.id) {
            return Err(RegistryError::Duplicate(info.id));
        }
        tracing::debug!(
            id = %info.id,
            reference_name = %info.reference_name,
            "registered data model"
        );
        self.models.insert(info.id.clone(), info);
        Ok(())
    }

    /// Replace an already registered data model.
    pub fn update(&mut self, info: DataModelInfo) -> Result<(), RegistryError> {
        match self.models.get_mut(&info.id) {
            Some(slot) => {
                *slot = info;
                Ok(())
            }
            None => Err(RegistryError::Unknown(info.id)),
        }
    }

    pub fn remove(&mut self, id: &DataModelId) -> Option<DataModelInfo> {
        self.models.shift_remove(id)
    }

    pub fn get(&self, id: &DataModelId) -> Option<&DataModelInfo> {
        self.models.get(id)
    }

    pub fn data_models(&self) -> impl Iterator<Item = &DataModelInfo> {
        self.models.values()
    }

    fn edge_counts(&self, dependency: &DependencyDecl, for_reference: bool) -> bool {
        if !for_reference {
            return true;
        }
        self.models
            .get(&dependency.target)
            .is_some_and(|target| dependency.requirement.matches(&target.version))
    }
}

impl DataModelRegistry for DataModelManager {
    fn owning_data_model(&self, uri: &str) -> Option<DataModelId> {
        self.models
            .values()
            .filter(|info| info.owns(uri))
            .max_by_key(|info| info.root_uri.len())
            .map(|info| info.id.clone())
    }

    fn is_visible(&self, from: &DataModelId, to: &DataModelId, for_reference: bool) -> bool {
        if from == to {
            return true;
        }
        let mut visited: FxHashSet<&DataModelId> = FxHashSet::default();
        let mut queue: VecDeque<&DataModelId> = VecDeque::from([from]);
        while let Some(current) = queue.pop_front() {
            if !visited.insert(current) {
                continue;
            }
            let Some(info) = self.models.get(current) else {
                continue;
            };
            for dependency in &info.dependencies {
                if !self.edge_counts(dependency, for_reference) {
                    continue;
                }
                if &dependency.target == to {
                    return true;
                }
                if self.mode == VisibilityMode::Transitive {
                    queue.push_back(&dependency.target);
                }
            }
        }
        false
    }

    fn reference_name(&self, id: &DataModelId) -> Option<SmolStr> {
        self.models.get(id).map(|info| info.reference_name.clone())
    }
}
