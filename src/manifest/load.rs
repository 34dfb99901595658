use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::router::{Element, RouteDefinition};

/// One path or a list of alternatives
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathSpec {
    /// A single template
    One(String),
    /// Alternative templates sharing one route
    Many(Vec<String>),
}

impl PathSpec {
    /// Templates in declaration order.
    #[must_use]
    pub fn paths(&self) -> Vec<String> {
        match self {
            PathSpec::One(path) => vec![path.clone()],
            PathSpec::Many(paths) => paths.clone(),
        }
    }
}

/// A route as written in a manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteEntry {
    /// Path template(s)
    pub path: PathSpec,
    /// Display name; named routes render it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Redirect target, resolved relative to the matched route
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect: Option<String>,
    /// Nested routes
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<RouteEntry>,
}

/// A complete route manifest
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteManifest {
    /// Router base path
    #[serde(default)]
    pub base: String,
    /// Top-level routes
    #[serde(default)]
    pub routes: Vec<RouteEntry>,
}

impl RouteEntry {
    fn to_definition(&self) -> RouteDefinition {
        let paths = self.path.paths();
        if paths.is_empty() {
            warn!(name = ?self.name, "Route entry has no paths and will never match");
        }
        let mut definition = RouteDefinition::with_paths(paths)
            .children(self.children.iter().map(RouteEntry::to_definition));

        if let Some(name) = &self.name {
            let label = name.clone();
            definition = definition.name(name.clone()).outlet(move |context| {
                let child = context
                    .child()
                    .and_then(|c| c.render())
                    .and_then(|e| e.downcast_ref::<String>().cloned());
                Some(Element::new(match child {
                    Some(child) => format!("{label} > {child}"),
                    None => label.clone(),
                }))
            });
        }
        if let Some(target) = &self.redirect {
            definition = definition.redirect_to(target.clone(), None);
        }
        definition
    }
}

impl RouteManifest {
    /// Parse a YAML manifest.
    ///
    /// # Errors
    ///
    /// Malformed YAML or a document that is not a manifest.
    pub fn from_yaml_str(content: &str) -> anyhow::Result<Self> {
        serde_yaml::from_str(content).context("Failed to parse YAML route manifest")
    }

    /// Parse a JSON manifest.
    ///
    /// # Errors
    ///
    /// Malformed JSON or a document that is not a manifest.
    pub fn from_json_str(content: &str) -> anyhow::Result<Self> {
        serde_json::from_str(content).context("Failed to parse JSON route manifest")
    }

    /// Build the definition tree.
    #[must_use]
    pub fn definitions(&self) -> Vec<RouteDefinition> {
        self.routes.iter().map(RouteEntry::to_definition).collect()
    }
}

/// Load a manifest from `path`; `.yaml`/`.yml` files are YAML, anything else JSON.
///
/// # Errors
///
/// The file cannot be read or does not parse.
pub fn load_manifest(path: impl AsRef<Path>) -> anyhow::Result<RouteManifest> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read route manifest {}", path.display()))?;
    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    );
    let manifest = if is_yaml {
        RouteManifest::from_yaml_str(&content)
    } else {
        RouteManifest::from_json_str(&content)
    }
    .with_context(|| format!("Invalid route manifest {}", path.display()))?;

    debug!(
        path = %path.display(),
        base = %manifest.base,
        routes = manifest.routes.len(),
        "Route manifest loaded"
    );
    Ok(manifest)
}
