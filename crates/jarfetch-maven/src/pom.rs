//! POM reader.
//!
//! Extracts the fetchable dependency list and parent reference from an
//! artifact POM, and the `dependencyManagement` entries from a parent POM.
//! Dependencies scoped `provided` or `test` are dropped on both paths.
//!
//! `${name}` references are resolved against the `<properties>` of the same
//! document plus a handful of `project.*` built-ins; nothing is inherited from
//! ancestors.

use crate::coordinate::Coordinate;
use crate::error::{MavenError, Result};
use crate::types::{ManagedPom, MavenScope, ParsedPom};
use crate::xml::{self, Element};
use std::collections::HashMap;

/// Guards against properties that reference each other in a cycle.
const MAX_PROPERTY_DEPTH: usize = 8;

/// Parses an artifact POM into its dependency list and parent reference.
///
/// Direct dependency versions are interpolated from this document's
/// properties. A reference that cannot be resolved locally is left dangling so
/// a parent's `dependencyManagement` can supply the version.
///
/// # Errors
///
/// Returns [`MavenError::PomParse`] if the document is not well-formed, the
/// root is not `<project>`, `<dependencies>` is absent, a dependency lacks
/// `groupId`/`artifactId`, or `<parent>` is incomplete.
pub fn parse_dependencies(content: &str) -> Result<ParsedPom> {
    let project = project_element(content)?;
    let list = project
        .child("dependencies")
        .ok_or_else(|| MavenError::pom_parse("missing <project>/<dependencies>"))?;
    let properties = collect_properties(&project);

    let mut dependencies = Vec::new();
    for dep in fetched_dependencies(list) {
        let (group_id, artifact_id) = dependency_ids(dep, &properties)?;
        let version = match dep.child_text("version") {
            None => None,
            Some(raw) => match interpolate(raw, &properties) {
                Ok(version) => Some(version),
                Err(MavenError::PropertyResolution { property }) => {
                    tracing::debug!(
                        "{}:{} version '${{{}}}' not declared locally, deferring to parent",
                        group_id,
                        artifact_id,
                        property
                    );
                    None
                }
                Err(e) => return Err(e),
            },
        };
        dependencies.push(Coordinate::new(
            group_id,
            artifact_id,
            version.unwrap_or_default(),
        ));
    }

    Ok(ParsedPom {
        dependencies,
        parent: parent_coordinate(&project)?,
    })
}

/// Parses a parent POM's `dependencyManagement` section.
///
/// # Errors
///
/// Returns [`MavenError::PomParse`] if `<dependencyManagement>/<dependencies>`
/// is absent and [`MavenError::PropertyResolution`] if a managed version
/// references an undeclared property.
pub fn parse_managed_dependencies(content: &str) -> Result<ManagedPom> {
    let project = project_element(content)?;
    let list = project
        .child("dependencyManagement")
        .and_then(|dm| dm.child("dependencies"))
        .ok_or_else(|| {
            MavenError::pom_parse("missing <project>/<dependencyManagement>/<dependencies>")
        })?;
    let properties = collect_properties(&project);

    let mut managed = Vec::new();
    for dep in fetched_dependencies(list) {
        let (group_id, artifact_id) = dependency_ids(dep, &properties)?;
        let version = dep
            .child_text("version")
            .map(|raw| interpolate(raw, &properties))
            .transpose()?;
        managed.push(Coordinate::new(
            group_id,
            artifact_id,
            version.unwrap_or_default(),
        ));
    }

    Ok(ManagedPom {
        managed,
        parent: parent_coordinate(&project)?,
    })
}

fn project_element(content: &str) -> Result<Element> {
    let root = xml::parse_document(content)?;
    if root.name() != "project" {
        return Err(MavenError::pom_parse(format!(
            "root element is <{}>, expected <project>",
            root.name()
        )));
    }
    Ok(root)
}

fn fetched_dependencies(list: &Element) -> impl Iterator<Item = &Element> {
    list.children_named("dependency").filter(|dep| {
        dep.child_text("scope")
            .unwrap_or("compile")
            .parse::<MavenScope>()
            .unwrap_or_default()
            .is_fetched()
    })
}

fn dependency_ids(dep: &Element, properties: &HashMap<String, String>) -> Result<(String, String)> {
    let group_id = dep
        .child_text("groupId")
        .ok_or_else(|| MavenError::pom_parse("<dependency> without <groupId>"))?;
    let artifact_id = dep
        .child_text("artifactId")
        .ok_or_else(|| MavenError::pom_parse("<dependency> without <artifactId>"))?;
    Ok((
        interpolate(group_id, properties)?,
        interpolate(artifact_id, properties)?,
    ))
}

/// Parent coordinates are always fully literal.
fn parent_coordinate(project: &Element) -> Result<Option<Coordinate>> {
    let Some(parent) = project.child("parent") else {
        return Ok(None);
    };
    let field = |name: &str| {
        parent
            .child_text(name)
            .ok_or_else(|| MavenError::pom_parse(format!("<parent> without <{name}>")))
    };
    Ok(Some(Coordinate::new(
        field("groupId")?,
        field("artifactId")?,
        field("version")?,
    )))
}

/// Declared `<properties>` plus `project.*` built-ins.
///
/// Declared properties win over built-ins of the same name.
fn collect_properties(project: &Element) -> HashMap<String, String> {
    let mut properties = HashMap::new();

    let parent = project.child("parent");
    let inherited = |name: &str| {
        project
            .child_text(name)
            .or_else(|| parent.and_then(|p| p.child_text(name)))
    };

    if let Some(version) = inherited("version") {
        for key in ["project.version", "pom.version", "version"] {
            properties.insert(key.to_string(), version.to_string());
        }
    }
    if let Some(group_id) = inherited("groupId") {
        for key in ["project.groupId", "pom.groupId", "groupId"] {
            properties.insert(key.to_string(), group_id.to_string());
        }
    }
    if let Some(artifact_id) = project.child_text("artifactId") {
        properties.insert("project.artifactId".to_string(), artifact_id.to_string());
    }
    if let Some(parent) = parent {
        for (field, key) in [
            ("version", "project.parent.version"),
            ("groupId", "project.parent.groupId"),
        ] {
            if let Some(value) = parent.child_text(field) {
                properties.insert(key.to_string(), value.to_string());
            }
        }
    }

    if let Some(declared) = project.child("properties") {
        for property in declared.children() {
            properties.insert(property.name().to_string(), property.text().to_string());
        }
    }

    properties
}

/// Replaces every `${name}` in `value` with its property value.
///
/// # Errors
///
/// Returns [`MavenError::PropertyResolution`] naming the first property that
/// is undeclared or part of a reference cycle.
pub fn interpolate(value: &str, properties: &HashMap<String, String>) -> Result<String> {
    interpolate_at_depth(value, properties, 0)
}

fn interpolate_at_depth(
    value: &str,
    properties: &HashMap<String, String>,
    depth: usize,
) -> Result<String> {
    if !value.contains("${") {
        return Ok(value.to_string());
    }

    let mut out = String::with_capacity(value.len());
    let mut rest = value;
    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            // unterminated reference stays literal
            out.push_str(&rest[start..]);
            return Ok(out);
        };

        let name = &after[..end];
        let unresolved = || MavenError::PropertyResolution {
            property: name.to_string(),
        };
        let resolved = properties.get(name).ok_or_else(unresolved)?;
        if depth >= MAX_PROPERTY_DEPTH {
            return Err(unresolved());
        }
        out.push_str(&interpolate_at_depth(resolved, properties, depth + 1)?);
        rest = &after[end + 1..];
    }
    out.push_str(rest);
    Ok(out)
}
