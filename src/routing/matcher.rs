//! Path matching against a fixed set of route templates.
//!
//! # Responsibilities
//! - Match literal templates by exact path equality
//! - Match templates ending in a `:name` placeholder by literal prefix
//! - Capture the placeholder segment
//! - Reject template sets whose placeholder prefixes overlap
//!
//! # Design Decisions
//! - Literal templates are checked first, so a literal path that happens to
//!   sit under a placeholder prefix (`/asset/unspendoutput` under
//!   `/asset/:hash`) is never captured by the placeholder
//! - A placeholder captures exactly one non-empty segment
//! - Query strings are not part of the path and never affect matching
//! - No regex; matching is a set lookup plus a short prefix scan

use std::collections::HashSet;

use crate::routing::registry::RegistryError;

/// A resolved route template with its captured placeholder, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    template: &'static str,
    capture: Option<(&'static str, String)>,
}

impl RouteMatch {
    /// The canonical template this path denotes.
    pub fn template(&self) -> &'static str {
        self.template
    }

    /// Value captured for placeholder `name`.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.capture
            .as_ref()
            .filter(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone)]
struct Placeholder {
    template: &'static str,
    prefix: &'static str,
    name: &'static str,
}

/// Immutable matcher over one method class's templates.
#[derive(Debug, Clone, Default)]
pub struct PathMatcher {
    literals: HashSet<&'static str>,
    placeholders: Vec<Placeholder>,
}

impl PathMatcher {
    /// Compile `templates`.
    pub fn new<I>(templates: I) -> Result<Self, RegistryError>
    where
        I: IntoIterator<Item = &'static str>,
    {
        let mut matcher = Self::default();
        for template in templates {
            matcher.add(template)?;
        }
        Ok(matcher)
    }

    fn add(&mut self, template: &'static str) -> Result<(), RegistryError> {
        if !template.starts_with('/') {
            return Err(RegistryError::InvalidTemplate(template.to_string()));
        }
        if self.contains(template) {
            return Err(RegistryError::DuplicateRoute(template.to_string()));
        }

        // Only the last segment may be a placeholder.
        let split = template.rfind('/').unwrap_or(0) + 1;
        let (prefix, last) = template.split_at(split);
        if prefix.contains(':') {
            return Err(RegistryError::InvalidTemplate(template.to_string()));
        }

        match last.strip_prefix(':') {
            Some(name) => {
                if name.is_empty() {
                    return Err(RegistryError::InvalidTemplate(template.to_string()));
                }
                if let Some(other) = self
                    .placeholders
                    .iter()
                    .find(|p| p.prefix.starts_with(prefix) || prefix.starts_with(p.prefix))
                {
                    return Err(RegistryError::AmbiguousPrefix {
                        first: other.template.to_string(),
                        second: template.to_string(),
                    });
                }
                self.placeholders.push(Placeholder {
                    template,
                    prefix,
                    name,
                });
            }
            None => {
                if last.contains(':') {
                    return Err(RegistryError::InvalidTemplate(template.to_string()));
                }
                self.literals.insert(template);
            }
        }
        Ok(())
    }

    /// Whether `template` is one of the compiled templates.
    pub fn contains(&self, template: &str) -> bool {
        self.literals.contains(template) || self.placeholders.iter().any(|p| p.template == template)
    }

    /// Resolve a request path to its template.
    pub fn resolve(&self, path: &str) -> Option<RouteMatch> {
        if let Some(template) = self.literals.get(path) {
            return Some(RouteMatch {
                template: *template,
                capture: None,
            });
        }

        self.placeholders.iter().find_map(|p| {
            let segment = path.strip_prefix(p.prefix)?;
            if segment.is_empty() || segment.contains('/') {
                return None;
            }
            Some(RouteMatch {
                template: p.template,
                capture: Some((p.name, segment.to_string())),
            })
        })
    }

    /// Iterate over every compiled template.
    pub fn templates(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.literals
            .iter()
            .copied()
            .chain(self.placeholders.iter().map(|p| p.template))
    }
}
