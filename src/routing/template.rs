//! Upstream path templates.
//!
//! # Responsibilities
//! - Parse templates like `/api/plants/{plant_id}/images`
//! - Substitute captured public path parameters
//! - Join the result onto the upstream base URL
//!
//! # Design Decisions
//! - Parameter values are pushed as whole path segments, so they are
//!   percent-encoded and can never introduce extra segments
//! - A base URL with its own path prefix keeps that prefix

use thiserror::Error;
use url::Url;

/// Errors produced while rendering a template.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TemplateError {
    #[error("missing path parameter '{0}'")]
    MissingParam(String),

    #[error("path parameter '{0}' is empty")]
    EmptyParam(String),

    #[error("path parameter '{0}' is not a valid path segment")]
    InvalidParam(String),

    #[error("base url '{0}' cannot carry a path")]
    CannotBeABase(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
}

/// A parsed upstream path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTemplate {
    segments: Vec<Segment>,
}

impl PathTemplate {
    /// Parse a template. Segments wrapped in braces are parameters.
    pub fn parse(template: &str) -> Self {
        let segments = template
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|s| match s.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
                Some(name) => Segment::Param(name.to_string()),
                None => Segment::Literal(s.to_string()),
            })
            .collect();
        Self { segments }
    }

    /// Names of the parameters this template expects, in order.
    pub fn params(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Param(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// Render onto `base` using `params` as `(name, value)` pairs.
    pub fn render(&self, base: &Url, params: &[(&str, &str)]) -> Result<Url, TemplateError> {
        let mut url = base.clone();
        url.set_query(None);
        url.set_fragment(None);
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| TemplateError::CannotBeABase(base.to_string()))?;
            path.pop_if_empty();
            for segment in &self.segments {
                match segment {
                    Segment::Literal(lit) => {
                        path.push(lit);
                    }
                    Segment::Param(name) => {
                        let value = params
                            .iter()
                            .find(|(key, _)| *key == name.as_str())
                            .map(|(_, value)| *value)
                            .ok_or_else(|| TemplateError::MissingParam(name.clone()))?;
                        if value.is_empty() {
                            return Err(TemplateError::EmptyParam(name.clone()));
                        }
                        // url drops dot segments on push instead of encoding them
                        if value == "." || value == ".." {
                            return Err(TemplateError::InvalidParam(name.clone()));
                        }
                        path.push(value);
                    }
                }
            }
        }
        Ok(url)
    }
}
