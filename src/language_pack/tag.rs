use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Marker tag carried by every language pack image
pub const NAMESPACE: &str = "solum::lp";

pub const TYPE: &str = "solum::lp::type::";
pub const DESCRIPTION: &str = "solum::lp::description::";
pub const COMPILER_VERSION: &str = "solum::lp::compiler_version::";
pub const RUNTIME_VERSION: &str = "solum::lp::runtime_version::";
pub const IMPLEMENTATION: &str = "solum::lp::implementation::";
pub const BUILD_TOOL: &str = "solum::lp::build_tool::";
pub const OS_PLATFORM: &str = "solum::lp::os_platform::";
pub const ATTRIBUTE: &str = "solum::lp::attribute::";

const SEPARATOR: &str = "::";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TagError {
    #[error("tag '{0}' is outside the solum::lp namespace")]
    ForeignNamespace(String),

    #[error("unknown language pack tag category '{category}' in '{tag}'")]
    UnknownCategory { category: String, tag: String },

    #[error("tag '{0}' is missing a value segment")]
    MissingSegment(String),

    #[error("{category} '{value}' cannot contain '::' or end with ':'")]
    AmbiguousKey { category: String, value: String },
}

/// One parsed language pack tag.
///
/// Scalar categories keep everything after `<category>::` as their value,
/// so values may contain `::` themselves. Paired categories split the
/// remainder on the first `::`, so only their second part may; see
/// [`Tag::check`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tag {
    Namespace,
    Type(String),
    Description(String),
    CompilerVersion(String),
    RuntimeVersion(String),
    Implementation(String),
    BuildTool { tool_type: String, version: String },
    OsPlatform { os: String, version: String },
    Attribute { key: String, value: String },
}

impl FromStr for Tag {
    type Err = TagError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        let rest = tag
            .strip_prefix(NAMESPACE)
            .ok_or_else(|| TagError::ForeignNamespace(tag.to_string()))?;
        if rest.is_empty() {
            return Ok(Tag::Namespace);
        }
        let rest = rest
            .strip_prefix(SEPARATOR)
            .ok_or_else(|| TagError::ForeignNamespace(tag.to_string()))?;

        let (category, value) = rest
            .split_once(SEPARATOR)
            .ok_or_else(|| TagError::MissingSegment(tag.to_string()))?;

        let pair = || {
            value
                .split_once(SEPARATOR)
                .map(|(first, second)| (first.to_string(), second.to_string()))
                .ok_or_else(|| TagError::MissingSegment(tag.to_string()))
        };

        match category {
            "type" => Ok(Tag::Type(value.to_string())),
            "description" => Ok(Tag::Description(value.to_string())),
            "compiler_version" => Ok(Tag::CompilerVersion(value.to_string())),
            "runtime_version" => Ok(Tag::RuntimeVersion(value.to_string())),
            "implementation" => Ok(Tag::Implementation(value.to_string())),
            "build_tool" => {
                let (tool_type, version) = pair()?;
                Ok(Tag::BuildTool { tool_type, version })
            }
            "os_platform" => {
                let (os, version) = pair()?;
                Ok(Tag::OsPlatform { os, version })
            }
            "attribute" => {
                let (key, value) = pair()?;
                Ok(Tag::Attribute { key, value })
            }
            other => Err(TagError::UnknownCategory {
                category: other.to_string(),
                tag: tag.to_string(),
            }),
        }
    }
}

impl Tag {
    /// Make sure the rendered tag parses back into `self`.
    ///
    /// The first part of a paired tag must not contain `::` or end with
    /// `:`, otherwise the first `::` of the rendered tag lands elsewhere.
    pub fn check(&self) -> Result<(), TagError> {
        let (category, first) = match self {
            Tag::BuildTool { tool_type, .. } => ("build_tool", tool_type),
            Tag::OsPlatform { os, .. } => ("os_platform", os),
            Tag::Attribute { key, .. } => ("attribute", key),
            _ => return Ok(()),
        };
        if first.contains(SEPARATOR) || first.ends_with(':') {
            return Err(TagError::AmbiguousKey {
                category: category.to_string(),
                value: first.clone(),
            });
        }
        Ok(())
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tag::Namespace => f.write_str(NAMESPACE),
            Tag::Type(value) => write!(f, "{}{}", TYPE, value),
            Tag::Description(value) => write!(f, "{}{}", DESCRIPTION, value),
            Tag::CompilerVersion(value) => write!(f, "{}{}", COMPILER_VERSION, value),
            Tag::RuntimeVersion(value) => write!(f, "{}{}", RUNTIME_VERSION, value),
            Tag::Implementation(value) => write!(f, "{}{}", IMPLEMENTATION, value),
            Tag::BuildTool { tool_type, version } => {
                write!(f, "{}{}::{}", BUILD_TOOL, tool_type, version)
            }
            Tag::OsPlatform { os, version } => write!(f, "{}{}::{}", OS_PLATFORM, os, version),
            Tag::Attribute { key, value } => write!(f, "{}{}::{}", ATTRIBUTE, key, value),
        }
    }
}
