use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use thiserror::Error;

use crate::context::RequestContext;

/// Base image id that asks for the format's default base image
pub const AUTO_BASE_IMAGE: &str = "auto";

/// Default base image for VM slug builds of heroku-style apps
pub const CEDARISH_BASE_IMAGE: &str = "cedarish";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BuildCommandError {
    #[error("Unknown source format: {0}")]
    UnknownSourceFormat(String),

    #[error("Unknown image format: {0}")]
    UnknownImageFormat(String),

    #[error("No build script for source format '{source_format}' with image format '{image_format}'")]
    Unsupported {
        source_format: SourceFormat,
        image_format: ImageFormat,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Heroku,
    Dib,
}

impl SourceFormat {
    fn script_dir(self) -> &'static str {
        match self {
            SourceFormat::Heroku => "lp-cedarish",
            SourceFormat::Dib => "diskimage-builder",
        }
    }
}

impl FromStr for SourceFormat {
    type Err = BuildCommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "heroku" => Ok(SourceFormat::Heroku),
            "dib" => Ok(SourceFormat::Dib),
            other => Err(BuildCommandError::UnknownSourceFormat(other.to_string())),
        }
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SourceFormat::Heroku => "heroku",
            SourceFormat::Dib => "dib",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Docker,
    Qcow2,
}

impl ImageFormat {
    fn script_dir(self) -> &'static str {
        match self {
            ImageFormat::Docker => "docker",
            ImageFormat::Qcow2 => "vm-slug",
        }
    }
}

impl FromStr for ImageFormat {
    type Err = BuildCommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "docker" => Ok(ImageFormat::Docker),
            "qcow2" => Ok(ImageFormat::Qcow2),
            other => Err(BuildCommandError::UnknownImageFormat(other.to_string())),
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ImageFormat::Docker => "docker",
            ImageFormat::Qcow2 => "qcow2",
        })
    }
}

/// Argument vector for one build-app invocation:
/// `[script, source_url, app_name, tenant, base_image]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildCommand {
    pub script: PathBuf,
    pub source_url: String,
    pub app_name: String,
    pub tenant: String,
    pub base_image: String,
}

impl BuildCommand {
    /// Pick the build script and effective base image for a request.
    ///
    /// `contrib_dir` is the directory the build scripts live under.
    pub fn new(
        contrib_dir: &Path,
        ctx: &RequestContext,
        source_url: &str,
        app_name: &str,
        base_image_id: &str,
        source_format: SourceFormat,
        image_format: ImageFormat,
    ) -> Result<Self, BuildCommandError> {
        let base_image = match (source_format, image_format) {
            (SourceFormat::Heroku, ImageFormat::Docker) => base_image_id,
            (SourceFormat::Heroku, ImageFormat::Qcow2) if base_image_id == AUTO_BASE_IMAGE => {
                CEDARISH_BASE_IMAGE
            }
            (SourceFormat::Heroku, ImageFormat::Qcow2) => base_image_id,
            (SourceFormat::Dib, ImageFormat::Qcow2) => base_image_id,
            (source_format, image_format) => {
                return Err(BuildCommandError::Unsupported {
                    source_format,
                    image_format,
                })
            }
        };

        let script = contrib_dir
            .join(source_format.script_dir())
            .join(image_format.script_dir())
            .join("build-app");

        Ok(Self {
            script,
            source_url: source_url.to_string(),
            app_name: app_name.to_string(),
            tenant: ctx.tenant.clone(),
            base_image: base_image.to_string(),
        })
    }

    /// Same as [`BuildCommand::new`] with the formats given by name
    pub fn from_names(
        contrib_dir: &Path,
        ctx: &RequestContext,
        source_url: &str,
        app_name: &str,
        base_image_id: &str,
        source_format: &str,
        image_format: &str,
    ) -> Result<Self, BuildCommandError> {
        Self::new(
            contrib_dir,
            ctx,
            source_url,
            app_name,
            base_image_id,
            source_format.parse()?,
            image_format.parse()?,
        )
    }

    pub fn argv(&self) -> Vec<String> {
        vec![
            self.script.to_string_lossy().into_owned(),
            self.source_url.clone(),
            self.app_name.clone(),
            self.tenant.clone(),
            self.base_image.clone(),
        ]
    }
}

impl fmt::Display for BuildCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.argv().join(" "))
    }
}
