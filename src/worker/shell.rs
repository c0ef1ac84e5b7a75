//! Shell build handler.
//!
//! [`ShellHandler::build`] runs one `contrib/<source>/<image>/build-app`
//! script and reports the outcome:
//! - the assembly moves to `BUILDING`, then to `BUILT` or `ERROR`,
//! - the build job gets exactly two updates: `BUILDING`, then `COMPLETE`
//!   with the created image id or `ERROR` without one.
//!
//! If the status API itself fails mid-build, the assembly is moved to
//! `ERROR` before the failure is returned, so it never stays `BUILDING`.
//!
//! The script reports the image it produced with a stdout line of the form
//! `created_image_id=<id>`.

use anyhow::Result;
use log::{debug, error, info, warn};
use std::collections::HashMap;

use super::build_command::{BuildCommand, BuildCommandError};
use super::process::ProcessRunner;
use super::status::{AssemblyRegistry, AssemblyState, ImageState, StatusUpdater};
use crate::config::WorkerConfig;
use crate::context::RequestContext;

/// Stdout marker preceding the id of the image a build produced
pub const CREATED_IMAGE_MARKER: &str = "created_image_id=";

/// One image build request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildRequest {
    pub build_id: i64,
    pub source_url: String,
    pub app_name: String,
    pub base_image_id: String,
    pub source_format: String,
    pub image_format: String,
    pub assembly_id: i64,
}

/// Extracts the created image id from build output.
///
/// The first `created_image_id=` wins; its value runs to the end of that
/// line and is trimmed. A blank value counts as no image.
pub fn parse_created_image_id(stdout: &str) -> Option<&str> {
    let start = stdout.find(CREATED_IMAGE_MARKER)? + CREATED_IMAGE_MARKER.len();
    let value = stdout[start..].lines().next().unwrap_or("").trim();
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

pub struct ShellHandler<R: ProcessRunner, U: StatusUpdater, A: AssemblyRegistry> {
    config: WorkerConfig,
    runner: R,
    updater: U,
    registry: A,
}

impl<R: ProcessRunner, U: StatusUpdater, A: AssemblyRegistry> ShellHandler<R, U, A> {
    pub fn new(config: WorkerConfig, runner: R, updater: U, registry: A) -> Self {
        Self {
            config,
            runner,
            updater,
            registry,
        }
    }

    pub fn config(&self) -> &WorkerConfig {
        &self.config
    }

    pub fn echo(&self, _ctx: &RequestContext, message: &str) {
        debug!("{}", message);
    }

    /// Environment the build script runs with
    pub fn environment(&self, ctx: &RequestContext) -> HashMap<String, String> {
        let mut env: HashMap<String, String> = if self.config.inherit_environment {
            std::env::vars().collect()
        } else {
            HashMap::new()
        };

        if let Some(token) = &ctx.auth_token {
            env.insert("OS_AUTH_TOKEN".to_string(), token.clone());
        }
        env.insert("OS_TENANT_ID".to_string(), ctx.tenant.clone());
        env.insert("OS_USER_ID".to_string(), ctx.user.clone());
        if let Some(url) = &self.config.auth_url {
            env.insert("OS_AUTH_URL".to_string(), url.clone());
        }
        if let Some(url) = &self.config.image_url {
            env.insert("OS_IMAGE_URL".to_string(), url.clone());
        }

        env
    }

    pub fn build_command(
        &self,
        ctx: &RequestContext,
        request: &BuildRequest,
    ) -> Result<BuildCommand, BuildCommandError> {
        BuildCommand::from_names(
            &self.config.contrib_dir(),
            ctx,
            &request.source_url,
            &request.app_name,
            &request.base_image_id,
            &request.source_format,
            &request.image_format,
        )
    }

    /// Build an image for `request`.
    ///
    /// Returns the created image id, or `None` when the build failed. Errors
    /// are reserved for the status API and assembly registry themselves
    /// failing.
    pub fn build(&self, ctx: &RequestContext, request: &BuildRequest) -> Result<Option<String>> {
        info!(
            "Building '{}' from {} ({} -> {}) for assembly {}",
            request.app_name,
            request.source_url,
            request.source_format,
            request.image_format,
            request.assembly_id
        );

        self.registry
            .update_assembly_status(request.assembly_id, AssemblyState::Building)?;

        self.run_and_report(ctx, request).inspect_err(|err| {
            error!("Build {} could not be reported: {:#}", request.build_id, err);
            if let Err(registry_err) = self
                .registry
                .update_assembly_status(request.assembly_id, AssemblyState::Error)
            {
                warn!(
                    "Assembly {} left in BUILDING: {:#}",
                    request.assembly_id, registry_err
                );
            }
        })
    }

    fn run_and_report(
        &self,
        ctx: &RequestContext,
        request: &BuildRequest,
    ) -> Result<Option<String>> {
        self.updater.build_job_update(
            request.build_id,
            ImageState::Building,
            "Starting the image build",
            None,
            request.assembly_id,
        )?;

        let out = match self.run_build(ctx, request) {
            Ok(out) => out,
            Err(err) => {
                error!("Build {} failed to run: {:#}", request.build_id, err);
                self.report_failure(request, &format!("{:#}", err))?;
                return Ok(None);
            }
        };

        match parse_created_image_id(&out) {
            Some(image_id) => {
                info!("Build {} created image {}", request.build_id, image_id);
                self.updater.build_job_update(
                    request.build_id,
                    ImageState::Complete,
                    "built successfully",
                    Some(image_id),
                    request.assembly_id,
                )?;
                self.registry
                    .update_assembly_status(request.assembly_id, AssemblyState::Built)?;
                Ok(Some(image_id.to_string()))
            }
            None => {
                error!("Build {} did not report a created image", request.build_id);
                self.report_failure(request, "image not created")?;
                Ok(None)
            }
        }
    }

    fn run_build(&self, ctx: &RequestContext, request: &BuildRequest) -> Result<String> {
        let command = self.build_command(ctx, request)?;
        debug!("Build command: {}", command);
        let env = self.environment(ctx);
        self.runner.run(&command.argv(), &env)
    }

    fn report_failure(&self, request: &BuildRequest, description: &str) -> Result<()> {
        self.updater.build_job_update(
            request.build_id,
            ImageState::Error,
            description,
            None,
            request.assembly_id,
        )?;
        self.registry
            .update_assembly_status(request.assembly_id, AssemblyState::Error)
    }
}
