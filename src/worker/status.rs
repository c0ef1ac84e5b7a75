use anyhow::Result;
use std::fmt;

/// Phase of an image build job as reported to the status API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageState {
    Building,
    Complete,
    Error,
}

impl fmt::Display for ImageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ImageState::Building => "BUILDING",
            ImageState::Complete => "COMPLETE",
            ImageState::Error => "ERROR",
        })
    }
}

/// State of the assembly a build belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssemblyState {
    Building,
    Built,
    Error,
}

impl fmt::Display for AssemblyState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AssemblyState::Building => "BUILDING",
            AssemblyState::Built => "BUILT",
            AssemblyState::Error => "ERROR",
        })
    }
}

/// Status-update API for build jobs
pub trait StatusUpdater {
    fn build_job_update(
        &self,
        build_id: i64,
        status: ImageState,
        description: &str,
        created_image_id: Option<&str>,
        assembly_id: i64,
    ) -> Result<()>;
}

/// Registry holding assembly records
pub trait AssemblyRegistry {
    fn update_assembly_status(&self, assembly_id: i64, state: AssemblyState) -> Result<()>;
}

impl<T: StatusUpdater + ?Sized> StatusUpdater for &T {
    fn build_job_update(
        &self,
        build_id: i64,
        status: ImageState,
        description: &str,
        created_image_id: Option<&str>,
        assembly_id: i64,
    ) -> Result<()> {
        (**self).build_job_update(build_id, status, description, created_image_id, assembly_id)
    }
}

impl<T: AssemblyRegistry + ?Sized> AssemblyRegistry for &T {
    fn update_assembly_status(&self, assembly_id: i64, state: AssemblyState) -> Result<()> {
        (**self).update_assembly_status(assembly_id, state)
    }
}
