use std::path::{Path, PathBuf};

/// Settings for the shell build worker.
///
/// `project_dir` anchors the `contrib/` build scripts; by default it is the
/// crate root this binary was built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerConfig {
    pub project_dir: PathBuf,
    pub auth_url: Option<String>,
    pub image_url: Option<String>,
    /// Start the build environment from the worker's own environment
    pub inherit_environment: bool,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            project_dir: PathBuf::from(env!("CARGO_MANIFEST_DIR")),
            auth_url: None,
            image_url: None,
            inherit_environment: true,
        }
    }
}

impl WorkerConfig {
    pub fn with_project_dir(mut self, project_dir: &Path) -> Self {
        self.project_dir = project_dir.to_path_buf();
        self
    }

    /// Directory holding the build scripts
    pub fn contrib_dir(&self) -> PathBuf {
        self.project_dir.join("contrib")
    }
}
