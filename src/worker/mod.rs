pub mod build_command;
pub mod process;
pub mod shell;
pub mod status;

pub use build_command::{BuildCommand, BuildCommandError, ImageFormat, SourceFormat};
pub use process::{ProcessRunner, SubprocessRunner};
pub use shell::{parse_created_image_id, BuildRequest, ShellHandler};
pub use status::{AssemblyRegistry, AssemblyState, ImageState, StatusUpdater};
