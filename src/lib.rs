pub mod api;
pub mod config;
pub mod context;
pub mod language_pack;
pub mod notifier;
pub mod worker;

// Re-exports for easy access
pub use api::{LanguagePackController, LanguagePackHandler, LanguagePacksController};
pub use config::WorkerConfig;
pub use context::RequestContext;
pub use language_pack::{Image, ImageDict, LanguagePack};
pub use notifier::Notifier;
pub use worker::{BuildCommand, BuildRequest, ShellHandler, SubprocessRunner};
