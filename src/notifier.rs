//! Console progress for the `solum-lp` binary.
//!
//! [`Notifier`] follows the `-v` verbosity switch:
//! - [`VerbosityLevel::Quiet`] → no text logs; a live `indicatif` spinner shows
//!   the latest build status.
//! - [`VerbosityLevel::Info`]/[`VerbosityLevel::Debug`]/[`VerbosityLevel::Trace`] →
//!   plain `log` records.
//!
//! It also stands in for the status API and the assembly registry when the
//! worker runs from the command line, so every job update and assembly state
//! change is shown to the user.

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, warn, LevelFilter};
use std::cell::RefCell;
use std::time::Duration;

use crate::worker::{AssemblyRegistry, AssemblyState, ImageState, StatusUpdater};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VerbosityLevel {
    Quiet = 0, // Spinner, no text logs
    Info = 1,  // Text logs at info level
    Debug = 2, // Text logs at debug level
    Trace = 3, // Text logs at trace level
}

impl From<u8> for VerbosityLevel {
    fn from(level: u8) -> Self {
        match level {
            0 => VerbosityLevel::Quiet,
            1 => VerbosityLevel::Info,
            2 => VerbosityLevel::Debug,
            _ => VerbosityLevel::Trace,
        }
    }
}

impl VerbosityLevel {
    pub fn to_log_level(self) -> LevelFilter {
        match self {
            VerbosityLevel::Quiet => LevelFilter::Warn,
            VerbosityLevel::Info => LevelFilter::Info,
            VerbosityLevel::Debug => LevelFilter::Debug,
            VerbosityLevel::Trace => LevelFilter::Trace,
        }
    }
}

pub struct Notifier {
    verbosity: VerbosityLevel,
    active_spinner: RefCell<Option<ProgressBar>>,
}

impl Notifier {
    pub fn new(verbosity_level: u8) -> Self {
        Self {
            verbosity: VerbosityLevel::from(verbosity_level),
            active_spinner: RefCell::new(None),
        }
    }

    pub fn info(&self, message: &str) {
        match self.verbosity {
            VerbosityLevel::Quiet => {
                // Lazy initialize spinner on first info call
                if self.active_spinner.borrow().is_none() {
                    let spinner = ProgressBar::new_spinner();
                    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
                        spinner.set_style(style);
                    }
                    spinner.enable_steady_tick(Duration::from_millis(100));
                    *self.active_spinner.borrow_mut() = Some(spinner);
                }

                if let Some(spinner) = self.active_spinner.borrow().as_ref() {
                    spinner.set_message(message.to_string());
                }
            }
            _ => info!("{}", message),
        }
    }

    pub fn debug(&self, message: &str) {
        if self.verbosity != VerbosityLevel::Quiet {
            debug!("{}", message);
        }
    }

    pub fn warn(&self, message: &str) {
        if let Some(spinner) = self.active_spinner.borrow().as_ref() {
            spinner.suspend(|| warn!("{}", message));
            return;
        }
        warn!("{}", message);
    }

    /// Stop the spinner, if any, leaving `message` on screen
    pub fn finish(&self, message: &str) {
        let spinner = self.active_spinner.borrow_mut().take();
        match spinner {
            Some(spinner) => spinner.finish_with_message(message.to_string()),
            None => self.info(message),
        }
    }

    /// Stop the spinner, if any, marking it as failed with `message`
    pub fn abandon(&self, message: &str) {
        let spinner = self.active_spinner.borrow_mut().take();
        match spinner {
            Some(spinner) => spinner.abandon_with_message(message.to_string()),
            None => warn!("{}", message),
        }
    }

    pub fn verbosity_level(&self) -> VerbosityLevel {
        self.verbosity
    }
}

impl StatusUpdater for Notifier {
    fn build_job_update(
        &self,
        build_id: i64,
        status: ImageState,
        description: &str,
        created_image_id: Option<&str>,
        assembly_id: i64,
    ) -> Result<()> {
        let message = match created_image_id {
            Some(image_id) => format!(
                "Build {} (assembly {}): {} - {} [image {}]",
                build_id, assembly_id, status, description, image_id
            ),
            None => format!(
                "Build {} (assembly {}): {} - {}",
                build_id, assembly_id, status, description
            ),
        };

        match status {
            ImageState::Building => self.info(&message),
            ImageState::Complete => self.finish(&message),
            ImageState::Error => self.abandon(&message),
        }
        Ok(())
    }
}

impl AssemblyRegistry for Notifier {
    fn update_assembly_status(&self, assembly_id: i64, state: AssemblyState) -> Result<()> {
        let message = format!("Assembly {} is now {}", assembly_id, state);
        match state {
            AssemblyState::Error => self.warn(&message),
            _ => self.debug(&message),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_mapping() {
        assert_eq!(VerbosityLevel::from(0), VerbosityLevel::Quiet);
        assert_eq!(VerbosityLevel::from(2), VerbosityLevel::Debug);
        assert_eq!(VerbosityLevel::from(9), VerbosityLevel::Trace);
        assert_eq!(VerbosityLevel::Quiet.to_log_level(), LevelFilter::Warn);
        assert_eq!(VerbosityLevel::Info.to_log_level(), LevelFilter::Info);
    }

    #[test]
    fn test_reports_updates_in_text_mode() {
        let notifier = Notifier::new(1);
        assert!(notifier
            .build_job_update(5, ImageState::Building, "Starting the image build", None, 44)
            .is_ok());
        assert!(notifier
            .update_assembly_status(44, AssemblyState::Building)
            .is_ok());
        assert!(notifier.active_spinner.borrow().is_none());
    }

    #[test]
    fn test_quiet_mode_error_stops_spinner() {
        let notifier = Notifier::new(0);
        notifier
            .build_job_update(5, ImageState::Building, "Starting the image build", None, 44)
            .unwrap();
        assert!(notifier.active_spinner.borrow().is_some());

        notifier
            .build_job_update(5, ImageState::Error, "image not created", None, 44)
            .unwrap();
        assert!(notifier.active_spinner.borrow().is_none());
    }

    #[test]
    fn test_quiet_mode_complete_stops_spinner() {
        let notifier = Notifier::new(0);
        notifier
            .build_job_update(5, ImageState::Building, "Starting the image build", None, 44)
            .unwrap();
        notifier
            .build_job_update(5, ImageState::Complete, "built successfully", Some("abc"), 44)
            .unwrap();
        assert!(notifier.active_spinner.borrow().is_none());
    }
}
