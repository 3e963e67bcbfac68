//! Platform browser integration.
//!
//! The tokenless GitHub export opens pre-filled "new issue" pages in the
//! user's browser; hosts that embed the engine elsewhere (webviews, test
//! harnesses) supply their own [`UrlOpener`].

use anyhow::{Context, Result};
use std::process::Command;

/// Opens a URL in the user's default browser.
pub trait UrlOpener {
    fn open(&mut self, url: &str) -> Result<()>;
}

/// Shells out to the platform's opener command.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemUrlOpener;

impl UrlOpener for SystemUrlOpener {
    fn open(&mut self, url: &str) -> Result<()> {
        #[cfg(target_os = "macos")]
        let mut command = {
            let mut c = Command::new("open");
            c.arg(url);
            c
        };

        #[cfg(target_os = "windows")]
        let mut command = {
            let mut c = Command::new("cmd");
            c.args(["/C", "start", "", url]);
            c
        };

        #[cfg(not(any(target_os = "macos", target_os = "windows")))]
        let mut command = {
            let mut c = Command::new("xdg-open");
            c.arg(url);
            c
        };

        command.spawn().context("open URL in browser")?;
        Ok(())
    }
}
