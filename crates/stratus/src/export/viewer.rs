//! Opening rendered artifacts in the platform viewer.

use std::{
    io,
    path::Path,
    process::{Command, Stdio},
};

/// Launches the default viewer for `path` without waiting for it.
pub(super) fn open(path: &Path) -> io::Result<()> {
    viewer_command(path)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;
    Ok(())
}

#[cfg(target_os = "macos")]
fn viewer_command(path: &Path) -> Command {
    let mut command = Command::new("open");
    command.arg(path);
    command
}

#[cfg(target_os = "windows")]
fn viewer_command(path: &Path) -> Command {
    let mut command = Command::new("cmd");
    // The empty argument is the window title `start` expects first.
    command.args(["/C", "start", ""]).arg(path);
    command
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn viewer_command(path: &Path) -> Command {
    let mut command = Command::new("xdg-open");
    command.arg(path);
    command
}
