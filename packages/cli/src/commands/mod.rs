pub mod compose;
pub mod elements;
pub mod init;
pub mod insert;
pub mod inspect;
pub mod watch;

pub use compose::{compose, ComposeArgs};
pub use elements::{elements, ElementsArgs};
pub use init::{init, InitArgs};
pub use insert::{insert, InsertArgs};
pub use inspect::{inspect, InspectArgs};
pub use watch::{watch, WatchArgs};

use atelier_workspace::Config;
use std::path::{Path, PathBuf};

/// Explicit path argument, else the configured source directory
fn project_dir(path: Option<&str>, config: &Config, cwd: &Path) -> PathBuf {
    match path {
        Some(path) => cwd.join(path),
        None => config.get_src_dir(cwd),
    }
}
