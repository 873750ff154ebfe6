//! Git repository initialization for freshly generated projects.

use std::path::Path;

use git2::{Repository, RepositoryInitOptions};
use log::debug;

use crate::error::Result;

/// Initializes a git repository at the project root with a `master`
/// initial head, matching the branch the generated CI configuration
/// watches. Re-initializing an existing repository is harmless.
pub fn init_repository(path: &Path) -> Result<()> {
    let mut options = RepositoryInitOptions::new();
    options.initial_head("master");
    Repository::init_opts(path, &options)?;
    debug!("initialized git repository in '{}'", path.display());
    Ok(())
}
