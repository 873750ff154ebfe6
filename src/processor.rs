//! Tree materialization: walks template source trees and writes the
//! rendered output tree to disk.
//!
//! Every file render compiles the template fresh and renders it once
//! against the configuration mapping. Without `overwrite` an existing
//! destination file is never touched, so re-running materialization is
//! safe and never clobbers user edits.

use std::fs;
use std::path::Path;

use log::debug;

use crate::config::{lookup, stringify, Context};
use crate::error::{Error, Result};
use crate::rules::{should_install_dir, should_install_file, transform_path};
use crate::template::Renderer;
use crate::tree::TreeEntry;

/// Materializes template source trees into a destination directory.
pub struct Processor<'a> {
    dest_root: &'a Path,
    context: &'a Context,
    renderer: &'a dyn Renderer,
    overwrite: bool,
    project_name: String,
}

impl<'a> Processor<'a> {
    pub fn new(
        dest_root: &'a Path,
        context: &'a Context,
        renderer: &'a dyn Renderer,
        overwrite: bool,
    ) -> Result<Self> {
        let project_name = stringify(lookup(context, "name")?);
        Ok(Processor { dest_root, context, renderer, overwrite, project_name })
    }

    /// Walks the given source roots in order and writes their entries
    /// under the destination root.
    ///
    /// With `overwrite`, root order is reversed so the last root lays
    /// files down first and earlier roots fill the gaps without
    /// clobbering overrides. Without it, the first root to write a
    /// relative path wins, because existing files are skipped.
    pub fn materialize(&self, roots: &[&dyn TreeEntry]) -> Result<()> {
        ensure_dir(self.dest_root)?;

        let mut order: Vec<&dyn TreeEntry> = roots.to_vec();
        if self.overwrite {
            order.reverse();
        }

        for root in order {
            debug!("materializing root '{}'", root.logical_path());
            self.write_dir(self.dest_root, root)?;
        }
        Ok(())
    }

    fn write_dir(&self, dest: &Path, dir: &dyn TreeEntry) -> Result<()> {
        for entry in dir.children()? {
            let name = entry.name().replace("__name__", &self.project_name);
            let next = dest.join(&name);
            if !entry.is_dir() {
                if should_install_file(&name, self.context)? {
                    let target = transform_path(&next, self.context)?;
                    self.write_file(&target, &*entry)?;
                }
            } else if should_install_dir(entry.logical_path(), self.context)? {
                ensure_dir(&next)?;
                self.write_dir(&next, &*entry)?;
            }
        }
        Ok(())
    }

    fn write_file(&self, dest: &Path, entry: &dyn TreeEntry) -> Result<()> {
        if dest.exists() {
            if dest.is_dir() {
                return Err(Error::DestinationConflict {
                    path: dest.display().to_string(),
                    reason: "a directory exists where a file would be written".to_string(),
                });
            }
            if !self.overwrite {
                debug!("skipping existing file '{}'", dest.display());
                return Ok(());
            }
        }

        let source = entry.content()?;
        let rendered =
            self.renderer.render(&source, self.context).map_err(|e| Error::Render {
                path: dest.display().to_string(),
                source: Box::new(e),
            })?;

        fs::write(dest, rendered)?;
        debug!("wrote '{}'", dest.display());
        Ok(())
    }
}

/// Creates a directory if needed. An already-existing directory is fine;
/// an existing non-directory is a destination conflict.
fn ensure_dir(path: &Path) -> Result<()> {
    if path.exists() && !path.is_dir() {
        return Err(Error::DestinationConflict {
            path: path.display().to_string(),
            reason: "a file exists where a directory is needed".to_string(),
        });
    }
    fs::create_dir_all(path)?;
    Ok(())
}
