//! Command-line interface implementation for kiln.
//! Provides argument parsing and help text formatting using clap.

use clap::{error::ErrorKind, CommandFactory, Parser};
use std::path::PathBuf;

use crate::config::{PackageManager, TargetType};

/// Command-line arguments structure for kiln.
#[derive(Parser, Debug)]
#[command(author, version, about = "kiln: opinionated C/C++ project scaffolding tool", long_about = None)]
pub struct Args {
    /// Path to generate to; the project name is also derived from this
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Generate a C project instead of a C++ one
    #[arg(long)]
    pub c: bool,

    /// Generate an executable (default)
    #[arg(short = 'e', group = "target")]
    pub executable: bool,

    /// Generate a static/shared library
    #[arg(short = 's', group = "target")]
    pub shared: bool,

    /// Generate a header-only library
    #[arg(long = "header-only", visible_alias = "ho", group = "target")]
    pub header_only: bool,

    /// Set the language standard to use (defaults: C++ - 17, C - 99)
    #[arg(long, value_name = "NN")]
    pub std: Option<String>,

    /// Package manager to use (options are: conan, vcpkg)
    #[arg(short = 'p', long = "package-manager", value_name = "PM")]
    pub package_manager: Option<String>,

    /// Generate examples for a library
    #[arg(long)]
    pub examples: bool,

    /// Omit the clang-tidy preset from the dev preset
    #[arg(long)]
    pub no_clang_tidy: bool,

    /// Omit the cppcheck preset from the dev preset
    #[arg(long)]
    pub no_cppcheck: bool,

    /// Omit checks for existing files and non-empty project root
    #[arg(long)]
    pub overwrite: bool,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// The target type selected by flags, if any.
    pub fn target(&self) -> Option<TargetType> {
        if self.executable {
            Some(TargetType::Executable)
        } else if self.shared {
            Some(TargetType::Library)
        } else if self.header_only {
            Some(TargetType::HeaderOnly)
        } else {
            None
        }
    }

    /// The package manager selected by flags, if any. Only the first
    /// letter matters, so `conan`, `c` and `Conan` all select conan.
    pub fn selected_package_manager(&self) -> Option<PackageManager> {
        let id = self.package_manager.as_deref()?;
        let initial = id.chars().next()?.to_ascii_lowercase();
        PackageManager::from_id(initial.to_string().as_str())
    }

    /// Whether any answer-bearing flag was used, which makes the run
    /// non-interactive.
    pub fn flags_used(&self) -> bool {
        self.target().is_some()
            || self.std.is_some()
            || self.examples
            || self.no_clang_tidy
            || self.no_cppcheck
    }
}

/// Parses command line arguments and returns the Args structure.
///
/// # Exits
/// * With status code 1 if required arguments are missing
/// * With clap's default error handling for other argument errors
pub fn get_args() -> Args {
    match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            if e.kind() == ErrorKind::MissingRequiredArgument {
                Args::command()
                    .help_template(
                        r#"{about-section}
{usage-heading} {usage}

{all-args}
{after-help}
"#,
                    )
                    .print_help()
                    .unwrap();
                std::process::exit(1);
            } else {
                e.exit();
            }
        }
    }
}
