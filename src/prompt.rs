//! User input and interaction handling.
//! Collects the project answers interactively when no answer-bearing
//! flags were passed on the command line.

use dialoguer::{Confirm, Input, Select};

use crate::config::{
    is_semver, is_valid_name, Answers, Language, PackageManager, TargetType,
};
use crate::error::{Error, Result};

/// Trait for interactive prompting, so tests and non-interactive callers
/// can substitute their own implementation.
pub trait Prompter {
    fn input(&self, prompt: &str, default: &str) -> Result<String>;
    fn confirm(&self, prompt: &str, default: bool) -> Result<bool>;
    fn select(&self, prompt: &str, items: &[String], default: usize) -> Result<usize>;
}

/// Dialoguer-backed prompter used by the CLI.
pub struct DialoguerPrompter;

impl DialoguerPrompter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DialoguerPrompter {
    fn default() -> Self {
        DialoguerPrompter::new()
    }
}

impl Prompter for DialoguerPrompter {
    fn input(&self, prompt: &str, default: &str) -> Result<String> {
        Input::new()
            .with_prompt(prompt)
            .default(default.to_string())
            .allow_empty(true)
            .interact_text()
            .map_err(|e| Error::Config(e.to_string()))
    }

    fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
        Confirm::new()
            .with_prompt(prompt)
            .default(default)
            .interact()
            .map_err(|e| Error::Config(e.to_string()))
    }

    fn select(&self, prompt: &str, items: &[String], default: usize) -> Result<usize> {
        Select::new()
            .with_prompt(prompt)
            .items(items)
            .default(default)
            .interact()
            .map_err(|e| Error::Config(e.to_string()))
    }
}

/// Asks for every project answer, seeding defaults from the destination
/// path name and any package manager passed on the command line.
pub fn ask_answers(
    prompt: &dyn Prompter,
    language: Language,
    default_name: &str,
    pm_seed: Option<PackageManager>,
) -> Result<Answers> {
    println!("kiln is going to generate a {} project\n", language.display_name());

    let name = loop {
        let value = prompt.input("Project name", default_name)?;
        if is_valid_name(&value) {
            break value;
        }
        println!("Use only characters matching the [0-9a-zA-Z-_] pattern");
    };

    let version = loop {
        let value = prompt.input("Project version", "0.1.0")?;
        if is_semver(&value) {
            break value;
        }
        println!("Use Semantic Versioning; visit https://semver.org/ for more information");
    };

    let description = prompt.input("Short description", "")?;
    let homepage = prompt.input("Homepage URL", "https://example.com/")?;

    let standards: Vec<String> =
        language.standards().iter().map(|s| s.to_string()).collect();
    let default_std = language
        .standards()
        .iter()
        .position(|s| *s == language.default_standard())
        .unwrap_or(0);
    let std_index = prompt.select(
        &format!("{} standard", language.display_name()),
        &standards,
        default_std,
    )?;
    let std = standards[std_index].clone();

    let targets = [
        "executable".to_string(),
        "static/shared library".to_string(),
        "header-only library".to_string(),
    ];
    let target = match prompt.select("Target type", &targets, 0)? {
        0 => TargetType::Executable,
        1 => TargetType::Library,
        _ => TargetType::HeaderOnly,
    };

    let use_clang_tidy =
        prompt.confirm("Add clang-tidy to local dev preset", true)?;
    let use_cppcheck = prompt.confirm("Add cppcheck to local dev preset", true)?;

    let managers =
        ["none".to_string(), "conan".to_string(), "vcpkg".to_string()];
    let pm_default = match pm_seed {
        Some(PackageManager::Conan) => 1,
        Some(PackageManager::Vcpkg) => 2,
        _ => 0,
    };
    let package_manager =
        match prompt.select("Package manager", &managers, pm_default)? {
            1 => PackageManager::Conan,
            2 => PackageManager::Vcpkg,
            _ => PackageManager::None,
        };

    // Executables never get an example tree, so don't ask.
    let examples = if target != TargetType::Executable {
        prompt.confirm("Generate example code", false)?
    } else {
        false
    };

    Ok(Answers {
        name,
        version,
        description,
        homepage,
        language,
        std,
        target,
        package_manager,
        use_clang_tidy,
        use_cppcheck,
        examples,
    })
}
