//! Configuration mapping for kiln templates.
//! The mapping is the sole variable scope for every rendered template and
//! every install predicate. It is built once per invocation from validated
//! answers and is read-only during materialization.

use indexmap::IndexMap;
use regex::Regex;
use serde_json::Value;

use crate::error::{Error, Result};

/// The configuration mapping: string keys to scalar values, with
/// deterministic iteration order.
pub type Context = IndexMap<String, Value>;

/// Looks up a key in the context, failing with `UnknownKey` if absent.
pub fn lookup<'a>(context: &'a Context, key: &str) -> Result<&'a Value> {
    context.get(key).ok_or_else(|| Error::UnknownKey(key.to_string()))
}

/// Standard boolean coercion for configuration values. A present `null`
/// is falsy; absence is handled by `lookup` as an error.
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Canonical string form of a configuration value, used by interpolation.
pub fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

/// The two project languages kiln can scaffold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    C,
    Cpp,
}

impl Language {
    pub fn display_name(self) -> &'static str {
        match self {
            Language::C => "C",
            Language::Cpp => "C++",
        }
    }

    /// Accepted language standards, oldest first.
    pub fn standards(self) -> &'static [&'static str] {
        match self {
            Language::C => &["90", "99", "11", "17", "23"],
            Language::Cpp => &["11", "14", "17", "20"],
        }
    }

    pub fn default_standard(self) -> &'static str {
        match self {
            Language::C => "99",
            Language::Cpp => "17",
        }
    }
}

/// Target type of the generated project.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetType {
    Executable,
    Library,
    HeaderOnly,
}

impl TargetType {
    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "e" => Some(TargetType::Executable),
            "s" => Some(TargetType::Library),
            "h" => Some(TargetType::HeaderOnly),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageManager {
    None,
    Conan,
    Vcpkg,
}

impl PackageManager {
    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "n" => Some(PackageManager::None),
            "c" => Some(PackageManager::Conan),
            "v" => Some(PackageManager::Vcpkg),
            _ => None,
        }
    }
}

/// Validated answers collected from flags or interactive prompts.
#[derive(Debug, Clone)]
pub struct Answers {
    pub name: String,
    pub version: String,
    pub description: String,
    pub homepage: String,
    pub language: Language,
    pub std: String,
    pub target: TargetType,
    pub package_manager: PackageManager,
    pub use_clang_tidy: bool,
    pub use_cppcheck: bool,
    pub examples: bool,
}

/// Checks whether a project name is acceptable: starts with a letter,
/// uses only `[0-9a-zA-Z-_]`, has no doubled separators, and is not one
/// of the names reserved by the generated build scripts.
pub fn is_valid_name(name: &str) -> bool {
    let special = ["test", "lib"];
    let shape = Regex::new("^[a-zA-Z][0-9a-zA-Z-_]+$").unwrap();
    let doubled = Regex::new("[-_]{2,}").unwrap();
    !special.contains(&name) && shape.is_match(name) && !doubled.is_match(name)
}

/// Checks whether a version string is a dotted numeric prefix, the form
/// CMake's `project()` accepts.
pub fn is_semver(version: &str) -> bool {
    Regex::new(r"^\d+(\.\d+){0,3}").unwrap().is_match(version)
}

fn detected_os() -> &'static str {
    if cfg!(target_os = "windows") {
        "win64"
    } else if cfg!(target_os = "linux") {
        "linux"
    } else if cfg!(target_os = "macos") {
        "darwin"
    } else {
        "unknown"
    }
}

fn cpu_count() -> usize {
    std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1)
}

/// Builds the full configuration mapping from validated answers,
/// computing every derived key the templates and predicates consume.
pub fn build_context(answers: &Answers) -> Result<Context> {
    if !is_valid_name(&answers.name) {
        return Err(Error::Config(format!("'{}' is not a valid name", answers.name)));
    }
    if !is_semver(&answers.version) {
        return Err(Error::Config(format!(
            "'{}' is not a valid version",
            answers.version
        )));
    }
    if !answers.language.standards().contains(&answers.std.as_str()) {
        return Err(Error::Config(format!(
            "'{}' is not a valid {} standard",
            answers.std,
            answers.language.display_name()
        )));
    }

    let c = answers.language == Language::C;
    let cpp = !c;
    let exe = answers.target == TargetType::Executable;
    let lib = answers.target == TargetType::Library;
    let header = answers.target == TargetType::HeaderOnly;
    let conan = answers.package_manager == PackageManager::Conan;
    let vcpkg = answers.package_manager == PackageManager::Vcpkg;
    let pm = conan || vcpkg;

    // Executables never carry an example tree.
    let examples = !exe && answers.examples;
    let c_header = c && header;
    let catch3 = cpp && answers.std != "11" && pm;
    let c90 = c && answers.std == "90";
    let c99 = c && !c90;
    let modules = cpp && answers.std == "20";
    let cmake_321 = c && answers.std.parse::<u32>().map(|n| n >= 17).unwrap_or(false);

    let (cpp_std, msvc_cpp_std) = if conan {
        if c {
            ("11".to_string(), "14".to_string())
        } else {
            let msvc = if answers.std == "11" { "14" } else { &answers.std };
            (answers.std.clone(), msvc.to_string())
        }
    } else {
        (String::new(), String::new())
    };

    let pm_name = if conan {
        "conan"
    } else if vcpkg {
        "vcpkg"
    } else {
        ""
    };

    let mut context = Context::new();
    let mut set = |key: &str, value: Value| {
        context.insert(key.to_string(), value);
    };

    set("name", Value::String(answers.name.clone()));
    set("version", Value::String(answers.version.clone()));
    set("description", Value::String(answers.description.clone()));
    set("homepage", Value::String(answers.homepage.clone()));
    set("std", Value::String(answers.std.clone()));
    set("use_clang_tidy", Value::Bool(answers.use_clang_tidy));
    set("use_cppcheck", Value::Bool(answers.use_cppcheck));
    set("examples", Value::Bool(examples));
    set("c_examples", Value::Bool(c && examples));
    set("cpp_examples", Value::Bool(cpp && examples));
    set("os", Value::String(detected_os().to_string()));
    set("c", Value::Bool(c));
    set("cpp", Value::Bool(cpp));
    set("c_header", Value::Bool(c_header));
    set("include_source", Value::Bool(exe));
    set("has_source", Value::Bool(!header));
    set("cpus", Value::from(cpu_count()));
    set("exe", Value::Bool(exe));
    set("lib", Value::Bool(lib));
    set("header", Value::Bool(header));
    set("pm", Value::Bool(pm));
    set("pm_name", Value::String(pm_name.to_string()));
    set("conan", Value::Bool(conan));
    set("vcpkg", Value::Bool(vcpkg));
    set("catch3", Value::Bool(catch3));
    set("cpp_std", Value::String(cpp_std));
    set("msvc_cpp_std", Value::String(msvc_cpp_std));
    set("c90", Value::Bool(c90));
    set("c99", Value::Bool(c99));
    set("cmake_321", Value::Bool(cmake_321));
    set("modules", Value::Bool(modules));
    set(
        "uc_name",
        Value::String(answers.name.to_uppercase().replace('-', "_")),
    );

    Ok(context)
}
