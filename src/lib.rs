//! kiln is an opinionated project scaffolding tool for C and C++.
//! It renders a packaged template tree into a new project directory,
//! parametrized by the answers the user gives (name, version, language
//! standard, target type, package manager).

/// Command-line interface module for the kiln application
pub mod cli;

/// Configuration mapping: answer validation, truthiness rules and the
/// derived keys every template and predicate consumes
pub mod config;

/// Error types and handling for the kiln application
pub mod error;

/// Restricted boolean expression evaluation for template conditionals
pub mod expr;

/// Git repository initialization for generated projects
pub mod git;

/// Logger configuration
pub mod logger;

/// Tree materialization: walks template source trees and writes the
/// rendered output tree to disk
pub mod processor;

/// User input and interaction handling
pub mod prompt;

/// Install predicates and path transforms gating which entries
/// materialize for a given configuration
pub mod rules;

/// Template compilation and rendering
/// Handles the `{= KEY =}` and `{% STATEMENT %}` marker forms
pub mod template;

/// The built-in template pack, compiled into the binary
pub mod templates;

/// Read-only source tree abstraction over packed and on-disk templates
pub mod tree;
