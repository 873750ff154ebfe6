//! kiln's main application entry point and orchestration logic.
//! Handles command-line argument parsing, answer collection, template
//! materialization and repository initialization.

use std::path::Path;

use kiln::{
    cli::{get_args, Args},
    config::{build_context, lookup, truthy, Answers, Context, Language, PackageManager, TargetType},
    error::{default_error_handler, Error, Result},
    git,
    logger::init_logger,
    processor::Processor,
    prompt::{ask_answers, DialoguerPrompter},
    template::TemplateRenderer,
    templates,
    tree::TreeEntry,
};

/// Main application entry point.
fn main() {
    let args = get_args();
    init_logger(args.verbose);

    if let Err(err) = run(args) {
        default_error_handler(err);
    }
}

/// Builds the answers from flags alone, without prompting. The name is
/// taken from the destination path and validated later by
/// `build_context`.
fn answers_from_flags(args: &Args, language: Language, name: &str) -> Answers {
    Answers {
        name: name.to_string(),
        version: "0.1.0".to_string(),
        description: String::new(),
        homepage: "https://example.com/".to_string(),
        language,
        std: args
            .std
            .clone()
            .unwrap_or_else(|| language.default_standard().to_string()),
        target: args.target().unwrap_or(TargetType::Executable),
        package_manager: args
            .selected_package_manager()
            .unwrap_or(PackageManager::None),
        use_clang_tidy: !args.no_clang_tidy,
        use_cppcheck: !args.no_cppcheck,
        examples: args.examples,
    }
}

/// Refuses to generate into a non-empty directory unless overwriting.
fn check_destination(path: &Path, overwrite: bool) -> Result<()> {
    if !overwrite && path.is_dir() && path.read_dir()?.next().is_some() {
        return Err(Error::Config(format!(
            "directory exists and is not empty: {}",
            path.display()
        )));
    }
    Ok(())
}

fn print_tips(context: &Context) -> Result<()> {
    let cmake_version = if truthy(lookup(context, "cmake_321")?) {
        "3.21"
    } else {
        "3.20"
    };
    println!(
        "\
To get started with developing the project, make sure you read the generated
HACKING.md and BUILDING.md files for how to build the project as a developer
or as a user respectively. There are also some details you may want to fill
in in the README.md and .github/workflows/ci.yml files.

Now make sure you have at least CMake {} installed for local development.

You are all set. Have fun programming and create something awesome!",
        cmake_version
    );
    Ok(())
}

/// Main application logic execution.
///
/// # Flow
/// 1. Validates the destination directory
/// 2. Collects answers from flags or interactive prompts
/// 3. Builds the configuration mapping with its derived keys
/// 4. Materializes the selected template roots
/// 5. Initializes a git repository (best effort)
fn run(args: Args) -> Result<()> {
    check_destination(&args.path, args.overwrite)?;

    let language = if args.c { Language::C } else { Language::Cpp };
    let default_name = args
        .path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("project")
        .to_string();

    let answers = if args.flags_used() {
        answers_from_flags(&args, language, &default_name)
    } else {
        let prompter = DialoguerPrompter::new();
        ask_answers(
            &prompter,
            language,
            &default_name,
            args.selected_package_manager(),
        )?
    };

    let context = build_context(&answers)?;

    let pack = templates::pack();
    let prefixes = templates::select_roots(language, answers.target);
    let roots = prefixes
        .iter()
        .map(|prefix| pack.root(prefix))
        .collect::<Result<Vec<_>>>()?;
    let root_refs: Vec<&dyn TreeEntry> =
        roots.iter().map(|root| root as &dyn TreeEntry).collect();

    let renderer = TemplateRenderer;
    let processor = Processor::new(&args.path, &context, &renderer, args.overwrite)?;
    processor.materialize(&root_refs)?;

    if let Err(err) = git::init_repository(&args.path) {
        log::warn!("could not initialize a git repository: {}", err);
    }

    print_tips(&context)?;
    Ok(())
}
