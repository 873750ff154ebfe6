use std::fs;

use kiln::config::Context;
use kiln::error::Error;
use kiln::processor::Processor;
use kiln::template::TemplateRenderer;
use kiln::tree::{DirTree, MemTree, TreeEntry};
use serde_json::{json, Value};
use tempfile::TempDir;

/// The keys every walk needs: the project name plus the flags the path
/// transform consults for each file.
fn context(extra: &[(&str, Value)]) -> Context {
    let mut ctx: Context = [
        ("name".to_string(), json!("proj")),
        ("c".to_string(), json!(false)),
        ("pm".to_string(), json!(false)),
    ]
    .into_iter()
    .collect();
    for (k, v) in extra {
        ctx.insert(k.to_string(), v.clone());
    }
    ctx
}

fn materialize(tree: &MemTree, roots: &[&str], dest: &std::path::Path, ctx: &Context, overwrite: bool) -> kiln::error::Result<()> {
    let roots = roots
        .iter()
        .map(|prefix| tree.root(prefix))
        .collect::<kiln::error::Result<Vec<_>>>()?;
    let refs: Vec<&dyn TreeEntry> = roots.iter().map(|r| r as &dyn TreeEntry).collect();
    Processor::new(dest, ctx, &TemplateRenderer, overwrite)?.materialize(&refs)
}

#[test]
fn test_renders_files_into_destination() {
    let tree = MemTree::new([
        ("root/hello.txt", "Hello {= name =}!"),
        ("root/sub/plain.txt", "no markers"),
    ]);
    let dest = TempDir::new().unwrap();
    let ctx = context(&[]);

    materialize(&tree, &["root/"], dest.path(), &ctx, false).unwrap();

    let hello = fs::read_to_string(dest.path().join("hello.txt")).unwrap();
    assert_eq!(hello, "Hello proj!");
    let plain = fs::read_to_string(dest.path().join("sub/plain.txt")).unwrap();
    assert_eq!(plain, "no markers");
}

#[test]
fn test_name_placeholder_substitution_in_entry_names() {
    let tree = MemTree::new([
        ("root/__name__.h", "content"),
        ("root/include/__name__/api.h", "api"),
    ]);
    let dest = TempDir::new().unwrap();
    let ctx = context(&[]);

    materialize(&tree, &["root/"], dest.path(), &ctx, false).unwrap();

    assert!(dest.path().join("proj.h").is_file());
    assert!(dest.path().join("include/proj/api.h").is_file());
}

#[test]
fn test_non_overwrite_is_idempotent() {
    let tree = MemTree::new([("root/file.txt", "{= name =}")]);
    let dest = TempDir::new().unwrap();
    let ctx = context(&[]);

    materialize(&tree, &["root/"], dest.path(), &ctx, false).unwrap();
    let target = dest.path().join("file.txt");
    fs::write(&target, "user edit").unwrap();

    materialize(&tree, &["root/"], dest.path(), &ctx, false).unwrap();
    assert_eq!(fs::read_to_string(&target).unwrap(), "user edit");
}

#[test]
fn test_overwrite_replaces_user_edits() {
    let tree = MemTree::new([("root/file.txt", "{= name =}")]);
    let dest = TempDir::new().unwrap();
    let ctx = context(&[]);

    materialize(&tree, &["root/"], dest.path(), &ctx, false).unwrap();
    let target = dest.path().join("file.txt");
    fs::write(&target, "user edit").unwrap();

    materialize(&tree, &["root/"], dest.path(), &ctx, true).unwrap();
    assert_eq!(fs::read_to_string(&target).unwrap(), "proj");
}

#[test]
fn test_two_runs_produce_identical_trees() {
    let tree = MemTree::new([
        ("root/a.txt", "{= name =}"),
        ("root/dir/b.txt", "b"),
    ]);
    let ctx = context(&[]);
    let first = TempDir::new().unwrap();
    let second = TempDir::new().unwrap();

    materialize(&tree, &["root/"], first.path(), &ctx, false).unwrap();
    materialize(&tree, &["root/"], second.path(), &ctx, false).unwrap();
    // Re-running over an existing tree must be a no-op.
    materialize(&tree, &["root/"], first.path(), &ctx, false).unwrap();

    assert!(!dir_diff::is_different(first.path(), second.path()).unwrap());
}

#[test]
fn test_gated_subtree_is_never_visited() {
    // The gated file would fail to compile if it were ever rendered.
    let tree = MemTree::new([
        ("root/keep.txt", "kept"),
        ("root/example/broken.txt", "{% if oops %}unterminated"),
    ]);
    let dest = TempDir::new().unwrap();
    let ctx = context(&[("cpp_examples", json!(false))]);

    materialize(&tree, &["root/"], dest.path(), &ctx, false).unwrap();

    assert!(dest.path().join("keep.txt").is_file());
    assert!(!dest.path().join("example").exists());
}

#[test]
fn test_example_subtree_installed_when_enabled() {
    let tree = MemTree::new([("root/example/ex.txt", "{= name =}")]);
    let dest = TempDir::new().unwrap();
    let ctx = context(&[("cpp_examples", json!(true))]);

    materialize(&tree, &["root/"], dest.path(), &ctx, false).unwrap();
    assert_eq!(
        fs::read_to_string(dest.path().join("example/ex.txt")).unwrap(),
        "proj"
    );
}

#[test]
fn test_c_example_gating_requires_c_path() {
    let tree = MemTree::new([
        ("pack/c/shared/example/a.txt", "a"),
        ("pack/shared/example/b.txt", "b"),
    ]);
    let dest = TempDir::new().unwrap();
    let ctx = context(&[("c", json!(true)), ("c_examples", json!(true))]);

    materialize(
        &tree,
        &["pack/c/shared/", "pack/shared/"],
        dest.path(),
        &ctx,
        false,
    )
    .unwrap();

    // Only the example tree under a /c/ path installs for a C project.
    assert!(dest.path().join("example/a.txt").is_file());
    assert!(!dest.path().join("example/b.txt").exists());
}

#[test]
fn test_scripts_subtree_requires_conan() {
    let tree = MemTree::new([("root/scripts/setup.py", "setup")]);
    let ctx = context(&[("conan", json!(false))]);
    let dest = TempDir::new().unwrap();
    materialize(&tree, &["root/"], dest.path(), &ctx, false).unwrap();
    assert!(!dest.path().join("scripts").exists());

    let ctx = context(&[("conan", json!(true))]);
    let dest = TempDir::new().unwrap();
    materialize(&tree, &["root/"], dest.path(), &ctx, false).unwrap();
    assert!(dest.path().join("scripts/setup.py").is_file());
}

#[test]
fn test_first_listed_root_wins_without_overwrite() {
    let tree = MemTree::new([
        ("specific/a.txt", "specific"),
        ("common/a.txt", "common"),
    ]);
    let dest = TempDir::new().unwrap();
    let ctx = context(&[]);

    materialize(&tree, &["specific/", "common/"], dest.path(), &ctx, false).unwrap();
    assert_eq!(
        fs::read_to_string(dest.path().join("a.txt")).unwrap(),
        "specific"
    );
}

#[test]
fn test_first_listed_root_wins_with_overwrite() {
    // With overwrite the roots are processed in reverse, so the first
    // listed root writes last and still wins.
    let tree = MemTree::new([
        ("specific/a.txt", "specific"),
        ("common/a.txt", "common"),
    ]);
    let dest = TempDir::new().unwrap();
    let ctx = context(&[]);

    materialize(&tree, &["specific/", "common/"], dest.path(), &ctx, true).unwrap();
    assert_eq!(
        fs::read_to_string(dest.path().join("a.txt")).unwrap(),
        "specific"
    );
}

#[test]
fn test_c_test_files_become_cpp_under_package_manager() {
    let tree = MemTree::new([("root/test/source/proj_test.c", "test body")]);
    let dest = TempDir::new().unwrap();
    let ctx = context(&[("c", json!(true)), ("pm", json!(true))]);

    materialize(&tree, &["root/"], dest.path(), &ctx, false).unwrap();

    assert!(dest.path().join("test/source/proj_test.cpp").is_file());
    assert!(!dest.path().join("test/source/proj_test.c").exists());
}

#[test]
fn test_render_failure_names_destination_path() {
    let tree = MemTree::new([("root/bad.txt", "{= missing =}")]);
    let dest = TempDir::new().unwrap();
    let ctx = context(&[]);

    let err = materialize(&tree, &["root/"], dest.path(), &ctx, false).unwrap_err();
    match err {
        Error::Render { path, source } => {
            assert!(path.ends_with("bad.txt"));
            assert!(matches!(*source, Error::UnknownKey(_)));
        }
        other => panic!("expected Render error, got {:?}", other),
    }
}

#[test]
fn test_destination_conflict_on_directory() {
    let tree = MemTree::new([("root/sub/file.txt", "x")]);
    let dest = TempDir::new().unwrap();
    fs::write(dest.path().join("sub"), "not a directory").unwrap();
    let ctx = context(&[]);

    let err = materialize(&tree, &["root/"], dest.path(), &ctx, false).unwrap_err();
    assert!(matches!(err, Error::DestinationConflict { .. }));
}

#[test]
fn test_materializes_from_directory_tree() {
    let source = TempDir::new().unwrap();
    fs::create_dir_all(source.path().join("root/sub")).unwrap();
    fs::write(source.path().join("root/__name__.txt"), "{= name =}").unwrap();
    fs::write(source.path().join("root/sub/inner.txt"), "inner").unwrap();

    let tree = DirTree::new(source.path());
    let root = tree.root("root/").unwrap();
    let dest = TempDir::new().unwrap();
    let ctx = context(&[]);

    Processor::new(dest.path(), &ctx, &TemplateRenderer, false)
        .unwrap()
        .materialize(&[&root as &dyn TreeEntry])
        .unwrap();

    assert_eq!(
        fs::read_to_string(dest.path().join("proj.txt")).unwrap(),
        "proj"
    );
    assert!(dest.path().join("sub/inner.txt").is_file());
}

#[test]
fn test_missing_directory_tree_root_is_source_unavailable() {
    let source = TempDir::new().unwrap();
    let tree = DirTree::new(source.path());
    let err = tree.root("nowhere/").unwrap_err();
    assert!(matches!(err, Error::SourceUnavailable(_)));
}

#[test]
fn test_unknown_root_is_source_unavailable() {
    let tree = MemTree::new([("root/a.txt", "a")]);
    let err = tree.root("nowhere/").unwrap_err();
    assert!(matches!(err, Error::SourceUnavailable(_)));
}
