//! The built-in template pack.
//!
//! The templates ship compiled into the binary; at runtime they are
//! exposed through the same tree abstraction as an on-disk pack, so the
//! materializer never knows the difference.

use crate::config::{Language, TargetType};
use crate::tree::MemTree;

/// Every packed template, keyed by logical path.
const PACK: &[(&str, &str)] = &[
    ("templates/c/common/cmake/c-standard.cmake", include_str!("../templates/c/common/cmake/c-standard.cmake")),
    ("templates/c/executable/CMakeLists.txt", include_str!("../templates/c/executable/CMakeLists.txt")),
    ("templates/c/executable/source/lib.c", include_str!("../templates/c/executable/source/lib.c")),
    ("templates/c/executable/source/lib.h", include_str!("../templates/c/executable/source/lib.h")),
    ("templates/c/executable/source/main.c", include_str!("../templates/c/executable/source/main.c")),
    ("templates/c/executable/test/CMakeLists.txt", include_str!("../templates/c/executable/test/CMakeLists.txt")),
    ("templates/c/executable/test/source/__name___test.c", include_str!("../templates/c/executable/test/source/__name___test.c")),
    ("templates/c/header/CMakeLists.txt", include_str!("../templates/c/header/CMakeLists.txt")),
    ("templates/c/header/example/CMakeLists.txt", include_str!("../templates/c/header/example/CMakeLists.txt")),
    ("templates/c/header/example/empty_example.c", include_str!("../templates/c/header/example/empty_example.c")),
    ("templates/c/header/include/__name__/__name__.h", include_str!("../templates/c/header/include/__name__/__name__.h")),
    ("templates/c/header/test/CMakeLists.txt", include_str!("../templates/c/header/test/CMakeLists.txt")),
    ("templates/c/header/test/source/__name___test.c", include_str!("../templates/c/header/test/source/__name___test.c")),
    ("templates/c/header/test/source/header_impl.c", include_str!("../templates/c/header/test/source/header_impl.c")),
    ("templates/c/shared/CMakeLists.txt", include_str!("../templates/c/shared/CMakeLists.txt")),
    ("templates/c/shared/example/CMakeLists.txt", include_str!("../templates/c/shared/example/CMakeLists.txt")),
    ("templates/c/shared/example/empty_example.c", include_str!("../templates/c/shared/example/empty_example.c")),
    ("templates/c/shared/include/__name__/__name__.h", include_str!("../templates/c/shared/include/__name__/__name__.h")),
    ("templates/c/shared/source/__name__.c", include_str!("../templates/c/shared/source/__name__.c")),
    ("templates/c/shared/test/CMakeLists.txt", include_str!("../templates/c/shared/test/CMakeLists.txt")),
    ("templates/c/shared/test/source/__name___test.c", include_str!("../templates/c/shared/test/source/__name___test.c")),
    ("templates/common/.github/workflows/ci.yml", include_str!("../templates/common/.github/workflows/ci.yml")),
    ("templates/common/BUILDING.md", include_str!("../templates/common/BUILDING.md")),
    ("templates/common/HACKING.md", include_str!("../templates/common/HACKING.md")),
    ("templates/common/README.md", include_str!("../templates/common/README.md")),
    ("templates/common/cmake/install-config.cmake", include_str!("../templates/common/cmake/install-config.cmake")),
    ("templates/common/cmake/project-is-top-level.cmake", include_str!("../templates/common/cmake/project-is-top-level.cmake")),
    ("templates/common/cmake/windows-set-path.cmake", include_str!("../templates/common/cmake/windows-set-path.cmake")),
    ("templates/common/conanfile.py", include_str!("../templates/common/conanfile.py")),
    ("templates/common/env.bat", include_str!("../templates/common/env.bat")),
    ("templates/common/env.ps1", include_str!("../templates/common/env.ps1")),
    ("templates/common/scripts/conan-profile.py", include_str!("../templates/common/scripts/conan-profile.py")),
    ("templates/common/vcpkg.json", include_str!("../templates/common/vcpkg.json")),
    ("templates/executable/CMakeLists.txt", include_str!("../templates/executable/CMakeLists.txt")),
    ("templates/executable/source/lib.cpp", include_str!("../templates/executable/source/lib.cpp")),
    ("templates/executable/source/lib.hpp", include_str!("../templates/executable/source/lib.hpp")),
    ("templates/executable/source/main.cpp", include_str!("../templates/executable/source/main.cpp")),
    ("templates/executable/test/CMakeLists.txt", include_str!("../templates/executable/test/CMakeLists.txt")),
    ("templates/executable/test/source/__name___test.cpp", include_str!("../templates/executable/test/source/__name___test.cpp")),
    ("templates/header/CMakeLists.txt", include_str!("../templates/header/CMakeLists.txt")),
    ("templates/header/example/CMakeLists.txt", include_str!("../templates/header/example/CMakeLists.txt")),
    ("templates/header/example/empty_example.cpp", include_str!("../templates/header/example/empty_example.cpp")),
    ("templates/header/include/__name__/__name__.hpp", include_str!("../templates/header/include/__name__/__name__.hpp")),
    ("templates/header/test/CMakeLists.txt", include_str!("../templates/header/test/CMakeLists.txt")),
    ("templates/header/test/source/__name___test.cpp", include_str!("../templates/header/test/source/__name___test.cpp")),
    ("templates/shared/CMakeLists.txt", include_str!("../templates/shared/CMakeLists.txt")),
    ("templates/shared/example/CMakeLists.txt", include_str!("../templates/shared/example/CMakeLists.txt")),
    ("templates/shared/example/empty_example.cpp", include_str!("../templates/shared/example/empty_example.cpp")),
    ("templates/shared/include/__name__/__name__.hpp", include_str!("../templates/shared/include/__name__/__name__.hpp")),
    ("templates/shared/source/__name__.cpp", include_str!("../templates/shared/source/__name__.cpp")),
    ("templates/shared/test/CMakeLists.txt", include_str!("../templates/shared/test/CMakeLists.txt")),
    ("templates/shared/test/source/__name___test.cpp", include_str!("../templates/shared/test/source/__name___test.cpp")),
];

/// Builds the in-memory tree over the packed templates.
pub fn pack() -> MemTree {
    MemTree::new(PACK.iter().copied())
}

/// The source roots to overlay for a given language and target type, in
/// default processing order: the type-specific tree first, then the
/// C-specific common tree, then the language-common tree filling gaps.
pub fn select_roots(language: Language, target: TargetType) -> Vec<String> {
    let type_dir = match target {
        TargetType::Executable => "executable/",
        TargetType::HeaderOnly => "header/",
        TargetType::Library => "shared/",
    };
    let lang_prefix = match language {
        Language::C => "c/",
        Language::Cpp => "",
    };

    let mut roots = vec![format!("templates/{}{}", lang_prefix, type_dir)];
    if language == Language::C {
        roots.push("templates/c/common/".to_string());
    }
    roots.push("templates/common/".to_string());
    roots
}
