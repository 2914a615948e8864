use std::path::Path;

use proptest::prelude::*;
use webdeck_core::names::{is_valid_project_name, is_valid_relative_path};
use webdeck_core::{PathResolver, WorkspaceError};

fn name_char() -> impl Strategy<Value = char> {
    prop_oneof![
        proptest::char::range('a', 'z'),
        proptest::char::range('A', 'Z'),
        proptest::char::range('0', '9'),
        Just('-'),
        Just('_'),
    ]
}

fn segment() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_.-]{1,8}".prop_filter("not a parent segment", |s| s != "..")
}

proptest! {
    #[test]
    fn names_from_allowed_charset_are_valid(
        chars in proptest::collection::vec(name_char(), 0..24),
        anchor in proptest::char::range('a', 'z'),
        pos in 0usize..24,
    ) {
        let mut chars = chars;
        let at = pos.min(chars.len());
        chars.insert(at, anchor);
        let name: String = chars.into_iter().collect();
        prop_assert!(is_valid_project_name(&name));
    }

    #[test]
    fn any_foreign_character_invalidates_a_name(
        prefix in "[a-z0-9_-]{0,8}",
        bad in prop_oneof![Just(' '), Just('/'), Just('.'), Just('\\'), Just(':'), Just('é')],
        suffix in "[a-z0-9_-]{0,8}",
    ) {
        let name = format!("{prefix}{bad}{suffix}");
        prop_assert!(!is_valid_project_name(&name));
    }

    #[test]
    fn parent_segment_anywhere_invalidates_a_path(
        before in proptest::collection::vec(segment(), 0..4),
        after in proptest::collection::vec(segment(), 0..4),
        backslash in any::<bool>(),
    ) {
        let mut parts = before;
        parts.push("..".to_string());
        parts.extend(after);
        let sep = if backslash { "\\" } else { "/" };
        let path = parts.join(sep);
        prop_assert!(!is_valid_relative_path(&path));
    }

    #[test]
    fn escaping_relative_paths_fail_to_resolve(
        inner in proptest::collection::vec("[a-z]{1,6}", 0..3),
        extra_ups in 1usize..4,
        mixed in any::<bool>(),
    ) {
        let tmp = tempfile::tempdir().expect("tempdir");
        let root = tmp.path().join("demo");
        std::fs::create_dir_all(&root).expect("root");

        let mut parts: Vec<String> = inner.clone();
        for _ in 0..(inner.len() + extra_ups) {
            parts.push("..".to_string());
        }
        parts.push("etc".to_string());
        parts.push("passwd".to_string());
        let sep = if mixed { "\\" } else { "/" };
        let rel = parts.join(sep);

        let err = PathResolver::os().resolve(&root, &rel).unwrap_err();
        prop_assert!(matches!(err, WorkspaceError::PathTraversal(_)));
        prop_assert!(!Path::new(&root).join("etc").exists());
    }
}
