//! Property-based tests for materialization.
//!
//! These tests use proptest to generate arbitrary trees and check that the
//! destination always mirrors them exactly.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use modstrap_core::BootstrapConfig;
use modstrap_core::MemoryTree;
use modstrap_core::ResourceTree;
use modstrap_core::copy::CopyBuffer;
use modstrap_core::copy::copy_with_buffer;
use modstrap_core::list_tree;
use modstrap_core::materialize;
use modstrap_core::verify_tree;
use proptest::prelude::*;
use std::collections::BTreeMap;
use std::fs;
use std::io::Cursor;
use tempfile::TempDir;

/// Relative file paths of one to four lowercase components.
fn rel_path() -> impl Strategy<Value = String> {
    prop::collection::vec("[a-z]{1,6}", 1..=4).prop_map(|parts| parts.join("/"))
}

/// Trees whose file paths never use another file as a directory.
fn tree_strategy() -> impl Strategy<Value = BTreeMap<String, Vec<u8>>> {
    prop::collection::btree_map(rel_path(), prop::collection::vec(any::<u8>(), 0..512), 0..24)
        .prop_map(|files| {
            let keys: Vec<String> = files.keys().cloned().collect();
            files
                .into_iter()
                .filter(|(path, _)| {
                    !keys
                        .iter()
                        .any(|other| other.starts_with(&format!("{path}/")))
                })
                .collect()
        })
}

fn build_tree(files: &BTreeMap<String, Vec<u8>>) -> MemoryTree {
    let mut tree = MemoryTree::new("module");
    for (path, data) in files {
        tree.insert_file(path, data.clone());
    }
    tree
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    /// Every file is written byte-for-byte and nothing else appears.
    #[test]
    fn prop_round_trip_fidelity(files in tree_strategy()) {
        let temp = TempDir::new().expect("failed to create temp dir");
        let dest = temp.path().join("module");
        let tree = build_tree(&files);

        let report = materialize(&tree, &BootstrapConfig::default().with_dest_root(&dest)).unwrap();
        prop_assert_eq!(report.files_written, files.len());

        for (path, data) in &files {
            prop_assert_eq!(&fs::read(dest.join(path)).unwrap(), data);
        }
        let verification = verify_tree(&tree, &dest).unwrap();
        prop_assert!(verification.is_clean(), "{:?}", verification.issues);
    }

    /// A second run over the same destination leaves it equal to the tree.
    #[test]
    fn prop_idempotent(files in tree_strategy()) {
        let temp = TempDir::new().expect("failed to create temp dir");
        let dest = temp.path().join("module");
        let tree = build_tree(&files);
        let config = BootstrapConfig::default().with_dest_root(&dest);

        materialize(&tree, &config).unwrap();
        materialize(&tree, &config).unwrap();

        prop_assert!(verify_tree(&tree, &dest).unwrap().is_clean());
    }

    /// Every directory precedes its descendants in walk order.
    #[test]
    fn prop_walk_is_preorder(files in tree_strategy()) {
        let tree = build_tree(&files);
        let entries = tree.walk().unwrap();
        for (i, entry) in entries.iter().enumerate() {
            if let Some(parent) = entry.path.parent() {
                if entry.path != tree.root() {
                    let pos = entries.iter().position(|e| e.path == parent);
                    prop_assert!(pos.is_some_and(|p| p < i));
                }
            }
        }
    }

    /// Listing totals agree with the generated files.
    #[test]
    fn prop_list_totals(files in tree_strategy()) {
        let manifest = list_tree(&build_tree(&files)).unwrap();
        let size: u64 = files.values().map(|d| d.len() as u64).sum();
        prop_assert_eq!(manifest.total_files, files.len());
        prop_assert_eq!(manifest.total_size, size);
    }

    /// Buffered copy preserves data for any buffer size.
    #[test]
    fn prop_copy_preserves_data(data in prop::collection::vec(any::<u8>(), 0..10_000)) {
        let mut reader = Cursor::new(&data);
        let mut writer = Vec::new();
        let mut buffer = CopyBuffer::new();
        let mut seen = 0;

        let copied =
            copy_with_buffer(&mut reader, &mut writer, &mut buffer, |n| seen += n).unwrap();

        prop_assert_eq!(copied, data.len() as u64);
        prop_assert_eq!(seen, data.len() as u64);
        prop_assert_eq!(writer, data);
    }
}
