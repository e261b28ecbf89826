//! Assertion helpers for tests.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use hranol::codec::{FileCodec, ImageCodec};
use hranol::services::MANIFEST_FILE_NAME;
use pretty_assertions::assert_eq;

/// Names of the entries of `dir`
pub fn entry_names(dir: &Path) -> BTreeSet<String> {
    fs::read_dir(dir)
        .unwrap_or_else(|e| panic!("Failed to list {}: {e}", dir.display()))
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect()
}

/// Assert the image at `path` decodes to exactly `expected`
pub fn assert_samples(path: &Path, expected: &[u8]) {
    let image = FileCodec
        .decode(path)
        .unwrap_or_else(|e| panic!("Expected a readable image at {}: {e}", path.display()));
    assert_eq!(
        image.as_slice(),
        expected,
        "Unexpected samples in {}",
        path.display()
    );
}

/// Assert `dest` holds a manifest listing exactly `descriptions`
pub fn assert_manifest(dest: &Path, descriptions: &[&str]) {
    let text = fs::read_to_string(dest.join(MANIFEST_FILE_NAME))
        .unwrap_or_else(|e| panic!("Expected a manifest in {}: {e}", dest.display()));
    let mut lines = text.lines();

    let stamp = lines.next().unwrap_or_default();
    assert!(
        stamp.starts_with("Filtered on "),
        "Unexpected first line: {stamp}"
    );
    assert_eq!(lines.next(), Some("Filters used:"));

    let listed: Vec<String> = lines.map(str::to_string).collect();
    let expected: Vec<String> = descriptions.iter().map(|d| format!(" - {d}")).collect();
    assert_eq!(listed, expected);
}

/// Assert no output folder with `prefix` was created directly in `dir`
pub fn assert_no_output(dir: &Path, prefix: &str) {
    let outputs: Vec<String> = entry_names(dir)
        .into_iter()
        .filter(|name| name.starts_with(prefix))
        .collect();
    assert!(
        outputs.is_empty(),
        "Expected no output in {}, found {outputs:?}",
        dir.display()
    );
}
