//! End-to-end tests: real folders in, filtered folders and manifests out.

mod common;

use std::collections::BTreeSet;

use common::fixtures::{config_for, run_batch, RAMP};
use common::{assert_manifest, assert_no_output, assert_samples, entry_names, ImageTree};
use gray_filters::GrayBuffer;
use hranol::codec::{FileCodec, ImageCodec};
use hranol::models::MemoryStrategy;
use hranol::services::BatchSummary;
use pretty_assertions::assert_eq;

/// RAMP through the [10, 200] contrast table
const RAMP_RESCALED: [u8; 4] = [0, 120, 253, 255];

fn names(list: &[&str]) -> BTreeSet<String> {
    list.iter().map(|n| n.to_string()).collect()
}

#[test]
fn test_rescale_run() {
    let tree = ImageTree::new();
    let origin = tree.folder("run1");
    for name in ["a.png", "b.png", "c.png"] {
        tree.image(&format!("run1/{name}"), RAMP);
    }
    tree.file("run1/notes.txt", "exposure log");

    let mut config = config_for(&[origin.clone()]);
    config.filters.rescale_begin = Some(10);
    config.filters.rescale_end = Some(200);
    let summary = run_batch(&config);

    assert_eq!(
        summary,
        BatchSummary {
            processed: 1,
            empty: 0,
            failed: 0
        }
    );
    let dest = origin.join("fltrd_run1");
    assert_eq!(
        entry_names(&dest),
        names(&["a.png", "b.png", "c.png", "fltrd_info.txt"])
    );
    for name in ["a.png", "b.png", "c.png"] {
        assert_samples(&dest.join(name), &RAMP_RESCALED);
    }
    assert_manifest(&dest, &["Contrast filter with range [10, 200]"]);
    // Input is left alone
    assert_samples(&origin.join("a.png"), &RAMP);
}

#[test]
fn test_empty_folder_creates_nothing() {
    let tree = ImageTree::new();
    let origin = tree.folder("empty");
    tree.file("empty/notes.txt", "nothing to see");

    let summary = run_batch(&config_for(&[origin.clone()]));

    assert_eq!(summary.empty, 1);
    assert_eq!(summary.processed, 0);
    assert_eq!(entry_names(&origin), names(&["notes.txt"]));
}

#[test]
fn test_repeated_runs_get_numbered_outputs() {
    let tree = ImageTree::new();
    let origin = tree.folder("run1");
    tree.image("run1/a.png", RAMP);
    let config = config_for(&[origin.clone()]);

    for _ in 0..3 {
        assert_eq!(run_batch(&config).processed, 1);
    }

    assert_eq!(
        entry_names(&origin),
        names(&["a.png", "fltrd_run1", "fltrd00_run1", "fltrd01_run1"])
    );
    // Without filters the images are re-encoded unchanged
    assert_samples(&origin.join("fltrd01_run1").join("a.png"), &RAMP);
    assert_manifest(&origin.join("fltrd01_run1"), &[]);
}

#[test]
fn test_recursive_run_skips_previous_output() {
    let tree = ImageTree::new();
    let origin = tree.folder("run1");
    tree.image("run1/a.png", RAMP);
    tree.image("run1/day2/b.png", RAMP);
    let mut config = config_for(&[origin.clone()]);
    config.recursive = true;

    assert_eq!(run_batch(&config).processed, 2);
    assert!(origin.join("day2").join("fltrd_day2").join("b.png").is_file());

    // Second pass: the fltrd_* folders are not crawled again
    assert_eq!(run_batch(&config).processed, 2);
    assert_eq!(
        entry_names(&origin),
        names(&["a.png", "day2", "fltrd_run1", "fltrd00_run1"])
    );
    assert_eq!(entry_names(&origin.join("fltrd_run1")), names(&["a.png", "fltrd_info.txt"]));
}

#[test]
fn test_include_prefixed_reprocesses_output() {
    let tree = ImageTree::new();
    let origin = tree.folder("run1");
    tree.image("run1/fltrd_old/a.png", RAMP);
    let mut config = config_for(&[origin.clone()]);
    config.recursive = true;
    config.include_prefixed = true;

    let summary = run_batch(&config);

    assert_eq!(summary.processed, 1);
    assert_eq!(summary.empty, 1);
    assert!(origin
        .join("fltrd_old")
        .join("fltrd_fltrd_old")
        .join("a.png")
        .is_file());
    assert_no_output(&origin, "fltrd_run1");
}

fn background_tree(tree: &ImageTree) -> std::path::PathBuf {
    let origin = tree.folder("series");
    tree.image("series/a.png", [100, 20, 70, 200]);
    tree.image("series/b.png", [80, 40, 30, 100]);
    tree.image("masks/mask.png", [255, 255, 0, 255]);
    origin
}

#[test]
fn test_background_and_mask_run() {
    for memory in [MemoryStrategy::Resident, MemoryStrategy::SingleSlot] {
        let tree = ImageTree::new();
        let origin = background_tree(&tree);
        let mask = tree.join("masks/mask.png");

        let mut config = config_for(&[origin.clone()]);
        config.memory = memory;
        config.filters.static_noise = Some(1.0);
        config.filters.mask = Some(mask.clone());
        assert_eq!(run_batch(&config).processed, 1);

        // Mean image is [90, 30, 50, 150]
        let dest = origin.join("fltrd_series");
        assert_samples(&dest.join("a.png"), &[10, 0, 0, 50]);
        assert_samples(&dest.join("b.png"), &[0, 10, 0, 0]);
        let mask_line = format!("Mask with source {}", mask.display());
        assert_manifest(
            &dest,
            &[
                "Background subtraction with factor 1.000000",
                mask_line.as_str(),
            ],
        );
    }
}

#[test]
fn test_all_filters_run() {
    let tree = ImageTree::new();
    let origin = background_tree(&tree);

    let mut config = config_for(&[origin.clone()]);
    config.filters.static_noise = Some(0.5);
    config.filters.mask = Some(tree.join("masks/mask.png"));
    config.filters.rescale_begin = Some(0);
    config.filters.rescale_end = Some(100);
    assert_eq!(run_batch(&config).processed, 1);

    // Factored mean [45, 15, 25, 75]: a becomes [55, 5, 45, 125], the mask
    // zeroes the third pixel, the contrast table maps 0 to 2
    let dest = origin.join("fltrd_series");
    assert_samples(&dest.join("a.png"), &[140, 15, 2, 255]);
    let text = std::fs::read_to_string(dest.join("fltrd_info.txt")).unwrap();
    let filters: Vec<&str> = text.lines().skip(2).collect();
    assert_eq!(filters.len(), 3);
    assert_eq!(filters[0], " - Background subtraction with factor 0.500000");
    assert!(filters[1].starts_with(" - Mask with source "));
    assert_eq!(filters[2], " - Contrast filter with range [0, 100]");
}

#[test]
fn test_failed_runs_do_not_stop_the_batch() {
    let tree = ImageTree::new();
    let missing = tree.join("gone");
    let corrupt = tree.folder("corrupt");
    tree.file("corrupt/broken.png", "definitely not a png");
    let mismatched = tree.folder("mismatched");
    tree.image("mismatched/a.png", RAMP);
    tree.image_buffer("mismatched/b.png", &GrayBuffer::filled(3, 1, 7));
    let good = tree.folder("good");
    tree.image("good/a.png", RAMP);

    let mut config = config_for(&[missing, corrupt.clone(), mismatched.clone(), good.clone()]);
    config.filters.static_noise = Some(1.0);
    let summary = run_batch(&config);

    assert_eq!(
        summary,
        BatchSummary {
            processed: 1,
            empty: 0,
            failed: 3
        }
    );
    assert_no_output(&corrupt, "fltrd");
    assert_no_output(&mismatched, "fltrd");
    // Single image minus its own mean
    assert_samples(&good.join("fltrd_good").join("a.png"), &[0, 0, 0, 0]);
}

#[test]
fn test_output_root() {
    let tree = ImageTree::new();
    let input = tree.folder("input");
    tree.image("input/a.png", RAMP);
    tree.image("input/sub/b.png", RAMP);
    tree.image("input/fltrd_sub/c.png", RAMP);
    let out = tree.join("out");

    let mut config = config_for(&[input.clone()]);
    config.recursive = true;
    config.output = Some(out.clone());
    config.filters.rescale_begin = Some(10);
    config.filters.rescale_end = Some(200);
    assert_eq!(run_batch(&config).processed, 2);

    assert_samples(&out.join("input").join("a.png"), &RAMP_RESCALED);
    assert_samples(&out.join("input").join("sub").join("b.png"), &RAMP_RESCALED);
    assert!(!out.join("input").join("fltrd_sub").exists());
    assert_no_output(&input, "fltrd_input");
}

#[test]
fn test_every_default_format_is_written_back() {
    let tree = ImageTree::new();
    let origin = tree.folder("formats");
    let flat = GrayBuffer::filled(4, 4, 120);
    let formats = ["a.png", "b.jpg", "c.jpeg", "d.gif", "e.tif", "f.tiff", "g.bmp"];
    for name in formats {
        tree.image_buffer(&format!("formats/{name}"), &flat);
    }

    let mut config = config_for(&[origin.clone()]);
    config.filters.rescale_begin = Some(0);
    config.filters.rescale_end = Some(253);
    let summary = run_batch(&config);

    assert_eq!(
        summary,
        BatchSummary {
            processed: 1,
            empty: 0,
            failed: 0
        }
    );
    let dest = origin.join("fltrd_formats");
    let mut expected = names(&formats);
    expected.insert("fltrd_info.txt".to_string());
    assert_eq!(entry_names(&dest), expected);
    // (120 + 1) * 255 / 255
    assert_samples(&dest.join("a.png"), &[121; 16]);
    let gif = FileCodec.decode(&dest.join("d.gif")).unwrap();
    assert_eq!(gif.shape(), flat.shape());
    assert!(gif.as_slice().iter().all(|&v| v.abs_diff(121) <= 4));
}
