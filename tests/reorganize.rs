//! Tests of the raw-to-standard layout reorganization.

use std::fs;
use std::path::Path;

use wheatset::convert::{convert, AnnotationSource, ConvertOptions};
use wheatset::dataset::io_box_csv::read_box_csv;
use wheatset::dataset::io_coco_json::read_coco_json;
use wheatset::reorganize::{reorganize, ReorganizeOptions};

mod common;
use common::write_bmp;

/// Builds a raw competition layout: an images pool plus the three
/// competition CSVs.
fn build_raw_fixture(root: &Path) {
    let pool = root.join("images");
    for name in ["img_a.png", "img_b.png", "img_c.png"] {
        write_bmp(&pool.join(name), 1024, 1024);
    }

    fs::write(
        root.join("competition_train.csv"),
        "image_name,BoxesString\n\
         img_b.png,10 20 100 80;0 0 50 50\n\
         img_a.png,5 5 15 25\n",
    )
    .unwrap();
    fs::write(
        root.join("competition_val.csv"),
        "image_name,BoxesString\nimg_c.png,no_box\n",
    )
    .unwrap();
    fs::write(
        root.join("competition_test.csv"),
        "image_name,BoxesString\nimg_missing.png,1 2 3 4\n",
    )
    .unwrap();
}

#[test]
fn builds_standard_layout_from_competition_csvs() {
    let dir = tempfile::tempdir().unwrap();
    build_raw_fixture(dir.path());
    let category_root = dir.path().join("wheat_heads");

    let summary = reorganize(&ReorganizeOptions {
        raw_root: dir.path().to_path_buf(),
        category_root: category_root.clone(),
    })
    .expect("reorganize failed");

    assert_eq!(summary.train, 2);
    assert_eq!(summary.val, 1);
    assert_eq!(summary.test, 1);
    assert_eq!(summary.processed, 3);
    // img_missing.png has no file in the pool
    assert_eq!(summary.skipped, 1);

    // Split files are sorted and include the derived unions
    let train = fs::read_to_string(category_root.join("sets/train.txt")).unwrap();
    assert_eq!(train, "img_a\nimg_b\n");
    let train_val = fs::read_to_string(category_root.join("sets/train_val.txt")).unwrap();
    assert_eq!(train_val, "img_a\nimg_b\nimg_c\n");
    let all = fs::read_to_string(category_root.join("sets/all.txt")).unwrap();
    assert_eq!(all, "img_a\nimg_b\nimg_c\nimg_missing\n");

    // Images copied into place
    assert!(category_root.join("images/img_a.png").is_file());
    assert!(category_root.join("images/img_b.png").is_file());

    // Per-image CSVs carry corner-to-xywh converted rows
    let rows = read_box_csv(&category_root.join("csv/img_b.csv")).expect("read csv");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].x, 10.0);
    assert_eq!(rows[0].width, 90.0);
    assert_eq!(rows[0].height, 60.0);
    assert_eq!(rows[1].item, 1);

    // no_box entry yields a header-only CSV, not a failure
    let empty = read_box_csv(&category_root.join("csv/img_c.csv")).expect("read csv");
    assert!(empty.is_empty());
}

#[test]
fn copies_per_image_json_when_present() {
    let dir = tempfile::tempdir().unwrap();
    build_raw_fixture(dir.path());
    fs::write(
        dir.path().join("images/img_a.json"),
        r#"{"images": [{"id": 1}], "annotations": []}"#,
    )
    .unwrap();
    let category_root = dir.path().join("wheat_heads");

    reorganize(&ReorganizeOptions {
        raw_root: dir.path().to_path_buf(),
        category_root: category_root.clone(),
    })
    .expect("reorganize failed");

    assert!(category_root.join("json/img_a.json").is_file());
    assert!(!category_root.join("json/img_b.json").exists());
}

#[test]
fn reorganize_then_convert_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    build_raw_fixture(dir.path());

    reorganize(&ReorganizeOptions {
        raw_root: dir.path().to_path_buf(),
        category_root: dir.path().join("wheat_heads"),
    })
    .expect("reorganize failed");

    let out = dir.path().join("annotations");
    convert(&ConvertOptions {
        root: dir.path().to_path_buf(),
        out_dir: out.clone(),
        category: "wheat_heads".to_string(),
        splits: vec!["train".to_string()],
        source: AnnotationSource::Csv,
    })
    .expect("convert failed");

    let doc = read_coco_json(&out.join("wheat_heads_instances_train.json")).expect("read output");
    assert_eq!(doc.images.len(), 2);
    assert_eq!(doc.annotations.len(), 3);

    // Split file is sorted, so img_a comes first despite CSV order
    assert_eq!(doc.images[0].file_name, "wheat_heads/images/img_a.png");
    assert_eq!(doc.annotations[0].bbox.x, 5.0);
    assert_eq!(doc.annotations[0].bbox.width, 10.0);
    assert_eq!(doc.annotations[0].area, 200.0);
}
