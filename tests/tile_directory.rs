#![cfg(feature = "image-io")]

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fs;
use std::path::Path;
use tilematch::io::load_gray_image;
use tilematch::{
    find_best_tile, Level, MatchOutcome, OwnedImage, Ranker, RecordingSink, TileDirectory,
    TileMatchError,
};

fn make_blocks(seed: u64, width: usize, height: usize, block: usize) -> OwnedImage {
    let mut rng = StdRng::seed_from_u64(seed);
    let bw = width.div_ceil(block);
    let bh = height.div_ceil(block);
    let shades: Vec<u8> = (0..bw * bh).map(|_| rng.random::<u8>()).collect();
    let mut data = Vec::with_capacity(width * height);
    for y in 0..height {
        for x in 0..width {
            data.push(shades[(y / block) * bw + x / block]);
        }
    }
    OwnedImage::new(data, width, height).unwrap()
}

fn save_png(image: &OwnedImage, path: &Path) {
    let buffer = image::GrayImage::from_raw(
        image.width() as u32,
        image.height() as u32,
        image.data().to_vec(),
    )
    .unwrap();
    buffer.save(path).unwrap();
}

#[test]
fn lists_regular_files_sorted_by_name() {
    let dir = tempfile::tempdir().unwrap();
    let tile = make_blocks(1, 32, 32, 8);
    save_png(&tile, &dir.path().join("b.png"));
    save_png(&tile, &dir.path().join("a.png"));
    fs::write(dir.path().join("c.txt"), b"not an image").unwrap();
    fs::create_dir(dir.path().join("nested")).unwrap();
    save_png(&tile, &dir.path().join("nested").join("inner.png"));

    let tiles = TileDirectory::open(dir.path()).unwrap();
    assert_eq!(tiles.len(), 3);
    let candidates: Vec<_> = tiles.collect();
    let names: Vec<&str> = candidates.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["a.png", "b.png", "c.txt"]);

    assert_eq!(candidates[0].image.as_ref().unwrap(), &tile);
    assert!(matches!(
        candidates[2].image,
        Err(TileMatchError::ImageIo { .. })
    ));
}

#[test]
fn missing_directory_is_an_error_or_empty_stream() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing");

    assert!(matches!(
        TileDirectory::open(&missing),
        Err(TileMatchError::DirectoryUnavailable { .. })
    ));

    let sink = RecordingSink::new();
    let tiles = TileDirectory::open_or_empty(&missing, &sink);
    assert_eq!(tiles.count(), 0);
    assert_eq!(sink.count_at(Level::Warn), 1);
}

#[test]
fn load_gray_image_rejects_garbage() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scene.jpg");
    fs::write(&path, b"\xff\xd8 truncated").unwrap();
    assert!(matches!(
        load_gray_image(&path),
        Err(TileMatchError::ImageIo { .. })
    ));
}

#[test]
fn finds_tile_cut_from_scene_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let tiles_dir = dir.path().join("tiles");
    fs::create_dir(&tiles_dir).unwrap();

    let scene = make_blocks(77, 192, 160, 8);
    save_png(&scene, &dir.path().join("scene.png"));
    let present = scene
        .view()
        .roi(96, 64, 64, 64)
        .unwrap()
        .to_owned_image()
        .unwrap();
    save_png(&present, &tiles_dir.join("tile_present.png"));
    save_png(&make_blocks(5, 64, 64, 8), &tiles_dir.join("tile_other.png"));
    fs::write(tiles_dir.join("readme.txt"), b"tiles").unwrap();

    let sink = RecordingSink::new();
    let report = Ranker::default().find_best_tile(dir.path().join("scene.png"), &tiles_dir, &sink);

    assert_eq!(report.outcome.as_str(), "tile_present.png");
    assert_eq!(report.scored, 2);
    assert_eq!(report.skipped, 1);
    assert_eq!(sink.count_at(Level::Warn), 1);
}

#[test]
fn unreadable_scene_is_invalid_without_listing_tiles() {
    let dir = tempfile::tempdir().unwrap();
    let sink = RecordingSink::new();
    let report = find_best_tile(
        dir.path().join("no_scene.png"),
        dir.path().join("no_tiles"),
        &sink,
    );

    assert_eq!(report.outcome, MatchOutcome::InvalidScene);
    assert_eq!(sink.count_at(Level::Error), 1);
    // The missing tile directory was never looked at.
    assert_eq!(sink.count_at(Level::Warn), 0);
}

#[test]
fn missing_tile_directory_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    save_png(&make_blocks(3, 96, 96, 8), &dir.path().join("scene.png"));

    let sink = RecordingSink::new();
    let report = find_best_tile(
        dir.path().join("scene.png"),
        dir.path().join("no_tiles"),
        &sink,
    );
    assert_eq!(report.outcome, MatchOutcome::NotFound);
    assert_eq!(sink.count_at(Level::Warn), 1);
    assert_eq!(sink.count_at(Level::Error), 0);
}

#[test]
fn gray_image_views_share_pixels() {
    let gray = image::GrayImage::from_fn(5, 3, |x, y| image::Luma([(x + 10 * y) as u8]));
    let view = tilematch::io::view_from_gray_image(&gray).unwrap();
    assert_eq!(view.width(), 5);
    assert_eq!(view.row(2).unwrap(), &[20u8, 21, 22, 23, 24]);

    let owned = tilematch::io::owned_from_gray_image(&gray).unwrap();
    assert_eq!(owned.view().get(4, 1).copied(), Some(14));
}
