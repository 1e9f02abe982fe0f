use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tilematch::{
    ExtractConfig, FeatureExtractor, GradientExtractor, ImageView, OwnedImage, TileMatchError,
    DESCRIPTOR_LEN,
};

/// Random gray blocks: every block corner is a potential keypoint.
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

#[test]
fn flat_image_has_no_descriptors() {
    let image = OwnedImage::new(vec![128u8; 96 * 96], 96, 96).unwrap();
    let desc = GradientExtractor::default().extract(image.view()).unwrap();
    assert!(desc.is_empty());
}

#[test]
fn tiny_image_has_no_descriptors() {
    let image = make_blocks(3, 12, 12, 3);
    let desc = GradientExtractor::default().extract(image.view()).unwrap();
    assert!(desc.is_empty());
}

#[test]
fn textured_image_yields_unit_descriptors() {
    let image = make_blocks(11, 128, 96, 8);
    let extractor = GradientExtractor::default();
    let (keypoints, descriptors) = extractor.detect_and_describe(image.view()).unwrap();

    assert!(!descriptors.is_empty());
    assert_eq!(keypoints.len(), descriptors.len());
    for kp in &keypoints {
        assert!(kp.x >= 0.0 && kp.x < 128.0);
        assert!(kp.y >= 0.0 && kp.y < 96.0);
        assert!(kp.scale >= 1.0);
        assert!(kp.response > 0.0);
    }
    for desc in &descriptors {
        assert_eq!(desc.len(), DESCRIPTOR_LEN);
        let norm: f32 = desc.iter().map(|v| v * v).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-3);
    }
}

#[test]
fn extraction_is_deterministic() {
    let image = make_blocks(5, 120, 100, 6);
    let extractor = GradientExtractor::default();
    let first = extractor.extract(image.view()).unwrap();
    let second = extractor.extract(image.view()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn strided_view_matches_contiguous_copy() {
    let scene = make_blocks(21, 160, 120, 8);
    let roi = scene.view().roi(16, 8, 96, 80).unwrap();
    let copy = roi.to_owned_image().unwrap();

    let extractor = GradientExtractor::default();
    let from_roi = extractor.extract(roi).unwrap();
    let from_copy = extractor.extract(copy.view()).unwrap();
    assert_eq!(from_roi, from_copy);
}

#[test]
fn feature_cap_limits_keypoints_per_level() {
    let image = make_blocks(8, 128, 128, 4);
    let extractor = GradientExtractor::new(ExtractConfig {
        octaves: 1,
        max_features_per_level: 10,
        ..ExtractConfig::default()
    });
    let (keypoints, _) = extractor.detect_and_describe(image.view()).unwrap();
    assert!(keypoints.len() <= 10);
    assert!(keypoints.iter().all(|kp| kp.scale == 1.0));
}

#[test]
fn invalid_extract_config_is_rejected() {
    let cfg = ExtractConfig {
        octaves: 0,
        ..ExtractConfig::default()
    };
    assert!(matches!(
        cfg.validate(),
        Err(TileMatchError::InvalidConfig(_))
    ));
    assert!(ExtractConfig::default().validate().is_ok());
}

#[test]
fn view_constructed_from_slice_extracts() {
    let image = make_blocks(2, 64, 64, 8);
    let view = ImageView::from_slice(image.data(), 64, 64).unwrap();
    let desc = GradientExtractor::default().extract(view).unwrap();
    assert!(!desc.is_empty());
}
