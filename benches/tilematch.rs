use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use tilematch::{
    match_top_two, Candidate, FeatureExtractor, GradientExtractor, NullSink, OwnedImage,
    RankConfig, Ranker,
};

fn make_image(width: usize, height: usize, salt: usize) -> OwnedImage {
    let mut data = Vec::with_capacity(width * height);
    for y in 0..height {
        for x in 0..width {
            let (bx, by) = (x / 6 + salt, y / 6);
            let value = ((bx * 13) ^ (by * 7) ^ (bx * by * 3)) & 0xFF;
            data.push(value as u8);
        }
    }
    OwnedImage::new(data, width, height).unwrap()
}

fn crop(image: &OwnedImage, x: usize, y: usize, size: usize) -> OwnedImage {
    image
        .view()
        .roi(x, y, size, size)
        .unwrap()
        .to_owned_image()
        .unwrap()
}

fn bench_pipeline(c: &mut Criterion) {
    let scene = make_image(512, 384, 0);
    let extractor = GradientExtractor::default();

    c.bench_function("extract_scene_512x384", |b| {
        b.iter(|| black_box(extractor.extract(scene.view()).unwrap()));
    });

    let scene_desc = extractor.extract(scene.view()).unwrap();
    let tile_desc = extractor.extract(crop(&scene, 120, 96, 128).view()).unwrap();
    c.bench_function("match_top_two_tile_vs_scene", |b| {
        b.iter(|| black_box(match_top_two(&tile_desc, &scene_desc)));
    });

    let mut candidates = Vec::new();
    for i in 0..12 {
        let tile = if i == 7 {
            crop(&scene, 240, 120, 128)
        } else {
            make_image(128, 128, 31 * (i + 1))
        };
        candidates.push(Candidate::new(format!("tile_{i:02}.png"), tile));
    }

    let ranker = Ranker::default();
    c.bench_function("rank_12_tiles", |b| {
        b.iter(|| {
            black_box(ranker.find_best_match(Ok(scene.clone()), candidates.clone(), &NullSink))
        });
    });

    if cfg!(feature = "rayon") {
        let ranker_par = Ranker::default().with_config(RankConfig {
            parallel: true,
            ..RankConfig::default()
        })
        .unwrap();
        c.bench_function("rank_12_tiles_parallel", |b| {
            b.iter(|| {
                black_box(ranker_par.find_best_match(
                    Ok(scene.clone()),
                    candidates.clone(),
                    &NullSink,
                ))
            });
        });
    }
}

criterion_group!(benches, bench_pipeline);
criterion_main!(benches);
