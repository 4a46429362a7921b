use std::fs;
use std::path::{Path, PathBuf};

use image::{ImageFormat, Rgb, RgbImage};
use sepiars::config::SepiaConfig;
use sepiars::pipeline::{self, PipelineContext};
use sepiars::SepiaError;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn fixture_image(dir: &Path) -> PathBuf {
    let mut img = RgbImage::new(2, 2);
    img.put_pixel(0, 0, Rgb([255, 255, 255]));
    img.put_pixel(1, 0, Rgb([0, 0, 0]));
    img.put_pixel(0, 1, Rgb([128, 128, 128]));
    img.put_pixel(1, 1, Rgb([10, 20, 30]));

    let path = dir.join("source.png");
    img.save(&path).unwrap();
    path
}

fn png_config() -> SepiaConfig {
    SepiaConfig {
        format: "png".to_string(),
        ..SepiaConfig::default()
    }
}

fn listing(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn three_iterations_write_three_jpegs() {
    init_logger();
    let dir = tempfile::tempdir().unwrap();
    let source = fixture_image(dir.path());

    let context = PipelineContext::new(&source, &SepiaConfig::default()).unwrap();
    let result = pipeline::run(&context, 3).unwrap();

    let output_dir = dir.path().join("ResultantImages");
    assert_eq!(result.output_dir, output_dir);
    assert_eq!(result.iterations, 3);
    assert!(result.failures.is_empty());
    assert_eq!(
        listing(&output_dir),
        vec!["0_output.jpg", "1_output.jpg", "2_output.jpg"]
    );
    for path in &result.outputs {
        let written = image::open(path).unwrap();
        assert_eq!((written.width(), written.height()), (2, 2));
    }
}

#[test]
fn lossless_output_matches_fixture() {
    init_logger();
    let dir = tempfile::tempdir().unwrap();
    let source = fixture_image(dir.path());

    let context = PipelineContext::new(&source, &png_config()).unwrap();
    let result = pipeline::run(&context, 2).unwrap();

    let expected = [
        ((0, 0), [255, 255, 175]),
        ((1, 0), [40, 20, 0]),
        ((0, 1), [168, 148, 48]),
        ((1, 1), [58, 38, 0]),
    ];
    // every iteration starts from the decoded source, not from the previous output
    for path in &result.outputs {
        let written = image::open(path).unwrap().to_rgb8();
        for ((x, y), rgb) in expected {
            assert_eq!(written.get_pixel(x, y), &Rgb(rgb), "{} at {},{}", path.display(), x, y);
        }
    }
    assert_eq!(result.outputs.len(), 2);
}

#[test]
fn existing_output_dir_is_reused() {
    init_logger();
    let dir = tempfile::tempdir().unwrap();
    let source = fixture_image(dir.path());
    let output_dir = dir.path().join("ResultantImages");
    fs::create_dir(&output_dir).unwrap();
    fs::write(output_dir.join("keep.txt"), "x").unwrap();

    let context = PipelineContext::new(&source, &png_config()).unwrap();
    pipeline::run(&context, 1).unwrap();

    assert_eq!(listing(&output_dir), vec!["0_output.png", "keep.txt"]);
}

#[test]
fn nested_output_dir_is_created() {
    init_logger();
    let dir = tempfile::tempdir().unwrap();
    let source = fixture_image(dir.path());
    let config = SepiaConfig {
        output_dir: dir.path().join("a").join("b"),
        ..png_config()
    };

    let context = PipelineContext::new(&source, &config).unwrap();
    let result = pipeline::run(&context, 1).unwrap();

    assert_eq!(result.outputs, vec![dir.path().join("a/b/0_output.png")]);
    assert!(result.outputs[0].is_file());
}

#[test]
fn zero_iterations_write_nothing() {
    init_logger();
    let dir = tempfile::tempdir().unwrap();
    let source = fixture_image(dir.path());

    let context = PipelineContext::new(&source, &SepiaConfig::default()).unwrap();
    let result = pipeline::run(&context, 0);

    assert!(matches!(result, Err(SepiaError::IterationCount(_))));
    assert!(!dir.path().join("ResultantImages").exists());
}

#[test]
fn corrupt_source_aborts_run() {
    init_logger();
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("broken.png");
    fs::write(&source, b"not a png").unwrap();

    let context = PipelineContext::new(&source, &SepiaConfig::default()).unwrap();
    let result = pipeline::run(&context, 2);

    assert!(matches!(result, Err(SepiaError::Decode { .. })));
    assert!(!dir.path().join("ResultantImages").exists());
}

#[test]
fn write_failures_are_collected() {
    init_logger();
    let dir = tempfile::tempdir().unwrap();
    let source = fixture_image(dir.path());
    let output_dir = dir.path().join("ResultantImages");
    // a directory squatting on the first output name makes that write fail
    fs::create_dir_all(output_dir.join("0_output.png")).unwrap();

    let context = PipelineContext::new(&source, &png_config()).unwrap();
    let result = pipeline::run(&context, 3).unwrap();

    assert_eq!(result.failures.len(), 1);
    assert_eq!(result.failures[0].iteration, 0);
    assert!(matches!(result.failures[0].error, SepiaError::Encode { .. }));
    assert_eq!(
        result.outputs,
        vec![output_dir.join("1_output.png"), output_dir.join("2_output.png")]
    );
}

#[test]
fn average_mode_through_pipeline() {
    init_logger();
    let dir = tempfile::tempdir().unwrap();
    let source = fixture_image(dir.path());
    let config = SepiaConfig {
        mode: sepiars::sepia::GrayscaleMode::Average,
        depth: 0,
        intensity: 0,
        ..png_config()
    };

    let context = PipelineContext::new(&source, &config).unwrap();
    let result = pipeline::run(&context, 1).unwrap();

    let written = image::open(&result.outputs[0]).unwrap().to_rgb8();
    assert_eq!(written.get_pixel(1, 1), &Rgb([20, 20, 20]));
    assert_eq!(written.get_pixel(0, 1), &Rgb([128, 128, 128]));
    assert_eq!(ImageFormat::from_path(&result.outputs[0]).unwrap(), ImageFormat::Png);
}
