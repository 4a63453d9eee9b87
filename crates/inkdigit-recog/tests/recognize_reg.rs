//! Recognition pipeline regression test
//!
//! Run with:
//! ```
//! cargo test -p inkdigit-recog --test recognize_reg
//! ```

use inkdigit_io::{ImageFormat, encode_png, read_png};
use inkdigit_recog::{
    BackendError, DebounceConfig, DebouncedWorker, ExternalModelClassifier, FailureKind,
    InferenceBackend, ModelSlot, PerceptronWeights, Recognizer, RecognizerConfig, Tensor,
};
use inkdigit_core::Stroke;
use inkdigit_region::CharacterGroup;
use inkdigit_test::RegParams;
use inkdigit_test::fixtures::{self, SCENARIO_CANVAS_WIDTH};
use std::io::Cursor;
use std::sync::Arc;
use std::sync::mpsc;
use std::time::Duration;

/// Template perceptron weights built with `recognizer`'s own normalizer,
/// one template per digit drawn at (100, 100)
fn template_perceptron(recognizer: &Recognizer) -> PerceptronWeights {
    let templates: Vec<Vec<f32>> = (0..10u8)
        .map(|d| {
            let strokes = fixtures::digit_strokes(d, 100.0, 100.0, 1.0, 0).unwrap();
            let group = CharacterGroup::from_members(strokes).unwrap();
            let outcome = recognizer.normalizer().normalize(&group).unwrap();
            outcome.image.data().to_vec()
        })
        .collect();
    let (theta1, theta2) = fixtures::template_weights(&templates);
    PerceptronWeights::from_matrices(&theta1, &theta2, 28 * 28).unwrap()
}

fn ready_recognizer(config: RecognizerConfig) -> Recognizer {
    let slot = ModelSlot::empty();
    let recognizer = Recognizer::with_perceptron(config, slot.clone()).unwrap();
    assert!(slot.fill(template_perceptron(&recognizer)).is_ok());
    recognizer
}

struct CrashingBackend;

impl InferenceBackend for CrashingBackend {
    fn run(&self, _input: &Tensor) -> Result<Tensor, BackendError> {
        Err("session lost".into())
    }
}

#[test]
fn recognize_reg() {
    let mut rp = RegParams::new("recognize");
    let recognizer = ready_recognizer(RecognizerConfig::default());

    // --- Three-stroke "7": one group, 7 ranked highest ---
    let agg = recognizer
        .recognize_strokes(fixtures::seven().unwrap(), 400.0)
        .unwrap();
    rp.compare_values(1.0, agg.per_group.len() as f64, 0.0);
    rp.compare_values(7.0, agg.per_group[0].predicted_digit as f64, 0.0);
    rp.compare_strings(b"7", agg.text.as_bytes());
    let probs = agg.per_group[0].probabilities;
    rp.compare_values(1.0, probs.iter().sum::<f64>(), 1e-6);
    rp.compare_values(agg.per_group[0].confidence, probs[7], 0.0);

    // --- "4" then "3": two ordered groups, two characters ---
    let agg = recognizer
        .recognize_strokes(fixtures::four_and_three().unwrap(), SCENARIO_CANVAS_WIDTH)
        .unwrap();
    rp.compare_values(2.0, agg.per_group.len() as f64, 0.0);
    rp.compare_strings(b"43", agg.text.as_bytes());
    rp.compare_values(20.0, agg.per_group[0].bounds.min_x, 0.0);
    rp.compare_values(0.0, agg.failed_count as f64, 0.0);
    let mean = agg.per_group.iter().map(|r| r.confidence).sum::<f64>() / 2.0;
    rp.compare_values(mean, agg.average_confidence, 1e-12);

    // --- Empty input ---
    let agg = recognizer.recognize_strokes(Vec::new(), 400.0).unwrap();
    rp.compare_strings(b"", agg.text.as_bytes());
    rp.compare_values(0.0, agg.average_confidence, 0.0);
    rp.compare_values(0.0, agg.per_group.len() as f64, 0.0);

    assert!(rp.cleanup());
}

#[test]
fn recognize_raster_reg() {
    let mut rp = RegParams::new("recognize_raster");
    let recognizer = ready_recognizer(RecognizerConfig::default());

    let strokes = fixtures::four_and_three().unwrap();
    let grid = fixtures::render_strokes(&strokes, 400, 120, 3).unwrap();
    let agg = recognizer.recognize_raster(&grid).unwrap();
    rp.compare_values(2.0, agg.per_group.len() as f64, 0.0);
    rp.compare_values(2.0, agg.text.len() as f64, 0.0);
    rp.compare_values(0.0, agg.failed_count as f64, 0.0);

    let blank = fixtures::filled_square_grid(64, 64, 0, 0, 0).unwrap();
    let agg = recognizer.recognize_raster(&blank).unwrap();
    rp.compare_values(0.0, agg.per_group.len() as f64, 0.0);

    assert!(rp.cleanup());
}

#[test]
fn recognize_failure_reg() {
    let mut rp = RegParams::new("recognize_failure");

    // --- Weights not loaded: every group fails, the pass does not ---
    let recognizer =
        Recognizer::with_perceptron(RecognizerConfig::default(), ModelSlot::empty()).unwrap();
    let agg = recognizer
        .recognize_strokes(fixtures::four_and_three().unwrap(), SCENARIO_CANVAS_WIDTH)
        .unwrap();
    rp.compare_values(2.0, agg.per_group.len() as f64, 0.0);
    rp.compare_values(2.0, agg.failed_count as f64, 0.0);
    rp.compare_strings(b"", agg.text.as_bytes());
    for r in &agg.per_group {
        rp.compare_values(-1.0, r.predicted_digit as f64, 0.0);
        rp.compare_values(0.0, r.confidence, 0.0);
        assert!(r.is_low_confidence);
        assert_eq!(r.failure, Some(FailureKind::ModelNotReady));
    }

    // --- Backend failure ---
    let recognizer = Recognizer::new(
        RecognizerConfig::default(),
        ExternalModelClassifier::new(CrashingBackend),
    )
    .unwrap();
    let agg = recognizer
        .recognize_strokes(fixtures::seven().unwrap(), 400.0)
        .unwrap();
    rp.compare_values(1.0, agg.failed_count as f64, 0.0);
    assert_eq!(
        agg.per_group[0].failure,
        Some(FailureKind::InferenceBackendFailure)
    );

    assert!(rp.cleanup());
}

#[test]
fn recognize_far_flung_stroke_reg() {
    let mut rp = RegParams::new("recognize_far_flung_stroke");
    let recognizer = ready_recognizer(RecognizerConfig::default());

    // a finite stroke spanning more pixels than u32 holds is degenerate
    let stroke = Stroke::from_xyt(&[(0.0, 0.0, 0), (2.5e9, 1.0, 16), (5e9, 0.0, 32)]).unwrap();
    let agg = recognizer.recognize_strokes(vec![stroke], 400.0).unwrap();
    rp.compare_values(1.0, agg.per_group.len() as f64, 0.0);
    rp.compare_values(0.0, agg.failed_count as f64, 0.0);
    assert!(agg.per_group[0].degenerate);

    // next to real digits it does not disturb them
    let mut strokes = fixtures::seven().unwrap();
    strokes.push(
        Stroke::from_xyt(&[(1000.0, 0.0, 5000), (2.5e9, 0.0, 5016), (5e9, 0.0, 5032)]).unwrap(),
    );
    let agg = recognizer.recognize_strokes(strokes, 400.0).unwrap();
    rp.compare_values(2.0, agg.per_group.len() as f64, 0.0);
    rp.compare_values(7.0, agg.per_group[0].predicted_digit as f64, 0.0);
    assert!(!agg.per_group[0].degenerate);
    assert!(agg.per_group[1].degenerate);

    assert!(rp.cleanup());
}

#[test]
fn recognize_background_load_reg() {
    let mut rp = RegParams::new("recognize_background_load");
    let slot = ModelSlot::empty();
    let recognizer = Recognizer::with_perceptron(RecognizerConfig::default(), slot.clone()).unwrap();

    let before = recognizer
        .recognize_strokes(fixtures::seven().unwrap(), 400.0)
        .unwrap();
    rp.compare_values(1.0, before.failed_count as f64, 0.0);

    let weights = template_perceptron(&recognizer);
    let handle = slot.load_in_background(move || Ok(weights));
    assert!(handle.join().unwrap().is_ok());
    assert!(recognizer.classifier().is_ready());

    let after = recognizer
        .recognize_strokes(fixtures::seven().unwrap(), 400.0)
        .unwrap();
    rp.compare_strings(b"7", after.text.as_bytes());

    assert!(rp.cleanup());
}

#[test]
fn recognize_diagnostics_reg() {
    let mut rp = RegParams::new("recognize_diagnostics");
    let config = RecognizerConfig::default().with_diagnostics(true);
    let recognizer = ready_recognizer(config);

    let agg = recognizer
        .recognize_strokes(fixtures::seven().unwrap(), 400.0)
        .unwrap();
    let images = recognizer.diagnostic_images(&agg).unwrap();
    rp.compare_values(1.0, images.len() as f64, 0.0);
    let (index, image) = &images[0];
    rp.compare_values(0.0, *index as f64, 0.0);
    rp.compare_values(28.0 * 8.0, image.width() as f64, 0.0);

    let bytes = encode_png(image).unwrap();
    let decoded = read_png(Cursor::new(bytes)).unwrap();
    rp.compare_strings(image.pixels(), decoded.pixels());

    if rp.display() {
        rp.write_image_and_check(image, ImageFormat::Png).unwrap();
    }

    assert!(rp.cleanup());
}

#[test]
fn recognize_debounce_reg() {
    let mut rp = RegParams::new("recognize_debounce");
    let recognizer = Arc::new(ready_recognizer(RecognizerConfig::default()));
    let (tx, rx) = mpsc::channel();
    let worker = DebouncedWorker::spawn(
        recognizer,
        DebounceConfig::new().with_delay_ms(100),
        move |result| {
            let _ = tx.send(result.map(|agg| agg.text));
        },
    )
    .unwrap();

    // a burst of snapshots collapses into one pass over the last one
    let mut strokes = fixtures::seven().unwrap();
    let last = strokes.pop().unwrap();
    worker.submit(strokes.clone(), 400.0);
    strokes.push(last);
    worker.submit(strokes, 400.0);

    let text = rx.recv_timeout(Duration::from_secs(10)).unwrap().unwrap();
    rp.compare_strings(b"7", text.as_bytes());
    assert!(rx.recv_timeout(Duration::from_millis(400)).is_err());

    drop(worker);
    assert!(rp.cleanup());
}

#[test]
fn recognize_config_reg() {
    let mut rp = RegParams::new("recognize_config");
    let path = std::env::temp_dir().join("inkdigit_recognize_config.json");
    std::fs::write(
        &path,
        r#"{ "low_confidence_threshold": 0.5, "segmentation": { "max_strokes_per_group": 5 } }"#,
    )
    .unwrap();
    let config = RecognizerConfig::load(&path).unwrap();
    rp.compare_values(0.5, config.low_confidence_threshold, 0.0);
    rp.compare_values(5.0, config.segmentation.max_strokes_per_group as f64, 0.0);
    rp.compare_values(0.6, config.segmentation.connectivity_threshold, 0.0);
    rp.compare_values(500.0, config.debounce.delay_ms as f64, 0.0);
    let _ = std::fs::remove_file(&path);

    let recognizer = ready_recognizer(config);
    let agg = recognizer
        .recognize_strokes(fixtures::four_and_three().unwrap(), SCENARIO_CANVAS_WIDTH)
        .unwrap();
    rp.compare_values(2.0, agg.per_group.len() as f64, 0.0);

    assert!(rp.cleanup());
}
