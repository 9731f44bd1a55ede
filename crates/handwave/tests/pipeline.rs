use std::{cell::RefCell, fs, path::Path, rc::Rc};

use approx::assert_relative_eq;
use handwave::{
    action::ActionKind,
    classify::{ClassifiedGesture, GestureClassifier},
    config::{self, GestureConfiguration},
    detector::GestureDetector,
    event::{EventName, GestureEvent, GestureEventKind},
    landmark::{HandFrame, HandResults, Handedness, Landmark, LandmarkIdx, NUM_LANDMARKS},
    mapper::GestureMapper,
    session::SessionLog,
};

/// A loosely closed right hand with all four fingers curled.
fn relaxed() -> Vec<Landmark> {
    let mut lm = vec![Landmark::default(); NUM_LANDMARKS];
    let mut set = |idx: LandmarkIdx, x: f32, y: f32| lm[idx.index()] = Landmark::planar(x, y);
    set(LandmarkIdx::Wrist, 0.5, 0.8);
    set(LandmarkIdx::ThumbCmc, 0.45, 0.78);
    set(LandmarkIdx::ThumbMcp, 0.42, 0.74);
    set(LandmarkIdx::ThumbIp, 0.40, 0.73);
    set(LandmarkIdx::ThumbTip, 0.38, 0.72);
    let fingers = [
        (LandmarkIdx::IndexFingerMcp, 0.46),
        (LandmarkIdx::MiddleFingerMcp, 0.5),
        (LandmarkIdx::RingFingerMcp, 0.54),
        (LandmarkIdx::PinkyMcp, 0.58),
    ];
    for (mcp, x) in fingers {
        let base = mcp.index();
        for (offset, y) in [0.7, 0.6, 0.62, 0.68].into_iter().enumerate() {
            set(LandmarkIdx::ALL[base + offset], x, y);
        }
    }
    lm
}

/// Thumb tip and index fingertip touching at `(x, y)`.
fn pinch_at(x: f32, y: f32) -> Vec<Landmark> {
    let mut lm = relaxed();
    lm[LandmarkIdx::IndexFingerTip.index()] = Landmark::planar(x, y);
    lm[LandmarkIdx::IndexFingerDip.index()] = Landmark::planar(x - 0.015, y - 0.02);
    lm[LandmarkIdx::IndexFingerPip.index()] = Landmark::planar(x - 0.03, y - 0.03);
    lm[LandmarkIdx::ThumbTip.index()] = Landmark::planar(x + 0.02, y);
    lm[LandmarkIdx::ThumbIp.index()] = Landmark::planar(x + 0.04, y + 0.03);
    lm
}

fn right(landmarks: Vec<Landmark>) -> Vec<HandFrame> {
    vec![HandFrame::new(landmarks, Handedness::Right)]
}

#[test]
fn pinch_and_drag() {
    handwave::init_logger!();

    let mut detector = GestureDetector::default();
    let events = Rc::new(RefCell::new(Vec::<GestureEvent>::new()));
    for name in EventName::ALL {
        let events = events.clone();
        detector.on(name, move |ev| events.borrow_mut().push(*ev));
    }

    detector.process_frame(&right(relaxed()));
    detector.process_frame(&right(pinch_at(0.5, 0.5)));
    detector.process_frame(&right(pinch_at(0.55, 0.5)));
    detector.process_frame(&right(pinch_at(0.6, 0.5)));
    detector.process_frame(&[]);

    let events = events.borrow();
    let names: Vec<_> = events.iter().map(GestureEvent::name).collect();
    assert_eq!(
        names,
        [
            EventName::PinchStart,
            EventName::PinchDrag,
            EventName::PinchDrag,
            EventName::PinchEnd,
        ]
    );
    for event in &events[1..3] {
        let GestureEventKind::PinchDrag { dx, dy } = event.kind else {
            unreachable!()
        };
        assert_relative_eq!(dx, 0.05, epsilon = 1e-5);
        assert_relative_eq!(dy, 0.0, epsilon = 1e-5);
    }

    let mapper = GestureMapper::from_json(r#"{"gestureMap": {"pinch": "zoomIn"}}"#).unwrap();
    let descriptor = mapper.process_gesture("pinch").unwrap();
    assert_eq!(descriptor.gesture, "pinch");
    assert_eq!(descriptor.action, "zoomIn");
    assert_eq!(descriptor.config.number("factor"), Some(1.2));
    assert_eq!(descriptor.config.number("duration"), Some(300.0));
    assert_eq!(descriptor.config.len(), 2);

    // Only the activation event maps to an action.
    let actions: Vec<_> = events
        .iter()
        .filter_map(|ev| mapper.process_event(ev))
        .map(|d| d.kind)
        .collect();
    assert_eq!(actions, [Some(ActionKind::ZoomIn)]);
}

#[test]
fn classifier_feeds_session_log() {
    let classifier = GestureClassifier::default();
    let mapper = GestureMapper::new(GestureConfiguration::fallback(Some("Heart")));
    let mut session = SessionLog::default();

    let frames = [right(relaxed()), right(pinch_at(0.5, 0.5)), Vec::new()];
    for hands in &frames {
        let Some(m) = classifier.classify_frame(hands) else {
            continue;
        };
        if let Some(descriptor) = mapper.process_match(&m) {
            session.record(descriptor);
        }
    }

    // The relaxed hand reads as a fist, which the fallback configuration does not bind.
    assert_eq!(
        classifier.classify_frame(&frames[0]).map(|m| m.gesture),
        Some(ClassifiedGesture::Fist)
    );
    assert_eq!(session.len(), 1);
    let entry = &session.entries()[0];
    assert_eq!(entry.action, "zoomIn");
    assert_relative_eq!(entry.confidence, 0.9);
}

#[test]
fn shipped_configs() {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("configs");
    let mut count = 0;
    for entry in fs::read_dir(&dir).unwrap() {
        let path = entry.unwrap().path();
        let file_name = path.file_name().unwrap().to_str().unwrap();
        assert!(
            file_name.ends_with(config::CONFIG_FILE_SUFFIX),
            "unexpected file {file_name}"
        );

        let config = GestureConfiguration::load(&path).unwrap();
        assert!(config.model_name().is_some(), "{file_name} has no modelName");
        for (gesture, action) in config.bindings() {
            assert!(
                ActionKind::from_name(action).is_some(),
                "{file_name}: `{gesture}` is bound to unknown action `{action}`"
            );
        }
        count += 1;
    }
    assert!(count > 0);

    let heart = GestureConfiguration::load(dir.join(config::config_file_name("Heart.glb"))).unwrap();
    let mapper = GestureMapper::new(heart);
    assert_eq!(mapper.map_gesture("peace"), Some("highlightAorta"));
    let aorta = mapper.process_gesture("peace").unwrap().config;
    assert!(mapper.hotspot(aorta.text("hotspot").unwrap()).is_some());
}

#[test]
fn recorded_session() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("recordings/pinch_then_peace.json");
    let frames: Vec<HandResults> = serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();

    let mut detector = GestureDetector::default();
    let names = Rc::new(RefCell::new(Vec::new()));
    for name in EventName::ALL {
        let names = names.clone();
        detector.on(name, move |ev| names.borrow_mut().push(ev.name()));
    }
    for frame in &frames {
        detector.process_results(frame);
    }

    assert_eq!(
        *names.borrow(),
        [
            EventName::PinchStart,
            EventName::PinchDrag,
            EventName::PinchDrag,
            EventName::PinchEnd,
            EventName::VSign,
            EventName::VSignEnd,
        ]
    );
}
