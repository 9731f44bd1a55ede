//! Replays recorded hand landmark frames through the detector and the mapper.
//!
//! Usage: `replay <recording.json> [gesture-config.json]`
//!
//! The recording is a JSON array of landmark model results
//! (`{"multiHandLandmarks": [...], "multiHandedness": [...]}`). Without a gesture configuration,
//! the fallback configuration is used.

use std::{cell::RefCell, fs::File, io::BufReader, rc::Rc};

use anyhow::Context;
use handwave::{
    config::GestureConfiguration,
    detector::GestureDetector,
    event::{EventName, GestureEvent},
    landmark::HandResults,
    mapper::GestureMapper,
    session::SessionLog,
    source::on_stop,
};

fn main() -> anyhow::Result<()> {
    handwave::init_logger!();

    let mut args = std::env::args_os().skip(1);
    let Some(recording) = args.next() else {
        eprintln!("usage: replay <recording.json> [gesture-config.json]");
        std::process::exit(1);
    };
    let config = match args.next() {
        Some(path) => GestureConfiguration::load(path)?,
        None => GestureConfiguration::fallback(None),
    };

    let file = File::open(&recording)
        .with_context(|| format!("failed to open recording '{}'", recording.to_string_lossy()))?;
    let frames: Vec<HandResults> =
        serde_json::from_reader(BufReader::new(file)).context("failed to parse recording")?;

    let mapper = Rc::new(GestureMapper::new(config));
    let session = Rc::new(RefCell::new(SessionLog::default()));

    let mut detector = GestureDetector::default();
    detector.attach_source(on_stop(|| log::info!("recording finished")));
    for name in EventName::ALL {
        let mapper = mapper.clone();
        let session = session.clone();
        detector.on(name, move |event: &GestureEvent| {
            println!("{event}");
            if let Some(descriptor) = mapper.process_event(event) {
                println!("  -> {} {}", descriptor.action, descriptor.config);
                session.borrow_mut().record(descriptor);
            }
        });
    }

    for frame in &frames {
        detector.process_frame(&frame.hand_frames());
    }
    // Hands still in view at the end of the recording are treated as gone.
    detector.process_frame(&[]);
    detector.dispose();

    let session = session.borrow();
    println!("{} actions, {}", session.len(), detector.timer());
    for (gesture, count) in session.counts() {
        println!("  {gesture}: {count}");
    }
    Ok(())
}
