//! 采集循环 (Capture loop)
//!
//! Pulls frames from an already-open source, shows each for operator
//! feedback, and writes each to the session as `frame_NNNNNN.png` with
//! strictly increasing indices starting at 0. The stop signal is observed at
//! the top of each cycle; a frame already acquired completes. Missed cycles
//! consume no index.

use anyhow::{Context, Result};

use crate::camera::{FrameSource, Grab};
use crate::control::StopSignal;
use crate::display::FrameSink;

use super::session::Session;

/// What one capture run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureReport {
    pub frames_written: u64,
}

/// Run the capture stage until the operator stops it, the source ends, or
/// `max_frames` is reached. The caller keeps ownership of the source, so its
/// handle is released on every exit path, including an error return here.
pub fn run_capture<S, K>(
    source: &mut S,
    sink: &mut K,
    stop: &mut StopSignal,
    session: &Session,
    max_frames: Option<u64>,
) -> Result<CaptureReport>
where
    S: FrameSource + ?Sized,
    K: FrameSink + ?Sized,
{
    let mut index: u64 = 0;

    loop {
        if stop.requested() {
            println!("🛑 Stop requested, ending capture");
            break;
        }
        if max_frames.is_some_and(|cap| index >= cap) {
            println!("🛑 Frame cap reached ({} frames), ending capture", index);
            break;
        }

        match source.acquire_frame() {
            Ok(Grab::Frame(image)) => {
                if let Err(e) = sink.show(&image) {
                    eprintln!("⚠️ display failed: {}", e);
                }
                let path = session.frame_path(index);
                image
                    .save(&path)
                    .with_context(|| format!("failed to write frame {}", path.display()))?;
                index += 1;
            }
            Ok(Grab::Missed) => continue,
            Ok(Grab::EndOfStream) => {
                println!("🛑 Frame source ended");
                break;
            }
            Err(e) => {
                eprintln!("⚠️ frame acquisition failed: {}", e);
                continue;
            }
        }
    }

    Ok(CaptureReport {
        frames_written: index,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::stop_channel;
    use crate::display::NullSink;
    use image::RgbImage;
    use std::collections::VecDeque;

    // Scripted frame source for exercising the loop.
    struct ScriptedSource {
        script: VecDeque<Grab>,
    }

    impl ScriptedSource {
        fn new(script: Vec<Grab>) -> Self {
            Self {
                script: script.into(),
            }
        }
    }

    impl FrameSource for ScriptedSource {
        fn acquire_frame(&mut self) -> Result<Grab> {
            Ok(self.script.pop_front().unwrap_or(Grab::EndOfStream))
        }
    }

    fn frame() -> Grab {
        Grab::Frame(RgbImage::new(4, 4))
    }

    fn session() -> (tempfile::TempDir, Session) {
        let root = tempfile::tempdir().unwrap();
        let session = Session::create(root.path()).unwrap();
        (root, session)
    }

    fn frame_names(session: &Session) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(session.dir())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_missed_cycles_consume_no_index() {
        let (_root, session) = session();
        let mut source =
            ScriptedSource::new(vec![frame(), Grab::Missed, frame(), Grab::Missed, frame()]);
        let (_trigger, mut stop) = stop_channel();

        let report =
            run_capture(&mut source, &mut NullSink, &mut stop, &session, None).unwrap();

        assert_eq!(report.frames_written, 3);
        assert_eq!(
            frame_names(&session),
            vec!["frame_000000.png", "frame_000001.png", "frame_000002.png"]
        );
    }

    #[test]
    fn test_stop_before_first_cycle_writes_nothing() {
        let (_root, session) = session();
        let mut source = ScriptedSource::new(vec![frame(), frame()]);
        let (trigger, mut stop) = stop_channel();
        trigger.stop();

        let report =
            run_capture(&mut source, &mut NullSink, &mut stop, &session, None).unwrap();

        assert_eq!(report.frames_written, 0);
        assert!(frame_names(&session).is_empty());
    }

    #[test]
    fn test_frame_cap_ends_capture() {
        let (_root, session) = session();
        let mut source = ScriptedSource::new(vec![frame(), frame(), frame(), frame()]);
        let (_trigger, mut stop) = stop_channel();

        let report =
            run_capture(&mut source, &mut NullSink, &mut stop, &session, Some(2)).unwrap();

        assert_eq!(report.frames_written, 2);
        assert_eq!(frame_names(&session).len(), 2);
    }

    #[test]
    fn test_end_of_stream_ends_capture() {
        let (_root, session) = session();
        let mut source = ScriptedSource::new(vec![frame(), Grab::EndOfStream, frame()]);
        let (_trigger, mut stop) = stop_channel();

        let report =
            run_capture(&mut source, &mut NullSink, &mut stop, &session, None).unwrap();

        assert_eq!(report.frames_written, 1);
    }

    #[test]
    fn test_display_failure_does_not_drop_the_frame() {
        struct FailingSink;
        impl FrameSink for FailingSink {
            fn show(&mut self, _image: &RgbImage) -> Result<()> {
                anyhow::bail!("window gone")
            }
        }

        let (_root, session) = session();
        let mut source = ScriptedSource::new(vec![frame()]);
        let (_trigger, mut stop) = stop_channel();

        let report =
            run_capture(&mut source, &mut FailingSink, &mut stop, &session, None).unwrap();

        assert_eq!(report.frames_written, 1);
        assert_eq!(frame_names(&session), vec!["frame_000000.png"]);
    }
}
