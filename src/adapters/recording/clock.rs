//! Captures the generation timestamp into the session cassette.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};

use super::record_interaction;
use crate::cassette::recorder::CassetteRecorder;
use crate::ports::Clock;

/// Clock whose readings are written to the cassette so a replayed
/// `canonicalize` reproduces the same `generatedAt`.
pub struct RecordingClock {
    inner: Box<dyn Clock>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingClock {
    /// Wraps `inner`, recording every reading into `recorder`.
    pub fn new(inner: Box<dyn Clock>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

impl Clock for RecordingClock {
    fn now(&self) -> DateTime<Utc> {
        let stamp = self.inner.now();
        record_interaction(&self.recorder, "clock", "now", &(), &stamp);
        stamp
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::replaying::ReplayingClock;
    use crate::cassette::format::Cassette;
    use crate::cassette::replayer::CassetteReplayer;
    use crate::test_support::FixedClock;

    #[test]
    fn recorded_stamp_replays_unchanged() {
        let dir = std::env::temp_dir().join("propaudit_rec_clock_test");
        let path = dir.join("stamp.cassette.yaml");
        let recorder = Arc::new(Mutex::new(CassetteRecorder::new(&path, "test", "abc")));

        let recorded = {
            let clock = RecordingClock::new(Box::new(FixedClock), Arc::clone(&recorder));
            clock.now()
        };

        let recorder = Arc::try_unwrap(recorder).unwrap().into_inner().unwrap();
        recorder.finish().unwrap();

        let cassette = Cassette::load(&path).unwrap();
        let replayed = ReplayingClock::new(CassetteReplayer::new(&cassette)).now();
        assert_eq!(replayed, recorded);
        assert_eq!(recorded.to_rfc3339(), "2025-01-02T03:04:05+00:00");

        let _ = std::fs::remove_dir_all(&dir);
    }
}
