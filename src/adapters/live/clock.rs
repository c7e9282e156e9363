//! System clock for live runs.

use chrono::{DateTime, SubsecRound, Utc};

use crate::ports::clock::Clock;

/// Wall clock truncated to whole seconds, the precision `generatedAt` carries.
pub struct LiveClock;

impl Clock for LiveClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now().trunc_subsecs(0)
    }
}
