use std::sync::Arc;

use arc_swap::ArcSwap;
use bastion_core::Clock;
use chrono::{DateTime, Duration, Utc};

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock that only moves when told to. Clones share the same instant.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<ArcSwap<DateTime<Utc>>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(ArcSwap::from_pointee(start)),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.now.rcu(|current| **current + by);
    }

    pub fn set(&self, to: DateTime<Utc>) {
        self.now.store(Arc::new(to));
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        **self.now.load()
    }
}
