use std::fmt;

use bastion_core::{ClientAddress, Clock, LockoutPolicy, Username};
use chrono::{DateTime, Utc};
use dashmap::{DashMap, mapref::entry::Entry};

/// Key space shared by password and one-time-code failures.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AttemptKey {
    Username(String),
    Client(String),
}

impl AttemptKey {
    /// The two keys a login request is tracked under.
    pub fn for_login(username: &Username, client: &ClientAddress) -> [AttemptKey; 2] {
        [AttemptKey::from(username), AttemptKey::from(client)]
    }
}

impl From<&Username> for AttemptKey {
    fn from(username: &Username) -> Self {
        AttemptKey::Username(username.as_str().to_string())
    }
}

impl From<&ClientAddress> for AttemptKey {
    fn from(client: &ClientAddress) -> Self {
        AttemptKey::Client(client.as_str().to_string())
    }
}

impl fmt::Display for AttemptKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttemptKey::Username(name) => write!(f, "user:{name}"),
            AttemptKey::Client(address) => write!(f, "addr:{address}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttemptRecord {
    pub count: u32,
    pub window_start: DateTime<Utc>,
    pub last_failure: DateTime<Utc>,
}

impl AttemptRecord {
    fn start(now: DateTime<Utc>) -> Self {
        Self {
            count: 1,
            window_start: now,
            last_failure: now,
        }
    }

    /// The window slides with each failure; a record is stale once a full window has passed
    /// since the most recent one.
    pub fn is_stale(&self, now: DateTime<Utc>, policy: &LockoutPolicy) -> bool {
        now - self.last_failure > policy.window()
    }
}

/// In-memory failed-attempt counters.
///
/// Each key lives in one `DashMap` shard, so every read-modify-write on a key happens under
/// that shard's lock. Stale records are treated as absent whether or not they were evicted.
#[derive(Debug)]
pub struct AttemptTracker<C> {
    records: DashMap<AttemptKey, AttemptRecord>,
    policy: LockoutPolicy,
    clock: C,
}

impl<C: Clock> AttemptTracker<C> {
    pub fn new(policy: LockoutPolicy, clock: C) -> Self {
        Self {
            records: DashMap::new(),
            policy,
            clock,
        }
    }

    pub fn policy(&self) -> &LockoutPolicy {
        &self.policy
    }

    /// Count one failure and return the count now held for `key`.
    pub fn record_failure(&self, key: &AttemptKey) -> u32 {
        let now = self.clock.now();
        match self.records.entry(key.clone()) {
            Entry::Occupied(mut occupied) => {
                let record = occupied.get_mut();
                if record.is_stale(now, &self.policy) {
                    *record = AttemptRecord::start(now);
                } else {
                    record.count = record.count.saturating_add(1);
                    record.last_failure = now;
                }
                record.count
            }
            Entry::Vacant(vacant) => {
                vacant.insert(AttemptRecord::start(now));
                1
            }
        }
    }

    pub fn is_locked_out(&self, key: &AttemptKey) -> bool {
        let now = self.clock.now();
        if self
            .records
            .remove_if(key, |_, record| record.is_stale(now, &self.policy))
            .is_some()
        {
            tracing::debug!(%key, "Evicted stale attempt record");
            return false;
        }

        self.records
            .get(key)
            .is_some_and(|record| record.count >= self.policy.max_attempts())
    }

    pub fn reset(&self, key: &AttemptKey) {
        self.records.remove(key);
    }

    pub fn record_failures(&self, keys: &[AttemptKey]) {
        for key in keys {
            let count = self.record_failure(key);
            tracing::debug!(%key, count, "Recorded failed attempt");
        }
    }

    /// Blocked if any of the keys is locked out.
    pub fn any_locked_out(&self, keys: &[AttemptKey]) -> bool {
        keys.iter().any(|key| self.is_locked_out(key))
    }

    pub fn reset_all(&self, keys: &[AttemptKey]) {
        for key in keys {
            self.reset(key);
        }
    }

    /// Drop every stale record. Returns how many were removed.
    pub fn evict_stale(&self) -> usize {
        let now = self.clock.now();
        let mut evicted = 0;
        self.records.retain(|_, record| {
            let stale = record.is_stale(now, &self.policy);
            if stale {
                evicted += 1;
            }
            !stale
        });
        evicted
    }

    pub fn record(&self, key: &AttemptKey) -> Option<AttemptRecord> {
        self.records.get(key).map(|record| *record)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
