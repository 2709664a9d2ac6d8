// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Optimistic-CAS read-modify-write over a single coordinator data node,
//! and a little-endian `u64` counter built on top of it.

use crate::CoordError;
use coord_driver::{create_parent_if_absent, CoordinatorDriver};
use std::time::Duration;

/// Default retry budget for [`AtomicValue::try_set`]: three attempts,
/// starting at a two-second delay that grows as `delay*3/2+1` between
/// attempts.
const DEFAULT_MAX_RETRIES: u32 = 3;
const DEFAULT_RETRY_DELAY: u64 = 2;
const DEFAULT_RETRY_DELAY_UNIT: Duration = Duration::from_secs(1);

/// Read-modify-write core over a single persistent data node, with
/// optimistic concurrency via the coordinator's version counter.
pub struct AtomicValue<D: CoordinatorDriver> {
    driver: D,
    path: String,
    max_retries: u32,
    retry_delay: u64,
    retry_delay_unit: Duration,
}

impl<D: CoordinatorDriver> AtomicValue<D> {
    /// Builds a value core at `path` with the default retry schedule
    /// (3 attempts, starting at a 2-second delay).
    pub fn new(driver: D, path: impl Into<String>) -> Self {
        Self::with_retry_policy(
            driver,
            path,
            DEFAULT_MAX_RETRIES,
            DEFAULT_RETRY_DELAY,
            DEFAULT_RETRY_DELAY_UNIT,
        )
    }

    /// Builds a value core with an explicit retry schedule. Exposed mainly
    /// so tests can shrink the schedule and drive it with `tokio`'s paused
    /// clock instead of waiting on the real 2-second default.
    pub fn with_retry_policy(
        driver: D,
        path: impl Into<String>,
        max_retries: u32,
        retry_delay: u64,
        retry_delay_unit: Duration,
    ) -> Self {
        Self {
            driver,
            path: path.into(),
            max_retries,
            retry_delay,
            retry_delay_unit,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the current payload, or an empty vec if the node does not
    /// exist.
    pub async fn get(&self) -> Result<Vec<u8>, CoordError> {
        match self.driver.exists(&self.path).await? {
            Some(_) => Ok(self.driver.get(&self.path).await?.0),
            None => Ok(Vec::new()),
        }
    }

    /// Fails fast with [`CoordError::NotFound`] if the node is absent, or
    /// [`CoordError::VersionMismatch`] if the current payload is
    /// byte-unequal to `expected`; otherwise writes `new` at the observed
    /// version.
    pub async fn compare_and_set(
        &self,
        expected: &[u8],
        new: Vec<u8>,
    ) -> Result<(), CoordError> {
        if self.driver.exists(&self.path).await?.is_none() {
            return Err(CoordError::NotFound(self.path.clone()));
        }
        let (current, stat) = self.driver.get(&self.path).await?;
        if current != expected {
            return Err(CoordError::VersionMismatch);
        }
        self.driver.set(&self.path, new, stat.version).await?;
        Ok(())
    }

    /// Runs the optimistic read-transform-write loop: read the current
    /// payload (empty if absent), apply `transform`, then write it back.
    /// On a version conflict (or a concurrent create winning the race),
    /// sleeps for the current delay and retries, growing the delay by
    /// `delay*3/2+1` each time. After `max_retries` attempts the last
    /// observed error is returned.
    pub async fn try_set<F>(&self, transform: F) -> Result<(), CoordError>
    where
        F: Fn(&[u8]) -> Vec<u8>,
    {
        let attempts = self.max_retries.max(1);
        let mut delay = self.retry_delay;
        let mut last_err = None;

        for attempt in 0..attempts {
            match self.try_once(&transform).await {
                Ok(()) => return Ok(()),
                Err(err) => {
                    tracing::debug!(
                        path = %self.path,
                        attempt,
                        error = %err,
                        "atomic trySet attempt failed"
                    );
                    last_err = Some(err);
                    if attempt + 1 < attempts {
                        tokio::time::sleep(self.retry_delay_unit.saturating_mul(
                            u32::try_from(delay).unwrap_or(u32::MAX),
                        ))
                        .await;
                        delay = delay * 3 / 2 + 1;
                    }
                }
            }
        }

        Err(last_err.unwrap_or(CoordError::Coordinator(
            coord_driver::DriverError::ConnectionLoss(format!(
                "trySet on {} exhausted its retry budget",
                self.path
            )),
        )))
    }

    async fn try_once<F>(&self, transform: &F) -> Result<(), CoordError>
    where
        F: Fn(&[u8]) -> Vec<u8>,
    {
        match self.driver.exists(&self.path).await? {
            Some(_) => {
                let (current, stat) = self.driver.get(&self.path).await?;
                let new = transform(&current);
                self.driver.set(&self.path, new, stat.version).await?;
            }
            None => {
                let new = transform(&[]);
                create_parent_if_absent(&self.driver, &self.path, new).await?;
            }
        }
        Ok(())
    }
}

fn decode_u64(bytes: &[u8]) -> u64 {
    if bytes.len() < 8 {
        return 0;
    }
    u64::from_le_bytes(bytes[0..8].try_into().unwrap_or([0; 8]))
}

fn encode_u64(v: u64) -> Vec<u8> {
    v.to_le_bytes().to_vec()
}

/// A `u64` counter stored as 8 little-endian bytes at a single node,
/// specializing [`AtomicValue`] with the increment/decrement/set/get
/// vocabulary of increment, decrement, set, and get.
pub struct AtomicU64<D: CoordinatorDriver> {
    inner: AtomicValue<D>,
}

impl<D: CoordinatorDriver> AtomicU64<D> {
    pub fn new(driver: D, path: impl Into<String>) -> Self {
        Self {
            inner: AtomicValue::new(driver, path),
        }
    }

    pub fn with_retry_policy(
        driver: D,
        path: impl Into<String>,
        max_retries: u32,
        retry_delay: u64,
        retry_delay_unit: Duration,
    ) -> Self {
        Self {
            inner: AtomicValue::with_retry_policy(
                driver,
                path,
                max_retries,
                retry_delay,
                retry_delay_unit,
            ),
        }
    }

    /// Decodes the current payload; an unwritten node yields `0`.
    pub async fn get(&self) -> Result<u64, CoordError> {
        Ok(decode_u64(&self.inner.get().await?))
    }

    /// `trySet(x -> x+1)`, absent treated as 0.
    pub async fn increment(&self) -> Result<(), CoordError> {
        self.inner
            .try_set(|cur| encode_u64(decode_u64(cur).saturating_add(1)))
            .await
    }

    /// `trySet(x -> max(0, x-1))` — saturates at zero rather than
    /// wrapping or erroring. This is intentional: the counter is not
    /// commutative at the floor, so concurrent increment/decrement batches
    /// that cross zero do not associate freely.
    pub async fn decrement(&self) -> Result<(), CoordError> {
        self.inner
            .try_set(|cur| encode_u64(decode_u64(cur).saturating_sub(1)))
            .await
    }

    /// `trySet(_ -> encode(v))`.
    pub async fn try_set(&self, v: u64) -> Result<(), CoordError> {
        self.inner.try_set(move |_| encode_u64(v)).await
    }

    pub async fn compare_and_set(&self, expected: u64, new: u64) -> Result<(), CoordError> {
        self.inner
            .compare_and_set(&encode_u64(expected), encode_u64(new))
            .await
    }
}

#[cfg(test)]
#[path = "atomic_tests.rs"]
mod tests;
