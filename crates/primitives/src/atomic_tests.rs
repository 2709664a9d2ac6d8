// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use coord_driver::FakeCoordinatorDriver;
use proptest::prelude::*;
use std::time::Duration;

fn counter(driver: &FakeCoordinatorDriver, path: &str) -> AtomicU64<FakeCoordinatorDriver> {
    AtomicU64::new(driver.clone(), path)
}

#[tokio::test]
async fn get_on_never_written_node_is_zero() {
    let driver = FakeCoordinatorDriver::new_ensemble();
    let c = counter(&driver, "/x/v1");
    assert_eq!(c.get().await.unwrap(), 0);
}

#[tokio::test]
async fn basic_counter_scenario() {
    let driver = FakeCoordinatorDriver::new_ensemble();
    let c = counter(&driver, "/x/v1");
    c.try_set(10).await.unwrap();
    assert_eq!(c.get().await.unwrap(), 10);
    c.increment().await.unwrap();
    assert_eq!(c.get().await.unwrap(), 11);
    c.decrement().await.unwrap();
    assert_eq!(c.get().await.unwrap(), 10);
}

#[tokio::test]
async fn compare_and_set_scenario() {
    let driver = FakeCoordinatorDriver::new_ensemble();
    let c = counter(&driver, "/x/v1");
    c.try_set(10).await.unwrap();

    c.compare_and_set(10, 20).await.unwrap();
    assert_eq!(c.get().await.unwrap(), 20);

    let err = c.compare_and_set(10, 30).await.unwrap_err();
    assert!(matches!(err, CoordError::VersionMismatch));
    assert_eq!(c.get().await.unwrap(), 20);
}

#[tokio::test]
async fn compare_and_set_on_absent_node_is_not_found() {
    let driver = FakeCoordinatorDriver::new_ensemble();
    let c = counter(&driver, "/x/v2");
    let err = c.compare_and_set(0, 1).await.unwrap_err();
    assert!(matches!(err, CoordError::NotFound(_)));
}

#[tokio::test]
async fn decrement_floor_scenario() {
    let driver = FakeCoordinatorDriver::new_ensemble();
    let c = counter(&driver, "/x/v2");
    c.decrement().await.unwrap();
    assert_eq!(c.get().await.unwrap(), 0);
}

/// For concurrent increments on one counter node, the final value must
/// equal the number of increments exactly, regardless of how many CAS
/// retries any writer needed. Run on real OS threads (not a paused clock)
/// so the writers can genuinely race the optimistic loop.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_increments_converge_to_exact_total() {
    let driver = FakeCoordinatorDriver::new_ensemble();
    driver
        .create(
            "/contended",
            0u64.to_le_bytes().to_vec(),
            coord_driver::CreateMode::Persistent,
        )
        .await
        .unwrap();

    let barrier = std::sync::Arc::new(tokio::sync::Barrier::new(8));
    let mut handles = Vec::new();
    for _ in 0..8 {
        let driver = driver.clone();
        let barrier = barrier.clone();
        handles.push(tokio::spawn(async move {
            let value = AtomicValue::with_retry_policy(
                driver,
                "/contended",
                20,
                1,
                Duration::from_millis(1),
            );
            barrier.wait().await;
            value
                .try_set(|cur| {
                    let n = u64::from_le_bytes(cur.try_into().unwrap_or([0; 8]));
                    (n + 1).to_le_bytes().to_vec()
                })
                .await
        }));
    }

    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let (data, _) = driver.get("/contended").await.unwrap();
    assert_eq!(u64::from_le_bytes(data.try_into().unwrap()), 8);
}

#[tokio::test]
async fn try_set_exhausts_retries_and_surfaces_last_error() {
    let driver = FakeCoordinatorDriver::new_ensemble();
    driver.kill_session();

    let value = AtomicValue::with_retry_policy(driver, "/x", 3, 0, Duration::from_millis(1));
    let err = value.try_set(|_| vec![1]).await.unwrap_err();
    assert!(matches!(
        err,
        CoordError::Coordinator(coord_driver::DriverError::SessionExpired)
    ));
}

proptest! {
    #[test]
    fn decrement_never_goes_below_zero(pre in 0u64..10_000) {
        let post = pre.saturating_sub(1);
        prop_assert!(post <= pre);
        if pre == 0 {
            prop_assert_eq!(post, 0);
        }
    }
}
