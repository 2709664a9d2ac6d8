// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use coord_driver::FakeCoordinatorDriver;

fn live_session(driver: FakeCoordinatorDriver) -> ClusterSession<FakeCoordinatorDriver> {
    let session = ClusterSession::new("127.0.0.1", driver);
    session.connect();
    session
}

#[tokio::test]
async fn start_not_connected_reports_error_not_panic() {
    let driver = FakeCoordinatorDriver::new_ensemble();
    let session = ClusterSession::new("127.0.0.1", driver);
    let mut election = Election::start(session, "/e/down");
    let err = election.next_error().await.expect("an error should be reported");
    assert!(matches!(err, CoordError::NotConnected));
    assert_eq!(election.role(), Role::Follower);
}

#[tokio::test]
async fn solo_participant_becomes_leader() {
    let session = live_session(FakeCoordinatorDriver::new_ensemble());
    let mut election = Election::start(session, "/e/solo");
    let mut leadership = election.leadership();
    leadership.changed().await.unwrap();
    assert_eq!(*leadership.borrow(), Role::Leader);
    election.stop().await.unwrap();
}

/// Two participants: the first to Start becomes Leader within one watch
/// cycle, the second stays Follower; stopping the Leader promotes the
/// Follower within two watch cycles.
#[tokio::test]
async fn second_participant_promoted_after_leader_stops() {
    let driver = FakeCoordinatorDriver::new_ensemble();
    let session = live_session(driver);

    let mut leader = Election::start(session.clone(), "/e/t1");
    let mut leader_leadership = leader.leadership();
    leader_leadership.changed().await.unwrap();
    assert_eq!(*leader_leadership.borrow(), Role::Leader);

    let mut follower = Election::start(session, "/e/t1");
    // Give the follower's worker a chance to register and run one watch
    // cycle; it must stay Follower since it is not the smallest suffix.
    tokio::task::yield_now().await;
    assert_eq!(follower.role(), Role::Follower);

    let mut follower_leadership = follower.leadership();
    leader.stop().await.unwrap();

    follower_leadership.changed().await.unwrap();
    assert_eq!(*follower_leadership.borrow(), Role::Leader);

    follower.stop().await.unwrap();
}

#[tokio::test]
async fn stop_deletes_participant_node() {
    let driver = FakeCoordinatorDriver::new_ensemble();
    let session = live_session(driver.clone());

    let mut election = Election::start(session, "/e/cleanup");
    let mut leadership = election.leadership();
    leadership.changed().await.unwrap();

    election.stop().await.unwrap();

    let listing = driver.children_watch("/e/cleanup").await.unwrap();
    assert!(listing.children.is_empty());
}
