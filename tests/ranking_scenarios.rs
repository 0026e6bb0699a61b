// tests/ranking_scenarios.rs
// Critical-zones ranking and window navigation exercised through the
// public API, with snapshots shaped like the live report feed.

use chrono::Utc;
use fieldlink::{
    critical_zones, RankedWindow, Report, Severity, DEFAULT_PRIORITY_THRESHOLD,
    DEFAULT_WINDOW_SIZE,
};

fn report(id: i64, score: i32) -> Report {
    Report {
        id,
        image_path: format!("uploads/{id}.jpg"),
        image_source: "citizen".into(),
        location_name: Some(format!("Sector {id}")),
        latitude: Some(34.05),
        longitude: Some(-118.25),
        damage_detected: score > 0,
        damage_types: vec!["flood".into()],
        severity: if score >= 70 {
            Severity::Critical
        } else {
            Severity::Medium
        },
        confidence: 0.88,
        priority_score: score,
        suggested_actions: vec![],
        suggested_supplies: vec![],
        required_resources: vec![],
        is_emergency: false,
        sos_type: None,
        summary: None,
        timestamp: Utc::now(),
    }
}

#[test]
fn critical_list_matches_the_ranking_contract() {
    let snapshot = vec![
        report(1, 90),
        report(2, 40),
        report(3, 75),
        report(4, 61),
        report(5, 100),
    ];
    let zones = critical_zones(&snapshot, DEFAULT_PRIORITY_THRESHOLD);
    let scores: Vec<i32> = zones.iter().map(|r| r.priority_score).collect();
    assert_eq!(scores, vec![100, 90, 75, 61]);

    // Non-increasing everywhere, strictly above the threshold.
    for pair in scores.windows(2) {
        assert!(pair[0] >= pair[1]);
    }
    assert!(scores.iter().all(|&s| s > DEFAULT_PRIORITY_THRESHOLD));
}

#[test]
fn window_walks_forward_and_back_without_wraparound() {
    let snapshot = vec![
        report(1, 90),
        report(2, 40),
        report(3, 75),
        report(4, 61),
        report(5, 100),
    ];
    let mut w = RankedWindow::from_snapshot(&snapshot, 60, DEFAULT_WINDOW_SIZE);

    assert_eq!(w.visible(), &[5, 1, 3]);
    assert!(w.next());
    assert_eq!(w.visible(), &[4]);
    assert!(!w.next());
    assert!(w.prev());
    assert_eq!(w.visible(), &[5, 1, 3]);
    assert!(!w.prev());
    assert_eq!(w.start_index(), 0);
}

#[test]
fn reranking_the_same_snapshot_yields_identical_ids() {
    let snapshot: Vec<Report> = (0..20).map(|i| report(i, (i as i32 * 7) % 100)).collect();
    let mut a = RankedWindow::from_snapshot(&snapshot, 60, 3);
    let mut b = RankedWindow::from_snapshot(&snapshot, 60, 3);
    assert_eq!(a.ordered_ids(), b.ordered_ids());

    a.resnapshot(&snapshot, 60);
    b.resnapshot(&snapshot, 60);
    assert_eq!(a.ordered_ids(), b.ordered_ids());
}

#[test]
fn refresh_keeps_a_still_valid_start_index() {
    let snapshot: Vec<Report> = (0..8).map(|i| report(i, 70 + i as i32)).collect();
    let mut w = RankedWindow::from_snapshot(&snapshot, 60, 3);
    assert!(w.next());
    assert_eq!(w.start_index(), 3);

    // A new report arrives; the ordering changes but the page stays put.
    let mut grown = snapshot.clone();
    grown.push(report(99, 100));
    w.resnapshot(&grown, 60);
    assert_eq!(w.start_index(), 3);
    assert_eq!(w.visible().len(), 3);
}

#[test]
fn refresh_clamps_a_stale_start_index() {
    let snapshot: Vec<Report> = (0..10).map(|i| report(i, 90)).collect();
    let mut w = RankedWindow::from_snapshot(&snapshot, 60, 3);
    while w.next() {}
    assert_eq!(w.start_index(), 9);

    let shrunk: Vec<Report> = snapshot.into_iter().take(2).collect();
    w.resnapshot(&shrunk, 60);
    assert_eq!(w.start_index(), 0);
    assert_eq!(w.visible().len(), 2);
}

#[test]
fn empty_feed_gives_an_explicit_empty_window() {
    let mut w = RankedWindow::from_snapshot(&[], 60, 3);
    assert!(w.is_empty());
    assert_eq!(w.visible(), &[] as &[i64]);
    assert!(!w.next());
    assert!(!w.prev());
}
