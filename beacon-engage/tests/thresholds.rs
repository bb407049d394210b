//! Fire-once behavior of the scroll and dwell monitors

mod common;

use beacon_engage::{DwellMonitor, ScrollMetrics, ScrollMonitor};
use common::{int_params, recording_emitter};

#[test]
fn increasing_scroll_fires_each_depth_once_in_order() {
    let (emitter, log) = recording_emitter();
    let mut monitor = ScrollMonitor::new(emitter);

    for percent in [10, 30, 60, 95, 100] {
        monitor.observe_percent(percent);
    }
    // Re-crossing after scrolling back up does nothing.
    for percent in [40, 100, 100] {
        monitor.observe_percent(percent);
    }

    assert_eq!(
        int_params(&log.calls(), "scroll_depth", "depth_percentage"),
        vec![25, 50, 75, 90, 100]
    );
}

#[test]
fn scroll_metrics_drive_the_same_sequence() {
    let (emitter, log) = recording_emitter();
    let mut monitor = ScrollMonitor::new(emitter);

    // 3000px document in a 1000px viewport: 2000px scrollable.
    for top in [200.0, 600.0, 1200.0, 1900.0, 2000.0] {
        monitor.observe(ScrollMetrics::new(top, 3000.0, 1000.0));
    }

    assert_eq!(
        int_params(&log.calls(), "scroll_depth", "depth_percentage"),
        vec![25, 50, 75, 90, 100]
    );
}

#[test]
fn scroll_below_lowest_threshold_emits_nothing() {
    let (emitter, log) = recording_emitter();
    let mut monitor = ScrollMonitor::new(emitter);

    for percent in [0, 5, 10, 24] {
        monitor.observe_percent(percent);
    }

    assert!(log.is_empty());
}

#[test]
fn dwell_below_lowest_threshold_emits_nothing() {
    let (emitter, log) = recording_emitter();
    let mut monitor = DwellMonitor::new(emitter);

    for secs in [0, 10, 20, 29] {
        monitor.check_elapsed(secs);
    }

    assert!(log.is_empty());
}

#[test]
fn dwell_exit_reports_regardless_of_thresholds() {
    let (emitter, log) = recording_emitter();
    let mut monitor = DwellMonitor::new(emitter);
    monitor.check_elapsed(300);

    monitor.exit();

    let calls = log.calls();
    assert_eq!(
        int_params(&calls, "time_on_page", "time_seconds"),
        vec![30, 60, 120, 300]
    );
    assert_eq!(int_params(&calls, "page_exit", "time_spent").len(), 1);
}
