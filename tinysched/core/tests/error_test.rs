//! Error and limit tests for tinysched-core

use tinysched_core::{SchedError, MAX_QUEUE_SIZE, MAX_TASKS};

#[test]
fn test_error_display() {
    assert_eq!(SchedError::CapacityExceeded.to_string(), "Task table is full");
    assert_eq!(SchedError::QueueFull.to_string(), "Queue is full");
    assert_eq!(
        SchedError::TimerAlreadyArmed.to_string(),
        "Periodic alarm already armed"
    );
}

#[test]
fn test_reference_limits() {
    assert_eq!(MAX_TASKS, 5);
    assert_eq!(MAX_QUEUE_SIZE, 10);
}
