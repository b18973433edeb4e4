// Environment overrides live in their own test binary so no other test
// observes the mutated process environment.

use prioq::config::ConfigError;
use prioq::QueueConfig;

#[test]
fn environment_overrides_file_values() {
    std::env::set_var("PRIOQ_MAX_QUEUE_DEPTH", "7");
    std::env::set_var("PRIOQ_MAX_POLL_WAIT_TIME", "3");

    let cfg = QueueConfig::load(Some("prioq.toml")).unwrap();
    assert_eq!(cfg.max_queue_depth, 7);
    assert_eq!(cfg.max_put_wait_time, 250);
    assert_eq!(cfg.max_poll_wait_time, 3);

    std::env::set_var("PRIOQ_MAX_PUT_WAIT_TIME", "soon");
    let err = QueueConfig::load(None).unwrap_err();
    assert!(matches!(err, ConfigError::Parse(msg) if msg.starts_with("PRIOQ_MAX_PUT_WAIT_TIME")));

    std::env::remove_var("PRIOQ_MAX_PUT_WAIT_TIME");
    let cfg = QueueConfig::load(None).unwrap();
    assert_eq!(cfg.max_queue_depth, 7);
    assert_eq!(cfg.max_put_wait_time, 0);
}
