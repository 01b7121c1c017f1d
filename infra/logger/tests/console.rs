use autoani_logger::{LevelFilter, Logger, LoggerError};

#[test]
fn console_logger_installs_once() {
    let logger = Logger::builder()
        .name("autoani-console")
        .level(LevelFilter::INFO)
        .init()
        .expect("first init should succeed");
    assert!(!logger.writes_files());

    let err = Logger::builder().name("autoani-console-again").init().expect_err("second init");
    assert!(matches!(err, LoggerError::Subscriber { .. }));
}
