pub mod fixtures;

use plate_intelligence::IntelligenceConfig;

/// Routes `log` output through the test harness.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Default thresholds with a lower character minimum, so short fixture
/// plates can pass.
pub fn test_config() -> IntelligenceConfig {
    IntelligenceConfig {
        minimum_chars: 3,
        ..IntelligenceConfig::default()
    }
}
