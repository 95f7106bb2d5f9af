
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_validate_default_config() {
        let config = Config::default();
        let result = ConfigValidator::validate(&config).unwrap();
        assert!(result.is_valid());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_validate_ring_too_small() {
        let mut config = Config::default();
        config.queue.max_queue_size = 1;

        let result = ConfigValidator::validate(&config).unwrap();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.path == "queue.max_queue_size"));
    }

    #[test]
    fn test_validate_ring_too_large() {
        let mut config = Config::default();
        config.queue.max_queue_size = MAX_QUEUE_SIZE + 1;

        let result = ConfigValidator::validate(&config).unwrap();
        assert!(!result.is_valid());
    }

    #[test]
    fn test_validate_smallest_ring() {
        let mut config = Config::default();
        config.queue.max_queue_size = MIN_QUEUE_SIZE;

        let result = ConfigValidator::validate(&config).unwrap();
        assert!(result.is_valid());
    }

    #[test]
    fn test_validate_empty_data_dir() {
        let mut config = Config::default();
        config.queue.data_dir = PathBuf::new();

        let result = ConfigValidator::validate(&config).unwrap();
        assert!(result.errors.iter().any(|e| e.path == "queue.data_dir"));
    }

    #[test]
    fn test_validate_sync_off_warning() {
        let mut config = Config::default();
        config.queue.sync_mode = SyncMode::Off;

        let result = ConfigValidator::validate(&config).unwrap();
        assert!(result.is_valid());
        assert!(result.warnings.iter().any(|w| w.path == "queue.sync_mode"));
    }

    #[test]
    fn test_validate_filter_directive_warning() {
        let mut config = Config::default();
        config.logging.level = "levelq_queue=trace".to_string();

        let result = ConfigValidator::validate(&config).unwrap();
        assert!(result.is_valid());
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn test_into_result_reports_first_error() {
        let mut config = Config::default();
        config.queue.max_queue_size = 0;

        let result = ConfigValidator::validate(&config).unwrap();
        match result.into_result() {
            Err(ConfigError::InvalidValue { field, .. }) => {
                assert_eq!(field, "queue.max_queue_size");
            }
            other => panic!("expected InvalidValue, got {:?}", other),
        }
    }

    #[test]
    fn test_validation_result_add_warning() {
        let mut result = ValidationResult::default();
        result.add_warning(ValidationWarning::new("test", "warning"));
        assert!(result.is_valid()); // Warnings don't make it invalid
        assert_eq!(result.warnings.len(), 1);
    }
