use super::schema::Config;

/// Validate configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_config(config: &Config) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if let Some(limit) = config.limit {
        if !(1..=100).contains(&limit) {
            errors.push(format!("limit: must be between 1 and 100, got {}", limit));
        }
    }

    for (field, value) in [("login", &config.login), ("reviewer", &config.reviewer)] {
        if let Some(name) = value {
            if name.trim().is_empty() {
                errors.push(format!("{}: must not be empty", field));
            } else if name.contains(char::is_whitespace) {
                errors.push(format!("{}: '{}' must not contain whitespace", field, name));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_limit_out_of_range() {
        let config = Config {
            limit: Some(0),
            ..Config::default()
        };
        let errors = validate_config(&config).unwrap_err();
        assert!(errors[0].contains("limit"));

        let config = Config {
            limit: Some(101),
            ..Config::default()
        };
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_blank_login() {
        let config = Config {
            login: Some("  ".to_string()),
            ..Config::default()
        };
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors, vec!["login: must not be empty".to_string()]);
    }

    #[test]
    fn test_collects_all_errors() {
        let config = Config {
            login: Some("".to_string()),
            reviewer: Some("two words".to_string()),
            limit: Some(500),
            format: None,
        };
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }
}
