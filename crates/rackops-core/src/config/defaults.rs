//! Default values for configuration fields.

pub fn default_refresh_interval_secs() -> u64 {
    10
}

pub fn default_gc_interval_secs() -> u64 {
    30
}

pub fn default_expiration_window_secs() -> u64 {
    300
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_sane() {
        assert!(default_refresh_interval_secs() > 0);
        assert!(default_gc_interval_secs() > 0);
        assert!(default_expiration_window_secs() > default_gc_interval_secs());
    }
}
