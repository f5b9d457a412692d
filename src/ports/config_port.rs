//! Configuration access port.

/// Raw `[section] key` lookups. Typing and validation happen in
/// `domain::config_validation`, which reports unparsable values as errors.
pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;

    fn has_key(&self, section: &str, key: &str) -> bool {
        self.get_string(section, key).is_some()
    }
}
