use serde::{Deserialize, Serialize};

/// User preferences persisted to settings.json.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    pub dark_mode: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serde_camel_case_key() {
        let settings = AppSettings { dark_mode: true };
        let json = serde_json::to_string(&settings).unwrap();
        assert!(
            json.contains("darkMode"),
            "Expected camelCase key 'darkMode' in JSON, got: {}",
            json
        );
        assert!(!json.contains("dark_mode"));
    }

    #[test]
    fn default_is_light_mode() {
        assert!(!AppSettings::default().dark_mode);
    }
}
