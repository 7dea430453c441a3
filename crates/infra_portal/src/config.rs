//! Portal connection settings

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Connection settings of the consumption portal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortalConfig {
    /// Scheme and host, e.g. `https://www.kulutus-web.com`
    pub base_url: String,
    /// Path of the page that opens the session
    pub login_page_path: String,
    /// Utility plant id sent with the login form
    pub plant_id: String,
    /// Business sector id sent with the login form
    pub sector_id: String,
    /// Portal language
    pub language: String,
    /// Timeout of each request
    pub timeout: Duration,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.kulutus-web.com".to_string(),
            login_page_path: "/Nokia/vesi/Suomi/".to_string(),
            plant_id: "4".to_string(),
            sector_id: "2".to_string(),
            language: "suomi".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl PortalConfig {
    /// Creates the default settings for another portal host
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    fn base(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    pub fn login_page_url(&self) -> String {
        format!("{}{}", self.base(), self.login_page_path)
    }

    pub fn login_check_url(&self) -> String {
        format!("{}/common/logincheck_old.asp", self.base())
    }

    /// Resolves a menu link, which is relative to the `common` directory
    pub fn common_url(&self, href: &str) -> String {
        format!("{}/common/{}", self.base(), href.trim_start_matches('/'))
    }
}
