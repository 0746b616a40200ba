use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    pub school: School,
    pub api: ApiSettings,
    pub currency: CurrencySettings,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct School {
    pub name: String,
    /// Academic year as "YYYY-YYYY" (e.g., "2025-2026")
    pub academic_year: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ApiSettings {
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Send an SMS/WhatsApp notification after each recorded payment
    #[serde(default = "default_notify")]
    pub notify: bool,
}

fn default_timeout_secs() -> u64 {
    5
}

fn default_notify() -> bool {
    true
}

#[derive(Debug, Deserialize, Serialize)]
pub struct CurrencySettings {
    pub code: String,
    pub symbol: String,
}
