use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::payment::PaymentMethod;

#[derive(Debug, Deserialize, Serialize, Default)]
pub struct State {
    /// Last-issued receipt sequence per "<yearCode>-<classCode>" key
    #[serde(default)]
    pub counters: BTreeMap<String, u32>,
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
}

impl State {
    /// Storage key for a per-(year, class) receipt counter
    pub fn counter_key(year_code: &str, class_code: &str) -> String {
        format!("{year_code}-{class_code}")
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct HistoryEntry {
    pub receipt: String,
    pub student: String,
    pub class: String,
    pub amount: i64,
    pub method: PaymentMethod,
    #[serde(default)]
    pub change: i64,
    pub date: NaiveDate,
    pub time: String,
}
