use std::time::Duration;

use serde::{Deserialize, Serialize};
use ureq::Agent;

use crate::config::ApiSettings;
use crate::error::{FeesError, Result};
use crate::payment::PaymentMethod;

/// A payment already persisted by the backend. `method` stays a raw string
/// here; remote records predate method normalization and can carry free-text
/// variants.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRecord {
    #[serde(default)]
    pub id: Option<String>,
    pub student_id: String,
    pub amount: i64,
    #[serde(default)]
    pub method: String,
    pub receipt_id: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub time: String,
}

/// Expected/paid/remaining fee totals for one student and academic year
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StudentBalance {
    pub total_expected: i64,
    pub total_paid: i64,
    pub total_remaining: i64,
}

impl StudentBalance {
    /// Re-derive the remaining total from expected and paid, clamped at zero
    pub fn normalized(&self) -> Self {
        let expected = self.total_expected.max(0);
        let paid = self.total_paid.max(0);
        Self {
            total_expected: expected,
            total_paid: paid,
            total_remaining: (expected - paid).max(0),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub student_id: String,
    pub amount: i64,
    pub method: PaymentMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount_given: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change: Option<i64>,
    pub receipt_id: String,
    pub date: String,
    pub time: String,
}

/// Backend response envelope: { success, data?, error? }. The `Option`
/// fields decode to `None` when absent; a `#[serde(default)]` here would
/// drag a `T: Default` bound into the derived impl.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    success: bool,
    data: Option<T>,
    error: Option<String>,
}

/// Thin client over the school-management payments API
pub struct ApiClient {
    agent: Agent,
    base_url: String,
}

impl ApiClient {
    pub fn new(settings: &ApiSettings) -> Self {
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(settings.timeout_secs)))
            .build()
            .into();

        Self {
            agent,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn get_payments(&self) -> Result<Vec<PaymentRecord>> {
        let body = self.get(&format!("{}/payments", self.base_url))?;
        let envelope: Envelope<Vec<PaymentRecord>> = serde_json::from_str(&body)?;
        unwrap_envelope(envelope)
    }

    pub fn get_student_balance(
        &self,
        student_id: &str,
        academic_year: &str,
    ) -> Result<StudentBalance> {
        let url = format!(
            "{}/students/{}/balance?academicYear={}",
            self.base_url, student_id, academic_year
        );
        let body = self.get(&url)?;
        let envelope: Envelope<StudentBalance> = serde_json::from_str(&body)?;
        unwrap_envelope(envelope)
    }

    pub fn create_payment(&self, request: &PaymentRequest) -> Result<PaymentRecord> {
        let payload = serde_json::to_string(request)?;
        let body = self.post(&format!("{}/payments", self.base_url), &payload)?;
        let envelope: Envelope<PaymentRecord> = serde_json::from_str(&body)?;
        unwrap_envelope(envelope)
    }

    /// Fire-and-forget SMS/WhatsApp dispatch. Failures come back as
    /// `Notification` errors so the caller can warn without touching the
    /// already committed payment.
    pub fn notify(&self, student_id: &str, message: &str) -> Result<()> {
        let payload = serde_json::json!({
            "studentId": student_id,
            "message": message,
        })
        .to_string();

        let body = self
            .post(&format!("{}/notifications", self.base_url), &payload)
            .map_err(|e| FeesError::Notification(e.to_string()))?;
        let envelope: Envelope<serde_json::Value> =
            serde_json::from_str(&body).map_err(|e| FeesError::Notification(e.to_string()))?;

        if envelope.success {
            Ok(())
        } else {
            Err(FeesError::Notification(
                envelope.error.unwrap_or_else(|| "unknown error".to_string()),
            ))
        }
    }

    fn get(&self, url: &str) -> Result<String> {
        let body = self.agent.get(url).call()?.body_mut().read_to_string()?;
        Ok(body)
    }

    fn post(&self, url: &str, payload: &str) -> Result<String> {
        let body = self
            .agent
            .post(url)
            .header("content-type", "application/json")
            .send(payload)?
            .body_mut()
            .read_to_string()?;
        Ok(body)
    }
}

fn unwrap_envelope<T>(envelope: Envelope<T>) -> Result<T> {
    if !envelope.success {
        return Err(FeesError::ApiRejected(
            envelope.error.unwrap_or_else(|| "unknown error".to_string()),
        ));
    }
    envelope
        .data
        .ok_or_else(|| FeesError::ApiRejected("missing data in response".to_string()))
}
