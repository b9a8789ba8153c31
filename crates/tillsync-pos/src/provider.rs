//! Port implementations over the POS client
//!
//! Maps provider DTOs to domain types. Validation failures in provider data
//! (empty names, malformed dates) surface as decode errors rather than
//! panics: one bad payload must not take down the process, only the run.

use chrono::NaiveDate;
use tracing::warn;

use tillsync_core::domain::{FetchError, RenderError, Report, User, UserId, UserName};
use tillsync_core::ports::{DocumentGenerator, ReportSource};

use crate::client::PosClient;

/// Date format used by the provider's report payloads
const REPORT_DATE_FORMAT: &str = "%Y-%m-%d";

#[async_trait::async_trait]
impl ReportSource for PosClient {
    async fn list_users(&self) -> Result<Vec<User>, FetchError> {
        let users = self.fetch_users().await?;

        users
            .into_iter()
            .map(|u| {
                let name = UserName::new(u.name)
                    .map_err(|e| FetchError::Decode(format!("invalid user name: {e}")))?;
                let id = UserId::new(u.id)
                    .map_err(|e| FetchError::Decode(format!("invalid user ID: {e}")))?;
                Ok(User::new(name, id))
            })
            .collect()
    }

    async fn list_reports(&self, user: &User) -> Result<Vec<Report>, FetchError> {
        let raw = self.fetch_daily_reports(user.id().as_str()).await?;

        raw.into_iter()
            .map(|item| {
                let date = report_date(&item)?;
                Ok(Report::new(user.clone(), date, item))
            })
            .collect()
    }
}

#[async_trait::async_trait]
impl DocumentGenerator for PosClient {
    async fn render(&self, report: &Report) -> Result<Vec<u8>, RenderError> {
        let date = report.date().format(REPORT_DATE_FORMAT).to_string();
        let bytes = self
            .fetch_report_pdf(report.user().id().as_str(), &date)
            .await?;

        if !bytes.starts_with(b"%PDF") {
            warn!(
                user = %report.user().name(),
                date,
                "Rendered document does not look like a PDF"
            );
        }

        Ok(bytes)
    }
}

/// Extracts the report day from a raw provider payload
fn report_date(item: &serde_json::Value) -> Result<NaiveDate, FetchError> {
    let date_str = item
        .get("date")
        .and_then(|v| v.as_str())
        .ok_or_else(|| FetchError::Decode("report payload has no 'date' field".to_string()))?;

    NaiveDate::parse_from_str(date_str, REPORT_DATE_FORMAT)
        .map_err(|e| FetchError::Decode(format!("invalid report date '{date_str}': {e}")))
}
