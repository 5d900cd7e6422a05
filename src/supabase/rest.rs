//! Data API endpoints (`/rest/v1`).

use reqwest::Method;

use super::types::SupabaseError;
use super::{SupabaseClient, read_json, send};

impl SupabaseClient {
    pub(super) async fn select_one(
        &self,
        table: &str,
        access_token: Option<&str>,
    ) -> Result<Vec<serde_json::Value>, SupabaseError> {
        let builder = self
            .request(Method::GET, &format!("rest/v1/{table}"), access_token)
            .query(&[("select", "*"), ("limit", "1")]);
        read_json(send(builder).await?).await
    }
}
