use crate::domain::model::{SubmitFailure, SubmitOutcome};
use crate::utils::error::Result;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str = "http://backend:8080";

/// 判斷回應中的 `errors` 欄位是否代表整批失敗
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteErrorPolicy {
    /// `errors` 為非空陣列才算失敗
    NonEmptyList,
    /// 只要 `errors` 存在且不為 null 就算失敗
    AnyPresent,
}

impl RemoteErrorPolicy {
    fn reported_errors(&self, errors: Option<&Value>) -> Option<usize> {
        match (self, errors) {
            (_, None) | (_, Some(Value::Null)) => None,
            (RemoteErrorPolicy::NonEmptyList, Some(Value::Array(items))) if items.is_empty() => {
                None
            }
            (_, Some(Value::Array(items))) => Some(items.len()),
            (_, Some(_)) => Some(1),
        }
    }
}

#[derive(Serialize)]
struct BulkInsertRequest<'a, P> {
    data: &'a [P],
}

#[derive(Debug, Default, Deserialize)]
struct BulkInsertResponse {
    #[serde(default)]
    errors: Option<Value>,
}

/// 批次寫入後端的 HTTP 客戶端，所有領域共用一個連線池
#[derive(Debug, Clone)]
pub struct BulkInsertClient {
    client: Client,
    base_url: String,
}

impl BulkInsertClient {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn endpoint(&self, resource: &str) -> String {
        format!("{}/{}", self.base_url, resource.trim_start_matches('/'))
    }

    /// POST `{ "data": [...] }`，一批只發一次請求，不切分也不重試
    pub async fn post_batch<P>(
        &self,
        resource: &str,
        data: &[P],
        policy: RemoteErrorPolicy,
    ) -> SubmitOutcome
    where
        P: Serialize + Sync,
    {
        match self.try_post_batch(resource, data, policy).await {
            Ok(()) => SubmitOutcome::Success,
            Err(failure) => failure.into(),
        }
    }

    async fn try_post_batch<P>(
        &self,
        resource: &str,
        data: &[P],
        policy: RemoteErrorPolicy,
    ) -> std::result::Result<(), SubmitFailure>
    where
        P: Serialize + Sync,
    {
        let url = self.endpoint(resource);
        tracing::debug!("POST {} ({} records)", url, data.len());

        let response = self
            .client
            .post(&url)
            .json(&BulkInsertRequest { data })
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("Backend response status: {}", status);

        // 狀態碼 >= 300 一律視為失敗
        if status.as_u16() >= 300 {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!("unable to batch insert the data: {}", body);
            return Err(SubmitFailure::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.bytes().await?;
        let parsed = if body.is_empty() {
            BulkInsertResponse::default()
        } else {
            match serde_json::from_slice::<BulkInsertResponse>(&body) {
                Ok(parsed) => parsed,
                Err(e) => {
                    tracing::debug!("Response body is not a JSON object ({}), assuming no errors", e);
                    BulkInsertResponse::default()
                }
            }
        };

        match policy.reported_errors(parsed.errors.as_ref()) {
            None => Ok(()),
            Some(count) => {
                tracing::warn!("some errors occurred when batch uploading data");
                Err(SubmitFailure::RemoteErrors { count })
            }
        }
    }
}
