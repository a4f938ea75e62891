//! HTTP/JSON implementation of the Mail Service boundary.

use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;

use super::wire::{
    ChatRequest, ChatResponse, ErrorBody, GenerateResponse, ItemRecord, PromptUpdate, ReplyUpdate,
};
use super::{GenerateRequest, MailService, MailServiceError, NewDraft};
use crate::config::Settings;
use crate::model::{ChatMessage, CorrespondenceItem, ItemId, Partition, Prompt};

/// Mail Service reached over HTTP.
#[derive(Debug, Clone)]
pub struct HttpMailService {
    http: reqwest::Client,
    base_url: String,
}

impl HttpMailService {
    /// Creates a client for the service described by `settings`.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings are invalid or the HTTP client
    /// cannot be built.
    pub fn new(settings: &Settings) -> crate::Result<Self> {
        settings.validate()?;
        let http = reqwest::Client::builder()
            .timeout(settings.request_timeout())
            .build()?;

        Ok(Self {
            http,
            base_url: settings.service_url.trim_end_matches('/').to_string(),
        })
    }

    /// Base URL requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Sends a request and turns non-success statuses into errors.
    async fn send(request: RequestBuilder) -> Result<Response, MailServiceError> {
        let response = request.send().await.map_err(transport_error)?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let raw = response.text().await.unwrap_or_default();
        Err(status_error(status, &raw))
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, MailServiceError> {
        response
            .json()
            .await
            .map_err(|e| MailServiceError::Decode(e.to_string()))
    }
}

/// Maps a transport-level failure.
fn transport_error(err: reqwest::Error) -> MailServiceError {
    if err.is_decode() {
        MailServiceError::Decode(err.to_string())
    } else {
        MailServiceError::Connection(err.to_string())
    }
}

/// Maps a non-success response, preferring the service's `detail` text.
fn status_error(status: StatusCode, raw: &str) -> MailServiceError {
    let message = ErrorBody::message(raw)
        .or_else(|| Some(raw.trim().to_string()).filter(|s| !s.is_empty()))
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("no detail").to_string());

    if status == StatusCode::NOT_FOUND {
        MailServiceError::NotFound(message)
    } else {
        MailServiceError::Status {
            status: status.as_u16(),
            message,
        }
    }
}

const fn partition_path(partition: Partition) -> &'static str {
    match partition {
        Partition::Inbox => "/emails/",
        Partition::Drafts => "/drafts/",
    }
}

impl MailService for HttpMailService {
    async fn reset(&self) -> Result<(), MailServiceError> {
        Self::send(self.http.post(self.url("/reset-db"))).await?;
        tracing::info!("Mail Service reset at {}", self.base_url);
        Ok(())
    }

    async fn list_items(
        &self,
        partition: Partition,
    ) -> Result<Vec<CorrespondenceItem>, MailServiceError> {
        let response = Self::send(self.http.get(self.url(partition_path(partition)))).await?;
        let records: Vec<ItemRecord> = Self::decode(response).await?;
        tracing::debug!(
            "Fetched {} {} items",
            records.len(),
            partition.display_name()
        );
        Ok(records
            .into_iter()
            .map(|record| record.into_item(partition))
            .collect())
    }

    async fn reprocess_inbox(&self) -> Result<(), MailServiceError> {
        Self::send(self.http.post(self.url("/process-emails/"))).await?;
        Ok(())
    }

    async fn delete_item(&self, id: ItemId) -> Result<(), MailServiceError> {
        Self::send(self.http.delete(self.url(&format!("/emails/{id}")))).await?;
        Ok(())
    }

    async fn chat(
        &self,
        id: ItemId,
        query: &str,
        history: &[ChatMessage],
    ) -> Result<String, MailServiceError> {
        let body = ChatRequest { query, history };
        let response = Self::send(
            self.http
                .post(self.url(&format!("/emails/{id}/chat")))
                .json(&body),
        )
        .await?;
        let reply: ChatResponse = Self::decode(response).await?;
        Ok(reply.response)
    }

    async fn generate_body(&self, request: &GenerateRequest) -> Result<String, MailServiceError> {
        let response =
            Self::send(self.http.post(self.url("/drafts/generate")).json(request)).await?;
        let generated: GenerateResponse = Self::decode(response).await?;
        Ok(generated.body)
    }

    async fn create_draft(&self, draft: &NewDraft) -> Result<CorrespondenceItem, MailServiceError> {
        let response = Self::send(self.http.post(self.url("/drafts/")).json(draft)).await?;
        let record: ItemRecord = Self::decode(response).await?;
        Ok(record.into_item(Partition::Drafts))
    }

    async fn update_reply_draft(&self, id: ItemId, content: &str) -> Result<(), MailServiceError> {
        Self::send(
            self.http
                .put(self.url(&format!("/emails/{id}/reply")))
                .json(&ReplyUpdate { content }),
        )
        .await?;
        Ok(())
    }

    async fn list_prompts(&self) -> Result<Vec<Prompt>, MailServiceError> {
        let response = Self::send(self.http.get(self.url("/prompts/"))).await?;
        Self::decode(response).await
    }

    async fn update_prompt(&self, prompt: &Prompt) -> Result<(), MailServiceError> {
        Self::send(
            self.http
                .put(self.url(&format!("/prompts/{}", prompt.id)))
                .json(&PromptUpdate::from(prompt)),
        )
        .await?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let settings = Settings {
            service_url: "http://localhost:8000/".into(),
            ..Settings::default()
        };
        let service = HttpMailService::new(&settings).unwrap();
        assert_eq!(service.base_url(), "http://localhost:8000");
        assert_eq!(service.url("/emails/"), "http://localhost:8000/emails/");
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let settings = Settings {
            service_url: "localhost:8000".into(),
            ..Settings::default()
        };
        assert!(HttpMailService::new(&settings).is_err());
    }

    #[test]
    fn test_status_error_not_found_uses_detail() {
        let err = status_error(StatusCode::NOT_FOUND, r#"{"detail": "Email not found"}"#);
        assert_eq!(err, MailServiceError::NotFound("Email not found".into()));
    }

    #[test]
    fn test_status_error_falls_back_to_body_then_reason() {
        let err = status_error(StatusCode::INTERNAL_SERVER_ERROR, "boom");
        assert_eq!(
            err,
            MailServiceError::Status {
                status: 500,
                message: "boom".into()
            }
        );

        let err = status_error(StatusCode::BAD_GATEWAY, "");
        assert_eq!(
            err,
            MailServiceError::Status {
                status: 502,
                message: "Bad Gateway".into()
            }
        );
    }

    #[test]
    fn test_partition_paths() {
        assert_eq!(partition_path(Partition::Inbox), "/emails/");
        assert_eq!(partition_path(Partition::Drafts), "/drafts/");
    }
}
