//! Presentation collaborator.
//!
//! [`PresentationService`] is the narrow seam the exporter talks through; [`GoogleSlidesClient`]
//! implements it against the Drive v3 and Slides v1 REST APIs.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::credentials::AccessToken;
use super::requests::{Presentation, SlideRequest};
use crate::{OpordError, OpordResult};

const DRIVE_API_BASE: &str = "https://www.googleapis.com/drive/v3";
const SLIDES_API_BASE: &str = "https://slides.googleapis.com/v1";

#[async_trait]
pub trait PresentationService: Send + Sync {
    /// Copy the template presentation and return the new file id.
    async fn copy_template(
        &self,
        token: &AccessToken,
        template_id: &str,
        title: &str,
    ) -> OpordResult<String>;

    /// Create an empty presentation.
    async fn create_presentation(
        &self,
        token: &AccessToken,
        title: &str,
    ) -> OpordResult<Presentation>;

    async fn batch_update(
        &self,
        token: &AccessToken,
        presentation_id: &str,
        requests: &[SlideRequest],
    ) -> OpordResult<()>;
}

pub struct GoogleSlidesClient {
    http: reqwest::Client,
    drive_base: String,
    slides_base: String,
}

impl GoogleSlidesClient {
    pub fn new(timeout_secs: u64) -> OpordResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(OpordError::HttpClient)?;
        Ok(Self {
            http,
            drive_base: DRIVE_API_BASE.to_string(),
            slides_base: SLIDES_API_BASE.to_string(),
        })
    }

    async fn post<B, R>(&self, url: &str, token: &AccessToken, body: &B) -> OpordResult<R>
    where
        B: Serialize + ?Sized + Sync,
        R: DeserializeOwned,
    {
        let response = self
            .http
            .post(url)
            .bearer_auth(token.as_str())
            .json(body)
            .send()
            .await
            .map_err(OpordError::SlidesRequest)?;

        let status = response.status();
        let text = response.text().await.map_err(OpordError::SlidesRequest)?;
        if !status.is_success() {
            return Err(OpordError::SlidesApi {
                status: status.as_u16(),
                body: text,
            });
        }
        serde_json::from_str(&text).map_err(|e| OpordError::SlidesResponse(e.to_string()))
    }
}

#[derive(Serialize)]
struct CopyRequest<'a> {
    name: &'a str,
}

#[derive(Deserialize)]
struct CopyResponse {
    id: String,
}

#[derive(Serialize)]
struct CreateRequest<'a> {
    title: &'a str,
}

#[derive(Serialize)]
struct BatchUpdateRequest<'a> {
    requests: &'a [SlideRequest],
}

#[async_trait]
impl PresentationService for GoogleSlidesClient {
    async fn copy_template(
        &self,
        token: &AccessToken,
        template_id: &str,
        title: &str,
    ) -> OpordResult<String> {
        let url = format!("{}/files/{template_id}/copy", self.drive_base);
        let copy: CopyResponse = self.post(&url, token, &CopyRequest { name: title }).await?;
        Ok(copy.id)
    }

    async fn create_presentation(
        &self,
        token: &AccessToken,
        title: &str,
    ) -> OpordResult<Presentation> {
        let url = format!("{}/presentations", self.slides_base);
        let presentation: Presentation =
            self.post(&url, token, &CreateRequest { title }).await?;
        if presentation.presentation_id.is_empty() {
            return Err(OpordError::SlidesResponse(
                "create response has no presentationId".into(),
            ));
        }
        Ok(presentation)
    }

    async fn batch_update(
        &self,
        token: &AccessToken,
        presentation_id: &str,
        requests: &[SlideRequest],
    ) -> OpordResult<()> {
        let url = format!(
            "{}/presentations/{presentation_id}:batchUpdate",
            self.slides_base
        );
        let _: serde_json::Value = self
            .post(&url, token, &BatchUpdateRequest { requests })
            .await?;
        tracing::debug!(presentation_id, requests = requests.len(), "batch update applied");
        Ok(())
    }
}
