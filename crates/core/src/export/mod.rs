//! # Presentation export
//!
//! Turns a generated [`OpordDocument`] into a Google Slides presentation.
//!
//! - **Template mode** (a template id is configured): copy the template through Drive and replace
//!   every `{{PLACEHOLDER}}` token in one `batchUpdate`.
//! - **Freeform mode**: create a blank presentation and build nine text slides, one per order
//!   paragraph or sub-paragraph, in one `batchUpdate`.
//!
//! Export being unavailable (no client secrets configured, the file missing, or nobody has
//! authorised yet) is an [`ExportOutcome`], not an error. Failures of the Google APIs themselves
//! are errors and are never retried.

pub mod credentials;
pub mod google;
pub mod requests;

use std::sync::Arc;

use serde::Serialize;

use crate::config::SlidesConfig;
use crate::constants::UNIT_SHORT;
use crate::document::OpordDocument;
use crate::fields::Field;
use crate::OpordResult;

use credentials::{Credential, CredentialProvider, FileCredentialProvider, StaticCredentialProvider};
use google::{GoogleSlidesClient, PresentationService};
use requests::{freeform_requests, slide_contents, template_requests};

/// Why an export could not be attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnavailableReason {
    NotConfigured,
    CredentialsFileMissing,
    AuthorisationRequired,
}

impl UnavailableReason {
    pub fn message(&self) -> &'static str {
        match self {
            UnavailableReason::NotConfigured => {
                "Google Slides export is not configured. Set GOOGLE_CREDENTIALS_FILE to enable it."
            }
            UnavailableReason::CredentialsFileMissing => {
                "Google credentials file not found. Check GOOGLE_CREDENTIALS_FILE."
            }
            UnavailableReason::AuthorisationRequired => {
                "Google Slides export has not been authorised yet. Run `opord authorise`."
            }
        }
    }
}

impl std::fmt::Display for UnavailableReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    Exported { presentation_id: String, url: String },
    Unavailable(UnavailableReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportMode {
    Template(String),
    Freeform,
}

/// `OPORD {operation|TBD} - {unit_short}`.
pub fn presentation_title(doc: &OpordDocument) -> String {
    let operation = Field::OperationName.or_fallback(doc.value(Field::OperationName));
    let unit_short = if doc.unit_short.is_empty() {
        UNIT_SHORT
    } else {
        doc.unit_short.as_str()
    };
    format!("OPORD {operation} - {unit_short}")
}

pub fn presentation_url(presentation_id: &str) -> String {
    format!("https://docs.google.com/presentation/d/{presentation_id}/edit")
}

/// Exports documents through a [`PresentationService`].
#[derive(Clone)]
pub struct SlidesExporter {
    service: Arc<dyn PresentationService>,
    credentials: Arc<dyn CredentialProvider>,
    template_id: Option<String>,
    configured: bool,
}

impl SlidesExporter {
    pub fn new(
        service: Arc<dyn PresentationService>,
        credentials: Arc<dyn CredentialProvider>,
        template_id: Option<String>,
    ) -> Self {
        Self {
            service,
            credentials,
            template_id,
            configured: true,
        }
    }

    /// Build the Google-backed exporter described by `config`.
    pub fn from_config(config: &SlidesConfig) -> OpordResult<Self> {
        let service = Arc::new(GoogleSlidesClient::new(config.timeout_secs())?);
        let Some(secrets) = config.credentials_file() else {
            let mut exporter = Self::new(
                service,
                Arc::new(StaticCredentialProvider::unavailable(
                    UnavailableReason::NotConfigured,
                )),
                None,
            );
            exporter.configured = false;
            return Ok(exporter);
        };

        let credentials = FileCredentialProvider::new(
            secrets.to_path_buf(),
            config.token_file().to_path_buf(),
            config.timeout_secs(),
        )?;
        Ok(Self::new(
            service,
            Arc::new(credentials),
            config.template_id().map(str::to_string),
        ))
    }

    /// False only when no client-secrets file was configured at all.
    pub fn is_configured(&self) -> bool {
        self.configured
    }

    pub fn mode(&self) -> ExportMode {
        match &self.template_id {
            Some(id) => ExportMode::Template(id.clone()),
            None => ExportMode::Freeform,
        }
    }

    pub async fn export(&self, doc: &OpordDocument) -> OpordResult<ExportOutcome> {
        let token = match self.credentials.credential().await? {
            Credential::Ready(token) => token,
            Credential::Unavailable(reason) => {
                tracing::info!(?reason, "slides export unavailable");
                return Ok(ExportOutcome::Unavailable(reason));
            }
        };

        let title = presentation_title(doc);
        let presentation_id = match self.mode() {
            ExportMode::Template(template_id) => {
                let id = self
                    .service
                    .copy_template(&token, &template_id, &title)
                    .await?;
                self.service
                    .batch_update(&token, &id, &template_requests(doc))
                    .await?;
                id
            }
            ExportMode::Freeform => {
                let presentation = self.service.create_presentation(&token, &title).await?;
                let requests = freeform_requests(&presentation, &slide_contents(doc));
                self.service
                    .batch_update(&token, &presentation.presentation_id, &requests)
                    .await?;
                presentation.presentation_id
            }
        };

        let url = presentation_url(&presentation_id);
        tracing::info!(%presentation_id, %title, "exported OPORD to slides");
        Ok(ExportOutcome::Exported {
            presentation_id,
            url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::credentials::AccessToken;
    use crate::export::requests::{Presentation, SlideRequest};
    use crate::schema::OpordData;
    use crate::OpordError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Copy { template_id: String, title: String },
        Create { title: String },
        Batch { presentation_id: String, count: usize },
    }

    #[derive(Default)]
    struct FakeSlides {
        calls: Mutex<Vec<Call>>,
        fail_batch: bool,
    }

    impl FakeSlides {
        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PresentationService for FakeSlides {
        async fn copy_template(
            &self,
            token: &AccessToken,
            template_id: &str,
            title: &str,
        ) -> OpordResult<String> {
            assert_eq!(token.as_str(), "ya29.test");
            self.calls.lock().unwrap().push(Call::Copy {
                template_id: template_id.into(),
                title: title.into(),
            });
            Ok("copied-1".into())
        }

        async fn create_presentation(
            &self,
            _token: &AccessToken,
            title: &str,
        ) -> OpordResult<Presentation> {
            self.calls.lock().unwrap().push(Call::Create {
                title: title.into(),
            });
            Ok(Presentation {
                presentation_id: "created-1".into(),
                slides: vec![],
            })
        }

        async fn batch_update(
            &self,
            _token: &AccessToken,
            presentation_id: &str,
            requests: &[SlideRequest],
        ) -> OpordResult<()> {
            self.calls.lock().unwrap().push(Call::Batch {
                presentation_id: presentation_id.into(),
                count: requests.len(),
            });
            if self.fail_batch {
                return Err(OpordError::SlidesApi {
                    status: 403,
                    body: "forbidden".into(),
                });
            }
            Ok(())
        }
    }

    fn document() -> OpordDocument {
        OpordDocument::from(&OpordData {
            operation_name: "IRON HAWK".into(),
            ..OpordData::default()
        })
    }

    fn exporter(fake: Arc<FakeSlides>, template_id: Option<&str>) -> SlidesExporter {
        SlidesExporter::new(
            fake,
            Arc::new(StaticCredentialProvider::ready("ya29.test")),
            template_id.map(str::to_string),
        )
    }

    #[tokio::test]
    async fn template_mode_copies_then_updates_once() {
        let fake = Arc::new(FakeSlides::default());
        let outcome = exporter(fake.clone(), Some("tmpl-9"))
            .export(&document())
            .await
            .unwrap();

        assert_eq!(
            outcome,
            ExportOutcome::Exported {
                presentation_id: "copied-1".into(),
                url: "https://docs.google.com/presentation/d/copied-1/edit".into(),
            }
        );
        let calls = fake.calls();
        assert_eq!(
            calls[0],
            Call::Copy {
                template_id: "tmpl-9".into(),
                title: "OPORD IRON HAWK - C/1-7 CAV".into(),
            }
        );
        assert_eq!(calls.len(), 2);
        assert!(matches!(&calls[1], Call::Batch { presentation_id, count }
            if presentation_id == "copied-1" && *count == template_requests(&document()).len()));
    }

    #[tokio::test]
    async fn freeform_mode_creates_then_updates_once() {
        let fake = Arc::new(FakeSlides::default());
        let outcome = exporter(fake.clone(), None)
            .export(&OpordDocument::default())
            .await
            .unwrap();

        assert!(matches!(outcome, ExportOutcome::Exported { ref presentation_id, .. } if presentation_id == "created-1"));
        assert_eq!(
            fake.calls(),
            vec![
                Call::Create {
                    title: "OPORD TBD - C/1-7 CAV".into()
                },
                Call::Batch {
                    presentation_id: "created-1".into(),
                    count: 27
                },
            ]
        );
    }

    #[tokio::test]
    async fn unavailable_credential_skips_the_service() {
        let fake = Arc::new(FakeSlides::default());
        let exporter = SlidesExporter::new(
            fake.clone(),
            Arc::new(StaticCredentialProvider::unavailable(
                UnavailableReason::AuthorisationRequired,
            )),
            None,
        );

        let outcome = exporter.export(&document()).await.unwrap();
        assert_eq!(
            outcome,
            ExportOutcome::Unavailable(UnavailableReason::AuthorisationRequired)
        );
        assert!(fake.calls().is_empty());
    }

    #[tokio::test]
    async fn batch_failure_is_an_error() {
        let fake = Arc::new(FakeSlides {
            fail_batch: true,
            ..FakeSlides::default()
        });
        let result = exporter(fake, None).export(&document()).await;
        assert!(matches!(
            result,
            Err(OpordError::SlidesApi { status: 403, .. })
        ));
    }

    #[tokio::test]
    async fn unconfigured_exporter_reports_not_configured() {
        let exporter = SlidesExporter::from_config(&SlidesConfig::disabled()).unwrap();
        assert!(!exporter.is_configured());
        assert_eq!(
            exporter.export(&document()).await.unwrap(),
            ExportOutcome::Unavailable(UnavailableReason::NotConfigured)
        );
    }

    #[test]
    fn mode_follows_template_id() {
        let fake = Arc::new(FakeSlides::default());
        assert_eq!(exporter(fake.clone(), None).mode(), ExportMode::Freeform);
        assert_eq!(
            exporter(fake, Some("t")).mode(),
            ExportMode::Template("t".into())
        );
    }

    #[test]
    fn reasons_serialize_snake_case() {
        assert_eq!(
            serde_json::to_string(&UnavailableReason::CredentialsFileMissing).unwrap(),
            r#""credentials_file_missing""#
        );
    }
}
