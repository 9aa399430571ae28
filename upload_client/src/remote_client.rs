use async_trait::async_trait;
use error_printer::ErrorPrinter;
use reqwest::multipart::{Form, Part};
use reqwest_middleware::ClientWithMiddleware;
use tracing::{debug, info, warn};
use upload_config::groups::client::ConfigValueGroup as ClientConfig;
use upload_types::{FileId, FolderId, ProgressSnapshot, UploadedFile};
use url::Url;

use crate::error::{status_text, Result, UploadClientError};
use crate::http_client::build_http_client;
use crate::interface::{FilePayload, FileUploadClient, ProgressClient};

pub const FILES_FIELD: &str = "files";
pub const FOLDER_ID_FIELD: &str = "folder_id";
pub const FILE_IDS_PARAM: &str = "file_ids";

/// Talks to the file service over HTTP.
#[derive(Debug)]
pub struct RemoteClient {
    client: ClientWithMiddleware,
    upload_url: Url,
    progress_url: Url,
}

impl RemoteClient {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = build_http_client(config)?;
        Ok(Self {
            client,
            upload_url: join_url(&config.endpoint, &config.upload_path)?,
            progress_url: join_url(&config.endpoint, &config.progress_path)?,
        })
    }

    fn progress_url_for(&self, file_ids: &[FileId]) -> Url {
        let mut url = self.progress_url.clone();
        {
            let mut pairs = url.query_pairs_mut();
            for id in file_ids {
                pairs.append_pair(FILE_IDS_PARAM, &id.to_string());
            }
        }
        url
    }
}

fn join_url(endpoint: &str, path: &str) -> Result<Url> {
    let endpoint = endpoint.trim_end_matches('/');
    if endpoint.is_empty() {
        return Err(UploadClientError::ConfigurationError("endpoint is empty".to_owned()));
    }
    let path = path.trim_start_matches('/');
    Ok(Url::parse(&format!("{endpoint}/{path}"))?)
}

#[async_trait]
impl FileUploadClient for RemoteClient {
    async fn upload_files(&self, files: Vec<FilePayload>, folder_id: Option<FolderId>) -> Result<Vec<UploadedFile>> {
        let n_files = files.len();
        let mut form = Form::new();
        for file in files {
            form = form.part(FILES_FIELD, Part::bytes(file.data).file_name(file.file_name));
        }
        if let Some(folder_id) = folder_id {
            form = form.text(FOLDER_ID_FIELD, folder_id.to_string());
        }

        debug!("Upload: POST {n_files} file(s) to {}", self.upload_url);
        let response = self
            .client
            .post(self.upload_url.clone())
            .multipart(form)
            .send()
            .await
            .log_error("upload request failed")
            .map_err(|e| UploadClientError::UploadFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            warn!("Upload rejected with status {status}");
            return Err(UploadClientError::UploadFailed(status_text(status)));
        }

        let uploaded: Vec<UploadedFile> = response
            .json()
            .await
            .map_err(|e| UploadClientError::UploadFailed(format!("invalid upload response: {e}")))?;

        info!("Uploaded {n_files} file(s), server assigned ids {:?}", uploaded.iter().map(|f| f.id).collect::<Vec<_>>());
        Ok(uploaded)
    }
}

#[async_trait]
impl ProgressClient for RemoteClient {
    async fn query_progress(&self, file_ids: &[FileId]) -> Result<ProgressSnapshot> {
        let url = self.progress_url_for(file_ids);
        debug!("Progress query: GET {url}");

        let response = self.client.get(url).send().await?;
        let status = response.status();
        debug!("Progress query response status: {status}");

        if !status.is_success() {
            let body = response
                .text()
                .await
                .log_error("error reading progress error body")
                .unwrap_or_default();
            return Err(UploadClientError::progress_query_failed(status, body));
        }

        let body = response.bytes().await?;
        let snapshot: ProgressSnapshot =
            serde_json::from_slice(&body).log_error("error json decoding progress response")?;
        Ok(snapshot)
    }
}
