//! Composition backend client implementation.

use std::path::{Path, PathBuf};

use futures_util::StreamExt;
use reqwest::multipart::{Form, Part};
use reqwest::{Body, Client, Response};
use serde::de::DeserializeOwned;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};
use url::Url;

use vcomp_models::{
    ApiEnvelope, ComposeRequest, ComposeResponse, ComposeResult, ErrorBody, FilesResponse,
    HealthResponse, TransitionDescriptor, TransitionsResponse, UploadResponse, UploadedVideo,
};

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::local::LocalVideoFile;

/// Multipart field the upload endpoint reads files from.
const UPLOAD_FIELD: &str = "files";

/// A file written to disk by [`ComposerClient::download`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadedFile {
    pub path: PathBuf,
    pub bytes: u64,
}

/// Client for the external composition backend.
#[derive(Debug, Clone)]
pub struct ComposerClient {
    http: Client,
    base_url: Url,
}

impl ComposerClient {
    /// Create a new client from configuration.
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| ClientError::invalid_url(format!("{}: {}", config.base_url, e)))?;

        if base_url.cannot_be_a_base() {
            return Err(ClientError::invalid_url(config.base_url.clone()));
        }

        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            base_url,
        })
    }

    /// Create from environment variables.
    pub fn from_env() -> ClientResult<Self> {
        Self::new(&ClientConfig::from_env())
    }

    /// Backend base URL every endpoint is built from.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build `<base>/<segments...>`, percent-encoding each segment.
    pub fn endpoint(&self, segments: &[&str]) -> ClientResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::invalid_url(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// URL that serves the file as an attachment.
    pub fn download_url(&self, filename: &str) -> ClientResult<Url> {
        self.endpoint(&["api", "download", filename])
    }

    /// URL that renders the file in a browser.
    pub fn preview_url(&self, filename: &str) -> ClientResult<Url> {
        self.endpoint(&["api", "preview", filename])
    }

    /// Check backend liveness.
    pub async fn health(&self) -> ClientResult<HealthResponse> {
        let url = self.endpoint(&["api", "health"])?;
        let response = self.http.get(url).send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            return Err(backend_error(status.as_u16(), &body));
        }

        Ok(serde_json::from_slice(&body)?)
    }

    /// Fetch the backend's transition catalog.
    pub async fn transitions(&self) -> ClientResult<Vec<TransitionDescriptor>> {
        let url = self.endpoint(&["api", "transitions"])?;
        let response = self.http.get(url).send().await?;
        let envelope: TransitionsResponse = read_envelope(response).await?;
        Ok(envelope.transitions)
    }

    /// List uploaded and produced files stored on the backend.
    pub async fn list_files(&self) -> ClientResult<FilesResponse> {
        let url = self.endpoint(&["api", "files"])?;
        let response = self.http.get(url).send().await?;
        read_envelope(response).await
    }

    /// Upload a single local file.
    ///
    /// Returns the descriptors the backend created for it.
    pub async fn upload(&self, file: &LocalVideoFile) -> ClientResult<Vec<UploadedVideo>> {
        let url = self.endpoint(&["api", "upload"])?;
        debug!("Uploading {} ({} bytes) to {}", file.path.display(), file.size, url);

        let handle = tokio::fs::File::open(&file.path).await?;
        let mut part = Part::stream_with_length(Body::from(handle), file.size)
            .file_name(file.name.clone());
        if let Some(mime) = &file.mime {
            part = part.mime_str(mime)?;
        }
        let form = Form::new().part(UPLOAD_FIELD, part);

        let response = self.http.post(url).multipart(form).send().await?;
        let envelope: UploadResponse = read_envelope(response).await?;

        info!(
            file = %file.name,
            stored = envelope.files.len(),
            "Uploaded video"
        );
        Ok(envelope.files)
    }

    /// Submit a composition job and wait for its result.
    pub async fn compose(&self, request: &ComposeRequest) -> ClientResult<ComposeResult> {
        let url = self.endpoint(&["api", "compose"])?;
        debug!(
            videos = request.video_files.len(),
            transitions = request.transitions.len(),
            output = %request.output_filename,
            "Submitting compose request"
        );

        let response = self.http.post(url).json(request).send().await?;
        let envelope: ComposeResponse = read_envelope(response).await?;

        let result = envelope
            .result
            .ok_or_else(|| ClientError::malformed("compose response without result"))?;

        info!(output = %result.output_filename, "Composition finished");
        Ok(result)
    }

    /// Download a produced file into `dest_dir`, keeping its name.
    pub async fn download(
        &self,
        filename: &str,
        dest_dir: impl AsRef<Path>,
    ) -> ClientResult<DownloadedFile> {
        let name = Path::new(filename)
            .file_name()
            .filter(|name| name.to_string_lossy() == filename)
            .ok_or_else(|| ClientError::invalid_file(format!("unsafe file name: {}", filename)))?;
        let dest = dest_dir.as_ref().join(name);

        let url = self.download_url(filename)?;
        debug!("Downloading {} to {}", url, dest.display());

        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.bytes().await?;
            return Err(backend_error(status.as_u16(), &body));
        }

        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let mut out = tokio::fs::File::create(&dest).await?;
        let mut bytes = 0u64;
        let mut stream = response.bytes_stream();

        while let Some(chunk) = stream.next().await {
            let chunk = match chunk {
                Ok(chunk) => chunk,
                Err(e) => {
                    warn!("Download of {} interrupted: {}", filename, e);
                    drop(out);
                    tokio::fs::remove_file(&dest).await.ok();
                    return Err(e.into());
                }
            };
            out.write_all(&chunk).await?;
            bytes += chunk.len() as u64;
        }
        out.flush().await?;

        info!("Downloaded {} ({} bytes)", dest.display(), bytes);
        Ok(DownloadedFile { path: dest, bytes })
    }
}

/// Decode a JSON envelope, turning HTTP and `status` failures into
/// [`ClientError::Backend`].
async fn read_envelope<T>(response: Response) -> ClientResult<T>
where
    T: DeserializeOwned + ApiEnvelope,
{
    let status = response.status();
    let body = response.bytes().await?;

    if !status.is_success() {
        return Err(backend_error(status.as_u16(), &body));
    }

    let envelope: T = serde_json::from_slice(&body)?;
    if !envelope.is_success() {
        return Err(ClientError::backend(
            status.as_u16(),
            envelope.error().map(str::to_string),
        ));
    }

    Ok(envelope)
}

fn backend_error(status: u16, body: &[u8]) -> ClientError {
    let message = serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error);
    ClientError::backend(status, message)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> ComposerClient {
        ComposerClient::new(&ClientConfig::default().with_base_url(base)).unwrap()
    }

    #[test]
    fn test_endpoint_paths() {
        let c = client("http://localhost:5000");
        assert_eq!(
            c.endpoint(&["api", "upload"]).unwrap().as_str(),
            "http://localhost:5000/api/upload"
        );
        assert_eq!(c.download_url("out.mp4").unwrap().path(), "/api/download/out.mp4");
        assert_eq!(c.preview_url("a b.mp4").unwrap().path(), "/api/preview/a%20b.mp4");
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let c = client("http://example.com/composer/");
        assert_eq!(
            c.endpoint(&["api", "compose"]).unwrap().as_str(),
            "http://example.com/composer/api/compose"
        );
    }

    #[test]
    fn test_rejects_bad_base_url() {
        let config = ClientConfig::default().with_base_url("not a url");
        assert!(matches!(
            ComposerClient::new(&config),
            Err(ClientError::InvalidUrl(_))
        ));

        let config = ClientConfig::default().with_base_url("mailto:ops@example.com");
        assert!(matches!(
            ComposerClient::new(&config),
            Err(ClientError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_backend_error_from_body() {
        let err = backend_error(413, br#"{"error": "file too large"}"#);
        assert_eq!(err.backend_message(), Some("file too large"));

        let err = backend_error(500, b"<html>oops</html>");
        assert_eq!(err.backend_message(), None);
        assert_eq!(err.http_status(), Some(500));
    }
}
