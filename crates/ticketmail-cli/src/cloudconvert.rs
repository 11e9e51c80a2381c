//! CloudConvert client for turning legacy `.doc` files into `.docx`.
//!
//! One job per document: upload, convert, export to a temporary URL. The
//! client waits on the synchronous API and downloads the result. No retries;
//! any failure is reported as is.

use std::collections::BTreeMap;
use std::time::Duration;

use futures_util::StreamExt;
use reqwest::multipart::{Form, Part};
use reqwest::{Response, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{debug, info};

use ticketmail_core::models::config::ConversionConfig;

#[derive(Error, Debug)]
pub enum ConversionError {
    #[error("API key not set; export {0} with a CloudConvert API key")]
    MissingApiKey(String),
    #[error("CloudConvert rejected the API key ({0})")]
    Auth(u16),
    #[error("CloudConvert quota exhausted ({0})")]
    Quota(u16),
    #[error("CloudConvert could not convert the file: {0}")]
    Format(String),
    #[error("CloudConvert returned {status}: {body}")]
    Server { status: u16, body: String },
    #[error("conversion job {id} failed: {message}")]
    Job { id: String, message: String },
    #[error("unexpected CloudConvert response: {0}")]
    Response(String),
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Something that turns legacy document bytes into `.docx` bytes.
#[allow(async_fn_in_trait)]
pub trait DocumentConverter {
    async fn convert(&self, data: &[u8], file_name: &str) -> Result<Vec<u8>, ConversionError>;
}

/// CloudConvert v2 API client.
pub struct CloudConvertClient {
    client: reqwest::Client,
    api_url: String,
    sync_api_url: String,
    api_key: String,
}

#[derive(Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
struct Job {
    id: String,
    status: String,
    #[serde(default)]
    tasks: Vec<Task>,
}

#[derive(Debug, Deserialize)]
struct Task {
    #[serde(default)]
    name: Option<String>,
    operation: String,
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    result: Option<TaskResult>,
}

#[derive(Debug, Deserialize)]
struct TaskResult {
    #[serde(default)]
    form: Option<UploadForm>,
    #[serde(default)]
    files: Vec<ExportedFile>,
}

#[derive(Debug, Deserialize)]
struct UploadForm {
    url: String,
    #[serde(default)]
    parameters: BTreeMap<String, Value>,
}

#[derive(Debug, Deserialize)]
struct ExportedFile {
    filename: String,
    url: String,
}

impl Job {
    fn task(&self, operation: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.operation == operation)
    }

    fn upload_form(&self) -> Result<&UploadForm, ConversionError> {
        self.task("import/upload")
            .and_then(|t| t.result.as_ref())
            .and_then(|r| r.form.as_ref())
            .ok_or_else(|| ConversionError::Response(format!("job {} has no upload form", self.id)))
    }

    fn exported_file(&self) -> Result<&ExportedFile, ConversionError> {
        if self.status != "finished" {
            let message = self
                .tasks
                .iter()
                .find(|t| t.status == "error")
                .map(|t| {
                    format!(
                        "{} ({}): {}",
                        t.name.as_deref().unwrap_or("task"),
                        t.operation,
                        t.message.as_deref().unwrap_or("no message")
                    )
                })
                .unwrap_or_else(|| format!("job status {}", self.status));
            return Err(ConversionError::Job {
                id: self.id.clone(),
                message,
            });
        }

        self.task("export/url")
            .and_then(|t| t.result.as_ref())
            .and_then(|r| r.files.first())
            .ok_or_else(|| ConversionError::Response(format!("job {} exported no file", self.id)))
    }
}

/// Map an HTTP error status to the conversion error taxonomy.
async fn check_status(response: Response) -> Result<Response, ConversionError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ConversionError::Auth(status.as_u16()),
        StatusCode::PAYMENT_REQUIRED | StatusCode::TOO_MANY_REQUESTS => {
            ConversionError::Quota(status.as_u16())
        }
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => ConversionError::Format(body),
        _ => ConversionError::Server {
            status: status.as_u16(),
            body,
        },
    })
}

fn job_request(input_format: &str) -> Value {
    json!({
        "tag": "ticketmail",
        "tasks": {
            "import-file": { "operation": "import/upload" },
            "convert-file": {
                "operation": "convert",
                "input": "import-file",
                "input_format": input_format,
                "output_format": "docx"
            },
            "export-file": {
                "operation": "export/url",
                "input": "convert-file"
            }
        }
    })
}

impl CloudConvertClient {
    /// Create a client with an explicitly supplied API key.
    pub fn new(api_key: impl Into<String>, config: &ConversionConfig) -> Result<Self, ConversionError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("ticketmail/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            sync_api_url: config.sync_api_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    /// Create a client reading the API key from the configured environment variable.
    pub fn from_env(config: &ConversionConfig) -> Result<Self, ConversionError> {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| ConversionError::MissingApiKey(config.api_key_env.clone()))?;
        Self::new(api_key, config)
    }

    async fn create_job(&self, input_format: &str) -> Result<Job, ConversionError> {
        let url = format!("{}/jobs", self.api_url);
        debug!(url = %url, "creating conversion job");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&job_request(input_format))
            .send()
            .await?;
        let envelope: Envelope<Job> = check_status(response).await?.json().await?;
        Ok(envelope.data)
    }

    async fn upload(&self, form: &UploadForm, data: &[u8], file_name: &str) -> Result<(), ConversionError> {
        let mut multipart = Form::new();
        for (key, value) in &form.parameters {
            let value = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            multipart = multipart.text(key.clone(), value);
        }
        multipart = multipart.part("file", Part::bytes(data.to_vec()).file_name(file_name.to_string()));

        let response = self.client.post(&form.url).multipart(multipart).send().await?;
        check_status(response).await?;
        Ok(())
    }

    async fn wait_for_job(&self, id: &str) -> Result<Job, ConversionError> {
        let url = format!("{}/jobs/{}", self.sync_api_url, id);
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.api_key)
            .send()
            .await?;
        let envelope: Envelope<Job> = check_status(response).await?.json().await?;
        Ok(envelope.data)
    }

    async fn download(&self, file: &ExportedFile) -> Result<Vec<u8>, ConversionError> {
        let response = check_status(self.client.get(&file.url).send().await?).await?;

        let mut data = Vec::with_capacity(response.content_length().unwrap_or(0) as usize);
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            data.extend_from_slice(&chunk?);
        }

        debug!(file = %file.filename, bytes = data.len(), "downloaded converted file");
        Ok(data)
    }
}

impl DocumentConverter for CloudConvertClient {
    async fn convert(&self, data: &[u8], file_name: &str) -> Result<Vec<u8>, ConversionError> {
        let input_format = file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_lowercase())
            .filter(|ext| !ext.is_empty())
            .unwrap_or_else(|| "doc".to_string());

        info!(file = %file_name, bytes = data.len(), "converting {} to docx", input_format);

        let job = self.create_job(&input_format).await?;
        self.upload(job.upload_form()?, data, file_name).await?;

        let finished = self.wait_for_job(&job.id).await?;
        let exported = finished.exported_file()?;
        let converted = self.download(exported).await?;

        info!(job = %job.id, bytes = converted.len(), "conversion complete");
        Ok(converted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CREATED_JOB: &str = r#"{
        "data": {
            "id": "6559c281-ed85-4728-80db-414561c631e9",
            "status": "waiting",
            "tasks": [
                {
                    "id": "t1",
                    "name": "import-file",
                    "operation": "import/upload",
                    "status": "waiting",
                    "result": {
                        "form": {
                            "url": "https://storage.cloudconvert.com/tasks/t1",
                            "parameters": { "expires": 1545444403, "signature": "abc" }
                        }
                    }
                },
                { "id": "t2", "name": "convert-file", "operation": "convert", "status": "waiting" }
            ]
        }
    }"#;

    const FINISHED_JOB: &str = r#"{
        "data": {
            "id": "6559c281-ed85-4728-80db-414561c631e9",
            "status": "finished",
            "tasks": [
                {
                    "name": "export-file",
                    "operation": "export/url",
                    "status": "finished",
                    "result": {
                        "files": [{ "filename": "ticket.docx", "url": "https://storage.cloudconvert.com/ticket.docx" }]
                    }
                }
            ]
        }
    }"#;

    const FAILED_JOB: &str = r#"{
        "data": {
            "id": "j-9",
            "status": "error",
            "tasks": [
                {
                    "name": "convert-file",
                    "operation": "convert",
                    "status": "error",
                    "message": "Input file is corrupt"
                }
            ]
        }
    }"#;

    fn parse(json: &str) -> Job {
        serde_json::from_str::<Envelope<Job>>(json).unwrap().data
    }

    #[test]
    fn test_upload_form_from_created_job() {
        let job = parse(CREATED_JOB);
        let form = job.upload_form().unwrap();
        assert_eq!(form.url, "https://storage.cloudconvert.com/tasks/t1");
        assert_eq!(form.parameters["signature"], "abc");
    }

    #[test]
    fn test_exported_file_from_finished_job() {
        let job = parse(FINISHED_JOB);
        assert_eq!(job.exported_file().unwrap().filename, "ticket.docx");
    }

    #[test]
    fn test_failed_job_reports_task_message() {
        let job = parse(FAILED_JOB);
        match job.exported_file() {
            Err(ConversionError::Job { id, message }) => {
                assert_eq!(id, "j-9");
                assert!(message.contains("Input file is corrupt"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_job_request_targets_docx() {
        let request = job_request("doc");
        assert_eq!(request["tasks"]["convert-file"]["input_format"], "doc");
        assert_eq!(request["tasks"]["convert-file"]["output_format"], "docx");
    }

    #[test]
    fn test_missing_api_key() {
        let config = ConversionConfig {
            api_key_env: "TICKETMAIL_TEST_UNSET_KEY".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            CloudConvertClient::from_env(&config),
            Err(ConversionError::MissingApiKey(_))
        ));
    }
}
