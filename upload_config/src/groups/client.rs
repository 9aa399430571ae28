use std::time::Duration;

crate::config_group!({

    /// Base URL of the file service.
    ///
    /// Use the environment variable `UPLOADER_CLIENT_ENDPOINT` to set this value.
    ref endpoint: String = "http://localhost:8080".to_string();

    /// Path of the multipart upload endpoint, relative to `endpoint`.
    ref upload_path: String = "/api/user/file/upload".to_string();

    /// Path of the progress query endpoint, relative to `endpoint`.
    ref progress_path: String = "/api/user/file/upload-progress".to_string();

    /// If set, sent as a bearer token on every request.
    ///
    /// Use the environment variable `UPLOADER_CLIENT_API_KEY` to set this value.
    ref api_key: Option<String> = None;

    ref user_agent: String = concat!("upload_tool/", env!("CARGO_PKG_VERSION")).to_string();

    /// Abort a request that has not completed within this time. A timed out progress
    /// query fails the tracking session like any other query error.
    ///
    /// Use the environment variable `UPLOADER_CLIENT_REQUEST_TIMEOUT` to set this value, e.g. "45s".
    ref request_timeout: Option<Duration> = Some(Duration::from_secs(30));
});
