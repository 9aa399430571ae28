use std::time::Duration;

crate::config_group!({

    /// Time between consecutive progress queries.
    ///
    /// Use the environment variable `UPLOADER_TRACKING_POLL_INTERVAL` to set this value.
    ref poll_interval: Duration = Duration::from_secs(3);
});
