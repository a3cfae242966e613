//! # Gateway configuration and shared state
//!
//! Environment variables are read once at startup into [`GatewayConfig`].
//! The request handlers only ever see [`GatewayState`], which is built from
//! the config and shared behind an `Arc`.

use std::str::FromStr;
use std::time::Duration;

use anyhow::Context;

use crate::storage::ObjectStore;

/// Default bind address.
const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:5001";
/// Default bucket. Every operation targets this one bucket.
const DEFAULT_BUCKET: &str = "produtos-fotos";
const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 30;
const DEFAULT_MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// Which object store implementation backs the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    /// S3-compatible provider (AWS S3, MinIO, R2, ...)
    S3,
    /// Process-local map, signed URLs served from a loopback listener
    Memory,
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "s3" => Ok(StorageBackend::S3),
            "memory" => Ok(StorageBackend::Memory),
            other => anyhow::bail!("unknown STORAGE_BACKEND: {other} (expected s3 or memory)"),
        }
    }
}

/// Connection settings of the S3-compatible provider.
#[derive(Debug, Clone)]
pub struct S3Settings {
    pub endpoint: String,
    /// `None` means: detect from an AWS endpoint, else `us-east-1`
    pub region: Option<String>,
    pub access_key: String,
    pub secret_key: String,
    pub bucket: String,
}

/// Startup configuration.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub listen_addr: String,
    pub backend: StorageBackend,
    pub s3: S3Settings,
    /// Applied to every store call and to the signed-URL fetch
    pub upstream_timeout: Duration,
    /// Body limit of `POST /enviar`
    pub max_upload_bytes: usize,
}

impl GatewayConfig {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`, which returns the value of
    /// a variable or `None` when it is unset.
    pub fn from_vars<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let backend: StorageBackend = var("STORAGE_BACKEND", "s3").parse()?;

        let upstream_timeout_secs = lookup("UPSTREAM_TIMEOUT_SECS")
            .map(|v| v.parse::<u64>())
            .transpose()
            .context("UPSTREAM_TIMEOUT_SECS must be a whole number of seconds")?
            .unwrap_or(DEFAULT_UPSTREAM_TIMEOUT_SECS);
        if upstream_timeout_secs == 0 {
            anyhow::bail!("UPSTREAM_TIMEOUT_SECS must be at least 1");
        }

        let max_upload_bytes = lookup("MAX_UPLOAD_BYTES")
            .map(|v| v.parse::<usize>())
            .transpose()
            .context("MAX_UPLOAD_BYTES must be a byte count")?
            .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES);

        Ok(Self {
            listen_addr: var("LISTEN_ADDR", DEFAULT_LISTEN_ADDR),
            backend,
            s3: S3Settings {
                endpoint: var("S3_ENDPOINT", "http://localhost:9000"),
                region: lookup("S3_REGION"),
                access_key: var("S3_ACCESS_KEY", "minioadmin"),
                secret_key: var("S3_SECRET_KEY", "minioadmin"),
                bucket: var("S3_BUCKET", DEFAULT_BUCKET),
            },
            upstream_timeout: Duration::from_secs(upstream_timeout_secs),
            max_upload_bytes,
        })
    }
}

/// Shared state of the gateway. Immutable after startup.
pub struct GatewayState {
    /// Object store (S3-compatible or in-memory, behind the trait)
    pub store: Box<dyn ObjectStore>,
    /// Client used to fetch signed URLs
    pub http_client: reqwest::Client,
    /// Upper bound on a single store call
    pub store_timeout: Duration,
}

impl GatewayState {
    /// Builds the state around an already constructed store.
    pub fn new(store: Box<dyn ObjectStore>, upstream_timeout: Duration) -> anyhow::Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(upstream_timeout)
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            store,
            http_client,
            store_timeout: upstream_timeout,
        })
    }
}
