#[derive(Debug, Clone)]
pub struct IngestSettings {
    pub max_upload_bytes: usize,
    pub max_files_per_batch: usize,
}

impl Default for IngestSettings {
    fn default() -> Self {
        Self {
            // Workshop logs are text; even a long scrim stays far below this.
            max_upload_bytes: 32 * 1024 * 1024,
            max_files_per_batch: 16,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AnalyticsSettings {
    /// Denominator for rate-normalized hero metrics ("per 10 minutes").
    pub rate_window_secs: f64,
    /// Cap on scrims returned by the plain listing endpoint.
    pub scrim_list_limit: usize,
}

impl Default for AnalyticsSettings {
    fn default() -> Self {
        Self {
            rate_window_secs: 600.0,
            scrim_list_limit: 100,
        }
    }
}

#[derive(Debug, Clone)]
pub struct IdentitySettings {
    /// Normalized Levenshtein similarity at or above which two catalog
    /// names are reported as duplicate candidates.
    pub similarity_threshold: f64,
}

impl Default for IdentitySettings {
    fn default() -> Self {
        Self {
            similarity_threshold: 0.8,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub ingest: IngestSettings,
    pub analytics: AnalyticsSettings,
    pub identity: IdentitySettings,
}

impl AppConfig {
    pub fn new() -> Self {
        Self::default()
    }
}

// Passed explicitly (dependency injection) rather than held in a global.
