use serde::{Deserialize, Serialize};

/// Endpoint used when neither the component nor the injected config names one.
pub const DEFAULT_ENDPOINT: &str = "https://api-euw1.poststack.dev";

/**
 * Fallback configuration shared by every image in the app.
 */

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq, Serialize, Hash)]
pub struct PoststackConfig {
    pub project_id: Option<String>,
    pub public_key: Option<String>,
    pub endpoint: Option<String>,
}

impl PoststackConfig {
    /// Values baked in at compile time from `POSTSTACK_PROJECT`, `POSTSTACK_PK`
    /// and `POSTSTACK_ENDPOINT`. Works in WASM builds.
    pub fn from_build_env() -> Self {
        Self {
            project_id: option_env!("POSTSTACK_PROJECT").map(str::to_string),
            public_key: option_env!("POSTSTACK_PK").map(str::to_string),
            endpoint: option_env!("POSTSTACK_ENDPOINT").map(str::to_string),
        }
    }

    /// Same variables as [`PoststackConfig::from_build_env`], read at runtime.
    pub fn from_env() -> Self {
        Self {
            project_id: std::env::var("POSTSTACK_PROJECT").ok(),
            public_key: std::env::var("POSTSTACK_PK").ok(),
            endpoint: std::env::var("POSTSTACK_ENDPOINT").ok(),
        }
    }

    pub fn with_project_id(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }

    pub fn with_public_key(mut self, public_key: impl Into<String>) -> Self {
        self.public_key = Some(public_key.into());
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Endpoint after fallback, without trailing slashes.
    pub fn resolved_endpoint(&self) -> String {
        non_empty(self.endpoint.as_deref())
            .unwrap_or(DEFAULT_ENDPOINT)
            .trim_end_matches('/')
            .to_string()
    }
}

/// Everything needed to talk to the image service. Only exists when both the
/// project id and the public key resolved to something non-empty.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Credentials {
    pub project_id: String,
    pub public_key: String,
    pub endpoint: String,
}

/// Merges explicit props over the injected defaults.
///
/// Props win over `defaults`, `defaults` win over the hardcoded endpoint.
/// Empty strings are treated as missing at every level.
pub fn resolve_credentials(
    project_id: Option<&str>,
    public_key: Option<&str>,
    defaults: &PoststackConfig,
) -> Option<Credentials> {
    let project_id = non_empty(project_id).or(non_empty(defaults.project_id.as_deref()))?;
    let public_key = non_empty(public_key).or(non_empty(defaults.public_key.as_deref()))?;

    Some(Credentials {
        project_id: project_id.to_string(),
        public_key: public_key.to_string(),
        endpoint: defaults.resolved_endpoint(),
    })
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
