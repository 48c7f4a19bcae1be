//! The fixed set of configuration keys the editor understands

use std::fmt;

use serde::{Deserialize, Serialize};

/// A recognized configuration key
///
/// Anything outside this list is ignored when building a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConfigKey {
    HubsServer,
    ReticulumServer,
    ThumbnailServer,
    CorsProxyServer,
    NonCorsProxyDomains,
    SentryDsn,
    GaTrackingId,
    BaseAssetsPath,
    IsMoz,
    BackendServer,
    BackendEndpointPermissions,
    BackendEndpointRefreshAccessToken,
    BuildVersion,
    NodeEnv,
    RouterBasePath,
}

impl ConfigKey {
    pub const ALL: [ConfigKey; 15] = [
        ConfigKey::HubsServer,
        ConfigKey::ReticulumServer,
        ConfigKey::ThumbnailServer,
        ConfigKey::CorsProxyServer,
        ConfigKey::NonCorsProxyDomains,
        ConfigKey::SentryDsn,
        ConfigKey::GaTrackingId,
        ConfigKey::BaseAssetsPath,
        ConfigKey::IsMoz,
        ConfigKey::BackendServer,
        ConfigKey::BackendEndpointPermissions,
        ConfigKey::BackendEndpointRefreshAccessToken,
        ConfigKey::BuildVersion,
        ConfigKey::NodeEnv,
        ConfigKey::RouterBasePath,
    ];

    /// Environment variable name of the key
    pub const fn as_str(&self) -> &'static str {
        match self {
            ConfigKey::HubsServer => "HUBS_SERVER",
            ConfigKey::ReticulumServer => "RETICULUM_SERVER",
            ConfigKey::ThumbnailServer => "THUMBNAIL_SERVER",
            ConfigKey::CorsProxyServer => "CORS_PROXY_SERVER",
            ConfigKey::NonCorsProxyDomains => "NON_CORS_PROXY_DOMAINS",
            ConfigKey::SentryDsn => "SENTRY_DSN",
            ConfigKey::GaTrackingId => "GA_TRACKING_ID",
            ConfigKey::BaseAssetsPath => "BASE_ASSETS_PATH",
            ConfigKey::IsMoz => "IS_MOZ",
            ConfigKey::BackendServer => "BACKEND_SERVER",
            ConfigKey::BackendEndpointPermissions => "BACKEND_ENDPOINT_PERMISSIONS",
            ConfigKey::BackendEndpointRefreshAccessToken => {
                "BACKEND_ENDPOINT_REFRESH_ACCESS_TOKEN"
            }
            ConfigKey::BuildVersion => "BUILD_VERSION",
            ConfigKey::NodeEnv => "NODE_ENV",
            ConfigKey::RouterBasePath => "ROUTER_BASE_PATH",
        }
    }

    /// Look a key up by its variable name; unknown names yield `None`
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.as_str() == name)
    }

    /// Keys holding a flag rather than a string
    pub fn is_flag(&self) -> bool {
        matches!(self, ConfigKey::IsMoz)
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
