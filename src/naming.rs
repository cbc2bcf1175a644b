//! Naming convention linking services to their data-access objects.

use crate::config::Config;
use crate::key::{DATA_ACCESS_CONFIG_SECTION, SERVICE_CONFIG_SECTION};

const DEFAULT_SERVICE_PREFIX: &str = "";
const DEFAULT_SERVICE_SUFFIX: &str = "Service";
const DEFAULT_DATA_ACCESS_PREFIX: &str = "";
const DEFAULT_DATA_ACCESS_SUFFIX: &str = "DAO";

/// Prefix/suffix rules for deriving a data-access type name from a service
/// type name.
///
/// The service affixes are stripped (prefix only at the start, suffix only at
/// the end), and the remaining core is wrapped in the data-access affixes.
///
/// # Examples
///
/// ```rust
/// use ferrous_services::NamingConvention;
///
/// let naming = NamingConvention::default();
/// assert_eq!(naming.derive_data_access_name("WidgetService"), "WidgetDAO");
/// assert_eq!(naming.derive_data_access_name("app::Widget"), "app::WidgetDAO");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamingConvention {
    pub service_prefix: String,
    pub service_suffix: String,
    pub data_access_prefix: String,
    pub data_access_suffix: String,
}

impl Default for NamingConvention {
    fn default() -> Self {
        Self {
            service_prefix: DEFAULT_SERVICE_PREFIX.to_string(),
            service_suffix: DEFAULT_SERVICE_SUFFIX.to_string(),
            data_access_prefix: DEFAULT_DATA_ACCESS_PREFIX.to_string(),
            data_access_suffix: DEFAULT_DATA_ACCESS_SUFFIX.to_string(),
        }
    }
}

impl NamingConvention {
    /// Reads `application.class.{prefix,suffix}` and
    /// `data_access.class.{prefix,suffix}`.
    ///
    /// Each key missing from the configuration (or no configuration at all)
    /// keeps its compiled-in default.
    pub fn from_config(config: Option<&Config>) -> Self {
        let defaults = Self::default();
        let Some(config) = config else {
            return defaults;
        };
        let read = |section: &str, key: &str, fallback: String| {
            config
                .value(&format!("{}.class.{}", section, key))
                .unwrap_or(fallback)
        };
        Self {
            service_prefix: read(SERVICE_CONFIG_SECTION, "prefix", defaults.service_prefix),
            service_suffix: read(SERVICE_CONFIG_SECTION, "suffix", defaults.service_suffix),
            data_access_prefix: read(DATA_ACCESS_CONFIG_SECTION, "prefix", defaults.data_access_prefix),
            data_access_suffix: read(DATA_ACCESS_CONFIG_SECTION, "suffix", defaults.data_access_suffix),
        }
    }

    /// Strips the service affixes and applies the data-access affixes.
    pub fn derive_data_access_name(&self, service_type_name: &str) -> String {
        let core = service_type_name
            .strip_prefix(self.service_prefix.as_str())
            .unwrap_or(service_type_name);
        let core = core.strip_suffix(self.service_suffix.as_str()).unwrap_or(core);
        format!("{}{}{}", self.data_access_prefix, core, self.data_access_suffix)
    }
}
