//! Configuration types deserialized from `socnet.toml`.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer};
use socnet_netlist::CheckOptions;

/// The top-level project configuration parsed from `socnet.toml`.
#[derive(Debug, Deserialize)]
pub struct ProjectConfig {
    /// Core project metadata.
    pub project: ProjectMeta,
    /// Where module and bus schemas are loaded from.
    #[serde(default)]
    pub library: LibraryConfig,
    /// Where generated files are written.
    #[serde(default)]
    pub output: OutputConfig,
    /// Which consistency checks run after expansion.
    #[serde(default)]
    pub check: CheckConfig,
}

/// Core project metadata required in every `socnet.toml`.
#[derive(Debug, Deserialize)]
pub struct ProjectMeta {
    /// The project name.
    pub name: String,
    /// A brief description of the project.
    #[serde(default)]
    pub description: String,
}

/// Schema library locations, relative to the project root.
///
/// Each entry is a schema file or a directory scanned for schema files.
#[derive(Debug, Deserialize, PartialEq, Eq)]
pub struct LibraryConfig {
    /// Module schema files or directories.
    #[serde(
        default = "default_module_paths",
        deserialize_with = "deserialize_string_or_vec"
    )]
    pub module: Vec<String>,
    /// Bus schema files or directories.
    #[serde(
        default = "default_bus_paths",
        deserialize_with = "deserialize_string_or_vec"
    )]
    pub bus: Vec<String>,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            module: default_module_paths(),
            bus: default_bus_paths(),
        }
    }
}

fn default_module_paths() -> Vec<String> {
    vec!["module".to_string()]
}

fn default_bus_paths() -> Vec<String> {
    vec!["bus".to_string()]
}

/// Output settings for `expand`.
#[derive(Debug, Deserialize, PartialEq, Eq)]
pub struct OutputConfig {
    /// Directory receiving `<stem>.yaml`, relative to the project root.
    #[serde(default = "default_output_dir")]
    pub dir: String,
    /// Also write the unconnected port report `<stem>.nc.rpt`.
    #[serde(default)]
    pub report: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            report: false,
        }
    }
}

fn default_output_dir() -> String {
    "output".to_string()
}

/// Consistency check toggles.
#[derive(Debug, Deserialize, PartialEq, Eq)]
pub struct CheckConfig {
    /// Check that connections on each net agree on width.
    #[serde(default = "enabled")]
    pub width: bool,
    /// Check that each net has exactly one driver.
    #[serde(default = "enabled")]
    pub direction: bool,
    /// Report module ports that are on no net.
    #[serde(default)]
    pub unconnected: bool,
    /// Treat check findings as errors.
    #[serde(default)]
    pub strict: bool,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            width: true,
            direction: true,
            unconnected: false,
            strict: false,
        }
    }
}

impl CheckConfig {
    /// Converts the toggles into options for [`socnet_netlist::check_netlist`].
    pub fn to_options(&self) -> CheckOptions {
        CheckOptions {
            width: self.width,
            direction: self.direction,
            unconnected: self.unconnected,
            strict: self.strict,
        }
    }
}

fn enabled() -> bool {
    true
}

/// Deserializes a field that can be either a single string or a list of strings.
///
/// Allows `module = "lib/module"` as well as `module = ["a", "b"]`.
fn deserialize_string_or_vec<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    struct StringOrVec;

    impl<'de> Visitor<'de> for StringOrVec {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            formatter.write_str("a string or a list of strings")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            Ok(vec![v.to_string()])
        }

        fn visit_seq<A: de::SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
            let mut paths = Vec::new();
            while let Some(path) = seq.next_element::<String>()? {
                paths.push(path);
            }
            Ok(paths)
        }
    }

    deserializer.deserialize_any(StringOrVec)
}
