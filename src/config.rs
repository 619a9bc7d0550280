use {
    crate::{
        config::{config_fields::*, yaml_utils::*},
        order::OrderIdAllocator,
        types::Size,
        utils::constants::NOW,
    },
    std::{fs::read_to_string, path::{Path, PathBuf}},
    yaml_rust::{ScanError, YamlLoader},
};

#[cfg(test)]
mod tests;

/// [`OddLotBroker`](crate::broker::OddLotBroker) settings.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct BrokerConfig {
    /// Tradable unit of the exchange. Orders of other sizes are odd lots.
    pub tradable_unit: Size,
    /// Number of history slots retained by each broker order book.
    pub history_depth: usize,
    /// Delay, in nanoseconds, stamped on every outgoing broker action.
    pub delay: u64,
    /// Size of the order ID block reserved for each broker.
    pub id_block: u64,
}

impl Default for BrokerConfig {
    fn default() -> Self {
        BrokerConfig {
            tradable_unit: Size(5),
            history_depth: 10,
            delay: NOW,
            id_block: OrderIdAllocator::DEFAULT_BLOCK,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Cannot read {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Cannot parse YAML: {0}")]
    Scan(#[from] ScanError),
    #[error("YAML config does not have \"{0}\" section")]
    MissingSection(&'static str),
    #[error("\"{section}\" section of the YAML config should be {expected}. Got {got}")]
    WrongType {
        section: String,
        expected: &'static str,
        got: String,
    },
    #[error("\"{field}\" should be {requirement}. Got {value}")]
    InvalidValue {
        field: &'static str,
        requirement: &'static str,
        value: i64,
    },
}

mod yaml_utils
{
    use {
        crate::config::ConfigError,
        yaml_rust::{Yaml, yaml::Hash},
    };

    pub fn expect_yaml_hashmap<'a>(yml: &'a Yaml, section: &'static str) -> Result<&'a Hash, ConfigError>
    {
        match yml {
            Yaml::Hash(map) => Ok(map),
            Yaml::BadValue => Err(ConfigError::MissingSection(section)),
            _ => Err(
                ConfigError::WrongType {
                    section: section.to_string(),
                    expected: "named entries",
                    got: format!("{yml:?}"),
                }
            )
        }
    }

    pub fn try_read_yaml_integer(
        map: &Hash,
        section: &'static str,
        field: &'static str) -> Result<Option<i64>, ConfigError>
    {
        match map.get(&Yaml::String(field.to_string())) {
            None | Some(Yaml::Null) => Ok(None),
            Some(Yaml::Integer(integer)) => Ok(Some(*integer)),
            Some(yml) => Err(
                ConfigError::WrongType {
                    section: format!("{section}.{field}"),
                    expected: "Integer",
                    got: format!("{yml:?}"),
                }
            )
        }
    }
}

mod config_fields {
    /// Main section
    pub const BROKER: &str = "Broker";

    /// Broker specific fields
    pub const TRADABLE_UNIT: &str = "tradable_unit";
    pub const HISTORY_DEPTH: &str = "history_depth";
    pub const DELAY: &str = "delay";
    pub const ID_BLOCK: &str = "id_block";
}

fn positive(field: &'static str, value: i64) -> Result<i64, ConfigError> {
    if value > 0 {
        Ok(value)
    } else {
        Err(ConfigError::InvalidValue { field, requirement: "positive", value })
    }
}

impl BrokerConfig
{
    /// Parses the `Broker` section of a YAML config.
    /// Fields that are not set keep their default values.
    ///
    /// ```yaml
    /// Broker:
    ///   tradable_unit: 5
    ///   history_depth: 10
    ///   delay: 1000
    ///   id_block: 1000
    /// ```
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError>
    {
        let documents = YamlLoader::load_from_str(yaml)?;
        let document = documents.first().ok_or(ConfigError::MissingSection(BROKER))?;
        let section = expect_yaml_hashmap(&document[BROKER], BROKER)?;

        let mut config = Self::default();
        if let Some(value) = try_read_yaml_integer(section, BROKER, TRADABLE_UNIT)? {
            config.tradable_unit = Size(positive(TRADABLE_UNIT, value)?)
        }
        if let Some(value) = try_read_yaml_integer(section, BROKER, HISTORY_DEPTH)? {
            config.history_depth = positive(HISTORY_DEPTH, value)? as usize
        }
        if let Some(value) = try_read_yaml_integer(section, BROKER, DELAY)? {
            config.delay = u64::try_from(value).map_err(
                |_| ConfigError::InvalidValue { field: DELAY, requirement: "non-negative", value }
            )?
        }
        if let Some(value) = try_read_yaml_integer(section, BROKER, ID_BLOCK)? {
            config.id_block = positive(ID_BLOCK, value)? as u64
        }
        Ok(config)
    }

    /// Reads and parses a YAML config file.
    ///
    /// # Arguments
    ///
    /// * `path` — Path to YAML-config.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError>
    {
        let path = path.as_ref();
        let yaml = read_to_string(path).map_err(
            |source| ConfigError::Io { path: path.to_path_buf(), source }
        )?;
        Self::from_yaml_str(&yaml)
    }
}
