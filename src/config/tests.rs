use crate::{
    config::{BrokerConfig, ConfigError},
    types::Size,
    utils::constants::ONE_MILLISECOND,
};

#[test]
fn test_full_section()
{
    let config = BrokerConfig::from_yaml_str(
        "Broker:\n  tradable_unit: 100\n  history_depth: 3\n  delay: 1000000\n  id_block: 50\n"
    ).unwrap();
    assert_eq!(
        config,
        BrokerConfig {
            tradable_unit: Size(100),
            history_depth: 3,
            delay: ONE_MILLISECOND,
            id_block: 50,
        }
    )
}

#[test]
fn test_defaults()
{
    let config = BrokerConfig::from_yaml_str("Broker:\n  delay: 5\n").unwrap();
    assert_eq!(config, BrokerConfig { delay: 5, ..Default::default() });
    assert_eq!(config.tradable_unit, Size(5));
}

#[test]
fn test_missing_section()
{
    assert!(matches!(
        BrokerConfig::from_yaml_str("Exchange:\n  name: NYSE\n"),
        Err(ConfigError::MissingSection("Broker"))
    ));
    assert!(matches!(
        BrokerConfig::from_yaml_str(""),
        Err(ConfigError::MissingSection("Broker"))
    ));
}

#[test]
fn test_wrong_type()
{
    let err = BrokerConfig::from_yaml_str("Broker:\n  tradable_unit: five\n").unwrap_err();
    assert!(matches!(err, ConfigError::WrongType { .. }));
    assert!(err.to_string().contains("Broker.tradable_unit"));

    assert!(matches!(
        BrokerConfig::from_yaml_str("Broker: 5\n"),
        Err(ConfigError::WrongType { .. })
    ));
}

#[test]
fn test_invalid_values()
{
    for yaml in [
        "Broker:\n  tradable_unit: 0\n",
        "Broker:\n  history_depth: -1\n",
        "Broker:\n  delay: -10\n",
        "Broker:\n  id_block: 0\n",
    ] {
        assert!(
            matches!(BrokerConfig::from_yaml_str(yaml), Err(ConfigError::InvalidValue { .. })),
            "{yaml}"
        )
    }
}

#[test]
fn test_bad_yaml()
{
    assert!(matches!(
        BrokerConfig::from_yaml_str("Broker: [unclosed\n"),
        Err(ConfigError::Scan(_))
    ));
}

#[test]
fn test_missing_file()
{
    assert!(matches!(
        BrokerConfig::from_yaml_file("/nonexistent/broker.yml"),
        Err(ConfigError::Io { .. })
    ));
}
