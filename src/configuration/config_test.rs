use std::env;

use anyhow::Result;
use tokio::fs;
use uuid::Uuid;

use super::Config;
use super::ConfigKey;
use crate::application::cli;

#[test]
fn it_serializes_to_valid_toml() {
    let res = Config::serialize_default(cli::build());
    let toml_res = res.parse::<toml_edit::Document>();
    assert!(toml_res.is_ok());
}

#[tokio::test]
async fn it_loads_config_from_file() -> Result<()> {
    let config_path = env::temp_dir().join(format!("maildeck-config-{}.toml", Uuid::new_v4()));
    fs::write(&config_path, "api-url = \"http://templates.internal:9200\"\n").await?;

    let matches = cli::build().try_get_matches_from(vec![
        "maildeck",
        "console",
        "-c",
        config_path.to_str().unwrap(),
    ])?;
    Config::load(cli::build(), vec![&matches]).await?;

    assert_eq!(
        Config::get(ConfigKey::ApiUrl),
        "http://templates.internal:9200"
    );

    fs::remove_file(config_path).await?;
    return Ok(());
}
