use schemars::schema_for;

use crate::{
    cli::{CommandResult, ConfigCommand},
    config::Config,
};

pub(crate) fn execute(config: &Config, command: ConfigCommand) -> CommandResult {
    match command {
        ConfigCommand::Show => Ok(config.to_toml()?),
        ConfigCommand::Schema => Ok(serde_json::to_string_pretty(&schema_for!(Config))?),
    }
}
