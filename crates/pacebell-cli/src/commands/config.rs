use clap::Subcommand;
use pacebell_core::storage::Config;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print a single configuration value
    Get { key: String },
    /// Set a configuration value
    Set { key: String, value: String },
    /// Print all configuration keys and values
    List,
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Get { key } => {
            let config = Config::load()?;
            println!("{}", config.get_key(&key)?);
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            config.set_key(&key, &value)?;
            config.save()?;
            println!("{key} = {value}");
        }
        ConfigAction::List => {
            let config = Config::load()?;
            for (key, value) in config.entries() {
                println!("{key} = {value}");
            }
        }
    }
    Ok(())
}
