//! Storage configuration commands
//!
//! The storage section names the endpoint, the bucket and the environment
//! variables that hold the credentials. Secrets are never written to the
//! configuration file.

use clap::Subcommand;
use serde::Serialize;

use bf_core::{ConfigManager, StorageConfig};

use crate::exit_code::ExitCode;
use crate::output::Formatter;

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Set the storage endpoint, bucket and credential variables
    Set(SetArgs),

    /// Show the storage configuration
    Show,
}

/// Arguments for the `config set` command
#[derive(clap::Args, Debug)]
pub struct SetArgs {
    /// S3 endpoint URL (e.g., "http://localhost:9000", "https://s3.amazonaws.com")
    #[arg(long)]
    pub endpoint: String,

    /// Bucket name
    #[arg(long)]
    pub bucket: String,

    /// Environment variable holding the access key id
    #[arg(long, default_value = "AWS_ACCESS_KEY_ID")]
    pub access_key_env: String,

    /// Environment variable holding the secret access key
    #[arg(long, default_value = "AWS_SECRET_ACCESS_KEY")]
    pub secret_key_env: String,

    /// AWS region
    #[arg(long, default_value = "us-east-1")]
    pub region: String,

    /// Bucket lookup style: auto, path, or dns
    #[arg(long, default_value = "auto")]
    pub bucket_lookup: String,
}

/// Storage information for output
#[derive(Serialize)]
struct StorageInfo {
    endpoint_url: String,
    bucket: String,
    region: String,
    bucket_lookup: String,
    access_key_env: String,
    access_key_set: bool,
    secret_key_env: String,
    secret_key_set: bool,
}

impl From<&StorageConfig> for StorageInfo {
    fn from(storage: &StorageConfig) -> Self {
        Self {
            endpoint_url: storage.endpoint_url.clone(),
            bucket: storage.bucket.clone(),
            region: storage.region.clone(),
            bucket_lookup: storage.bucket_lookup.clone(),
            access_key_env: storage.access_key_env.clone(),
            access_key_set: std::env::var_os(&storage.access_key_env).is_some(),
            secret_key_env: storage.secret_key_env.clone(),
            secret_key_set: std::env::var_os(&storage.secret_key_env).is_some(),
        }
    }
}

/// Execute a config subcommand
pub fn execute(cmd: ConfigCommands, manager: &ConfigManager, formatter: &Formatter) -> ExitCode {
    match cmd {
        ConfigCommands::Set(args) => execute_set(args, manager, formatter),
        ConfigCommands::Show => execute_show(manager, formatter),
    }
}

/// Check `config set` arguments before anything is saved
fn validate(args: &SetArgs) -> Result<(), String> {
    if args.bucket.is_empty() {
        return Err("Bucket name cannot be empty".to_string());
    }

    if let Err(e) = url::Url::parse(&args.endpoint) {
        return Err(format!("Invalid endpoint URL '{}': {e}", args.endpoint));
    }

    if args.access_key_env.is_empty() || args.secret_key_env.is_empty() {
        return Err("Credential variable names cannot be empty".to_string());
    }

    if !["auto", "path", "dns"].contains(&args.bucket_lookup.as_str()) {
        return Err("Bucket lookup must be 'auto', 'path', or 'dns'".to_string());
    }

    Ok(())
}

fn execute_set(args: SetArgs, manager: &ConfigManager, formatter: &Formatter) -> ExitCode {
    if let Err(msg) = validate(&args) {
        formatter.error(&msg);
        return ExitCode::UsageError;
    }

    let mut storage = StorageConfig::new(
        &args.endpoint,
        &args.bucket,
        &args.access_key_env,
        &args.secret_key_env,
    );
    storage.region = args.region;
    storage.bucket_lookup = args.bucket_lookup;

    let info = StorageInfo::from(&storage);
    match manager.set_storage(storage) {
        Ok(()) => {
            if formatter.is_json() {
                formatter.json(&info);
            } else {
                formatter.success(&format!(
                    "Storage configured: {}/{}",
                    info.endpoint_url.trim_end_matches('/'),
                    info.bucket
                ));
            }
            ExitCode::Success
        }
        Err(e) => super::report_error(formatter, "Failed to save configuration", &e),
    }
}

fn execute_show(manager: &ConfigManager, formatter: &Formatter) -> ExitCode {
    let config = match manager.load() {
        Ok(c) => c,
        Err(e) => return super::report_error(formatter, "Failed to load configuration", &e),
    };

    let storage = match config.storage() {
        Ok(s) => s,
        Err(e) => return super::report_error(formatter, "No storage", &e),
    };

    let info = StorageInfo::from(storage);
    if formatter.is_json() {
        formatter.json(&info);
    } else {
        let state = |set: bool| if set { "set" } else { "unset" };
        formatter.println(&format!("Endpoint: {}", info.endpoint_url));
        formatter.println(&format!("Bucket:   {}", info.bucket));
        formatter.println(&format!(
            "Region:   {} (lookup: {})",
            info.region, info.bucket_lookup
        ));
        formatter.println(&format!(
            "Access:   ${} ({})",
            info.access_key_env,
            state(info.access_key_set)
        ));
        formatter.println(&format!(
            "Secret:   ${} ({})",
            info.secret_key_env,
            state(info.secret_key_set)
        ));
    }
    ExitCode::Success
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn set_args() -> SetArgs {
        SetArgs {
            endpoint: "http://localhost:9000".to_string(),
            bucket: "xetra".to_string(),
            access_key_env: "AWS_ACCESS_KEY_ID".to_string(),
            secret_key_env: "AWS_SECRET_ACCESS_KEY".to_string(),
            region: "us-east-1".to_string(),
            bucket_lookup: "auto".to_string(),
        }
    }

    #[test]
    fn test_validate_accepts_defaults() {
        assert!(validate(&set_args()).is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_input() {
        let mut args = set_args();
        args.endpoint = "localhost".to_string();
        assert!(validate(&args).unwrap_err().contains("Invalid endpoint"));

        let mut args = set_args();
        args.bucket_lookup = "virtual".to_string();
        assert!(validate(&args).is_err());

        let mut args = set_args();
        args.bucket = String::new();
        assert!(validate(&args).is_err());
    }

    #[test]
    fn test_set_writes_storage_section() {
        let temp_dir = TempDir::new().unwrap();
        let manager = ConfigManager::with_path(temp_dir.path().join("config.toml"));
        let formatter = Formatter::new(crate::output::OutputConfig {
            quiet: true,
            ..Default::default()
        });

        let code = execute(ConfigCommands::Set(set_args()), &manager, &formatter);
        assert_eq!(code, ExitCode::Success);

        let config = manager.load().unwrap();
        let storage = config.storage().unwrap();
        assert_eq!(storage.bucket, "xetra");
        assert_eq!(storage.secret_key_env, "AWS_SECRET_ACCESS_KEY");
    }

    #[test]
    fn test_show_without_storage() {
        let temp_dir = TempDir::new().unwrap();
        let manager = ConfigManager::with_path(temp_dir.path().join("config.toml"));
        let formatter = Formatter::new(crate::output::OutputConfig {
            quiet: true,
            ..Default::default()
        });

        let code = execute(ConfigCommands::Show, &manager, &formatter);
        assert_eq!(code, ExitCode::UsageError);
    }

    #[test]
    fn test_storage_info_reports_unset_variables() {
        let storage = StorageConfig::new(
            "http://localhost:9000",
            "b",
            "BF_CLI_TEST_UNSET_AK_77E2",
            "BF_CLI_TEST_UNSET_SK_77E2",
        );
        let info = StorageInfo::from(&storage);
        assert!(!info.access_key_set);
        assert!(!info.secret_key_set);
    }
}
