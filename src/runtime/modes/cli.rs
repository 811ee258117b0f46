//! CLI mode
//!
//! One-shot administrative commands that run without the HTTP server.

use std::path::Path;

use colored::Colorize;
use tracing::info;

use crate::config::AppConfig;
use crate::errors::{AffilinkError, Result};
use crate::storage::{Profile, StorageFactory};

/// 默认的示例配置输出路径
pub const SAMPLE_CONFIG_PATH: &str = "config.example.toml";

/// 授予 / 撤销管理员
pub async fn run_promote(
    config: &AppConfig,
    user_id: &str,
    email: Option<&str>,
    revoke: bool,
) -> Result<Profile> {
    if user_id.trim().is_empty() {
        return Err(AffilinkError::validation("User id must not be empty"));
    }

    // 已安装时忽略（同一进程内重复调用）
    let _ = crate::runtime::lifetime::startup::install_crypto_provider();

    let storage = StorageFactory::create(&config.database).await?;
    let profile = storage.set_admin(user_id, email, !revoke).await?;

    let action = if revoke { "revoked from" } else { "granted to" };
    info!("Admin {} {}", action, profile.id);
    println!(
        "{} Admin {} {} ({})",
        "✓".green().bold(),
        action,
        profile.id.cyan(),
        profile.email
    );
    Ok(profile)
}

/// 写出示例配置文件
pub fn run_config_generate(path: Option<&str>, force: bool) -> Result<()> {
    let path = path.unwrap_or(SAMPLE_CONFIG_PATH);

    if Path::new(path).exists() && !force {
        return Err(AffilinkError::conflict(format!(
            "{} already exists, pass --force to overwrite",
            path
        )));
    }

    AppConfig::default()
        .save_to_file(path)
        .map_err(|e| AffilinkError::file_operation(format!("Failed to write {}: {}", path, e)))?;

    println!("{} Sample configuration written to {}", "✓".green().bold(), path.cyan());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_generate_refuses_to_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "# existing").unwrap();
        let path = path.to_string_lossy().to_string();

        let err = run_config_generate(Some(&path), false).unwrap_err();
        assert!(matches!(err, AffilinkError::Conflict(_)));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# existing");

        run_config_generate(Some(&path), true).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("[affiliate]"));
    }

    #[tokio::test]
    async fn test_promote_creates_profile_with_email() {
        let dir = TempDir::new().unwrap();
        let mut config = AppConfig::default();
        config.database.database_url =
            format!("sqlite://{}?mode=rwc", dir.path().join("cli.db").display());

        let profile = run_promote(&config, "user-9", Some("ops@example.com"), false)
            .await
            .unwrap();
        assert!(profile.is_admin);
        assert_eq!(profile.email, "ops@example.com");

        let revoked = run_promote(&config, "user-9", None, true).await.unwrap();
        assert!(!revoked.is_admin);
    }

    #[tokio::test]
    async fn test_promote_unknown_profile_without_email() {
        let dir = TempDir::new().unwrap();
        let mut config = AppConfig::default();
        config.database.database_url =
            format!("sqlite://{}?mode=rwc", dir.path().join("cli.db").display());

        let err = run_promote(&config, "ghost", None, false).await.unwrap_err();
        assert!(matches!(err, AffilinkError::NotFound(_)));
    }
}
