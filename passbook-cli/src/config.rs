use anyhow::{Context, Result};
use passbook_core::EngineConfig;
use std::fs;
use std::path::{Path, PathBuf};

use crate::state::{ensure_passbook_home, passbook_home};

pub fn config_path() -> Result<PathBuf> {
    Ok(passbook_home()?.join("config.toml"))
}

/// Load `config.toml` from the passbook home, or the defaults if there is none.
pub fn load_config() -> Result<EngineConfig> {
    load_config_from(&config_path()?)
}

pub fn load_config_from(p: &Path) -> Result<EngineConfig> {
    if !p.exists() {
        return Ok(EngineConfig::default());
    }
    let s = fs::read_to_string(p).with_context(|| format!("read {}", p.display()))?;
    let cfg: EngineConfig =
        toml::from_str(&s).with_context(|| format!("parse {}", p.display()))?;
    cfg.validate()
        .with_context(|| format!("invalid rules in {}", p.display()))?;
    Ok(cfg)
}

pub fn save_config_to(p: &Path, cfg: &EngineConfig) -> Result<()> {
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn init_config() -> Result<()> {
    let p = ensure_passbook_home()?.join("config.toml");
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config_to(&p, &EngineConfig::default())?;
    println!("Wrote {}", p.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(cfg, EngineConfig::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("config.toml");
        let cfg = EngineConfig::default().with_epoch_year(2021);
        save_config_to(&p, &cfg).unwrap();
        assert_eq!(load_config_from(&p).unwrap(), cfg);
    }

    #[test]
    fn test_bad_pattern_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("config.toml");
        fs::write(&p, "[rules]\nheader_pattern = \"(\"\n").unwrap();
        let err = load_config_from(&p).unwrap_err();
        assert!(err.to_string().starts_with("invalid rules in"));
    }
}
