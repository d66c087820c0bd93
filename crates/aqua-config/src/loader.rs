use anyhow::{anyhow, Result};
use config::{Config, Environment, File, FileFormat};
use std::path::{Path, PathBuf};

use crate::EngineConfig;

/// 配置文件名
pub const CONFIG_FILE_NAME: &str = "engine.toml";

/// 环境变量前缀，如 `AQUA__REFRESH__INTERVAL_MS=5000`
pub const ENV_PREFIX: &str = "AQUA";

/// 配置加载器
pub struct ConfigLoader {
    config_dir: PathBuf,
}

impl ConfigLoader {
    /// 创建配置加载器
    pub fn new<P: AsRef<Path>>(config_dir: P) -> Self {
        Self {
            config_dir: config_dir.as_ref().to_path_buf(),
        }
    }

    pub fn config_path(&self) -> PathBuf {
        self.config_dir.join(CONFIG_FILE_NAME)
    }

    /// 加载引擎配置
    ///
    /// 配置文件不存在时使用默认配置；环境变量覆盖文件中的值
    pub fn load(&self) -> Result<EngineConfig> {
        let config_path = self.config_path();

        let mut builder = Config::builder();
        if config_path.exists() {
            builder = builder.add_source(File::new(
                config_path.to_str().ok_or_else(|| anyhow!("Invalid config path"))?,
                FileFormat::Toml,
            ));
        }

        let config = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// 加载并验证
    pub fn load_validated(&self) -> Result<EngineConfig> {
        let config = self.load()?;
        config.validate()?;
        Ok(config)
    }

    /// 写出默认配置
    pub fn write_default(&self) -> Result<PathBuf> {
        let path = self.config_path();
        if path.exists() {
            return Err(anyhow!("Config file already exists: {}", path.display()));
        }

        std::fs::create_dir_all(&self.config_dir)?;
        std::fs::write(&path, EngineConfig::default().to_toml()?)?;
        Ok(path)
    }
}
