//! 配置管理
//!
//! 从TOML文件和 `HOSPITAL_` 前缀的环境变量加载配置，并在使用前验证。
//! 环境变量示例：`HOSPITAL_TRIAGE__POLICY=simulated`。

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use hospital_core::TriagePriority;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

/// 配置管理器
#[derive(Debug)]
pub struct ConfigManager {
    /// 配置数据
    config: HospitalConfig,
    /// 配置文件路径，未指定时只使用默认值和环境变量
    config_path: Option<String>,
    /// 配置验证器
    validator: ConfigValidator,
}

/// 系统完整配置
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HospitalConfig {
    /// 分诊配置
    pub triage: TriageConfig,
    /// 数据文件配置
    pub data: DataConfig,
    /// 日志配置
    pub logging: LoggingConfig,
    /// 监控配置
    pub metrics: MetricsConfig,
}

/// 分诊策略类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyKind {
    /// 使用登记时记录的级别
    Recorded,
    /// 固定种子的随机模拟
    Simulated,
}

/// 分诊配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TriageConfig {
    /// 分配策略
    pub policy: PolicyKind,
    /// 未记录级别时的默认级别
    pub default_priority: TriagePriority,
    /// 相邻患者到达间隔（分钟）
    pub arrival_interval_minutes: u32,
    /// 模拟策略的随机种子
    pub seed: u64,
}

/// 数据文件配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// 患者记录JSON文件
    pub patients_path: String,
    /// 床位记录JSON文件
    pub beds_path: String,
    /// 人员名册JSON文件，不设置时不加载
    #[serde(skip_serializing_if = "Option::is_none")]
    pub staff_path: Option<String>,
    /// 预约记录JSON文件，不设置时不加载
    #[serde(skip_serializing_if = "Option::is_none")]
    pub appointments_path: Option<String>,
}

/// 日志配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 日志过滤指令，如 `info` 或 `hospital_triage=debug`
    pub level: String,
    /// 输出格式：full 或 compact
    pub format: String,
}

/// 监控配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// 运行结束时输出Prometheus指标
    pub enabled: bool,
}

/// 配置验证器
#[derive(Debug)]
pub struct ConfigValidator {
    /// 验证规则
    validation_rules: Vec<ValidationRule>,
}

/// 验证规则
#[derive(Debug)]
struct ValidationRule {
    /// 字段路径
    field_path: &'static str,
    /// 验证函数
    validator: fn(&HospitalConfig) -> Result<()>,
}

impl ConfigManager {
    /// 加载并验证配置
    pub fn new(config_path: Option<&str>) -> Result<Self> {
        let config = Self::load_config(config_path)?;
        let validator = ConfigValidator::new();
        validator.validate(&config)?;

        Ok(Self {
            config,
            config_path: config_path.map(str::to_string),
            validator,
        })
    }

    /// 从文件和环境变量加载配置
    fn load_config(config_path: Option<&str>) -> Result<HospitalConfig> {
        let mut builder = Config::builder();
        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path));
        }

        let settings = builder
            .add_source(
                Environment::with_prefix("HOSPITAL")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to build configuration")?;

        let config: HospitalConfig = settings
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        match config_path {
            Some(path) => info!("Configuration loaded from: {}", path),
            None => info!("No configuration file given, using defaults"),
        }
        Ok(config)
    }

    /// 获取配置
    pub fn config(&self) -> &HospitalConfig {
        &self.config
    }

    /// 重新加载配置，验证失败时保留原配置
    pub fn reload(&mut self) -> Result<()> {
        let new_config = Self::load_config(self.config_path.as_deref())?;
        self.validator.validate(&new_config)?;
        self.config = new_config;
        info!("Configuration reloaded");
        Ok(())
    }

    /// 将当前配置写入文件
    pub fn save_to(&self, path: &str) -> Result<()> {
        let content = toml::to_string_pretty(&self.config)
            .context("Failed to serialize configuration")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write configuration file {}", path))?;

        info!("Configuration saved to: {}", path);
        Ok(())
    }
}

impl ConfigValidator {
    /// 创建新的配置验证器
    pub fn new() -> Self {
        let validation_rules = vec![
            ValidationRule {
                field_path: "triage.arrival_interval_minutes",
                validator: |config| {
                    if config.triage.arrival_interval_minutes > 24 * 60 {
                        Err(anyhow::anyhow!("Arrival interval cannot exceed one day"))
                    } else {
                        Ok(())
                    }
                },
            },
            ValidationRule {
                field_path: "data.patients_path",
                validator: |config| {
                    if config.data.patients_path.trim().is_empty() {
                        Err(anyhow::anyhow!("Patients file path cannot be empty"))
                    } else {
                        Ok(())
                    }
                },
            },
            ValidationRule {
                field_path: "data.beds_path",
                validator: |config| {
                    if config.data.beds_path.trim().is_empty() {
                        Err(anyhow::anyhow!("Beds file path cannot be empty"))
                    } else {
                        Ok(())
                    }
                },
            },
            ValidationRule {
                field_path: "data.staff_path",
                validator: |config| {
                    let paths = [&config.data.staff_path, &config.data.appointments_path];
                    if paths.iter().any(|p| p.as_deref().is_some_and(|p| p.trim().is_empty())) {
                        Err(anyhow::anyhow!("Optional record paths must be omitted rather than empty"))
                    } else {
                        Ok(())
                    }
                },
            },
            ValidationRule {
                field_path: "logging.format",
                validator: |config| match config.logging.format.as_str() {
                    "full" | "compact" => Ok(()),
                    other => Err(anyhow::anyhow!("Unknown log format '{}'", other)),
                },
            },
        ];

        Self { validation_rules }
    }

    /// 验证配置
    pub fn validate(&self, config: &HospitalConfig) -> Result<()> {
        for rule in &self.validation_rules {
            if let Err(e) = (rule.validator)(config) {
                error!("Configuration validation failed for {}: {}", rule.field_path, e);
                return Err(anyhow::anyhow!("Invalid {}: {}", rule.field_path, e));
            }
        }

        Ok(())
    }
}

impl Default for ConfigValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for TriageConfig {
    fn default() -> Self {
        Self {
            policy: PolicyKind::Recorded,
            default_priority: TriagePriority::Low,
            arrival_interval_minutes: 30,
            seed: 42,
        }
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            patients_path: "./data/patients.json".to_string(),
            beds_path: "./data/beds.json".to_string(),
            staff_path: Some("./data/staff.json".to_string()),
            appointments_path: Some("./data/appointments.json".to_string()),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "full".to_string(),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self { enabled: false }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Mutex, MutexGuard};
    use tempfile::TempDir;

    /// 加载配置会读取进程环境变量，读写环境的测试需要串行
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn env_guard() -> MutexGuard<'static, ()> {
        ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = HospitalConfig::default();
        assert!(ConfigValidator::new().validate(&config).is_ok());
        assert_eq!(config.triage.policy, PolicyKind::Recorded);
        assert_eq!(config.triage.default_priority, TriagePriority::Low);
    }

    #[test]
    fn test_partial_file_falls_back_to_defaults() {
        let _env = env_guard();
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("hospital.toml");
        std::fs::write(
            &path,
            r#"
[triage]
policy = "simulated"
default_priority = "Medium"
seed = 7

[logging]
level = "debug"
"#,
        )
        .unwrap();

        let manager = ConfigManager::new(path.to_str()).unwrap();
        let config = manager.config();
        assert_eq!(config.triage.policy, PolicyKind::Simulated);
        assert_eq!(config.triage.default_priority, TriagePriority::Medium);
        assert_eq!(config.triage.seed, 7);
        assert_eq!(config.triage.arrival_interval_minutes, 30);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, "full");
        assert_eq!(config.data, DataConfig::default());
    }

    #[test]
    fn test_invalid_file_is_rejected() {
        let _env = env_guard();
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("hospital.toml");
        std::fs::write(&path, "[logging]\nformat = \"xml\"\n").unwrap();

        assert!(ConfigManager::new(path.to_str()).is_err());
    }

    #[test]
    fn test_save_and_reload() {
        let _env = env_guard();
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("source.toml");
        std::fs::write(&source, "[metrics]\nenabled = true\n").unwrap();

        let manager = ConfigManager::new(source.to_str()).unwrap();
        let saved = dir.path().join("saved.toml");
        manager.save_to(saved.to_str().unwrap()).unwrap();

        let mut reloaded = ConfigManager::new(saved.to_str()).unwrap();
        assert_eq!(reloaded.config(), manager.config());
        assert!(reloaded.config().metrics.enabled);
        reloaded.reload().unwrap();
        assert!(reloaded.config().metrics.enabled);
    }

    #[test]
    fn test_environment_overrides_file() {
        let _env = env_guard();
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("hospital.toml");
        std::fs::write(&path, "[triage]\npolicy = \"recorded\"\narrival_interval_minutes = 10\n").unwrap();

        std::env::set_var("HOSPITAL_TRIAGE__POLICY", "simulated");
        std::env::set_var("HOSPITAL_TRIAGE__ARRIVAL_INTERVAL_MINUTES", "45");
        let result = ConfigManager::new(path.to_str());
        std::env::remove_var("HOSPITAL_TRIAGE__POLICY");
        std::env::remove_var("HOSPITAL_TRIAGE__ARRIVAL_INTERVAL_MINUTES");

        let manager = result.unwrap();
        assert_eq!(manager.config().triage.policy, PolicyKind::Simulated);
        assert_eq!(manager.config().triage.arrival_interval_minutes, 45);
        assert_eq!(manager.config().triage.seed, 42);
    }

    #[test]
    fn test_empty_optional_path_is_rejected() {
        let mut config = HospitalConfig::default();
        config.data.staff_path = Some(" ".to_string());
        assert!(ConfigValidator::new().validate(&config).is_err());

        config.data.staff_path = None;
        assert!(ConfigValidator::new().validate(&config).is_ok());
    }
}
