use log::{debug, error, info, warn};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::path::Path;

/// 설정 로드 오류
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// 파일 오류
    FileError(String),
    /// 파싱 오류
    ParseError(String),
    /// 유효성 검사 오류
    ValidationError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::FileError(msg) => write!(f, "설정 파일 오류: {}", msg),
            ConfigError::ParseError(msg) => write!(f, "설정 파싱 오류: {}", msg),
            ConfigError::ValidationError(msg) => write!(f, "설정 유효성 검사 오류: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// 설정 로드 결과
pub type ConfigResult<T> = Result<T, ConfigError>;

/// 설정 형식
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Toml,
    /// 파일 확장자로 판단 (문자열 로드 시에는 JSON 후 TOML 순서로 시도)
    Auto,
}

/// 로드된 설정의 유효성 검사
pub trait ConfigValidation {
    fn validate(&self) -> ConfigResult<()>;
}

/// 설정 파일 로더
#[derive(Debug)]
pub struct ConfigLoader;

impl ConfigLoader {
    /// 파일에서 설정 로드
    ///
    /// # Arguments
    /// * `path` - 설정 파일 경로
    /// * `format` - 설정 파일 형식 (`Auto`면 확장자로 감지)
    ///
    /// # Returns
    /// * `ConfigResult<T>` - 검증된 설정 객체 또는 오류
    pub fn load_from_file<T>(path: &Path, format: ConfigFormat) -> ConfigResult<T>
    where
        T: DeserializeOwned + ConfigValidation,
    {
        debug!("설정 파일 로드 시작: {}", path.display());

        let format = match format {
            ConfigFormat::Auto => Self::detect_format(path)?,
            other => other,
        };

        let content = std::fs::read_to_string(path).map_err(|e| {
            error!("설정 파일 읽기 실패: {} - {}", path.display(), e);
            ConfigError::FileError(format!("파일 읽기 실패: {}", e))
        })?;

        let config: T = match format {
            ConfigFormat::Json => Self::parse_json(&content)?,
            _ => Self::parse_toml(&content)?,
        };

        config.validate().inspect_err(|e| {
            error!("설정 유효성 검사 실패: {}", e);
        })?;

        info!("설정 파일 로드 완료: {}", path.display());
        Ok(config)
    }

    /// 문자열에서 설정 로드
    pub fn load_from_string<T>(content: &str, format: ConfigFormat) -> ConfigResult<T>
    where
        T: DeserializeOwned + ConfigValidation,
    {
        let config: T = match format {
            ConfigFormat::Json => Self::parse_json(content)?,
            ConfigFormat::Toml => Self::parse_toml(content)?,
            ConfigFormat::Auto => match Self::parse_json::<T>(content) {
                Ok(config) => config,
                Err(_) => Self::parse_toml(content)?,
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// 키-값 맵에서 설정 로드
    ///
    /// 맵을 JSON으로 바꾼 뒤 다시 역직렬화합니다.
    pub fn load_from_map<T, V>(map: &HashMap<String, V>) -> ConfigResult<T>
    where
        T: DeserializeOwned + ConfigValidation,
        V: Serialize,
    {
        let json = serde_json::to_string(map)
            .map_err(|e| ConfigError::ParseError(format!("맵을 JSON으로 변환 실패: {}", e)))?;

        let config: T = Self::parse_json(&json)?;
        config.validate()?;
        Ok(config)
    }

    /// 설정 파일 저장
    ///
    /// `Auto`면 확장자로 형식을 고르며, 확장자가 없으면 TOML로 저장합니다.
    pub fn save_to_file<T>(config: &T, path: &Path, format: ConfigFormat) -> ConfigResult<()>
    where
        T: Serialize + ConfigValidation,
    {
        debug!("설정 파일 저장 시작: {}", path.display());
        config.validate()?;

        let format = match format {
            ConfigFormat::Auto => Self::detect_format(path).unwrap_or(ConfigFormat::Toml),
            other => other,
        };

        let content = match format {
            ConfigFormat::Json => serde_json::to_string_pretty(config)
                .map_err(|e| ConfigError::ParseError(format!("JSON 직렬화 실패: {}", e)))?,
            _ => toml::to_string_pretty(config)
                .map_err(|e| ConfigError::ParseError(format!("TOML 직렬화 실패: {}", e)))?,
        };

        std::fs::write(path, &content).map_err(|e| {
            error!("설정 파일 쓰기 실패: {} - {}", path.display(), e);
            ConfigError::FileError(format!("파일 쓰기 실패: {}", e))
        })?;

        info!("설정 파일 저장 완료: {}", path.display());
        Ok(())
    }

    fn parse_json<T: DeserializeOwned>(content: &str) -> ConfigResult<T> {
        serde_json::from_str(content).map_err(|e| {
            warn!("JSON 파싱 실패: {}", e);
            ConfigError::ParseError(format!("JSON 파싱 실패: {}", e))
        })
    }

    fn parse_toml<T: DeserializeOwned>(content: &str) -> ConfigResult<T> {
        toml::from_str(content).map_err(|e| {
            warn!("TOML 파싱 실패: {}", e);
            ConfigError::ParseError(format!("TOML 파싱 실패: {}", e))
        })
    }

    fn detect_format(path: &Path) -> ConfigResult<ConfigFormat> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(ConfigFormat::Json),
            Some("toml") => Ok(ConfigFormat::Toml),
            _ => {
                warn!("지원되지 않는 설정 파일 형식: {}", path.display());
                Err(ConfigError::FileError(format!(
                    "파일 형식을 감지할 수 없음: {}",
                    path.display()
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalyzerConfig;
    use tempfile::tempdir;

    #[test]
    fn test_load_from_json_string() {
        let json = r#"{"signal":{"buy_threshold":6,"sell_threshold":9}}"#;
        let config =
            ConfigLoader::load_from_string::<AnalyzerConfig>(json, ConfigFormat::Json).unwrap();
        assert_eq!(config.signal.buy_threshold, 6);
        assert_eq!(config.signal.sell_threshold, 9);
    }

    #[test]
    fn test_auto_falls_back_to_toml() {
        let toml_str = r#"
            [indicators.macd]
            fast_period = 8
            slow_period = 21
        "#;
        let config =
            ConfigLoader::load_from_string::<AnalyzerConfig>(toml_str, ConfigFormat::Auto)
                .unwrap();
        assert_eq!(config.indicators.macd.fast_period, 8);
        assert_eq!(config.indicators.macd.slow_period, 21);
        assert_eq!(config.indicators.macd.signal_period, 9);
    }

    #[test]
    fn test_parse_error() {
        let result =
            ConfigLoader::load_from_string::<AnalyzerConfig>("{not json", ConfigFormat::Json);
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_load_from_map() {
        let mut map = HashMap::new();
        map.insert(
            "signal".to_string(),
            serde_json::json!({ "buy_threshold": 4 }),
        );
        let config = ConfigLoader::load_from_map::<AnalyzerConfig, _>(&map).unwrap();
        assert_eq!(config.signal.buy_threshold, 4);
    }

    #[test]
    fn test_save_and_load_file() {
        let dir = tempdir().unwrap();
        let mut config = AnalyzerConfig::default();
        config.indicators.rsi.oversold = 30.0;

        let json_path = dir.path().join("analyzer.json");
        ConfigLoader::save_to_file(&config, &json_path, ConfigFormat::Auto).unwrap();
        let loaded: AnalyzerConfig =
            ConfigLoader::load_from_file(&json_path, ConfigFormat::Auto).unwrap();
        assert_eq!(loaded, config);

        let toml_path = dir.path().join("analyzer.toml");
        ConfigLoader::save_to_file(&config, &toml_path, ConfigFormat::Auto).unwrap();
        let loaded: AnalyzerConfig =
            ConfigLoader::load_from_file(&toml_path, ConfigFormat::Auto).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_unknown_extension() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("analyzer.yaml");
        std::fs::write(&path, "").unwrap();
        let result = ConfigLoader::load_from_file::<AnalyzerConfig>(&path, ConfigFormat::Auto);
        assert!(matches!(result, Err(ConfigError::FileError(_))));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing.toml");
        let result = ConfigLoader::load_from_file::<AnalyzerConfig>(&path, ConfigFormat::Auto);
        assert!(matches!(result, Err(ConfigError::FileError(_))));
    }
}
