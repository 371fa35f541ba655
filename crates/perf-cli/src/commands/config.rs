//! 설정 확인 명령어.

use anyhow::Result;
use perf_core::AppConfig;

/// 병합된 설정을 TOML 문자열로 렌더링합니다.
pub fn render_config(config: &AppConfig) -> Result<String> {
    Ok(toml::to_string_pretty(config)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_default_config() {
        let text = render_config(&AppConfig::default()).unwrap();
        assert!(text.contains("[analysis]"));
        assert!(text.contains("risk_free_rate = 0.01"));
        assert!(text.contains("benchmark = \"SPY\""));
        assert!(text.contains("histogram_bins = 50"));
    }
}
