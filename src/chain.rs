//! 打乱链构建
//!
//! "打乱"是把文本推过一条随机的长跳转链，利用机器翻译的损耗做
//! 改写效果。链形如 `auto → 随机中间语言 × N → 默认目标语言`。

use rand::seq::SliceRandom;

use crate::config::ScrambleConfig;
use crate::engine::HopChain;
use crate::error::RelayResult;

/// 按配置生成一条随机打乱链
///
/// 从语言池里洗牌抽取 `chain_length` 个中间语言，头接 `auto`、尾接
/// 默认目标语言。与目标语言相同的中间语言会被剔除，避免出现相邻
/// 重复跳。
pub fn scramble_chain(config: &ScrambleConfig) -> RelayResult<HopChain> {
    let mut pool: Vec<String> = config
        .languages
        .iter()
        .filter(|lang| **lang != config.default_target)
        .cloned()
        .collect();
    pool.shuffle(&mut rand::thread_rng());
    pool.truncate(config.chain_length);

    let mut languages = Vec::with_capacity(pool.len() + 2);
    languages.push("auto".to_string());
    languages.extend(pool);
    languages.push(config.default_target.clone());

    HopChain::new(languages)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> ScrambleConfig {
        ScrambleConfig {
            languages: vec![
                "de".to_string(),
                "fr".to_string(),
                "ja".to_string(),
                "ru".to_string(),
                "fi".to_string(),
            ],
            chain_length: 3,
            default_target: "en".to_string(),
        }
    }

    #[test]
    fn chain_has_expected_shape() {
        let chain = scramble_chain(&test_config()).expect("should build");
        let languages = chain.languages();
        assert_eq!(languages.len(), 5);
        assert_eq!(languages[0], "auto");
        assert_eq!(languages[4], "en");
        for middle in &languages[1..4] {
            assert!(test_config().languages.contains(middle));
        }
    }

    #[test]
    fn target_language_never_appears_mid_chain() {
        let mut config = test_config();
        config.languages.push("en".to_string());
        for _ in 0..50 {
            let chain = scramble_chain(&config).expect("should build");
            let languages = chain.languages();
            for middle in &languages[1..languages.len() - 1] {
                assert_ne!(middle, "en");
            }
        }
    }

    #[test]
    fn no_adjacent_duplicates() {
        for _ in 0..50 {
            let chain = scramble_chain(&test_config()).expect("should build");
            let languages = chain.languages();
            for pair in languages.windows(2) {
                assert_ne!(pair[0], pair[1]);
            }
        }
    }
}
