use crate::error::AppError;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

/// 应用配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub matching: MatchingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

impl AppConfig {
    /// 加载配置: 可选配置文件 `reconcile.*`，再由 `APP__` 前缀环境变量覆盖
    pub fn load() -> Result<Self, AppError> {
        let settings = Config::builder()
            .add_source(File::with_name("reconcile").required(false))
            .add_source(Environment::with_prefix("APP").separator("__"))
            .build()?;

        let config: AppConfig = settings.try_deserialize()?;
        config.matching.validate()?;
        Ok(config)
    }
}

/// 匹配引擎配置（阈值、评分权重、关键词），构造后只读
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    pub thresholds: Thresholds,
    pub weights: ScoreWeights,
    pub keywords: KeywordSets,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// 最低入选分数，低于此分数视为无匹配
    pub match_min: f64,
    /// 对账成功分数线
    pub reconciled_min: f64,
    pub high_min: f64,
    pub perfect_min: f64,
    /// 金额"完全相等"的绝对容差
    pub amount_tolerance: f64,
    /// 相对金额差: 接近
    pub close_ratio: f64,
    /// 相对金额差: 相似
    pub similar_ratio: f64,
    /// 相对金额差: 宽松（仅用于描述中的编号匹配）
    pub loose_ratio: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            match_min: 30.0,
            reconciled_min: 50.0,
            high_min: 70.0,
            perfect_min: 100.0,
            amount_tolerance: 0.01,
            close_ratio: 0.05,
            similar_ratio: 0.15,
            loose_ratio: 0.50,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    pub perfect: f64,
    pub identifier_close_amount: f64,
    pub identifier_differing_amount: f64,
    pub exact_amount: f64,
    pub close_amount: f64,
    pub similar_amount: f64,
    pub embedded_id_close: f64,
    pub embedded_id_loose: f64,
    pub embedded_id_far: f64,
    pub month: f64,
    pub delivery_keyword: f64,
    pub merchant_keyword: f64,
    pub delivery_type: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            perfect: 100.0,
            identifier_close_amount: 90.0,
            identifier_differing_amount: 75.0,
            exact_amount: 70.0,
            close_amount: 30.0,
            similar_amount: 15.0,
            embedded_id_close: 50.0,
            embedded_id_loose: 35.0,
            embedded_id_far: 25.0,
            month: 20.0,
            delivery_keyword: 15.0,
            merchant_keyword: 10.0,
            delivery_type: 10.0,
        }
    }
}

impl ScoreWeights {
    fn values(&self) -> [f64; 13] {
        [
            self.perfect,
            self.identifier_close_amount,
            self.identifier_differing_amount,
            self.exact_amount,
            self.close_amount,
            self.similar_amount,
            self.embedded_id_close,
            self.embedded_id_loose,
            self.embedded_id_far,
            self.month,
            self.delivery_keyword,
            self.merchant_keyword,
            self.delivery_type,
        ]
    }
}

/// 描述/类型关键词（均按小写比较）
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KeywordSets {
    pub delivery: Vec<String>,
    pub merchant: Vec<String>,
    pub delivery_type_label: String,
}

impl Default for KeywordSets {
    fn default() -> Self {
        let to_vec = |words: &[&str]| words.iter().map(|w| w.to_string()).collect();
        Self {
            delivery: to_vec(&["uber", "doordash", "grubhub", "delivery", "eats", "restaurant"]),
            merchant: to_vec(&["starbucks", "mcdonald", "pizza", "cafe", "restaurant"]),
            delivery_type_label: "3rd party delivery".to_string(),
        }
    }
}

impl MatchingConfig {
    /// 启动时校验阈值的一致性
    pub fn validate(&self) -> Result<(), AppError> {
        let t = &self.thresholds;

        let finite = [
            t.match_min,
            t.reconciled_min,
            t.high_min,
            t.perfect_min,
            t.amount_tolerance,
            t.close_ratio,
            t.similar_ratio,
            t.loose_ratio,
        ]
        .into_iter()
        .chain(self.weights.values())
        .all(f64::is_finite);
        if !finite {
            return Err(AppError::InvalidConfig(
                "thresholds and weights must be finite numbers".to_string(),
            ));
        }
        if t.amount_tolerance <= 0.0 {
            return Err(AppError::InvalidConfig(
                "amount_tolerance must be positive".to_string(),
            ));
        }
        if !(0.0 <= t.close_ratio && t.close_ratio <= t.similar_ratio && t.similar_ratio <= t.loose_ratio) {
            return Err(AppError::InvalidConfig(format!(
                "amount ratios must satisfy 0 <= close ({}) <= similar ({}) <= loose ({})",
                t.close_ratio, t.similar_ratio, t.loose_ratio
            )));
        }
        if !(0.0 <= t.match_min
            && t.match_min <= t.reconciled_min
            && t.reconciled_min <= t.high_min
            && t.high_min <= t.perfect_min)
        {
            return Err(AppError::InvalidConfig(format!(
                "score boundaries must satisfy 0 <= match ({}) <= reconciled ({}) <= high ({}) <= perfect ({})",
                t.match_min, t.reconciled_min, t.high_min, t.perfect_min
            )));
        }

        Ok(())
    }
}
