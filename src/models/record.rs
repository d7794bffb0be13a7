use indexmap::IndexMap;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// 原始记录：抽取服务输出的松散字段表
/// 识别字段单独建模，其余字段按原顺序保存在 `extra` 中透传。
/// 缺失字段为 `None`；显式传入的 `null` 为 `Some(Value::Null)`，输出时原样保留
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    #[serde(rename = "Amount", default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub amount: Option<Value>,
    #[serde(rename = "Rest ID", default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub identifier: Option<Value>,
    #[serde(rename = "Month", default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub period: Option<Value>,
    #[serde(rename = "Date", default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub date: Option<Value>,
    #[serde(rename = "Description", default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub description: Option<Value>,
    #[serde(rename = "Type", default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub type_tag: Option<Value>,
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

/// 字段出现即为 `Some`，包括 `null`
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl RawRecord {
    /// 按输出顺序遍历所有存在的字段（识别字段在前，其余字段在后）
    pub fn entries(&self) -> impl Iterator<Item = (&str, &Value)> {
        let known = [
            ("Amount", &self.amount),
            ("Rest ID", &self.identifier),
            ("Month", &self.period),
            ("Date", &self.date),
            ("Description", &self.description),
            ("Type", &self.type_tag),
        ];
        known
            .into_iter()
            .filter_map(|(key, value)| value.as_ref().map(|v| (key, v)))
            .chain(self.extra.iter().map(|(k, v)| (k.as_str(), v)))
    }
}

/// 记录来源
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }
}

/// 规范化记录：从原始记录中解析出的只读视图
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRecord {
    pub side: Side,
    /// 在原集合中的位置（0 起）
    pub index: usize,
    /// 输出用标识，如 `left-0`
    pub id: String,
    pub amount: f64,
    pub identifier: String,
    pub period: String,
    pub date: String,
    pub description: String,
    pub type_tag: String,
    pub raw: RawRecord,
}

impl NormalizedRecord {
    /// 面向审核人员的序号（1 起）
    pub fn ordinal(&self) -> usize {
        self.index + 1
    }

    pub fn has_amount(&self) -> bool {
        self.amount > 0.0
    }
}

/// 输出时展开为 `{ "id": ..., <原始字段>... }`；原始记录自带 `id` 时以原值为准
impl Serialize for NormalizedRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        if !self.raw.extra.contains_key("id") {
            map.serialize_entry("id", &self.id)?;
        }
        for (key, value) in self.raw.entries() {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}
