//! 过滤器模型
//!
//! 静态过滤器表（`FilterDef`）描述表单结构，
//! 解析后的 `FilterSpec` 携带本次运行要填写的具体值。

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value as JsonValue;

use crate::error::{AppError, AppResult};
use crate::infrastructure::{LabelMatch, Locator};

/// 输入参数（扁平字符串映射，缺失等同于空字符串）
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "HashMap<String, JsonValue>")]
pub struct ParamMap(HashMap<String, String>);

impl ParamMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// 取参数值，缺失时返回空字符串
    pub fn get(&self, key: &str) -> &str {
        self.0.get(key).map(String::as_str).unwrap_or("")
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// 从 JSON 对象文本解析
    pub fn from_json(text: &str) -> AppResult<Self> {
        serde_json::from_str(text).map_err(|e| AppError::Params(format!("JSON 参数无效: {}", e)))
    }

    /// 从 TOML 文本解析
    pub fn from_toml(text: &str) -> AppResult<Self> {
        let table: toml::Table =
            toml::from_str(text).map_err(|e| AppError::Params(format!("TOML 参数无效: {}", e)))?;
        let mut params = Self::new();
        for (key, value) in table {
            let value = match value {
                toml::Value::String(s) => s,
                other => other.to_string(),
            };
            params.insert(key, value);
        }
        Ok(params)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ParamMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl TryFrom<HashMap<String, JsonValue>> for ParamMap {
    type Error = String;

    fn try_from(raw: HashMap<String, JsonValue>) -> Result<Self, Self::Error> {
        raw.into_iter()
            .map(|(key, value)| {
                let value = match value {
                    JsonValue::Null => String::new(),
                    JsonValue::String(s) => s,
                    JsonValue::Number(n) => n.to_string(),
                    JsonValue::Bool(b) => b.to_string(),
                    other => return Err(format!("参数 {} 不是标量: {}", key, other)),
                };
                Ok((key, value))
            })
            .collect()
    }
}

/// 表单字段类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// 文本框，直接填写
    Text,
    /// 下拉框，按可见文字选择
    Select(LabelMatch),
}

/// 字段值来源
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueSource {
    /// 整个参数值
    Param(&'static str),
    /// 参数按分隔符切分后的第 `index` 段（不存在时为空）
    Split {
        param: &'static str,
        separator: char,
        index: usize,
    },
}

impl ValueSource {
    pub fn resolve(self, params: &ParamMap) -> String {
        match self {
            ValueSource::Param(key) => params.get(key).trim().to_string(),
            ValueSource::Split {
                param,
                separator,
                index,
            } => params
                .get(param)
                .split(separator)
                .nth(index)
                .unwrap_or("")
                .trim()
                .to_string(),
        }
    }
}

/// 静态表中的字段定义
#[derive(Debug, Clone)]
pub struct FieldDef {
    pub target: Locator,
    pub kind: FieldKind,
    pub source: ValueSource,
}

/// 静态表中的过滤器定义（一个复选框 + 若干依赖字段）
#[derive(Debug, Clone)]
pub struct FilterDef {
    /// 逻辑名（同时也是主要参数名）
    pub name: &'static str,
    /// 启用该过滤器的复选框；部分表单的字段无需复选框
    pub checkbox: Option<Locator>,
    pub fields: &'static [FieldDef],
}

/// 本次运行要填写的字段
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub target: Locator,
    pub kind: FieldKind,
    pub value: String,
}

/// 本次运行要应用的过滤器
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSpec {
    pub name: String,
    pub checkbox: Option<Locator>,
    pub fields: Vec<FieldSpec>,
}

impl FilterSpec {
    /// 至少一个字段有值时才需要应用
    pub fn has_values(&self) -> bool {
        self.fields.iter().any(|f| !f.value.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_key_reads_as_empty() {
        let params = ParamMap::new();
        assert_eq!(params.get("departamento"), "");
    }

    #[test]
    fn json_scalars_are_stringified() {
        let params = ParamMap::from_json(r#"{"codigoTurma": 1, "horario": null, "nomeDocente": "ANA"}"#)
            .unwrap();
        assert_eq!(params.get("codigoTurma"), "1");
        assert_eq!(params.get("horario"), "");
        assert_eq!(params.get("nomeDocente"), "ANA");
    }

    #[test]
    fn json_arrays_are_rejected() {
        assert!(ParamMap::from_json(r#"{"departamento": ["a"]}"#).is_err());
    }

    #[test]
    fn toml_params_are_flattened() {
        let params = ParamMap::from_toml("anoPeriodoIngresso = \"2023.1\"\ncodigoTurma = 2\n").unwrap();
        assert_eq!(params.get("anoPeriodoIngresso"), "2023.1");
        assert_eq!(params.get("codigoTurma"), "2");
    }

    #[test]
    fn split_source_picks_segment() {
        let params: ParamMap = [("anoPeriodoIngresso", "2023.2")].into_iter().collect();
        let year = ValueSource::Split {
            param: "anoPeriodoIngresso",
            separator: '.',
            index: 0,
        };
        let period = ValueSource::Split {
            param: "anoPeriodoIngresso",
            separator: '.',
            index: 1,
        };
        assert_eq!(year.resolve(&params), "2023");
        assert_eq!(period.resolve(&params), "2");
    }

    #[test]
    fn split_source_without_separator_fills_first_segment_only() {
        let params: ParamMap = [("anoPeriodoIngresso", "2023")].into_iter().collect();
        let period = ValueSource::Split {
            param: "anoPeriodoIngresso",
            separator: '.',
            index: 1,
        };
        assert_eq!(period.resolve(&params), "");
    }
}
