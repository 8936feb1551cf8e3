// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license
//! 标签编码与本地化
//!
//! - LabelEncoder:    类别下标 → 标准标签 (训练时确定的有序列表, JSON文件)
//! - LocalizedLabels: 标准标签 → 本地化标签 (配置中的静态表, 缺失时回退为标准标签)

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use crate::error::{PipelineError, Result};

/// 标签文件格式: `["a", "b"]` 或 `{"classes": ["a", "b"]}`
#[derive(Deserialize)]
#[serde(untagged)]
enum LabelFile {
    List(Vec<String>),
    Encoder { classes: Vec<String> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelEncoder {
    classes: Vec<String>,
}

impl LabelEncoder {
    pub fn from_classes<I, S>(classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            classes: classes.into_iter().map(Into::into).collect(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let file: LabelFile = serde_json::from_str(json)
            .map_err(|e| PipelineError::Config(format!("label file: {}", e)))?;
        let classes = match file {
            LabelFile::List(classes) | LabelFile::Encoder { classes } => classes,
        };
        if classes.is_empty() {
            return Err(PipelineError::Config("label file has no classes".into()));
        }
        Ok(Self { classes })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        let encoder = Self::from_json(&json)?;
        info!("🏷️ 标签已从 {} 加载 ({}类)", path.display(), encoder.len());
        Ok(encoder)
    }

    /// 下标 → 标准标签
    pub fn inverse_transform(&self, class_id: usize) -> Option<&str> {
        self.classes.get(class_id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocalizedLabels {
    table: BTreeMap<String, String>,
}

impl LocalizedLabels {
    pub fn new(table: BTreeMap<String, String>) -> Self {
        Self { table }
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            table: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// 查表, 缺失时原样返回标准标签
    pub fn lookup<'a>(&'a self, canonical: &'a str) -> &'a str {
        self.table
            .get(canonical)
            .map(String::as_str)
            .unwrap_or(canonical)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

/// 进程级只读标签表
#[derive(Debug, Clone)]
pub struct LabelTable {
    encoder: LabelEncoder,
    localized: LocalizedLabels,
}

impl LabelTable {
    pub fn new(encoder: LabelEncoder, localized: LocalizedLabels) -> Self {
        Self { encoder, localized }
    }

    /// 下标 → (标准标签, 本地化标签)
    pub fn resolve(&self, class_id: usize) -> Result<(String, String)> {
        let canonical =
            self.encoder
                .inverse_transform(class_id)
                .ok_or(PipelineError::UnknownClass {
                    class_id,
                    num_classes: self.encoder.len(),
                })?;
        Ok((
            canonical.to_string(),
            self.localized.lookup(canonical).to_string(),
        ))
    }
}
