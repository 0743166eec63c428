use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use tracing::debug;

/// Content pool an interaction or feed item belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pool {
    Posts, // 長文
    Clips, // 短片
}

impl Pool {
    pub fn as_str(&self) -> &'static str {
        match self {
            Pool::Posts => "posts",
            Pool::Clips => "clips",
        }
    }
}

impl fmt::Display for Pool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the user did with one item. Missing or non-boolean flags read as `false`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EngagementSignals {
    pub view: bool,
    pub like: bool,
    pub comment: bool,
    pub share: bool,
}

impl EngagementSignals {
    pub fn all() -> Self {
        Self {
            view: true,
            like: true,
            comment: true,
            share: true,
        }
    }

    fn from_value(value: &Value) -> Self {
        let Some(map) = value.as_object() else {
            if !value.is_null() {
                debug!("engagement is not an object, treating as no signals");
            }
            return Self::default();
        };

        let flag = |key: &str| map.get(key).and_then(Value::as_bool).unwrap_or(false);

        Self {
            view: flag("view"),
            like: flag("like"),
            comment: flag("comment"),
            share: flag("share"),
        }
    }
}

impl<'de> Deserialize<'de> for EngagementSignals {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_value(&value))
    }
}

/// A post or clip together with the viewer's engagement on it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentItem {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_tags")]
    pub interests: Vec<String>,
    #[serde(default)]
    pub engagement: EngagementSignals,
}

impl ContentItem {
    pub fn new<I, S>(id: impl Into<String>, interests: I, engagement: EngagementSignals) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.into(),
            interests: interests.into_iter().map(Into::into).collect(),
            engagement,
        }
    }
}

/// One feed request: a user's recent interactions split by pool
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InteractionBundle {
    #[serde(default, deserialize_with = "lenient_string")]
    pub uid: String,
    #[serde(default, deserialize_with = "lenient_items")]
    pub posts: Vec<ContentItem>,
    #[serde(default, deserialize_with = "lenient_items")]
    pub clips: Vec<ContentItem>,
}

impl InteractionBundle {
    pub fn items(&self, pool: Pool) -> &[ContentItem] {
        match pool {
            Pool::Posts => &self.posts,
            Pool::Clips => &self.clips,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RankedItem {
    pub item: ContentItem,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InterestScore {
    pub tag: String,
    pub score: f64,
}

/// Final feed handed back to the request layer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeedResult {
    pub posts: Vec<ContentItem>,
    pub clips: Vec<ContentItem>,
    #[serde(default)]
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct PoolStats {
    pub interactions: usize,
    pub interests: usize,
    pub candidates: usize,
    pub final_count: usize,
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    })
}

fn lenient_tags<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let Value::Array(values) = value else {
        return Ok(Vec::new());
    };

    Ok(values
        .into_iter()
        .filter_map(|v| match v {
            Value::String(tag) => Some(tag),
            _ => None,
        })
        .collect())
}

fn lenient_items<'de, D>(deserializer: D) -> Result<Vec<ContentItem>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let Value::Array(values) = value else {
        return Ok(Vec::new());
    };

    let total = values.len();
    let items: Vec<ContentItem> = values
        .into_iter()
        .filter(Value::is_object)
        .filter_map(|v| serde_json::from_value(v).ok())
        .collect();

    if items.len() < total {
        debug!(
            dropped = total - items.len(),
            "Dropped interaction records that are not objects"
        );
    }

    Ok(items)
}
