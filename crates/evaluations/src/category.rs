use std::borrow::Cow;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::EvaluationError;

/// Closed set of scored categories. Payload keys outside this set are dropped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Leadership,
    Communication,
    Preparedness,
    CommunityEngagement,
    Reliability,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Leadership,
        Category::Communication,
        Category::Preparedness,
        Category::CommunityEngagement,
        Category::Reliability,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Category::Leadership => "leadership",
            Category::Communication => "communication",
            Category::Preparedness => "preparedness",
            Category::CommunityEngagement => "community_engagement",
            Category::Reliability => "reliability",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Category::Leadership => "Leadership",
            Category::Communication => "Communication",
            Category::Preparedness => "Emergency Preparedness",
            Category::CommunityEngagement => "Community Engagement",
            Category::Reliability => "Reliability",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.key() == key)
    }
}

/// Per-category means of one record's sub-scores.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CategoryScores {
    means: BTreeMap<Category, f64>,
}

impl CategoryScores {
    /// Accepts an object, or a string holding a serialized object.
    pub fn parse(raw: &Value) -> Result<Self, EvaluationError> {
        let map: Cow<'_, Map<String, Value>> = match raw {
            Value::Object(m) => Cow::Borrowed(m),
            Value::String(s) => Cow::Owned(
                serde_json::from_str(s)
                    .map_err(|e| EvaluationError::MalformedCategoryScores(e.to_string()))?,
            ),
            other => {
                return Err(EvaluationError::MalformedCategoryScores(format!(
                    "expected object, found {}",
                    json_kind(other)
                )))
            }
        };

        let mut means = BTreeMap::new();
        for (key, value) in map.iter() {
            let Some(category) = Category::from_key(key) else {
                continue;
            };
            if let Some(mean) = sub_score_mean(value) {
                means.insert(category, mean);
            }
        }
        Ok(Self { means })
    }

    pub fn get(&self, category: Category) -> Option<f64> {
        self.means.get(&category).copied()
    }

    /// Present categories in fixed order.
    pub fn iter(&self) -> impl Iterator<Item = (Category, f64)> + '_ {
        self.means.iter().map(|(c, m)| (*c, *m))
    }

    pub fn is_empty(&self) -> bool {
        self.means.is_empty()
    }
}

// A bare number (or numeric string) counts as a single sub-score.
fn sub_score_mean(value: &Value) -> Option<f64> {
    let scores: Vec<f64> = match value {
        Value::Object(m) => m.values().filter_map(numeric).collect(),
        Value::Array(items) => items.iter().filter_map(numeric).collect(),
        single => numeric(single).into_iter().collect(),
    };
    if scores.is_empty() {
        return None;
    }
    Some(scores.iter().sum::<f64>() / scores.len() as f64)
}

// Form posts sometimes store sub-scores as numeric strings.
fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|v| v.is_finite())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_object_of_sub_scores() {
        let raw = json!({
            "leadership": {"initiative": 4, "delegation": 3},
            "communication": [2, 3, 4],
        });
        let scores = CategoryScores::parse(&raw).unwrap();
        assert_eq!(scores.get(Category::Leadership), Some(3.5));
        assert_eq!(scores.get(Category::Communication), Some(3.0));
        assert_eq!(scores.get(Category::Reliability), None);
    }

    #[test]
    fn test_parse_double_encoded_payload() {
        let raw = Value::String(r#"{"reliability": {"attendance": "4", "follow_through": 2}}"#.into());
        let scores = CategoryScores::parse(&raw).unwrap();
        assert_eq!(scores.get(Category::Reliability), Some(3.0));
    }

    #[test]
    fn test_unknown_categories_are_dropped() {
        let raw = json!({"charisma": [4, 4], "preparedness": [1]});
        let scores = CategoryScores::parse(&raw).unwrap();
        let present: Vec<_> = scores.iter().map(|(c, _)| c).collect();
        assert_eq!(present, vec![Category::Preparedness]);
    }

    #[test]
    fn test_category_without_numbers_is_absent() {
        let raw = json!({"leadership": {"comment": "great"}, "communication": []});
        let scores = CategoryScores::parse(&raw).unwrap();
        assert!(scores.is_empty());
    }

    #[test]
    fn test_scalar_category_is_one_sub_score() {
        let raw = json!({"preparedness": "3", "reliability": 2.5, "leadership": true});
        let scores = CategoryScores::parse(&raw).unwrap();
        assert_eq!(scores.get(Category::Preparedness), Some(3.0));
        assert_eq!(scores.get(Category::Reliability), Some(2.5));
        assert_eq!(scores.get(Category::Leadership), None);
    }

    #[test]
    fn test_malformed_payloads() {
        assert!(CategoryScores::parse(&json!([1, 2])).is_err());
        assert!(CategoryScores::parse(&json!(3)).is_err());
        assert!(CategoryScores::parse(&Value::String("not json".into())).is_err());
        assert!(CategoryScores::parse(&Value::String("[1,2]".into())).is_err());
    }
}
