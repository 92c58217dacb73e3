//! Property values, including CloudFormation intrinsic functions.
//!
//! A [`CfnValue`] serializes either as a plain JSON string or as one of the
//! single-key intrinsic objects:
//!
//! - `{"Ref": "LogicalId"}`
//! - `{"Fn::GetAtt": ["LogicalId", "Attribute"]}`
//! - `{"Fn::Join": ["delimiter", [values...]]}`

use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Pseudo parameter resolving to the partition (`aws`, `aws-cn`, ...).
pub const AWS_PARTITION: &str = "AWS::Partition";

/// Pseudo parameter resolving to the deploying account.
pub const AWS_ACCOUNT_ID: &str = "AWS::AccountId";

/// A property value that may be resolved at deploy time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CfnValue {
    /// Literal string.
    Literal(String),
    /// `Ref` to a resource or pseudo parameter.
    Ref(String),
    /// `Fn::GetAtt` on a resource attribute.
    GetAtt {
        logical_id: String,
        attribute: String,
    },
    /// `Fn::Join` of the parts with a delimiter.
    Join {
        delimiter: String,
        parts: Vec<CfnValue>,
    },
}

impl CfnValue {
    /// Literal string value.
    #[must_use]
    pub fn literal(value: impl Into<String>) -> Self {
        Self::Literal(value.into())
    }

    /// `{"Ref": target}`.
    #[must_use]
    pub fn reference(target: impl Into<String>) -> Self {
        Self::Ref(target.into())
    }

    /// `{"Fn::GetAtt": [logical_id, attribute]}`.
    #[must_use]
    pub fn get_att(logical_id: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self::GetAtt {
            logical_id: logical_id.into(),
            attribute: attribute.into(),
        }
    }

    /// `{"Fn::Join": ["", parts]}`.
    #[must_use]
    pub fn concat(parts: Vec<CfnValue>) -> Self {
        Self::Join {
            delimiter: String::new(),
            parts,
        }
    }

    /// The literal string, if this value needs no deploy-time resolution.
    #[must_use]
    pub fn as_literal(&self) -> Option<&str> {
        match self {
            Self::Literal(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for CfnValue {
    fn from(value: &str) -> Self {
        Self::Literal(value.to_owned())
    }
}

impl From<String> for CfnValue {
    fn from(value: String) -> Self {
        Self::Literal(value)
    }
}

impl Serialize for CfnValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Literal(s) => serializer.serialize_str(s),
            Self::Ref(target) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("Ref", target)?;
                map.end()
            }
            Self::GetAtt {
                logical_id,
                attribute,
            } => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("Fn::GetAtt", &[logical_id, attribute])?;
                map.end()
            }
            Self::Join { delimiter, parts } => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("Fn::Join", &(delimiter, parts))?;
                map.end()
            }
        }
    }
}

/// Wire shape accepted when reading a value back.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawValue {
    Literal(String),
    Ref {
        #[serde(rename = "Ref")]
        target: String,
    },
    GetAtt {
        #[serde(rename = "Fn::GetAtt")]
        args: (String, String),
    },
    Join {
        #[serde(rename = "Fn::Join")]
        args: (String, Vec<CfnValue>),
    },
}

impl<'de> Deserialize<'de> for CfnValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match RawValue::deserialize(deserializer)? {
            RawValue::Literal(s) => Self::Literal(s),
            RawValue::Ref { target } => Self::Ref(target),
            RawValue::GetAtt {
                args: (logical_id, attribute),
            } => Self::GetAtt {
                logical_id,
                attribute,
            },
            RawValue::Join {
                args: (delimiter, parts),
            } => Self::Join { delimiter, parts },
        })
    }
}

/// Serde helpers for lists that CloudFormation writes as a bare scalar when
/// they hold exactly one element.
pub mod one_or_many {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    /// Write a single-element list as the element itself.
    pub fn serialize<T, S>(values: &[T], serializer: S) -> Result<S::Ok, S::Error>
    where
        T: Serialize,
        S: Serializer,
    {
        match values {
            [single] => single.serialize(serializer),
            _ => values.serialize(serializer),
        }
    }

    /// Accept either a scalar or a list.
    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Vec<T>, D::Error>
    where
        T: Deserialize<'de>,
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum OneOrMany<T> {
            Many(Vec<T>),
            One(T),
        }

        Ok(match OneOrMany::deserialize(deserializer)? {
            OneOrMany::Many(v) => v,
            OneOrMany::One(v) => vec![v],
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_should_serialize_intrinsics() {
        assert_eq!(
            serde_json::to_value(CfnValue::literal("x")).unwrap(),
            json!("x")
        );
        assert_eq!(
            serde_json::to_value(CfnValue::reference("Topic")).unwrap(),
            json!({"Ref": "Topic"})
        );
        assert_eq!(
            serde_json::to_value(CfnValue::get_att("Role", "Arn")).unwrap(),
            json!({"Fn::GetAtt": ["Role", "Arn"]})
        );
        let joined = CfnValue::concat(vec![
            CfnValue::literal("arn:"),
            CfnValue::reference(AWS_PARTITION),
        ]);
        assert_eq!(
            serde_json::to_value(joined).unwrap(),
            json!({"Fn::Join": ["", ["arn:", {"Ref": "AWS::Partition"}]]})
        );
    }

    #[test]
    fn test_should_read_back_nested_join() {
        let raw = json!({"Fn::Join": ["", ["arn:", {"Ref": "AWS::Partition"}, {"Fn::GetAtt": ["R", "Arn"]}]]});
        let value: CfnValue = serde_json::from_value(raw).unwrap();
        assert_eq!(
            value,
            CfnValue::concat(vec![
                CfnValue::literal("arn:"),
                CfnValue::reference(AWS_PARTITION),
                CfnValue::get_att("R", "Arn"),
            ])
        );
    }

    #[test]
    fn test_should_expose_literal() {
        assert_eq!(CfnValue::from("abc").as_literal(), Some("abc"));
        assert_eq!(CfnValue::reference("abc").as_literal(), None);
    }
}
