use std::collections::{BTreeMap, HashMap};

use common::{deserializers, serializers};
use serde::{Deserialize, Serialize};

/// An item (or key projection) as captured in the change log: attribute name to value.
pub type Item = HashMap<String, AttributeValue>;

/// A typed attribute value, one constructor per wire type code.
///
/// The wire form is the tagged DynamoDB JSON representation, e.g. `{"S": "abc"}` or
/// `{"M": {"nested": {"N": "1"}}}`. Any type code outside the ten known ones fails to
/// deserialize. Binary values travel as base64 strings. Table exports spell the codes in
/// lower camel case (`{"sS": [...]}`), which is accepted on input.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttributeValue {
    #[serde(rename = "S", alias = "s")]
    S(String),
    #[serde(rename = "N", alias = "n")]
    N(String),
    #[serde(
        rename = "B",
        alias = "b",
        serialize_with = "serializers::binary::base64_bytes",
        deserialize_with = "deserializers::binary::base64_bytes"
    )]
    B(Vec<u8>),
    #[serde(rename = "BOOL", alias = "bOOL")]
    Bool(bool),
    #[serde(rename = "NULL", alias = "nULL")]
    Null(bool),
    #[serde(rename = "L", alias = "l")]
    L(Vec<AttributeValue>),
    #[serde(rename = "M", alias = "m")]
    M(BTreeMap<String, AttributeValue>),
    #[serde(rename = "SS", alias = "sS")]
    Ss(Vec<String>),
    #[serde(rename = "NS", alias = "nS")]
    Ns(Vec<String>),
    #[serde(
        rename = "BS",
        alias = "bS",
        serialize_with = "serializers::binary::base64_bytes_set",
        deserialize_with = "deserializers::binary::base64_bytes_set"
    )]
    Bs(Vec<Vec<u8>>),
}

#[cfg(test)]
mod tests {
    use super::AttributeValue;
    use rstest::rstest;
    use std::collections::BTreeMap;

    #[rstest]
    #[case(r#"{"S": "abc"}"#, AttributeValue::S("abc".to_owned()))]
    #[case(r#"{"N": "-1.5"}"#, AttributeValue::N("-1.5".to_owned()))]
    #[case(r#"{"B": "AQID"}"#, AttributeValue::B(vec![1, 2, 3]))]
    #[case(r#"{"BOOL": true}"#, AttributeValue::Bool(true))]
    #[case(r#"{"NULL": true}"#, AttributeValue::Null(true))]
    #[case(r#"{"SS": ["a", "b"]}"#, AttributeValue::Ss(vec!["a".to_owned(), "b".to_owned()]))]
    #[case(r#"{"NS": ["1", "2"]}"#, AttributeValue::Ns(vec!["1".to_owned(), "2".to_owned()]))]
    #[case(r#"{"BS": ["AQ==", "Ag=="]}"#, AttributeValue::Bs(vec![vec![1], vec![2]]))]
    #[case::export_string(r#"{"s": "abc"}"#, AttributeValue::S("abc".to_owned()))]
    #[case::export_bool(r#"{"bOOL": false}"#, AttributeValue::Bool(false))]
    #[case::export_number_set(r#"{"nS": ["1"]}"#, AttributeValue::Ns(vec!["1".to_owned()]))]
    fn scalar_and_set_values_are_decoded(#[case] wire: &str, #[case] expected: AttributeValue) {
        let value: AttributeValue = serde_json::from_str(wire).unwrap();
        assert_eq!(expected, value);
    }

    #[test]
    fn nested_documents_are_decoded() {
        let value: AttributeValue = serde_json::from_str(
            r#"{ "M": {
                "tags": { "L": [ { "S": "red" }, { "N": "7" } ] },
                "owner": { "M": { "id": { "S": "u-1" } } }
            }}"#,
        )
        .unwrap();

        let expected = AttributeValue::M(BTreeMap::from([
            (
                "tags".to_owned(),
                AttributeValue::L(vec![
                    AttributeValue::S("red".to_owned()),
                    AttributeValue::N("7".to_owned()),
                ]),
            ),
            (
                "owner".to_owned(),
                AttributeValue::M(BTreeMap::from([(
                    "id".to_owned(),
                    AttributeValue::S("u-1".to_owned()),
                )])),
            ),
        ]));
        assert_eq!(expected, value);
    }

    #[test]
    fn unknown_type_code_is_rejected() {
        let result = serde_json::from_str::<AttributeValue>(r#"{"X": "abc"}"#);
        assert!(result.unwrap_err().to_string().contains("unknown variant"));
    }

    #[test]
    fn binary_values_are_encoded_back_to_base64() {
        let wire = serde_json::to_string(&AttributeValue::B(vec![1, 2, 3])).unwrap();
        assert_eq!(r#"{"B":"AQID"}"#, wire);
    }
}
