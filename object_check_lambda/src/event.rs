//! Decoding of S3 bucket notifications delivered in an HTTP request body.
//!
//! Only the fields needed to address the object are modelled. Everything
//! else a real notification carries (event name, timestamps, size, eTag)
//! is accepted and ignored. Field names match in their documented
//! spelling or capitalised.

use serde::Deserialize;

use crate::error::CheckError;

#[derive(Debug, Deserialize)]
pub struct S3Notification {
    #[serde(rename = "Records", alias = "records", default)]
    pub records: Vec<S3Record>,
}

#[derive(Debug, Deserialize)]
pub struct S3Record {
    #[serde(alias = "S3")]
    pub s3: S3Entity,
}

#[derive(Debug, Deserialize)]
pub struct S3Entity {
    #[serde(alias = "Bucket")]
    pub bucket: S3Bucket,
    #[serde(alias = "Object")]
    pub object: S3Object,
}

#[derive(Debug, Deserialize)]
pub struct S3Bucket {
    #[serde(alias = "Name")]
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct S3Object {
    #[serde(alias = "Key")]
    pub key: String,
}

/// Address of a single object inside a bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectRef {
    pub bucket: String,
    pub key: String,
}

pub fn decode_envelope(body: &[u8]) -> Result<S3Notification, CheckError> {
    serde_json::from_slice(body).map_err(CheckError::InvalidBody)
}

impl S3Notification {
    /// Object referenced by the first record. Any further records are ignored.
    pub fn first_object(&self) -> Result<ObjectRef, CheckError> {
        let record = self.records.first().ok_or(CheckError::NoRecords)?;
        Ok(ObjectRef {
            bucket: record.s3.bucket.name.clone(),
            key: record.s3.object.key.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SINGLE_RECORD: &str = r#"{"Records":[{"s3":{"bucket":{"name":"test-bucket"},"object":{"key":"test-key.txt"}}}]}"#;

    #[test]
    fn decodes_minimal_notification() {
        let envelope = decode_envelope(SINGLE_RECORD.as_bytes()).unwrap();
        assert_eq!(
            envelope.first_object().unwrap(),
            ObjectRef {
                bucket: "test-bucket".to_string(),
                key: "test-key.txt".to_string(),
            }
        );
    }

    #[test]
    fn accepts_lowercase_records_field() {
        let body = r#"{"records":[{"s3":{"bucket":{"name":"b"},"object":{"key":"k"}}}]}"#;
        let object = decode_envelope(body.as_bytes())
            .unwrap()
            .first_object()
            .unwrap();
        assert_eq!(object.bucket, "b");
        assert_eq!(object.key, "k");
    }

    #[test]
    fn accepts_capitalised_nested_fields() {
        let body = r#"{"Records":[{"S3":{"Bucket":{"Name":"b"},"Object":{"Key":"k"}}}]}"#;
        let object = decode_envelope(body.as_bytes())
            .unwrap()
            .first_object()
            .unwrap();
        assert_eq!(object.bucket, "b");
        assert_eq!(object.key, "k");
    }

    #[test]
    fn rejects_both_records_spellings() {
        let body = r#"{"Records":[],"records":[]}"#;
        let err = decode_envelope(body.as_bytes()).unwrap_err();
        assert!(matches!(err, CheckError::InvalidBody(_)));
    }

    #[test]
    fn ignores_unknown_fields() {
        let body = r#"{
            "Records": [{
                "eventVersion": "2.1",
                "eventSource": "aws:s3",
                "eventName": "ObjectCreated:Put",
                "eventTime": "2024-01-01T00:00:00.000Z",
                "s3": {
                    "s3SchemaVersion": "1.0",
                    "bucket": {"name": "logs", "arn": "arn:aws:s3:::logs"},
                    "object": {"key": "2024/01/01/app.log", "size": 1024, "eTag": "abc"}
                }
            }]
        }"#;
        let object = decode_envelope(body.as_bytes())
            .unwrap()
            .first_object()
            .unwrap();
        assert_eq!(object.key, "2024/01/01/app.log");
    }

    #[test]
    fn key_is_kept_verbatim() {
        let body = r#"{"Records":[{"s3":{"bucket":{"name":"b"},"object":{"key":"a+b%20c"}}}]}"#;
        let object = decode_envelope(body.as_bytes())
            .unwrap()
            .first_object()
            .unwrap();
        assert_eq!(object.key, "a+b%20c");
    }

    #[test]
    fn only_first_record_is_used() {
        let body = r#"{"Records":[
            {"s3":{"bucket":{"name":"first"},"object":{"key":"one"}}},
            {"s3":{"bucket":{"name":"second"},"object":{"key":"two"}}}
        ]}"#;
        let object = decode_envelope(body.as_bytes())
            .unwrap()
            .first_object()
            .unwrap();
        assert_eq!(object.bucket, "first");
        assert_eq!(object.key, "one");
    }

    #[test]
    fn rejects_non_json() {
        let err = decode_envelope(b"not json").unwrap_err();
        assert!(matches!(err, CheckError::InvalidBody(_)));
    }

    #[test]
    fn rejects_missing_key() {
        let body = r#"{"Records":[{"s3":{"bucket":{"name":"b"},"object":{}}}]}"#;
        let err = decode_envelope(body.as_bytes()).unwrap_err();
        assert!(matches!(err, CheckError::InvalidBody(_)));
    }

    #[test]
    fn rejects_non_string_bucket_name() {
        let body = r#"{"Records":[{"s3":{"bucket":{"name":42},"object":{"key":"k"}}}]}"#;
        let err = decode_envelope(body.as_bytes()).unwrap_err();
        assert!(matches!(err, CheckError::InvalidBody(_)));
    }

    #[test]
    fn empty_records_have_no_object() {
        for body in [r#"{"Records":[]}"#, "{}"] {
            let envelope = decode_envelope(body.as_bytes()).unwrap();
            assert!(matches!(
                envelope.first_object(),
                Err(CheckError::NoRecords)
            ));
        }
    }
}
