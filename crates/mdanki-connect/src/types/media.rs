//! Media-related types.

use serde::Serialize;

/// Parameters for a `storeMediaFile` action.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreMediaParams {
    /// Filename to save as.
    pub filename: String,
    /// Base64-encoded file data.
    pub data: String,
}

impl StoreMediaParams {
    /// Store base64-encoded data.
    pub fn from_base64(filename: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            data: data.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_media_params_wire_shape() {
        let params = StoreMediaParams::from_base64("abc.png", "QQ==");
        assert_eq!(
            serde_json::to_value(&params).unwrap(),
            serde_json::json!({"filename": "abc.png", "data": "QQ=="})
        );
    }
}
