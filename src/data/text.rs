use anyhow::anyhow;

use crate::data::coder::DataCoder;
use crate::data::{DecodedData, EncodedData};
use crate::error::{Error, Result};

pub const TEXT_CONTENT_TYPE: &str = "text/plain";

/// Built-in coder for `text/plain`: the decoded form is a JSON string.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextCoder;

impl DataCoder for TextCoder {
    fn encode(&self, data: &DecodedData, content_type: &str) -> Result<EncodedData> {
        match data {
            DecodedData::String(text) => Ok(EncodedData::Text(text.clone())),
            other => Err(Error::Coder(anyhow!(
                "{content_type} data must be a string, got {other}"
            ))),
        }
    }

    fn decode(&self, encoded: &EncodedData, _content_type: &str) -> Result<DecodedData> {
        Ok(DecodedData::String(encoded.as_text()?.to_string()))
    }
}
