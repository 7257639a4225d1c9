//! Configuration supplied by the pipeline on every contrast-stage call.

use serde::{Deserialize, Serialize};

use crate::contrast::lut::LutKey;
use crate::error::Result;

/// Exponent used when the pipeline does not set one.
pub const DEFAULT_CONTRAST_MULTIPLIER: f64 = 2.0;

/// Contrast-stage parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContrastParams {
    /// Gamma exponent applied to normalized intensity: `out = in^g`.
    /// Values above 1.0 darken midtones, below 1.0 brighten them.
    #[serde(default = "ContrastParams::default_multiplier")]
    pub contrast_multiplier: f64,
}

impl ContrastParams {
    pub const fn new(contrast_multiplier: f64) -> Self {
        Self {
            contrast_multiplier,
        }
    }

    /// Parse parameters from the pipeline's JSON settings object.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Cache key the stage files this configuration's table under.
    pub fn lut_key(&self) -> LutKey {
        LutKey::quantize(self.contrast_multiplier)
    }

    /// Default for serde deserialization when the field is absent.
    fn default_multiplier() -> f64 {
        DEFAULT_CONTRAST_MULTIPLIER
    }
}

impl Default for ContrastParams {
    fn default() -> Self {
        Self::new(DEFAULT_CONTRAST_MULTIPLIER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_multiplier() {
        assert_eq!(ContrastParams::default().contrast_multiplier, 2.0);
    }

    #[test]
    fn test_missing_field_uses_default() {
        let params = ContrastParams::from_json("{}").unwrap();
        assert_eq!(params, ContrastParams::default());
    }

    #[test]
    fn test_camel_case_field() {
        let params = ContrastParams::from_json(r#"{"contrastMultiplier": 0.5}"#).unwrap();
        assert_eq!(params.contrast_multiplier, 0.5);
        assert_eq!(params.to_json().unwrap(), r#"{"contrastMultiplier":0.5}"#);
    }

    #[test]
    fn test_malformed_json_is_params_error() {
        let err = ContrastParams::from_json(r#"{"contrastMultiplier": "high"}"#).unwrap_err();
        assert!(matches!(err, crate::StageError::Params(_)));
        assert!(!err.is_invalid_argument());
    }

    #[test]
    fn test_lut_key_quantizes() {
        assert_eq!(ContrastParams::new(2.04).lut_key(), LutKey::quantize(2.0));
    }
}
