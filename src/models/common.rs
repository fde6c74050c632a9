use rust_decimal::{prelude::ToPrimitive, Decimal};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A numeric field the storefront sends either as a JSON number or as the
/// raw text of a form input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LooseNumber {
    Number(Decimal),
    Text(String),
}

impl LooseNumber {
    pub fn to_decimal(&self) -> Option<Decimal> {
        match self {
            LooseNumber::Number(n) => Some(*n),
            LooseNumber::Text(s) => Decimal::from_str(s.trim()).ok(),
        }
    }

    /// Whole numbers only; `"4"` and `4` parse, `4.5` does not.
    pub fn to_i32(&self) -> Option<i32> {
        let value = self.to_decimal()?;
        if !value.fract().is_zero() {
            return None;
        }
        value.to_i32()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
    pub message: String,
}

impl SuccessResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResponse {
    pub success: bool,
    /// False when the id did not exist; deleting twice is not an error
    pub deleted: bool,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_loose_number_from_json_number_and_text() {
        let n: LooseNumber = serde_json::from_str("1415").unwrap();
        assert_eq!(n.to_decimal(), Some(dec!(1415)));

        let t: LooseNumber = serde_json::from_str("\" 1415.50 \"").unwrap();
        assert_eq!(t.to_decimal(), Some(dec!(1415.50)));

        let bad: LooseNumber = serde_json::from_str("\"abc\"").unwrap();
        assert_eq!(bad.to_decimal(), None);
    }

    #[test]
    fn test_loose_number_to_i32() {
        assert_eq!(LooseNumber::Text("4".into()).to_i32(), Some(4));
        assert_eq!(LooseNumber::Number(dec!(5)).to_i32(), Some(5));
        assert_eq!(LooseNumber::Number(dec!(5.0)).to_i32(), Some(5));
        assert_eq!(LooseNumber::Number(dec!(4.5)).to_i32(), None);
        assert_eq!(LooseNumber::Text("-2".into()).to_i32(), Some(-2));
    }
}
