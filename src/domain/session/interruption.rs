//! Session Context - 中断通知
//!
//! 平台投递的中断通知载荷及其解析
//!
//! 载荷格式:
//! - `type`: 无符号整数，`1` = 中断开始，`0` = 中断结束
//! - `options`: 无符号整数位掩码，`1` = 应恢复播放（仅结束事件有意义，缺省视为不恢复）

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::SessionError;

pub const INTERRUPTION_TYPE_KEY: &str = "type";
pub const INTERRUPTION_OPTIONS_KEY: &str = "options";

const TYPE_ENDED: u64 = 0;
const TYPE_BEGAN: u64 = 1;
const OPTION_SHOULD_RESUME: u64 = 1 << 0;

/// 平台投递的原始中断通知
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InterruptionPayload(Map<String, Value>);

impl InterruptionPayload {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    pub fn began() -> Self {
        let mut fields = Map::new();
        fields.insert(INTERRUPTION_TYPE_KEY.to_string(), Value::from(TYPE_BEGAN));
        Self(fields)
    }

    pub fn ended(should_resume: bool) -> Self {
        let options = if should_resume { OPTION_SHOULD_RESUME } else { 0 };
        let mut fields = Map::new();
        fields.insert(INTERRUPTION_TYPE_KEY.to_string(), Value::from(TYPE_ENDED));
        fields.insert(INTERRUPTION_OPTIONS_KEY.to_string(), Value::from(options));
        Self(fields)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    /// 解析为中断事件
    pub fn parse(&self) -> Result<Interruption, SessionError> {
        let kind = self
            .0
            .get(INTERRUPTION_TYPE_KEY)
            .ok_or_else(|| SessionError::malformed("missing interruption type"))?
            .as_u64()
            .ok_or_else(|| SessionError::malformed("interruption type is not an unsigned integer"))?;

        match kind {
            TYPE_BEGAN => Ok(Interruption::Began),
            TYPE_ENDED => {
                let options = match self.0.get(INTERRUPTION_OPTIONS_KEY) {
                    None => 0,
                    Some(value) => value.as_u64().ok_or_else(|| {
                        SessionError::malformed("interruption options is not an unsigned integer")
                    })?,
                };
                Ok(Interruption::Ended {
                    should_resume: options & OPTION_SHOULD_RESUME != 0,
                })
            }
            other => Err(SessionError::malformed(format!(
                "unknown interruption type: {}",
                other
            ))),
        }
    }
}

/// 已解析的中断事件
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interruption {
    Began,
    Ended { should_resume: bool },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(value: Value) -> InterruptionPayload {
        match value {
            Value::Object(map) => InterruptionPayload::new(map),
            _ => panic!("payload must be an object"),
        }
    }

    #[test]
    fn test_parse_began() {
        assert_eq!(InterruptionPayload::began().parse(), Ok(Interruption::Began));
    }

    #[test]
    fn test_parse_ended_with_options() {
        assert_eq!(
            InterruptionPayload::ended(true).parse(),
            Ok(Interruption::Ended { should_resume: true })
        );
        assert_eq!(
            InterruptionPayload::ended(false).parse(),
            Ok(Interruption::Ended { should_resume: false })
        );
        // 其他位不影响恢复标志
        assert_eq!(
            payload(json!({"type": 0, "options": 6})).parse(),
            Ok(Interruption::Ended { should_resume: false })
        );
    }

    #[test]
    fn test_parse_ended_without_options_does_not_resume() {
        assert_eq!(
            payload(json!({"type": 0})).parse(),
            Ok(Interruption::Ended { should_resume: false })
        );
    }

    #[test]
    fn test_parse_malformed() {
        let cases = [
            json!({}),
            json!({"type": "began"}),
            json!({"type": -1}),
            json!({"type": 7}),
            json!({"type": 0, "options": "resume"}),
        ];
        for case in cases {
            let result = payload(case.clone()).parse();
            assert!(
                matches!(result, Err(SessionError::MalformedInterruptionPayload(_))),
                "expected malformed for {}",
                case
            );
        }
    }

    #[test]
    fn test_payload_deserializes_from_json_object() {
        let payload: InterruptionPayload =
            serde_json::from_str(r#"{"type": 0, "options": 1}"#).unwrap();
        assert_eq!(
            payload.parse(),
            Ok(Interruption::Ended { should_resume: true })
        );
    }
}
