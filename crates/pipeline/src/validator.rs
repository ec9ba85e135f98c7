//! Response validation.
//!
//! Raw model output is untrusted. Structured intents must parse as a JSON
//! object carrying every contract field with the right primitive shape;
//! unknown extra fields are ignored. Unstructured output is passed through
//! with a fallback for empty chat replies.

use serde_json::{Map, Value};
use storepilot_core::error::SchemaViolation;
use storepilot_core::inference::RawModelOutput;
use storepilot_core::intent::Intent;
use storepilot_core::result::{CopyResult, ForecastPoint, ForecastResult, ImageResult, ValidatedResult};
use storepilot_core::series::numeric_value;

/// Field name used for violations that concern the whole payload.
const ROOT: &str = "$";

#[derive(Debug, Clone)]
pub struct ResponseValidator {
    fallback_message: String,
}

impl ResponseValidator {
    pub fn new(fallback_message: impl Into<String>) -> Self {
        Self {
            fallback_message: fallback_message.into(),
        }
    }

    pub fn fallback_message(&self) -> &str {
        &self.fallback_message
    }

    /// Check `raw` against the contract of the intent that produced it.
    pub fn validate(
        &self,
        intent: &Intent,
        raw: RawModelOutput,
    ) -> Result<ValidatedResult, SchemaViolation> {
        match intent {
            Intent::Chat(_) => {
                let text = expect_text(raw)?;
                if text.trim().is_empty() {
                    return Ok(ValidatedResult::Text {
                        text: self.fallback_message.clone(),
                    });
                }
                Ok(ValidatedResult::Text { text })
            }
            Intent::Image(_) => {
                let url = match raw {
                    RawModelOutput::ImageUrl(url) => url,
                    RawModelOutput::Text(_) => {
                        return Err(SchemaViolation::new("url", "expected an image url, got text"));
                    }
                };
                let url = url.trim();
                if url.is_empty() {
                    return Err(SchemaViolation::new("url", "empty image url"));
                }
                Ok(ValidatedResult::Image(ImageResult {
                    url: url.to_string(),
                }))
            }
            Intent::Forecast(_) => {
                let object = parse_object(&expect_text(raw)?)?;
                validate_forecast(&object).map(ValidatedResult::Forecast)
            }
            Intent::Copy(_) => {
                let object = parse_object(&expect_text(raw)?)?;
                validate_copy(&object).map(ValidatedResult::Copy)
            }
        }
    }
}

fn expect_text(raw: RawModelOutput) -> Result<String, SchemaViolation> {
    match raw {
        RawModelOutput::Text(text) => Ok(text),
        RawModelOutput::ImageUrl(_) => Err(SchemaViolation::new(ROOT, "expected text, got an image url")),
    }
}

/// Remove one surrounding markdown code fence, including its info string.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(body) = trimmed
        .strip_prefix("```")
        .and_then(|rest| rest.strip_suffix("```"))
    else {
        return trimmed;
    };
    match body.split_once('\n') {
        Some((_info, inner)) => inner.trim(),
        None => body.trim(),
    }
}

fn parse_object(text: &str) -> Result<Map<String, Value>, SchemaViolation> {
    let value: Value = serde_json::from_str(strip_code_fence(text))
        .map_err(|e| SchemaViolation::new(ROOT, format!("not valid JSON: {e}")))?;
    match value {
        Value::Object(object) => Ok(object),
        other => Err(SchemaViolation::new(
            ROOT,
            format!("expected a JSON object, got {}", kind_of(&other)),
        )),
    }
}

fn validate_forecast(object: &Map<String, Value>) -> Result<ForecastResult, SchemaViolation> {
    let summary = required_string(object, "summary", "summary")?;
    let analysis = required_string(object, "analysis", "analysis")?;

    let items = match object.get("forecast") {
        Some(Value::Array(items)) => items,
        Some(other) => {
            return Err(SchemaViolation::new(
                "forecast",
                format!("expected a sequence, got {}", kind_of(other)),
            ));
        }
        None => return Err(SchemaViolation::new("forecast", "missing")),
    };

    let forecast = items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let Value::Object(point) = item else {
                return Err(SchemaViolation::new(
                    format!("forecast[{i}]"),
                    format!("expected an object, got {}", kind_of(item)),
                ));
            };
            let date = required_string(point, "date", &format!("forecast[{i}].date"))?;
            let field = format!("forecast[{i}].predicted_sales");
            let predicted_sales = match point.get("predicted_sales") {
                Some(value) => numeric_value(value).ok_or_else(|| {
                    SchemaViolation::new(&field, format!("expected a number, got {value}"))
                })?,
                None => return Err(SchemaViolation::new(field, "missing")),
            };
            Ok(ForecastPoint {
                date,
                predicted_sales,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ForecastResult {
        summary,
        analysis,
        forecast,
    })
}

fn validate_copy(object: &Map<String, Value>) -> Result<CopyResult, SchemaViolation> {
    let headline = required_string(object, "headline", "headline")?;
    let copy = required_string(object, "copy", "copy")?;
    let visual_hooks = required_string(object, "visualHooks", "visualHooks")?;

    let keywords = match object.get("keywords") {
        Some(Value::Array(items)) => items
            .iter()
            .enumerate()
            .map(|(i, item)| match item {
                Value::String(s) => Ok(s.clone()),
                other => Err(SchemaViolation::new(
                    format!("keywords[{i}]"),
                    format!("expected a string, got {}", kind_of(other)),
                )),
            })
            .collect::<Result<Vec<_>, _>>()?,
        Some(other) => {
            return Err(SchemaViolation::new(
                "keywords",
                format!("expected a sequence of strings, got {}", kind_of(other)),
            ));
        }
        None => return Err(SchemaViolation::new("keywords", "missing")),
    };

    Ok(CopyResult {
        headline,
        copy,
        visual_hooks,
        keywords,
    })
}

fn required_string(
    object: &Map<String, Value>,
    key: &str,
    field: &str,
) -> Result<String, SchemaViolation> {
    match object.get(key) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Err(SchemaViolation::new(
            field,
            format!("expected a string, got {}", kind_of(other)),
        )),
        None => Err(SchemaViolation::new(field, "missing")),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storepilot_core::intent::{
        AspectRatio, ChatIntent, CopyIntent, ForecastIntent, ImageIntent, Lighting, Platform,
        SceneStyle, Strategy,
    };

    fn validator() -> ResponseValidator {
        ResponseValidator::new("Sorry, please try again.")
    }

    fn forecast() -> Intent {
        Intent::Forecast(ForecastIntent {
            identifier: "A".into(),
            spec: String::new(),
            factors: String::new(),
            horizon_days: 7,
        })
    }

    fn copy() -> Intent {
        Intent::Copy(CopyIntent {
            platform: Platform::Taobao,
            strategy: Strategy::Promotion,
        })
    }

    fn text(s: &str) -> RawModelOutput {
        RawModelOutput::Text(s.into())
    }

    #[test]
    fn non_json_is_parse_violation() {
        let err = validator().validate(&forecast(), text("not json")).unwrap_err();
        assert_eq!(err.field, "$");
        assert!(err.reason.starts_with("not valid JSON"), "{}", err.reason);
    }

    #[test]
    fn json_array_is_not_an_object() {
        let err = validator().validate(&forecast(), text("[]")).unwrap_err();
        assert!(err.reason.contains("expected a JSON object"));
    }

    #[test]
    fn empty_forecast_is_a_decline() {
        let result = validator()
            .validate(
                &forecast(),
                text(r#"{"summary":"s","analysis":"a","forecast":[]}"#),
            )
            .unwrap();
        let ValidatedResult::Forecast(forecast) = result else {
            panic!("expected forecast");
        };
        assert!(forecast.declined());
        assert_eq!(forecast.total_predicted_sales(), 0.0);
    }

    #[test]
    fn missing_forecast_is_violation() {
        let err = validator()
            .validate(&forecast(), text(r#"{"summary":"s","analysis":"a"}"#))
            .unwrap_err();
        assert_eq!(err, SchemaViolation::new("forecast", "missing"));
    }

    #[test]
    fn forecast_items_are_checked() {
        let err = validator()
            .validate(
                &forecast(),
                text(
                    r#"{"summary":"s","analysis":"a","forecast":[
                        {"date":"2024-02-01","predicted_sales":3},
                        {"date":"2024-02-02","predicted_sales":"about 4"}]}"#,
                ),
            )
            .unwrap_err();
        assert_eq!(err.field, "forecast[1].predicted_sales");

        let err = validator()
            .validate(
                &forecast(),
                text(r#"{"summary":"s","analysis":"a","forecast":[{"predicted_sales":1}]}"#),
            )
            .unwrap_err();
        assert_eq!(err, SchemaViolation::new("forecast[0].date", "missing"));
    }

    #[test]
    fn numeric_strings_are_converted_and_extras_ignored() {
        let result = validator()
            .validate(
                &forecast(),
                text(
                    r#"{"summary":"s","analysis":"a","confidence":0.9,"forecast":[
                        {"date":"2024-02-01","predicted_sales":"12","note":"x"},
                        {"date":"2024-02-02","predicted_sales":3.5}]}"#,
                ),
            )
            .unwrap();
        let ValidatedResult::Forecast(forecast) = result else {
            panic!("expected forecast");
        };
        assert_eq!(forecast.forecast[0].predicted_sales, 12.0);
        assert_eq!(forecast.total_predicted_sales(), 15.5);
    }

    #[test]
    fn fenced_json_is_repaired() {
        let raw = "```json\n{\"summary\":\"s\",\"analysis\":\"a\",\"forecast\":[]}\n```";
        assert!(validator().validate(&forecast(), text(raw)).is_ok());
    }

    #[test]
    fn copy_contract() {
        let ok = validator()
            .validate(
                &copy(),
                text(r#"{"headline":"h","copy":"c","visualHooks":"v","keywords":["a","b"],"extra":1}"#),
            )
            .unwrap();
        assert_eq!(
            ok,
            ValidatedResult::Copy(CopyResult {
                headline: "h".into(),
                copy: "c".into(),
                visual_hooks: "v".into(),
                keywords: vec!["a".into(), "b".into()],
            })
        );

        let err = validator()
            .validate(
                &copy(),
                text(r#"{"headline":"h","copy":"c","visualHooks":"v","keywords":["a",2]}"#),
            )
            .unwrap_err();
        assert_eq!(err.field, "keywords[1]");

        let err = validator()
            .validate(
                &copy(),
                text(r#"{"headline":"h","copy":"c","visualHooks":"v","keywords":"a, b"}"#),
            )
            .unwrap_err();
        assert_eq!(err.field, "keywords");

        let err = validator()
            .validate(&copy(), text(r#"{"headline":"h","copy":"c","keywords":[]}"#))
            .unwrap_err();
        assert_eq!(err, SchemaViolation::new("visualHooks", "missing"));
    }

    #[test]
    fn empty_chat_reply_uses_fallback() {
        let chat = Intent::Chat(ChatIntent {
            question: "hi".into(),
        });
        let result = validator().validate(&chat, text("  \n")).unwrap();
        assert_eq!(
            result,
            ValidatedResult::Text {
                text: "Sorry, please try again.".into()
            }
        );

        let result = validator().validate(&chat, text("hello")).unwrap();
        assert_eq!(
            result,
            ValidatedResult::Text {
                text: "hello".into()
            }
        );
    }

    #[test]
    fn image_requires_url() {
        let image = Intent::Image(ImageIntent {
            scene: SceneStyle::Outdoor,
            lighting: Lighting::Natural,
            aspect_ratio: AspectRatio::Square,
            details: String::new(),
        });
        let ok = validator()
            .validate(&image, RawModelOutput::ImageUrl("https://cdn/x.png".into()))
            .unwrap();
        assert_eq!(
            ok,
            ValidatedResult::Image(ImageResult {
                url: "https://cdn/x.png".into()
            })
        );
        assert!(
            validator()
                .validate(&image, RawModelOutput::ImageUrl(" ".into()))
                .is_err()
        );
        assert!(validator().validate(&image, text("x")).is_err());
    }
}
