// SPDX-License-Identifier: MPL-2.0
//! Interpretation of raw backend responses.

use super::RawResponse;
use crate::domain::{IdentityRecord, UserId};
use crate::error::{LookupFailure, SubmissionFailure};
use serde::Deserialize;
use serde_json::Value;

/// `user_id` as sent by the backend: a number, or digits in a string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WireUserId {
    Number(u64),
    Text(String),
}

impl WireUserId {
    fn into_user_id(self) -> Option<UserId> {
        match self {
            WireUserId::Number(id) => Some(UserId(id)),
            WireUserId::Text(text) => text.trim().parse().ok().map(UserId),
        }
    }
}

#[derive(Debug, Deserialize)]
struct LookupBody {
    #[serde(default)]
    success: bool,
    user_id: Option<WireUserId>,
    #[serde(default)]
    first_name: Option<String>,
    #[serde(default)]
    last_name: Option<String>,
    #[serde(default)]
    middle_name: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Turns an identity lookup response into a record or a failure.
///
/// - 404 is "not found", any other non-2xx is a server error
/// - a 2xx body with `success: false` is a rejection carrying its `error`
/// - a 2xx body that is not the expected JSON is treated like a network error
pub fn interpret_lookup(raw: &RawResponse) -> Result<IdentityRecord, LookupFailure> {
    if !raw.is_success() {
        return Err(match raw.status {
            404 => LookupFailure::NotFound,
            status => LookupFailure::Server { status },
        });
    }

    let body: LookupBody = serde_json::from_slice(&raw.body)
        .map_err(|e| LookupFailure::Network(format!("malformed lookup response: {}", e)))?;

    if !body.success {
        return Err(LookupFailure::Rejected {
            reason: non_empty(body.error),
        });
    }

    let user_id = body
        .user_id
        .and_then(WireUserId::into_user_id)
        .ok_or_else(|| LookupFailure::Network("lookup response without user_id".to_string()))?;

    Ok(IdentityRecord {
        user_id,
        first_name: body.first_name.unwrap_or_default(),
        last_name: body.last_name.unwrap_or_default(),
        middle_name: non_empty(body.middle_name),
    })
}

/// Turns a submission response into the server's success message (if any)
/// or a failure.
///
/// For a non-2xx status the message is recovered from the JSON `error`
/// field, then `message`, then the plain-text body. When none of those
/// yields text, the rejection carries no message and the caller shows the
/// generic status text.
pub fn interpret_submission(raw: &RawResponse) -> Result<Option<String>, SubmissionFailure> {
    let json = serde_json::from_slice::<Value>(&raw.body).ok();

    if raw.is_success() {
        return Ok(json.as_ref().and_then(|v| string_field(v, "message")));
    }

    let message = match &json {
        Some(value) => string_field(value, "error").or_else(|| string_field(value, "message")),
        None => non_empty(Some(String::from_utf8_lossy(&raw.body).into_owned())),
    };

    Err(SubmissionFailure::Rejected {
        status: raw.status,
        message,
    })
}

fn string_field(value: &Value, field: &str) -> Option<String> {
    non_empty(value.get(field)?.as_str().map(str::to_string))
}

fn non_empty(text: Option<String>) -> Option<String> {
    text.map(|t| t.trim().to_string()).filter(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup(status: u16, body: &str) -> Result<IdentityRecord, LookupFailure> {
        interpret_lookup(&RawResponse::new(status, body))
    }

    fn submission(status: u16, body: &str) -> Result<Option<String>, SubmissionFailure> {
        interpret_submission(&RawResponse::new(status, body))
    }

    #[test]
    fn lookup_success_builds_record() {
        let record = lookup(
            200,
            r#"{"success":true,"user_id":7,"first_name":"Ivan","last_name":"Petrov","middle_name":"Sergeevich"}"#,
        )
        .expect("record");
        assert_eq!(record.user_id, UserId(7));
        assert_eq!(record.display_name(), "Petrov Ivan Sergeevich");
    }

    #[test]
    fn lookup_accepts_string_user_id_and_null_middle_name() {
        let record = lookup(
            200,
            r#"{"success":true,"user_id":"42","first_name":"A","last_name":"B","middle_name":null}"#,
        )
        .expect("record");
        assert_eq!(record.user_id, UserId(42));
        assert_eq!(record.middle_name, None);
    }

    #[test]
    fn lookup_status_mapping() {
        assert_eq!(lookup(404, r#"{"success":false}"#), Err(LookupFailure::NotFound));
        assert_eq!(lookup(500, ""), Err(LookupFailure::Server { status: 500 }));
        assert_eq!(lookup(403, "nope"), Err(LookupFailure::Server { status: 403 }));
    }

    #[test]
    fn lookup_rejection_carries_error_text() {
        assert_eq!(
            lookup(200, r#"{"success":false,"error":"Заблокирован"}"#),
            Err(LookupFailure::Rejected {
                reason: Some("Заблокирован".into())
            })
        );
        assert_eq!(
            lookup(200, r#"{"success":false,"error":""}"#),
            Err(LookupFailure::Rejected { reason: None })
        );
    }

    #[test]
    fn lookup_malformed_bodies_are_network_failures() {
        for body in ["", "<html>", r#"{"success":true}"#, r#"{"success":true,"user_id":"x"}"#] {
            assert!(
                matches!(lookup(200, body), Err(LookupFailure::Network(_))),
                "body {:?}",
                body
            );
        }
    }

    #[test]
    fn submission_success_message_is_optional() {
        assert_eq!(submission(200, r#"{"message":"Биометрия обновлена"}"#), Ok(Some("Биометрия обновлена".into())));
        assert_eq!(submission(200, r#"{}"#), Ok(None));
        assert_eq!(submission(200, "OK"), Ok(None));
    }

    #[test]
    fn submission_failure_prefers_json_error_then_message() {
        assert_eq!(
            submission(400, r#"{"error":"ИИН не указан","message":"ignored"}"#),
            Err(SubmissionFailure::Rejected {
                status: 400,
                message: Some("ИИН не указан".into())
            })
        );
        assert_eq!(
            submission(500, r#"{"message":"Внутренняя ошибка"}"#),
            Err(SubmissionFailure::Rejected {
                status: 500,
                message: Some("Внутренняя ошибка".into())
            })
        );
    }

    #[test]
    fn submission_failure_falls_back_to_plain_text() {
        assert_eq!(
            submission(502, "Bad Gateway"),
            Err(SubmissionFailure::Rejected {
                status: 502,
                message: Some("Bad Gateway".into())
            })
        );
    }

    #[test]
    fn submission_failure_without_text_has_no_message() {
        for body in ["", "   ", r#"{"detail":"x"}"#] {
            assert_eq!(
                submission(500, body),
                Err(SubmissionFailure::Rejected {
                    status: 500,
                    message: None
                }),
                "body {:?}",
                body
            );
        }
    }
}
