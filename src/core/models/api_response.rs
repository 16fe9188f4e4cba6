use serde_json::Value;

/// A fully-buffered control-plane response.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    /// True for a 2xx status whose body does not report `success: false`.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
            && self.body.get("success").and_then(Value::as_bool) != Some(false)
    }

    /// The `result` member of the standard response envelope.
    pub fn result(&self) -> Option<&Value> {
        self.body.get("result")
    }

    /// True if the `errors` array carries the given API error code.
    pub fn has_error_code(&self, code: i64) -> bool {
        self.body
            .get("errors")
            .and_then(Value::as_array)
            .is_some_and(|errors| {
                errors
                    .iter()
                    .any(|e| e.get("code").and_then(Value::as_i64) == Some(code))
            })
    }

    /// Human-readable summary of the `errors` array, or the status line
    /// when the body carries none.
    pub fn error_message(&self) -> String {
        let messages: Vec<String> = self
            .body
            .get("errors")
            .and_then(Value::as_array)
            .map(|errors| {
                errors
                    .iter()
                    .filter_map(|e| {
                        let message = e.get("message").and_then(Value::as_str)?;
                        Some(match e.get("code").and_then(Value::as_i64) {
                            Some(code) => format!("[{code}] {message}"),
                            None => message.to_string(),
                        })
                    })
                    .collect()
            })
            .unwrap_or_default();

        if messages.is_empty() {
            format!("unexpected response (status {})", self.status)
        } else {
            messages.join("; ")
        }
    }
}
