// Service outcome wrapper
//
// Expected failures (invalid input, missing rows) are returned as values
// rather than errors. The status only moves away from Success by adding a
// message, so a failed result always explains itself.

use serde::Serialize;

/// Outcome status of a service call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResultType {
    #[default]
    Success,
    Invalid,
    NotFound,
}

/// Status, messages and optional payload of a service call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceResult<T> {
    result_type: ResultType,
    messages: Vec<String>,
    payload: Option<T>,
}

impl<T> Default for ServiceResult<T> {
    fn default() -> Self {
        Self {
            result_type: ResultType::Success,
            messages: Vec::new(),
            payload: None,
        }
    }
}

impl<T> ServiceResult<T> {
    /// Successful result without a payload
    pub fn success() -> Self {
        Self::default()
    }

    /// Successful result carrying a payload
    pub fn with_payload(payload: T) -> Self {
        Self {
            payload: Some(payload),
            ..Self::default()
        }
    }

    /// Invalid result with one message per violation
    pub fn invalid<I, S>(messages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut result = Self::default();
        for message in messages {
            result.add_message(message, ResultType::Invalid);
        }
        result
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        let mut result = Self::default();
        result.add_message(message, ResultType::NotFound);
        result
    }

    /// Record a failure message. Drops any payload.
    pub fn add_message(&mut self, message: impl Into<String>, result_type: ResultType) {
        debug_assert_ne!(result_type, ResultType::Success);
        self.messages.push(message.into());
        self.result_type = result_type;
        self.payload = None;
    }

    pub fn result_type(&self) -> ResultType {
        self.result_type
    }

    pub fn is_success(&self) -> bool {
        self.result_type == ResultType::Success
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn into_messages(self) -> Vec<String> {
        self.messages
    }

    pub fn payload(&self) -> Option<&T> {
        self.payload.as_ref()
    }

    pub fn into_payload(self) -> Option<T> {
        self.payload
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_has_no_messages() {
        let result: ServiceResult<()> = ServiceResult::success();
        assert!(result.is_success());
        assert!(result.messages().is_empty());
        assert_eq!(result.payload(), None);
    }

    #[test]
    fn test_payload_only_on_success() {
        let mut result = ServiceResult::with_payload(5);
        assert_eq!(result.payload(), Some(&5));

        result.add_message("nope", ResultType::Invalid);
        assert!(!result.is_success());
        assert_eq!(result.payload(), None);
    }

    #[test]
    fn test_invalid_keeps_message_order() {
        let result: ServiceResult<()> = ServiceResult::invalid(["first", "second"]);
        assert_eq!(result.result_type(), ResultType::Invalid);
        assert_eq!(result.messages(), ["first", "second"]);
    }

    #[test]
    fn test_not_found() {
        let result: ServiceResult<()> = ServiceResult::not_found("Pet id: '4' not found.");
        assert_eq!(result.result_type(), ResultType::NotFound);
        assert_eq!(result.into_messages(), vec!["Pet id: '4' not found."]);
    }
}
