use crate::error::{AppError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodCheck {
    Preflight,
    Allowed,
    NotAllowed,
}

pub fn check_method(method: &str) -> MethodCheck {
    match method {
        "OPTIONS" => MethodCheck::Preflight,
        "POST" => MethodCheck::Allowed,
        _ => MethodCheck::NotAllowed,
    }
}

/// Only enforced when `expected` is set and non-empty (`X_API_KEY`).
pub fn check_api_key(expected: Option<&str>, provided: Option<&str>) -> Result<()> {
    match expected.filter(|e| !e.is_empty()) {
        None => Ok(()),
        Some(expected) if provided == Some(expected) => Ok(()),
        Some(_) => Err(AppError::Unauthorized),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_methods() {
        assert_eq!(check_method("OPTIONS"), MethodCheck::Preflight);
        assert_eq!(check_method("POST"), MethodCheck::Allowed);
        assert_eq!(check_method("GET"), MethodCheck::NotAllowed);
    }

    #[test]
    fn api_key_is_optional() {
        assert!(check_api_key(None, None).is_ok());
        assert!(check_api_key(Some(""), None).is_ok());
    }

    #[test]
    fn api_key_must_match_when_configured() {
        assert!(check_api_key(Some("secret"), Some("secret")).is_ok());
        assert!(matches!(
            check_api_key(Some("secret"), Some("guess")),
            Err(AppError::Unauthorized)
        ));
        assert!(matches!(
            check_api_key(Some("secret"), None),
            Err(AppError::Unauthorized)
        ));
    }
}
