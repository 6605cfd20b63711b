//! Mapping from identity failures to the message shown under the
//! credential form.

use super::error::{AuthError, AuthErrorCode};
use crate::i18n::{Locale, Text};

/// Which identity operation failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthAction {
    SignIn,
    SignUp,
    Federated,
}

/// Pick the message key for a failed identity operation
///
/// Every federated failure shares one message; user-not-found and
/// wrong-password share the credential mismatch message so the form does
/// not reveal which accounts exist.
pub fn classify(action: AuthAction, error: &AuthError) -> Text {
    if action == AuthAction::Federated {
        return Text::AuthFederatedFailed;
    }

    match error.code {
        AuthErrorCode::EmailAlreadyInUse => Text::AuthEmailInUse,
        AuthErrorCode::InvalidEmail => Text::AuthInvalidEmail,
        AuthErrorCode::WeakPassword => Text::AuthWeakPassword,
        AuthErrorCode::UserNotFound | AuthErrorCode::WrongPassword => {
            Text::AuthCredentialMismatch
        }
        _ => Text::AuthGeneric,
    }
}

/// Localized message for a failed identity operation
pub fn handle_auth(action: AuthAction, error: &AuthError, locale: Locale) -> &'static str {
    classify(action, error).in_locale(locale)
}
