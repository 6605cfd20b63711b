use serde::{Deserialize, Serialize};

use crate::identity::AuthAction;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormMode {
    #[default]
    SignIn,
    SignUp,
}

impl FormMode {
    pub fn action(self) -> AuthAction {
        match self {
            FormMode::SignIn => AuthAction::SignIn,
            FormMode::SignUp => AuthAction::SignUp,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            FormMode::SignIn => FormMode::SignUp,
            FormMode::SignUp => FormMode::SignIn,
        }
    }
}

/// Credential form shown to anonymous users. The password is never kept.
/// The in-flight state of a submission lives in the page, which disables
/// the button until the response arrives.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CredentialForm {
    pub mode: FormMode,
    pub email: String,
    pub error: Option<String>,
}

impl CredentialForm {
    /// Switching modes clears the previous error
    pub fn set_mode(&mut self, mode: FormMode) {
        self.mode = mode;
        self.error = None;
    }

    pub fn toggle_mode(&mut self) {
        self.set_mode(self.mode.toggled());
    }

    /// Remember the attempted email and drop the previous error
    pub fn begin(&mut self, email: &str) {
        self.email = email.to_string();
        self.error = None;
    }

    pub fn finish(&mut self, error: Option<String>) {
        self.error = error;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_clears_error() {
        let mut form = CredentialForm::default();
        form.finish(Some("bad".into()));
        form.toggle_mode();
        assert_eq!(form.mode, FormMode::SignUp);
        assert!(form.error.is_none());
        form.toggle_mode();
        assert_eq!(form.mode, FormMode::SignIn);
    }

    #[test]
    fn test_begin_keeps_email_and_clears_error() {
        let mut form = CredentialForm::default();
        form.finish(Some("bad".into()));
        form.begin("a@example.com");
        assert!(form.error.is_none());
        form.finish(None);
        assert_eq!(form.email, "a@example.com");
    }
}
