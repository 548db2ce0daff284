use std::sync::Mutex;

use crate::error::{ClientError, Result};
use crate::lock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Login,
    Register,
    Dashboard,
}

/// Which page is shown, plus the error popup drawn over it.
pub struct PageController {
    page: Mutex<Page>,
    error: Mutex<Option<String>>,
}

impl PageController {
    pub fn new() -> Self {
        Self {
            page: Mutex::new(Page::Login),
            error: Mutex::new(None),
        }
    }

    /// Switching page also dismisses the error popup.
    pub fn show(&self, page: Page) {
        *lock(&self.page) = page;
        self.hide_error();
    }

    pub fn current(&self) -> Page {
        *lock(&self.page)
    }

    /// Leaves the current page in place.
    pub fn show_error(&self, message: impl Into<String>) {
        *lock(&self.error) = Some(message.into());
    }

    pub fn hide_error(&self) {
        *lock(&self.error) = None;
    }

    pub fn error(&self) -> Option<String> {
        lock(&self.error).clone()
    }
}

impl Default for PageController {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<()> {
        if self.email.trim().is_empty() || self.password.is_empty() {
            return Err(ClientError::validation("Please fill in all fields"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct RegisterForm {
    pub email: String,
    pub name: String,
    pub password: String,
    pub confirm_password: String,
}

impl RegisterForm {
    pub fn validate(&self) -> Result<()> {
        if self.email.trim().is_empty()
            || self.name.trim().is_empty()
            || self.password.is_empty()
            || self.confirm_password.is_empty()
        {
            return Err(ClientError::validation("Please fill in all fields"));
        }
        if self.password != self.confirm_password {
            return Err(ClientError::validation("Passwords do not match"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_popup_overlays_page() {
        let pages = PageController::new();
        pages.show(Page::Dashboard);
        pages.show_error("boom");
        assert_eq!(pages.current(), Page::Dashboard);
        assert_eq!(pages.error().as_deref(), Some("boom"));

        pages.show(Page::Login);
        assert!(pages.error().is_none());
    }

    #[test]
    fn login_requires_both_fields() {
        let form = LoginForm {
            email: "a@b.c".into(),
            password: String::new(),
        };
        assert_eq!(form.validate().unwrap_err().to_string(), "Please fill in all fields");
    }

    #[test]
    fn register_checks_password_match() {
        let mut form = RegisterForm {
            email: "a@b.c".into(),
            name: "Ada".into(),
            password: "one".into(),
            confirm_password: "two".into(),
        };
        assert_eq!(form.validate().unwrap_err().to_string(), "Passwords do not match");

        form.confirm_password = "one".into();
        assert!(form.validate().is_ok());

        form.name = " ".into();
        assert_eq!(form.validate().unwrap_err().to_string(), "Please fill in all fields");
    }
}
