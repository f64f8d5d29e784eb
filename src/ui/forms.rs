use anyhow::{anyhow, Result};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::introduction::TOKENS;
use crate::models::Estimate;

/// Internal representation of the sign-in form fields.
#[derive(Default, Clone)]
pub(crate) struct LoginForm {
    pub(crate) username: String,
    pub(crate) password: String,
    pub(crate) active: LoginField,
    pub(crate) error: Option<String>,
}

/// Fields available within the sign-in form.
#[derive(Copy, Clone, Default, PartialEq, Eq, Debug)]
pub(crate) enum LoginField {
    #[default]
    Username,
    Password,
}

impl LoginForm {
    /// Swap focus between the username and password fields.
    pub(crate) fn toggle_field(&mut self) {
        self.active = match self.active {
            LoginField::Username => LoginField::Password,
            LoginField::Password => LoginField::Username,
        };
    }

    /// Append a character to the active field. Usernames never contain
    /// whitespace, passwords take anything printable.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        match self.active {
            LoginField::Username => {
                if ch.is_whitespace() {
                    return false;
                }
                self.username.push(ch);
            }
            LoginField::Password => self.password.push(ch),
        }
        self.error = None;
        true
    }

    pub(crate) fn backspace(&mut self) {
        match self.active {
            LoginField::Username => {
                self.username.pop();
            }
            LoginField::Password => {
                self.password.pop();
            }
        }
    }

    /// Validate the inputs and return them ready for authentication.
    pub(crate) fn parse_inputs(&self) -> Result<(String, String)> {
        let username = self.username.trim();
        if username.is_empty() {
            return Err(anyhow!("Username is required."));
        }
        if self.password.is_empty() {
            return Err(anyhow!("Password is required."));
        }
        Ok((username.to_string(), self.password.clone()))
    }

    /// Forget the typed password after a failed attempt.
    pub(crate) fn reject(&mut self, message: impl Into<String>) {
        self.password.clear();
        self.active = LoginField::Password;
        self.error = Some(message.into());
    }

    /// Render a single line for the form widget. Passwords are masked.
    pub(crate) fn build_line(&self, field_name: &str, field: LoginField) -> Line<'static> {
        let value = match field {
            LoginField::Username => self.username.clone(),
            LoginField::Password => "*".repeat(self.password.chars().count()),
        };
        let is_active = self.active == field;
        let is_empty = value.is_empty();

        let display = if is_empty {
            "<required>".to_string()
        } else {
            value
        };

        let style = if is_active {
            Style::default().fg(Color::Yellow)
        } else if is_empty {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };

        Line::from(vec![
            Span::raw(format!("{field_name}: ")),
            Span::styled(display, style),
        ])
    }

    /// Character count of the active field, used to place the cursor.
    pub(crate) fn active_len(&self) -> usize {
        match self.active {
            LoginField::Username => self.username.chars().count(),
            LoginField::Password => self.password.chars().count(),
        }
    }
}

/// Editing state for an estimate's introduction letter.
#[derive(Clone)]
pub(crate) struct IntroductionEditor {
    pub(crate) estimate_id: i64,
    pub(crate) customer_name: String,
    pub(crate) text: String,
}

impl IntroductionEditor {
    pub(crate) fn from(estimate: &Estimate) -> Self {
        Self {
            estimate_id: estimate.id,
            customer_name: estimate.customer_name.clone(),
            text: estimate.introduction.clone(),
        }
    }

    pub(crate) fn push_char(&mut self, ch: char) {
        if !ch.is_control() {
            self.text.push(ch);
        }
    }

    /// Remove the last character, or a whole token when the text ends in one.
    pub(crate) fn backspace(&mut self) {
        let trailing_token = TOKENS
            .iter()
            .find(|token| self.text.ends_with(token.placeholder));
        match trailing_token {
            Some(token) => {
                let keep = self.text.len() - token.placeholder.len();
                self.text.truncate(keep);
            }
            None => {
                self.text.pop();
            }
        }
    }

    /// Append the token bound to function key `key` (F1 to F5). Returns
    /// false for keys without a token.
    pub(crate) fn insert_token(&mut self, key: u8) -> bool {
        let Some(token) = usize::from(key)
            .checked_sub(1)
            .and_then(|idx| TOKENS.get(idx))
        else {
            return false;
        };
        self.text.push_str(token.placeholder);
        true
    }
}

/// Confirmation state before an estimate is deleted.
pub(crate) struct ConfirmEstimateDelete {
    pub(crate) id: i64,
    pub(crate) quote_number: String,
    pub(crate) customer_name: String,
}

impl ConfirmEstimateDelete {
    pub(crate) fn from(estimate: &Estimate) -> Self {
        Self {
            id: estimate.id,
            quote_number: estimate.quote_number.clone(),
            customer_name: estimate.customer_name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typing_goes_to_the_focused_field() {
        let mut form = LoginForm::default();
        "admin".chars().for_each(|ch| {
            form.push_char(ch);
        });
        form.toggle_field();
        "admin 123".chars().for_each(|ch| {
            form.push_char(ch);
        });

        assert_eq!(form.username, "admin");
        assert_eq!(form.password, "admin 123");
        assert_eq!(form.active_len(), 9);
    }

    #[test]
    fn usernames_reject_whitespace() {
        let mut form = LoginForm::default();

        assert!(!form.push_char(' '));
        assert!(!form.push_char('\n'));
        assert!(form.username.is_empty());
    }

    #[test]
    fn both_fields_are_required() {
        let mut form = LoginForm::default();
        assert!(form.parse_inputs().is_err());

        form.username = "demo".to_string();
        assert!(form.parse_inputs().is_err());

        form.password = "demo123".to_string();
        assert_eq!(
            form.parse_inputs().expect("valid form"),
            ("demo".to_string(), "demo123".to_string())
        );
    }

    #[test]
    fn rejection_clears_password_and_focuses_it() {
        let mut form = LoginForm {
            username: "demo".to_string(),
            password: "nope".to_string(),
            ..LoginForm::default()
        };

        form.reject("Invalid username or password.");

        assert!(form.password.is_empty());
        assert_eq!(form.active, LoginField::Password);
        assert_eq!(form.error.as_deref(), Some("Invalid username or password."));
    }

    #[test]
    fn password_line_is_masked() {
        let form = LoginForm {
            password: "secret".to_string(),
            ..LoginForm::default()
        };

        let line = form.build_line("Password", LoginField::Password);
        let text: String = line.spans.iter().map(|span| span.content.as_ref()).collect();
        assert_eq!(text, "Password: ******");
    }

    fn editor(text: &str) -> IntroductionEditor {
        IntroductionEditor {
            estimate_id: 1,
            customer_name: "John Smith".to_string(),
            text: text.to_string(),
        }
    }

    #[test]
    fn function_keys_insert_tokens_in_menu_order() {
        let mut editor = editor("Dear ");

        assert!(editor.insert_token(1));
        editor.push_char(',');
        assert!(editor.insert_token(5));
        assert!(!editor.insert_token(0));
        assert!(!editor.insert_token(6));

        assert_eq!(editor.text, "Dear {{CUSTOMER_NAME}},{{TOTAL_AMOUNT}}");
    }

    #[test]
    fn backspace_removes_a_whole_trailing_token() {
        let mut editor = editor("Total: {{TOTAL_AMOUNT}}");

        editor.backspace();
        assert_eq!(editor.text, "Total: ");
        editor.backspace();
        assert_eq!(editor.text, "Total:");
    }
}
