//! Validation collaborator.
//!
//! Pure rule checks over habit drafts and credentials. Every function
//! collects all violated rules so a single failed command can report the
//! complete list, not just the first problem.

use crate::domain::{DomainError, Frequency, Habit, HabitDraft};

const NAME_MIN_LEN: usize = 2;
const NAME_MAX_LEN: usize = 100;
const DESCRIPTION_MAX_LEN: usize = 500;
const EMAIL_MAX_LEN: usize = 254;
const PASSWORD_MIN_LEN: usize = 8;
const PASSWORD_MAX_LEN: usize = 128;

/// Validate a habit draft before creation.
pub fn validate_draft(draft: &HabitDraft) -> Result<(), DomainError> {
    into_result(habit_rule_violations(
        &draft.name,
        draft.description.as_deref(),
        draft.frequency,
        draft.target_count,
    ))
}

/// Re-validate a full habit record, used on the merged result of an update.
pub fn validate_habit(habit: &Habit) -> Result<(), DomainError> {
    into_result(habit_rule_violations(
        &habit.name,
        habit.description.as_deref(),
        habit.frequency,
        habit.target_count,
    ))
}

/// Validate an email address for the simulated sign-in.
pub fn validate_email(email: &str) -> Result<(), DomainError> {
    into_result(email_rule_violations(email))
}

/// Validate credentials for the simulated sign-up (email plus password).
pub fn validate_sign_up(email: &str, password: &str) -> Result<(), DomainError> {
    let mut errors = email_rule_violations(email);
    errors.extend(password_rule_violations(password));
    into_result(errors)
}

fn into_result(errors: Vec<String>) -> Result<(), DomainError> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(DomainError::Validation { errors })
    }
}

fn habit_rule_violations(
    name: &str,
    description: Option<&str>,
    frequency: Frequency,
    target_count: u32,
) -> Vec<String> {
    let mut errors = Vec::new();

    let trimmed = name.trim();
    if trimmed.is_empty() {
        errors.push("Habit name cannot be empty".to_string());
    } else {
        if trimmed.chars().count() < NAME_MIN_LEN {
            errors.push(format!(
                "Habit name must be at least {} characters long",
                NAME_MIN_LEN
            ));
        }
        if trimmed.chars().count() > NAME_MAX_LEN {
            errors.push(format!(
                "Habit name must be no more than {} characters long",
                NAME_MAX_LEN
            ));
        }
        if !trimmed.chars().all(is_allowed_name_char) {
            errors.push("Habit name contains invalid characters".to_string());
        }
    }

    if let Some(description) = description {
        if description.trim().chars().count() > DESCRIPTION_MAX_LEN {
            errors.push(format!(
                "Description must be no more than {} characters long",
                DESCRIPTION_MAX_LEN
            ));
        }
    }

    if target_count < 1 {
        errors.push("Target must be at least 1".to_string());
    } else if target_count > frequency.max_target() {
        errors.push(format!(
            "Target cannot exceed {} for {} habits",
            frequency.max_target(),
            frequency.display_name()
        ));
    }

    errors
}

// Letters, digits, spaces, and basic punctuation
fn is_allowed_name_char(c: char) -> bool {
    c.is_alphanumeric() || c.is_whitespace() || "-_.,!?()'".contains(c)
}

fn email_rule_violations(email: &str) -> Vec<String> {
    let mut errors = Vec::new();
    let trimmed = email.trim();

    if trimmed.is_empty() {
        errors.push("Email is required".to_string());
        return errors;
    }
    if trimmed.len() > EMAIL_MAX_LEN {
        errors.push("Email is too long".to_string());
        return errors;
    }

    let mut parts = trimmed.splitn(2, '@');
    let local = parts.next().unwrap_or_default();
    let domain = parts.next().unwrap_or_default();
    let well_formed = !local.is_empty()
        && !domain.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !trimmed.chars().any(char::is_whitespace);

    if !well_formed {
        errors.push("Please enter a valid email address".to_string());
    }

    errors
}

fn password_rule_violations(password: &str) -> Vec<String> {
    let mut errors = Vec::new();

    if password.is_empty() {
        errors.push("Password is required".to_string());
        return errors;
    }
    if password.chars().count() < PASSWORD_MIN_LEN {
        errors.push(format!(
            "Password must be at least {} characters long",
            PASSWORD_MIN_LEN
        ));
    }
    if password.chars().count() > PASSWORD_MAX_LEN {
        errors.push(format!(
            "Password must be no more than {} characters long",
            PASSWORD_MAX_LEN
        ));
    }
    if !password.chars().any(|c| c.is_ascii_alphabetic()) {
        errors.push("Password must contain at least one letter".to_string());
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        errors.push("Password must contain at least one number".to_string());
    }

    errors
}
