//! Built-in form schemas used by the dashboard screens.
//!
//! Messages are user-facing and rendered inline next to the offending field.

use std::sync::LazyLock;

use crate::validation::engine::{FieldSpec, FormSchema, Rule, Stage};

const LETTERS_AND_SPACES: &str = r"^[a-zA-Z\s]+$";
const HTML_TAG: &str = r"<[^>]*>";
const SPECIAL_CHARS: &str = r#"!@#$%^&*()_+-=[]{};':"\|,.<>/?"#;

pub static SIGN_IN: LazyLock<FormSchema> = LazyLock::new(|| {
    FormSchema::new("sign-in")
        .field(
            FieldSpec::string("email")
                .label("Email")
                .rule(Rule::email("Please enter a valid email address")),
        )
        .field(
            FieldSpec::string("password")
                .label("Password")
                .rule(Rule::required("Password is required")),
        )
        .field(FieldSpec::boolean("rememberMe").label("Remember me"))
});

pub static SIGN_UP: LazyLock<FormSchema> = LazyLock::new(|| {
    FormSchema::new("sign-up")
        .field(
            FieldSpec::string("name")
                .label("Name")
                .rule(Rule::min_length(2, "Name must be at least 2 characters long"))
                .rule(Rule::matches(
                    LETTERS_AND_SPACES,
                    "Name must only contain alphabetic characters",
                )),
        )
        .field(
            FieldSpec::string("email")
                .label("Email")
                .rule(Rule::email("Please enter a valid email address")),
        )
        .field(
            FieldSpec::string("contactNumber")
                .label("Contact number")
                .rule(Rule::matches(r"^\d+$", "Contact number must only contain digits"))
                .rule(Rule::min_length(10, "Contact number must be at least 10 digits")),
        )
        .field(
            FieldSpec::string("password")
                .label("Password")
                .rule(Rule::min_length(8, "Password must be at least 8 characters long"))
                .rule(Rule::matches(
                    "[A-Z]",
                    "Password must contain at least one uppercase letter",
                ))
                .rule(Rule::matches(
                    "[a-z]",
                    "Password must contain at least one lowercase letter",
                ))
                .rule(Rule::matches("[0-9]", "Password must contain at least one number"))
                .rule(Rule::matches(
                    "[^A-Za-z0-9]",
                    "Password must contain at least one special character",
                )),
        )
        .field(
            FieldSpec::string("confirmPassword")
                .label("Confirm password")
                .rule(Rule::equals_field("password", "Passwords don't match")),
        )
        .field(FieldSpec::boolean("rememberMe").label("Remember me"))
});

pub static CANDIDATE: LazyLock<FormSchema> = LazyLock::new(|| {
    FormSchema::new("candidate")
        .field(
            FieldSpec::string("fullName")
                .label("Full name")
                .rule(Rule::min_length(2, "Full name must be at least 2 characters"))
                .rule(Rule::max_length(50, "Full name must be less than 50 characters"))
                .rule(Rule::matches(
                    LETTERS_AND_SPACES,
                    "Full name can only contain alphabets and spaces",
                )),
        )
        .field(
            FieldSpec::string("email")
                .label("Email")
                .rule(Rule::min_length(5, "Email must be at least 5 characters"))
                .rule(Rule::email("Please enter a valid email address")),
        )
        .field(
            FieldSpec::string("phone")
                .label("Phone number")
                .rule(Rule::min_length(10, "Phone number must be at least 10 digits"))
                .rule(Rule::max_length(15, "Phone number must be less than 15 digits"))
                .rule(Rule::matches(
                    r"^[0-9+\-\s]+$",
                    "Phone number can only contain numbers, +, - and spaces",
                )),
        )
        .field(
            FieldSpec::string("position")
                .label("Position")
                .rule(Rule::min_length(3, "Position must be at least 3 characters"))
                .rule(Rule::max_length(100, "Position must be less than 100 characters")),
        )
        .field(experience_field())
});

pub static TEAM_MEMBER: LazyLock<FormSchema> = LazyLock::new(|| {
    FormSchema::new("team-member")
        .field(
            FieldSpec::string("fullName")
                .label("Full name")
                .rule(Rule::min_length(3, "Full name must be at least 3 characters"))
                .rule(Rule::max_length(50, "Full name must be less than 50 characters"))
                .rule(Rule::matches(
                    LETTERS_AND_SPACES,
                    "Full name can only contain alphabets and spaces",
                )),
        )
        .field(
            FieldSpec::string("email")
                .label("Email")
                .rule(Rule::min_length(5, "Email must be at least 5 characters"))
                .rule(Rule::email("Please enter a valid email address")),
        )
        .field(
            FieldSpec::string("phone")
                .label("Phone number")
                .rule(Rule::min_length(10, "Phone number must be at least 10 digits"))
                .rule(Rule::max_length(15, "Phone number must be less than 15 digits"))
                .rule(Rule::matches(
                    r"^(?:\+91[- ]?)?[6789]\d{9}$",
                    "Phone must be in Indian format (e.g., +91-9876543210 or 10 digits starting with 6-9)",
                )),
        )
        .field(
            FieldSpec::string("designation")
                .label("Designation")
                .rule(Rule::min_length(2, "Designation is required"))
                .rule(Rule::max_length(100, "Designation must be less than 100 characters")),
        )
        .field(
            FieldSpec::string("department")
                .label("Department")
                .rule(Rule::required("Department selection is required")),
        )
        .field(experience_field())
});

pub static SETTINGS: LazyLock<FormSchema> = LazyLock::new(|| {
    FormSchema::new("settings")
        .field(name_part("firstName", "First name"))
        .field(name_part("lastName", "Last name"))
        .field(
            FieldSpec::string("email")
                .label("Email")
                .rule(Rule::min_length(5, "Email must be at least 5 characters"))
                .rule(Rule::max_length(100, "Email must be less than 100 characters"))
                .rule(Rule::email("Please enter a valid email address")),
        )
        .field(
            FieldSpec::string("phone")
                .label("Phone number")
                .rule(Rule::min_length(10, "Phone number must be at least 10 digits"))
                .rule(Rule::max_length(15, "Phone number must be less than 15 digits"))
                .rule(Rule::matches(r"^[0-9]+$", "Phone number can only contain numbers")),
        )
        .field(
            FieldSpec::string("bio")
                .label("Bio")
                .rule(Rule::max_length(500, "Bio must be less than 500 characters"))
                .rule(Rule::rejects(HTML_TAG, "Bio cannot contain HTML tags")),
        )
});

pub static PASSWORD_UPDATE: LazyLock<FormSchema> = LazyLock::new(|| {
    FormSchema::new("password-update")
        .field(
            FieldSpec::string("currentPassword")
                .label("Current password")
                .rule(Rule::required("Current password is required")),
        )
        .field(
            FieldSpec::string("newPassword")
                .label("New password")
                .rule(Rule::min_length(8, "Password must be at least 8 characters"))
                .rule(Rule::max_length(20, "Password must be less than 20 characters"))
                .rule(Rule::predicate(
                    Stage::Pattern,
                    is_strong_password,
                    "Password must include at least 1 uppercase, 1 lowercase, 1 number, and 1 special character",
                ))
                .rule(Rule::differs_from(
                    "currentPassword",
                    "New password must be different from current password",
                )),
        )
        .field(
            FieldSpec::string("confirmPassword")
                .label("Confirm password")
                .rule(Rule::equals_field("newPassword", "Passwords do not match")),
        )
});

fn experience_field() -> FieldSpec {
    FieldSpec::number("experience")
        .label("Experience")
        .rule(Rule::required("Experience is required"))
        .rule(Rule::numeric("Experience must be a number"))
        .rule(Rule::range(0.0, 50.0, "Experience must be between 0 and 50 years"))
}

fn name_part(field: &str, label: &str) -> FieldSpec {
    FieldSpec::string(field)
        .label(label)
        .rule(Rule::required(format!("{label} is required")))
        .rule(Rule::max_length(50, format!("{label} must be less than 50 characters")))
        .rule(Rule::matches(
            LETTERS_AND_SPACES,
            format!("{label} can only contain alphabets"),
        ))
}

/// At least one lowercase, uppercase, digit and special character.
fn is_strong_password(value: &str) -> bool {
    value.chars().any(|c| c.is_ascii_lowercase())
        && value.chars().any(|c| c.is_ascii_uppercase())
        && value.chars().any(|c| c.is_ascii_digit())
        && value.chars().any(|c| SPECIAL_CHARS.contains(c))
}

/// Looks up a built-in schema by its route name.
pub fn schema_by_name(name: &str) -> Option<&'static FormSchema> {
    let schema: &'static LazyLock<FormSchema> = match name {
        "sign-in" => &SIGN_IN,
        "sign-up" => &SIGN_UP,
        "candidate" => &CANDIDATE,
        "team-member" => &TEAM_MEMBER,
        "settings" => &SETTINGS,
        "password-update" => &PASSWORD_UPDATE,
        _ => return None,
    };
    Some(LazyLock::force(schema))
}
