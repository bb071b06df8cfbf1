//! Rule engine. Evaluates a `FormSchema` against submitted form values.
//!
//! Each field reports at most one message: the first rule that fails, where rules
//! are visited stage by stage (required → coercion → bounds → pattern → cross-field)
//! and in declaration order within a stage. A present value of the wrong JSON
//! type fails coercion before any rule runs. Evaluation is pure.

use std::sync::LazyLock;

use regex::Regex;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};

/// Raw form state as submitted by the client, keyed by field name.
pub type FormValues = Map<String, Value>;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_'+\-]+(\.[A-Za-z0-9_'+\-]+)*@([A-Za-z0-9][A-Za-z0-9\-]*\.)+[A-Za-z]{2,}$")
        .expect("email pattern must compile")
});

// ────────────────────────────────────────────────────────────────────────────
// Rules
// ────────────────────────────────────────────────────────────────────────────

/// Evaluation stage. Variant order is the evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Required,
    Coercion,
    Bounds,
    Pattern,
    CrossField,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    String,
    Number,
    Boolean,
}

/// A single constraint: `(value, all_values) -> Option<message>`.
#[derive(Debug, Clone)]
pub enum Rule {
    Required { message: String },
    /// Value must parse as a finite number.
    Numeric { message: String },
    MinLength { min: usize, message: String },
    MaxLength { max: usize, message: String },
    /// Inclusive numeric range.
    Range { min: f64, max: f64, message: String },
    /// Value must match the pattern somewhere.
    Matches { pattern: Regex, message: String },
    /// Value must not match the pattern anywhere.
    Rejects { pattern: Regex, message: String },
    Email { message: String },
    /// Escape hatch for checks a single regex cannot express.
    Predicate {
        stage: Stage,
        test: fn(&str) -> bool,
        message: String,
    },
    EqualsField { other: String, message: String },
    DiffersFrom { other: String, message: String },
}

impl Rule {
    pub fn required(message: impl Into<String>) -> Self {
        Rule::Required {
            message: message.into(),
        }
    }

    pub fn numeric(message: impl Into<String>) -> Self {
        Rule::Numeric {
            message: message.into(),
        }
    }

    pub fn min_length(min: usize, message: impl Into<String>) -> Self {
        Rule::MinLength {
            min,
            message: message.into(),
        }
    }

    pub fn max_length(max: usize, message: impl Into<String>) -> Self {
        Rule::MaxLength {
            max,
            message: message.into(),
        }
    }

    pub fn range(min: f64, max: f64, message: impl Into<String>) -> Self {
        Rule::Range {
            min,
            max,
            message: message.into(),
        }
    }

    /// Panics on an invalid pattern: schemas are built from literals.
    pub fn matches(pattern: &str, message: impl Into<String>) -> Self {
        Rule::Matches {
            pattern: Regex::new(pattern).expect("schema pattern must compile"),
            message: message.into(),
        }
    }

    pub fn rejects(pattern: &str, message: impl Into<String>) -> Self {
        Rule::Rejects {
            pattern: Regex::new(pattern).expect("schema pattern must compile"),
            message: message.into(),
        }
    }

    pub fn email(message: impl Into<String>) -> Self {
        Rule::Email {
            message: message.into(),
        }
    }

    pub fn predicate(stage: Stage, test: fn(&str) -> bool, message: impl Into<String>) -> Self {
        Rule::Predicate {
            stage,
            test,
            message: message.into(),
        }
    }

    pub fn equals_field(other: impl Into<String>, message: impl Into<String>) -> Self {
        Rule::EqualsField {
            other: other.into(),
            message: message.into(),
        }
    }

    pub fn differs_from(other: impl Into<String>, message: impl Into<String>) -> Self {
        Rule::DiffersFrom {
            other: other.into(),
            message: message.into(),
        }
    }

    pub fn stage(&self) -> Stage {
        match self {
            Rule::Required { .. } => Stage::Required,
            Rule::Numeric { .. } => Stage::Coercion,
            Rule::MinLength { .. } | Rule::MaxLength { .. } | Rule::Range { .. } => Stage::Bounds,
            Rule::Matches { .. } | Rule::Rejects { .. } | Rule::Email { .. } => Stage::Pattern,
            Rule::Predicate { stage, .. } => *stage,
            Rule::EqualsField { .. } | Rule::DiffersFrom { .. } => Stage::CrossField,
        }
    }

    /// Returns the violation message, or `None` when the value satisfies the rule.
    pub fn check(&self, value: &str, values: &FormValues) -> Option<String> {
        let passed = match self {
            Rule::Required { .. } => !value.is_empty(),
            Rule::Numeric { .. } => parse_finite(value).is_some(),
            Rule::MinLength { min, .. } => value.chars().count() >= *min,
            Rule::MaxLength { max, .. } => value.chars().count() <= *max,
            Rule::Range { min, max, .. } => {
                parse_finite(value).is_some_and(|n| n >= *min && n <= *max)
            }
            Rule::Matches { pattern, .. } => pattern.is_match(value),
            Rule::Rejects { pattern, .. } => !pattern.is_match(value),
            Rule::Email { .. } => EMAIL_RE.is_match(value),
            Rule::Predicate { test, .. } => test(value),
            Rule::EqualsField { other, .. } => value == text_of(values.get(other)),
            Rule::DiffersFrom { other, .. } => value != text_of(values.get(other)),
        };

        if passed {
            None
        } else {
            Some(self.message().to_string())
        }
    }

    fn message(&self) -> &str {
        match self {
            Rule::Required { message }
            | Rule::Numeric { message }
            | Rule::MinLength { message, .. }
            | Rule::MaxLength { message, .. }
            | Rule::Range { message, .. }
            | Rule::Matches { message, .. }
            | Rule::Rejects { message, .. }
            | Rule::Email { message }
            | Rule::Predicate { message, .. }
            | Rule::EqualsField { message, .. }
            | Rule::DiffersFrom { message, .. } => message,
        }
    }
}

/// Parses a trimmed string as a finite `f64`. `NaN` and infinities are rejected.
pub fn parse_finite(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

fn text_of(value: Option<&Value>) -> &str {
    match value {
        Some(Value::String(s)) => s,
        _ => "",
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Schema
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub name: String,
    /// User-facing name for generated messages; falls back to `name`.
    pub label: Option<String>,
    pub field_type: FieldType,
    pub rules: Vec<Rule>,
}

impl FieldSpec {
    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::String)
    }

    pub fn number(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Number)
    }

    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Boolean)
    }

    fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            label: None,
            field_type,
            rules: Vec::new(),
        }
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    /// First violation for this field, or `None` if every rule passes.
    ///
    /// A present value of the wrong JSON type is a coercion failure, not a
    /// missing one, so it is reported before any `Required` rule.
    pub fn first_violation(&self, values: &FormValues) -> Option<String> {
        let raw = values.get(&self.name).filter(|v| !v.is_null());
        if let Some(message) = self.coercion_violation(raw) {
            return Some(message);
        }

        let text = match (self.field_type, raw) {
            (_, None) => String::new(),
            (FieldType::String, Some(Value::String(s))) => s.clone(),
            (FieldType::Number, Some(Value::String(s))) => s.clone(),
            (FieldType::Number, Some(Value::Number(n))) => n.to_string(),
            (FieldType::Boolean, Some(Value::Bool(b))) => b.to_string(),
            (_, Some(_)) => String::new(),
        };

        let mut ordered: Vec<&Rule> = self.rules.iter().collect();
        ordered.sort_by_key(|r| r.stage());
        ordered
            .into_iter()
            .find_map(|rule| rule.check(&text, values))
    }

    fn coercion_violation(&self, raw: Option<&Value>) -> Option<String> {
        let ok = match (self.field_type, raw) {
            (_, None) => true,
            (FieldType::String, Some(v)) => v.is_string(),
            (FieldType::Number, Some(v)) => v.is_string() || v.is_number(),
            (FieldType::Boolean, Some(v)) => v.is_boolean(),
        };
        if ok {
            return None;
        }
        let expected = match self.field_type {
            FieldType::String => "text",
            FieldType::Number => "a number",
            FieldType::Boolean => "true or false",
        };
        let label = self.label.as_deref().unwrap_or(&self.name);
        Some(format!("{label} must be {expected}"))
    }
}

/// Ordered set of field specs. Declaration order is reporting order.
#[derive(Debug, Clone)]
pub struct FormSchema {
    pub name: &'static str,
    pub fields: Vec<FieldSpec>,
}

impl FormSchema {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            fields: Vec::new(),
        }
    }

    pub fn field(mut self, field: FieldSpec) -> Self {
        self.fields.push(field);
        self
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Result
// ────────────────────────────────────────────────────────────────────────────

/// Field name → first violation message, in schema declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    errors: Vec<(String, String)>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, message)| message.as_str())
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.errors.iter().map(|(name, _)| name.as_str())
    }

    fn insert(&mut self, field: String, message: String) {
        self.errors.push((field, message));
    }
}

impl Serialize for ValidationResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.errors.len()))?;
        for (field, message) in &self.errors {
            map.serialize_entry(field, message)?;
        }
        map.end()
    }
}

/// Validates `values` against `schema`.
pub fn validate(schema: &FormSchema, values: &FormValues) -> ValidationResult {
    let mut result = ValidationResult::default();
    for field in &schema.fields {
        if let Some(message) = field.first_violation(values) {
            result.insert(field.name.clone(), message);
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn values(v: Value) -> FormValues {
        match v {
            Value::Object(map) => map,
            _ => panic!("test values must be an object"),
        }
    }

    fn experience_schema() -> FormSchema {
        FormSchema::new("experience").field(
            FieldSpec::number("experience")
                .rule(Rule::range(0.0, 50.0, "out of range"))
                .rule(Rule::numeric("not a number"))
                .rule(Rule::required("required")),
        )
    }

    #[test]
    fn test_required_checked_before_everything_else() {
        let schema = experience_schema();
        let r = validate(&schema, &values(json!({})));
        assert_eq!(r.get("experience"), Some("required"));

        let r = validate(&schema, &values(json!({ "experience": "" })));
        assert_eq!(r.get("experience"), Some("required"));
    }

    #[test]
    fn test_non_numeric_fails_before_range() {
        let r = validate(&experience_schema(), &values(json!({ "experience": "abc" })));
        assert_eq!(r.get("experience"), Some("not a number"));
    }

    #[test]
    fn test_range_is_inclusive() {
        let schema = experience_schema();
        for ok in ["0", "50", "12.5"] {
            let r = validate(&schema, &values(json!({ "experience": ok })));
            assert!(r.is_valid(), "{ok} should pass");
        }
        for bad in ["-1", "51"] {
            let r = validate(&schema, &values(json!({ "experience": bad })));
            assert_eq!(r.get("experience"), Some("out of range"), "{bad} should fail");
        }
    }

    #[test]
    fn test_json_number_accepted_for_number_field() {
        let r = validate(&experience_schema(), &values(json!({ "experience": 7 })));
        assert!(r.is_valid());
    }

    #[test]
    fn test_infinity_and_nan_are_not_numbers() {
        let schema = experience_schema();
        for bad in ["inf", "NaN", "infinity"] {
            let r = validate(&schema, &values(json!({ "experience": bad })));
            assert_eq!(r.get("experience"), Some("not a number"));
        }
    }

    #[test]
    fn test_wrong_json_type_fails_coercion() {
        let schema = FormSchema::new("t").field(
            FieldSpec::string("name").rule(Rule::min_length(2, "too short")),
        );
        let r = validate(&schema, &values(json!({ "name": true })));
        assert_eq!(r.get("name"), Some("name must be text"));
    }

    #[test]
    fn test_wrong_type_reported_before_required() {
        let schema = FormSchema::new("t").field(
            FieldSpec::string("firstName")
                .label("First name")
                .rule(Rule::required("First name is required")),
        );
        let r = validate(&schema, &values(json!({ "firstName": 5 })));
        assert_eq!(r.get("firstName"), Some("First name must be text"));

        let r = validate(&schema, &values(json!({ "firstName": null })));
        assert_eq!(r.get("firstName"), Some("First name is required"));
    }

    #[test]
    fn test_coercion_message_uses_label() {
        let schema = FormSchema::new("t")
            .field(FieldSpec::boolean("rememberMe").label("Remember me"))
            .field(FieldSpec::boolean("optIn"));
        let r = validate(&schema, &values(json!({ "rememberMe": "yes", "optIn": 1 })));
        assert_eq!(r.get("rememberMe"), Some("Remember me must be true or false"));
        assert_eq!(r.get("optIn"), Some("optIn must be true or false"));
    }

    #[test]
    fn test_bounds_before_pattern_regardless_of_declaration() {
        let schema = FormSchema::new("t").field(
            FieldSpec::string("digits")
                .rule(Rule::matches(r"^\d+$", "digits only"))
                .rule(Rule::min_length(10, "too short")),
        );
        let r = validate(&schema, &values(json!({ "digits": "12ab" })));
        assert_eq!(r.get("digits"), Some("too short"));

        let r = validate(&schema, &values(json!({ "digits": "12345678ab" })));
        assert_eq!(r.get("digits"), Some("digits only"));
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        let schema = FormSchema::new("t")
            .field(FieldSpec::string("s").rule(Rule::max_length(3, "too long")));
        assert!(validate(&schema, &values(json!({ "s": "äöü" }))).is_valid());
    }

    #[test]
    fn test_rejects_rule() {
        let schema = FormSchema::new("t")
            .field(FieldSpec::string("bio").rule(Rule::rejects(r"<[^>]*>", "no html")));
        assert!(validate(&schema, &values(json!({ "bio": "plain text" }))).is_valid());
        let r = validate(&schema, &values(json!({ "bio": "hi <b>there</b>" })));
        assert_eq!(r.get("bio"), Some("no html"));
    }

    #[test]
    fn test_email_rule() {
        let schema =
            FormSchema::new("t").field(FieldSpec::string("email").rule(Rule::email("bad email")));
        for ok in ["jane@example.com", "j.doe+hr@mail.example.co"] {
            assert!(validate(&schema, &values(json!({ "email": ok }))).is_valid(), "{ok}");
        }
        for bad in ["jane", "jane@", "@example.com", ".jane@example.com", "ja..ne@example.com", "jane@example"] {
            let r = validate(&schema, &values(json!({ "email": bad })));
            assert_eq!(r.get("email"), Some("bad email"), "{bad}");
        }
    }

    #[test]
    fn test_cross_field_equality_attaches_to_confirmation() {
        let schema = FormSchema::new("t")
            .field(FieldSpec::string("password").rule(Rule::min_length(8, "short")))
            .field(
                FieldSpec::string("confirm")
                    .rule(Rule::equals_field("password", "mismatch")),
            );
        let r = validate(
            &schema,
            &values(json!({ "password": "Abc12345!", "confirm": "different" })),
        );
        assert_eq!(r.len(), 1);
        assert_eq!(r.get("confirm"), Some("mismatch"));
        assert_eq!(r.get("password"), None);
    }

    #[test]
    fn test_cross_field_inequality_attaches_to_new_value() {
        let schema = FormSchema::new("t")
            .field(FieldSpec::string("old"))
            .field(FieldSpec::string("new").rule(Rule::differs_from("old", "same")));
        let r = validate(&schema, &values(json!({ "old": "x1", "new": "x1" })));
        assert_eq!(r.fields().collect::<Vec<_>>(), vec!["new"]);
    }

    #[test]
    fn test_result_order_follows_declaration() {
        let schema = FormSchema::new("t")
            .field(FieldSpec::string("b").rule(Rule::required("b required")))
            .field(FieldSpec::string("a").rule(Rule::required("a required")));
        let r = validate(&schema, &values(json!({})));
        assert_eq!(r.fields().collect::<Vec<_>>(), vec!["b", "a"]);
        assert_eq!(
            serde_json::to_string(&r).unwrap(),
            r#"{"b":"b required","a":"a required"}"#
        );
    }

    #[test]
    fn test_validate_is_deterministic() {
        let schema = experience_schema();
        let input = values(json!({ "experience": "51" }));
        let first = validate(&schema, &input);
        for _ in 0..10 {
            assert_eq!(validate(&schema, &input), first);
        }
    }
}
