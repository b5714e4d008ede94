//! Declarative request validation.
//!
//! A [`RuleSet`] lists, per wire field, the [`Rule`]s a request must satisfy.
//! Evaluation never stops early: every field is checked and every failing
//! value rule is reported, in declaration order. The presence rules are the
//! exception: when [`Rule::Required`] or [`Rule::Present`] fails, the
//! remaining rules of that field are skipped so a missing value is reported
//! once rather than once per rule.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

pub mod customer;

pub use customer::CreateCustomerValidator;

/// A single failed rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Violation {
    /// Wire name of the offending field.
    pub field: String,
    /// Human-readable description of the failure.
    pub message: String,
}

impl Violation {
    /// Build a violation for `field`.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Checks a request and reports every rule it breaks.
///
/// Implementations are pure: the same request always yields the same list,
/// and an empty list means the request is valid.
pub trait Validator<R>: Send + Sync {
    /// Validate `request`.
    fn validate(&self, request: &R) -> Vec<Violation>;
}

/// Constraint applied to an optional string field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Value is present and not blank. Gates the other rules of the field.
    Required,
    /// Value is present; blank strings are accepted. Gates the other rules of
    /// the field.
    Present,
    /// Value has at least this many characters.
    MinLength(usize),
    /// Value differs from the given literal.
    NotEqual(&'static str),
    /// Value looks like an email address.
    EmailAddress,
}

impl Rule {
    fn check(self, field: &str, value: &str) -> Option<String> {
        match self {
            Self::Required => value
                .trim()
                .is_empty()
                .then(|| format!("{field} must not be empty")),
            Self::Present => None,
            Self::MinLength(min) => (value.chars().count() < min)
                .then(|| format!("{field} must be at least {min} characters")),
            Self::NotEqual(forbidden) => {
                (value == forbidden).then(|| format!("{field} must not be '{forbidden}'"))
            }
            Self::EmailAddress => (!email_regex().is_match(value))
                .then(|| format!("{field} must be a valid email address")),
        }
    }
}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        // One `@`, a non-empty local part and at least two dot-separated labels.
        let pattern = r"^[^@\s]+@[^@\s.]+(\.[^@\s.]+)+$";
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

type Accessor<R> = fn(&R) -> Option<&str>;

struct FieldRules<R> {
    name: &'static str,
    accessor: Accessor<R>,
    rules: Vec<Rule>,
}

/// Ordered collection of field rules for one request type.
///
/// # Examples
/// ```
/// use customer_service::domain::validation::{Rule, RuleSet, Validator};
///
/// struct Signup {
///     handle: Option<String>,
/// }
///
/// let rules = RuleSet::<Signup>::new().field(
///     "handle",
///     |s: &Signup| s.handle.as_deref(),
///     [Rule::Required, Rule::MinLength(3)],
/// );
/// let violations = rules.validate(&Signup { handle: Some("ab".into()) });
/// assert_eq!(violations.len(), 1);
/// ```
pub struct RuleSet<R> {
    fields: Vec<FieldRules<R>>,
}

impl<R> Default for RuleSet<R> {
    fn default() -> Self {
        Self { fields: Vec::new() }
    }
}

impl<R> RuleSet<R> {
    /// Empty rule set; validates everything.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the rules for one field.
    #[must_use]
    pub fn field(
        mut self,
        name: &'static str,
        accessor: Accessor<R>,
        rules: impl IntoIterator<Item = Rule>,
    ) -> Self {
        self.fields.push(FieldRules {
            name,
            accessor,
            rules: rules.into_iter().collect(),
        });
        self
    }

    fn check_field(field: &FieldRules<R>, request: &R, out: &mut Vec<Violation>) {
        let value = (field.accessor)(request);
        let required = field.rules.contains(&Rule::Required);
        let Some(value) = value else {
            if required {
                out.push(Violation::new(
                    field.name,
                    format!("{} must not be empty", field.name),
                ));
            } else if field.rules.contains(&Rule::Present) {
                out.push(Violation::new(
                    field.name,
                    format!("{} must be provided", field.name),
                ));
            }
            return;
        };

        if required {
            if let Some(message) = Rule::Required.check(field.name, value) {
                out.push(Violation::new(field.name, message));
                return;
            }
        }

        out.extend(
            field
                .rules
                .iter()
                .filter(|rule| !matches!(rule, Rule::Required | Rule::Present))
                .filter_map(|rule| rule.check(field.name, value))
                .map(|message| Violation::new(field.name, message)),
        );
    }
}

impl<R> Validator<R> for RuleSet<R> {
    fn validate(&self, request: &R) -> Vec<Violation> {
        let mut violations = Vec::new();
        for field in &self.fields {
            Self::check_field(field, request, &mut violations);
        }
        violations
    }
}
