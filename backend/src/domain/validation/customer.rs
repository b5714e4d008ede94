//! Rules for [`CreateCustomer`].

use super::{Rule, RuleSet, Validator, Violation};
use crate::domain::requests::CreateCustomer;

/// Shortest accepted name or email, in characters.
pub const MIN_LENGTH: usize = 2;

/// Literal rejected in every field.
///
/// It is the value interactive API explorers pre-fill string inputs with.
pub const PLACEHOLDER: &str = "string";

/// Validator for the customer creation command.
///
/// `firstName` and `email` must be non-blank. `lastName` only has to be
/// present, so a blank last name is caught by the length rule alone.
pub struct CreateCustomerValidator {
    rules: RuleSet<CreateCustomer>,
}

impl CreateCustomerValidator {
    /// Build the validator with the customer creation rules.
    #[must_use]
    pub fn new() -> Self {
        let rules = RuleSet::<CreateCustomer>::new()
            .field(
                "firstName",
                |command: &CreateCustomer| command.first_name.as_deref(),
                [
                    Rule::Required,
                    Rule::NotEqual(PLACEHOLDER),
                    Rule::MinLength(MIN_LENGTH),
                ],
            )
            .field(
                "lastName",
                |command: &CreateCustomer| command.last_name.as_deref(),
                [
                    Rule::Present,
                    Rule::NotEqual(PLACEHOLDER),
                    Rule::MinLength(MIN_LENGTH),
                ],
            )
            .field(
                "email",
                |command: &CreateCustomer| command.email.as_deref(),
                [
                    Rule::Required,
                    Rule::EmailAddress,
                    Rule::NotEqual(PLACEHOLDER),
                    Rule::MinLength(MIN_LENGTH),
                ],
            );
        Self { rules }
    }
}

impl Default for CreateCustomerValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator<CreateCustomer> for CreateCustomerValidator {
    fn validate(&self, request: &CreateCustomer) -> Vec<Violation> {
        self.rules.validate(request)
    }
}
