//! Argument resolution shared by every subcommand.

use stopwise_core::ExclusionRules;

use crate::CliError;

/// Unwrap a merged option, naming both the flag and the environment variable
/// when it is missing.
pub(crate) fn required<T>(
    value: Option<T>,
    field: &'static str,
    env: &'static str,
) -> Result<T, CliError> {
    value.ok_or(CliError::MissingArgument { field, env })
}

/// Build the exclusion predicate from `--protected-id` and
/// `--include-inactive`.
pub(crate) fn exclusion_rules(protected_id: Option<u64>, include_inactive: bool) -> ExclusionRules {
    let rules = protected_id.map_or_else(ExclusionRules::default, |id| {
        ExclusionRules::default().with_protected(id)
    });
    if include_inactive {
        rules.including_inactive()
    } else {
        rules
    }
}
