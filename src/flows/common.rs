//! Shared flow state (subdomain, optional parameters, scopes) and execution guards.

// self
use crate::{
	_prelude::*,
	auth::{GrantType, ScopeSet, Subdomain},
	error::{FlowValidationError, TokenFlowError},
	obs::{self, FlowOutcome, FlowSpan},
	service::{ServiceError, TokenResponse},
};

/// Request parameter carrying the space-delimited scope list.
pub const SCOPE_PARAMETER: &str = "scope";

/// Optional request settings available to every flow.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FlowOptions {
	/// Tenant subdomain applied by the token service to the endpoint host.
	pub subdomain: Option<Subdomain>,
	/// Parameters forwarded to the token endpoint verbatim.
	pub optional_parameters: BTreeMap<String, String>,
	/// Requested scopes; sent as [`SCOPE_PARAMETER`] when non-empty.
	pub scopes: ScopeSet,
}
impl FlowOptions {
	/// Builds the parameter map handed to the token service.
	///
	/// Optional parameters are copied unmodified; reserved grant parameter names are not filtered.
	/// A non-empty scope set replaces any caller-supplied `scope` entry.
	pub fn request_parameters(&self) -> BTreeMap<String, String> {
		let mut parameters = self.optional_parameters.clone();

		if !self.scopes.is_empty() {
			parameters.insert(SCOPE_PARAMETER.into(), self.scopes.normalized());
		}

		parameters
	}
}

/// Returns the value of a required field or the validation error naming it.
pub(crate) fn require<'a, T>(
	value: Option<&'a T>,
	field: &'static str,
	grant: GrantType,
) -> Result<&'a T>
where
	T: ?Sized,
{
	value.ok_or_else(|| FlowValidationError::MissingField { field, grant }.into())
}

/// Wraps a token service failure for `grant`.
pub(crate) fn wrap_service_error(grant: GrantType) -> impl FnOnce(ServiceError) -> Error {
	move |source| TokenFlowError::new(grant, source).into()
}

/// Runs one flow execution inside its span while recording attempt and outcome.
pub(crate) async fn instrumented_execute<F>(grant: GrantType, execution: F) -> Result<TokenResponse>
where
	F: Future<Output = Result<TokenResponse>>,
{
	let span = FlowSpan::new(grant, "execute");

	obs::record_flow_outcome(grant, FlowOutcome::Attempt);

	let result = span.instrument(execution).await;

	match &result {
		Ok(_) => obs::record_flow_outcome(grant, FlowOutcome::Success),
		Err(e) => {
			span.record_failure(e);
			obs::record_flow_outcome(grant, FlowOutcome::Failure);
		},
	}

	result
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn scopes_replace_caller_supplied_scope_parameter() {
		let options = FlowOptions {
			subdomain: None,
			optional_parameters: BTreeMap::from([
				("scope".to_owned(), "ignored".to_owned()),
				("grant_type".to_owned(), "custom".to_owned()),
			]),
			scopes: ScopeSet::new(["uaa.user", "openid"]).expect("Scopes should be valid."),
		};
		let parameters = options.request_parameters();

		assert_eq!(parameters.get("scope").map(String::as_str), Some("openid uaa.user"));
		assert_eq!(parameters.get("grant_type").map(String::as_str), Some("custom"));
	}

	#[test]
	fn empty_scopes_leave_parameters_untouched() {
		let options = FlowOptions {
			optional_parameters: BTreeMap::from([("aKey".to_owned(), "aValue".to_owned())]),
			..Default::default()
		};

		assert_eq!(options.request_parameters(), options.optional_parameters);
	}

	#[test]
	fn require_names_the_missing_field() {
		let err = require::<str>(None, "Username", GrantType::Password)
			.expect_err("Missing values must fail.");

		assert!(matches!(
			err,
			Error::FlowValidation(FlowValidationError::MissingField { field: "Username", .. })
		));
		assert_eq!(require(Some("u"), "Username", GrantType::Password).ok(), Some("u"));
	}

	#[tokio::test]
	async fn instrumented_execute_passes_results_through() {
		let response = instrumented_execute(GrantType::ClientCredentials, async {
			Ok(TokenResponse::new("AT", Duration::minutes(1), None))
		})
		.await
		.expect("Successful executions pass through.");

		assert_eq!(response.access_token(), "AT");
	}
}
