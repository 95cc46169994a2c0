//! Provider authentication headers.

use crate::core::builtin_providers::BuiltinProvider;

/// Version header the Messages API requires on every call.
pub const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Attach credentials the way `provider` expects them: `x-api-key` plus a
/// version header for Anthropic, a bearer token for everything else.
pub fn add_auth_headers(
    request: reqwest::RequestBuilder,
    provider: &BuiltinProvider,
    api_key: &str,
) -> reqwest::RequestBuilder {
    if provider.is_anthropic_mode() {
        return request
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_VERSION);
    }
    request.header("Authorization", format!("Bearer {api_key}"))
}
