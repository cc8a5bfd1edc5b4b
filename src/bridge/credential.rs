use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine as _;
use serde::Deserialize;

use crate::errors::AuthError;
use crate::models::Identity;

/// Query parameter carrying a credential back from a redirect sign-in.
pub const CREDENTIAL_PARAM: &str = "credential";

const LENIENT: GeneralPurposeConfig =
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent);
const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(&alphabet::URL_SAFE, LENIENT);
const STANDARD_LENIENT: GeneralPurpose = GeneralPurpose::new(&alphabet::STANDARD, LENIENT);

/// The claims we read from the credential payload. Anything else is ignored.
#[derive(Deserialize, Debug)]
struct Claims {
    sub: String,
    name: String,
    email: String,
    #[serde(default)]
    picture: Option<String>,
}

/// Decodes the payload segment of a provider credential into an [`Identity`].
///
/// The signature is not verified: the token is only used to display who is
/// signed in and to address submitted leads.
pub fn decode_credential(raw_token: &str) -> Result<Identity, AuthError> {
    let segments: Vec<&str> = raw_token.split('.').collect();
    if segments.len() != 3 {
        return Err(AuthError::MalformedCredential(format!(
            "expected 3 segments, found {}",
            segments.len()
        )));
    }

    let payload = segments[1];
    let bytes = URL_SAFE_LENIENT
        .decode(payload)
        .or_else(|_| STANDARD_LENIENT.decode(payload))
        .map_err(|e| AuthError::MalformedCredential(format!("payload is not base64: {}", e)))?;

    let claims: Claims = serde_json::from_slice(&bytes)
        .map_err(|e| AuthError::MalformedCredential(format!("payload is not valid claims: {}", e)))?;

    Ok(Identity::new(claims.sub, claims.name, claims.email, claims.picture))
}
