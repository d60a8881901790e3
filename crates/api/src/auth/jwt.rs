//! JWT access-token issuance and validation.
//!
//! Access tokens are HS256-signed JWTs containing a [`Claims`] payload whose
//! `sub` is the user's UUID. Validation pins the HMAC algorithm family and
//! reports the first failing check in a fixed order:
//!
//! 1. algorithm (read from the raw header before any key is touched)
//! 2. signature
//! 3. expiry (`now >= exp`, no leeway)
//! 4. subject
//!
//! so a token that is both wrongly signed and expired always reports the
//! signature failure.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::{parse_or, ConfigError, EnvLookup};

/// Value of the `iss` claim on every token this service mints.
pub const ISSUER: &str = "chirpy";

/// Default (and maximum) access-token lifetime in seconds.
const DEFAULT_TOKEN_TTL_SECS: i64 = 3600;

/// JWT claims embedded in every access token.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Issuer, always [`ISSUER`].
    pub iss: String,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Subject -- the user's id in hyphenated UUID form.
    pub sub: String,
}

/// Reasons a token could not be minted or accepted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    /// Not a three-segment JWS, or a segment failed to decode.
    #[error("token is malformed: {0}")]
    Malformed(String),

    /// The header names an algorithm outside the HMAC family.
    #[error("unexpected signing method: {0}")]
    AlgorithmMismatch(String),

    #[error("token signature is invalid")]
    Signature,

    #[error("token is expired")]
    Expired,

    /// The signed `sub` claim is not a UUID.
    #[error("invalid user id in token: {0}")]
    MalformedSubject(String),

    /// Serialization or signing failed while minting.
    #[error("failed to sign token: {0}")]
    Signing(String),
}

impl TokenError {
    /// `true` for server-side faults; every other variant is an expected
    /// authentication failure.
    pub fn is_internal(&self) -> bool {
        matches!(self, Self::Signing(_))
    }
}

/// Configuration for access-token issuance.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC secret used to sign and verify tokens.
    secret: String,
    /// Default lifetime in seconds, also the upper bound for client-requested
    /// lifetimes. Always at least one second.
    token_ttl_secs: i64,
}

impl JwtConfig {
    /// Load JWT configuration from environment variables.
    ///
    /// | Env Var           | Required | Default |
    /// |-------------------|----------|---------|
    /// | `JWT_SECRET`      | **yes**  | --      |
    /// | `JWT_EXPIRY_SECS` | no       | `3600`  |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(&|var| std::env::var(var).ok())
    }

    /// Same as [`JwtConfig::from_env`] but reading variables through `lookup`.
    pub fn from_lookup(lookup: EnvLookup<'_>) -> Result<Self, ConfigError> {
        let secret = lookup("JWT_SECRET").unwrap_or_default();
        let token_ttl_secs: i64 = parse_or(lookup, "JWT_EXPIRY_SECS", DEFAULT_TOKEN_TTL_SECS)?;
        Self::new(secret, token_ttl_secs)
    }

    /// Build a configuration from an explicit secret and lifetime.
    ///
    /// The secret must be non-empty and the lifetime a positive number of
    /// seconds that `chrono` can represent.
    pub fn new(secret: impl Into<String>, token_ttl_secs: i64) -> Result<Self, ConfigError> {
        let secret = secret.into();
        if secret.is_empty() {
            return Err(ConfigError::Missing("JWT_SECRET"));
        }
        if token_ttl_secs < 1 || Duration::try_seconds(token_ttl_secs).is_none() {
            return Err(ConfigError::Invalid {
                var: "JWT_EXPIRY_SECS",
                value: token_ttl_secs.to_string(),
                reason: "must be a positive number of seconds".to_string(),
            });
        }

        Ok(Self {
            secret,
            token_ttl_secs,
        })
    }

    /// HMAC secret for signing and verifying tokens.
    pub fn secret(&self) -> &str {
        &self.secret
    }

    /// The configured default token lifetime in seconds.
    pub fn token_ttl_secs(&self) -> i64 {
        self.token_ttl_secs
    }

    /// The configured default token lifetime.
    pub fn token_ttl(&self) -> Duration {
        Duration::seconds(self.token_ttl_secs)
    }

    /// Lifetime for a token whose client asked for `requested_secs`.
    ///
    /// Requests are clamped to `1..=token_ttl_secs`; no request means the
    /// default.
    pub fn ttl_for(&self, requested_secs: Option<i64>) -> Duration {
        match requested_secs {
            Some(secs) => Duration::seconds(secs.clamp(1, self.token_ttl_secs)),
            None => self.token_ttl(),
        }
    }
}

/// Mint an HS256 token asserting `subject` for `ttl` from now.
///
/// `ttl` may be zero or negative, yielding a token that is already expired.
pub fn make_jwt(subject: Uuid, signing_secret: &str, ttl: Duration) -> Result<String, TokenError> {
    let issued_at = Utc::now();
    let expires_at = issued_at
        .checked_add_signed(ttl)
        .ok_or_else(|| TokenError::Signing(format!("expiry out of range for ttl {ttl}")))?;

    let claims = Claims {
        iss: ISSUER.to_string(),
        iat: issued_at.timestamp(),
        exp: expires_at.timestamp(),
        sub: subject.to_string(),
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(signing_secret.as_bytes()),
    )
    .map_err(|e| TokenError::Signing(e.to_string()))
}

/// Validate a token minted by [`make_jwt`] and recover its subject.
pub fn validate_jwt(token: &str, signing_secret: &str) -> Result<Uuid, TokenError> {
    // Only the HMAC family is ever accepted, whatever the header claims.
    let algorithm = match header_algorithm(token)?.as_str() {
        "HS256" => Algorithm::HS256,
        "HS384" => Algorithm::HS384,
        "HS512" => Algorithm::HS512,
        other => return Err(TokenError::AlgorithmMismatch(other.to_string())),
    };

    let mut validation = Validation::new(algorithm);
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(signing_secret.as_bytes()),
        &validation,
    )
    .map_err(classify_decode_error)?
    .claims;

    if Utc::now().timestamp() >= claims.exp {
        return Err(TokenError::Expired);
    }

    Uuid::parse_str(&claims.sub).map_err(|_| TokenError::MalformedSubject(claims.sub))
}

#[derive(Deserialize)]
struct RawHeader {
    alg: String,
}

/// Read the `alg` field from the token header without trusting anything else.
fn header_algorithm(token: &str) -> Result<String, TokenError> {
    let mut segments = token.split('.');
    let (Some(header), Some(_), Some(_), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return Err(TokenError::Malformed(
            "expected three dot-separated segments".to_string(),
        ));
    };

    let bytes = URL_SAFE_NO_PAD
        .decode(header)
        .map_err(|e| TokenError::Malformed(format!("header is not base64url: {e}")))?;
    let header: RawHeader = serde_json::from_slice(&bytes)
        .map_err(|e| TokenError::Malformed(format!("header has no usable alg: {e}")))?;
    Ok(header.alg)
}

fn classify_decode_error(err: jsonwebtoken::errors::Error) -> TokenError {
    match err.kind() {
        ErrorKind::InvalidSignature => TokenError::Signature,
        ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => {
            TokenError::AlgorithmMismatch(err.to_string())
        }
        ErrorKind::ExpiredSignature => TokenError::Expired,
        _ => TokenError::Malformed(err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::{json, Value};

    use super::*;

    const SECRET: &str = "supersecretkey";
    const WRONG_SECRET: &str = "wrongsecretkey";

    /// PKCS#8 v1 wrapping of the RFC 8032 test-1 Ed25519 private key.
    const ED25519_PKCS8_DER: [u8; 48] = [
        0x30, 0x2e, 0x02, 0x01, 0x00, 0x30, 0x05, 0x06, 0x03, 0x2b, 0x65, 0x70, 0x04, 0x22,
        0x04, 0x20, 0x9d, 0x61, 0xb1, 0x9d, 0xef, 0xfd, 0x5a, 0x60, 0xba, 0x84, 0x4a, 0xf4,
        0x92, 0xec, 0x2c, 0xc4, 0x44, 0x49, 0xc5, 0x69, 0x7b, 0x32, 0x69, 0x19, 0x70, 0x3b,
        0xac, 0x03, 0x1c, 0xae, 0x7f, 0x60,
    ];

    fn segment(value: &Value) -> String {
        URL_SAFE_NO_PAD.encode(value.to_string())
    }

    fn decode_segment(token: &str, index: usize) -> Value {
        let part = token.split('.').nth(index).expect("segment should exist");
        serde_json::from_slice(&URL_SAFE_NO_PAD.decode(part).unwrap()).unwrap()
    }

    fn claims_expiring_in(sub: &str, secs: i64) -> Claims {
        let now = Utc::now().timestamp();
        Claims {
            iss: ISSUER.to_string(),
            iat: now,
            exp: now + secs,
            sub: sub.to_string(),
        }
    }

    fn sign_hs(algorithm: Algorithm, claims: &Claims, secret: &str) -> String {
        encode(
            &Header::new(algorithm),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .expect("encoding should succeed")
    }

    // -- issuance ------------------------------------------------------------

    #[test]
    fn test_known_subject_round_trips() {
        let subject = Uuid::parse_str("11111111-1111-1111-1111-111111111111").unwrap();
        let token = make_jwt(subject, SECRET, Duration::minutes(1)).unwrap();

        assert_eq!(validate_jwt(&token, SECRET), Ok(subject));
    }

    #[test]
    fn test_random_subjects_round_trip() {
        for _ in 0..8 {
            let subject = Uuid::new_v4();
            let token = make_jwt(subject, SECRET, Duration::hours(1)).unwrap();
            assert_eq!(validate_jwt(&token, SECRET), Ok(subject));
        }
    }

    #[test]
    fn test_claims_and_header_contents() {
        let subject = Uuid::new_v4();
        let token = make_jwt(subject, SECRET, Duration::minutes(1)).unwrap();

        let header = decode_segment(&token, 0);
        assert_eq!(header["alg"], "HS256");

        let claims = decode_segment(&token, 1);
        assert_eq!(claims["iss"], ISSUER);
        assert_eq!(claims["sub"], subject.to_string());
        let iat = claims["iat"].as_i64().unwrap();
        let exp = claims["exp"].as_i64().unwrap();
        assert_eq!(exp - iat, 60);
    }

    // -- expiry --------------------------------------------------------------

    #[test]
    fn test_negative_ttl_is_expired() {
        let token = make_jwt(Uuid::new_v4(), SECRET, -Duration::minutes(1)).unwrap();
        let err = validate_jwt(&token, SECRET).unwrap_err();

        assert_eq!(err, TokenError::Expired);
        assert!(err.to_string().contains("expired"));
    }

    #[test]
    fn test_zero_ttl_is_expired_at_issuance() {
        let token = make_jwt(Uuid::new_v4(), SECRET, Duration::zero()).unwrap();
        assert_eq!(validate_jwt(&token, SECRET), Err(TokenError::Expired));
    }

    #[test]
    fn test_out_of_range_ttl_is_signing_error() {
        let err = make_jwt(Uuid::new_v4(), SECRET, Duration::MAX).unwrap_err();
        assert_matches!(err, TokenError::Signing(_));
        assert!(err.is_internal());
    }

    // -- signature -----------------------------------------------------------

    #[test]
    fn test_wrong_secret_is_signature_error() {
        let token = make_jwt(Uuid::new_v4(), SECRET, Duration::minutes(1)).unwrap();
        let err = validate_jwt(&token, WRONG_SECRET).unwrap_err();

        assert_eq!(err, TokenError::Signature);
        assert!(err.to_string().contains("signature is invalid"));
    }

    #[test]
    fn test_tampered_payload_is_signature_error() {
        let token = make_jwt(Uuid::new_v4(), SECRET, Duration::minutes(1)).unwrap();
        let mut parts: Vec<String> = token.split('.').map(str::to_string).collect();

        let mut claims = decode_segment(&token, 1);
        claims["sub"] = json!(Uuid::new_v4().to_string());
        parts[1] = segment(&claims);

        assert_eq!(validate_jwt(&parts.join("."), SECRET), Err(TokenError::Signature));
    }

    #[test]
    fn test_other_hmac_variants_are_accepted() {
        let subject = Uuid::new_v4();
        for algorithm in [Algorithm::HS384, Algorithm::HS512] {
            let token = sign_hs(algorithm, &claims_expiring_in(&subject.to_string(), 60), SECRET);
            assert_eq!(validate_jwt(&token, SECRET), Ok(subject));
        }
    }

    // -- algorithm pinning ---------------------------------------------------

    #[test]
    fn test_eddsa_signed_token_is_algorithm_mismatch() {
        let claims = claims_expiring_in(&Uuid::new_v4().to_string(), 600);
        let token = encode(
            &Header::new(Algorithm::EdDSA),
            &claims,
            &EncodingKey::from_ed_der(&ED25519_PKCS8_DER),
        )
        .expect("EdDSA signing should succeed");

        assert_eq!(
            validate_jwt(&token, SECRET),
            Err(TokenError::AlgorithmMismatch("EdDSA".to_string()))
        );
    }

    #[test]
    fn test_alg_none_is_algorithm_mismatch() {
        let header = json!({ "alg": "none", "typ": "JWT" });
        let claims = json!(claims_expiring_in(&Uuid::new_v4().to_string(), 600));
        let token = format!("{}.{}.", segment(&header), segment(&claims));

        assert_eq!(
            validate_jwt(&token, SECRET),
            Err(TokenError::AlgorithmMismatch("none".to_string()))
        );
    }

    #[test]
    fn test_algorithm_checked_before_signature() {
        // RS256 header over a bogus signature: the algorithm is what gets reported.
        let header = json!({ "alg": "RS256", "typ": "JWT" });
        let claims = json!(claims_expiring_in(&Uuid::new_v4().to_string(), 600));
        let token = format!("{}.{}.c2lnbmF0dXJl", segment(&header), segment(&claims));

        assert_matches!(validate_jwt(&token, SECRET), Err(TokenError::AlgorithmMismatch(alg)) if alg == "RS256");
    }

    // -- precedence ----------------------------------------------------------

    #[test]
    fn test_signature_checked_before_expiry() {
        let token = make_jwt(Uuid::new_v4(), SECRET, -Duration::minutes(5)).unwrap();
        assert_eq!(validate_jwt(&token, WRONG_SECRET), Err(TokenError::Signature));
    }

    #[test]
    fn test_expiry_checked_before_subject() {
        let token = sign_hs(Algorithm::HS256, &claims_expiring_in("not-a-uuid", -60), SECRET);
        assert_eq!(validate_jwt(&token, SECRET), Err(TokenError::Expired));
    }

    #[test]
    fn test_non_uuid_subject_is_malformed_subject() {
        let token = sign_hs(Algorithm::HS256, &claims_expiring_in("not-a-uuid", 60), SECRET);
        assert_eq!(
            validate_jwt(&token, SECRET),
            Err(TokenError::MalformedSubject("not-a-uuid".to_string()))
        );
    }

    // -- malformed input -----------------------------------------------------

    #[test]
    fn test_garbage_is_malformed() {
        for token in ["", "abc", "a.b", "a.b.c.d", "!!!.e30.sig"] {
            assert_matches!(validate_jwt(token, SECRET), Err(TokenError::Malformed(_)), "{token:?}");
        }
    }

    #[test]
    fn test_signed_claims_missing_fields_are_malformed() {
        #[derive(Serialize)]
        struct Partial {
            sub: String,
        }
        let token = encode(
            &Header::new(Algorithm::HS256),
            &Partial {
                sub: Uuid::new_v4().to_string(),
            },
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert_matches!(validate_jwt(&token, SECRET), Err(TokenError::Malformed(_)));
    }

    #[test]
    fn test_only_signing_is_internal() {
        assert!(TokenError::Signing("x".into()).is_internal());
        assert!(!TokenError::Signature.is_internal());
        assert!(!TokenError::Expired.is_internal());
        assert!(!TokenError::AlgorithmMismatch("RS256".into()).is_internal());
    }

    // -- config --------------------------------------------------------------

    fn config_with_ttl(token_ttl_secs: i64) -> JwtConfig {
        JwtConfig::new(SECRET, token_ttl_secs).unwrap()
    }

    #[test]
    fn test_ttl_for_clamps_requests() {
        let config = config_with_ttl(3600);
        assert_eq!(config.ttl_for(None), Duration::seconds(3600));
        assert_eq!(config.ttl_for(Some(60)), Duration::seconds(60));
        assert_eq!(config.ttl_for(Some(86_400)), Duration::seconds(3600));
        assert_eq!(config.ttl_for(Some(0)), Duration::seconds(1));
        assert_eq!(config.ttl_for(Some(-5)), Duration::seconds(1));
    }

    #[test]
    fn test_config_requires_secret() {
        let err = JwtConfig::from_lookup(&|_| None).unwrap_err();
        assert_matches!(err, ConfigError::Missing("JWT_SECRET"));

        let err = JwtConfig::from_lookup(&|var| (var == "JWT_SECRET").then(String::new)).unwrap_err();
        assert_matches!(err, ConfigError::Missing("JWT_SECRET"));
    }

    #[test]
    fn test_config_defaults_and_overrides() {
        let config =
            JwtConfig::from_lookup(&|var| (var == "JWT_SECRET").then(|| "s3cret".to_string()))
                .unwrap();
        assert_eq!(config.secret(), "s3cret");
        assert_eq!(config.token_ttl(), Duration::seconds(3600));

        let config = JwtConfig::from_lookup(&|var| match var {
            "JWT_SECRET" => Some("s3cret".to_string()),
            "JWT_EXPIRY_SECS" => Some("120".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.token_ttl_secs(), 120);
    }

    #[test]
    fn test_config_rejects_non_positive_ttl() {
        let err = JwtConfig::from_lookup(&|var| match var {
            "JWT_SECRET" => Some("s3cret".to_string()),
            "JWT_EXPIRY_SECS" => Some("0".to_string()),
            _ => None,
        })
        .unwrap_err();
        assert_matches!(err, ConfigError::Invalid { var: "JWT_EXPIRY_SECS", .. });
    }

    #[test]
    fn test_new_rejects_ttls_that_cannot_be_clamped() {
        for ttl in [0, -1, i64::MIN, i64::MAX] {
            let err = JwtConfig::new(SECRET, ttl).unwrap_err();
            assert_matches!(err, ConfigError::Invalid { var: "JWT_EXPIRY_SECS", .. });
        }
        assert_matches!(JwtConfig::new("", 60), Err(ConfigError::Missing("JWT_SECRET")));
    }

    #[test]
    fn test_one_second_ttl_clamps_every_request_to_one() {
        let config = config_with_ttl(1);
        assert_eq!(config.ttl_for(None), Duration::seconds(1));
        assert_eq!(config.ttl_for(Some(3600)), Duration::seconds(1));
        assert_eq!(config.ttl_for(Some(i64::MIN)), Duration::seconds(1));
    }
}
