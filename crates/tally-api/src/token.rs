use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use tally_types::api::Claims;

/// Tokens are valid for 7 days from issuance. Verification is pure and
/// stateless — there is no revocation list, so logout is client-side token
/// deletion and an issued token stays valid until expiry. Known, accepted
/// weak point of the design.
const TOKEN_TTL_DAYS: i64 = 7;

pub fn issue(
    secret: &str,
    user_id: Uuid,
    username: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    let claims = Claims {
        sub: user_id,
        username: username.to_string(),
        exp: (chrono::Utc::now() + chrono::Duration::days(TOKEN_TTL_DAYS)).timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

pub fn verify(secret: &str, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn issue_then_verify_round_trips() {
        let user_id = Uuid::new_v4();
        let token = issue(SECRET, user_id, "alice").unwrap();

        let claims = verify(SECRET, &token).unwrap();
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.username, "alice");
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = issue(SECRET, Uuid::new_v4(), "alice").unwrap();
        assert!(verify("other-secret", &token).is_err());
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(verify(SECRET, "not-a-token").is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        // Issue a token that expired well past the default validation leeway.
        let claims = Claims {
            sub: Uuid::new_v4(),
            username: "alice".into(),
            exp: (chrono::Utc::now() - chrono::Duration::hours(1)).timestamp() as usize,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert!(verify(SECRET, &token).is_err());
    }
}
