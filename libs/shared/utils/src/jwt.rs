use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{Duration, TimeZone, Utc};
use hmac::{Hmac, Mac};
use serde_json::json;
use sha2::Sha256;
use tracing::debug;

use shared_models::auth::{JwtClaims, JwtHeader, TokenPair, User};

type HmacSha256 = Hmac<Sha256>;

const ACCESS_TOKEN_MINUTES: i64 = 60;
const REFRESH_TOKEN_HOURS: i64 = 24;

pub fn validate_token(token: &str, jwt_secret: &str) -> Result<User, String> {
    if jwt_secret.is_empty() {
        return Err("JWT secret is not set".to_string());
    }

    // Split token into parts
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return Err("Invalid token format".to_string());
    }

    let header_b64 = parts[0];
    let claims_b64 = parts[1];
    let signature_b64 = parts[2];

    let signature = match URL_SAFE_NO_PAD.decode(signature_b64) {
        Ok(sig) => sig,
        Err(e) => {
            debug!("Failed to decode signature: {}", e);
            return Err("Invalid signature encoding".to_string());
        }
    };

    let signature_string = format!("{}.{}", header_b64, claims_b64);

    let mut mac = match HmacSha256::new_from_slice(jwt_secret.as_bytes()) {
        Ok(m) => m,
        Err(_) => return Err("Failed to create HMAC".to_string()),
    };

    mac.update(signature_string.as_bytes());

    if mac.verify_slice(&signature).is_err() {
        debug!("Token signature verification failed");
        return Err("Invalid token signature".to_string());
    }

    // Decode claims
    let claims_json = match URL_SAFE_NO_PAD.decode(claims_b64) {
        Ok(bytes) => match String::from_utf8(bytes) {
            Ok(json_str) => json_str,
            Err(_) => return Err("Invalid claims encoding".to_string()),
        },
        Err(_) => return Err("Invalid claims encoding".to_string()),
    };

    let claims: JwtClaims = match serde_json::from_str(&claims_json) {
        Ok(c) => c,
        Err(e) => {
            debug!("Failed to parse claims: {}", e);
            return Err("Invalid claims format".to_string());
        }
    };

    // Check expiration
    if let Some(exp) = claims.exp {
        let now = Utc::now().timestamp() as u64;
        if exp < now {
            debug!("Token expired at {} (now: {})", exp, now);
            return Err("Token expired".to_string());
        }
    }

    let created_at = claims
        .iat
        .map(|timestamp| Utc.timestamp_opt(timestamp as i64, 0).single());

    let user = User {
        id: claims.sub,
        username: claims.username,
        email: claims.email,
        role: claims.role,
        created_at: created_at.flatten(),
    };

    debug!("Token validated successfully for user: {}", user.id);
    Ok(user)
}

/// Sign a single HS256 token. `ttl` may be negative, which produces an
/// already-expired token (used by tests).
pub fn issue_token(
    user_id: &str,
    username: &str,
    role: &str,
    token_use: &str,
    jwt_secret: &str,
    ttl: Duration,
) -> String {
    let now = Utc::now();
    let exp = now + ttl;

    let header = JwtHeader {
        alg: "HS256".to_string(),
        typ: "JWT".to_string(),
    };

    let payload = json!({
        "sub": user_id,
        "username": username,
        "role": role,
        "token_use": token_use,
        "iat": now.timestamp(),
        "exp": exp.timestamp()
    });

    let header_encoded =
        URL_SAFE_NO_PAD.encode(serde_json::to_string(&header).expect("header serializes"));
    let payload_encoded = URL_SAFE_NO_PAD.encode(payload.to_string());

    let signing_input = format!("{}.{}", header_encoded, payload_encoded);

    let mut mac = HmacSha256::new_from_slice(jwt_secret.as_bytes())
        .expect("HMAC can take key of any size");
    mac.update(signing_input.as_bytes());
    let signature = mac.finalize().into_bytes();
    let signature_encoded = URL_SAFE_NO_PAD.encode(signature);

    format!("{}.{}", signing_input, signature_encoded)
}

/// Access/refresh pair for a freshly authenticated user.
pub fn issue_token_pair(user_id: &str, username: &str, role: &str, jwt_secret: &str) -> TokenPair {
    TokenPair {
        access: issue_token(
            user_id,
            username,
            role,
            "access",
            jwt_secret,
            Duration::minutes(ACCESS_TOKEN_MINUTES),
        ),
        refresh: issue_token(
            user_id,
            username,
            role,
            "refresh",
            jwt_secret,
            Duration::hours(REFRESH_TOKEN_HOURS),
        ),
    }
}
