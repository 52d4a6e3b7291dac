use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Valeur fixe du claim `iss`
pub const ISSUER: &str = "chirpy";

#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    #[error("Token generation failed: {0}")]
    GenerationFailed(jsonwebtoken::errors::Error),
    #[error("Token is malformed")]
    Malformed,
    #[error("Token signature is invalid")]
    SignatureInvalid,
    #[error("Token has expired")]
    Expired,
    #[error("Token subject is not a valid user id")]
    SubjectInvalid,
}

impl From<jsonwebtoken::errors::Error> for JwtError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => JwtError::SignatureInvalid,
            ErrorKind::ExpiredSignature => JwtError::Expired,
            // Structure, encodage, claims requis, issuer, nbf
            _ => JwtError::Malformed,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,
    pub iat: i64,
    pub nbf: i64,
    pub exp: i64,
    pub iss: String,
    pub jti: String,
}

/// Émet et vérifie les access tokens (HS256, clé symétrique du serveur).
///
/// Les tokens sont sans état : impossibles à révoquer avant `exp`, d'où une durée courte.
#[derive(Clone)]
pub struct JwtManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    access_token_ttl: Duration,
}

impl JwtManager {
    pub fn new(secret: &str, access_token_ttl: Duration) -> Self {
        // Seule la famille HMAC est acceptée, quel que soit l'`alg` annoncé
        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = vec![Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];
        validation.leeway = 0;
        validation.validate_nbf = true;
        validation.set_issuer(&[ISSUER]);
        validation.set_required_spec_claims(&["exp", "nbf", "iat", "iss", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            access_token_ttl,
        }
    }

    /// Génère un access token avec la durée configurée
    pub fn generate_access_token(&self, user_id: Uuid) -> Result<String, JwtError> {
        self.issue(user_id, self.access_token_ttl)
    }

    pub fn issue(&self, user_id: Uuid, ttl: Duration) -> Result<String, JwtError> {
        let now = Utc::now();

        let claims = Claims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            nbf: now.timestamp(),
            exp: (now + ttl).timestamp(),
            iss: ISSUER.to_string(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(JwtError::GenerationFailed)
    }

    /// Retourne uniquement le sujet ; aucun autre claim n'est exposé
    pub fn verify(&self, token: &str) -> Result<Uuid, JwtError> {
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(JwtError::from)?;

        Uuid::parse_str(&claims.sub).map_err(|_| JwtError::SubjectInvalid)
    }
}
