pub mod extractors;
pub mod jwt;
pub mod password;
pub mod refresh_token;
pub mod services;

pub use extractors::{AuthClaims, api_key, bearer_token, verify_api_key};
pub use jwt::JwtManager;
pub use password::PasswordManager;
pub use refresh_token::{IssuedRefreshToken, RefreshTokenLedger};
pub use services::{AuthService, LoginSession, RefreshedSession};
