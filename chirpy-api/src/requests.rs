use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Body of `POST /api/users` and `PUT /api/users`.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CredentialsRequest {
    pub email: String,
    pub password: String, // Plain text
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct LoginRequest {
    pub email: String,
    pub password: String, // Plain text
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ValidateChirpRequest {
    pub body: String,
}

/// Body of `POST /api/polka/webhooks`, sent by the Polka payment provider.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct PolkaWebhookRequest {
    pub event: String,
    #[serde(default)]
    pub data: PolkaWebhookData,
}

/// `user_id` reste brut : seul `user.upgraded` l'exige, et sous forme d'UUID.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct PolkaWebhookData {
    #[serde(default)]
    pub user_id: Option<String>,
}

pub const USER_UPGRADED_EVENT: &str = "user.upgraded";

impl PolkaWebhookRequest {
    pub fn is_user_upgraded(&self) -> bool {
        self.event == USER_UPGRADED_EVENT
    }

    /// `None` si l'identifiant est absent ou n'est pas un UUID
    pub fn user_id(&self) -> Option<Uuid> {
        self.data.user_id.as_deref()?.parse().ok()
    }
}
