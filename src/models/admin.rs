use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdminLoginRequest {
    #[serde(default)]
    pub password: String,
}
