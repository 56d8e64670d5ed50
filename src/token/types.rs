use serde::{Deserialize, Serialize};

/// Response body of `GET /token`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TokenResponse {
    pub identity: String,
    pub token: String,
}

/// Optional query parameters of `GET /token`
#[derive(Debug, Default, Deserialize)]
pub struct TokenQuery {
    pub room: Option<String>,
}

/// Grant allowing the bearer to use the video service
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct VideoGrant {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Grants {
    pub identity: String,
    pub video: VideoGrant,
}

/// JWT claims of an access token
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AccessClaims {
    pub jti: String,
    pub iss: String, // API key sid
    pub sub: String, // Account sid
    pub iat: usize,
    pub exp: usize,
    pub grants: Grants,
}
