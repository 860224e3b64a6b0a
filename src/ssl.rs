use serde::{Deserialize, Serialize};

/// The SSL certificate bundle Porkbun issues for a domain.
///
/// All parts are PEM text exactly as the API returns them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SslBundle {
    #[serde(rename = "certificatechain")]
    pub certificate_chain: String,
    #[serde(rename = "privatekey")]
    pub private_key: String,
    #[serde(rename = "publickey")]
    pub public_key: String,
}
