use serde::{Deserialize, Serialize};

pub const STATUS_SUCCESS: &str = "success";
pub const STATUS_ERROR: &str = "error";

/// Body of `POST /update_wallet`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateWalletRequest {
    #[serde(default)]
    pub wallet_address: Option<String>,
}

/// Body of `POST /verify_wallet`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct VerifyWalletRequest {
    #[serde(default)]
    pub address: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WalletData {
    pub wallet_address: String,
}

/// Response shape shared by both wallet endpoints, success or not.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WalletStatusResponse {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<WalletData>,
}

impl WalletStatusResponse {
    pub fn success(message: &str) -> Self {
        Self {
            status: STATUS_SUCCESS.to_owned(),
            message: Some(message.to_owned()),
            data: None,
        }
    }

    pub fn error(message: &str) -> Self {
        Self {
            status: STATUS_ERROR.to_owned(),
            message: Some(message.to_owned()),
            data: None,
        }
    }

    pub fn with_data(mut self, wallet_address: &str) -> Self {
        self.data = Some(WalletData {
            wallet_address: wallet_address.to_owned(),
        });
        self
    }

    pub fn is_success(&self) -> bool {
        self.status == STATUS_SUCCESS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_deserialize_as_none() {
        let update: UpdateWalletRequest = serde_json::from_str("{}").unwrap();
        assert!(update.wallet_address.is_none());

        let verify: VerifyWalletRequest = serde_json::from_str(r#"{"address":"0xab"}"#).unwrap();
        assert_eq!(verify.address.as_deref(), Some("0xab"));
    }

    #[test]
    fn only_literal_success_counts_as_success() {
        let ok: WalletStatusResponse =
            serde_json::from_str(r#"{"status":"success","message":"Wallet verified!"}"#).unwrap();
        assert!(ok.is_success());

        let other: WalletStatusResponse = serde_json::from_str(r#"{"status":"SUCCESS"}"#).unwrap();
        assert!(!other.is_success());
        assert!(other.message.is_none());
    }

    #[test]
    fn data_is_omitted_when_absent() {
        let body = serde_json::to_value(WalletStatusResponse::error("Wallet address missing!")).unwrap();
        assert!(body.get("data").is_none());

        let body = serde_json::to_value(WalletStatusResponse::success("Wallet stored!").with_data("0xab")).unwrap();
        assert_eq!(body["data"]["wallet_address"], "0xab");
    }
}
