use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
};
use mv_api_types::{UpdateWalletRequest, VerifyWalletRequest, WalletStatusResponse};
use mv_crypto::parse_address;
use tracing::{info, warn};

use crate::{ApiResult, bad_request};

const ADDRESS_MISSING: &str = "Wallet address missing!";
const ADDRESS_INVALID: &str = "Invalid wallet address!";

/// Checks that `address` is a well-formed account address.
pub(crate) async fn verify_wallet(
    request: Result<Json<VerifyWalletRequest>, JsonRejection>,
) -> ApiResult<WalletStatusResponse> {
    let Json(request) = request.map_err(rejected_body)?;
    let address = validated_address(request.address.as_deref())?;

    info!(wallet_address = address, "wallet verified");
    Ok(Json(WalletStatusResponse::success("Wallet verified!")))
}

/// Records the wallet a storefront user just connected.
pub(crate) async fn update_wallet(
    request: Result<Json<UpdateWalletRequest>, JsonRejection>,
) -> ApiResult<WalletStatusResponse> {
    let Json(request) = request.map_err(rejected_body)?;
    let address = validated_address(request.wallet_address.as_deref())?;

    info!(wallet_address = address, "wallet stored");
    Ok(Json(WalletStatusResponse::success("Wallet stored!").with_data(address)))
}

// Clients decode every answer as a status body, so extractor failures get one too.
fn rejected_body(rejection: JsonRejection) -> (StatusCode, Json<WalletStatusResponse>) {
    match rejection {
        JsonRejection::JsonDataError(err) => {
            warn!(error = %err, "wallet address is not a string");
            bad_request(ADDRESS_INVALID)
        }
        other => {
            warn!(error = %other, "unreadable wallet request body");
            (other.status(), Json(WalletStatusResponse::error(&other.body_text())))
        }
    }
}

fn validated_address(address: Option<&str>) -> Result<&str, (StatusCode, Json<WalletStatusResponse>)> {
    let Some(address) = address.filter(|value| !value.is_empty()) else {
        return Err(bad_request(ADDRESS_MISSING));
    };

    if let Err(err) = parse_address(address) {
        warn!(wallet_address = address, error = %err, "rejected wallet address");
        return Err(bad_request(ADDRESS_INVALID));
    }
    Ok(address)
}
