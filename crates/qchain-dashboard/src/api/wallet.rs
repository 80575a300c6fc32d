//! Wallet connection endpoints.
//!
//! The browser wallet stays client-side; the session only remembers which
//! account and chain it reported.

use std::sync::Arc;

use axum::{Json, extract::State};
use qchain_core::Address;
use qchain_ledger::{WalletSession, format_units};
use tracing::{info, warn};

use crate::auth::CurrentSession;
use crate::dto::{ConnectWalletRequest, WalletStatus};
use crate::error::ApiError;
use crate::state::AppState;

async fn status(state: &AppState, wallet: Option<&WalletSession>) -> WalletStatus {
    let network = &state.config.network;
    let Some(wallet) = wallet else {
        return WalletStatus::disconnected(network);
    };

    let balance = match &state.rpc {
        Some(rpc) => match wallet.balance(rpc).await {
            Ok(wei) => Some(format_units(wei, network.native_currency.decimals)),
            Err(e) => {
                warn!(address = %wallet.address, error = %e, "Balance lookup failed");
                None
            }
        },
        None => None,
    };

    WalletStatus {
        connected: true,
        address: Some(wallet.address.clone()),
        chain_id: Some(wallet.chain_id),
        chain_id_hex: Some(wallet.chain_id_hex()),
        requires_switch: wallet.requires_switch(network),
        balance,
        explorer_url: Some(network.address_url(&wallet.address)),
        ..WalletStatus::disconnected(network)
    }
}

/// GET /api/wallet - Connection status of the caller's wallet.
pub async fn get_wallet(
    State(state): State<Arc<AppState>>,
    current: CurrentSession,
) -> Json<WalletStatus> {
    Json(status(&state, current.session.wallet.as_ref()).await)
}

/// POST /api/wallet - Remember the account and chain reported by the wallet.
pub async fn connect_wallet(
    State(state): State<Arc<AppState>>,
    current: CurrentSession,
    Json(req): Json<ConnectWalletRequest>,
) -> Result<Json<WalletStatus>, ApiError> {
    let address = Address::parse(&req.address)?;
    let wallet = WalletSession::new(address, req.chain_id.value()?);

    if wallet.requires_switch(&state.config.network) {
        info!(
            chain_id = %wallet.chain_id_hex(),
            expected = %state.config.network.chain_id_hex(),
            "Wallet connected on another chain"
        );
    }

    state
        .update_session(&current.token, |s| s.wallet = Some(wallet.clone()))
        .await
        .ok_or_else(|| ApiError::Unauthorized("Session expired or unknown".to_string()))?;

    info!(address = %wallet.address, "Wallet connected");
    Ok(Json(status(&state, Some(&wallet)).await))
}

/// DELETE /api/wallet - Forget the connected wallet.
pub async fn disconnect_wallet(
    State(state): State<Arc<AppState>>,
    current: CurrentSession,
) -> Json<WalletStatus> {
    state
        .update_session(&current.token, |s| s.wallet = None)
        .await;
    Json(WalletStatus::disconnected(&state.config.network))
}
