//! Contract information endpoint.

use std::sync::Arc;

use axum::{Json, extract::State};

use crate::dto::ContractResponse;
use crate::state::AppState;

/// GET /api/contract - Where jobs are logged.
pub async fn contract_info(State(state): State<Arc<AppState>>) -> Json<ContractResponse> {
    let network = &state.config.network;
    Json(ContractResponse {
        address: network.contract_address.clone(),
        chain_id: network.chain_id,
        chain_id_hex: network.chain_id_hex(),
        chain_name: network.chain_name.clone(),
        rpc_url: network.rpc_url.clone(),
        explorer_url: network.explorer_url.clone(),
        contract_url: network.address_url(&network.contract_address),
        native_currency: network.native_currency.clone(),
        query_mode: state.config.ledger.query_mode.to_string(),
    })
}
