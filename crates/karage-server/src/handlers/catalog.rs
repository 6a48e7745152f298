// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Catalog sync endpoint.

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};

use karage_connections::uom::{CatalogEntity, CatalogKind};
use karage_core::db;
use karage_core::mapping::MappingKind;

use crate::auth::ApiKeyPrincipal;
use crate::error::{ApiError, ApiResult};
use crate::extract::AppJson;
use crate::state::AppState;

use super::required;

/// Request body for catalog sync.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SyncItemRequest {
    /// Catalog item to sync.
    pub item_id: Option<i64>,
}

/// Response body for catalog sync.
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SyncItemResponse {
    /// Synced catalog item.
    pub item_id: i64,
    /// Item kind (unit, supplier, category, product).
    pub kind: String,
    /// ID assigned by the unit-of-measure provider.
    pub external_id: String,
}

fn mapping_kind_for(kind: CatalogKind) -> MappingKind {
    match kind {
        CatalogKind::Unit => MappingKind::Unit,
        CatalogKind::Supplier => MappingKind::Supplier,
        CatalogKind::Category => MappingKind::Category,
        CatalogKind::Product => MappingKind::Product,
    }
}

/// POST /v1/catalog/sync - Register one catalog item with the provider.
///
/// The item's kind column decides which provider collection and which
/// mapping table are used. Replays resolve the existing mapping without a
/// provider call.
pub async fn sync_item(
    State(state): State<AppState>,
    ApiKeyPrincipal(principal): ApiKeyPrincipal,
    AppJson(request): AppJson<SyncItemRequest>,
) -> ApiResult<Json<SyncItemResponse>> {
    let item_id = required(request.item_id, "ItemId")?;

    let item = db::get_item(&state.pool, item_id, principal.location_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("item {}", item_id)))?;

    let kind = CatalogKind::parse(&item.kind)
        .ok_or_else(|| ApiError::Internal(format!("unknown catalog kind: {}", item.kind)))?;

    let entity = CatalogEntity {
        kind,
        reference: item.item_id,
        name: item.name,
        payload: item.payload,
    };

    let uom = state.uom.clone();
    let external_id = state
        .mappings
        .resolve_or_create(
            mapping_kind_for(kind),
            item_id,
            principal.location_id,
            || async move { uom.sync_entity(&entity).await },
        )
        .await?;

    Ok(Json(SyncItemResponse {
        item_id,
        kind: item.kind,
        external_id,
    }))
}
