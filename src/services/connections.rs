use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{Connection, ConnectionStatus, MessageResponse},
    state::AppState,
};

/// Most connections returned for one user
pub const MAX_CONNECTIONS_LISTED: usize = 100;

/// Opens a pending connection request from one existing user to another.
///
/// Only the ordered pair is unique: B→A may coexist with A→B.
pub async fn create(
    state: &AppState,
    from_user_id: Uuid,
    to_user_id: Uuid,
    message: Option<String>,
) -> AppResult<Connection> {
    let from_user = state.store.find_user(from_user_id).await?;
    let to_user = state.store.find_user(to_user_id).await?;
    if from_user.is_none() || to_user.is_none() {
        return Err(AppError::NotFound("User not found".to_string()));
    }

    if state
        .store
        .find_connection_between(from_user_id, to_user_id)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict("Connection already exists".to_string()));
    }

    let message = message.filter(|m| !m.trim().is_empty());
    let connection = Connection::new(from_user_id, to_user_id, message);
    state.store.insert_connection(&connection).await?;

    tracing::info!(
        connection_id = %connection.id,
        from_user_id = %from_user_id,
        to_user_id = %to_user_id,
        "Connection requested"
    );

    Ok(connection)
}

/// Connections the user sent or received.
pub async fn list_for_user(state: &AppState, user_id: Uuid) -> AppResult<Vec<Connection>> {
    state
        .store
        .connections_for_user(user_id, MAX_CONNECTIONS_LISTED)
        .await
}

/// Accepts or rejects a pending connection. A connection is answered once.
pub async fn respond(
    state: &AppState,
    connection_id: Option<Uuid>,
    status: &str,
) -> AppResult<MessageResponse> {
    let status = ConnectionStatus::parse_response(status)
        .ok_or_else(|| AppError::InvalidInput("Invalid status".to_string()))?;

    let connection = match connection_id {
        Some(id) => state.store.find_connection(id).await?,
        None => None,
    }
    .ok_or_else(|| AppError::NotFound("Connection not found".to_string()))?;

    if connection.status != ConnectionStatus::Pending
        || !state
            .store
            .update_connection_status(connection.id, status)
            .await?
    {
        return Err(AppError::Conflict(
            "Connection has already been answered".to_string(),
        ));
    }

    tracing::info!(connection_id = %connection.id, status = %status, "Connection answered");

    Ok(MessageResponse {
        message: format!("Connection {}", status),
    })
}
