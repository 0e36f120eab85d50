// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::{
    auth::{AuthService, SessionIssuer},
    chain::ChainGateway,
    config::AppConfig,
    services::DomainServices,
    storage::RelayDatabase,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub db: Arc<RelayDatabase>,
    pub sessions: Arc<SessionIssuer>,
    pub auth: Arc<AuthService>,
    pub gateway: Arc<ChainGateway>,
    pub services: Arc<DomainServices>,
}

impl AppState {
    pub fn new(config: AppConfig, db: RelayDatabase, gateway: ChainGateway) -> Self {
        let db = Arc::new(db);
        let sessions = Arc::new(SessionIssuer::new(&config.jwt_secret, config.jwt_ttl));
        let auth = Arc::new(AuthService::new(
            Arc::clone(&db),
            Arc::clone(&sessions),
            config.nonce_ttl,
            config.login_domain.clone(),
        ));
        let gateway = Arc::new(gateway);
        let services = Arc::new(DomainServices::new(Arc::clone(&gateway)));

        Self {
            config: Arc::new(config),
            db,
            sessions,
            auth,
            gateway,
            services,
        }
    }
}

/// State backed by a temporary database and a gateway that never reaches
/// the network.
#[cfg(test)]
pub(crate) fn test_state() -> (AppState, tempfile::TempDir) {
    use crate::chain::gateway::testing::{credential, gateway, Behaviour, MockSubmitter};

    test_state_with(gateway(
        MockSubmitter::new(Behaviour::Confirm { logs: Vec::new() }),
        Some(credential()),
    ))
}

#[cfg(test)]
pub(crate) fn test_state_with(gateway: ChainGateway) -> (AppState, tempfile::TempDir) {
    let (db, dir) = crate::storage::database::temp_db();
    let config = AppConfig::from_lookup(|_| None).unwrap();
    (AppState::new(config, db, gateway), dir)
}
