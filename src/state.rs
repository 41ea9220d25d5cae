// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::auth::TokenService;
use crate::storage::FileStorage;

#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<FileStorage>,
    pub tokens: Arc<TokenService>,
}

impl AppState {
    pub fn new(storage: FileStorage, tokens: TokenService) -> Self {
        Self {
            storage: Arc::new(storage),
            tokens: Arc::new(tokens),
        }
    }
}
