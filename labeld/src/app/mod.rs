// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Labeld, the service that manages labels for a Gantry registry

use crate::authn;
use crate::authz;
use crate::context::OpContext;
use crate::db;
use crate::db::fixed_data::role_builtin::FLEET_ADMIN;
use crate::db::fixed_data::user_builtin::USER_TEST_PRIVILEGED;
use crate::db::fixed_data::FLEET_ID;
use gantry_common::api::external::Error;
use gantry_common::api::external::InternalContext;
use gantry_common::api::external::ResourceType;
use slog::Logger;
use std::sync::Arc;
use uuid::Uuid;

mod label;
mod project;

/// Manages labels for a Gantry registry -- the heart of the service
pub struct Labeld {
    /// uuid for this labeld instance.
    id: Uuid,

    /// general server log
    log: Logger,

    /// storage for labels and the resources they hang off of
    db_datastore: Arc<db::DataStore>,

    /// handle to global authz information
    authz: Arc<authz::Authz>,
}

impl Labeld {
    /// Create a new Labeld instance with the given instance id
    pub fn new_with_id(id: Uuid, log: Logger) -> Arc<Labeld> {
        let db_datastore = Arc::new(db::DataStore::new());
        let authz = Arc::new(authz::Authz::new());
        Arc::new(Labeld { id, log, db_datastore, authz })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn datastore(&self) -> &Arc<db::DataStore> {
        &self.db_datastore
    }

    pub fn authz(&self) -> &Arc<authz::Authz> {
        &self.authz
    }

    /// Load the built-in role assignments into the datastore
    ///
    /// This must run before the server accepts requests.  It runs as the
    /// "db-init" user, the only actor allowed to grant roles while the
    /// role table is still empty.
    pub async fn load_builtin_data(&self) -> Result<(), Error> {
        let opctx = OpContext::for_background(
            self.log.new(o!("component" => "DataLoader")),
            Arc::clone(&self.authz),
            authn::Context::internal_db_init(),
            Arc::clone(&self.db_datastore),
        );

        // The built-in "test-privileged" user gets the "fleet admin" role.
        debug!(opctx.log, "attempting to create built-in role assignments");
        self.db_datastore
            .role_grant(
                &opctx,
                USER_TEST_PRIVILEGED.id,
                ResourceType::Fleet,
                FLEET_ID,
                FLEET_ADMIN.role_name,
            )
            .await
            .internal_context("creating built-in role assignments")?;
        info!(opctx.log, "created built-in role assignments");
        Ok(())
    }
}
