// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//! Built-in roles

use gantry_common::api;
use lazy_static::lazy_static;

#[derive(Clone, Debug)]
pub struct RoleBuiltinConfig {
    pub resource_type: api::external::ResourceType,
    pub role_name: &'static str,
    pub description: &'static str,
}

lazy_static! {
    pub static ref FLEET_ADMIN: RoleBuiltinConfig = RoleBuiltinConfig {
        resource_type: api::external::ResourceType::Fleet,
        role_name: "admin",
        description: "Fleet Administrator",
    };

    pub static ref PROJECT_ADMIN: RoleBuiltinConfig = RoleBuiltinConfig {
        resource_type: api::external::ResourceType::Project,
        role_name: "admin",
        description: "Project Administrator",
    };

    // The "developer" and "guest" roles do not currently confer any label
    // permissions beyond the read access that every client has.  They exist
    // so that project membership short of "admin" can be represented.
    pub static ref PROJECT_DEVELOPER: RoleBuiltinConfig = RoleBuiltinConfig {
        resource_type: api::external::ResourceType::Project,
        role_name: "developer",
        description: "Project Developer",
    };

    pub static ref PROJECT_GUEST: RoleBuiltinConfig = RoleBuiltinConfig {
        resource_type: api::external::ResourceType::Project,
        role_name: "guest",
        description: "Project Guest",
    };

    pub static ref BUILTIN_ROLES: Vec<RoleBuiltinConfig> = vec![
        FLEET_ADMIN.clone(),
        PROJECT_ADMIN.clone(),
        PROJECT_DEVELOPER.clone(),
        PROJECT_GUEST.clone(),
    ];
}
