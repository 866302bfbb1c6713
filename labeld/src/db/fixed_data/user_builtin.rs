// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//! Built-in users

use lazy_static::lazy_static;
use uuid::Uuid;

pub struct UserBuiltinConfig {
    pub id: Uuid,
    pub name: &'static str,
    pub description: &'static str,
}

impl UserBuiltinConfig {
    fn new_static(
        id: &str,
        name: &'static str,
        description: &'static str,
    ) -> UserBuiltinConfig {
        UserBuiltinConfig {
            id: id.parse().expect("invalid uuid for builtin user id"),
            name,
            description,
        }
    }
}

lazy_static! {
    /// Internal user used for seeding initial datastore data
    pub static ref USER_DB_INIT: UserBuiltinConfig =
        UserBuiltinConfig::new_static(
            // "0001" is the first possible user that wouldn't be confused with
            // 0, or root.
            "14b31000-05e4-4000-8000-000000000001",
            "db-init",
            "used for seeding initial datastore data",
        );

    /// Test user that's granted all privileges, used for automated testing and
    /// local development
    // TODO-security Once we have a way to configure the initial fleet
    // administrator for a deployment, this user should only exist in test
    // builds.
    pub static ref USER_TEST_PRIVILEGED: UserBuiltinConfig =
        UserBuiltinConfig::new_static(
            // "4007" looks a bit like "root".
            "14b31000-05e4-4000-8000-000000004007",
            "test-privileged",
            "used for testing with all privileges",
        );

    /// Test user that's granted no privileges, used for automated testing
    pub static ref USER_TEST_UNPRIVILEGED: UserBuiltinConfig =
        UserBuiltinConfig::new_static(
            // 60001 is the decimal uid for "nobody" on illumos.
            "14b31000-05e4-4000-8000-000000060001",
            "test-unprivileged",
            "used for testing with no privileges",
        );
}
