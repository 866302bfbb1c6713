// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Fixed (hardcoded) data that gets loaded into the datastore when labeld
//! starts up

// Here's the convention we use for choosing uuids that we hardcode into
// the system.
//
//   "14b31000-05e4-4000-8000-000000000000"
//    ^^^^^^^^ ^^^^ ^    ^
//        +-----|---|----|-------------------- prefix used for all reserved
//              |   |    |                     uuids  (looks a bit like
//              |   |    |                     "label")
//              +---|----|-------------------- says what kind of resource it
//                  |    |                     is ("05e4" looks like "user")
//                  +----|-------------------- v4
//                       +-------------------- variant 1 (most common for v4)
//
// This way, the uuids stand out a bit.  It's not clear if this convention
// will be very useful, but it beats a random uuid.

pub mod role_builtin;
pub mod user_builtin;

/// Id used for role assignments on the fleet itself
///
/// There is only ever one fleet.  It's not a record in the datastore, so role
/// assignments on it use this well-known id instead.
pub const FLEET_ID: i64 = 0;

#[cfg(test)]
fn assert_valid_uuid(id: &uuid::Uuid) {
    // These are the values we'd always expect from these uuids.
    match id.get_version() {
        Some(uuid::Version::Random) => (),
        _ => panic!("unexpected version in built-in uuid: {:?}", id),
    };

    match id.get_variant() {
        uuid::Variant::RFC4122 => (),
        _ => panic!("unexpected variant in built-in uuid: {:?}", id),
    };
}
