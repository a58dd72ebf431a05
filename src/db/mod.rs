// SPDX-License-Identifier: MIT

//! Database layer (Firestore).

pub mod firestore;

pub use firestore::FirestoreDb;

/// Collection names as constants.
pub mod collections {
    /// Challenge documents, keyed by user_id
    pub const CHALLENGES: &str = "challenges";
}
