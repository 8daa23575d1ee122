// SPDX-License-Identifier: Apache-2.0

pub use self::caller::CallerIdentity;
pub use self::errors::Error;
pub use self::itrustanchorstore::ITrustAnchorStore;
pub use self::memo_trustanchorstore::MemoTrustAnchorStore;

mod caller;
mod errors;
mod itrustanchorstore;
mod memo_trustanchorstore;
