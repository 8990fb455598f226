//! Transaction scripts.
//!
//! Each script is a named multi-statement operation on [`Store`](crate::db::Store)
//! with all-or-nothing durability. Scripts run inside exactly one
//! [`Store::run_atomic`](crate::db::Store::run_atomic) call.

pub mod email_verification;
pub mod transfer;
pub mod user_registration;

pub use email_verification::{VerifyEmailTxParams, VerifyEmailTxResult};
pub use transfer::{TransferTxParams, TransferTxResult, lock_order};
pub use user_registration::{AfterCreateUser, CreateUserTxResult};
