/*
 * Responsibility
 * - handler 向けの extractor を束ねる
 */
pub mod current_user;
pub mod request_args;

pub use current_user::{AuthUser, CurrentUser};
