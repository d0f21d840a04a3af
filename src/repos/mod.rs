/*
 * Responsibility
 * - SQLx を使った永続化層 (users, wallet_transactions)
 */
pub mod error;
pub mod user_repo;
pub mod wallet_repo;
