pub mod home;
pub mod payment;
pub mod token;
pub mod users;
pub mod wallet;
