pub mod dev;
pub mod home;
pub mod payment;
pub mod users;
pub mod wallet;
