pub mod auth;
pub mod constants;
pub mod crypto;
pub mod pkcs7;
pub mod verification;
