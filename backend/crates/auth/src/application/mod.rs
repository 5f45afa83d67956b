pub mod config;
pub mod current_user;
pub mod onboarding;
pub mod profile;
pub mod refresh_token;
pub mod sign_in;
pub mod sign_up;
