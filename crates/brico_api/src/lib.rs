pub mod client;
pub mod services;

pub use client::ApiClient;
pub use services::{
    ArticlesApi, ListingsApi, PaymentsApi, RefundsApi, SettingsApi, UsersApi, WithdrawalsApi,
};

pub mod prelude {
    pub use super::ApiClient;
    pub use brico_core::{Error, Result};
}
