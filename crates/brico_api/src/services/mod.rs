//! Thin passthroughs over the admin REST endpoints, one facade per
//! dashboard screen. No local state, no local invariants.

pub mod articles;
pub mod listings;
pub mod payments;
pub mod refunds;
pub mod settings;
pub mod users;
pub mod withdrawals;

pub use articles::ArticlesApi;
pub use listings::ListingsApi;
pub use payments::PaymentsApi;
pub use refunds::RefundsApi;
pub use settings::SettingsApi;
pub use users::UsersApi;
pub use withdrawals::WithdrawalsApi;
