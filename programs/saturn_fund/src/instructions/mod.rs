pub mod add_holding;
pub mod borrow_reserve;
pub mod collect_lp_rewards;
pub mod configure_allocation;
pub mod initialize;
pub mod mint_shares;
pub mod pricing;
pub mod rebalance_buffer;
pub mod redeem_shares;
pub mod refresh_fund_price;
pub mod remove_holding;
pub mod settle_swap;
pub mod transfer_with_fee;

pub use add_holding::*;
pub use borrow_reserve::*;
pub use collect_lp_rewards::*;
pub use configure_allocation::*;
pub use initialize::*;
pub use mint_shares::*;
pub use rebalance_buffer::*;
pub use redeem_shares::*;
pub use refresh_fund_price::*;
pub use remove_holding::*;
pub use settle_swap::*;
pub use transfer_with_fee::*;
