use anchor_lang::prelude::*;

/// One registered basket token. The fund holds the token in an associated
/// token account owned by the fund PDA; `price_feed` is the Pyth account used
/// to value it.
#[account]
pub struct Holding {
    pub fund: Pubkey,
    pub mint: Pubkey,
    pub decimals: u8,
    pub price_feed: Pubkey,
    pub enabled: bool,
    pub bump: u8,
}

impl Holding {
    pub const LEN: usize = 32 + 32 + 1 + 32 + 1 + 1;
}
