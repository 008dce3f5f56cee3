use anchor_lang::prelude::*;
use anchor_spl::associated_token::AssociatedToken;
use anchor_spl::token::{Mint, Token, TokenAccount};

use crate::errors::ErrorCode;
use crate::state::allocation::Allocation;
use crate::state::fund::FundState;
use crate::state::holding::Holding;

pub fn add_holding(
    ctx: Context<AddHolding>,
    weight_bps: u16,
    price_feed: Pubkey,
) -> Result<()> {
    require!(price_feed != Pubkey::default(), ErrorCode::InvalidOracle);

    ctx.accounts
        .allocation
        .add_holding(ctx.accounts.mint.key(), weight_bps)?;

    let holding = &mut ctx.accounts.holding;
    holding.fund = ctx.accounts.fund_state.key();
    holding.mint = ctx.accounts.mint.key();
    holding.decimals = ctx.accounts.mint.decimals;
    holding.price_feed = price_feed;
    holding.enabled = true;
    holding.bump = ctx.bumps.holding;

    let fund = &mut ctx.accounts.fund_state;
    fund.holding_count = fund
        .holding_count
        .checked_add(1)
        .ok_or(ErrorCode::MathOverflow)?;

    Ok(())
}

#[derive(Accounts)]
pub struct AddHolding<'info> {
    #[account(mut)]
    pub authority: Signer<'info>,
    #[account(
        mut,
        seeds = [b"fund", fund_state.authority.as_ref(), fund_state.fund_id.to_le_bytes().as_ref()],
        bump = fund_state.bump,
        has_one = authority
    )]
    pub fund_state: Account<'info, FundState>,
    #[account(
        mut,
        seeds = [b"allocation", fund_state.key().as_ref()],
        bump = allocation.bump
    )]
    pub allocation: Account<'info, Allocation>,
    pub mint: Account<'info, Mint>,
    #[account(
        init,
        payer = authority,
        space = 8 + Holding::LEN,
        seeds = [b"holding", fund_state.key().as_ref(), mint.key().as_ref()],
        bump
    )]
    pub holding: Account<'info, Holding>,
    // The vault survives a remove/re-add cycle, so tolerate an existing ATA.
    #[account(
        init_if_needed,
        payer = authority,
        associated_token::mint = mint,
        associated_token::authority = fund_state
    )]
    pub holding_vault: Account<'info, TokenAccount>,
    pub system_program: Program<'info, System>,
    pub token_program: Program<'info, Token>,
    pub associated_token_program: Program<'info, AssociatedToken>,
    pub rent: Sysvar<'info, Rent>,
}
