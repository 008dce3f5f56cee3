use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, TokenAccount};

use crate::errors::ErrorCode;
use crate::state::allocation::Allocation;
use crate::state::fund::FundState;
use crate::state::holding::Holding;

pub fn remove_holding(ctx: Context<RemoveHolding>) -> Result<()> {
    require!(
        ctx.accounts.holding_vault.amount == 0,
        ErrorCode::HoldingVaultNotEmpty
    );

    ctx.accounts
        .allocation
        .remove_holding(ctx.accounts.mint.key())?;

    let fund = &mut ctx.accounts.fund_state;
    fund.holding_count = fund
        .holding_count
        .checked_sub(1)
        .ok_or(ErrorCode::MathOverflow)?;

    Ok(())
}

#[derive(Accounts)]
pub struct RemoveHolding<'info> {
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
        mut,
        close = authority,
        seeds = [b"holding", fund_state.key().as_ref(), mint.key().as_ref()],
        bump = holding.bump,
        constraint = holding.fund == fund_state.key() @ ErrorCode::InvalidHoldingVault
    )]
    pub holding: Account<'info, Holding>,
    #[account(
        associated_token::mint = mint,
        associated_token::authority = fund_state
    )]
    pub holding_vault: Account<'info, TokenAccount>,
}
