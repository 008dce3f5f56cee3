use anchor_lang::prelude::*;
use anchor_spl::token::{self, Token, TokenAccount, Transfer};

use crate::errors::ErrorCode;
use crate::instructions::mint_shares::fee_split;
use crate::state::fund::FundState;

pub fn transfer_with_fee(ctx: Context<TransferWithFee>, amount: u64) -> Result<()> {
    require!(amount > 0, ErrorCode::InsufficientFunds);
    require!(
        ctx.accounts.from.amount >= amount,
        ErrorCode::InsufficientFunds
    );

    let (fee, amount_after_fee) = fee_split(amount, ctx.accounts.fund_state.transfer_fee_bps)?;

    token::transfer(ctx.accounts.transfer_context(), amount_after_fee)?;
    if fee > 0 {
        token::transfer(ctx.accounts.fee_context(), fee)?;
    }

    Ok(())
}

#[derive(Accounts)]
pub struct TransferWithFee<'info> {
    pub owner: Signer<'info>,
    #[account(
        seeds = [b"fund", fund_state.authority.as_ref(), fund_state.fund_id.to_le_bytes().as_ref()],
        bump = fund_state.bump
    )]
    pub fund_state: Account<'info, FundState>,
    #[account(
        mut,
        constraint = from.owner == owner.key() @ ErrorCode::Unauthorized
    )]
    pub from: Account<'info, TokenAccount>,
    #[account(
        mut,
        constraint = to.mint == from.mint @ ErrorCode::InvalidAccount
    )]
    pub to: Account<'info, TokenAccount>,
    #[account(
        mut,
        constraint = fee_account.mint == from.mint @ ErrorCode::InvalidAccount
    )]
    pub fee_account: Account<'info, TokenAccount>,
    pub token_program: Program<'info, Token>,
}

impl<'info> TransferWithFee<'info> {
    fn transfer_context(&self) -> CpiContext<'_, '_, '_, 'info, Transfer<'info>> {
        CpiContext::new(
            self.token_program.to_account_info(),
            Transfer {
                from: self.from.to_account_info(),
                to: self.to.to_account_info(),
                authority: self.owner.to_account_info(),
            },
        )
    }

    fn fee_context(&self) -> CpiContext<'_, '_, '_, 'info, Transfer<'info>> {
        CpiContext::new(
            self.token_program.to_account_info(),
            Transfer {
                from: self.from.to_account_info(),
                to: self.fee_account.to_account_info(),
                authority: self.owner.to_account_info(),
            },
        )
    }
}
