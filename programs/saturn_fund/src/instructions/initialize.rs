use anchor_lang::prelude::*;
use anchor_spl::associated_token::AssociatedToken;
use anchor_spl::token::{mint_to, Mint, MintTo, Token, TokenAccount};

use crate::errors::ErrorCode;
use crate::state::allocation::{Allocation, BPS_DENOMINATOR};
use crate::state::fund::{FundState, LamportVault};

#[allow(clippy::too_many_arguments)]
pub fn initialize(
    ctx: Context<Initialize>,
    fund_id: u64,
    seed_deposit_lamports: u64,
    mint_fee_bps: u16,
    redeem_fee_bps: u16,
    transfer_fee_bps: u16,
    target_buffer_bps: u16,
    baseline_buffer_bps: u16,
    lp_reward_bps: u16,
    sol_usd_feed: Pubkey,
    oracle_program: Pubkey,
) -> Result<()> {
    require!(
        (mint_fee_bps as u64) <= BPS_DENOMINATOR,
        ErrorCode::InvalidFeeBps
    );
    require!(
        (redeem_fee_bps as u64) <= BPS_DENOMINATOR,
        ErrorCode::InvalidFeeBps
    );
    require!(
        (transfer_fee_bps as u64) <= BPS_DENOMINATOR,
        ErrorCode::InvalidFeeBps
    );
    Allocation::validate_bands(target_buffer_bps, baseline_buffer_bps, lp_reward_bps)?;
    require!(seed_deposit_lamports > 0, ErrorCode::ZeroShares);
    require!(sol_usd_feed != Pubkey::default(), ErrorCode::InvalidOracle);
    require!(oracle_program != Pubkey::default(), ErrorCode::InvalidOracle);

    let authority_key = ctx.accounts.authority.key();
    let fund = &mut ctx.accounts.fund_state;
    fund.initialize(authority_key)?;
    fund.fund_id = fund_id;
    fund.share_mint = ctx.accounts.share_mint.key();
    fund.reserve_vault = ctx.accounts.reserve_vault.key();
    fund.buffer_vault = ctx.accounts.buffer_vault.key();
    fund.fee_treasury = ctx.accounts.fee_treasury.key();
    fund.sol_usd_feed = sol_usd_feed;
    fund.oracle_program = oracle_program;
    fund.mint_fee_bps = mint_fee_bps;
    fund.redeem_fee_bps = redeem_fee_bps;
    fund.transfer_fee_bps = transfer_fee_bps;
    fund.total_shares = seed_deposit_lamports;
    fund.holding_count = 0;
    fund.bump = ctx.bumps.fund_state;
    fund.share_mint_bump = ctx.bumps.share_mint;
    fund.reserve_bump = ctx.bumps.reserve_vault;
    fund.buffer_bump = ctx.bumps.buffer_vault;

    let allocation = &mut ctx.accounts.allocation;
    allocation.fund = ctx.accounts.fund_state.key();
    allocation.holding_count = 0;
    allocation.target_buffer_bps = target_buffer_bps;
    allocation.baseline_buffer_bps = baseline_buffer_bps;
    allocation.lp_reward_bps = lp_reward_bps;
    allocation.lp_reward_destination = Pubkey::default();
    allocation.bump = ctx.bumps.allocation;

    // Seed deposit backs the first shares 1:1, so NAV and supply are both
    // positive from the very first block.
    let transfer_ctx = CpiContext::new(
        ctx.accounts.system_program.to_account_info(),
        anchor_lang::system_program::Transfer {
            from: ctx.accounts.authority.to_account_info(),
            to: ctx.accounts.reserve_vault.to_account_info(),
        },
    );
    anchor_lang::system_program::transfer(transfer_ctx, seed_deposit_lamports)?;

    let fund_id_bytes = fund_id.to_le_bytes();
    let signer_seeds: &[&[u8]] = &[
        b"fund",
        authority_key.as_ref(),
        fund_id_bytes.as_ref(),
        &[ctx.accounts.fund_state.bump],
    ];
    let signer_seeds_set = [signer_seeds];
    let mint_ctx = CpiContext::new_with_signer(
        ctx.accounts.token_program.to_account_info(),
        MintTo {
            mint: ctx.accounts.share_mint.to_account_info(),
            to: ctx.accounts.authority_share_account.to_account_info(),
            authority: ctx.accounts.fund_state.to_account_info(),
        },
        &signer_seeds_set,
    );
    mint_to(mint_ctx, seed_deposit_lamports)?;

    msg!(
        "fund {} initialized, authority {}",
        fund_id,
        authority_key
    );

    Ok(())
}

#[derive(Accounts)]
#[instruction(fund_id: u64)]
pub struct Initialize<'info> {
    #[account(mut)]
    pub authority: Signer<'info>,
    #[account(
        init,
        payer = authority,
        space = 8 + FundState::LEN,
        seeds = [b"fund", authority.key().as_ref(), fund_id.to_le_bytes().as_ref()],
        bump
    )]
    pub fund_state: Account<'info, FundState>,
    #[account(
        init,
        payer = authority,
        mint::decimals = 9,
        mint::authority = fund_state,
        seeds = [b"shares", fund_state.key().as_ref()],
        bump
    )]
    pub share_mint: Account<'info, Mint>,
    #[account(
        init,
        payer = authority,
        associated_token::mint = share_mint,
        associated_token::authority = authority
    )]
    pub authority_share_account: Account<'info, TokenAccount>,
    #[account(
        init,
        payer = authority,
        space = 8,
        seeds = [b"reserve", fund_state.key().as_ref()],
        bump
    )]
    pub reserve_vault: Account<'info, LamportVault>,
    #[account(
        init,
        payer = authority,
        space = 8,
        seeds = [b"buffer", fund_state.key().as_ref()],
        bump
    )]
    pub buffer_vault: Account<'info, LamportVault>,
    #[account(
        init,
        payer = authority,
        space = 8 + Allocation::LEN,
        seeds = [b"allocation", fund_state.key().as_ref()],
        bump
    )]
    pub allocation: Account<'info, Allocation>,
    pub fee_treasury: SystemAccount<'info>,
    pub system_program: Program<'info, System>,
    pub token_program: Program<'info, Token>,
    pub associated_token_program: Program<'info, AssociatedToken>,
    pub rent: Sysvar<'info, Rent>,
}
