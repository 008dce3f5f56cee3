use anchor_lang::prelude::*;

pub mod errors;
pub mod instructions;
pub mod state;

use instructions::*;

declare_id!("Fg6PaFpoGXkYsidMpWTK6W2BeZ7FEfcYkg476zPFsLnS");

#[program]
pub mod saturn_fund {
    use super::*;

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
        instructions::initialize::initialize(
            ctx,
            fund_id,
            seed_deposit_lamports,
            mint_fee_bps,
            redeem_fee_bps,
            transfer_fee_bps,
            target_buffer_bps,
            baseline_buffer_bps,
            lp_reward_bps,
            sol_usd_feed,
            oracle_program,
        )
    }

    pub fn configure_allocation(
        ctx: Context<ConfigureAllocation>,
        target_buffer_bps: u16,
        baseline_buffer_bps: u16,
        lp_reward_bps: u16,
        lp_reward_destination: Pubkey,
    ) -> Result<()> {
        instructions::configure_allocation::configure_allocation(
            ctx,
            target_buffer_bps,
            baseline_buffer_bps,
            lp_reward_bps,
            lp_reward_destination,
        )
    }

    pub fn add_holding(
        ctx: Context<AddHolding>,
        weight_bps: u16,
        price_feed: Pubkey,
    ) -> Result<()> {
        instructions::add_holding::add_holding(ctx, weight_bps, price_feed)
    }

    pub fn remove_holding(ctx: Context<RemoveHolding>) -> Result<()> {
        instructions::remove_holding::remove_holding(ctx)
    }

    pub fn mint_shares<'info>(
        ctx: Context<'_, '_, 'info, 'info, MintShares<'info>>,
        amount_lamports: u64,
    ) -> Result<()> {
        instructions::mint_shares::mint_shares(ctx, amount_lamports)
    }

    pub fn redeem_shares<'info>(
        ctx: Context<'_, '_, 'info, 'info, RedeemShares<'info>>,
        shares: u64,
    ) -> Result<()> {
        instructions::redeem_shares::redeem_shares(ctx, shares)
    }

    pub fn rebalance_buffer<'info>(
        ctx: Context<'_, '_, 'info, 'info, RebalanceBuffer<'info>>,
    ) -> Result<()> {
        instructions::rebalance_buffer::rebalance_buffer(ctx)
    }

    pub fn refresh_fund_price<'info>(
        ctx: Context<'_, '_, 'info, 'info, RefreshFundPrice<'info>>,
    ) -> Result<()> {
        instructions::refresh_fund_price::refresh_fund_price(ctx)
    }

    pub fn transfer_with_fee(ctx: Context<TransferWithFee>, amount: u64) -> Result<()> {
        instructions::transfer_with_fee::transfer_with_fee(ctx, amount)
    }

    pub fn collect_lp_rewards(ctx: Context<CollectLpRewards>) -> Result<()> {
        instructions::collect_lp_rewards::collect_lp_rewards(ctx)
    }

    pub fn borrow_reserve<'info>(
        ctx: Context<'_, '_, 'info, 'info, BorrowReserve<'info>>,
        amount_in: u64,
        min_amount_out: u64,
    ) -> Result<()> {
        instructions::borrow_reserve::borrow_reserve(ctx, amount_in, min_amount_out)
    }

    pub fn settle_swap<'info>(
        ctx: Context<'_, '_, 'info, 'info, SettleSwap<'info>>,
    ) -> Result<()> {
        instructions::settle_swap::settle_swap(ctx)
    }
}
