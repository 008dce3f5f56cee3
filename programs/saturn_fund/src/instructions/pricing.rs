use anchor_lang::prelude::*;
use anchor_spl::associated_token::get_associated_token_address;
use anchor_spl::token::TokenAccount;
use pyth_sdk_solana::state::SolanaPriceAccount;

use crate::errors::ErrorCode;
use crate::state::fund::FundState;
use crate::state::holding::Holding;

const ORACLE_MAX_AGE_SECS: u64 = 60;
const MAX_CONF_BPS: u128 = 200;
const LAMPORTS_PER_SOL: u64 = 1_000_000_000;

pub(crate) struct OraclePrice {
    pub price: i64,
    pub expo: i32,
}

/// Values the whole fund in lamports: both SOL pools plus every registered
/// holding at its oracle price.
///
/// `remaining` layout: empty when the fund has no holdings, otherwise the
/// SOL/USD feed followed by one `(holding, vault, feed)` triple per holding,
/// in ascending mint order. Every account is validated against the fund
/// before any price is read.
pub(crate) fn compute_nav_lamports<'info>(
    program_id: &Pubkey,
    fund_key: Pubkey,
    fund: &FundState,
    reserve_lamports: u64,
    buffer_lamports: u64,
    remaining: &'info [AccountInfo<'info>],
) -> Result<u64> {
    let mut nav = (reserve_lamports as i128)
        .checked_add(buffer_lamports as i128)
        .ok_or(ErrorCode::MathOverflow)?;

    if fund.holding_count == 0 {
        require!(remaining.is_empty(), ErrorCode::InvalidRemainingAccounts);
        require!(nav > 0, ErrorCode::InvalidNav);
        return Ok(nav as u64);
    }

    require!(
        remaining.len() == 1 + 3 * (fund.holding_count as usize),
        ErrorCode::InvalidRemainingAccounts
    );

    let clock = Clock::get()?;
    let sol_feed_info = &remaining[0];
    require!(
        sol_feed_info.key == &fund.sol_usd_feed,
        ErrorCode::InvalidOracle
    );
    require!(
        sol_feed_info.owner == &fund.oracle_program,
        ErrorCode::InvalidOracle
    );
    let sol_price = load_price(sol_feed_info, &clock)?;

    let mut prev_mint: Option<Pubkey> = None;
    for triple in remaining[1..].chunks(3) {
        let holding_info = &triple[0];
        let vault_info = &triple[1];
        let feed_info = &triple[2];

        require!(holding_info.owner == program_id, ErrorCode::InvalidAccount);
        let holding: Account<Holding> = Account::try_from(holding_info)?;
        let (expected_holding, _) = Pubkey::find_program_address(
            &[b"holding", fund_key.as_ref(), holding.mint.as_ref()],
            program_id,
        );
        require!(
            expected_holding == *holding_info.key,
            ErrorCode::InvalidHoldingVault
        );
        require!(holding.fund == fund_key, ErrorCode::InvalidHoldingVault);
        require!(holding.enabled, ErrorCode::InvalidHoldingVault);

        // Strictly ascending mints rule out duplicated triples.
        if let Some(prev) = prev_mint {
            require!(
                prev.to_bytes() < holding.mint.to_bytes(),
                ErrorCode::InvalidRemainingAccounts
            );
        }
        prev_mint = Some(holding.mint);

        let vault: Account<TokenAccount> = Account::try_from(vault_info)?;
        let expected_vault = get_associated_token_address(&fund_key, &holding.mint);
        require!(
            expected_vault == *vault_info.key,
            ErrorCode::InvalidHoldingVault
        );
        require!(vault.owner == fund_key, ErrorCode::InvalidHoldingVault);
        require!(vault.mint == holding.mint, ErrorCode::InvalidHoldingVault);

        require!(
            feed_info.key == &holding.price_feed,
            ErrorCode::InvalidOracle
        );
        require!(
            feed_info.owner == &fund.oracle_program,
            ErrorCode::InvalidOracle
        );
        let token_price = load_price(feed_info, &clock)?;

        let value =
            token_value_in_lamports(vault.amount, holding.decimals, &token_price, &sol_price)?;
        nav = nav
            .checked_add(value as i128)
            .ok_or(ErrorCode::MathOverflow)?;
    }

    require!(nav > 0, ErrorCode::InvalidNav);
    Ok(nav as u64)
}

/// Converts a raw token balance into lamports via its USD price and the
/// SOL/USD price, normalizing the two Pyth exponents and the mint decimals.
pub(crate) fn token_value_in_lamports(
    amount: u64,
    decimals: u8,
    token: &OraclePrice,
    sol: &OraclePrice,
) -> Result<u64> {
    require!(token.price > 0, ErrorCode::InvalidOracle);
    require!(sol.price > 0, ErrorCode::InvalidOracle);

    let mut numerator = (amount as i128)
        .checked_mul(token.price as i128)
        .ok_or(ErrorCode::MathOverflow)?
        .checked_mul(LAMPORTS_PER_SOL as i128)
        .ok_or(ErrorCode::MathOverflow)?;
    let mut denominator = sol.price as i128;

    let exp = token
        .expo
        .checked_sub(decimals as i32)
        .and_then(|v| v.checked_sub(sol.expo))
        .ok_or(ErrorCode::MathOverflow)?;
    if exp >= 0 {
        numerator = numerator
            .checked_mul(pow10_i128(exp as u32)?)
            .ok_or(ErrorCode::MathOverflow)?;
    } else {
        denominator = denominator
            .checked_mul(pow10_i128(exp.unsigned_abs())?)
            .ok_or(ErrorCode::MathOverflow)?;
    }

    require!(denominator > 0, ErrorCode::MathOverflow);
    Ok((numerator / denominator) as u64)
}

fn pow10_i128(exp: u32) -> Result<i128> {
    10i128.checked_pow(exp).ok_or(ErrorCode::MathOverflow.into())
}

pub(crate) fn load_price(feed_info: &AccountInfo, clock: &Clock) -> Result<OraclePrice> {
    let feed = SolanaPriceAccount::account_info_to_feed(feed_info)
        .map_err(|_| ErrorCode::InvalidOracle)?;
    let price = feed
        .get_price_no_older_than(clock.unix_timestamp, ORACLE_MAX_AGE_SECS)
        .ok_or(ErrorCode::StaleOracle)?;
    require!(price.price > 0, ErrorCode::InvalidOracle);

    // conf/price must stay under MAX_CONF_BPS.
    let conf_scaled = (price.conf as u128)
        .checked_mul(10_000)
        .ok_or(ErrorCode::MathOverflow)?;
    let price_scaled = (price.price as u128)
        .checked_mul(MAX_CONF_BPS)
        .ok_or(ErrorCode::MathOverflow)?;
    require!(conf_scaled <= price_scaled, ErrorCode::InvalidOracleConfidence);

    Ok(OraclePrice {
        price: price.price,
        expo: price.expo,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn price(price: i64, expo: i32) -> OraclePrice {
        OraclePrice { price, expo }
    }

    #[test]
    fn token_value_matching_exponents() {
        // 5 tokens (6 decimals) at $2, SOL at $100: worth 0.1 SOL.
        let value = token_value_in_lamports(
            5_000_000,
            6,
            &price(2_00000000, -8),
            &price(100_00000000, -8),
        )
        .unwrap();
        assert_eq!(value, 100_000_000);
    }

    #[test]
    fn token_value_mixed_exponents() {
        // 1 token (9 decimals) at $50 (expo -4), SOL at $200 (expo -8).
        let value = token_value_in_lamports(
            1_000_000_000,
            9,
            &price(50_0000, -4),
            &price(200_00000000, -8),
        )
        .unwrap();
        assert_eq!(value, 250_000_000);
    }

    #[test]
    fn token_value_zero_balance_is_zero() {
        let value =
            token_value_in_lamports(0, 6, &price(3_00000000, -8), &price(150_00000000, -8))
                .unwrap();
        assert_eq!(value, 0);
    }

    #[test]
    fn token_value_rejects_non_positive_prices() {
        assert!(
            token_value_in_lamports(1, 6, &price(0, -8), &price(100_00000000, -8)).is_err()
        );
        assert!(
            token_value_in_lamports(1, 6, &price(-5, -8), &price(100_00000000, -8)).is_err()
        );
        assert!(token_value_in_lamports(1, 6, &price(5, -8), &price(0, -8)).is_err());
    }

    #[test]
    fn pow10_overflows_cleanly() {
        assert!(pow10_i128(38).is_ok());
        assert!(pow10_i128(39).is_err());
    }
}
