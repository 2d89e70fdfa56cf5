//! Quota and promo command handlers.

use masal::{Clock, JsonFileStore, MasalResult, QuotaLedger};

/// Print remaining stories and the reset time.
pub fn show_quota(ledger: &QuotaLedger<JsonFileStore>) -> MasalResult<()> {
    let status = ledger.check_quota()?;
    println!("Stories left: {}", (*status.remaining()).max(0));

    let now = ledger.clock().now();
    match (status.reset_time(), status.time_until_reset(now)) {
        (Some(reset), Some(left)) => {
            let minutes = left.as_secs().div_ceil(60);
            println!(
                "Quota resets at {} (in {}h {}m)",
                reset.format("%Y-%m-%d %H:%M UTC"),
                minutes / 60,
                minutes % 60
            );
        }
        _ => println!("No reset pending"),
    }

    if ledger.is_promo_redeemed()? {
        println!("A promo code has been redeemed on this device.");
    }
    Ok(())
}

/// Redeem a promo code and print the outcome.
pub fn redeem_promo(ledger: &QuotaLedger<JsonFileStore>, code: &str) -> MasalResult<()> {
    match ledger.apply_promo(code)? {
        Ok(status) => println!(
            "Promo code accepted. Stories left: {}",
            status.remaining()
        ),
        Err(rejection) => println!("{}", rejection),
    }
    Ok(())
}
