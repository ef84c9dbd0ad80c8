/// Format a satoshi amount as a bitcoin string with 8 decimal places.
///
/// ```
/// assert_eq!(hwsign_common::sats_to_btc(150_000_000), "1.50000000");
/// assert_eq!(hwsign_common::sats_to_btc(1), "0.00000001");
/// ```
pub fn sats_to_btc(sats: u64) -> String {
    format!("{}.{:08}", sats / 100_000_000, sats % 100_000_000)
}

#[cfg(test)]
mod test {
    use super::sats_to_btc;

    #[test]
    fn format_sats() {
        assert_eq!(sats_to_btc(0), "0.00000000");
        assert_eq!(sats_to_btc(100_000_000), "1.00000000");
        assert_eq!(sats_to_btc(123), "0.00000123");
        assert_eq!(sats_to_btc(2_100_000_000_000_000), "21000000.00000000");
    }
}
