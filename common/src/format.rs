//! Display helpers for addresses and chain labels

use crate::bridge_types::chain::UNKNOWN_CHAIN;

/// Shorten an address to `0x1234...5678` form.
///
/// Addresses no longer than `start_len + end_len` characters are returned
/// unchanged; a missing address gives an empty string.
pub fn format_address(address: Option<&str>, start_len: usize, end_len: usize) -> String {
    let Some(address) = address else {
        return String::new();
    };

    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= start_len + end_len {
        return address.to_string();
    }

    let head: String = chars[..start_len].iter().collect();
    let tail: String = chars[chars.len() - end_len..].iter().collect();
    format!("{}...{}", head, tail)
}

/// `format_address` with the usual 6/4 split
pub fn short_address(address: &str) -> String {
    format_address(Some(address), 6, 4)
}

/// First word of a chain label ("Arbitrum Sepolia" -> "Arbitrum")
pub fn short_chain_name(chain_name: Option<&str>) -> String {
    chain_name
        .and_then(|name| name.split_whitespace().next())
        .unwrap_or(UNKNOWN_CHAIN)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_address() {
        let address = "0x1234567890abcdef1234567890abcdef12345678";
        assert_eq!(short_address(address), "0x1234...5678");
        assert_eq!(format_address(Some(address), 4, 2), "0x12...78");
        assert_eq!(format_address(Some("0x1234"), 6, 4), "0x1234");
        assert_eq!(format_address(None, 6, 4), "");
    }

    #[test]
    fn test_short_chain_name() {
        assert_eq!(short_chain_name(Some("Arbitrum Sepolia")), "Arbitrum");
        assert_eq!(short_chain_name(Some("Base")), "Base");
        assert_eq!(short_chain_name(Some("")), "Unknown");
        assert_eq!(short_chain_name(None), "Unknown");
    }
}
