use serde_json::{Map, Value};

/// eUSD is tracked in millionths on both chains.
pub const EUSD_DECIMALS: u32 = 6;

pub fn format_token_amount(amount: u128, decimals: u32) -> String {
	if decimals == 0 {
		return amount.to_string();
	}
	let scale = 10u128.pow(decimals);
	format!(
		"{}.{:0width$}",
		amount / scale,
		amount % scale,
		width = decimals as usize
	)
}

/// Convert a camelCase key to snake_case. Keys that are already snake_case
/// come back unchanged.
pub fn camel_to_snake(key: &str) -> String {
	let mut out = String::with_capacity(key.len() + 4);
	for (i, c) in key.char_indices() {
		if c.is_ascii_uppercase() {
			if i > 0 {
				out.push('_');
			}
			out.push(c.to_ascii_lowercase());
		} else {
			out.push(c);
		}
	}
	out
}

/// Convert a snake_case key to camelCase.
pub fn snake_to_camel(key: &str) -> String {
	let mut out = String::with_capacity(key.len());
	let mut upper_next = false;
	for c in key.chars() {
		if c == '_' {
			upper_next = true;
		} else if upper_next {
			out.push(c.to_ascii_uppercase());
			upper_next = false;
		} else {
			out.push(c);
		}
	}
	out
}

/// Recursively rewrite every object key in `value` to snake_case.
pub fn normalize_keys(value: Value) -> Value {
	match value {
		Value::Object(map) => Value::Object(
			map.into_iter()
				.map(|(k, v)| (camel_to_snake(&k), normalize_keys(v)))
				.collect::<Map<String, Value>>(),
		),
		Value::Array(items) => Value::Array(items.into_iter().map(normalize_keys).collect()),
		other => other,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn test_format_token_amount() {
		assert_eq!(format_token_amount(100_000_000_000, EUSD_DECIMALS), "100000.000000");
		assert_eq!(format_token_amount(1_500_000, EUSD_DECIMALS), "1.500000");
		assert_eq!(format_token_amount(42, EUSD_DECIMALS), "0.000042");
		assert_eq!(format_token_amount(42, 0), "42");
	}

	#[test]
	fn test_key_case_conversion() {
		assert_eq!(camel_to_snake("mcTxOutPublicKeyHex"), "mc_tx_out_public_key_hex");
		assert_eq!(camel_to_snake("recipientB58Addr"), "recipient_b58_addr");
		assert_eq!(camel_to_snake("block_index"), "block_index");
		assert_eq!(snake_to_camel("mint_config_id"), "mintConfigId");
		assert_eq!(snake_to_camel("audited"), "audited");
	}

	#[test]
	fn test_normalize_keys_is_recursive() {
		let raw = json!({
			"audited": { "mintTxId": 1 },
			"mint": { "blockTimestamp": "2023-02-26", "protobuf": [1, 2] }
		});
		let normalized = normalize_keys(raw);
		assert_eq!(
			normalized,
			json!({
				"audited": { "mint_tx_id": 1 },
				"mint": { "block_timestamp": "2023-02-26", "protobuf": [1, 2] }
			})
		);
	}
}
