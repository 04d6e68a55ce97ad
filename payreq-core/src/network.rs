use log::trace;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::error::PayReqError;

/// Parameters of a bitcoin network a payment request can be issued for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkParams {
    #[serde(rename = "bech32")]
    pub bech32_prefix: &'static str,
    pub pub_key_hash: u8,
    pub script_hash: u8,
    pub valid_witness_versions: &'static [u8],
}

pub static MAINNET: NetworkParams = NetworkParams {
    bech32_prefix: "bc",
    pub_key_hash: 0x00,
    script_hash: 0x05,
    valid_witness_versions: &[0],
};

pub static TESTNET: NetworkParams = NetworkParams {
    bech32_prefix: "tb",
    pub_key_hash: 0x6f,
    script_hash: 0xc4,
    valid_witness_versions: &[0],
};

pub static REGTEST: NetworkParams = NetworkParams {
    bech32_prefix: "bcrt",
    pub_key_hash: 0x6f,
    script_hash: 0xc4,
    valid_witness_versions: &[0],
};

pub static SIMNET: NetworkParams = NetworkParams {
    bech32_prefix: "sb",
    pub_key_hash: 0x3f,
    script_hash: 0x7b,
    valid_witness_versions: &[0],
};

static NETWORKS: [&NetworkParams; 4] = [&MAINNET, &TESTNET, &REGTEST, &SIMNET];

// Without reverse lookups the multiplier can't be required to follow digits, so when
// no digits are captured the last letter of the network id most likely ended up in
// the multiplier group and the prefix is matched again as a whole.
static PREFIX_WITH_AMOUNT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^ln(\S+?)(\d*)([a-zA-Z]?)$").expect("valid regex"));
static PREFIX_WITHOUT_AMOUNT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^ln(\S+)$").expect("valid regex"));

/// The pieces of a payment request's human readable part.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HrpParts {
    pub network: NetworkParams,
    pub amount: Option<u64>,
    pub multiplier: Option<char>,
}

impl HrpParts {
    /// The requested amount in millisatoshis, if the prefix carries a usable one.
    pub fn amount_msat(&self) -> Option<u64> {
        let amount = self.amount?;
        match self.multiplier {
            None => amount.checked_mul(100_000_000_000),
            Some('m') => amount.checked_mul(100_000_000),
            Some('u') => amount.checked_mul(100_000),
            Some('n') => amount.checked_mul(100),
            Some('p') if amount % 10 == 0 => Some(amount / 10),
            Some(_) => None,
        }
    }
}

/// Resolves the network (and the optional amount) of a human readable part such as
/// `lnbcrt1230n`.
pub fn resolve_network(hrp: &str) -> Result<HrpParts, PayReqError> {
    let (network_id, amount, multiplier) = match PREFIX_WITH_AMOUNT.captures(hrp) {
        Some(caps) if !caps[2].is_empty() => (
            caps[1].to_string(),
            caps[2].parse::<u64>().ok(),
            caps[3].chars().next(),
        ),
        _ => match PREFIX_WITHOUT_AMOUNT.captures(hrp) {
            Some(caps) => (caps[1].to_string(), None, None),
            None => return Err(PayReqError::MalformedPrefix(hrp.to_string())),
        },
    };

    let network = NETWORKS
        .iter()
        .find(|n| n.bech32_prefix == network_id)
        .ok_or_else(|| PayReqError::UnknownNetwork(network_id.clone()))?;

    trace!("resolved payment request prefix {hrp} to network {network_id}");

    Ok(HrpParts {
        network: **network,
        amount,
        multiplier,
    })
}
