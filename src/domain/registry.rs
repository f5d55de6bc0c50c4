//! Static position and token tables
//!
//! `ProtocolPosition` rows describe receipt tokens (aTokens, vault shares, LP tokens)
//! whose balance means the holder has deposited into a yield-bearing position.
//! `EuroToken` rows describe the plain stablecoins; a balance there is idle capital.

use super::chain::Chain;

/// One receipt-token deployment the tracker knows how to detect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProtocolPosition {
    /// Display name ("Aave V3")
    pub protocol: &'static str,
    /// Canonical id ("aave-v3")
    pub protocol_slug: &'static str,
    pub pool_name: &'static str,
    /// Underlying Euro stablecoin
    pub asset: &'static str,
    pub receipt_token: &'static str,
    pub decimals: u8,
    pub chain: Chain,
    /// External (DeFiLlama) pool id, when known
    pub pool_id: Option<&'static str>,
}

/// Plain Euro stablecoin with its per-chain deployments
#[derive(Debug, Clone, Copy)]
pub struct EuroToken {
    pub symbol: &'static str,
    pub name: &'static str,
    pub decimals: u8,
    pub addresses: &'static [(Chain, &'static str)],
}

pub const AAVE_V3_POSITIONS: &[ProtocolPosition] = &[
    ProtocolPosition {
        protocol: "Aave V3",
        protocol_slug: "aave-v3",
        pool_name: "EURC Supply",
        asset: "EURC",
        receipt_token: "0x018C56f6d7BD63D0E100f247b436E06a7156fF75", // aEthEURC
        decimals: 6,
        chain: Chain::Ethereum,
        pool_id: None,
    },
    ProtocolPosition {
        protocol: "Aave V3",
        protocol_slug: "aave-v3",
        pool_name: "EURC Supply",
        asset: "EURC",
        receipt_token: "0xf7F30a42d0E9a39E3e62e40E76C4149B7A7C0c41", // aArbEURC
        decimals: 6,
        chain: Chain::Arbitrum,
        pool_id: None,
    },
    ProtocolPosition {
        protocol: "Aave V3",
        protocol_slug: "aave-v3",
        pool_name: "EURC Supply",
        asset: "EURC",
        receipt_token: "0x846D2EDF8C49E5eFA1Ea59e0B2Cb6aea5757F79d", // aBaseEURC
        decimals: 6,
        chain: Chain::Base,
        pool_id: None,
    },
];

pub const MORPHO_POSITIONS: &[ProtocolPosition] = &[
    ProtocolPosition {
        protocol: "Morpho Blue",
        protocol_slug: "morpho-blue",
        pool_name: "Steakhouse EURC",
        asset: "EURC",
        receipt_token: "0xe8be52A78eB3dB69fFB69e0fB66E37b8B5da01C0",
        decimals: 6,
        chain: Chain::Ethereum,
        pool_id: None,
    },
    ProtocolPosition {
        protocol: "Morpho Blue",
        protocol_slug: "morpho-blue",
        pool_name: "EURC Vault",
        asset: "EURC",
        receipt_token: "0xF24608E0CCb972b0b0f4A6446a0BBf58C701a026",
        decimals: 6,
        chain: Chain::Base,
        pool_id: None,
    },
];

pub const CURVE_POSITIONS: &[ProtocolPosition] = &[
    ProtocolPosition {
        protocol: "Curve Finance",
        protocol_slug: "curve-dex",
        pool_name: "EURe/EURC",
        asset: "EURC",
        receipt_token: "0x69ACcb968B19a53790f43e57558F5E443A91aF22",
        decimals: 18,
        chain: Chain::Ethereum,
        pool_id: None,
    },
    ProtocolPosition {
        protocol: "Curve Finance",
        protocol_slug: "curve-dex",
        pool_name: "3EUR Pool",
        asset: "agEUR",
        receipt_token: "0xAd326c253A84e9805559b73A08724e11E49ca651",
        decimals: 18,
        chain: Chain::Polygon,
        pool_id: None,
    },
];

pub const EURO_TOKENS: &[EuroToken] = &[
    EuroToken {
        symbol: "EURC",
        name: "Circle Euro",
        decimals: 6,
        addresses: &[
            (Chain::Ethereum, "0x1aBaEA1f7C830bD89Acc67eC4af516296b1Cd299"),
            (Chain::Arbitrum, "0xB2EA51BAa12C461327d12A2069d47b30e680b69D"),
            (Chain::Optimism, "0x0FA4dED7DCCEd6e4487D7DD35003126DfC937c87"),
            (Chain::Polygon, "0x986bcce2989b14798031d1af7c2718cd99818814"),
            (Chain::Base, "0x60a3E35Cc302bFA4472857E6e5602BCF86897f9B"),
        ],
    },
    EuroToken {
        symbol: "EURS",
        name: "Stasis Euro",
        decimals: 2,
        addresses: &[
            (Chain::Ethereum, "0xdb25f211ab05b1c97d595516f45794528a807ad8"),
            (Chain::Polygon, "0xE111178A87A3BFf0c8d18DECBa5798827539Ae99"),
            (Chain::Arbitrum, "0xD22100808a38F5F58C0897fFA47796d1D5fD4877"),
        ],
    },
    EuroToken {
        symbol: "agEUR",
        name: "Angle Euro",
        decimals: 18,
        addresses: &[
            (Chain::Ethereum, "0x1a7e4e63778b4f12a199c062f3efdd288afcbce8"),
            (Chain::Optimism, "0x9485aca5bbBE1667AD97c7fE7C4531a624C8b1ED"),
            (Chain::Polygon, "0xE0B52e49357Fd4DAf2c15e02058DCE6BC0057db4"),
            (Chain::Arbitrum, "0xFA5Ed56A203466CbBC2430a43c66b9D8723528E7"),
        ],
    },
];

/// Every receipt-token position queried in one balance batch
pub fn all_protocol_positions() -> Vec<ProtocolPosition> {
    AAVE_V3_POSITIONS
        .iter()
        .chain(MORPHO_POSITIONS)
        .chain(CURVE_POSITIONS)
        .copied()
        .collect()
}
