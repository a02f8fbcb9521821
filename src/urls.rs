use clap::ValueEnum;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Network {
    #[default]
    Mainnet,
    Testnet,
    Local,
}

#[derive(Debug, Clone)]
pub struct HyperliquidUrls {
    pub info_endpoint: String,
}

impl HyperliquidUrls {
    pub fn new(network: Network) -> Self {
        match network {
            Network::Mainnet => Self::mainnet(),
            Network::Testnet => Self::testnet(),
            Network::Local => Self::local(),
        }
    }

    fn mainnet() -> Self {
        Self {
            info_endpoint: "https://api.hyperliquid.xyz/info".to_string(),
        }
    }

    fn testnet() -> Self {
        Self {
            info_endpoint: "https://api.hyperliquid-testnet.xyz/info".to_string(),
        }
    }

    fn local() -> Self {
        Self {
            info_endpoint: "http://localhost:3001/info".to_string(),
        }
    }
}
