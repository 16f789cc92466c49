// Network interface models

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterfaceRate {
    pub iface: String,
    #[serde(rename = "rx_kBs")]
    pub rx_kbs: f64,
    #[serde(rename = "tx_kBs")]
    pub tx_kbs: f64,
}

/// An empty interface list means "no data yet", not a failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkSample {
    pub interfaces: Vec<InterfaceRate>,
}
