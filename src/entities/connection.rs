//! Connection entity - one wire path through a cable

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

/// Pin identifier, copied verbatim from the net table
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum Pin {
    Number(i64),
    Name(String),
}

impl std::fmt::Display for Pin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Pin::Number(n) => write!(f, "{}", n),
            Pin::Name(s) => write!(f, "{}", s),
        }
    }
}

/// A connector endpoint and the pin the wire lands on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub name: String,
    pub pin: Pin,
}

/// The cable a connection runs through, and the wire position inside it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViaPin {
    pub cable: String,
    /// 1-based, assigned per cable in net-table order
    pub pin: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    pub from: Endpoint,
    pub via: ViaPin,
    pub to: Endpoint,
    pub net_name: String,
}

/// Serializes as the WireViz connection set
/// `[{from: pin}, {cable: wire}, {to: pin}]`.
impl Serialize for Connection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        struct Single<'a, V: Serialize>(&'a str, &'a V);

        impl<V: Serialize> Serialize for Single<'_, V> {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(self.0, self.1)?;
                map.end()
            }
        }

        let mut seq = serializer.serialize_seq(Some(3))?;
        seq.serialize_element(&Single(&self.from.name, &self.from.pin))?;
        seq.serialize_element(&Single(&self.via.cable, &self.via.pin))?;
        seq.serialize_element(&Single(&self.to.name, &self.to.pin))?;
        seq.end()
    }
}
