//! Connector entity - a physical connector as drawn in the diagram

use serde::Serialize;

/// Picture shown next to a connector
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Image {
    pub src: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}

/// One connector instance; the document key is [`Connector::name`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Connector {
    /// Endpoint name, unique within one document
    #[serde(skip)]
    pub name: String,

    pub pincount: u32,

    /// Mating part number (what gets plugged onto the board connector)
    pub mpn: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<Image>,

    /// Only written when the pin count label should be hidden
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_pincount: Option<bool>,

    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub hide_disconnected_pins: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Connector {
    pub fn new(name: impl Into<String>, mpn: impl Into<String>, pincount: u32) -> Self {
        Self {
            name: name.into(),
            pincount,
            mpn: mpn.into(),
            image: None,
            show_pincount: None,
            hide_disconnected_pins: false,
            notes: None,
        }
    }
}
