//! # US Address Components
//!
//! The label set emitted by the pretrained US address model.
//!
//! | Group | Labels |
//! |-------|--------|
//! | Number | AddressNumberPrefix, AddressNumber, AddressNumberSuffix |
//! | Street | StreetNamePreModifier, StreetNamePreDirectional, StreetNamePreType, StreetName, StreetNamePostType, StreetNamePostDirectional |
//! | Unit | SubaddressType, SubaddressIdentifier, BuildingName, OccupancyType, OccupancyIdentifier |
//! | Place | PlaceName, StateName, ZipCode |
//! | PO Box | USPSBoxType, USPSBoxID, USPSBoxGroupType, USPSBoxGroupID |
//! | Other | CornerOf, IntersectionSeparator, LandmarkName, Recipient, NotAddress |
//!
//! Labels travel through the pipeline as plain strings (the model may carry
//! labels this enum does not know); this enum names the known ones and
//! derives the default output columns.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Component {
    AddressNumberPrefix,
    AddressNumber,
    AddressNumberSuffix,
    StreetNamePreModifier,
    StreetNamePreDirectional,
    StreetNamePreType,
    StreetName,
    StreetNamePostType,
    StreetNamePostDirectional,
    SubaddressType,
    SubaddressIdentifier,
    BuildingName,
    OccupancyType,
    OccupancyIdentifier,
    CornerOf,
    LandmarkName,
    PlaceName,
    StateName,
    ZipCode,
    #[serde(rename = "USPSBoxType")]
    UspsBoxType,
    #[serde(rename = "USPSBoxID")]
    UspsBoxId,
    #[serde(rename = "USPSBoxGroupType")]
    UspsBoxGroupType,
    #[serde(rename = "USPSBoxGroupID")]
    UspsBoxGroupId,
    IntersectionSeparator,
    Recipient,
    NotAddress,
}

impl Component {
    pub const COUNT: usize = 26;

    /// All components in the conventional reading order of an address.
    pub fn all() -> [Component; Self::COUNT] {
        use Component::*;
        [
            AddressNumberPrefix,
            AddressNumber,
            AddressNumberSuffix,
            StreetNamePreModifier,
            StreetNamePreDirectional,
            StreetNamePreType,
            StreetName,
            StreetNamePostType,
            StreetNamePostDirectional,
            SubaddressType,
            SubaddressIdentifier,
            BuildingName,
            OccupancyType,
            OccupancyIdentifier,
            CornerOf,
            LandmarkName,
            PlaceName,
            StateName,
            ZipCode,
            UspsBoxType,
            UspsBoxId,
            UspsBoxGroupType,
            UspsBoxGroupId,
            IntersectionSeparator,
            Recipient,
            NotAddress,
        ]
    }

    /// Label string as stored in the model (ex: "USPSBoxID").
    pub fn label(&self) -> &'static str {
        use Component::*;
        match self {
            AddressNumberPrefix => "AddressNumberPrefix",
            AddressNumber => "AddressNumber",
            AddressNumberSuffix => "AddressNumberSuffix",
            StreetNamePreModifier => "StreetNamePreModifier",
            StreetNamePreDirectional => "StreetNamePreDirectional",
            StreetNamePreType => "StreetNamePreType",
            StreetName => "StreetName",
            StreetNamePostType => "StreetNamePostType",
            StreetNamePostDirectional => "StreetNamePostDirectional",
            SubaddressType => "SubaddressType",
            SubaddressIdentifier => "SubaddressIdentifier",
            BuildingName => "BuildingName",
            OccupancyType => "OccupancyType",
            OccupancyIdentifier => "OccupancyIdentifier",
            CornerOf => "CornerOf",
            LandmarkName => "LandmarkName",
            PlaceName => "PlaceName",
            StateName => "StateName",
            ZipCode => "ZipCode",
            UspsBoxType => "USPSBoxType",
            UspsBoxId => "USPSBoxID",
            UspsBoxGroupType => "USPSBoxGroupType",
            UspsBoxGroupId => "USPSBoxGroupID",
            IntersectionSeparator => "IntersectionSeparator",
            Recipient => "Recipient",
            NotAddress => "NotAddress",
        }
    }

    /// snake_case column name that the column mapping matches to this label
    /// (ex: `AddressNumber` → `address_number`, `USPSBoxID` → `usps_box_id`).
    pub fn column_name(&self) -> String {
        let label = self.label();
        let chars: Vec<char> = label.chars().collect();
        let mut column = String::with_capacity(label.len() + 4);
        for (i, &c) in chars.iter().enumerate() {
            if c.is_ascii_uppercase() && i > 0 {
                let prev_lower = chars[i - 1].is_ascii_lowercase();
                let next_lower = chars.get(i + 1).is_some_and(|n| n.is_ascii_lowercase());
                // word boundary: "rN" in "streetName", or "SB" in "USPSBox"
                if prev_lower || (next_lower && chars[i - 1].is_ascii_uppercase()) {
                    column.push('_');
                }
            }
            column.push(c.to_ascii_lowercase());
        }
        column
    }
}

impl std::fmt::Display for Component {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Column names for every known component, in [`Component::all`] order.
pub fn default_columns() -> Vec<String> {
    Component::all().iter().map(Component::column_name).collect()
}
