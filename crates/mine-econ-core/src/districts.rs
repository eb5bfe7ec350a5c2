//! Mineral district reference registry.
//!
//! Static catalogue of fifteen named United States mining districts, centred
//! on the Rio Grande Rift corridor plus the major western gold, silver, and
//! rare-earth camps. Each entry carries the district's host state, centroid
//! coordinates, commodity suite, and descriptive geology and geothermal
//! notes. The registry is pure reference data: lookups never perform I/O,
//! and an unknown name is an ordinary `None`, not an error.

use std::fmt;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

// ---------------------------------------------------------------------------
// Commodity taxonomy
// ---------------------------------------------------------------------------

/// Commodities tracked across the district registry.
///
/// `Display` yields the lowercase query token used when filtering external
/// geological record services ("rare earths", not "RareEarths").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Commodity {
    Gold,
    Silver,
    Molybdenum,
    Copper,
    Lead,
    Zinc,
    Uranium,
    RareEarths,
    Lithium,
}

impl fmt::Display for Commodity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let token = match self {
            Commodity::Gold => "gold",
            Commodity::Silver => "silver",
            Commodity::Molybdenum => "molybdenum",
            Commodity::Copper => "copper",
            Commodity::Lead => "lead",
            Commodity::Zinc => "zinc",
            Commodity::Uranium => "uranium",
            Commodity::RareEarths => "rare earths",
            Commodity::Lithium => "lithium",
        };
        f.write_str(token)
    }
}

// ---------------------------------------------------------------------------
// District entries
// ---------------------------------------------------------------------------

/// One named mining district.
///
/// All fields are borrowed from the static registry; the type is
/// `Serialize`-only because the data is never read back in.
#[derive(Debug, Clone, Serialize)]
pub struct District {
    /// Registry key, including the conventional commodity suffix
    /// ("Carlin Trend (Nevada) - Au").
    pub name: &'static str,
    /// Host state used for state-level filtering.
    pub state: &'static str,
    /// Commodity suite in the district's conventional citation order.
    pub commodities: &'static [Commodity],
    /// Short prose description of the district and its notable mines.
    pub description: &'static str,
    /// Structural and lithological summary.
    pub geology: &'static str,
    /// Geothermal resource notes (heat flow, springs, power potential).
    pub geothermal: &'static str,
    /// Centroid latitude in decimal degrees (north positive).
    pub latitude: Decimal,
    /// Centroid longitude in decimal degrees (west negative).
    pub longitude: Decimal,
}

impl District {
    /// Comma-joined lowercase commodity list, suitable as the commodity
    /// filter parameter of external record-lookup services.
    pub fn commodity_filter(&self) -> String {
        self.commodities
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<_>>()
            .join(",")
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

static DISTRICTS: &[District] = &[
    District {
        name: "Northern Rio Grande Rift (Colorado) - Au, Ag, Mo",
        state: "Colorado",
        commodities: &[Commodity::Gold, Commodity::Silver, Commodity::Molybdenum],
        description: "Covers areas like Leadville, San Luis Basin, Taos Plateau \
                      Volcanic Field. Known for gold, silver, molybdenum.",
        geology: "Broad downwarp with basins, volcanic features along Jemez \
                  Lineament. The rift formed ~36-37 Ma due to crustal extension \
                  and thinning. Basins like San Luis are complex, divided by \
                  intrabasin horsts, with low-angle faults. Sediments deposited \
                  in closed basins under intermittent flooding.",
        geothermal: "High geothermal potential in linkage zones and basins like \
                     San Luis. Heat flow >4.0 HFU in parts; hot springs and \
                     geothermal wells indicate resources for power generation. \
                     Valles Caldera (central but influential) has \
                     high-temperature systems (up to 300\u{b0}C). Exploration \
                     ongoing with potential for EGS (Enhanced Geothermal \
                     Systems).",
        latitude: dec!(37.5),
        longitude: dec!(-106.0),
    },
    District {
        name: "Central Rio Grande Rift (New Mexico) - Cu, Pb, Zn, U",
        state: "New Mexico",
        commodities: &[
            Commodity::Copper,
            Commodity::Lead,
            Commodity::Zinc,
            Commodity::Uranium,
        ],
        description: "Includes Espanola, Albuquerque, Socorro basins, Jemez \
                      Volcanic Field, Cerros del Rio. Rich in copper, lead, \
                      zinc, uranium.",
        geology: "En echelon basins, half-grabens, with mid-Oligocene to \
                  Pleistocene volcanism. Espa\u{f1}ola basin: 2-3 km deep, \
                  began as downwarp in late Oligocene. Albuquerque-Belen basins \
                  with ~0.3 mm/yr extension. Complex basins with horsts; late \
                  Oligocene magmatism imprinted thermal boundaries. Natural \
                  resources in rift basins.",
        geothermal: "Significant geothermal resources with volcanics; Valles \
                     Caldera and Ojo Caliente hot springs show distal \
                     connections. High heat flow suggests vertical fractures \
                     for magma/groundwater interaction. Known geothermal areas \
                     like Jemez Springs (up to 100\u{b0}C). Potential for \
                     binary cycle plants; assessments indicate moderate-high \
                     temperature resources.",
        latitude: dec!(35.0),
        longitude: dec!(-106.5),
    },
    District {
        name: "Southern Rio Grande Rift (New Mexico/Texas/Mexico) - Au, Ag, Cu",
        state: "New Mexico",
        commodities: &[Commodity::Gold, Commodity::Silver, Commodity::Copper],
        description: "Potrillo Volcanic Field, Mesilla Basin, extending to \
                      Chihuahua. Limited metallic deposits, but cinder and \
                      aggregate resources; nearby copper mines like Tyrone.",
        geology: "Narrow rift segments, monogenetic volcanic fields, Basin and \
                  Range extension into Mexico. Rift started ~36 Ma with \
                  westerly extension. Basins like Santo Domingo form large \
                  accommodation zones. Distributed deformation across rift, \
                  Great Plains.",
        geothermal: "Evaluated in areas like Truth or Consequences with high \
                     heat flow anomalies. Self-potential surveys in regions \
                     like Radium Springs show potential. Moderate resources \
                     with hot springs; under-explored but promising for \
                     low-temperature applications. Overall rift anomalies \
                     suggest extensive fractures for geothermal fluid \
                     circulation.",
        latitude: dec!(32.0),
        longitude: dec!(-107.0),
    },
    District {
        name: "Carlin Trend (Nevada) - Au",
        state: "Nevada",
        commodities: &[Commodity::Gold],
        description: "World-class gold mining district in northern Nevada, \
                      known for Carlin-type gold deposits.",
        geology: "Sedimentary-hosted disseminated gold in Paleozoic rocks, \
                  associated with intrusive igneous activity.",
        geothermal: "Moderate potential due to Basin and Range extension.",
        latitude: dec!(40.8),
        longitude: dec!(-116.0),
    },
    District {
        name: "Black Hills (South Dakota) - Au, Ag",
        state: "South Dakota",
        commodities: &[Commodity::Gold, Commodity::Silver],
        description: "Historic gold rush area, including Homestake Mine, one \
                      of the largest gold producers in US history.",
        geology: "Precambrian metamorphic rocks with Tertiary intrusions.",
        geothermal: "Low to moderate.",
        latitude: dec!(44.0),
        longitude: dec!(-103.5),
    },
    District {
        name: "Appalachian Region (Eastern US) - Au, Ag",
        state: "Virginia",
        commodities: &[Commodity::Gold, Commodity::Silver],
        description: "Gold and silver in Piedmont and Blue Ridge provinces, \
                      e.g., Virginia, North Carolina.",
        geology: "Metamorphic and volcanic rocks with vein deposits.",
        geothermal: "Low.",
        latitude: dec!(37.5),
        longitude: dec!(-80.0),
    },
    District {
        name: "Bear Lodge (Wyoming) - REE",
        state: "Wyoming",
        commodities: &[Commodity::RareEarths],
        description: "Major rare earth elements deposit in the Black Hills \
                      uplift.",
        geology: "Alkaline igneous complex with carbonatite intrusions.",
        geothermal: "Low.",
        latitude: dec!(44.5),
        longitude: dec!(-104.5),
    },
    District {
        name: "Round Top (Texas) - REE, Li",
        state: "Texas",
        commodities: &[Commodity::RareEarths, Commodity::Lithium],
        description: "Rhyolite-hosted rare earth and lithium deposit.",
        geology: "Tertiary intrusive rhyolite laccolith.",
        geothermal: "Moderate.",
        latitude: dec!(31.3),
        longitude: dec!(-105.5),
    },
    District {
        name: "Bokan Mountain (Alaska) - REE, U",
        state: "Alaska",
        commodities: &[Commodity::RareEarths, Commodity::Uranium],
        description: "Peralkaline granite-hosted rare earth and uranium.",
        geology: "Jurassic peralkaline intrusive complex.",
        geothermal: "High in some Alaskan areas.",
        latitude: dec!(55.0),
        longitude: dec!(-132.0),
    },
    District {
        name: "Mojave Desert (California) - REE, Au",
        state: "California",
        commodities: &[Commodity::RareEarths, Commodity::Gold],
        description: "Mountain Pass Mine, world's largest REE producer outside \
                      China; also gold.",
        geology: "Carbonatite deposits in Precambrian gneiss.",
        geothermal: "High in Imperial Valley nearby.",
        latitude: dec!(35.0),
        longitude: dec!(-116.0),
    },
    District {
        name: "Mother Lode (California) - Au",
        state: "California",
        commodities: &[Commodity::Gold],
        description: "Historic California Gold Rush area along Sierra Nevada \
                      foothills.",
        geology: "Mesothermal quartz veins in metamorphic rocks.",
        geothermal: "Moderate.",
        latitude: dec!(38.5),
        longitude: dec!(-120.5),
    },
    District {
        name: "Cripple Creek (Colorado) - Au, Ag",
        state: "Colorado",
        commodities: &[Commodity::Gold, Commodity::Silver],
        description: "Volcanic-hosted epithermal gold-silver deposits.",
        geology: "Oligocene caldera with telluride minerals.",
        geothermal: "High.",
        latitude: dec!(38.7),
        longitude: dec!(-105.2),
    },
    District {
        name: "Comstock Lode (Nevada) - Ag, Au",
        state: "Nevada",
        commodities: &[Commodity::Silver, Commodity::Gold],
        description: "Famous silver mining district near Virginia City.",
        geology: "Epithermal veins in Tertiary volcanics.",
        geothermal: "High.",
        latitude: dec!(39.3),
        longitude: dec!(-119.6),
    },
    District {
        name: "Idaho Batholith (Idaho) - Au, Ag, REE",
        state: "Idaho",
        commodities: &[Commodity::Gold, Commodity::Silver, Commodity::RareEarths],
        description: "Granitic intrusions with vein and placer deposits.",
        geology: "Cretaceous granites with polymetallic veins.",
        geothermal: "Moderate.",
        latitude: dec!(45.0),
        longitude: dec!(-115.0),
    },
    District {
        name: "Pebble (Alaska) - Cu, Au, Mo",
        state: "Alaska",
        commodities: &[Commodity::Copper, Commodity::Gold, Commodity::Molybdenum],
        description: "Porphyry copper-gold-molybdenum deposit.",
        geology: "Tertiary intrusive complex.",
        geothermal: "High.",
        latitude: dec!(59.7),
        longitude: dec!(-155.3),
    },
];

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// All registry entries in stable declaration order.
pub fn all_districts() -> &'static [District] {
    DISTRICTS
}

/// Looks up a district by its full registry name, ignoring case and
/// surrounding whitespace. Unknown names return `None`.
pub fn find_district(name: &str) -> Option<&'static District> {
    let needle = normalize(name);
    DISTRICTS.iter().find(|d| normalize(d.name) == needle)
}

/// All districts hosted in the given state (case-insensitive).
pub fn districts_in_state(state: &str) -> Vec<&'static District> {
    let needle = normalize(state);
    DISTRICTS
        .iter()
        .filter(|d| normalize(d.state) == needle)
        .collect()
}

fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
