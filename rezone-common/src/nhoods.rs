//! Neighborhood registry and selection encoding
//!
//! The 38 San Francisco analysis neighborhoods in fixed registry order.
//! Share links encode a neighborhood selection as comma-joined registry
//! indices, so the order here is part of the wire format and must not
//! be rearranged.

/// All analysis neighborhoods in registry order.
///
/// Treasure Island is excluded pending parcel data cleanup; Golden Gate
/// Park and the Presidio are excluded because they contain no
/// residentially zoned parcels.
pub const ALL_NHOODS: [&str; 38] = [
    "Western Addition",
    "West of Twin Peaks",
    "Visitacion Valley",
    "Twin Peaks",
    "South of Market",
    "Presidio Heights",
    "Potrero Hill",
    "Portola",
    "Pacific Heights",
    "Outer Richmond",
    "Outer Mission",
    "Sunset/Parkside",
    "Oceanview/Merced/Ingleside",
    "North Beach",
    "Noe Valley",
    "Lone Mountain/USF",
    "Lincoln Park",
    "Seacliff",
    "Nob Hill",
    "Mission Bay",
    "Mission",
    "Russian Hill",
    "Marina",
    "Lakeshore",
    "Tenderloin",
    "McLaren Park",
    "Japantown",
    "Inner Sunset",
    "Hayes Valley",
    "Haight Ashbury",
    "Inner Richmond",
    "Glen Park",
    "Financial District/South Beach",
    "Excelsior",
    "Chinatown",
    "Castro/Upper Market",
    "Bernal Heights",
    "Bayview Hunters Point",
];

/// Default simulation selection: the west-side neighborhoods
pub const DEFAULT_NHOODS: [&str; 6] = [
    "Outer Richmond",
    "Inner Richmond",
    "Inner Sunset",
    "Sunset/Parkside",
    "Seacliff",
    "West of Twin Peaks",
];

/// Whether a name is a registered neighborhood
pub fn is_known(name: &str) -> bool {
    index_of(name).is_some()
}

/// Registry index of a neighborhood name
pub fn index_of(name: &str) -> Option<usize> {
    ALL_NHOODS.iter().position(|n| *n == name)
}

/// Encode a neighborhood selection as comma-joined registry indices.
///
/// Unknown names are skipped.
pub fn encode_selection<S: AsRef<str>>(names: &[S]) -> String {
    let indices: Vec<String> = names
        .iter()
        .filter_map(|n| index_of(n.as_ref()))
        .map(|i| i.to_string())
        .collect();
    indices.join(",")
}

/// Decode a comma-joined index string back into neighborhood names.
///
/// Non-numeric or out-of-range entries are skipped.
pub fn decode_selection(encoded: &str) -> Vec<String> {
    encoded
        .split(',')
        .filter_map(|part| part.trim().parse::<usize>().ok())
        .filter_map(|i| ALL_NHOODS.get(i))
        .map(|n| n.to_string())
        .collect()
}
