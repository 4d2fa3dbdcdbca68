//! Standard voyage milestone sets.
//!
//! Durations are typical values in hours; real figures vary by vessel, cargo
//! and port. Every template is a single-source DAG.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::models::PathItem;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error("Unknown voyage type: {0:?} (expected laden, ballast or discharge)")]
    UnknownVoyageType(String),
}

/// Voyage phases with a curated milestone template.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VoyageType {
    /// Loading at the load port followed by the laden sea passage.
    Laden,
    /// Ballast passage to the load port up to berthing.
    Ballast,
    /// Discharge operation at the destination port.
    Discharge,
}

struct Milestone {
    id: &'static str,
    name: &'static str,
    duration: f64,
    depends_on: &'static [&'static str],
}

const fn m(
    id: &'static str,
    name: &'static str,
    duration: f64,
    depends_on: &'static [&'static str],
) -> Milestone {
    Milestone {
        id,
        name,
        duration,
        depends_on,
    }
}

const LADEN: &[Milestone] = &[
    m("arrival_pilot_load", "Arrival Pilot Station (Load Port)", 2.0, &[]),
    m("nor_tendered_load", "NOR Tendered (Load Port)", 1.0, &["arrival_pilot_load"]),
    m("nor_accepted_load", "NOR Accepted (Load Port)", 4.0, &["nor_tendered_load"]),
    m("berth_alongside_load", "Berth Alongside (Load Port)", 6.0, &["nor_accepted_load"]),
    m("hoses_connected", "Hoses Connected / Gear Ready", 2.0, &["berth_alongside_load"]),
    m("loading_commenced", "Loading Commenced", 1.0, &["hoses_connected"]),
    m("loading_completed", "Loading Completed", 36.0, &["loading_commenced"]),
    m("hoses_disconnected", "Hoses Disconnected / Gear Secured", 2.0, &["loading_completed"]),
    m("docs_received", "Documents on Board", 4.0, &["loading_completed"]),
    m(
        "departure_pilot_load",
        "Departure Pilot Station (Load Port)",
        2.0,
        &["hoses_disconnected", "docs_received"],
    ),
    m("sea_passage_laden", "Sea Passage (Laden)", 240.0, &["departure_pilot_load"]),
    m(
        "arrival_pilot_discharge",
        "Arrival Pilot Station (Discharge Port)",
        2.0,
        &["sea_passage_laden"],
    ),
];

const BALLAST: &[Milestone] = &[
    m("departure_pilot_ballast", "Departure Pilot Station (Previous Port)", 2.0, &[]),
    m("sea_passage_ballast", "Sea Passage (Ballast)", 192.0, &["departure_pilot_ballast"]),
    m("arrival_pilot_load", "Arrival Pilot Station (Load Port)", 2.0, &["sea_passage_ballast"]),
    m("nor_tendered_load", "NOR Tendered (Load Port)", 1.0, &["arrival_pilot_load"]),
    m("nor_accepted_load", "NOR Accepted (Load Port)", 4.0, &["nor_tendered_load"]),
    m("anchorage_waiting", "Anchorage / Waiting for Berth", 12.0, &["nor_accepted_load"]),
    m("berth_alongside_load", "Berth Alongside (Load Port)", 3.0, &["anchorage_waiting"]),
];

const DISCHARGE: &[Milestone] = &[
    m("arrival_pilot_discharge", "Arrival Pilot Station (Discharge Port)", 2.0, &[]),
    m(
        "nor_tendered_discharge",
        "NOR Tendered (Discharge Port)",
        1.0,
        &["arrival_pilot_discharge"],
    ),
    m(
        "nor_accepted_discharge",
        "NOR Accepted (Discharge Port)",
        4.0,
        &["nor_tendered_discharge"],
    ),
    m(
        "berth_alongside_discharge",
        "Berth Alongside (Discharge Port)",
        6.0,
        &["nor_accepted_discharge"],
    ),
    m(
        "hoses_connected_discharge",
        "Hoses Connected / Gear Ready",
        2.0,
        &["berth_alongside_discharge"],
    ),
    m("discharge_commenced", "Discharge Commenced", 1.0, &["hoses_connected_discharge"]),
    m("discharge_completed", "Discharge Completed", 30.0, &["discharge_commenced"]),
    m(
        "hoses_disconnected_discharge",
        "Hoses Disconnected / Gear Secured",
        2.0,
        &["discharge_completed"],
    ),
    m("tank_inspection", "Tank Inspection / Survey", 4.0, &["discharge_completed"]),
    m(
        "departure_pilot_discharge",
        "Departure Pilot Station (Discharge Port)",
        2.0,
        &["hoses_disconnected_discharge", "tank_inspection"],
    ),
];

impl VoyageType {
    pub const ALL: [VoyageType; 3] = [Self::Laden, Self::Ballast, Self::Discharge];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Laden => "laden",
            Self::Ballast => "ballast",
            Self::Discharge => "discharge",
        }
    }

    fn table(self) -> &'static [Milestone] {
        match self {
            Self::Laden => LADEN,
            Self::Ballast => BALLAST,
            Self::Discharge => DISCHARGE,
        }
    }

    /// Fresh, pending milestone activities for this voyage phase.
    pub fn milestones(self) -> Vec<PathItem> {
        self.table()
            .iter()
            .map(|ms| PathItem::pending(ms.id, ms.name, ms.duration, ms.depends_on))
            .collect()
    }
}

impl fmt::Display for VoyageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VoyageType {
    type Err = TemplateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "laden" => Ok(Self::Laden),
            "ballast" => Ok(Self::Ballast),
            "discharge" => Ok(Self::Discharge),
            _ => Err(TemplateError::UnknownVoyageType(s.to_string())),
        }
    }
}

/// Milestone template for a voyage type key (trimmed, case-insensitive).
///
/// Unknown keys yield an empty list; callers treat that as "no template".
pub fn voyage_milestone_template(voyage_type: &str) -> Vec<PathItem> {
    try_voyage_milestone_template(voyage_type).unwrap_or_default()
}

/// Like [`voyage_milestone_template`], but unknown keys are an error.
pub fn try_voyage_milestone_template(voyage_type: &str) -> Result<Vec<PathItem>, TemplateError> {
    voyage_type.parse::<VoyageType>().map(VoyageType::milestones)
}
