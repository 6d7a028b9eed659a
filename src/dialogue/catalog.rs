//! Menu tables for the report dialogue
//!
//! Option labels are shown to users verbatim, so they are kept exactly as
//! the campus facilities team wrote them (including "ELECTORNIC LAB").
//! Place-specific lookups key on the normalized place name.

use super::state::{ConversationState, ReportDraft, Step};

/// Top-level location categories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationCategory {
    Hostel,
    AcademicBlock,
    Canteens,
    Mess,
    CommonAreas,
}

impl LocationCategory {
    pub const ALL: [LocationCategory; 5] = [
        LocationCategory::Hostel,
        LocationCategory::AcademicBlock,
        LocationCategory::Canteens,
        LocationCategory::Mess,
        LocationCategory::CommonAreas,
    ];

    pub fn label(self) -> &'static str {
        match self {
            LocationCategory::Hostel => "Hostel",
            LocationCategory::AcademicBlock => "Academic Block",
            LocationCategory::Canteens => "Canteens",
            LocationCategory::Mess => "Mess",
            LocationCategory::CommonAreas => "Common Areas",
        }
    }

    /// Resolve a label exactly as stored in a draft
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.label() == label)
    }

    /// Step that asks for the specific place within this category
    pub fn selection_step(self) -> Step {
        match self {
            LocationCategory::Hostel => Step::HostelSelection,
            LocationCategory::AcademicBlock => Step::AcademicSelection,
            LocationCategory::Canteens => Step::CanteenSelection,
            LocationCategory::Mess => Step::MessSelection,
            LocationCategory::CommonAreas => Step::CommonAreaSelection,
        }
    }

    /// Assistant question asked right after the category is chosen
    pub fn question(self) -> &'static str {
        match self {
            LocationCategory::Hostel => "Which hostel?",
            LocationCategory::AcademicBlock => {
                "Which block? Please type the block name (e.g., A-Block, CSE, ECE)."
            }
            LocationCategory::Canteens => "Which canteen?",
            LocationCategory::Mess => "Which mess?",
            LocationCategory::CommonAreas => "Which location?",
        }
    }
}

pub const HOSTELS: &[&str] = &["Bakul Nivas", "Parijaat", "Kadamba Nivas", "Palash Nivas"];

pub const ACADEMIC_BLOCKS: &[&str] = &[
    "Nilgiri",
    "Kohli Research Block",
    "Himalaya Building",
    "Vindhya Building",
    "SERC building",
];

pub const NILGIRI_LOCATIONS: &[&str] = &[
    "ELECTORNIC LAB",
    "COMPUTER LAB",
    "SARANGA HALL",
    "MSIT",
    "PLACEMENT OFFICE",
    "MICROLABS",
    "PDM SPACE",
];

pub const CANTEENS: &[&str] = &["Vindhya Canteen", "Tantra", "David"];

pub const COMMON_AREAS: &[&str] = &[
    "Football Ground",
    "Felicity Ground",
    "Bakul Warehouse",
    "Music Room",
    "Amphitheatre",
    "Gym",
    "Open Gym",
    "Basketball Court",
    "Volleyball Court",
    "Cricket Ground",
    "Lawn Tennis Court",
];

pub const MESSES: &[&str] = &[
    "Kadamba Mess (Veg)",
    "Kadamba Mess (Non-Veg)",
    "Yuktahar Mess",
    "Palash Mess",
];

pub const MESS_ISSUES: &[&str] = &[
    "Food Quality",
    "Hygiene Issue",
    "Menu Complaint",
    "Service Issue",
    "Portion Size",
    "Late Service",
    "Other",
];

/// Trade-based issue list used everywhere without a place-specific table
pub const BASE_ISSUES: &[&str] = &[
    "Electrician",
    "Plumber",
    "Carpenter",
    "Internet / IT",
    "Cleaning",
    "Other",
];

pub const DEFAULT_CANTEEN_ISSUES: &[&str] = &[
    "Food Quality",
    "Hygiene",
    "Billing Issue",
    "Service Delay",
    "Other",
];

pub const DEFAULT_COMMON_AREA_ISSUES: &[&str] =
    &["Cleaning", "Lighting", "Maintenance", "Safety", "Other"];

/// Dropped from [`BASE_ISSUES`] inside Nilgiri outside of hostels
const NILGIRI_EXCLUDED_ISSUE: &str = "Plumber";

const NILGIRI: &str = "nilgiri";

/// Trim and lowercase, the key form for every place lookup
pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Whether the place is the Nilgiri building itself
pub fn is_nilgiri(place: &str) -> bool {
    normalize(place) == NILGIRI
}

/// Whether the place is one of the rooms inside Nilgiri
pub fn is_nilgiri_sub_location(place: &str) -> bool {
    let key = normalize(place);
    NILGIRI_LOCATIONS.iter().any(|loc| normalize(loc) == key)
}

fn canteen_issues(key: &str) -> Option<&'static [&'static str]> {
    let issues: &'static [&'static str] = match key {
        "vindhya canteen" => &[
            "Food Quality",
            "Hygiene",
            "Billing Issue",
            "Queue Management",
            "Utensils / Cutlery",
            "Portion Size",
            "Service Delay",
            "Equipment / Appliances",
            "Other",
        ],
        "tantra" => &[
            "Food Quality",
            "Hygiene",
            "Menu Availability",
            "Billing Issue",
            "Service Delay",
            "Utensils / Cutlery",
            "Equipment / Appliances",
            "Other",
        ],
        "david" => &[
            "Food Quality",
            "Hygiene",
            "Billing Issue",
            "Allergy / Ingredient",
            "Service Delay",
            "Utensils / Cutlery",
            "Other",
        ],
        _ => return None,
    };
    Some(issues)
}

fn common_area_issues(key: &str) -> Option<&'static [&'static str]> {
    let issues: &'static [&'static str] = match key {
        "football ground" => &[
            "Floodlights",
            "Ground Maintenance",
            "Seating / Benches",
            "Irrigation / Watering",
            "Cleaning",
            "Other",
        ],
        "felicity ground" => &[
            "Ground Maintenance",
            "Seating / Benches",
            "Lighting",
            "Cleaning",
            "Other",
        ],
        // Festival venue
        "bakul warehouse" => &[
            "Event Setup / Stage",
            "Audio / PA System",
            "Lighting / Rigging",
            "Seating / Arrangement",
            "Power / Electrical",
            "Sanitation / Cleaning",
            "Security / Crowd Control",
            "Decoration",
            "Safety Hazard",
            "Other",
        ],
        // Open-air venue for cultural fests
        "amphitheatre" => &[
            "Stage Setup / Backdrop",
            "Sound / PA System",
            "Lighting",
            "Seating / Audience Area",
            "Weather Protection / Tarping",
            "Power / Generators",
            "Sanitation / Portable Toilets",
            "Security / Crowd Control",
            "Safety Hazard",
            "Waste Management",
            "Other",
        ],
        "music room" => &[
            "Instrument Repair",
            "AC / Ventilation",
            "Sound System",
            "Cleaning",
            "Other",
        ],
        "gym" => &[
            "Equipment Repair",
            "AC / Heating",
            "Trainer / Staffing",
            "Cleaning",
            "Other",
        ],
        "open gym" => &["Equipment Repair", "Safety Hazard", "Cleaning", "Other"],
        "basketball court" => &[
            "Net / Hoop Damage",
            "Surface Damage",
            "Lighting",
            "Cleaning",
            "Other",
        ],
        "volleyball court" => &[
            "Net Repair",
            "Surface Damage",
            "Lighting",
            "Cleaning",
            "Other",
        ],
        "cricket ground" => &[
            "Pitch Maintenance",
            "Boundary / Fencing",
            "Net Repair",
            "Lighting",
            "Other",
        ],
        "lawn tennis court" => &[
            "Net Repair",
            "Surface Maintenance",
            "Lighting",
            "Cleaning",
            "Other",
        ],
        _ => return None,
    };
    Some(issues)
}

/// Issue options for the generic issue step
///
/// Canteens and common areas use place-specific tables with a per-context
/// default. Everything else gets [`BASE_ISSUES`], minus "Plumber" when the
/// report is inside Nilgiri and the category is not Hostel.
pub fn issue_options(draft: &ReportDraft, in_nilgiri: bool) -> Vec<&'static str> {
    let key = normalize(&draft.specific_location);
    match LocationCategory::from_label(&draft.location_category) {
        Some(LocationCategory::Canteens) => canteen_issues(&key)
            .unwrap_or(DEFAULT_CANTEEN_ISSUES)
            .to_vec(),
        Some(LocationCategory::CommonAreas) => common_area_issues(&key)
            .unwrap_or(DEFAULT_COMMON_AREA_ISSUES)
            .to_vec(),
        category => {
            let drop_plumber = in_nilgiri && category != Some(LocationCategory::Hostel);
            BASE_ISSUES
                .iter()
                .copied()
                .filter(|issue| !(drop_plumber && *issue == NILGIRI_EXCLUDED_ISSUE))
                .collect()
        }
    }
}

/// Menu offered at the current step, `None` for steps without buttons
pub fn menu(state: &ConversationState) -> Option<Vec<&'static str>> {
    let options = match state.step {
        Step::LocationCategory => LocationCategory::ALL
            .into_iter()
            .map(LocationCategory::label)
            .collect(),
        Step::HostelSelection => HOSTELS.to_vec(),
        Step::AcademicSelection => ACADEMIC_BLOCKS.to_vec(),
        Step::NilgiriSelection => NILGIRI_LOCATIONS.to_vec(),
        Step::CanteenSelection => CANTEENS.to_vec(),
        Step::CommonAreaSelection => COMMON_AREAS.to_vec(),
        Step::MessSelection => MESSES.to_vec(),
        Step::IssueCategory => issue_options(&state.draft, state.in_nilgiri),
        Step::MessIssueCategory => MESS_ISSUES.to_vec(),
        Step::Greeting | Step::DetailsInput | Step::Confirmation | Step::Success => return None,
    };
    Some(options)
}

/// Find the option a user meant, comparing normalized forms
pub fn find_option(options: &[&'static str], input: &str) -> Option<&'static str> {
    let key = normalize(input);
    options.iter().copied().find(|option| normalize(option) == key)
}
