//! Fixed vocabularies used by task logs and projects.
//!
//! Stored rows keep these as plain text so legacy values written by older
//! deployments are still grouped by the reports. The enums here validate
//! values at the request boundary and provide the option lists served to the
//! dashboard.

use crate::error::CoreError;

macro_rules! define_label_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $label:literal $(| $alias:literal)* ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $label $(, alias = $alias)*)] $variant ),+
        }

        impl $name {
            /// Every variant, in display order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// The canonical stored label.
            pub fn as_str(self) -> &'static str {
                match self {
                    $( $name::$variant => $label ),+
                }
            }

            /// The canonical label followed by every accepted alias.
            pub fn spellings(self) -> &'static [&'static str] {
                match self {
                    $( $name::$variant => &[$label $(, $alias)*] ),+
                }
            }

            /// Parse a label (or a known legacy alias). Surrounding whitespace is ignored.
            pub fn parse(value: &str) -> Option<Self> {
                match value.trim() {
                    $( $label $(| $alias)* => Some($name::$variant), )+
                    _ => None,
                }
            }

            /// Parse a request field, naming the field in the error.
            pub fn parse_field(field: &str, value: &str) -> Result<Self, CoreError> {
                Self::parse(value).ok_or_else(|| {
                    CoreError::invalid_field(
                        field,
                        format!("'{}' is not one of: {}", value.trim(), Self::labels().join(", ")),
                    )
                })
            }

            /// Canonical labels of every variant.
            pub fn labels() -> Vec<&'static str> {
                Self::ALL.iter().map(|v| v.as_str()).collect()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

define_label_enum! {
    /// Project lifecycle phase. Recorded on the project and, independently,
    /// on every task log at the time it was written.
    Stage {
        Tendering => "Tendering",
        Procurement => "Procurement",
        PreDesign => "Pre-Design" | "Pre-design",
        Design => "Design",
        ConstructionMonitoring => "Construction & Monitoring",
        Commissioning => "Commissioning",
        Handover => "Handover",
        General => "General",
    }
}

define_label_enum! {
    /// Kind of work performed in a task log.
    TaskType {
        Design => "Design",
        Inspection => "Inspection",
        SiteMeeting => "Site Meeting",
        Valuation => "Valuation",
        Testing => "Testing",
        Commissioning => "Commissioning",
        Documentation => "Documentation",
        CoordinationMeeting => "Coordination Meeting",
    }
}

define_label_enum! {
    /// Status shared by task logs and projects. `Pending`, `In Progress` and
    /// `On Hold` come from the older status set and are still accepted.
    WorkStatus {
        Active => "Active",
        Pending => "Pending",
        InProgress => "In Progress",
        Completed => "Completed",
        OnHold => "On Hold",
        Stalled => "Stalled",
    }
}

define_label_enum! {
    /// Building category of a project.
    ProjectType {
        PersonalHouse => "Personal Hse",
        Hostel => "Hostel",
        Hotel => "Hotel",
        OfficeBlock => "Office Block",
        ResidentialApartment => "Residential Apartment",
        Industrial => "Industrial",
        FitOut => "FitOut",
        Renovation => "Renovation",
        School => "School",
        Research => "Research",
    }
}

define_label_enum! {
    /// How an employee travelled when a task took them out of the office.
    TransportMode {
        Road => "Road",
        Flight => "Flight",
        Other => "Other",
    }
}

define_label_enum! {
    /// Engineering discipline of a staff member.
    EngineerType {
        Electrical => "Electrical",
        Mechanical => "Mechanical",
    }
}

impl WorkStatus {
    /// Anything not completed counts as open work.
    pub fn is_open(self) -> bool {
        self != WorkStatus::Completed
    }
}

/// Whether a stored status label denotes open work. Unknown labels are open.
pub fn is_open_status(label: &str) -> bool {
    WorkStatus::parse(label).map_or(true, WorkStatus::is_open)
}

/// Whether a stored project status counts towards "active" KPIs.
pub fn is_active_status(label: &str) -> bool {
    matches!(
        WorkStatus::parse(label),
        Some(WorkStatus::Active | WorkStatus::InProgress)
    )
}

/// Whether a stored project status counts towards "stalled" KPIs.
pub fn is_stalled_status(label: &str) -> bool {
    matches!(
        WorkStatus::parse(label),
        Some(WorkStatus::Stalled | WorkStatus::OnHold)
    )
}

/// Whether a stored project status is completed.
pub fn is_completed_status(label: &str) -> bool {
    WorkStatus::parse(label) == Some(WorkStatus::Completed)
}
