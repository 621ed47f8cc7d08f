//! Static step definitions for the four registration wizards.

use serde::Serialize;

use crate::profiles::{Attributes, EntityKind, FieldValue};

pub const SECTORS: &[&str] = &[
    "agritech",
    "ai_ml",
    "cleantech",
    "consumer",
    "deeptech",
    "edtech",
    "fintech",
    "healthtech",
    "logistics",
    "saas",
    "social_impact",
];

pub const STAGES: &[&str] = &[
    "idea",
    "prototype",
    "mvp",
    "early_revenue",
    "growth",
    "scale",
];

const YES_NO: &[&str] = &["yes", "no"];
const TEAM_SIZES: &[&str] = &["1-5", "6-10", "11-25", "26-50", "50+"];
const BUSINESS_MODELS: &[&str] = &["b2b", "b2c", "b2b2c", "marketplace", "d2c"];
const FUNDING_RANGES: &[&str] = &["<100k", "100k-500k", "500k-2m", "2m+"];
const PROGRAM_DURATIONS: &[&str] = &["3_months", "6_months", "12_months", "rolling"];
const FACILITIES: &[&str] = &[
    "co_working",
    "labs",
    "mentorship",
    "legal",
    "funding_access",
    "cloud_credits",
];
const INVESTOR_TYPES: &[&str] = &["individual", "firm"];
const TICKET_SIZES: &[&str] = &["<25k", "25k-100k", "100k-500k", "500k-2m", "2m+"];
const EXPERTISE: &[&str] = &[
    "fundraising",
    "product",
    "marketing",
    "sales",
    "engineering",
    "legal",
    "finance",
    "operations",
    "design",
];
const MENTORING_MODES: &[&str] = &["online", "in_person", "hybrid"];

/// Input widget and the validation rule that comes with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldInput {
    Text,
    LongText,
    Email,
    Phone,
    Url,
    Year,
    Number,
    Select { options: &'static [&'static str] },
    MultiSelect { options: &'static [&'static str] },
    Upload { bucket: &'static str },
}

impl FieldInput {
    pub const fn is_list(self) -> bool {
        matches!(self, FieldInput::MultiSelect { .. })
    }

    pub fn options(self) -> Option<&'static [&'static str]> {
        match self {
            FieldInput::Select { options } | FieldInput::MultiSelect { options } => Some(options),
            _ => None,
        }
    }
}

/// Visibility rule: the field shows when `field` equals (or, for lists, contains) `equals`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Condition {
    pub field: &'static str,
    pub equals: &'static str,
}

impl Condition {
    pub fn holds(&self, values: &Attributes) -> bool {
        match values.get(self.field) {
            Some(FieldValue::Text(value)) => value.trim() == self.equals,
            Some(FieldValue::List(values)) => values.iter().any(|value| value == self.equals),
            None => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldSpec {
    pub key: &'static str,
    pub label: &'static str,
    pub input: FieldInput,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible_when: Option<Condition>,
}

impl FieldSpec {
    const fn optional(key: &'static str, label: &'static str, input: FieldInput) -> Self {
        Self {
            key,
            label,
            input,
            required: false,
            visible_when: None,
        }
    }

    const fn required(key: &'static str, label: &'static str, input: FieldInput) -> Self {
        Self {
            key,
            label,
            input,
            required: true,
            visible_when: None,
        }
    }

    const fn when(mut self, field: &'static str, equals: &'static str) -> Self {
        self.visible_when = Some(Condition { field, equals });
        self
    }

    pub fn is_visible(&self, values: &Attributes) -> bool {
        self.visible_when
            .map_or(true, |condition| condition.holds(values))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StepSpec {
    pub key: &'static str,
    pub title: &'static str,
    pub fields: &'static [FieldSpec],
}

impl StepSpec {
    pub fn visible_fields<'a>(
        &'a self,
        values: &'a Attributes,
    ) -> impl Iterator<Item = &'a FieldSpec> + 'a {
        self.fields.iter().filter(move |field| field.is_visible(values))
    }
}

/// Ordered step sequence for one entity kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WizardDefinition {
    pub kind: EntityKind,
    pub steps: &'static [StepSpec],
}

impl WizardDefinition {
    pub fn step(&self, index: usize) -> Option<&'static StepSpec> {
        self.steps.get(index)
    }

    pub fn last_step(&self) -> usize {
        self.steps.len().saturating_sub(1)
    }

    pub fn field(&self, key: &str) -> Option<&'static FieldSpec> {
        self.steps
            .iter()
            .flat_map(|step| step.fields.iter())
            .find(|field| field.key == key)
    }

    pub fn fields(&self) -> impl Iterator<Item = &'static FieldSpec> {
        self.steps.iter().flat_map(|step| step.fields.iter())
    }
}

pub fn definition(kind: EntityKind) -> &'static WizardDefinition {
    match kind {
        EntityKind::Startup => &STARTUP,
        EntityKind::Incubator => &INCUBATOR,
        EntityKind::Investor => &INVESTOR,
        EntityKind::Mentor => &MENTOR,
    }
}

static STARTUP: WizardDefinition = WizardDefinition {
    kind: EntityKind::Startup,
    steps: &[
        StepSpec {
            key: "basics",
            title: "Startup basics",
            fields: &[
                FieldSpec::required("startup_name", "Startup name", FieldInput::Text),
                FieldSpec::required("tagline", "One-line pitch", FieldInput::Text),
                FieldSpec::required("founded_year", "Year founded", FieldInput::Year),
                FieldSpec::required("location", "City", FieldInput::Text),
                FieldSpec::optional("website", "Website", FieldInput::Url),
                FieldSpec::optional(
                    "logo_url",
                    "Logo",
                    FieldInput::Upload { bucket: "logos" },
                ),
            ],
        },
        StepSpec {
            key: "team",
            title: "Founding team",
            fields: &[
                FieldSpec::required("founder_name", "Founder name", FieldInput::Text),
                FieldSpec::required("founder_email", "Founder email", FieldInput::Email),
                FieldSpec::required("founder_phone", "Founder phone", FieldInput::Phone),
                FieldSpec::required(
                    "team_size",
                    "Team size",
                    FieldInput::Select {
                        options: TEAM_SIZES,
                    },
                ),
            ],
        },
        StepSpec {
            key: "business",
            title: "Business details",
            fields: &[
                FieldSpec::required(
                    "sectors",
                    "Sectors",
                    FieldInput::MultiSelect { options: SECTORS },
                ),
                FieldSpec::required("stage", "Stage", FieldInput::Select { options: STAGES }),
                FieldSpec::optional(
                    "business_model",
                    "Business model",
                    FieldInput::Select {
                        options: BUSINESS_MODELS,
                    },
                ),
                FieldSpec::required("description", "What do you do?", FieldInput::LongText),
            ],
        },
        StepSpec {
            key: "support",
            title: "Support and funding",
            fields: &[
                FieldSpec::required(
                    "incubated",
                    "Part of an incubator?",
                    FieldInput::Select { options: YES_NO },
                ),
                FieldSpec::required("incubator_id", "Incubator", FieldInput::Text)
                    .when("incubated", "yes"),
                FieldSpec::required(
                    "has_raised_funding",
                    "Raised funding?",
                    FieldInput::Select { options: YES_NO },
                ),
                FieldSpec::required(
                    "funding_amount",
                    "Amount raised",
                    FieldInput::Select {
                        options: FUNDING_RANGES,
                    },
                )
                .when("has_raised_funding", "yes"),
                FieldSpec::optional(
                    "pitch_deck_url",
                    "Pitch deck",
                    FieldInput::Upload {
                        bucket: "documents",
                    },
                ),
            ],
        },
    ],
};

static INCUBATOR: WizardDefinition = WizardDefinition {
    kind: EntityKind::Incubator,
    steps: &[
        StepSpec {
            key: "basics",
            title: "Incubator basics",
            fields: &[
                FieldSpec::required("incubator_name", "Incubator name", FieldInput::Text),
                FieldSpec::optional("host_institution", "Host institution", FieldInput::Text),
                FieldSpec::required("established_year", "Year established", FieldInput::Year),
                FieldSpec::required("location", "City", FieldInput::Text),
                FieldSpec::required("website", "Website", FieldInput::Url),
                FieldSpec::optional(
                    "logo_url",
                    "Logo",
                    FieldInput::Upload { bucket: "logos" },
                ),
            ],
        },
        StepSpec {
            key: "programme",
            title: "Programme",
            fields: &[
                FieldSpec::required(
                    "sectors",
                    "Sector focus",
                    FieldInput::MultiSelect { options: SECTORS },
                ),
                FieldSpec::required(
                    "program_duration",
                    "Programme length",
                    FieldInput::Select {
                        options: PROGRAM_DURATIONS,
                    },
                ),
                FieldSpec::required(
                    "takes_equity",
                    "Takes equity?",
                    FieldInput::Select { options: YES_NO },
                ),
                FieldSpec::required("equity_percentage", "Equity %", FieldInput::Number)
                    .when("takes_equity", "yes"),
                FieldSpec::required("description", "About the programme", FieldInput::LongText),
            ],
        },
        StepSpec {
            key: "capacity",
            title: "Capacity and contact",
            fields: &[
                FieldSpec::required(
                    "startups_supported",
                    "Startups supported to date",
                    FieldInput::Number,
                ),
                FieldSpec::optional(
                    "facilities",
                    "Facilities",
                    FieldInput::MultiSelect {
                        options: FACILITIES,
                    },
                ),
                FieldSpec::optional("application_url", "Application link", FieldInput::Url),
                FieldSpec::required("contact_email", "Contact email", FieldInput::Email),
                FieldSpec::optional("contact_phone", "Contact phone", FieldInput::Phone),
            ],
        },
    ],
};

static INVESTOR: WizardDefinition = WizardDefinition {
    kind: EntityKind::Investor,
    steps: &[
        StepSpec {
            key: "basics",
            title: "About you",
            fields: &[
                FieldSpec::required(
                    "investor_type",
                    "Investor type",
                    FieldInput::Select {
                        options: INVESTOR_TYPES,
                    },
                ),
                FieldSpec::required("investor_name", "Name", FieldInput::Text),
                FieldSpec::required("firm_name", "Firm name", FieldInput::Text)
                    .when("investor_type", "firm"),
                FieldSpec::required("location", "City", FieldInput::Text),
                FieldSpec::optional("linkedin_url", "LinkedIn", FieldInput::Url),
                FieldSpec::optional(
                    "avatar_url",
                    "Photo",
                    FieldInput::Upload { bucket: "avatars" },
                ),
            ],
        },
        StepSpec {
            key: "thesis",
            title: "Investment thesis",
            fields: &[
                FieldSpec::required(
                    "sectors",
                    "Sectors",
                    FieldInput::MultiSelect { options: SECTORS },
                ),
                FieldSpec::required(
                    "preferred_stages",
                    "Preferred stages",
                    FieldInput::MultiSelect { options: STAGES },
                ),
                FieldSpec::required(
                    "ticket_size",
                    "Typical ticket",
                    FieldInput::Select {
                        options: TICKET_SIZES,
                    },
                ),
                FieldSpec::optional(
                    "portfolio_highlights",
                    "Portfolio highlights",
                    FieldInput::LongText,
                ),
            ],
        },
        StepSpec {
            key: "contact",
            title: "Contact",
            fields: &[
                FieldSpec::required("contact_email", "Email", FieldInput::Email),
                FieldSpec::optional("contact_phone", "Phone", FieldInput::Phone),
                FieldSpec::optional("website", "Website", FieldInput::Url),
            ],
        },
    ],
};

static MENTOR: WizardDefinition = WizardDefinition {
    kind: EntityKind::Mentor,
    steps: &[
        StepSpec {
            key: "basics",
            title: "About you",
            fields: &[
                FieldSpec::required("full_name", "Full name", FieldInput::Text),
                FieldSpec::required("headline", "Headline", FieldInput::Text),
                FieldSpec::required("location", "City", FieldInput::Text),
                FieldSpec::optional("linkedin_url", "LinkedIn", FieldInput::Url),
                FieldSpec::optional(
                    "avatar_url",
                    "Photo",
                    FieldInput::Upload { bucket: "avatars" },
                ),
            ],
        },
        StepSpec {
            key: "expertise",
            title: "Expertise",
            fields: &[
                FieldSpec::required(
                    "expertise_areas",
                    "Expertise",
                    FieldInput::MultiSelect { options: EXPERTISE },
                ),
                FieldSpec::optional(
                    "sectors",
                    "Industries",
                    FieldInput::MultiSelect { options: SECTORS },
                ),
                FieldSpec::required(
                    "years_of_experience",
                    "Years of experience",
                    FieldInput::Number,
                ),
                FieldSpec::required("bio", "Short bio", FieldInput::LongText),
            ],
        },
        StepSpec {
            key: "availability",
            title: "Availability",
            fields: &[
                FieldSpec::required(
                    "mentoring_mode",
                    "Mentoring mode",
                    FieldInput::Select {
                        options: MENTORING_MODES,
                    },
                ),
                FieldSpec::required(
                    "paid_mentorship",
                    "Paid sessions?",
                    FieldInput::Select { options: YES_NO },
                ),
                FieldSpec::required("hourly_rate", "Hourly rate", FieldInput::Number)
                    .when("paid_mentorship", "yes"),
                FieldSpec::required("contact_email", "Email", FieldInput::Email),
            ],
        },
    ],
};
