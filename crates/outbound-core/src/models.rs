//! Intake records and their collection mapping.
//!
//! Every record is flat and immutable once stored. Each record type knows
//! which collection it lives in and how to read itself from untyped JSON;
//! the mapping is an explicit table so collection names stay stable when
//! types are renamed.

use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::{
    error::{StoreError, StoreResult},
    storage::Document,
    validation::{FieldReader, ValidationError},
};

/// Named group of documents in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Collection {
    /// Connectivity pings written by the health check.
    Health,
    /// Prospect contacts.
    Lead,
    /// Buying-intent observations about a company.
    IntentSignal,
    /// Outbound campaigns.
    Campaign,
    /// Step 1 intake: kickoff meeting request.
    MeetingRequest,
    /// Step 2 intake: persona workshop.
    PersonaWorkshopInput,
    /// Step 3 intake: copywriting inputs.
    CopywritingInput,
    /// Step 3 intake: cold caller matching.
    ColdCallerMatchInput,
    /// Step 4 intake: campaign launch.
    LaunchInput,
}

impl Collection {
    /// Every collection, in bootstrap order.
    pub const ALL: [Self; 9] = [
        Self::Health,
        Self::Lead,
        Self::IntentSignal,
        Self::Campaign,
        Self::MeetingRequest,
        Self::PersonaWorkshopInput,
        Self::CopywritingInput,
        Self::ColdCallerMatchInput,
        Self::LaunchInput,
    ];

    /// Storage name of the collection.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Health => "health",
            Self::Lead => "lead",
            Self::IntentSignal => "intentsignal",
            Self::Campaign => "campaign",
            Self::MeetingRequest => "meetingrequest",
            Self::PersonaWorkshopInput => "personaworkshopinput",
            Self::CopywritingInput => "copywritinginput",
            Self::ColdCallerMatchInput => "coldcallermatchinput",
            Self::LaunchInput => "launchinput",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A record type accepted by a create operation.
pub trait Record: Serialize + Sized + Send + 'static {
    /// Collection the record is stored in.
    const COLLECTION: Collection;

    /// Key under which the stored record is echoed in create responses.
    const RESPONSE_KEY: &'static str;

    /// Reads every declared field, applying defaults.
    fn read(fields: &mut FieldReader<'_>) -> Self;

    /// Validates untyped input into a canonical record.
    ///
    /// # Errors
    ///
    /// Returns every violated field when the input does not conform.
    fn validate(input: &Value) -> Result<Self, ValidationError> {
        let mut fields = FieldReader::new(input);
        let record = Self::read(&mut fields);
        fields.finish()?;
        Ok(record)
    }

    /// Converts the record into a storable document with every declared
    /// field present.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Serialization` if the record does not
    /// serialize to a JSON object.
    fn to_document(&self) -> StoreResult<Document> {
        match serde_json::to_value(self)? {
            Value::Object(document) => Ok(document),
            other => Err(StoreError::Serialization(format!(
                "{} record serialized to non-object {other}",
                Self::COLLECTION
            ))),
        }
    }
}

/// Prospect contact. Every field is independently optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Lead {
    /// Contact email, format-checked when present
    pub email: Option<String>,
    /// Given name
    pub first_name: Option<String>,
    /// Family name
    pub last_name: Option<String>,
    /// Phone number as entered
    pub phone: Option<String>,
    /// Employer
    pub company: Option<String>,
    /// Job title
    pub title: Option<String>,
    /// LinkedIn profile URL
    pub linkedin_url: Option<String>,
    /// Where the lead came from; `"manual"` when omitted.
    pub source: Option<String>,
    /// Free-form labels, order preserved.
    pub tags: Vec<String>,
    /// Free text
    pub notes: Option<String>,
}

impl Record for Lead {
    const COLLECTION: Collection = Collection::Lead;
    const RESPONSE_KEY: &'static str = "lead";

    fn read(fields: &mut FieldReader<'_>) -> Self {
        Self {
            email: fields.optional_email("email"),
            first_name: fields.optional_string("first_name"),
            last_name: fields.optional_string("last_name"),
            phone: fields.optional_string("phone"),
            company: fields.optional_string("company"),
            title: fields.optional_string("title"),
            linkedin_url: fields.optional_string("linkedin_url"),
            source: fields.nullable_string_or("source", "manual"),
            tags: fields.string_list_or_empty("tags"),
            notes: fields.optional_string("notes"),
        }
    }
}

/// Buying-intent observation about a company.
///
/// `type` is an open tag (hiring-surge, recent-joiner, site-visit,
/// tech-stack, ...) and is deliberately kept as a plain string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IntentSignal {
    /// Company the signal was observed for
    pub company: String,
    /// Signal kind, stored under `type`
    #[serde(rename = "type")]
    pub signal_type: String,
    /// Free-text description
    pub detail: Option<String>,
    /// Measured value, if any
    pub value: Option<String>,
}

impl Record for IntentSignal {
    const COLLECTION: Collection = Collection::IntentSignal;
    const RESPONSE_KEY: &'static str = "signal";

    fn read(fields: &mut FieldReader<'_>) -> Self {
        Self {
            company: fields.required_string("company"),
            signal_type: fields.required_string("type"),
            detail: fields.optional_string("detail"),
            value: fields.optional_string("value"),
        }
    }
}

/// Outbound campaign.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Campaign {
    /// Display name
    pub name: String,
    /// What the campaign should achieve
    pub objective: String,
    /// Target persona
    pub persona: Option<String>,
    /// Lifecycle label; `"draft"` when omitted.
    pub status: String,
}

impl Record for Campaign {
    const COLLECTION: Collection = Collection::Campaign;
    const RESPONSE_KEY: &'static str = "campaign";

    fn read(fields: &mut FieldReader<'_>) -> Self {
        Self {
            name: fields.required_string("name"),
            objective: fields.required_string("objective"),
            persona: fields.optional_string("persona"),
            status: fields.string_or("status", "draft"),
        }
    }
}

/// Kickoff meeting request from a prospective client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MeetingRequest {
    /// Requesting company
    pub company: String,
    /// Contact address, must be a valid email
    pub contact_email: String,
    /// Contact person
    pub contact_name: Option<String>,
    /// How the company sells, e.g. B2B SaaS
    pub business_model: String,
    /// Outcomes the client wants
    pub goals: Option<String>,
}

impl Record for MeetingRequest {
    const COLLECTION: Collection = Collection::MeetingRequest;
    const RESPONSE_KEY: &'static str = "meeting_request";

    fn read(fields: &mut FieldReader<'_>) -> Self {
        Self {
            company: fields.required_string("company"),
            contact_email: fields.required_email("contact_email"),
            contact_name: fields.optional_string("contact_name"),
            business_model: fields.required_string("business_model"),
            goals: fields.optional_string("goals"),
        }
    }
}

/// Persona workshop input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersonaWorkshopInput {
    /// CRM contacts the persona is built from.
    pub crm_contact_ids: Vec<String>,
    /// How the workshop outcome is judged
    pub success_criteria: Option<String>,
}

impl Record for PersonaWorkshopInput {
    const COLLECTION: Collection = Collection::PersonaWorkshopInput;
    const RESPONSE_KEY: &'static str = "persona_workshop";

    fn read(fields: &mut FieldReader<'_>) -> Self {
        Self {
            crm_contact_ids: fields.required_string_list("crm_contact_ids"),
            success_criteria: fields.optional_string("success_criteria"),
        }
    }
}

/// Copywriting brief for one persona.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CopywritingInput {
    /// Persona the copy addresses
    pub persona: String,
    /// Pain points, in priority order
    pub pains: Vec<String>,
    /// Words and phrases the persona uses
    pub vocabulary: Vec<String>,
}

impl Record for CopywritingInput {
    const COLLECTION: Collection = Collection::CopywritingInput;
    const RESPONSE_KEY: &'static str = "copywriting";

    fn read(fields: &mut FieldReader<'_>) -> Self {
        Self {
            persona: fields.required_string("persona"),
            pains: fields.required_string_list("pains"),
            vocabulary: fields.required_string_list("vocabulary"),
        }
    }
}

/// Criteria for matching cold callers to a campaign.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColdCallerMatchInput {
    /// Target industry
    pub industry: String,
    /// Roles to call, in priority order
    pub target_roles: Vec<String>,
}

impl Record for ColdCallerMatchInput {
    const COLLECTION: Collection = Collection::ColdCallerMatchInput;
    const RESPONSE_KEY: &'static str = "cold_caller_match";

    fn read(fields: &mut FieldReader<'_>) -> Self {
        Self {
            industry: fields.required_string("industry"),
            target_roles: fields.required_string_list("target_roles"),
        }
    }
}

/// Launch request for a campaign. The id is not checked against stored
/// campaigns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LaunchInput {
    /// Campaign to launch
    pub campaign_id: String,
}

impl Record for LaunchInput {
    const COLLECTION: Collection = Collection::LaunchInput;
    const RESPONSE_KEY: &'static str = "launch";

    fn read(fields: &mut FieldReader<'_>) -> Self {
        Self { campaign_id: fields.required_string("campaign_id") }
    }
}
