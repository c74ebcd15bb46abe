//! Petition signatures captured alongside upvotes, and their aggregates.

use super::ProposalId;

/// Number of postcodes reported in [`PetitionStats::top_postcodes`].
pub const TOP_POSTCODES: usize = 5;

/// Petition details failed validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PetitionValidationError {
    /// One or more required fields were absent or blank.
    #[error("missing petition details: {}", fields.join(", "))]
    MissingFields { fields: Vec<&'static str> },
}

/// Unvalidated petition payload as received from clients.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PetitionDetailsDraft {
    pub full_name: Option<String>,
    pub address: Option<String>,
    pub postcode: Option<String>,
    pub date_of_birth: Option<String>,
    pub email: Option<String>,
}

/// Validated petition signature fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PetitionDetails {
    full_name: String,
    address: String,
    postcode: String,
    date_of_birth: String,
    email: String,
}

impl TryFrom<PetitionDetailsDraft> for PetitionDetails {
    type Error = PetitionValidationError;

    fn try_from(draft: PetitionDetailsDraft) -> Result<Self, Self::Error> {
        let mut missing = Vec::new();
        let mut take = |field: &'static str, value: Option<String>| {
            match value.map(|v| v.trim().to_owned()).filter(|v| !v.is_empty()) {
                Some(v) => v,
                None => {
                    missing.push(field);
                    String::new()
                }
            }
        };
        let full_name = take("fullName", draft.full_name);
        let address = take("address", draft.address);
        let postcode = take("postcode", draft.postcode);
        let date_of_birth = take("dateOfBirth", draft.date_of_birth);
        let email = take("email", draft.email);
        if !missing.is_empty() {
            return Err(PetitionValidationError::MissingFields { fields: missing });
        }
        Ok(Self {
            full_name,
            address,
            postcode: normalise_postcode(&postcode),
            date_of_birth,
            email,
        })
    }
}

impl PetitionDetails {
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    /// Upper-case postcode with internal whitespace collapsed.
    pub fn postcode(&self) -> &str {
        &self.postcode
    }

    pub fn date_of_birth(&self) -> &str {
        &self.date_of_birth
    }

    pub fn email(&self) -> &str {
        &self.email
    }
}

/// Upper-case a postcode and collapse runs of whitespace to single spaces.
pub fn normalise_postcode(raw: &str) -> String {
    raw.split_whitespace()
        .map(str::to_uppercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Signature count for one postcode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostcodeCount {
    pub postcode: String,
    pub count: u64,
}

/// Aggregate petition figures for a proposal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PetitionStats {
    pub proposal_id: ProposalId,
    pub total_signatures: u64,
    pub verified_signatures: u64,
    pub top_postcodes: Vec<PostcodeCount>,
}

/// Order postcode counts by count descending then postcode, keeping the top
/// [`TOP_POSTCODES`].
pub fn rank_postcodes(mut counts: Vec<PostcodeCount>) -> Vec<PostcodeCount> {
    counts.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.postcode.cmp(&b.postcode)));
    counts.truncate(TOP_POSTCODES);
    counts
}
