//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every request value is parsed into its domain type here, before any
//! driving port is called, so handlers only ever pass validated data on.

use pagination::{PageRequest, PageRequestError};
use serde_json::json;

use crate::domain::{
    CommentId, CommentText, CommentValidationError, DisplayName, Error, IdValidationError,
    ProposalId, ProposalSort, ProposalText, ProposalValidationError, UserId, UserValidationError,
    VoteType,
};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidId,
    InvalidValue,
    InvalidText,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidId => "invalid_id",
            ErrorCode::InvalidValue => "invalid_value",
            ErrorCode::InvalidText => "invalid_text",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &str {
        self.0
    }
}

pub(crate) const USER_ID: FieldName = FieldName::new("userId");
pub(crate) const PROPOSAL_ID: FieldName = FieldName::new("proposalId");
pub(crate) const COMMENT_ID: FieldName = FieldName::new("commentId");
pub(crate) const VOTE_TYPE: FieldName = FieldName::new("voteType");

/// Builder for validation errors with field context.
struct ValidationError {
    field: String,
    message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    fn with_code(self, code: ErrorCode) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "code": code.as_str(),
        }))
    }

    fn with_value(self, code: ErrorCode, value: impl Into<String>) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "value": value.into(),
            "code": code.as_str(),
        }))
    }
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("missing required field: {field}"))
        .with_code(ErrorCode::MissingField)
}

fn invalid_id_error(field: FieldName, err: &IdValidationError) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("{field} is invalid: {err}"))
        .with_code(ErrorCode::InvalidId)
}

fn require(value: Option<String>, field: FieldName) -> Result<String, Error> {
    value.ok_or_else(|| missing_field_error(field))
}

pub(crate) fn parse_user_id(value: Option<String>, field: FieldName) -> Result<UserId, Error> {
    UserId::new(require(value, field)?).map_err(|err| invalid_id_error(field, &err))
}

/// Parse an optional viewer id, treating a blank value as absent.
pub(crate) fn parse_optional_user_id(
    value: Option<String>,
    field: FieldName,
) -> Result<Option<UserId>, Error> {
    value
        .filter(|raw| !raw.is_empty())
        .map(|raw| UserId::new(raw).map_err(|err| invalid_id_error(field, &err)))
        .transpose()
}

pub(crate) fn parse_proposal_id(value: Option<String>, field: FieldName) -> Result<ProposalId, Error> {
    ProposalId::new(require(value, field)?).map_err(|err| invalid_id_error(field, &err))
}

pub(crate) fn parse_comment_id(value: Option<String>, field: FieldName) -> Result<CommentId, Error> {
    CommentId::new(require(value, field)?).map_err(|err| invalid_id_error(field, &err))
}

/// Parse `voteType`; anything outside `upvote`/`downvote` is rejected.
pub(crate) fn parse_vote_type(value: Option<String>) -> Result<VoteType, Error> {
    let raw = require(value, VOTE_TYPE)?;
    raw.parse().map_err(|_| {
        ValidationError::new(VOTE_TYPE.as_str(), "Invalid vote type.")
            .with_value(ErrorCode::InvalidValue, raw)
    })
}

/// Parse `sortBy`, defaulting to `recent` when absent or blank.
pub(crate) fn parse_sort(value: Option<&str>) -> Result<ProposalSort, Error> {
    match value.map(str::trim) {
        None | Some("") => Ok(ProposalSort::default()),
        Some(raw) => raw.parse().map_err(|err: crate::domain::ParseProposalSortError| {
            ValidationError::new("sortBy", err.to_string())
                .with_value(ErrorCode::InvalidValue, raw)
        }),
    }
}

pub(crate) fn parse_page(page: Option<&str>, limit: Option<&str>) -> Result<PageRequest, Error> {
    PageRequest::parse(page, limit).map_err(|err| {
        let (field, value) = match &err {
            PageRequestError::InvalidPage { value } => ("page", value.clone()),
            PageRequestError::InvalidLimit { value } => ("limit", value.clone()),
        };
        ValidationError::new(field, err.to_string()).with_value(ErrorCode::InvalidValue, value)
    })
}

pub(crate) fn parse_display_name(value: Option<&str>, field: FieldName) -> Result<DisplayName, Error> {
    DisplayName::from_optional(value).map_err(|err| user_validation_error(field, &err))
}

/// Map credential and display-name failures onto their own field names.
pub(crate) fn user_validation_error(fallback: FieldName, err: &UserValidationError) -> Error {
    let field = match err {
        UserValidationError::EmptyCredential { field }
        | UserValidationError::CredentialTooLong { field, .. } => *field,
        UserValidationError::DisplayNameTooLong { .. } => fallback.as_str(),
    };
    ValidationError::new(field, err.to_string()).with_code(ErrorCode::InvalidText)
}

pub(crate) fn parse_proposal_text(value: Option<String>) -> Result<ProposalText, Error> {
    const TEXT: FieldName = FieldName::new("text");
    let raw = require(value, TEXT)?;
    ProposalText::new(raw).map_err(|err: ProposalValidationError| {
        ValidationError::new(TEXT.as_str(), err.to_string()).with_code(ErrorCode::InvalidText)
    })
}

pub(crate) fn parse_comment_text(value: Option<String>) -> Result<CommentText, Error> {
    const TEXT: FieldName = FieldName::new("text");
    let raw = require(value, TEXT)?;
    CommentText::new(raw).map_err(|err: CommentValidationError| {
        ValidationError::new(TEXT.as_str(), err.to_string()).with_code(ErrorCode::InvalidText)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode as DomainCode;
    use rstest::rstest;

    fn detail<'a>(err: &'a Error, key: &str) -> Option<&'a str> {
        err.details()
            .and_then(|details| details.get(key))
            .and_then(serde_json::Value::as_str)
    }

    #[rstest]
    #[case(Some("upvote"), VoteType::Upvote)]
    #[case(Some("downvote"), VoteType::Downvote)]
    fn vote_types_parse(#[case] raw: Option<&str>, #[case] expected: VoteType) {
        let parsed = parse_vote_type(raw.map(str::to_owned)).expect("valid vote type");
        assert_eq!(parsed, expected);
    }

    #[rstest]
    #[case("sideways")]
    #[case("UPVOTE")]
    #[case("")]
    fn unknown_vote_types_are_rejected(#[case] raw: &str) {
        let err = parse_vote_type(Some(raw.to_owned())).expect_err("invalid");
        assert_eq!(err.code(), DomainCode::InvalidRequest);
        assert_eq!(err.message(), "Invalid vote type.");
        assert_eq!(detail(&err, "field"), Some("voteType"));
    }

    #[rstest]
    fn missing_vote_type_names_the_field() {
        let err = parse_vote_type(None).expect_err("missing");
        assert_eq!(detail(&err, "code"), Some("missing_field"));
    }

    #[rstest]
    #[case(None, ProposalSort::Recent)]
    #[case(Some(""), ProposalSort::Recent)]
    #[case(Some("popular"), ProposalSort::Popular)]
    #[case(Some("trending"), ProposalSort::Trending)]
    fn sort_keys_parse(#[case] raw: Option<&str>, #[case] expected: ProposalSort) {
        assert_eq!(parse_sort(raw).expect("valid sort"), expected);
    }

    #[rstest]
    fn unknown_sort_is_rejected() {
        let err = parse_sort(Some("loudest")).expect_err("invalid sort");
        assert_eq!(detail(&err, "field"), Some("sortBy"));
        assert_eq!(detail(&err, "value"), Some("loudest"));
    }

    #[rstest]
    #[case(Some("0"), None, "page")]
    #[case(Some("x"), None, "page")]
    #[case(None, Some("0"), "limit")]
    #[case(None, Some("-3"), "limit")]
    fn bad_page_parameters_name_their_field(
        #[case] page: Option<&str>,
        #[case] limit: Option<&str>,
        #[case] field: &str,
    ) {
        let err = parse_page(page, limit).expect_err("invalid page");
        assert_eq!(detail(&err, "field"), Some(field));
    }

    #[rstest]
    fn blank_viewer_is_absent() {
        assert_eq!(parse_optional_user_id(Some(String::new()), USER_ID).expect("ok"), None);
    }

    #[rstest]
    fn padded_ids_are_rejected() {
        let err = parse_user_id(Some(" u1".into()), USER_ID).expect_err("padded");
        assert_eq!(detail(&err, "code"), Some("invalid_id"));
    }

    #[rstest]
    fn blank_proposal_text_is_rejected() {
        let err = parse_proposal_text(Some("   ".into())).expect_err("blank");
        assert_eq!(detail(&err, "field"), Some("text"));
    }

    #[rstest]
    fn credential_errors_name_the_credential_field() {
        let err = user_validation_error(
            FieldName::new("name"),
            &UserValidationError::EmptyCredential {
                field: "emojiCombination",
            },
        );
        assert_eq!(detail(&err, "field"), Some("emojiCombination"));
    }
}
