//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Users keyed on client-chosen opaque ids.
    users (id) {
        id -> Text,
        display_name -> Text,
        created_at -> Timestamptz,
        /// Emoji sequence set at first login.
        emoji_combination -> Nullable<Text>,
        first_selection_id -> Nullable<Text>,
        second_selection_id -> Nullable<Text>,
        last_login_at -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    /// Proposals submitted by users.
    proposals (id) {
        id -> Text,
        author_id -> Text,
        text -> Text,
        created_at -> Timestamptz,
        trending -> Bool,
        meme_url -> Nullable<Text>,
        share_image_url -> Nullable<Text>,
    }
}

diesel::table! {
    /// Immutable comments on proposals.
    comments (id) {
        id -> Text,
        proposal_id -> Text,
        user_id -> Text,
        text -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Proposal votes; the composite key enforces one vote per user.
    votes (proposal_id, user_id) {
        proposal_id -> Text,
        user_id -> Text,
        /// `upvote` or `downvote`.
        vote_type -> Text,
        is_petition -> Bool,
        voted_at -> Timestamptz,
    }
}

diesel::table! {
    /// Comment votes; the composite key enforces one vote per user.
    comment_votes (comment_id, user_id) {
        comment_id -> Text,
        user_id -> Text,
        vote_type -> Text,
        voted_at -> Timestamptz,
    }
}

diesel::table! {
    /// Petition signature details captured with petition upvotes.
    petition_details (proposal_id, user_id) {
        proposal_id -> Text,
        user_id -> Text,
        full_name -> Text,
        address -> Text,
        /// Upper-cased, whitespace-collapsed postcode.
        postcode -> Text,
        date_of_birth -> Text,
        email -> Text,
        verified -> Bool,
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(proposals -> users (author_id));
diesel::joinable!(comments -> proposals (proposal_id));
diesel::joinable!(comments -> users (user_id));
diesel::joinable!(votes -> proposals (proposal_id));
diesel::joinable!(comment_votes -> comments (comment_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    proposals,
    comments,
    votes,
    comment_votes,
    petition_details,
);
